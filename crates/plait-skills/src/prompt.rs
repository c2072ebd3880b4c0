//! System-prompt generation for discovered skills.

use crate::model::SkillProperties;

/// Generate the markdown "Available Skills" section for an agent's system
/// prompt.
///
/// Lists each skill's name, description, and location — the phase-1
/// disclosure — so the agent can recognize relevance without loading any
/// instructions. Returns an empty string when no skills were discovered.
pub fn generate_skills_prompt(skills: &[SkillProperties]) -> String {
    if skills.is_empty() {
        return String::new();
    }

    let mut lines = vec![
        "\n## Available Skills\n".to_string(),
        "You have access to specialized skills that provide domain expertise \
         and structured workflows. Skills use **progressive disclosure** - \
         you see their names and descriptions here, but only load full \
         instructions when needed.\n"
            .to_string(),
    ];

    let mut sorted: Vec<&SkillProperties> = skills.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));

    for skill in sorted {
        lines.push(format!("\n### {}", skill.name));
        lines.push(format!("{}\n", skill.description));
        lines.push(format!("**Location:** `{}`", skill.path.display()));

        if let Some(allowed_tools) = &skill.allowed_tools {
            lines.push(format!("**Allowed Tools:** {allowed_tools}"));
        }
        if let Some(compatibility) = &skill.compatibility {
            lines.push(format!("**Requirements:** {compatibility}"));
        }
    }

    lines.extend([
        "\n\n**How to Use Skills:**\n".to_string(),
        "1. **Recognize relevance**: Check if user's task matches a skill's description".to_string(),
        "2. **Activate the skill**: Use the `skill` tool with action='activate'".to_string(),
        "3. **Follow instructions**: Read and follow the workflow in SKILL.md".to_string(),
        "4. **Access resources**: Use absolute paths for scripts/references in skill directory\n"
            .to_string(),
    ]);

    lines.join("\n")
}
