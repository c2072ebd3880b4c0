//! The skill dispatcher: one meta-tool surface over a discovered set.
//!
//! Agents interact with skills through a single dispatcher with three
//! actions — list, info, activate — rather than one tool per skill.
//! Activation is phase 2 of progressive disclosure: it loads the
//! instructions body and prepends a header built from the already-known
//! metadata.

use std::collections::BTreeMap;

use crate::errors::{Result, SkillError};
use crate::model::SkillProperties;
use crate::parser::load_instructions;

/// The action requested from the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillAction {
    /// Show all available skills.
    List,
    /// Show detailed metadata for one skill.
    Info,
    /// Load a skill's full instructions.
    Activate,
}

/// A set of discovered skills, addressable by name.
#[derive(Debug, Clone, Default)]
pub struct SkillSet {
    skills: BTreeMap<String, SkillProperties>,
}

impl SkillSet {
    /// Build a set from discovered properties.
    pub fn new(skills: Vec<SkillProperties>) -> Self {
        Self {
            skills: skills
                .into_iter()
                .map(|skill| (skill.name.clone(), skill))
                .collect(),
        }
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// The skills in the set, sorted by name.
    pub fn skills(&self) -> impl Iterator<Item = &SkillProperties> {
        self.skills.values()
    }

    /// Look up one skill by name.
    pub fn get(&self, name: &str) -> Option<&SkillProperties> {
        self.skills.get(name)
    }

    fn available(&self) -> String {
        self.skills.keys().cloned().collect::<Vec<_>>().join(", ")
    }

    /// Perform an action against the set.
    pub fn dispatch(&self, skill_name: &str, action: SkillAction) -> Result<String> {
        match action {
            SkillAction::List => Ok(self.list()),
            SkillAction::Info => Ok(self.info(skill_name)),
            SkillAction::Activate => self.activate(skill_name),
        }
    }

    /// Format the available skills for the agent.
    pub fn list(&self) -> String {
        if self.skills.is_empty() {
            return "No skills available. Check the skills directory.".to_string();
        }

        let mut lines = vec!["Available Skills:\n".to_string()];
        for skill in self.skills.values() {
            lines.push(format!("- {}", skill.name));
            lines.push(format!("  {}", skill.description));
            lines.push(format!("  Location: {}\n", skill.path.display()));
        }
        lines.join("\n")
    }

    /// Format detailed metadata for one skill.
    ///
    /// An unknown name yields a friendly message rather than an error, so
    /// the agent can recover by listing.
    pub fn info(&self, skill_name: &str) -> String {
        let Some(skill) = self.skills.get(skill_name) else {
            return format!(
                "Skill '{}' not found.\nAvailable skills: {}",
                skill_name,
                self.available()
            );
        };

        let mut lines = vec![
            format!("Skill: {}", skill.name),
            format!("Description: {}", skill.description),
            format!("SKILL.md: {}", skill.path.display()),
            format!("Directory: {}", skill.skill_dir.display()),
        ];
        if let Some(allowed_tools) = &skill.allowed_tools {
            lines.push(format!("Allowed Tools: {allowed_tools}"));
        }
        if let Some(compatibility) = &skill.compatibility {
            lines.push(format!("Compatibility: {compatibility}"));
        }
        if let Some(license) = &skill.license {
            lines.push(format!("License: {license}"));
        }
        lines.join("\n")
    }

    /// Activate a skill: load its instructions and prepend the metadata
    /// header.
    pub fn activate(&self, skill_name: &str) -> Result<String> {
        let skill = self.skills.get(skill_name).ok_or_else(|| SkillError::NotFound {
            name: skill_name.to_string(),
            available: self.available(),
        })?;

        let instructions = load_instructions(&skill.path)
            .map_err(|e| SkillError::activation(skill_name, e.to_string()))?;
        log::info!("activating skill: {skill_name}");

        let mut header = format!(
            "# Skill: {}\n\n**Description:** {}\n\n**Skill Directory:** `{}/`\n\n",
            skill.name,
            skill.description,
            skill.skill_dir.display()
        );
        if let Some(allowed_tools) = &skill.allowed_tools {
            header.push_str(&format!(
                "**IMPORTANT:** Only use these tools: `{allowed_tools}`\n\n"
            ));
        }
        header.push_str("---\n\n# Instructions\n\n");

        Ok(header + &instructions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::discover_skills;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_skill(root: &Path, name: &str, extra_frontmatter: &str, body: &str) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("SKILL.md"),
            format!("---\nname: {name}\ndescription: The {name} skill\n{extra_frontmatter}---\n\n{body}"),
        )
        .unwrap();
    }

    fn skill_set(root: &Path) -> SkillSet {
        SkillSet::new(discover_skills(root).unwrap())
    }

    #[test]
    fn test_list_formats_all_skills() {
        let tmp = TempDir::new().unwrap();
        write_skill(tmp.path(), "alpha", "", "A body.\n");
        write_skill(tmp.path(), "beta", "", "B body.\n");

        let listing = skill_set(tmp.path()).list();
        assert!(listing.starts_with("Available Skills:"));
        assert!(listing.contains("- alpha"));
        assert!(listing.contains("- beta"));
        assert!(listing.contains("The alpha skill"));
    }

    #[test]
    fn test_list_when_empty() {
        let tmp = TempDir::new().unwrap();
        let listing = skill_set(tmp.path()).list();
        assert!(listing.contains("No skills available"));
    }

    #[test]
    fn test_info_known_and_unknown() {
        let tmp = TempDir::new().unwrap();
        write_skill(tmp.path(), "alpha", "license: MIT\n", "Body.\n");
        let set = skill_set(tmp.path());

        let info = set.info("alpha");
        assert!(info.contains("Skill: alpha"));
        assert!(info.contains("License: MIT"));

        let missing = set.info("nope");
        assert!(missing.contains("Skill 'nope' not found"));
        assert!(missing.contains("alpha"));
    }

    #[test]
    fn test_activate_builds_header_and_instructions() {
        let tmp = TempDir::new().unwrap();
        write_skill(
            tmp.path(),
            "web-research",
            "allowed-tools: fetch, search\n",
            "# Workflow\n\n1. Search.\n",
        );
        let set = skill_set(tmp.path());

        let activated = set.activate("web-research").unwrap();
        assert!(activated.starts_with("# Skill: web-research"));
        assert!(activated.contains("**IMPORTANT:** Only use these tools: `fetch, search`"));
        assert!(activated.contains("# Instructions"));
        assert!(activated.ends_with("# Workflow\n\n1. Search.\n"));
    }

    #[test]
    fn test_activate_unknown_is_not_found() {
        let tmp = TempDir::new().unwrap();
        write_skill(tmp.path(), "alpha", "", "Body.\n");
        let err = skill_set(tmp.path()).activate("missing").unwrap_err();
        assert!(matches!(err, SkillError::NotFound { .. }));
        assert!(err.to_string().contains("alpha"));
    }

    #[test]
    fn test_dispatch_routes_actions() {
        let tmp = TempDir::new().unwrap();
        write_skill(tmp.path(), "alpha", "", "Body.\n");
        let set = skill_set(tmp.path());

        assert!(set.dispatch("", SkillAction::List).unwrap().contains("- alpha"));
        assert!(set
            .dispatch("alpha", SkillAction::Info)
            .unwrap()
            .contains("Skill: alpha"));
        assert!(set
            .dispatch("alpha", SkillAction::Activate)
            .unwrap()
            .contains("# Instructions"));
    }
}
