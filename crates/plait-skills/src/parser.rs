//! SKILL.md parsing and progressive-disclosure loading.
//!
//! A SKILL.md document is YAML frontmatter fenced by `---` lines, followed
//! by the markdown instructions body. Disclosure happens in three phases:
//! metadata (frontmatter only), instructions (body only), and resources
//! (files under the skill directory).

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::errors::{Result, SkillError};
use crate::model::{SkillFrontmatter, SkillProperties};
use crate::validate::validate_frontmatter;

const FRONTMATTER_FENCE: &str = "---";

/// Locate the SKILL.md document inside a skill directory.
pub fn find_skill_md(skill_dir: &Path) -> Result<PathBuf> {
    let path = skill_dir.join("SKILL.md");
    if path.is_file() {
        Ok(path)
    } else {
        Err(SkillError::parse(
            skill_dir.display().to_string(),
            "no SKILL.md document present",
        ))
    }
}

/// Split a SKILL.md document into its frontmatter and instructions body.
fn split_frontmatter(path: &Path, content: &str) -> Result<(String, String)> {
    let mut lines = content.lines();
    match lines.next() {
        Some(first) if first.trim_end() == FRONTMATTER_FENCE => {}
        _ => {
            return Err(SkillError::parse(
                path.display().to_string(),
                "document does not start with a frontmatter block",
            ))
        }
    }

    let mut frontmatter_lines = Vec::new();
    let mut terminated = false;
    while let Some(line) = lines.next() {
        if line.trim_end() == FRONTMATTER_FENCE {
            terminated = true;
            break;
        }
        frontmatter_lines.push(line);
    }
    if !terminated {
        return Err(SkillError::parse(
            path.display().to_string(),
            "unterminated frontmatter block",
        ));
    }

    let body = lines.collect::<Vec<_>>().join("\n");
    Ok((frontmatter_lines.join("\n"), body))
}

/// Phase 1: load and validate a skill's metadata only.
pub fn load_metadata(path: &Path) -> Result<SkillProperties> {
    let content = fs::read_to_string(path)?;
    let (frontmatter_text, _) = split_frontmatter(path, &content)?;
    let frontmatter: SkillFrontmatter = serde_yaml::from_str(&frontmatter_text)
        .map_err(|e| SkillError::parse(path.display().to_string(), e.to_string()))?;
    validate_frontmatter(&frontmatter)?;
    Ok(SkillProperties::from_frontmatter(
        frontmatter,
        path.to_path_buf(),
    ))
}

/// Phase 2: load a skill's instructions body, without the frontmatter.
pub fn load_instructions(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path)?;
    let (_, body) = split_frontmatter(path, &content)?;
    Ok(body.trim_start_matches('\n').to_string())
}

/// Phase 3: load a resource file from inside the skill directory.
///
/// The resource path must stay within the skill directory: absolute paths
/// and parent-directory traversal are rejected.
pub fn load_resource(skill: &SkillProperties, resource: &Path) -> Result<String> {
    let escapes = resource.is_absolute()
        || resource
            .components()
            .any(|component| matches!(component, Component::ParentDir));
    if escapes {
        return Err(SkillError::activation(
            &skill.name,
            format!(
                "resource path '{}' escapes the skill directory",
                resource.display()
            ),
        ));
    }
    Ok(fs::read_to_string(skill.skill_dir.join(resource))?)
}
