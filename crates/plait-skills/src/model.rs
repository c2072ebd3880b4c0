//! Skill metadata types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The YAML frontmatter at the top of a SKILL.md document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillFrontmatter {
    /// Unique skill name (lowercase, hyphen-separated).
    pub name: String,
    /// Human-readable description used for skill selection.
    pub description: String,
    /// Comma-separated list of tools the skill permits, if restricted.
    #[serde(rename = "allowed-tools", default, skip_serializing_if = "Option::is_none")]
    pub allowed_tools: Option<String>,
    /// Runtime compatibility requirements, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compatibility: Option<String>,
    /// License identifier, if declared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
}

/// A discovered skill: frontmatter metadata plus filesystem location.
///
/// This is the phase-1 disclosure unit — enough for an agent to decide
/// whether a skill is relevant, without loading its instructions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillProperties {
    /// Unique skill name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Path to the SKILL.md document.
    pub path: PathBuf,
    /// The directory containing the skill and its resources.
    pub skill_dir: PathBuf,
    /// Comma-separated list of tools the skill permits, if restricted.
    pub allowed_tools: Option<String>,
    /// Runtime compatibility requirements, if any.
    pub compatibility: Option<String>,
    /// License identifier, if declared.
    pub license: Option<String>,
}

impl SkillProperties {
    /// Build properties from parsed frontmatter and the SKILL.md path.
    pub fn from_frontmatter(frontmatter: SkillFrontmatter, path: PathBuf) -> Self {
        let skill_dir = path.parent().map(PathBuf::from).unwrap_or_default();
        Self {
            name: frontmatter.name,
            description: frontmatter.description,
            path,
            skill_dir,
            allowed_tools: frontmatter.allowed_tools,
            compatibility: frontmatter.compatibility,
            license: frontmatter.license,
        }
    }
}
