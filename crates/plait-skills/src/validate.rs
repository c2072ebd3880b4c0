//! Validation of skill metadata against the naming contract.

use regex::Regex;

use crate::errors::{Result, SkillError};
use crate::model::SkillFrontmatter;

const NAME_PATTERN: &str = r"^[a-z0-9]+(-[a-z0-9]+)*$";
const MAX_NAME_LENGTH: usize = 64;

/// Validate parsed frontmatter.
///
/// Names are lowercase alphanumeric with single hyphens, so they can
/// double as directory names and tool arguments; descriptions must be
/// non-empty or the skill would be undiscoverable by the agent.
pub fn validate_frontmatter(frontmatter: &SkillFrontmatter) -> Result<()> {
    let name = frontmatter.name.trim();
    if name.is_empty() {
        return Err(SkillError::validation(
            &frontmatter.name,
            "name must not be empty",
        ));
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(SkillError::validation(
            name,
            format!("name exceeds {MAX_NAME_LENGTH} characters"),
        ));
    }

    let pattern = Regex::new(NAME_PATTERN).expect("name pattern is valid");
    if !pattern.is_match(name) {
        return Err(SkillError::validation(
            name,
            "name must be lowercase alphanumeric with hyphen separators",
        ));
    }

    if frontmatter.description.trim().is_empty() {
        return Err(SkillError::validation(
            name,
            "description must not be empty",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frontmatter(name: &str, description: &str) -> SkillFrontmatter {
        SkillFrontmatter {
            name: name.to_string(),
            description: description.to_string(),
            allowed_tools: None,
            compatibility: None,
            license: None,
        }
    }

    #[test]
    fn test_valid_names() {
        for name in ["web-research", "pdf", "data-2-report"] {
            assert!(validate_frontmatter(&frontmatter(name, "desc")).is_ok());
        }
    }

    #[test]
    fn test_invalid_names() {
        for name in ["", "Web-Research", "web_research", "-leading", "trailing-", "a--b"] {
            assert!(
                validate_frontmatter(&frontmatter(name, "desc")).is_err(),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_empty_description_rejected() {
        assert!(validate_frontmatter(&frontmatter("ok-name", "  ")).is_err());
    }

    #[test]
    fn test_overlong_name_rejected() {
        let name = "a".repeat(65);
        assert!(validate_frontmatter(&frontmatter(&name, "desc")).is_err());
    }
}
