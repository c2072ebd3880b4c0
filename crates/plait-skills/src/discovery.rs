//! Skill directory scanning.

use std::fs;
use std::path::Path;

use crate::errors::Result;
use crate::model::SkillProperties;
use crate::parser::{find_skill_md, load_metadata};

/// Scan a root directory for skills.
///
/// Every immediate subdirectory holding a SKILL.md is a candidate; entries
/// that fail to parse or validate are logged and skipped so one broken
/// skill cannot hide the rest. Results are sorted by name.
pub fn discover_skills(root: &Path) -> Result<Vec<SkillProperties>> {
    let mut skills = Vec::new();

    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }

        let skill_dir = entry.path();
        let skill_md = match find_skill_md(&skill_dir) {
            Ok(path) => path,
            Err(_) => continue,
        };

        match load_metadata(&skill_md) {
            Ok(properties) => {
                log::debug!("discovered skill '{}' at {}", properties.name, skill_md.display());
                skills.push(properties);
            }
            Err(e) => {
                log::warn!("skipping skill at {}: {e}", skill_dir.display());
            }
        }
    }

    skills.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(skills)
}
