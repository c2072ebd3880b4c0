//! Skill discovery and progressive disclosure
//!
//! A skill is a directory holding a SKILL.md document — YAML frontmatter
//! with identifying metadata, followed by markdown instructions — plus any
//! resource files the instructions reference. Skills are disclosed to an
//! agent progressively:
//!
//! 1. **Metadata** ([`load_metadata`], [`discover_skills`]): name,
//!    description, and location, cheap enough to put in every system
//!    prompt ([`generate_skills_prompt`]).
//! 2. **Instructions** ([`load_instructions`], [`SkillSet::activate`]):
//!    the full workflow, loaded only when the agent activates the skill.
//! 3. **Resources** ([`load_resource`]): scripts and references under the
//!    skill directory, read on demand.
//!
//! The stream machinery in `plait-stream` has no dependency on these
//! types; it only ever sees the skill *name*, as the source attribution of
//! relayed sub-agent events.

pub mod discovery;
pub mod dispatch;
pub mod errors;
pub mod model;
pub mod parser;
pub mod prompt;
pub mod validate;

pub use discovery::discover_skills;
pub use dispatch::{SkillAction, SkillSet};
pub use errors::{Result, SkillError};
pub use model::{SkillFrontmatter, SkillProperties};
pub use parser::{find_skill_md, load_instructions, load_metadata, load_resource};
pub use prompt::generate_skills_prompt;
pub use validate::validate_frontmatter;
