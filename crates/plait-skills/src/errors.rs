//! Error types for skill loading and activation.

use thiserror::Error;

/// Result type alias for skill operations.
pub type Result<T> = std::result::Result<T, SkillError>;

/// Errors that can occur while loading or activating skills.
#[derive(Error, Debug)]
pub enum SkillError {
    /// A SKILL.md document could not be parsed
    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    /// A skill violates the metadata contract
    #[error("Invalid skill '{name}': {message}")]
    Validation { name: String, message: String },

    /// The requested skill is not in the set
    #[error("Skill '{name}' not found. Available skills: {available}")]
    NotFound { name: String, available: String },

    /// Activation failed after the skill was found
    #[error("Failed to activate skill '{name}': {message}")]
    Activation { name: String, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SkillError {
    /// Create a new parse error.
    pub fn parse(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new validation error.
    pub fn validation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a new activation error.
    pub fn activation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Activation {
            name: name.into(),
            message: message.into(),
        }
    }
}
