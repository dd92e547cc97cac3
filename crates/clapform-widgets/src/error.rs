//! Error types.
//!
//! Building a form never fails. The fallible surfaces of this crate are
//! loading a [`FormStyle`](crate::FormStyle) from user-supplied YAML and
//! importing a clap command with overrides that do not match it.

/// Errors raised while loading or validating a form style.
#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    /// The YAML document could not be parsed.
    #[error("Invalid style document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A colour value could not be understood.
    #[error("Invalid color '{value}': {reason}")]
    Color { value: String, reason: String },
}

impl StyleError {
    /// Create a colour error.
    pub fn color(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Color {
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while importing a clap command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportError {
    /// An override names an argument the command does not declare.
    #[error("No argument '{id}' in command '{command}'")]
    UnknownArgument { id: String, command: String },
}
