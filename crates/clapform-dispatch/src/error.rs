//! Error types for command execution.

use std::process::ExitStatus;
use std::time::Duration;

/// A parameter-level rejection raised by a handler.
///
/// Return it (through `anyhow`) from a handler to have the run reported as
/// a rejected invocation rather than a failure:
///
/// ```rust
/// use clapform_dispatch::BadParameter;
///
/// fn check(port: u16) -> anyhow::Result<()> {
///     if port < 1024 {
///         return Err(BadParameter::new("port must be 1024 or above").into());
///     }
///     Ok(())
/// }
/// assert!(check(80).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct BadParameter(pub String);

impl BadParameter {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// How a run went wrong.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    /// The command rejected its arguments.
    #[error("{0}")]
    BadParameter(String),

    /// Anything else.
    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

impl ExecError {
    pub fn bad_parameter(message: impl Into<String>) -> Self {
        Self::BadParameter(message.into())
    }

    /// Classifies a handler error: [`BadParameter`] and clap usage errors
    /// are rejections, everything else is a failure.
    pub fn from_handler(err: anyhow::Error) -> Self {
        let err = match err.downcast::<BadParameter>() {
            Ok(bad) => return Self::BadParameter(bad.0),
            Err(err) => err,
        };
        match err.downcast::<clap::Error>() {
            Ok(usage) => Self::BadParameter(usage.render().to_string().trim_end().to_string()),
            Err(err) => Self::Failed(err),
        }
    }
}

/// Errors from piping to or spawning external programs.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Command `{0}` timed out after {1:?}")]
    Timeout(String, Duration),
    #[error("Command `{0}` failed with status {1}")]
    CommandFailed(String, ExitStatus),
}

/// Errors from clipboard access.
#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("No clipboard command available on this platform")]
    Unsupported,
    #[error("Clipboard error: {0}")]
    Shell(#[from] ShellError),
}
