//! Errors raised while building or driving a form.

use clapform_dispatch::ClipboardError;
use clapform_widgets::{ImportError, LayoutId, StyleError};

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    #[error("Style error: {0}")]
    Style(#[from] StyleError),

    #[error("Invalid form options: {0}")]
    Options(#[from] serde_yaml::Error),

    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),

    #[error("No runner configured for form '{0}'")]
    NoRunner(String),

    #[error("No layout {0:?} in this form")]
    UnknownLayout(LayoutId),

    #[error("'{0}' has subcommands; pick one to run")]
    NotALeaf(String),
}
