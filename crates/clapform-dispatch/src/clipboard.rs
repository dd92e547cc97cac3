//! Clipboard access for the copy action.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::error::ClipboardError;
use crate::shell::pipe_input;

/// Somewhere the copy action can put a command line.
pub trait Clipboard: Send + Sync {
    fn copy(&self, text: &str) -> Result<(), ClipboardError>;
}

/// The platform clipboard, reached through its command-line tool.
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    command: Option<String>,
    timeout: Duration,
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self {
            command: platform_command().map(str::to_string),
            timeout: Duration::from_secs(5),
        }
    }
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `command` instead of the platform default.
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Clipboard for SystemClipboard {
    fn copy(&self, text: &str) -> Result<(), ClipboardError> {
        let command = self.command.as_deref().ok_or(ClipboardError::Unsupported)?;
        pipe_input(command, text, self.timeout)?;
        Ok(())
    }
}

#[cfg(target_os = "macos")]
fn platform_command() -> Option<&'static str> {
    Some("pbcopy")
}

#[cfg(target_os = "linux")]
fn platform_command() -> Option<&'static str> {
    Some("xclip -selection clipboard")
}

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
fn platform_command() -> Option<&'static str> {
    None
}

/// In-memory clipboard for tests and headless sessions.
#[derive(Debug, Default)]
pub struct MockClipboard {
    copies: Mutex<Vec<String>>,
}

impl MockClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently copied text.
    pub fn last(&self) -> Option<String> {
        self.copies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// Every copy, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.copies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Clipboard for MockClipboard {
    fn copy(&self, text: &str) -> Result<(), ClipboardError> {
        self.copies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text.to_string());
        Ok(())
    }
}
