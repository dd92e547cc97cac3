//! Output sinks.
//!
//! A run writes its output to an [`OutputSink`]: an append-only text sink
//! that may be called from whichever thread produced the output. Sinks are
//! never read from by the run itself.

use std::io::Write;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, PoisonError};

use crate::executor::{RunId, UiEvent};

/// Append-only destination for command output.
pub trait OutputSink: Send + Sync {
    /// Appends a chunk of text.
    fn write(&self, chunk: &str);

    /// Appends `line` followed by a newline.
    fn line(&self, line: &str) {
        self.write(&format!("{line}\n"));
    }
}

/// Collects output in memory.
///
/// Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct BufferSink {
    buffer: Arc<Mutex<String>>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far.
    pub fn contents(&self) -> String {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drains the buffer.
    pub fn take(&self) -> String {
        std::mem::take(&mut *self.buffer.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl OutputSink for BufferSink {
    fn write(&self, chunk: &str) {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_str(chunk);
    }
}

/// Posts output to the UI thread as [`UiEvent::Output`].
#[derive(Debug, Clone)]
pub struct ChannelSink {
    run: RunId,
    sender: Sender<UiEvent>,
}

impl ChannelSink {
    pub fn new(run: RunId, sender: Sender<UiEvent>) -> Self {
        Self { run, sender }
    }
}

impl OutputSink for ChannelSink {
    fn write(&self, chunk: &str) {
        if chunk.is_empty() {
            return;
        }
        // A closed channel means the form is gone; output has nowhere to go.
        let _ = self.sender.send(UiEvent::Output {
            run: self.run,
            text: chunk.to_string(),
        });
    }
}

/// Passes output straight through to the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TermSink;

impl OutputSink for TermSink {
    fn write(&self, chunk: &str) {
        let mut out = std::io::stdout().lock();
        let _ = out.write_all(chunk.as_bytes());
        let _ = out.flush();
    }
}
