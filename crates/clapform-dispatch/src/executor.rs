//! Inline and background execution.
//!
//! The [`Executor`] is owned by the UI thread. Each launch takes a
//! snapshot of the argument vector, gets a fresh [`RunId`], and either runs
//! to completion before returning (inline) or on its own worker thread
//! (background). Either way, results reach the UI only as [`UiEvent`]s on
//! the executor's channel:
//!
//! ```text
//! UI thread                         worker thread
//! ─────────                         ─────────────
//! launch(argv, Background) ──spawn──► runner.run(argv, ChannelSink)
//!   returns RunId                      │ UiEvent::Output { run, text } ──┐
//!                                      │ ...                             │
//!                                      └ UiEvent::Finished(RunReport) ───┤
//! poll(): drain receiver ◄───────────────────────────────────────────────┘
//! ```
//!
//! There is no cancellation: a run finishes or fails. Concurrent runs are
//! independent; nothing is shared but the channel.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use crate::error::ExecError;
use crate::runner::Runner;
use crate::sink::{ChannelSink, OutputSink, TermSink};

/// Identifies one launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunId(pub(crate) u64);

impl RunId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a run executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecMode {
    /// On the calling thread, blocking until done.
    #[default]
    Inline,
    /// On a dedicated worker thread.
    Background,
}

impl ExecMode {
    pub fn from_background(background: bool) -> Self {
        if background {
            ExecMode::Background
        } else {
            ExecMode::Inline
        }
    }
}

/// Where run output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputTarget {
    /// Captured and posted to the UI as [`UiEvent::Output`].
    #[default]
    Capture,
    /// Written straight to the terminal.
    Terminal,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Succeeded,
    /// The command rejected its arguments.
    Rejected(String),
    /// Anything else went wrong, including a panic inside the runner.
    Failed(String),
}

/// Final word on a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub run: RunId,
    pub command_line: String,
    pub outcome: RunOutcome,
}

impl RunReport {
    pub fn succeeded(&self) -> bool {
        self.outcome == RunOutcome::Succeeded
    }

    /// The message box to show for this run, if any.
    pub fn notice(&self) -> Option<Notice> {
        match &self.outcome {
            RunOutcome::Succeeded => None,
            RunOutcome::Rejected(msg) | RunOutcome::Failed(msg) => {
                Some(Notice::warning(msg.clone()))
            }
        }
    }
}

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
}

/// A message for the user, shown in a dialog by the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }
}

/// Messages posted to the UI thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Output { run: RunId, text: String },
    Finished(RunReport),
}

/// Launches runs and reports back over a channel.
pub struct Executor {
    runner: Arc<dyn Runner>,
    sender: Sender<UiEvent>,
    output: OutputTarget,
    next_id: AtomicU64,
}

impl Executor {
    /// Creates an executor and the receiver its events arrive on.
    pub fn new(runner: Arc<dyn Runner>) -> (Self, Receiver<UiEvent>) {
        let (sender, receiver) = mpsc::channel();
        let executor = Self {
            runner,
            sender,
            output: OutputTarget::Capture,
            next_id: AtomicU64::new(1),
        };
        (executor, receiver)
    }

    pub fn with_output(mut self, output: OutputTarget) -> Self {
        self.output = output;
        self
    }

    pub fn output(&self) -> OutputTarget {
        self.output
    }

    /// Whether `run` was handed out by this executor's `launch`.
    pub fn issued(&self, run: RunId) -> bool {
        run.0 >= 1 && run.0 < self.next_id.load(Ordering::Relaxed)
    }

    /// Starts a run of `argv`.
    ///
    /// Inline runs have posted their `Finished` event by the time this
    /// returns; background runs post it from their worker thread.
    pub fn launch(&self, argv: Vec<String>, mode: ExecMode) -> RunId {
        let run = RunId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let runner = Arc::clone(&self.runner);
        let sender = self.sender.clone();
        let output = self.output;

        match mode {
            ExecMode::Inline => execute(run, runner.as_ref(), &argv, output, &sender),
            ExecMode::Background => {
                tracing::debug!(%run, "spawning worker");
                let spawned = std::thread::Builder::new()
                    .name(format!("clapform-run-{}", run.0))
                    .spawn(move || execute(run, runner.as_ref(), &argv, output, &sender));
                if let Err(err) = spawned {
                    tracing::error!(%run, %err, "could not spawn worker");
                    let _ = self.sender.send(UiEvent::Finished(RunReport {
                        run,
                        command_line: String::new(),
                        outcome: RunOutcome::Failed(format!("could not start worker: {err}")),
                    }));
                }
            }
        }
        run
    }
}

impl fmt::Debug for Executor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Executor")
            .field("output", &self.output)
            .field("next_id", &self.next_id)
            .finish_non_exhaustive()
    }
}

fn execute(
    run: RunId,
    runner: &dyn Runner,
    argv: &[String],
    output: OutputTarget,
    sender: &Sender<UiEvent>,
) {
    let command_line = shell_words::join(argv);
    tracing::info!("Running: {command_line}");

    let channel = ChannelSink::new(run, sender.clone());
    let sink: &dyn OutputSink = match output {
        OutputTarget::Capture => &channel,
        OutputTarget::Terminal => &TermSink,
    };

    let result = panic::catch_unwind(AssertUnwindSafe(|| runner.run(argv, sink)));
    let outcome = match result {
        Ok(Ok(())) => {
            tracing::info!("Successfully executed: {command_line}");
            RunOutcome::Succeeded
        }
        Ok(Err(ExecError::BadParameter(msg))) => {
            tracing::warn!(command = %command_line, "{msg}");
            RunOutcome::Rejected(msg)
        }
        Ok(Err(ExecError::Failed(err))) => {
            tracing::error!(command = %command_line, "{err:#}");
            RunOutcome::Failed(format!("{err:#}"))
        }
        Err(payload) => {
            let msg = panic_message(payload.as_ref());
            tracing::error!(command = %command_line, "panicked: {msg}");
            RunOutcome::Failed(format!("panicked: {msg}"))
        }
    };

    let _ = sender.send(UiEvent::Finished(RunReport {
        run,
        command_line,
        outcome,
    }));
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
