//! Execution layer for forms generated from clap commands.
//!
//! `clapform-dispatch` takes a reconstructed argument vector and runs it,
//! keeping the UI thread out of the way of the command:
//!
//! - [`Runner`]: executes one invocation; [`ClapRunner`] re-parses with
//!   clap and calls a handler in process, [`ProcessRunner`] spawns a
//!   program.
//! - [`Executor`]: launches runs inline or on worker threads and reports
//!   progress as [`UiEvent`]s over an `mpsc` channel.
//! - [`OutputSink`]: append-only output destinations ([`BufferSink`],
//!   [`ChannelSink`], [`TermSink`]).
//! - [`Clipboard`]: target of the copy action ([`SystemClipboard`],
//!   [`MockClipboard`]).
//!
//! # Errors
//!
//! Runs end in one of three ways, mirrored by [`RunOutcome`]: success, a
//! parameter-level rejection ([`ExecError::BadParameter`], raised by clap
//! usage errors or a handler returning [`BadParameter`]), or a failure
//! (any other error, or a panic inside the runner). Neither rejections nor
//! failures take the form down; they come back as [`Notice`]s.

mod clipboard;
mod error;
mod executor;
mod runner;
mod shell;
mod sink;

pub use clipboard::{Clipboard, MockClipboard, SystemClipboard};
pub use error::{BadParameter, ClipboardError, ExecError, ShellError};
pub use executor::{
    ExecMode, Executor, Notice, NoticeLevel, OutputTarget, RunId, RunOutcome, RunReport, UiEvent,
};
pub use runner::{ClapRunner, ProcessRunner, Runner};
pub use shell::{pipe_input, stream};
pub use sink::{BufferSink, ChannelSink, OutputSink, TermSink};
