//! Runners: what happens when a form is submitted.
//!
//! A [`Runner`] receives the reconstructed argument vector and a sink for
//! its output. Two implementations cover the common cases:
//!
//! - [`ClapRunner`] re-parses the argv with the application's own
//!   [`clap::Command`] and hands the matches to a handler closure, in
//!   process.
//! - [`ProcessRunner`] executes an external program with the argv tail.
//!
//! Plain closures with the right signature are runners too.

use clap::error::ErrorKind;
use clap::{ArgMatches, Command};

use crate::error::{ExecError, ShellError};
use crate::shell;
use crate::sink::OutputSink;

/// Executes one reconstructed invocation.
pub trait Runner: Send + Sync {
    /// `argv[0]` is the root command name.
    fn run(&self, argv: &[String], out: &dyn OutputSink) -> Result<(), ExecError>;
}

impl<F> Runner for F
where
    F: Fn(&[String], &dyn OutputSink) -> Result<(), ExecError> + Send + Sync,
{
    fn run(&self, argv: &[String], out: &dyn OutputSink) -> Result<(), ExecError> {
        self(argv, out)
    }
}

/// Re-parses with clap and calls a handler in process.
///
/// Parsing is non-exiting: usage errors become
/// [`ExecError::BadParameter`], and `--help`/`--version` output is written
/// to the sink instead of terminating the process.
///
/// ```rust
/// use clap::{Arg, Command};
/// use clapform_dispatch::{BufferSink, ClapRunner, Runner};
///
/// let cmd = Command::new("greet").arg(Arg::new("name").long("name"));
/// let runner = ClapRunner::new(cmd, |matches, out| {
///     let name = matches.get_one::<String>("name").map(String::as_str).unwrap_or("world");
///     out.line(&format!("Hello, {name}!"));
///     Ok(())
/// });
///
/// let sink = BufferSink::new();
/// let argv = ["greet", "--name", "Ada"].map(String::from);
/// runner.run(&argv, &sink).unwrap();
/// assert_eq!(sink.contents(), "Hello, Ada!\n");
/// ```
pub struct ClapRunner<F> {
    command: Command,
    handler: F,
}

impl<F> ClapRunner<F>
where
    F: Fn(&ArgMatches, &dyn OutputSink) -> anyhow::Result<()> + Send + Sync,
{
    pub fn new(command: Command, handler: F) -> Self {
        Self { command, handler }
    }
}

impl<F> Runner for ClapRunner<F>
where
    F: Fn(&ArgMatches, &dyn OutputSink) -> anyhow::Result<()> + Send + Sync,
{
    fn run(&self, argv: &[String], out: &dyn OutputSink) -> Result<(), ExecError> {
        let matches = match self.command.clone().try_get_matches_from(argv) {
            Ok(matches) => matches,
            Err(err) => {
                return match err.kind() {
                    ErrorKind::DisplayHelp
                    | ErrorKind::DisplayVersion
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                        out.write(&err.render().to_string());
                        Ok(())
                    }
                    _ => Err(ExecError::BadParameter(
                        err.render().to_string().trim_end().to_string(),
                    )),
                };
            }
        };
        (self.handler)(&matches, out).map_err(ExecError::from_handler)
    }
}

/// Runs an external program.
///
/// The program receives `argv[1..]`; `argv[0]` names the command in the
/// form and is not passed on. Output lines stream into the sink. Exit
/// status 2, the conventional usage-error status, is reported as a
/// rejection; any other non-zero status is a failure.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    program: String,
}

impl ProcessRunner {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Runner for ProcessRunner {
    fn run(&self, argv: &[String], out: &dyn OutputSink) -> Result<(), ExecError> {
        let args = argv.get(1..).unwrap_or_default();
        let status = shell::stream(&self.program, args, out).map_err(anyhow::Error::from)?;
        match status.code() {
            Some(0) => Ok(()),
            Some(2) => Err(ExecError::bad_parameter(format!(
                "`{}` rejected its arguments",
                self.program
            ))),
            _ => Err(ExecError::Failed(
                ShellError::CommandFailed(self.program.clone(), status).into(),
            )),
        }
    }
}
