//! Spawning external programs.
//!
//! [`pipe_input`] feeds text to a shell command (used by the clipboard);
//! [`stream`] runs a program and forwards its stdout and stderr to an
//! [`OutputSink`] line by line as they are produced.

use std::io::{BufRead, BufReader, Read, Write};
use std::process::{Command, ExitStatus, Stdio};
use std::time::Duration;

use wait_timeout::ChildExt;

use crate::error::ShellError;
use crate::sink::OutputSink;

fn shell(command_str: &str) -> Command {
    if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(command_str);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(command_str);
        c
    }
}

/// Runs `command_str` through the platform shell with `input` on stdin.
///
/// The process is killed if it outlives `timeout`. Returns its stdout.
pub fn pipe_input(command_str: &str, input: &str, timeout: Duration) -> Result<String, ShellError> {
    let mut child = shell(command_str)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(input.as_bytes())?;
    }

    match child.wait_timeout(timeout)? {
        Some(status) if !status.success() => {
            return Err(ShellError::CommandFailed(command_str.to_string(), status));
        }
        Some(_) => {}
        None => {
            child.kill()?;
            return Err(ShellError::Timeout(command_str.to_string(), timeout));
        }
    }

    let mut output = String::new();
    if let Some(mut stdout) = child.stdout.take() {
        stdout.read_to_string(&mut output)?;
    }
    Ok(output)
}

/// Runs `program` with `args`, forwarding output lines to `sink`.
///
/// stderr is forwarded from a helper thread so neither pipe can fill up and
/// stall the child. Returns the exit status once both streams are drained.
pub fn stream(
    program: &str,
    args: &[String],
    sink: &dyn OutputSink,
) -> Result<ExitStatus, ShellError> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    std::thread::scope(|s| {
        if let Some(stderr) = stderr {
            s.spawn(move || forward(stderr, sink));
        }
        if let Some(stdout) = stdout {
            forward(stdout, sink);
        }
    });

    Ok(child.wait()?)
}

fn forward(stream: impl Read, sink: &dyn OutputSink) {
    let mut reader = BufReader::new(stream);
    let mut line = Vec::new();
    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line) {
            Ok(0) => break,
            Ok(_) => sink.write(&String::from_utf8_lossy(&line)),
            Err(err) => {
                tracing::debug!(%err, "output stream closed");
                break;
            }
        }
    }
}
