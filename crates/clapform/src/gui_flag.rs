//! The `--gui` flag.
//!
//! Applications opt into a form by adding a `--gui` flag to their command
//! and checking it after parsing:
//!
//! ```rust
//! use clap::{Arg, Command};
//! use clapform::{gui_requested, with_gui_flag};
//!
//! let cmd = with_gui_flag(Command::new("greet").arg(Arg::new("name").long("name")));
//! let matches = cmd.try_get_matches_from(["greet", "--gui"]).unwrap();
//! assert!(gui_requested(&matches));
//! ```
//!
//! The importer used by [`Form::for_clap`](crate::Form::for_clap) skips the
//! flag, so it never shows up in the form itself.

use clap::{Arg, ArgAction, ArgMatches, Command};

/// Argument id of the flag.
pub const GUI_FLAG: &str = "gui";

/// Adds `--gui` to `cmd`.
pub fn with_gui_flag(cmd: Command) -> Command {
    cmd.arg(
        Arg::new(GUI_FLAG)
            .long(GUI_FLAG)
            .help("run with gui")
            .action(ArgAction::SetTrue),
    )
}

/// Whether `--gui` was given.
pub fn gui_requested(matches: &ArgMatches) -> bool {
    matches
        .try_get_one::<bool>(GUI_FLAG)
        .ok()
        .flatten()
        .copied()
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_is_off_by_default() {
        let matches = with_gui_flag(Command::new("t"))
            .try_get_matches_from(["t"])
            .unwrap();
        assert!(!gui_requested(&matches));
    }

    #[test]
    fn missing_flag_reads_as_off() {
        let matches = Command::new("t").try_get_matches_from(["t"]).unwrap();
        assert!(!gui_requested(&matches));
    }

    #[test]
    fn flag_has_help_text() {
        let cmd = with_gui_flag(Command::new("t"));
        let arg = cmd.get_arguments().find(|a| a.get_id() == GUI_FLAG).unwrap();
        assert_eq!(arg.get_help().unwrap().to_string(), "run with gui");
    }
}
