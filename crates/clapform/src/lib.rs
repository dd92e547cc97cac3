//! Forms for command-line programs.
//!
//! `clapform` turns a [`clap::Command`] into a form: one labelled control
//! per argument, a tab per subcommand, and Run/Copy buttons that rebuild
//! the argument vector from the controls and either execute it or put the
//! equivalent shell command line on the clipboard.
//!
//! # Quick Start
//!
//! ```rust
//! use clap::{Arg, ArgAction, Command};
//! use clapform::{gui_requested, with_gui_flag, Form};
//!
//! let cmd = with_gui_flag(
//!     Command::new("greet")
//!         .arg(Arg::new("name").long("name").default_value("world"))
//!         .arg(Arg::new("loud").long("loud").action(ArgAction::SetTrue)),
//! );
//!
//! let matches = cmd.clone().try_get_matches_from(["greet", "--gui"]).unwrap();
//! if gui_requested(&matches) {
//!     let mut form = Form::for_clap(cmd)
//!         .handler(|m, out| {
//!             let name = m.get_one::<String>("name").unwrap();
//!             out.line(&format!("Hello, {name}!"));
//!             Ok(())
//!         })
//!         .build()
//!         .unwrap();
//!
//!     let root = form.tree().root();
//!     assert_eq!(form.command_line(root).unwrap(), "greet --name world");
//!     form.run(root).unwrap();
//!     assert_eq!(form.output(), "Hello, world!\n");
//! }
//! ```
//!
//! # Crates
//!
//! | Crate | Contents |
//! |-------|----------|
//! | [`widgets`] | command model, clap import, headless controls, layouts, argv assembly |
//! | [`dispatch`] | runners, background execution, output sinks, clipboard |
//!
//! Both are re-exported; the items most applications need are also
//! available at the top level.

mod error;
mod gui_flag;
pub mod logging;
mod options;
mod render;
mod session;

pub use clapform_dispatch as dispatch;
pub use clapform_widgets as widgets;

pub use error::FormError;
pub use gui_flag::{gui_requested, with_gui_flag, GUI_FLAG};
pub use options::{Execution, FormOptions, Output};
pub use render::render;
pub use session::{Form, FormBuilder, Pressed};

pub use clapform_dispatch::{
    BadParameter, ClapRunner, Clipboard, ExecMode, MockClipboard, Notice, NoticeLevel,
    OutputSink, ProcessRunner, RunId, RunOutcome, RunReport, Runner, SystemClipboard,
};
pub use clapform_widgets::{
    ButtonAction, ClapImporter, CommandSpec, FormStyle, FormTree, LayoutId, ParamType,
    ParameterSpec,
};
