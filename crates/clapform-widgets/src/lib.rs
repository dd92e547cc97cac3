//! Form model derived from command-line metadata.
//!
//! `clapform-widgets` turns a command description into a tree of headless
//! form controls and turns the live state of those controls back into an
//! argument vector the original parser accepts.
//!
//! # Quick Start
//!
//! ```
//! use clap::{Arg, ArgAction, Command};
//! use clapform_widgets::{ClapImporter, FormStyle, FormTree};
//!
//! let cmd = Command::new("greet")
//!     .arg(Arg::new("name").long("name").default_value("world"))
//!     .arg(Arg::new("loud").long("loud").action(ArgAction::SetTrue));
//!
//! let spec = ClapImporter::new().import(&cmd).unwrap();
//! let tree = FormTree::build(&spec, &FormStyle::light());
//! assert_eq!(tree.argv(tree.root()), ["greet", "--name", "world"]);
//! ```
//!
//! # Architecture
//!
//! ```text
//! CommandSpec ──► FormTree::build
//!                   └── per parameter: factory::build
//!                         ├── resolve(type) ──► ControlKind
//!                         ├── cardinality   ──► ListView / MultipleRows
//!                         └── ValueReader   ──► tokens at submission
//! FormTree::argv(leaf) ──► [root, .., leaf, ..] via argv::assemble
//! ```
//!
//! Controls live behind `Rc<RefCell<_>>` handles shared by the layout and
//! the readers, so everything here belongs to a single UI thread.

pub mod argv;
mod cardinality;
mod clap_spec;
pub mod control;
mod error;
mod factory;
pub mod layout;
mod resolve;
mod rows;
mod spec;
mod style;
mod validator;

pub use argv::{assemble, command_line, CommandLevel};
pub use cardinality::{MultipleRows, Occurrence};
pub use clap_spec::ClapImporter;
pub use control::{Handle, Widget};
pub use error::{ImportError, StyleError};
pub use factory::{build, Built, ValueReader};
pub use layout::{ButtonAction, CommandButton, CommandLayout, FormTree, LayoutId, LayoutItem};
pub use resolve::{resolve, resolve_slot, ControlKind, CustomWidget, WidgetDelegate};
pub use rows::{Row, RowAction, RowButton, RowGroup};
pub use spec::{Arity, CommandSpec, DefaultValue, Delegate, ParamKind, ParamType, ParameterSpec};
pub use style::{parse_color, FormStyle};
pub use validator::Validator;
