//! Importing clap commands.
//!
//! [`ClapImporter`] reads a built [`clap::Command`] and produces the
//! [`CommandSpec`] tree the form is generated from. Arguments keep their
//! declaration order; hidden arguments and subcommands, help and version
//! flags, the auto-generated `help` subcommand and any explicitly skipped
//! ids are left out.
//!
//! clap's introspection covers actions, arity, defaults, possible values,
//! value hints and the value parser's output type. What it cannot express
//! (integer ranges, custom delegates, password fields, display names) is
//! supplied through overrides keyed by argument id:
//!
//! ```rust
//! use clap::{Arg, Command};
//! use clapform_widgets::{ClapImporter, ParamType};
//!
//! let cmd = Command::new("zoom")
//!     .arg(Arg::new("level").long("level").value_parser(clap::value_parser!(i64)));
//!
//! let spec = ClapImporter::new()
//!     .override_type("level", ParamType::IntRange { min: 1, max: 10 })
//!     .import(&cmd)
//!     .unwrap();
//! assert_eq!(spec.params[0].ty, ParamType::IntRange { min: 1, max: 10 });
//! ```

use std::any::TypeId;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use clap::{Arg, ArgAction, Command, ValueHint};

use crate::error::ImportError;
use crate::spec::{Arity, CommandSpec, DefaultValue, ParamType, ParameterSpec};

/// Converts clap commands into [`CommandSpec`] trees.
#[derive(Debug, Clone, Default)]
pub struct ClapImporter {
    skip: BTreeSet<String>,
    types: BTreeMap<String, ParamType>,
    display_names: BTreeMap<String, String>,
    hidden_input: BTreeSet<String>,
    background: BTreeMap<String, bool>,
}

impl ClapImporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Leaves argument `id` out of the form.
    pub fn skip(mut self, id: impl Into<String>) -> Self {
        self.skip.insert(id.into());
        self
    }

    /// Replaces the inferred type of argument `id`.
    pub fn override_type(mut self, id: impl Into<String>, ty: ParamType) -> Self {
        self.types.insert(id.into(), ty);
        self
    }

    /// Sets the label shown for argument `id`.
    pub fn display_name(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.display_names.insert(id.into(), name.into());
        self
    }

    /// Masks the text field of argument `id`.
    pub fn hide_input(mut self, id: impl Into<String>) -> Self {
        self.hidden_input.insert(id.into());
        self
    }

    /// Sets the execution override of the command named `command`.
    pub fn background(mut self, command: impl Into<String>, background: bool) -> Self {
        self.background.insert(command.into(), background);
        self
    }

    /// Imports `cmd` and its visible subcommands.
    ///
    /// Fails when an override names an argument that appears nowhere in
    /// the tree.
    pub fn import(&self, cmd: &Command) -> Result<CommandSpec, ImportError> {
        let mut cmd = cmd.clone();
        cmd.build();

        let mut seen = BTreeSet::new();
        let spec = self.command(&cmd, &BTreeSet::new(), &mut seen);

        let overridden = self
            .types
            .keys()
            .chain(self.display_names.keys())
            .chain(self.hidden_input.iter());
        for id in overridden {
            if !seen.contains(id.as_str()) {
                return Err(ImportError::UnknownArgument {
                    id: id.clone(),
                    command: spec.name.clone(),
                });
            }
        }

        tracing::debug!(
            command = %spec.name,
            params = spec.params.len(),
            subcommands = spec.subcommands.len(),
            "imported clap command"
        );
        Ok(spec)
    }

    /// `inherited` holds the global ids an ancestor already shows.
    fn command(
        &self,
        cmd: &Command,
        inherited: &BTreeSet<String>,
        seen: &mut BTreeSet<String>,
    ) -> CommandSpec {
        let mut spec = CommandSpec::new(cmd.get_name());
        spec.help = cmd
            .get_about()
            .or_else(|| cmd.get_long_about())
            .map(|s| s.to_string());
        spec.background = self.background.get(cmd.get_name()).copied();

        let mut globals = inherited.clone();
        for arg in cmd.get_arguments() {
            let id = arg.get_id().as_str();
            if arg.is_global_set() {
                // Propagated copies of an ancestor's global are not shown again.
                if inherited.contains(id) {
                    continue;
                }
                globals.insert(id.to_string());
            }
            if let Some(param) = self.param(arg) {
                seen.insert(param.name.clone());
                spec.params.push(param);
            }
        }

        spec.subcommands = cmd
            .get_subcommands()
            .filter(|sub| !sub.is_hide_set() && sub.get_name() != "help")
            .map(|sub| self.command(sub, &globals, seen))
            .collect();
        spec
    }

    fn param(&self, arg: &Arg) -> Option<ParameterSpec> {
        let id = arg.get_id().as_str();
        let action = arg.get_action();
        if arg.is_hide_set()
            || self.skip.contains(id)
            || matches!(
                action,
                ArgAction::Help | ArgAction::HelpShort | ArgAction::HelpLong | ArgAction::Version
            )
        {
            return None;
        }

        let mut param = if arg.is_positional() {
            ParameterSpec::positional(id)
        } else {
            ParameterSpec::option(id, flag_tokens(arg))
        };
        param.help = arg
            .get_help()
            .or_else(|| arg.get_long_help())
            .map(|s| s.to_string());
        param.display_name = self.display_names.get(id).cloned();
        param.hide_input = self.hidden_input.contains(id);

        match action {
            ArgAction::SetTrue | ArgAction::SetFalse => {
                param.is_flag = true;
                if flag_checked(arg, matches!(action, ArgAction::SetFalse)) {
                    param.default = DefaultValue::from("true");
                }
                return Some(param);
            }
            ArgAction::Count => {
                param.is_counted = true;
                param.ty = ParamType::Int;
                return Some(param);
            }
            _ => {}
        }

        let (min, max) = arg
            .get_num_args()
            .map(|range| (range.min_values(), range.max_values()))
            .unwrap_or((1, 1));
        param.arity = if min == max && max > 1 {
            Arity::Fixed(max)
        } else if max > 1 {
            Arity::Unbounded
        } else {
            Arity::One
        };

        if matches!(action, ArgAction::Append) {
            if param.flag_token().is_some() {
                param.multiple = true;
            } else {
                param.arity = Arity::Unbounded;
            }
        }

        let element = self
            .types
            .get(id)
            .cloned()
            .unwrap_or_else(|| infer_type(arg));
        param.ty = match (param.arity, element) {
            (_, ty @ ParamType::Tuple { .. }) => ty,
            (Arity::Fixed(n), ty) => ParamType::Tuple {
                element_types: vec![ty; n],
            },
            (_, ty) => ty,
        };

        let defaults: Vec<String> = arg
            .get_default_values()
            .iter()
            .map(|v| v.to_string_lossy().into_owned())
            .collect();
        param.default = match defaults.len() {
            0 => DefaultValue::Absent,
            1 if param.arity == Arity::One && !param.multiple => {
                DefaultValue::Scalar(defaults.into_iter().next().unwrap_or_default())
            }
            _ => DefaultValue::Sequence(defaults),
        };

        Some(param)
    }
}

/// Whether a flag's checkbox starts checked.
///
/// The box stands for "token present". A `SetTrue` flag is checked when its
/// declared default is true; a `SetFalse` flag when its default is false.
/// clap's implicit defaults (`false` and `true` respectively) leave both
/// unchecked.
fn flag_checked(arg: &Arg, inverted: bool) -> bool {
    let declared = arg.get_default_values().first().map(|v| {
        matches!(
            v.to_string_lossy().trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "yes" | "on"
        )
    });
    match declared {
        Some(on) => on != inverted,
        None => false,
    }
}

fn flag_tokens(arg: &Arg) -> Vec<String> {
    let mut opts = Vec::new();
    if let Some(long) = arg.get_long() {
        opts.push(format!("--{long}"));
    }
    if let Some(short) = arg.get_short() {
        opts.push(format!("-{short}"));
    }
    opts
}

fn parses_to<T: 'static>(arg: &Arg) -> bool {
    arg.get_value_parser().type_id() == TypeId::of::<T>()
}

fn infer_type(arg: &Arg) -> ParamType {
    let options: Vec<String> = arg
        .get_possible_values()
        .iter()
        .filter(|v| !v.is_hide_set())
        .map(|v| v.get_name().to_string())
        .collect();
    if !options.is_empty() {
        return ParamType::Choice { options };
    }

    match arg.get_value_hint() {
        ValueHint::FilePath | ValueHint::ExecutablePath => {
            return ParamType::Path {
                exists: false,
                file_okay: true,
                dir_okay: false,
            }
        }
        ValueHint::DirPath => {
            return ParamType::Path {
                exists: false,
                file_okay: false,
                dir_okay: true,
            }
        }
        ValueHint::AnyPath => return ParamType::any_path(),
        _ => {}
    }
    if parses_to::<PathBuf>(arg) {
        return ParamType::any_path();
    }

    let integer = parses_to::<i8>(arg)
        || parses_to::<i16>(arg)
        || parses_to::<i32>(arg)
        || parses_to::<i64>(arg)
        || parses_to::<isize>(arg)
        || parses_to::<u8>(arg)
        || parses_to::<u16>(arg)
        || parses_to::<u32>(arg)
        || parses_to::<u64>(arg)
        || parses_to::<usize>(arg);
    if integer {
        return ParamType::Int;
    }
    if parses_to::<f32>(arg) || parses_to::<f64>(arg) {
        return ParamType::Float;
    }
    ParamType::String
}

#[cfg(test)]
mod tests {
    use super::*;

    fn greet() -> Command {
        Command::new("greet")
            .about("Say hello")
            .arg(
                Arg::new("name")
                    .long("name")
                    .short('n')
                    .default_value("world")
                    .help("Who to greet"),
            )
            .arg(Arg::new("loud").long("loud").action(ArgAction::SetTrue))
            .arg(Arg::new("verbose").short('v').action(ArgAction::Count))
            .arg(Arg::new("secret").long("secret").hide(true))
    }

    #[test]
    fn imports_options_flags_and_counts_in_order() {
        let spec = ClapImporter::new().import(&greet()).unwrap();
        assert_eq!(spec.name, "greet");
        assert_eq!(spec.help.as_deref(), Some("Say hello"));

        let names: Vec<&str> = spec.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["name", "loud", "verbose"]);

        let name = &spec.params[0];
        assert_eq!(name.opts, ["--name", "-n"]);
        assert_eq!(name.default, DefaultValue::from("world"));
        assert_eq!(name.help.as_deref(), Some("Who to greet"));
        assert_eq!(name.ty, ParamType::String);

        assert!(spec.params[1].is_flag);
        assert_eq!(spec.params[1].default, DefaultValue::Absent);
        assert!(spec.params[2].is_counted);
        assert_eq!(spec.params[2].opts, ["-v"]);
    }

    #[test]
    fn infers_types_from_parsers_and_hints() {
        let cmd = Command::new("t")
            .arg(Arg::new("n").long("n").value_parser(clap::value_parser!(u16)))
            .arg(Arg::new("x").long("x").value_parser(clap::value_parser!(f64)))
            .arg(Arg::new("p").long("p").value_parser(clap::value_parser!(PathBuf)))
            .arg(Arg::new("d").long("d").value_hint(ValueHint::DirPath))
            .arg(Arg::new("m").long("m").value_parser(["fast", "slow"]));
        let spec = ClapImporter::new().import(&cmd).unwrap();
        let types: Vec<String> = spec.params.iter().map(|p| p.ty.name()).collect();
        assert_eq!(types, ["integer", "float", "path", "directory", "choice"]);
    }

    #[test]
    fn maps_arity_and_repetition() {
        let cmd = Command::new("t")
            .arg(
                Arg::new("pair")
                    .long("pair")
                    .num_args(2)
                    .value_parser(clap::value_parser!(i64)),
            )
            .arg(Arg::new("tag").long("tag").action(ArgAction::Append))
            .arg(Arg::new("files").num_args(1..));
        let spec = ClapImporter::new().import(&cmd).unwrap();

        let pair = spec.find_param("pair").unwrap();
        assert_eq!(pair.arity, Arity::Fixed(2));
        assert_eq!(
            pair.ty,
            ParamType::Tuple {
                element_types: vec![ParamType::Int, ParamType::Int]
            }
        );

        let tag = spec.find_param("tag").unwrap();
        assert!(tag.multiple);
        assert_eq!(tag.arity, Arity::One);

        let files = spec.find_param("files").unwrap();
        assert_eq!(files.arity, Arity::Unbounded);
        assert!(!files.multiple);
        assert_eq!(files.flag_token(), None);
    }

    #[test]
    fn skips_help_subcommand_and_hidden_entries() {
        let cmd = Command::new("tool")
            .arg(Arg::new("gui").long("gui").action(ArgAction::SetTrue))
            .arg(
                Arg::new("quiet")
                    .long("quiet")
                    .global(true)
                    .action(ArgAction::SetTrue),
            )
            .subcommand(Command::new("build").about("Compile"))
            .subcommand(Command::new("internal").hide(true));
        let spec = ClapImporter::new()
            .skip("gui")
            .background("build", true)
            .import(&cmd)
            .unwrap();

        assert_eq!(spec.params.len(), 1);
        assert_eq!(spec.params[0].name, "quiet");
        assert_eq!(spec.subcommands.len(), 1);
        let build = &spec.subcommands[0];
        assert_eq!(build.name, "build");
        assert_eq!(build.help.as_deref(), Some("Compile"));
        assert_eq!(build.background, Some(true));
        assert!(build.params.is_empty(), "globals stay at the declaring level");
    }

    #[test]
    fn nested_global_shows_at_declaring_subcommand() {
        let cmd = Command::new("tool").subcommand(
            Command::new("remote")
                .arg(
                    Arg::new("verbose")
                        .long("verbose")
                        .global(true)
                        .action(ArgAction::SetTrue),
                )
                .subcommand(Command::new("add").arg(Arg::new("url"))),
        );
        let spec = ClapImporter::new().import(&cmd).unwrap();

        assert!(spec.params.is_empty());
        let remote = spec.find_subcommand("remote").unwrap();
        let names: Vec<&str> = remote.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["verbose"]);
        let add = remote.find_subcommand("add").unwrap();
        let names: Vec<&str> = add.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["url"]);
    }

    #[test]
    fn flags_take_declared_defaults() {
        let cmd = Command::new("t")
            .arg(Arg::new("plain").long("plain").action(ArgAction::SetTrue))
            .arg(
                Arg::new("on")
                    .long("on")
                    .action(ArgAction::SetTrue)
                    .default_value("true"),
            )
            .arg(Arg::new("no-color").long("no-color").action(ArgAction::SetFalse))
            .arg(
                Arg::new("no-cache")
                    .long("no-cache")
                    .action(ArgAction::SetFalse)
                    .default_value("false"),
            );
        let spec = ClapImporter::new().import(&cmd).unwrap();
        let checked: Vec<bool> = spec.params.iter().map(|p| p.default.is_truthy()).collect();
        assert_eq!(checked, [false, true, false, true]);
        assert_eq!(spec.params[0].default, DefaultValue::Absent);
    }

    #[test]
    fn overrides_apply_by_id() {
        let cmd = Command::new("login")
            .arg(Arg::new("password").long("password"))
            .arg(Arg::new("level").long("level"));
        let spec = ClapImporter::new()
            .hide_input("password")
            .display_name("password", "Password")
            .override_type("level", ParamType::IntRange { min: 0, max: 3 })
            .import(&cmd)
            .unwrap();
        assert!(spec.params[0].hide_input);
        assert_eq!(spec.params[0].label(), "Password");
        assert_eq!(spec.params[1].ty, ParamType::IntRange { min: 0, max: 3 });
    }

    #[test]
    fn unknown_override_is_an_error() {
        let err = ClapImporter::new()
            .override_type("nope", ParamType::Int)
            .import(&greet())
            .unwrap_err();
        assert_eq!(
            err,
            ImportError::UnknownArgument {
                id: "nope".into(),
                command: "greet".into()
            }
        );
    }
}
