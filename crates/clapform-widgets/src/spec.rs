//! Declarative description of commands and their parameters.
//!
//! A [`CommandSpec`] tree is the only input the form engine needs. It is
//! normally produced by [`ClapImporter`](crate::ClapImporter), but can be
//! written by hand for parsers that are not clap.
//!
//! Specs are immutable once built: the form reads them to construct
//! controls and never writes back.

use std::fmt;
use std::sync::Arc;

use crate::resolve::WidgetDelegate;

/// The declared value type of a parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamType {
    /// Free text.
    String,
    /// Signed integer.
    Int,
    /// Decimal number.
    Float,
    /// Filesystem path, optionally restricted to existing files or directories.
    Path {
        exists: bool,
        file_okay: bool,
        dir_okay: bool,
    },
    /// One of a fixed set of values.
    Choice { options: Vec<String> },
    /// Integer within inclusive bounds.
    IntRange { min: i64, max: i64 },
    /// Fixed-size heterogeneous tuple, one type per slot.
    Tuple { element_types: Vec<ParamType> },
    /// A type unknown to the resolution table.
    ///
    /// When a delegate is present it builds the controls itself; without one
    /// the parameter falls back to a plain text field.
    Custom {
        name: String,
        delegate: Option<Delegate>,
    },
}

impl ParamType {
    /// Any path: files and directories, existing or not.
    pub fn any_path() -> Self {
        ParamType::Path {
            exists: false,
            file_okay: true,
            dir_okay: true,
        }
    }

    /// Choice over the given options.
    pub fn choice<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ParamType::Choice {
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    /// Custom type with a control-building delegate.
    pub fn custom(name: impl Into<String>, delegate: impl WidgetDelegate + 'static) -> Self {
        ParamType::Custom {
            name: name.into(),
            delegate: Some(Delegate(Arc::new(delegate))),
        }
    }

    /// The human-readable type name, used as placeholder text.
    pub fn name(&self) -> String {
        match self {
            ParamType::String => "text".to_string(),
            ParamType::Int => "integer".to_string(),
            ParamType::Float => "float".to_string(),
            ParamType::Path {
                file_okay,
                dir_okay,
                ..
            } => match (file_okay, dir_okay) {
                (true, false) => "file".to_string(),
                (false, true) => "directory".to_string(),
                _ => "path".to_string(),
            },
            ParamType::Choice { .. } => "choice".to_string(),
            ParamType::IntRange { .. } => "integer range".to_string(),
            ParamType::Tuple { element_types } => {
                let names: Vec<String> = element_types.iter().map(ParamType::name).collect();
                format!("<{}>", names.join(" "))
            }
            ParamType::Custom { name, .. } => name.clone(),
        }
    }
}

/// Shared handle to a [`WidgetDelegate`].
///
/// Compares by identity so that [`ParamType`] can stay `PartialEq`.
#[derive(Clone)]
pub struct Delegate(pub Arc<dyn WidgetDelegate>);

impl PartialEq for Delegate {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Delegate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Delegate(..)")
    }
}

/// Whether a parameter is addressed by a flag token or by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// `--name value` style; the first entry of `opts` is the flag token.
    Option,
    /// Positional argument; readers never emit a flag token.
    Positional,
}

/// Number of values a parameter takes per occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    One,
    /// Exactly `n` values, `n > 1`.
    Fixed(usize),
    Unbounded,
}

impl Arity {
    /// Converts the conventional integer encoding (`-1` for unbounded).
    pub fn from_nargs(nargs: i64) -> Self {
        match nargs {
            n if n < 0 => Arity::Unbounded,
            0 | 1 => Arity::One,
            n => Arity::Fixed(n as usize),
        }
    }
}

/// Declared default of a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DefaultValue {
    #[default]
    Absent,
    Scalar(String),
    Sequence(Vec<String>),
}

impl DefaultValue {
    /// The scalar default, if any.
    pub fn scalar(&self) -> Option<&str> {
        match self {
            DefaultValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Element `i` of a sequence default, or the scalar default for any `i`.
    pub fn item(&self, i: usize) -> Option<&str> {
        match self {
            DefaultValue::Absent => None,
            DefaultValue::Scalar(s) => Some(s),
            DefaultValue::Sequence(items) => items.get(i).map(String::as_str),
        }
    }

    /// Whether the default reads as "on" for a boolean flag.
    pub fn is_truthy(&self) -> bool {
        self.scalar()
            .map(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "on"))
            .unwrap_or(false)
    }
}

impl From<&str> for DefaultValue {
    fn from(value: &str) -> Self {
        DefaultValue::Scalar(value.to_string())
    }
}

impl From<String> for DefaultValue {
    fn from(value: String) -> Self {
        DefaultValue::Scalar(value)
    }
}

impl From<Vec<String>> for DefaultValue {
    fn from(values: Vec<String>) -> Self {
        DefaultValue::Sequence(values)
    }
}

/// One CLI parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSpec {
    pub name: String,
    pub kind: ParamKind,
    /// Primary flag tokens, e.g. `["--name", "-n"]`.
    pub opts: Vec<String>,
    /// Tokens emitted when a boolean flag is off, e.g. `["--no-color"]`.
    pub secondary_opts: Vec<String>,
    pub ty: ParamType,
    pub arity: Arity,
    /// May occur more than once, each occurrence a full value.
    pub multiple: bool,
    pub is_flag: bool,
    pub is_counted: bool,
    pub default: DefaultValue,
    pub help: Option<String>,
    pub display_name: Option<String>,
    /// Render text input as a password field.
    pub hide_input: bool,
}

impl ParameterSpec {
    fn base(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            opts: Vec::new(),
            secondary_opts: Vec::new(),
            ty: ParamType::String,
            arity: Arity::One,
            multiple: false,
            is_flag: false,
            is_counted: false,
            default: DefaultValue::Absent,
            help: None,
            display_name: None,
            hide_input: false,
        }
    }

    /// A value-taking option addressed by `opts`.
    pub fn option<I, S>(name: impl Into<String>, opts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut spec = Self::base(name, ParamKind::Option);
        spec.opts = opts.into_iter().map(Into::into).collect();
        spec
    }

    /// A boolean flag.
    pub fn flag<I, S>(name: impl Into<String>, opts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut spec = Self::option(name, opts);
        spec.is_flag = true;
        spec
    }

    /// A counted flag (`-vvv`).
    pub fn counted<I, S>(name: impl Into<String>, opts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut spec = Self::option(name, opts);
        spec.is_counted = true;
        spec.ty = ParamType::Int;
        spec
    }

    /// A positional argument.
    pub fn positional(name: impl Into<String>) -> Self {
        Self::base(name, ParamKind::Positional)
    }

    pub fn with_type(mut self, ty: ParamType) -> Self {
        self.ty = ty;
        self
    }

    pub fn with_arity(mut self, arity: Arity) -> Self {
        self.arity = arity;
        self
    }

    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    pub fn with_default(mut self, default: impl Into<DefaultValue>) -> Self {
        self.default = default.into();
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_secondary<I, S>(mut self, opts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.secondary_opts = opts.into_iter().map(Into::into).collect();
        self
    }

    pub fn hide_input(mut self) -> Self {
        self.hide_input = true;
        self
    }

    /// The token that introduces this parameter on a command line.
    ///
    /// `None` for positionals.
    pub fn flag_token(&self) -> Option<&str> {
        match self.kind {
            ParamKind::Option => self.opts.first().map(String::as_str),
            ParamKind::Positional => None,
        }
    }

    /// Text shown in the parameter's label.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    /// The value type of slot `slot` of a multi-value parameter.
    ///
    /// Tuples report their element type, falling back to text past the
    /// declared elements; every other type is its own slot type.
    pub fn slot_type(&self, slot: usize) -> ParamType {
        match &self.ty {
            ParamType::Tuple { element_types } => element_types
                .get(slot)
                .cloned()
                .unwrap_or(ParamType::String),
            other => other.clone(),
        }
    }

    /// Number of slots for a fixed-arity parameter.
    pub fn slot_count(&self) -> usize {
        match (self.arity, &self.ty) {
            (Arity::Fixed(n), _) => n,
            (_, ParamType::Tuple { element_types }) => element_types.len(),
            _ => 1,
        }
    }

    /// Tuple-shaped parameters: fixed arity above one or a tuple type.
    pub fn is_tuple(&self) -> bool {
        matches!(self.arity, Arity::Fixed(n) if n > 1)
            || matches!(&self.ty, ParamType::Tuple { element_types } if element_types.len() > 1)
    }
}

/// A command: either a leaf with parameters, a dispatcher with
/// subcommands, or both.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandSpec {
    pub name: String,
    pub help: Option<String>,
    pub params: Vec<ParameterSpec>,
    /// Subcommands in declaration order.
    pub subcommands: Vec<CommandSpec>,
    /// Overrides the session's execution mode for this command.
    pub background: Option<bool>,
}

impl CommandSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help: None,
            params: Vec::new(),
            subcommands: Vec::new(),
            background: None,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn param(mut self, param: ParameterSpec) -> Self {
        self.params.push(param);
        self
    }

    pub fn subcommand(mut self, sub: CommandSpec) -> Self {
        self.subcommands.push(sub);
        self
    }

    pub fn with_background(mut self, background: bool) -> Self {
        self.background = Some(background);
        self
    }

    pub fn is_dispatcher(&self) -> bool {
        !self.subcommands.is_empty()
    }

    /// Looks up a direct subcommand by name.
    pub fn find_subcommand(&self, name: &str) -> Option<&CommandSpec> {
        self.subcommands.iter().find(|s| s.name == name)
    }

    /// Looks up a parameter of this command by name.
    pub fn find_param(&self, name: &str) -> Option<&ParameterSpec> {
        self.params.iter().find(|p| p.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names() {
        assert_eq!(ParamType::String.name(), "text");
        assert_eq!(ParamType::Int.name(), "integer");
        assert_eq!(ParamType::any_path().name(), "path");
        assert_eq!(
            ParamType::Path {
                exists: true,
                file_okay: false,
                dir_okay: true
            }
            .name(),
            "directory"
        );
        assert_eq!(
            ParamType::Tuple {
                element_types: vec![ParamType::Int, ParamType::String]
            }
            .name(),
            "<integer text>"
        );
    }

    #[test]
    fn arity_from_nargs() {
        assert_eq!(Arity::from_nargs(-1), Arity::Unbounded);
        assert_eq!(Arity::from_nargs(0), Arity::One);
        assert_eq!(Arity::from_nargs(1), Arity::One);
        assert_eq!(Arity::from_nargs(3), Arity::Fixed(3));
    }

    #[test]
    fn default_items() {
        let seq = DefaultValue::Sequence(vec!["a".into(), "b".into()]);
        assert_eq!(seq.item(1), Some("b"));
        assert_eq!(seq.item(2), None);
        assert_eq!(seq.scalar(), None);

        let scalar = DefaultValue::from("x");
        assert_eq!(scalar.item(5), Some("x"));
        assert!(DefaultValue::from("True").is_truthy());
        assert!(!DefaultValue::from("false").is_truthy());
        assert!(!DefaultValue::Absent.is_truthy());
    }

    #[test]
    fn flag_token_only_for_options() {
        let opt = ParameterSpec::option("name", ["--name", "-n"]);
        assert_eq!(opt.flag_token(), Some("--name"));
        assert_eq!(ParameterSpec::positional("src").flag_token(), None);
    }

    #[test]
    fn slot_type_past_declared_elements_is_text() {
        let p = ParameterSpec::option("pair", ["--pair"]).with_type(ParamType::Tuple {
            element_types: vec![ParamType::Int],
        });
        assert_eq!(p.slot_type(0), ParamType::Int);
        assert_eq!(p.slot_type(4), ParamType::String);
    }

    #[test]
    fn label_prefers_display_name() {
        let p = ParameterSpec::option("out_dir", ["--out-dir"]).with_display_name("Output");
        assert_eq!(p.label(), "Output");
    }
}
