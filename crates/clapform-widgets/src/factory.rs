//! Control factory.
//!
//! [`build`] turns one [`ParameterSpec`] into the controls that edit it and
//! a [`ValueReader`] that reads those controls back into argument tokens.
//! Shapes are checked in a fixed priority:
//!
//! 1. a delegate on a custom type builds everything itself
//! 2. tuples and fixed arity above one ([`cardinality`](crate::cardinality))
//! 3. boolean flags (check box)
//! 4. counted flags (spin box)
//! 5. unbounded lists
//! 6. `multiple` options
//! 7. scalars, resolved through [`resolve`]
//!
//! Every parameter except a boolean flag gets a [`Label`] in front of its
//! controls; the check box carries its own caption.
//!
//! Building never fails and performs no I/O. Readers run at submission
//! time, on the UI thread.

use std::fmt;
use std::rc::Rc;

use crate::cardinality;
use crate::control::{
    handle, CheckBox, ComboBox, EchoMode, FileMode, Label, PathPicker, Slider, SpinBox,
    TextField, Widget,
};
use crate::resolve::{resolve, ControlKind};
use crate::spec::{Arity, ParamType, ParameterSpec};
use crate::style::FormStyle;
use crate::validator::Validator;

/// Reads live control state as argument tokens.
pub type ValueReader = Box<dyn Fn() -> Vec<String>>;

/// Controls for one parameter plus their reader.
pub struct Built {
    pub widgets: Vec<Widget>,
    pub reader: ValueReader,
}

impl Built {
    pub fn new(widgets: Vec<Widget>, reader: impl Fn() -> Vec<String> + 'static) -> Self {
        Self {
            widgets,
            reader: Box::new(reader),
        }
    }

    /// Runs the reader.
    pub fn read(&self) -> Vec<String> {
        (self.reader)()
    }
}

impl fmt::Debug for Built {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Built")
            .field("widgets", &self.widgets)
            .finish_non_exhaustive()
    }
}

/// Builds the controls and reader for `param`.
pub fn build(param: &ParameterSpec, style: &FormStyle) -> Built {
    let mut built = build_controls(param, style);
    if !param.is_flag {
        built.widgets.insert(0, Widget::Label(Label::for_param(param)));
    }
    built
}

fn build_controls(param: &ParameterSpec, style: &FormStyle) -> Built {
    if let ParamType::Custom {
        delegate: Some(delegate),
        ..
    } = &param.ty
    {
        tracing::debug!(param = %param.name, "building controls through delegate");
        return delegate.0.build(param, style);
    }
    if param.is_tuple() {
        return cardinality::tuple(param, style);
    }
    if param.is_flag {
        return bool_flag(param);
    }
    if param.is_counted {
        return counted(param);
    }
    if param.arity == Arity::Unbounded && !param.multiple {
        return cardinality::list(param, style);
    }
    if param.multiple {
        return cardinality::multiple(param, style);
    }
    let (widget, reader) = scalar(param);
    Built {
        widgets: vec![widget],
        reader,
    }
}

/// Flag token (if any) followed by `value`.
pub(crate) fn with_flag(flag: &Option<String>, value: String) -> Vec<String> {
    flag.iter().cloned().chain(std::iter::once(value)).collect()
}

fn bool_flag(param: &ParameterSpec) -> Built {
    let mut check = CheckBox::new(param.label(), param.default.is_truthy());
    check.tooltip = param.help.clone();
    let check = handle(check);

    let on: Vec<String> = param.opts.first().cloned().into_iter().collect();
    let off = param.secondary_opts.clone();
    let state = Rc::clone(&check);
    Built::new(vec![Widget::Check(check)], move || {
        if state.borrow().is_checked() {
            on.clone()
        } else {
            off.clone()
        }
    })
}

fn counted(param: &ParameterSpec) -> Built {
    let start = param
        .default
        .scalar()
        .and_then(|s| s.trim().parse::<u32>().ok())
        .unwrap_or(0);
    let spin = handle(SpinBox::new(start));

    let token = param.opts.first().cloned();
    let state = Rc::clone(&spin);
    Built::new(vec![Widget::Spin(spin)], move || match &token {
        Some(token) => vec![token.clone(); state.borrow().value() as usize],
        None => Vec::new(),
    })
}

/// A single-value control and its reader.
///
/// Text-like controls read as `[flag, text]` when non-empty and as nothing
/// when empty, leaving defaults and required-ness to the parser. Sliders
/// and combo boxes always hold a value and always emit it.
pub(crate) fn scalar(param: &ParameterSpec) -> (Widget, ValueReader) {
    let flag = param.flag_token().map(str::to_string);
    let default = param.default.scalar();

    match (resolve(&param.ty), &param.ty) {
        (ControlKind::Choice, ParamType::Choice { options }) => {
            let combo = handle(ComboBox::new(options.clone(), default));
            let state = Rc::clone(&combo);
            let reader: ValueReader = Box::new(move || match state.borrow().current_text() {
                Some(text) => with_flag(&flag, text.to_string()),
                None => Vec::new(),
            });
            (Widget::Choice(combo), reader)
        }
        (
            ControlKind::PathPicker,
            ParamType::Path {
                exists,
                file_okay,
                dir_okay,
            },
        ) => {
            let mut picker = PathPicker::new(
                param.ty.name(),
                FileMode::from_flags(*exists, *file_okay, *dir_okay),
            );
            if let Some(d) = default {
                picker.field_mut().set_text(d);
            }
            let picker = handle(picker);
            let state = Rc::clone(&picker);
            let reader: ValueReader = Box::new(move || {
                let picker = state.borrow();
                let text = picker.field().text();
                if text.is_empty() {
                    Vec::new()
                } else {
                    with_flag(&flag, text.to_string())
                }
            });
            (Widget::Path(picker), reader)
        }
        (ControlKind::RangeSlider, ParamType::IntRange { min, max }) => {
            let start = default.and_then(|d| d.trim().parse::<i64>().ok());
            let slider = handle(Slider::new(*min, *max, start));
            let state = Rc::clone(&slider);
            let reader: ValueReader =
                Box::new(move || with_flag(&flag, state.borrow().value().to_string()));
            (Widget::Slider(slider), reader)
        }
        _ => text_field(param, flag),
    }
}

fn text_field(param: &ParameterSpec, flag: Option<String>) -> (Widget, ValueReader) {
    let echo = if param.hide_input {
        EchoMode::Password
    } else {
        EchoMode::Normal
    };
    let mut field = TextField::new(param.ty.name(), Validator::for_type(&param.ty)).with_echo(echo);
    if let Some(d) = param.default.scalar() {
        if !field.set_text(d) {
            tracing::debug!(param = %param.name, default = d, "default rejected by input mask");
        }
    }
    let field = handle(field);
    let state = Rc::clone(&field);
    let reader: ValueReader = Box::new(move || {
        let field = state.borrow();
        if field.is_empty() {
            Vec::new()
        } else {
            with_flag(&flag, field.text().to_string())
        }
    });
    (Widget::Text(field), reader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::{CustomWidget, WidgetDelegate};
    use crate::spec::DefaultValue;
    use std::cell::Cell;

    fn style() -> FormStyle {
        FormStyle::light()
    }

    #[test]
    fn scalar_text_reads_flag_and_value() {
        let p = ParameterSpec::option("name", ["--name"]).with_default("bob");
        let built = build(&p, &style());
        assert_eq!(built.widgets.len(), 2);
        assert_eq!(built.widgets[0].as_label().unwrap().text, "name");
        assert_eq!(built.read(), ["--name", "bob"]);

        built.widgets[1].as_text().unwrap().borrow_mut().clear();
        assert!(built.read().is_empty());
    }

    #[test]
    fn empty_text_field_shows_type_placeholder() {
        let p = ParameterSpec::option("count", ["--count"]).with_type(ParamType::Int);
        let built = build(&p, &style());
        let field = built.widgets[1].as_text().unwrap().borrow();
        assert_eq!(field.placeholder(), "integer");
        assert_eq!(field.validator(), Validator::Integer);
    }

    #[test]
    fn hidden_input_uses_password_echo() {
        let p = ParameterSpec::option("password", ["--password"]).hide_input();
        let built = build(&p, &style());
        let field = built.widgets[1].as_text().unwrap().borrow();
        assert_eq!(field.echo(), EchoMode::Password);
    }

    #[test]
    fn positional_scalar_has_no_flag() {
        let p = ParameterSpec::positional("src").with_default("a.txt");
        assert_eq!(build(&p, &style()).read(), ["a.txt"]);
    }

    #[test]
    fn bool_flag_emits_primary_or_secondary() {
        let p = ParameterSpec::flag("color", ["--color"])
            .with_secondary(["--no-color"])
            .with_help("colourise output");
        let built = build(&p, &style());
        assert_eq!(built.widgets.len(), 1, "flags carry no separate label");
        let check = built.widgets[0].as_check().unwrap().clone();
        assert_eq!(check.borrow().tooltip.as_deref(), Some("colourise output"));
        assert_eq!(built.read(), ["--no-color"]);
        check.borrow_mut().toggle();
        assert_eq!(built.read(), ["--color"]);
    }

    #[test]
    fn bool_flag_default_and_empty_secondary() {
        let p = ParameterSpec::flag("fast", ["--fast"]).with_default("true");
        let built = build(&p, &style());
        assert_eq!(built.read(), ["--fast"]);
        built.widgets[0].as_check().unwrap().borrow_mut().set_checked(false);
        assert!(built.read().is_empty());
    }

    #[test]
    fn counted_flag_repeats_token() {
        let p = ParameterSpec::counted("verbose", ["-v"]);
        let built = build(&p, &style());
        assert!(built.read().is_empty());
        built.widgets[1].as_spin().unwrap().borrow_mut().set_value(3);
        assert_eq!(built.read(), ["-v", "-v", "-v"]);
    }

    #[test]
    fn choice_always_emits_selection() {
        let p = ParameterSpec::option("mode", ["--mode"])
            .with_type(ParamType::choice(["fast", "slow"]))
            .with_default("slow");
        let built = build(&p, &style());
        assert_eq!(built.read(), ["--mode", "slow"]);
        built.widgets[1].as_choice().unwrap().borrow_mut().select(0);
        assert_eq!(built.read(), ["--mode", "fast"]);
    }

    #[test]
    fn range_slider_emits_value() {
        let p = ParameterSpec::option("level", ["--level"])
            .with_type(ParamType::IntRange { min: 0, max: 10 });
        let built = build(&p, &style());
        assert_eq!(built.read(), ["--level", "5"]);
        built.widgets[1].as_slider().unwrap().borrow_mut().set_value(8);
        assert_eq!(built.read(), ["--level", "8"]);
    }

    #[test]
    fn path_picker_reads_selection() {
        let p = ParameterSpec::option("out", ["-o"]).with_type(ParamType::Path {
            exists: false,
            file_okay: true,
            dir_okay: false,
        });
        let built = build(&p, &style());
        let picker = built.widgets[1].as_path().unwrap().clone();
        assert_eq!(picker.borrow().mode(), FileMode::AnyFile);
        assert_eq!(picker.borrow().field().placeholder(), "file");
        assert!(built.read().is_empty());
        picker
            .borrow_mut()
            .accept_selection(&[std::path::PathBuf::from("out.csv")]);
        assert_eq!(built.read(), ["-o", "out.csv"]);
    }

    #[test]
    fn unedited_defaults_read_back_unchanged() {
        let cases = [
            (ParamType::String, "hello world"),
            (ParamType::Int, "-42"),
            (ParamType::Float, "2.5e3"),
            (ParamType::any_path(), "/tmp/x"),
            (ParamType::choice(["a", "b"]), "b"),
            (ParamType::IntRange { min: -3, max: 3 }, "-2"),
        ];
        for (ty, default) in cases {
            let p = ParameterSpec::option("p", ["--p"])
                .with_type(ty.clone())
                .with_default(DefaultValue::from(default));
            assert_eq!(build(&p, &style()).read(), ["--p", default], "{ty:?}");
        }
    }

    struct StarRating {
        stars: Cell<u8>,
    }

    impl CustomWidget for StarRating {
        fn summary(&self) -> String {
            let n = usize::from(self.stars.get());
            format!("{}{}", "*".repeat(n), ".".repeat(5 - n))
        }
    }

    struct Stars(Rc<StarRating>);

    impl WidgetDelegate for Stars {
        fn build(&self, param: &ParameterSpec, _style: &FormStyle) -> Built {
            let flag = param.flag_token().map(str::to_string);
            let rating = Rc::clone(&self.0);
            let widget: Rc<dyn CustomWidget> = self.0.clone();
            Built::new(vec![Widget::Custom(widget)], move || {
                with_flag(&flag, rating.stars.get().to_string())
            })
        }
    }

    fn stars_param(rating: &Rc<StarRating>) -> ParameterSpec {
        ParameterSpec::option("stars", ["--stars"])
            .with_type(ParamType::custom("stars", Stars(Rc::clone(rating))))
    }

    #[test]
    fn delegate_builds_controls_and_reader() {
        let rating = Rc::new(StarRating {
            stars: Cell::new(3),
        });
        let built = build(&stars_param(&rating), &style());

        assert_eq!(built.widgets.len(), 2);
        assert_eq!(built.widgets[0].as_label().unwrap().text, "stars");
        let Widget::Custom(custom) = &built.widgets[1] else {
            panic!("expected a custom control, got {:?}", built.widgets[1]);
        };
        assert_eq!(custom.summary(), "***..");
        assert_eq!(built.read(), ["--stars", "3"]);

        rating.stars.set(5);
        assert_eq!(built.read(), ["--stars", "5"]);
    }

    #[test]
    fn delegate_preempts_cardinality() {
        let rating = Rc::new(StarRating {
            stars: Cell::new(1),
        });
        let p = stars_param(&rating).multiple().with_arity(Arity::Fixed(2));
        let built = build(&p, &style());
        assert!(matches!(built.widgets[1], Widget::Custom(_)));
        assert_eq!(built.read(), ["--stars", "1"]);
    }
}
