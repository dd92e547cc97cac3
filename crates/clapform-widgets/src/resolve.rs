//! Type-to-control resolution.
//!
//! [`resolve`] maps a declared [`ParamType`] to the kind of control that
//! renders it. Lookup walks an ordered table and takes the first match;
//! anything the table does not know becomes a plain text field, so the
//! function is total over every type.
//!
//! Types outside the table can bring their own controls by carrying a
//! [`WidgetDelegate`], which preempts the table entirely.

use crate::factory::Built;
use crate::spec::{ParamType, ParameterSpec};
use crate::style::FormStyle;

/// The control class chosen for a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    /// Drop-down over enumerated options.
    Choice,
    /// Text field with a file-dialog action.
    PathPicker,
    /// Slider over a bounded integer range.
    RangeSlider,
    /// Text field masked to integers.
    IntegerField,
    /// Text field masked to decimals.
    DecimalField,
    /// Unmasked text field.
    TextField,
    /// Built by the type's own delegate.
    Custom,
}

/// Builds controls for a type the resolution table does not cover.
pub trait WidgetDelegate {
    /// Creates the parameter's controls and the reader that turns their
    /// state back into argument tokens.
    fn build(&self, param: &ParameterSpec, style: &FormStyle) -> Built;
}

/// A delegate-provided control the renderer can summarise.
pub trait CustomWidget {
    /// One-line description of the current state.
    fn summary(&self) -> String;
}

type Matcher = fn(&ParamType) -> bool;

fn is_choice(ty: &ParamType) -> bool {
    matches!(ty, ParamType::Choice { .. })
}

fn is_path(ty: &ParamType) -> bool {
    matches!(ty, ParamType::Path { .. })
}

fn is_int_range(ty: &ParamType) -> bool {
    matches!(ty, ParamType::IntRange { .. })
}

fn is_int(ty: &ParamType) -> bool {
    matches!(ty, ParamType::Int)
}

fn is_float(ty: &ParamType) -> bool {
    matches!(ty, ParamType::Float)
}

/// Ordered resolution table; first match wins.
const RESOLUTION_TABLE: &[(Matcher, ControlKind)] = &[
    (is_choice, ControlKind::Choice),
    (is_path, ControlKind::PathPicker),
    (is_int_range, ControlKind::RangeSlider),
    (is_int, ControlKind::IntegerField),
    (is_float, ControlKind::DecimalField),
];

/// Resolves the control kind for a type.
pub fn resolve(ty: &ParamType) -> ControlKind {
    if let ParamType::Custom {
        delegate: Some(_), ..
    } = ty
    {
        return ControlKind::Custom;
    }
    RESOLUTION_TABLE
        .iter()
        .find(|(matches, _)| matches(ty))
        .map(|(_, kind)| *kind)
        .unwrap_or(ControlKind::TextField)
}

/// Resolves the control kind for slot `row` of a multi-value type.
///
/// Tuple slots use their element type; slots past the declared elements
/// fall back to a text field.
pub fn resolve_slot(ty: &ParamType, row: usize) -> ControlKind {
    match ty {
        ParamType::Tuple { element_types } => element_types
            .get(row)
            .map(resolve)
            .unwrap_or(ControlKind::TextField),
        other => resolve(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Stars;

    impl WidgetDelegate for Stars {
        fn build(&self, _param: &ParameterSpec, _style: &FormStyle) -> Built {
            Built::new(Vec::new(), Vec::<String>::new)
        }
    }

    #[test]
    fn table_order() {
        assert_eq!(resolve(&ParamType::choice(["a"])), ControlKind::Choice);
        assert_eq!(resolve(&ParamType::any_path()), ControlKind::PathPicker);
        assert_eq!(
            resolve(&ParamType::IntRange { min: 0, max: 5 }),
            ControlKind::RangeSlider
        );
        assert_eq!(resolve(&ParamType::Int), ControlKind::IntegerField);
        assert_eq!(resolve(&ParamType::Float), ControlKind::DecimalField);
    }

    #[test]
    fn unknown_types_fall_back_to_text() {
        assert_eq!(resolve(&ParamType::String), ControlKind::TextField);
        assert_eq!(
            resolve(&ParamType::Custom {
                name: "uuid".into(),
                delegate: None
            }),
            ControlKind::TextField
        );
        assert_eq!(
            resolve(&ParamType::Tuple {
                element_types: vec![ParamType::Int]
            }),
            ControlKind::TextField
        );
    }

    #[test]
    fn delegate_preempts_table() {
        assert_eq!(resolve(&ParamType::custom("stars", Stars)), ControlKind::Custom);
    }

    #[test]
    fn tuple_slots_resolve_per_element() {
        let ty = ParamType::Tuple {
            element_types: vec![ParamType::Int, ParamType::Float],
        };
        assert_eq!(resolve_slot(&ty, 0), ControlKind::IntegerField);
        assert_eq!(resolve_slot(&ty, 1), ControlKind::DecimalField);
        assert_eq!(resolve_slot(&ty, 7), ControlKind::TextField);
        assert_eq!(resolve_slot(&ParamType::Float, 3), ControlKind::DecimalField);
    }
}
