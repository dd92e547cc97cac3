//! Input masks for text controls.
//!
//! Validators run on every edit and refuse characters that can never lead
//! to a valid value. Intermediate states (an empty field, a lone sign, a
//! trailing decimal point or exponent marker) are accepted so the user can
//! keep typing.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::spec::ParamType;

static INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+-]?\d*$").unwrap());

static DECIMAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:(?:\d+\.?\d*|\.\d*)(?:[eE][+-]?\d*)?)?$").unwrap()
});

/// Input mask attached to a text control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Validator {
    /// Any text.
    #[default]
    FreeText,
    Integer,
    Decimal,
}

impl Validator {
    /// The mask appropriate for a declared type.
    pub fn for_type(ty: &ParamType) -> Self {
        match ty {
            ParamType::Int | ParamType::IntRange { .. } => Validator::Integer,
            ParamType::Float => Validator::Decimal,
            _ => Validator::FreeText,
        }
    }

    /// Whether `text` is an acceptable (possibly intermediate) field content.
    pub fn accepts(&self, text: &str) -> bool {
        match self {
            Validator::FreeText => true,
            Validator::Integer => INTEGER.is_match(text),
            Validator::Decimal => DECIMAL.is_match(text),
        }
    }
}
