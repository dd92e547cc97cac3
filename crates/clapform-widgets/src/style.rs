//! Form style configuration.
//!
//! A [`FormStyle`] is an explicit value handed to every control
//! constructor. It carries the colours controls need at build time (list
//! cells paint blank rows in the placeholder colour) and the emphasis the
//! renderer applies to labels and help text.
//!
//! Two presets ship with the crate, `light` and `dark`. Styles can also be
//! loaded from YAML; missing keys take the `light` values:
//!
//! ```rust
//! use clapform_widgets::FormStyle;
//!
//! let style = FormStyle::from_yaml(r##"
//! name: solarized
//! text_color: "#839496"
//! "##).unwrap();
//! assert_eq!(style.placeholder_color, "#898b8d");
//! ```

use console::Color;
use serde::{Deserialize, Serialize};

use crate::error::StyleError;

const PLACEHOLDER_GREY: &str = "#898b8d";

/// Visual configuration for one form session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormStyle {
    pub name: String,
    /// Colour of entered values.
    pub text_color: String,
    /// Colour of placeholder (type name) text in blank cells.
    pub placeholder_color: String,
    pub bold_labels: bool,
    pub italic_help: bool,
}

impl Default for FormStyle {
    fn default() -> Self {
        Self::light()
    }
}

impl FormStyle {
    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            text_color: "black".to_string(),
            placeholder_color: PLACEHOLDER_GREY.to_string(),
            bold_labels: true,
            italic_help: false,
        }
    }

    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            text_color: "#eff0f1".to_string(),
            placeholder_color: PLACEHOLDER_GREY.to_string(),
            bold_labels: true,
            italic_help: false,
        }
    }

    /// Looks up a preset by name; unknown names fall back to `light`.
    pub fn named(name: &str) -> Self {
        match name {
            "dark" => Self::dark(),
            "light" => Self::light(),
            other => {
                tracing::debug!(style = other, "unknown style, using light");
                Self::light()
            }
        }
    }

    /// Parses and validates a style document.
    pub fn from_yaml(yaml: &str) -> Result<Self, StyleError> {
        let style: FormStyle = serde_yaml::from_str(yaml)?;
        style.text()?;
        style.placeholder()?;
        Ok(style)
    }

    /// The text colour as a terminal colour.
    pub fn text(&self) -> Result<Color, StyleError> {
        parse_color(&self.text_color)
    }

    /// The placeholder colour as a terminal colour.
    pub fn placeholder(&self) -> Result<Color, StyleError> {
        parse_color(&self.placeholder_color)
    }
}

/// Parses a named (`red`, `bright_blue`) or hex (`#fff`, `#898b8d`) colour.
///
/// Hex colours are mapped onto the 256-colour palette.
pub fn parse_color(value: &str) -> Result<Color, StyleError> {
    let s = value.trim();
    if let Some(hex) = s.strip_prefix('#') {
        let (r, g, b) = parse_hex(hex).ok_or_else(|| {
            StyleError::color(value, "hex colors must have 3 or 6 hex digits")
        })?;
        return Ok(Color::Color256(rgb_to_ansi256((r, g, b))));
    }

    let lower = s.to_lowercase();
    if let Some(base) = lower.strip_prefix("bright_") {
        let index = match base {
            "black" => 8,
            "red" => 9,
            "green" => 10,
            "yellow" => 11,
            "blue" => 12,
            "magenta" => 13,
            "cyan" => 14,
            "white" => 15,
            _ => return Err(StyleError::color(value, "unknown bright color")),
        };
        return Ok(Color::Color256(index));
    }

    match lower.as_str() {
        "black" => Ok(Color::Black),
        "red" => Ok(Color::Red),
        "green" => Ok(Color::Green),
        "yellow" => Ok(Color::Yellow),
        "blue" => Ok(Color::Blue),
        "magenta" => Ok(Color::Magenta),
        "cyan" => Ok(Color::Cyan),
        "white" | "gray" | "grey" => Ok(Color::White),
        _ => Err(StyleError::color(value, "unknown color name")),
    }
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => Some((
            channel(&hex[0..1])? * 17,
            channel(&hex[1..2])? * 17,
            channel(&hex[2..3])? * 17,
        )),
        6 => Some((
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        _ => None,
    }
}

fn rgb_to_ansi256((r, g, b): (u8, u8, u8)) -> u8 {
    if r == g && g == b {
        if r < 8 {
            16
        } else if r > 248 {
            231
        } else {
            232 + ((r as u16 - 8) * 24 / 247) as u8
        }
    } else {
        let red = (r as u16 * 5 / 255) as u8;
        let green = (g as u16 * 5 / 255) as u8;
        let blue = (b as u16 * 5 / 255) as u8;
        16 + 36 * red + 6 * green + blue
    }
}
