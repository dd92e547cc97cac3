//! Session options.
//!
//! ```yaml
//! style: dark          # light (default) or dark
//! execution: background  # inline (default) or background
//! output: term         # gui (default) or term
//! ```
//!
//! A command's own `background` setting wins over `execution`.

use clapform_dispatch::{ExecMode, OutputTarget};
use clapform_widgets::FormStyle;
use serde::{Deserialize, Serialize};

use crate::error::FormError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Execution {
    #[default]
    Inline,
    Background,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Output {
    /// Captured into the form's output panel.
    #[default]
    Gui,
    /// Left on the terminal.
    Term,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormOptions {
    pub style: String,
    pub execution: Execution,
    pub output: Output,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            style: "light".to_string(),
            execution: Execution::Inline,
            output: Output::Gui,
        }
    }
}

impl FormOptions {
    pub fn from_yaml(yaml: &str) -> Result<Self, FormError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn background(mut self) -> Self {
        self.execution = Execution::Background;
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    pub fn with_output(mut self, output: Output) -> Self {
        self.output = output;
        self
    }

    /// The preset named by `style`.
    pub fn form_style(&self) -> FormStyle {
        FormStyle::named(&self.style)
    }

    /// Execution mode for a command, honouring its own override.
    pub fn exec_mode(&self, command_override: Option<bool>) -> ExecMode {
        match command_override {
            Some(background) => ExecMode::from_background(background),
            None => match self.execution {
                Execution::Inline => ExecMode::Inline,
                Execution::Background => ExecMode::Background,
            },
        }
    }

    pub fn output_target(&self) -> OutputTarget {
        match self.output {
            Output::Gui => OutputTarget::Capture,
            Output::Term => OutputTarget::Terminal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = FormOptions::default();
        assert_eq!(opts.style, "light");
        assert_eq!(opts.exec_mode(None), ExecMode::Inline);
        assert_eq!(opts.output_target(), OutputTarget::Capture);
    }

    #[test]
    fn yaml_partial_document() {
        let opts = FormOptions::from_yaml("execution: background\noutput: term\n").unwrap();
        assert_eq!(opts.style, "light");
        assert_eq!(opts.execution, Execution::Background);
        assert_eq!(opts.output_target(), OutputTarget::Terminal);
    }

    #[test]
    fn yaml_rejects_unknown_variants() {
        assert!(matches!(
            FormOptions::from_yaml("execution: sometimes\n"),
            Err(FormError::Options(_))
        ));
    }

    #[test]
    fn command_override_wins() {
        let opts = FormOptions::default().background();
        assert_eq!(opts.exec_mode(None), ExecMode::Background);
        assert_eq!(opts.exec_mode(Some(false)), ExecMode::Inline);
        assert_eq!(FormOptions::default().exec_mode(Some(true)), ExecMode::Background);
    }

    #[test]
    fn style_presets() {
        assert_eq!(FormOptions::default().with_style("dark").form_style().text_color, "#eff0f1");
    }
}
