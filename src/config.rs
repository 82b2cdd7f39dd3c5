use serde::Deserialize;
use std::time::Duration;

use crate::error::{FormError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelAlign {
    #[default]
    Left,
    Top,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlStyle {
    /// Bracketed value: `[ Ada      ]`.
    #[default]
    Normal,
    /// Underlined value without brackets.
    Line,
}

/// Presentation and behavior settings of a form. Every field has a default, so a config
/// file only lists what it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormConfig {
    pub title: Option<String>,
    pub submit_label: String,
    pub show_submit_button: bool,
    pub default_error_message: String,
    pub invalid_message: String,
    pub autosave: bool,
    pub label_align: LabelAlign,
    pub label_width: usize,
    pub control_width: Option<usize>,
    pub control_style: ControlStyle,
    pub padding: usize,
    pub gap: usize,
    pub width: Option<usize>,
    pub dropdown_threshold: usize,
    pub toggle_for_bool: bool,
    pub date_text_input: bool,
    pub feedback_ms: u64,
    pub float_step: f64,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            title: None,
            submit_label: "OK".to_string(),
            show_submit_button: true,
            default_error_message: "Check this value".to_string(),
            invalid_message: "Please check the highlighted fields".to_string(),
            autosave: false,
            label_align: LabelAlign::Left,
            label_width: 18,
            control_width: None,
            control_style: ControlStyle::Normal,
            padding: 0,
            gap: 0,
            width: None,
            dropdown_threshold: 3,
            toggle_for_bool: true,
            date_text_input: true,
            feedback_ms: 1000,
            float_step: 0.01,
        }
    }
}

impl FormConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_yaml_str(input: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(input).map_err(|err| FormError::Config(err.to_string()))?;
        config.validated()
    }

    pub fn from_json_str(input: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(input).map_err(|err| FormError::Config(err.to_string()))?;
        config.validated()
    }

    fn validated(self) -> Result<Self> {
        if !(self.float_step.is_finite() && self.float_step > 0.0) {
            return Err(FormError::Config(format!(
                "float_step must be a positive number, got {}",
                self.float_step
            )));
        }
        if self.dropdown_threshold == 0 {
            return Err(FormError::Config(
                "dropdown_threshold must be at least 1".to_string(),
            ));
        }
        Ok(self)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_submit_label(mut self, label: impl Into<String>) -> Self {
        self.submit_label = label.into();
        self
    }

    pub fn with_submit_button(mut self, show: bool) -> Self {
        self.show_submit_button = show;
        self
    }

    pub fn with_default_error_message(mut self, message: impl Into<String>) -> Self {
        self.default_error_message = message.into();
        self
    }

    pub fn with_invalid_message(mut self, message: impl Into<String>) -> Self {
        self.invalid_message = message.into();
        self
    }

    pub fn with_autosave(mut self, autosave: bool) -> Self {
        self.autosave = autosave;
        self
    }

    pub fn with_label_align(mut self, align: LabelAlign) -> Self {
        self.label_align = align;
        self
    }

    pub fn with_label_width(mut self, width: usize) -> Self {
        self.label_width = width;
        self
    }

    pub fn with_control_width(mut self, width: usize) -> Self {
        self.control_width = Some(width);
        self
    }

    pub fn with_control_style(mut self, style: ControlStyle) -> Self {
        self.control_style = style;
        self
    }

    pub fn with_padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_gap(mut self, gap: usize) -> Self {
        self.gap = gap;
        self
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_dropdown_threshold(mut self, threshold: usize) -> Self {
        self.dropdown_threshold = threshold.max(1);
        self
    }

    pub fn with_toggle_for_bool(mut self, toggle: bool) -> Self {
        self.toggle_for_bool = toggle;
        self
    }

    pub fn with_date_text_input(mut self, enabled: bool) -> Self {
        self.date_text_input = enabled;
        self
    }

    pub fn with_feedback_ms(mut self, ms: u64) -> Self {
        self.feedback_ms = ms;
        self
    }

    pub fn feedback_duration(&self) -> Duration {
        Duration::from_millis(self.feedback_ms)
    }

    /// Configuration for a list element's sub-form: same presentation, no title, and
    /// edits are always held until the sub-form submits.
    pub fn for_subform(&self) -> Self {
        Self {
            title: None,
            autosave: false,
            show_submit_button: true,
            ..self.clone()
        }
    }
}
