use super::text_edit;
use crate::core::value::Value;
use crate::core::value_path::ValuePath;
use crate::schema::coerce::{DATE_FORMAT, parse_date};
use crate::terminal::{KeyCode, KeyEvent};
use crate::ui::span::Span;
use crate::ui::style::Style;
use crate::widgets::base::InputBase;
use crate::widgets::traits::{
    ControlKind, DrawOutput, Drawable, InteractionResult, Interactive, RenderContext,
};
use chrono::{Days, Local, NaiveDate};

const PLACEHOLDER: &str = "YYYY-MM-DD";

/// Date control. Up/Down move the date by one day; with text entry enabled the date
/// can also be typed as `YYYY-MM-DD`.
pub struct DatePicker {
    base: InputBase,
    text: String,
    cursor: usize,
    allow_text_input: bool,
}

impl DatePicker {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            base: InputBase::new(id, label),
            text: String::new(),
            cursor: 0,
            allow_text_input: true,
        }
    }

    pub fn with_text_input(mut self, enabled: bool) -> Self {
        self.allow_text_input = enabled;
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.set_value(value.into());
        self
    }

    pub fn with_change_target(mut self, target: ValuePath) -> Self {
        self.base.set_change_target(target);
        self
    }

    pub fn date(&self) -> Option<NaiveDate> {
        parse_date(&self.text)
    }

    fn shift_days(&mut self, forward: bool) {
        let current = self.date().unwrap_or_else(|| Local::now().date_naive());
        let shifted = if forward {
            current.checked_add_days(Days::new(1))
        } else {
            current.checked_sub_days(Days::new(1))
        };
        let next = shifted.unwrap_or(current);
        self.text = next.format(DATE_FORMAT).to_string();
        self.cursor = text_edit::char_count(&self.text);
    }

    fn changed(&self) -> InteractionResult {
        let value = self.value().unwrap_or_default();
        InteractionResult::value_changed(self.base.change_target(), value)
    }
}

impl Drawable for DatePicker {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn label(&self) -> &str {
        self.base.label()
    }

    fn draw(&self, ctx: &RenderContext) -> DrawOutput {
        let mut line = if self.text.is_empty() {
            self.base.framed(ctx, PLACEHOLDER, Style::hint())
        } else {
            self.base.framed(ctx, &self.text, Style::default())
        };
        line.push(Span::styled(" ▲▼", Style::hint()).no_wrap());
        DrawOutput::single(line)
    }
}

impl Interactive for DatePicker {
    fn kind(&self) -> ControlKind {
        ControlKind::DatePicker
    }

    fn on_key(&mut self, key: KeyEvent) -> InteractionResult {
        if let Some(ch) = key.typed_char() {
            if !self.allow_text_input || !(ch.is_ascii_digit() || ch == '-') {
                return InteractionResult::consumed();
            }
            text_edit::insert_char(&mut self.text, &mut self.cursor, ch);
            return self.changed();
        }
        match key.code {
            KeyCode::Up => {
                self.shift_days(true);
                self.changed()
            }
            KeyCode::Down => {
                self.shift_days(false);
                self.changed()
            }
            KeyCode::Backspace if self.allow_text_input => {
                if text_edit::backspace_char(&mut self.text, &mut self.cursor) {
                    return self.changed();
                }
                InteractionResult::ignored()
            }
            KeyCode::Enter => InteractionResult::input_done(),
            _ => InteractionResult::ignored(),
        }
    }

    /// The parsed date, `None` when empty, or the raw text when it does not parse.
    fn value(&self) -> Option<Value> {
        if self.text.trim().is_empty() {
            return Some(Value::None);
        }
        Some(match self.date() {
            Some(date) => Value::Date(date),
            None => Value::Text(self.text.clone()),
        })
    }

    fn set_value(&mut self, value: Value) {
        self.text = match value {
            Value::Date(date) => date.format(DATE_FORMAT).to_string(),
            Value::None => String::new(),
            Value::Text(text) => text,
            _ => return,
        };
        self.cursor = text_edit::char_count(&self.text);
    }
}
