use super::text_edit;
use crate::core::value::Value;
use crate::core::value_path::ValuePath;
use crate::terminal::{KeyCode, KeyEvent};
use crate::ui::style::Style;
use crate::widgets::base::InputBase;
use crate::widgets::traits::{
    ControlKind, DrawOutput, Drawable, InteractionResult, Interactive, RenderContext,
};

/// Single-line text input. Used for strings, date-times, times and every type name
/// without a dedicated control.
pub struct TextInput {
    base: InputBase,
    value: String,
    cursor: usize,
    placeholder: Option<String>,
}

impl TextInput {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            base: InputBase::new(id, label),
            value: String::new(),
            cursor: 0,
            placeholder: None,
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
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

    pub fn text(&self) -> &str {
        &self.value
    }

    fn edited_result(&self) -> InteractionResult {
        InteractionResult::value_changed(
            self.base.change_target(),
            Value::Text(self.value.clone()),
        )
    }
}

impl Drawable for TextInput {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn label(&self) -> &str {
        self.base.label()
    }

    fn draw(&self, ctx: &RenderContext) -> DrawOutput {
        let line = match &self.placeholder {
            Some(placeholder) if self.value.is_empty() => {
                self.base.framed(ctx, placeholder, Style::hint())
            }
            _ => self.base.framed(ctx, &self.value, Style::default()),
        };
        DrawOutput::single(line)
    }
}

impl Interactive for TextInput {
    fn kind(&self) -> ControlKind {
        ControlKind::TextInput
    }

    fn on_key(&mut self, key: KeyEvent) -> InteractionResult {
        if key.is_ctrl('w') {
            if text_edit::delete_word_left(&mut self.value, &mut self.cursor) {
                return self.edited_result();
            }
            return InteractionResult::ignored();
        }
        if let Some(ch) = key.typed_char() {
            text_edit::insert_char(&mut self.value, &mut self.cursor, ch);
            return self.edited_result();
        }
        match key.code {
            KeyCode::Backspace => {
                if text_edit::backspace_char(&mut self.value, &mut self.cursor) {
                    return self.edited_result();
                }
                InteractionResult::ignored()
            }
            KeyCode::Delete => {
                if text_edit::delete_char(&mut self.value, &mut self.cursor) {
                    return self.edited_result();
                }
                InteractionResult::ignored()
            }
            KeyCode::Left => {
                if text_edit::move_left(&mut self.cursor, &self.value) {
                    return InteractionResult::handled();
                }
                InteractionResult::ignored()
            }
            KeyCode::Right => {
                if text_edit::move_right(&mut self.cursor, &self.value) {
                    return InteractionResult::handled();
                }
                InteractionResult::ignored()
            }
            KeyCode::Home => {
                self.cursor = 0;
                InteractionResult::handled()
            }
            KeyCode::End => {
                self.cursor = text_edit::char_count(&self.value);
                InteractionResult::handled()
            }
            KeyCode::Enter => InteractionResult::input_done(),
            _ => InteractionResult::ignored(),
        }
    }

    fn value(&self) -> Option<Value> {
        Some(Value::Text(self.value.clone()))
    }

    fn set_value(&mut self, value: Value) {
        if let Some(v) = value.to_text_scalar() {
            self.value = v;
            self.cursor = text_edit::char_count(&self.value);
        }
    }
}
