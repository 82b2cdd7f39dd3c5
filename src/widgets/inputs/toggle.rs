use crate::core::value::Value;
use crate::core::value_path::ValuePath;
use crate::terminal::{KeyCode, KeyEvent};
use crate::ui::span::Span;
use crate::ui::style::{Color, Style};
use crate::widgets::base::InputBase;
use crate::widgets::traits::{
    ControlKind, DrawOutput, Drawable, InteractionResult, Interactive, RenderContext,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleStyle {
    Switch,
    Checkbox,
}

/// Boolean control, drawn as a switch or as a checkbox.
pub struct Toggle {
    base: InputBase,
    checked: bool,
    style: ToggleStyle,
}

impl Toggle {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            base: InputBase::new(id, label),
            checked: false,
            style: ToggleStyle::Switch,
        }
    }

    pub fn checkbox(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            style: ToggleStyle::Checkbox,
            ..Self::new(id, label)
        }
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.set_value(value.into());
        self
    }

    pub fn with_change_target(mut self, target: ValuePath) -> Self {
        self.base.set_change_target(target);
        self
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }
}

impl Drawable for Toggle {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn label(&self) -> &str {
        self.base.label()
    }

    fn draw(&self, ctx: &RenderContext) -> DrawOutput {
        let focused = self.base.is_focused(ctx);
        let mut style = if self.checked {
            Style::new().color(Color::Green)
        } else {
            Style::hint()
        };
        if focused {
            style = style.bold();
        }
        let text = match (self.style, self.checked) {
            (ToggleStyle::Switch, true) => "(●  ) On",
            (ToggleStyle::Switch, false) => "(  ○) Off",
            (ToggleStyle::Checkbox, true) => "[✓]",
            (ToggleStyle::Checkbox, false) => "[ ]",
        };
        DrawOutput::single(vec![Span::styled(text, style).no_wrap()])
    }
}

impl Interactive for Toggle {
    fn kind(&self) -> ControlKind {
        match self.style {
            ToggleStyle::Switch => ControlKind::Toggle,
            ToggleStyle::Checkbox => ControlKind::Checkbox,
        }
    }

    fn on_key(&mut self, key: KeyEvent) -> InteractionResult {
        match key.code {
            KeyCode::Char(' ') => {
                self.checked = !self.checked;
                InteractionResult::value_changed(self.base.change_target(), Value::Bool(self.checked))
            }
            KeyCode::Enter => InteractionResult::input_done(),
            _ => InteractionResult::ignored(),
        }
    }

    fn value(&self) -> Option<Value> {
        Some(Value::Bool(self.checked))
    }

    fn set_value(&mut self, value: Value) {
        if let Some(flag) = value.as_bool() {
            self.checked = flag;
        } else if let Some(text) = value.as_text() {
            self.checked = matches!(text.to_ascii_lowercase().as_str(), "true" | "1" | "yes");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Toggle;
    use crate::core::value::Value;
    use crate::terminal::KeyEvent;
    use crate::widgets::traits::{ControlKind, Interactive};

    #[test]
    fn space_flips_the_value() {
        let mut toggle = Toggle::new("happy", "Happy").with_default(true);
        toggle.on_key(KeyEvent::char(' '));
        assert_eq!(toggle.value(), Some(Value::Bool(false)));
        assert_eq!(toggle.kind(), ControlKind::Toggle);
        assert_eq!(Toggle::checkbox("happy", "Happy").kind(), ControlKind::Checkbox);
    }
}
