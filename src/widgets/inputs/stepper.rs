use super::text_edit;
use crate::core::value::Value;
use crate::core::value_path::ValuePath;
use crate::terminal::{KeyCode, KeyEvent};
use crate::ui::span::Span;
use crate::ui::style::Style;
use crate::widgets::base::InputBase;
use crate::widgets::traits::{
    ControlKind, DrawOutput, Drawable, InteractionResult, Interactive, RenderContext,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepMode {
    Integer,
    Fractional { step: f64 },
}

/// Numeric spin control. Up/Down step the value; digits can also be typed. Text that
/// does not parse is reported as-is so the form can flag it.
pub struct Stepper {
    base: InputBase,
    text: String,
    cursor: usize,
    mode: StepMode,
}

impl Stepper {
    pub fn integer(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::with_mode(id, label, StepMode::Integer)
    }

    pub fn fractional(id: impl Into<String>, label: impl Into<String>, step: f64) -> Self {
        Self::with_mode(id, label, StepMode::Fractional { step })
    }

    fn with_mode(id: impl Into<String>, label: impl Into<String>, mode: StepMode) -> Self {
        let mut stepper = Self {
            base: InputBase::new(id, label),
            text: String::new(),
            cursor: 0,
            mode,
        };
        stepper.set_value(Value::Number(0));
        stepper
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.set_value(value.into());
        self
    }

    pub fn with_change_target(mut self, target: ValuePath) -> Self {
        self.base.set_change_target(target);
        self
    }

    pub fn mode(&self) -> StepMode {
        self.mode
    }

    fn parsed(&self) -> Option<Value> {
        let raw = self.text.trim();
        match self.mode {
            StepMode::Integer => raw.parse::<i64>().ok().map(Value::Number),
            StepMode::Fractional { .. } => raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Value::Float),
        }
    }

    fn step_by(&mut self, direction: i64) {
        match self.mode {
            StepMode::Integer => {
                let current = self.parsed().and_then(|v| v.as_number()).unwrap_or(0);
                self.text = current.saturating_add(direction).to_string();
            }
            StepMode::Fractional { step } => {
                let current = self.parsed().and_then(|v| v.as_float()).unwrap_or(0.0);
                self.text = format_fraction(current + step * direction as f64, step);
            }
        }
        self.cursor = text_edit::char_count(&self.text);
    }

    fn accepts(&self, ch: char) -> bool {
        match self.mode {
            StepMode::Integer => ch.is_ascii_digit() || ch == '-',
            StepMode::Fractional { .. } => ch.is_ascii_digit() || ch == '-' || ch == '.',
        }
    }

    fn changed(&self) -> InteractionResult {
        let value = self.value().unwrap_or_default();
        InteractionResult::value_changed(self.base.change_target(), value)
    }
}

/// Formats with as many decimals as the step has.
fn format_fraction(value: f64, step: f64) -> String {
    let step_text = step.to_string();
    let decimals = step_text
        .split_once('.')
        .map(|(_, fraction)| fraction.len())
        .unwrap_or(0);
    format!("{value:.decimals$}")
}

impl Drawable for Stepper {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn label(&self) -> &str {
        self.base.label()
    }

    fn draw(&self, ctx: &RenderContext) -> DrawOutput {
        let mut line = self.base.framed(ctx, &self.text, Style::default());
        line.push(Span::styled(" ▲▼", Style::hint()).no_wrap());
        DrawOutput::single(line)
    }
}

impl Interactive for Stepper {
    fn kind(&self) -> ControlKind {
        ControlKind::Stepper
    }

    fn on_key(&mut self, key: KeyEvent) -> InteractionResult {
        if let Some(ch) = key.typed_char() {
            if !self.accepts(ch) {
                return InteractionResult::consumed();
            }
            text_edit::insert_char(&mut self.text, &mut self.cursor, ch);
            return self.changed();
        }
        match key.code {
            KeyCode::Up => {
                self.step_by(1);
                self.changed()
            }
            KeyCode::Down => {
                self.step_by(-1);
                self.changed()
            }
            KeyCode::Backspace => {
                if text_edit::backspace_char(&mut self.text, &mut self.cursor) {
                    return self.changed();
                }
                InteractionResult::ignored()
            }
            KeyCode::Left => {
                if text_edit::move_left(&mut self.cursor, &self.text) {
                    return InteractionResult::handled();
                }
                InteractionResult::ignored()
            }
            KeyCode::Right => {
                if text_edit::move_right(&mut self.cursor, &self.text) {
                    return InteractionResult::handled();
                }
                InteractionResult::ignored()
            }
            KeyCode::Enter => InteractionResult::input_done(),
            _ => InteractionResult::ignored(),
        }
    }

    fn value(&self) -> Option<Value> {
        Some(
            self.parsed()
                .unwrap_or_else(|| Value::Text(self.text.clone())),
        )
    }

    fn set_value(&mut self, value: Value) {
        if let Some(text) = value.to_text_scalar() {
            self.text = text;
            self.cursor = text_edit::char_count(&self.text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Stepper;
    use crate::core::value::Value;
    use crate::terminal::{KeyCode, KeyEvent};
    use crate::widgets::traits::Interactive;

    #[test]
    fn integer_stepper_steps_by_one() {
        let mut stepper = Stepper::integer("age", "Age").with_default(29);
        stepper.on_key(KeyEvent::plain(KeyCode::Up));
        assert_eq!(stepper.value(), Some(Value::Number(30)));
        stepper.on_key(KeyEvent::plain(KeyCode::Down));
        stepper.on_key(KeyEvent::plain(KeyCode::Down));
        assert_eq!(stepper.value(), Some(Value::Number(28)));
    }

    #[test]
    fn fractional_stepper_uses_configured_step() {
        let mut stepper = Stepper::fractional("temp", "Temperature", 0.01).with_default(37.5);
        stepper.on_key(KeyEvent::plain(KeyCode::Up));
        assert_eq!(stepper.value(), Some(Value::Float(37.51)));
    }

    #[test]
    fn unparsable_text_is_reported_raw() {
        let mut stepper = Stepper::integer("age", "Age");
        stepper.on_key(KeyEvent::plain(KeyCode::Backspace));
        stepper.on_key(KeyEvent::char('-'));
        assert_eq!(stepper.value(), Some(Value::from("-")));
        let ignored = stepper.on_key(KeyEvent::char('x'));
        assert!(ignored.actions.is_empty());
    }
}
