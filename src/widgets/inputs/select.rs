use super::choice::{ChoiceOption, position_of};
use crate::core::value::Value;
use crate::core::value_path::ValuePath;
use crate::terminal::{KeyCode, KeyEvent};
use crate::ui::span::Span;
use crate::ui::style::Style;
use crate::widgets::base::InputBase;
use crate::widgets::traits::{
    ControlKind, DrawOutput, Drawable, InteractionResult, Interactive, RenderContext,
};

/// Collapsed choice control. Left/Right cycle in place; Enter opens the option list,
/// where Up/Down move and Enter picks.
pub struct Dropdown {
    base: InputBase,
    options: Vec<ChoiceOption>,
    selected: usize,
    open: Option<usize>,
}

impl Dropdown {
    pub fn new(id: impl Into<String>, label: impl Into<String>, options: Vec<ChoiceOption>) -> Self {
        Self {
            base: InputBase::new(id, label),
            options,
            selected: 0,
            open: None,
        }
    }

    pub fn with_selected(mut self, selected: usize) -> Self {
        if selected < self.options.len() {
            self.selected = selected;
        }
        self
    }

    pub fn with_change_target(mut self, target: ValuePath) -> Self {
        self.base.set_change_target(target);
        self
    }

    pub fn options(&self) -> &[ChoiceOption] {
        &self.options
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    fn selected_label(&self) -> &str {
        self.options
            .get(self.selected)
            .map(|option| option.label.as_str())
            .unwrap_or("")
    }

    fn cycle(&mut self, forward: bool) -> bool {
        if self.options.is_empty() {
            return false;
        }
        let len = self.options.len();
        self.selected = if forward {
            (self.selected + 1) % len
        } else {
            (self.selected + len - 1) % len
        };
        true
    }

    fn changed(&self) -> InteractionResult {
        InteractionResult::value_changed(
            self.base.change_target(),
            self.value().unwrap_or_default(),
        )
    }

    fn on_open_key(&mut self, highlighted: usize, key: KeyEvent) -> InteractionResult {
        let len = self.options.len().max(1);
        match key.code {
            KeyCode::Up => {
                self.open = Some((highlighted + len - 1) % len);
                InteractionResult::handled()
            }
            KeyCode::Down => {
                self.open = Some((highlighted + 1) % len);
                InteractionResult::handled()
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.open = None;
                if highlighted == self.selected {
                    return InteractionResult::handled();
                }
                self.selected = highlighted;
                self.changed()
            }
            KeyCode::Esc => {
                self.open = None;
                InteractionResult::handled()
            }
            _ => InteractionResult::consumed(),
        }
    }
}

impl Drawable for Dropdown {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn label(&self) -> &str {
        self.base.label()
    }

    fn draw(&self, ctx: &RenderContext) -> DrawOutput {
        let mut lines = vec![self.base.framed(
            ctx,
            &format!("{} ▾", self.selected_label()),
            Style::default(),
        )];

        if let Some(highlighted) = self.open {
            for (index, option) in self.options.iter().enumerate() {
                let (marker, style) = if index == highlighted {
                    ("› ", Style::focused())
                } else {
                    ("  ", Style::default())
                };
                lines.push(vec![
                    Span::styled(marker, style).no_wrap(),
                    Span::styled(option.label.clone(), style).no_wrap(),
                ]);
            }
        }

        DrawOutput { lines }
    }
}

impl Interactive for Dropdown {
    fn kind(&self) -> ControlKind {
        ControlKind::Dropdown
    }

    fn on_key(&mut self, key: KeyEvent) -> InteractionResult {
        if let Some(highlighted) = self.open {
            return self.on_open_key(highlighted, key);
        }
        match key.code {
            KeyCode::Left if self.cycle(false) => self.changed(),
            KeyCode::Right if self.cycle(true) => self.changed(),
            KeyCode::Enter | KeyCode::Char(' ') if !self.options.is_empty() => {
                self.open = Some(self.selected);
                InteractionResult::handled()
            }
            _ => InteractionResult::ignored(),
        }
    }

    fn value(&self) -> Option<Value> {
        self.options.get(self.selected).map(|option| option.value.clone())
    }

    fn set_value(&mut self, value: Value) {
        if let Some(position) = position_of(&self.options, &value) {
            self.selected = position;
        }
    }

    fn is_capturing(&self) -> bool {
        self.is_open()
    }
}

#[cfg(test)]
mod tests {
    use super::Dropdown;
    use crate::core::value::Value;
    use crate::terminal::{KeyCode, KeyEvent};
    use crate::widgets::inputs::choice::ChoiceOption;
    use crate::widgets::traits::Interactive;

    fn weekdays() -> Dropdown {
        Dropdown::new(
            "day",
            "Day",
            ["mon", "tue", "wed", "thu"]
                .into_iter()
                .map(|day| ChoiceOption::new(day, day.to_uppercase()))
                .collect(),
        )
    }

    #[test]
    fn open_list_captures_arrows_until_picked() {
        let mut dropdown = weekdays();
        dropdown.on_key(KeyEvent::plain(KeyCode::Enter));
        assert!(dropdown.is_capturing());
        dropdown.on_key(KeyEvent::plain(KeyCode::Down));
        dropdown.on_key(KeyEvent::plain(KeyCode::Down));
        assert_eq!(dropdown.value(), Some(Value::from("mon")));
        dropdown.on_key(KeyEvent::plain(KeyCode::Enter));
        assert!(!dropdown.is_capturing());
        assert_eq!(dropdown.value(), Some(Value::from("wed")));
    }

    #[test]
    fn escape_closes_without_changing() {
        let mut dropdown = weekdays().with_selected(3);
        dropdown.on_key(KeyEvent::plain(KeyCode::Enter));
        dropdown.on_key(KeyEvent::plain(KeyCode::Up));
        dropdown.on_key(KeyEvent::plain(KeyCode::Esc));
        assert_eq!(dropdown.value(), Some(Value::from("thu")));
    }
}
