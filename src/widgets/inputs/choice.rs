use crate::core::value::Value;
use crate::core::value_path::ValuePath;
use crate::terminal::{KeyCode, KeyEvent};
use crate::ui::span::Span;
use crate::ui::style::{Color, Style};
use crate::widgets::base::InputBase;
use crate::widgets::traits::{
    ControlKind, DrawOutput, Drawable, InteractionResult, Interactive, RenderContext,
};

/// One selectable value with its display label.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceOption {
    pub value: Value,
    pub label: String,
}

impl ChoiceOption {
    pub fn new(value: impl Into<Value>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Position of the option matching `value`, by value or by label.
pub(crate) fn position_of(options: &[ChoiceOption], value: &Value) -> Option<usize> {
    options.iter().position(|option| &option.value == value).or_else(|| {
        let text = value.as_text()?;
        options
            .iter()
            .position(|option| option.label.eq_ignore_ascii_case(text))
    })
}

/// All options shown inline; Left/Right move the selection.
pub struct RadioGroup {
    base: InputBase,
    options: Vec<ChoiceOption>,
    selected: usize,
}

impl RadioGroup {
    pub fn new(id: impl Into<String>, label: impl Into<String>, options: Vec<ChoiceOption>) -> Self {
        Self {
            base: InputBase::new(id, label),
            options,
            selected: 0,
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

    fn move_by(&mut self, forward: bool) -> bool {
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

    fn select_by_letter(&mut self, ch: char) -> bool {
        let needle = ch.to_ascii_lowercase();
        if let Some(index) = self.options.iter().position(|option| {
            option
                .label
                .chars()
                .next()
                .is_some_and(|c| c.to_ascii_lowercase() == needle)
        }) {
            self.selected = index;
            return true;
        }
        false
    }

    fn changed(&self) -> InteractionResult {
        InteractionResult::value_changed(
            self.base.change_target(),
            self.value().unwrap_or_default(),
        )
    }
}

impl Drawable for RadioGroup {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn label(&self) -> &str {
        self.base.label()
    }

    fn draw(&self, ctx: &RenderContext) -> DrawOutput {
        let focused = self.base.is_focused(ctx);
        let active_style = if focused {
            Style::focused()
        } else {
            Style::new().bold()
        };
        let inactive_style = Style::hint();

        let mut spans = vec![];
        for (index, option) in self.options.iter().enumerate() {
            if index > 0 {
                spans.push(Span::new("  ").no_wrap());
            }
            if index == self.selected {
                spans.push(Span::styled("●", Style::new().color(Color::Green).bold()).no_wrap());
            } else {
                spans.push(Span::styled("○", inactive_style).no_wrap());
            }
            spans.push(Span::new(" ").no_wrap());
            let style = if index == self.selected {
                active_style
            } else {
                inactive_style
            };
            spans.push(Span::styled(option.label.clone(), style).no_wrap());
        }

        DrawOutput::single(spans)
    }
}

impl Interactive for RadioGroup {
    fn kind(&self) -> ControlKind {
        ControlKind::RadioGroup
    }

    fn on_key(&mut self, key: KeyEvent) -> InteractionResult {
        match key.code {
            KeyCode::Left if self.move_by(false) => self.changed(),
            KeyCode::Right | KeyCode::Char(' ') if self.move_by(true) => self.changed(),
            KeyCode::Char(ch) if self.select_by_letter(ch) => self.changed(),
            KeyCode::Enter => InteractionResult::input_done(),
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
}
