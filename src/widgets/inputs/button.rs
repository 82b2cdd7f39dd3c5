use crate::runtime::event::WidgetAction;
use crate::terminal::{KeyCode, KeyEvent};
use crate::ui::span::Span;
use crate::ui::style::{Color, Style};
use crate::widgets::base::InputBase;
use crate::widgets::traits::{
    ControlKind, DrawOutput, Drawable, FocusMode, InteractionResult, Interactive, RenderContext,
};

/// The form's submit action. While `failed` it is drawn in the error style; a disabled
/// button takes no focus and ignores keys.
pub struct SubmitButton {
    base: InputBase,
    enabled: bool,
    failed: bool,
}

impl SubmitButton {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            base: InputBase::new(id, text),
            enabled: true,
            failed: false,
        }
    }

    pub fn text(&self) -> &str {
        self.base.label()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_failed(&self) -> bool {
        self.failed
    }

    pub fn set_failed(&mut self, failed: bool) {
        self.failed = failed;
    }
}

impl Drawable for SubmitButton {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn label(&self) -> &str {
        self.base.label()
    }

    fn draw(&self, ctx: &RenderContext) -> DrawOutput {
        let focused = self.base.is_focused(ctx);
        let style = if !self.enabled {
            Style::hint().dim()
        } else if self.failed {
            Style::new().color(Color::White).background(Color::Red).bold()
        } else if focused {
            Style::new()
                .color(Color::White)
                .background(Color::Blue)
                .bold()
        } else {
            Style::new().color(Color::Blue)
        };
        let text = format!(" {} ", self.base.label());
        DrawOutput::single(vec![Span::styled(text, style).no_wrap()])
    }
}

impl Interactive for SubmitButton {
    fn kind(&self) -> ControlKind {
        ControlKind::Button
    }

    fn focus_mode(&self) -> FocusMode {
        if self.enabled {
            FocusMode::Leaf
        } else {
            FocusMode::None
        }
    }

    fn on_key(&mut self, key: KeyEvent) -> InteractionResult {
        if !self.enabled {
            return InteractionResult::ignored();
        }
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => {
                InteractionResult::with_action(WidgetAction::SubmitRequested)
            }
            _ => InteractionResult::ignored(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SubmitButton;
    use crate::runtime::event::WidgetAction;
    use crate::terminal::{KeyCode, KeyEvent};
    use crate::widgets::traits::{FocusMode, Interactive};

    #[test]
    fn disabled_button_ignores_activation() {
        let mut button = SubmitButton::new("poll__submit", "Vote");
        let result = button.on_key(KeyEvent::plain(KeyCode::Enter));
        assert_eq!(result.actions, vec![WidgetAction::SubmitRequested]);

        button.set_enabled(false);
        assert_eq!(button.focus_mode(), FocusMode::None);
        assert!(!button.on_key(KeyEvent::plain(KeyCode::Enter)).handled);
    }
}
