use crate::ui::span::Span;
use crate::ui::style::Style;
use crate::widgets::traits::{DrawOutput, Drawable, RenderContext};

/// Hidden-by-default line of error text under a field (or under the form).
#[derive(Debug, Clone)]
pub struct MessageLine {
    id: String,
    text: String,
    visible: bool,
}

impl MessageLine {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: String::new(),
            visible: false,
        }
    }

    pub fn show(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Text shown while visible.
    pub fn text(&self) -> Option<&str> {
        self.visible.then_some(self.text.as_str())
    }
}

impl Drawable for MessageLine {
    fn id(&self) -> &str {
        &self.id
    }

    fn draw(&self, _ctx: &RenderContext) -> DrawOutput {
        match self.text() {
            Some(text) => DrawOutput::single(vec![Span::styled(text, Style::error())]),
            None => DrawOutput::default(),
        }
    }
}
