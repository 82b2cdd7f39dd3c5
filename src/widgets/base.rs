use crate::config::ControlStyle;
use crate::core::value_path::ValuePath;
use crate::ui::span::{Span, SpanLine, pad_to};
use crate::ui::style::Style;
use crate::widgets::traits::RenderContext;

#[derive(Debug, Clone)]
pub struct InputBase {
    id: String,
    label: String,
    change_target: Option<ValuePath>,
}

impl InputBase {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            change_target: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn change_target(&self) -> Option<&ValuePath> {
        self.change_target.as_ref()
    }

    pub fn set_change_target(&mut self, target: ValuePath) {
        self.change_target = Some(target);
    }

    pub fn is_focused(&self, ctx: &RenderContext) -> bool {
        ctx.is_focused(&self.id)
    }

    /// Frames a single-line value according to the control style: brackets for
    /// `normal`, an underline for `line`. Text is padded to the configured control width.
    pub fn framed(&self, ctx: &RenderContext, text: &str, text_style: Style) -> SpanLine {
        let focused = self.is_focused(ctx);
        let body = match ctx.control_width {
            Some(width) => pad_to(text, width),
            None => text.to_string(),
        };
        match ctx.control_style {
            ControlStyle::Normal => {
                let frame = if focused {
                    Style::focused()
                } else {
                    Style::hint()
                };
                vec![
                    Span::styled("[ ", frame).no_wrap(),
                    Span::styled(body, text_style).no_wrap(),
                    Span::styled(" ]", frame).no_wrap(),
                ]
            }
            ControlStyle::Line => {
                let mut style = text_style.underline();
                if focused {
                    style = style.bold();
                }
                vec![Span::styled(body, style).no_wrap()]
            }
        }
    }
}
