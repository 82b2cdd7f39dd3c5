use crate::config::{FormConfig, LabelAlign};
use crate::form::layout::LayoutItem;
use crate::form::registry::{FieldEntry, FieldRegistry};
use crate::ui::span::{Span, SpanLine, line_width, pad_to};
use crate::ui::style::Style;
use crate::widgets::inputs::button::SubmitButton;
use crate::widgets::outputs::message::MessageLine;
use crate::widgets::traits::{DrawOutput, Drawable, RenderContext};

const FOCUS_MARKER: &str = "› ";
const NO_MARKER: &str = "  ";
const GROUP_INDENT: usize = 2;

/// Everything needed to draw one form.
pub struct FormView<'a> {
    pub config: &'a FormConfig,
    pub layout: &'a [LayoutItem],
    pub registry: &'a FieldRegistry,
    pub focused_id: Option<&'a str>,
    pub submit_button: Option<&'a SubmitButton>,
    pub invalid_message: &'a MessageLine,
}

impl FormView<'_> {
    pub fn render(&self) -> DrawOutput {
        let mut ctx = RenderContext::new(self.config.control_style, self.config.control_width);
        if let Some(id) = self.focused_id {
            ctx = ctx.with_focus(id);
        }

        let mut lines = Vec::new();
        if let Some(title) = &self.config.title {
            let title_line = vec![Span::styled(title.clone(), Style::label())];
            let rule_width = self.config.width.unwrap_or_else(|| line_width(&title_line));
            lines.push(title_line);
            lines.push(vec![Span::styled("─".repeat(rule_width), Style::hint())]);
        }

        self.render_items(self.layout, 0, &ctx, &mut lines);

        if let Some(button) = self.submit_button {
            self.push_gap(&mut lines);
            lines.extend(button.draw(&ctx).lines);
        }
        lines.extend(self.invalid_message.draw(&ctx).lines);

        if self.config.padding > 0 {
            let pad = " ".repeat(self.config.padding);
            for line in &mut lines {
                line.insert(0, Span::new(pad.clone()).no_wrap());
            }
        }
        DrawOutput { lines }
    }

    fn render_items(
        &self,
        items: &[LayoutItem],
        depth: usize,
        ctx: &RenderContext,
        lines: &mut Vec<SpanLine>,
    ) {
        for (idx, item) in items.iter().enumerate() {
            if idx > 0 {
                self.push_gap(lines);
            }
            match item {
                LayoutItem::Field(path) => {
                    if let Some(entry) = self.registry.get(path) {
                        self.render_field(entry, depth, ctx, lines);
                    }
                }
                LayoutItem::Group { label, items, .. } => {
                    lines.push(vec![
                        Span::new(indent(depth)).no_wrap(),
                        Span::new(NO_MARKER).no_wrap(),
                        Span::styled(label.clone(), Style::label()),
                    ]);
                    self.render_items(items, depth + 1, ctx, lines);
                }
            }
        }
    }

    fn render_field(
        &self,
        entry: &FieldEntry,
        depth: usize,
        ctx: &RenderContext,
        lines: &mut Vec<SpanLine>,
    ) {
        let focused = ctx.is_focused(entry.control.id());
        let (marker, label_style) = if focused {
            (FOCUS_MARKER, Style::focused())
        } else {
            (NO_MARKER, Style::label())
        };
        let head = |label: String| {
            vec![
                Span::new(indent(depth)).no_wrap(),
                Span::styled(marker, label_style).no_wrap(),
                Span::styled(label, label_style).no_wrap(),
            ]
        };

        let control_lines = entry.control.draw(ctx).lines;
        let message_lines = entry.message.draw(ctx).lines;

        let body_indent = match self.config.label_align {
            LabelAlign::Left => {
                let mut control_lines = control_lines.into_iter();
                let mut first = head(pad_to(&entry.label, self.config.label_width));
                first.push(Span::new(" ").no_wrap());
                if let Some(line) = control_lines.next() {
                    first.extend(line);
                }
                lines.push(first);

                let body_indent = format!(
                    "{}{}{} ",
                    indent(depth),
                    NO_MARKER,
                    " ".repeat(self.config.label_width)
                );
                for line in control_lines {
                    lines.push(prefixed(&body_indent, line));
                }
                body_indent
            }
            LabelAlign::Top => {
                lines.push(head(entry.label.clone()));
                let body_indent = format!("{}{}", indent(depth), NO_MARKER);
                for line in control_lines {
                    lines.push(prefixed(&body_indent, line));
                }
                body_indent
            }
        };

        for line in message_lines {
            lines.push(prefixed(&body_indent, line));
        }
    }

    fn push_gap(&self, lines: &mut Vec<SpanLine>) {
        for _ in 0..self.config.gap {
            lines.push(Vec::new());
        }
    }
}

fn indent(depth: usize) -> String {
    " ".repeat(depth * GROUP_INDENT)
}

fn prefixed(prefix: &str, line: SpanLine) -> SpanLine {
    let mut out = Vec::with_capacity(line.len() + 1);
    out.push(Span::new(prefix).no_wrap());
    out.extend(line);
    out
}
