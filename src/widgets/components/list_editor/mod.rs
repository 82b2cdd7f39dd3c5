//! Editor for a list of nested records: one row per element, with a modal sub-form
//! for the selected element.

mod panel;

pub use panel::{Panel, PanelStack};

use std::sync::Arc;
use std::time::Instant;

use log::debug;

use crate::config::FormConfig;
use crate::core::NodeId;
use crate::core::value::Value;
use crate::core::value_path::ValuePath;
use crate::error::{FormError, Result};
use crate::form::{Form, FormBuilder, SubmitOutcome};
use crate::runtime::event::WidgetAction;
use crate::schema::ModelDecl;
use crate::terminal::{KeyCode, KeyEvent};
use crate::ui::span::Span;
use crate::ui::style::Style;
use crate::widgets::base::InputBase;
use crate::widgets::traits::{
    ControlKind, DrawOutput, Drawable, FocusMode, InteractionResult, Interactive, RenderContext,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub index: usize,
    pub text: String,
}

pub struct ListEditor {
    base: InputBase,
    element: Arc<ModelDecl>,
    config: FormConfig,
    items: Vec<Value>,
    cursor: usize,
    panels: PanelStack,
    last_error: Option<String>,
}

impl ListEditor {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        element: Arc<ModelDecl>,
        items: Vec<Value>,
        config: FormConfig,
    ) -> Self {
        Self {
            base: InputBase::new(id, label),
            element,
            config: config.for_subform(),
            items,
            cursor: 0,
            panels: PanelStack::default(),
            last_error: None,
        }
    }

    pub fn with_change_target(mut self, target: ValuePath) -> Self {
        self.base.set_change_target(target);
        self
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn element(&self) -> &ModelDecl {
        &self.element
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Index of the element whose sub-form is open.
    pub fn open_index(&self) -> Option<usize> {
        self.panels.active().map(|panel| panel.index)
    }

    pub fn panel_form(&self) -> Option<&Form> {
        self.panels.active().map(|panel| &panel.form)
    }

    pub fn panel_form_mut(&mut self) -> Option<&mut Form> {
        self.panels.active_mut().map(|panel| &mut panel.form)
    }

    pub fn render_rows(&self) -> Vec<ListRow> {
        self.items
            .iter()
            .enumerate()
            .map(|(index, item)| ListRow {
                index,
                text: self.element.display(item),
            })
            .collect()
    }

    /// Opens the sub-form for the element at `index`.
    pub fn select(&mut self, index: usize) -> Result<()> {
        let Some(item) = self.items.get(index) else {
            return Err(self.no_element(index));
        };
        let form = self.sub_form(index, item)?;
        self.open_panel(index, form);
        Ok(())
    }

    fn sub_form(&self, index: usize, item: &Value) -> Result<Form> {
        FormBuilder::new(self.element.clone())
            .with_value(item.clone())
            .with_config(self.config.clone())
            .with_id(NodeId::new(self.base.id()).suffixed(&format!("item{index}")))
            .build()
    }

    fn open_panel(&mut self, index: usize, form: Form) {
        debug!("opening sub-form for {}[{index}]", self.base.id());
        self.panels.open(Panel { index, form });
        self.cursor = index;
        self.last_error = None;
    }

    pub fn delete(&mut self, index: usize) -> Result<Value> {
        if index >= self.items.len() {
            return Err(self.no_element(index));
        }
        let removed = self.items.remove(index);
        self.panels.close_index(index);
        self.panels.shift_after_removal(index);
        self.cursor = self.cursor.min(self.items.len());
        debug!("deleted {}[{index}]", self.base.id());
        Ok(removed)
    }

    /// Appends a default element and opens its sub-form. The list is unchanged when
    /// either step fails.
    pub fn add(&mut self) -> Result<usize> {
        let value = self.element.default_value()?;
        let index = self.items.len();
        let form = self.sub_form(index, &value)?;
        self.items.push(value);
        self.open_panel(index, form);
        Ok(index)
    }

    /// Closes the open sub-form without writing it back.
    pub fn dismiss(&mut self) -> bool {
        self.panels.close_top().is_some()
    }

    /// Submits the open sub-form; a committed element replaces the list entry and the
    /// panel closes.
    pub fn submit_panel(&mut self, now: Instant) -> Option<SubmitOutcome> {
        let panel = self.panels.active_mut()?;
        let index = panel.index;
        let outcome = panel.form.submit_at(now);
        if let SubmitOutcome::Committed(value) = &outcome {
            self.accept(index, value.clone());
        }
        Some(outcome)
    }

    fn accept(&mut self, index: usize, value: Value) {
        if let Some(slot) = self.items.get_mut(index) {
            *slot = value;
        }
        self.panels.close_index(index);
        debug!("wrote back {}[{index}]", self.base.id());
    }

    fn no_element(&self, index: usize) -> FormError {
        FormError::Assignment {
            path: self.base.change_target().map(ToString::to_string).unwrap_or_default(),
            reason: format!("no element at index {index}"),
        }
    }

    fn changed(&self) -> InteractionResult {
        InteractionResult::value_changed(self.base.change_target(), Value::List(self.items.clone()))
    }

    fn add_from_key(&mut self) -> InteractionResult {
        match self.add() {
            Ok(_) => self.changed(),
            Err(err) => {
                self.last_error = Some(err.user_message());
                InteractionResult::handled()
            }
        }
    }

    fn on_panel_key(&mut self, key: KeyEvent) -> InteractionResult {
        let Some(panel) = self.panels.active_mut() else {
            return InteractionResult::ignored();
        };
        let index = panel.index;
        let result = panel.form.handle_key(key);

        let submitted = result.actions.iter().find_map(|action| match action {
            WidgetAction::Submitted { value } => Some(value.clone()),
            _ => None,
        });
        if let Some(value) = submitted {
            self.accept(index, value.clone());
            let mut result = self.changed();
            if let Some(list) = self.base.change_target() {
                result.actions.push(WidgetAction::ElementCommitted {
                    list: list.clone(),
                    index,
                    value,
                });
            }
            return result;
        }
        if !result.handled && key.code == KeyCode::Esc {
            self.dismiss();
        }
        InteractionResult::handled()
    }
}

impl Drawable for ListEditor {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn label(&self) -> &str {
        self.base.label()
    }

    fn draw(&self, ctx: &RenderContext) -> DrawOutput {
        let focused = self.base.is_focused(ctx) && self.panels.is_empty();
        let open = self.open_index();
        let mut lines = Vec::new();

        for row in self.render_rows() {
            let at_cursor = focused && row.index == self.cursor;
            let (marker, style) = if at_cursor {
                ("› ", Style::focused())
            } else if open == Some(row.index) {
                ("▸ ", Style::label())
            } else {
                ("  ", Style::default())
            };
            lines.push(vec![
                Span::styled(marker, style).no_wrap(),
                Span::styled(row.text, style).no_wrap(),
                Span::styled("  ✕  ›", Style::hint()).no_wrap(),
            ]);
        }

        let add_style = if focused && self.cursor == self.items.len() {
            Style::focused()
        } else {
            Style::hint()
        };
        let add_marker = if focused && self.cursor == self.items.len() {
            "› "
        } else {
            "  "
        };
        lines.push(vec![
            Span::styled(add_marker, add_style).no_wrap(),
            Span::styled("+ Add", add_style).no_wrap(),
        ]);

        if let Some(error) = &self.last_error {
            lines.push(vec![Span::styled(error.clone(), Style::error())]);
        }

        if let Some(panel) = self.panels.active() {
            for line in panel.form.draw().lines {
                let mut indented = vec![Span::styled("│ ", Style::hint()).no_wrap()];
                indented.extend(line);
                lines.push(indented);
            }
        }

        DrawOutput { lines }
    }
}

impl Interactive for ListEditor {
    fn kind(&self) -> ControlKind {
        ControlKind::ListEditor
    }

    fn focus_mode(&self) -> FocusMode {
        if self.panels.is_empty() {
            FocusMode::Leaf
        } else {
            FocusMode::Group
        }
    }

    fn on_key(&mut self, key: KeyEvent) -> InteractionResult {
        if !self.panels.is_empty() {
            return self.on_panel_key(key);
        }
        match key.code {
            KeyCode::Up if self.cursor > 0 => {
                self.cursor -= 1;
                InteractionResult::handled()
            }
            KeyCode::Down if self.cursor < self.items.len() => {
                self.cursor += 1;
                InteractionResult::handled()
            }
            KeyCode::Enter | KeyCode::Right if self.cursor < self.items.len() => {
                if let Err(err) = self.select(self.cursor) {
                    self.last_error = Some(err.user_message());
                }
                InteractionResult::handled()
            }
            KeyCode::Enter => self.add_from_key(),
            KeyCode::Char('+') | KeyCode::Char('a') => self.add_from_key(),
            KeyCode::Delete | KeyCode::Char('d') if self.cursor < self.items.len() => {
                match self.delete(self.cursor) {
                    Ok(_) => self.changed(),
                    Err(_) => InteractionResult::ignored(),
                }
            }
            _ => InteractionResult::ignored(),
        }
    }

    fn on_tick(&mut self, now: Instant) -> InteractionResult {
        let Some(panel) = self.panels.active_mut() else {
            return InteractionResult::ignored();
        };
        if panel.form.tick(now) {
            InteractionResult::handled()
        } else {
            InteractionResult::ignored()
        }
    }

    fn value(&self) -> Option<Value> {
        Some(Value::List(self.items.clone()))
    }

    fn set_value(&mut self, value: Value) {
        if let Value::List(items) = value {
            self.items = items;
            while self.panels.close_top().is_some() {}
            self.cursor = self.cursor.min(self.items.len());
        }
    }

    fn is_capturing(&self) -> bool {
        !self.panels.is_empty()
    }
}
