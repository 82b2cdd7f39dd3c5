//! The form widget: controls generated from a model declaration, bound to a working copy
//! of a value and committed on submit.

pub mod factory;
pub mod layout;
pub mod registry;
pub mod render;
pub mod submit;
pub mod working_copy;

#[cfg(test)]
mod tests;

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::config::FormConfig;
use crate::core::NodeId;
use crate::core::value::Value;
use crate::core::value_path::ValuePath;
use crate::error::{FormError, Result};
use crate::runtime::event::WidgetAction;
use crate::schema::ModelDecl;
use crate::terminal::{KeyCode, KeyEvent};
use crate::widgets::components::list_editor::ListEditor;
use crate::widgets::inputs::button::SubmitButton;
use crate::widgets::outputs::message::MessageLine;
use crate::widgets::traits::{DrawOutput, Drawable, FocusMode, InteractionResult, Interactive};

pub use factory::{ControlFactory, control_kind_for};
pub use layout::LayoutItem;
pub use registry::{FieldEntry, FieldRegistry};
pub use submit::{SubmissionController, SubmitState};
pub use working_copy::{ValidationOutcome, WorkingCopy};

/// Payload of the submit notification.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitEvent {
    pub form_id: NodeId,
    pub value: Value,
}

pub type SubmitHandler = Box<dyn FnMut(&SubmitEvent) + Send>;

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The committed bound value.
    Committed(Value),
    /// Validation failed; nothing was committed and no notification was sent.
    Rejected(FormError),
}

pub struct FormBuilder {
    model: Arc<ModelDecl>,
    value: Option<Value>,
    config: FormConfig,
    id: Option<NodeId>,
    on_submit: Option<SubmitHandler>,
}

impl FormBuilder {
    pub fn new(model: Arc<ModelDecl>) -> Self {
        Self {
            model,
            value: None,
            config: FormConfig::default(),
            id: None,
            on_submit: None,
        }
    }

    /// Value to bind. Without one the form default-constructs an instance.
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_config(mut self, config: FormConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_id(mut self, id: impl Into<NodeId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn on_submit<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&SubmitEvent) + Send + 'static,
    {
        self.on_submit = Some(Box::new(handler));
        self
    }

    pub fn build(self) -> Result<Form> {
        let Self {
            model,
            value,
            config,
            id,
            on_submit,
        } = self;

        let id = id.unwrap_or_else(|| NodeId::new(model.name().to_lowercase()));
        let bound = match value {
            Some(value) => model.normalize(value)?,
            None => model.default_value()?,
        };

        let mut registry = FieldRegistry::new();
        let layout = ControlFactory::new(&id, &config).build_record(
            &model,
            &bound,
            &ValuePath::empty(),
            &mut registry,
        )?;
        debug!("built form '{id}' with {} fields", registry.len());

        Ok(Form {
            submit_button: SubmitButton::new(
                id.suffixed("submit").into_inner(),
                config.submit_label.clone(),
            ),
            invalid_message: MessageLine::new(id.suffixed("invalid").into_inner()),
            controller: SubmissionController::new(config.feedback_duration()),
            working: WorkingCopy::new(bound, config.autosave),
            id,
            model,
            config,
            registry,
            layout,
            on_submit,
            focus: 0,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FocusTarget {
    Field(ValuePath),
    Submit,
}

pub struct Form {
    id: NodeId,
    model: Arc<ModelDecl>,
    config: FormConfig,
    registry: FieldRegistry,
    layout: Vec<LayoutItem>,
    working: WorkingCopy,
    submit_button: SubmitButton,
    invalid_message: MessageLine,
    controller: SubmissionController,
    on_submit: Option<SubmitHandler>,
    focus: usize,
}

impl Form {
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn model(&self) -> &ModelDecl {
        &self.model
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    /// The bound value. Without autosave it changes only on a successful submit.
    pub fn value(&self) -> &Value {
        self.working.bound()
    }

    /// The value with every accepted in-progress edit applied.
    pub fn working_copy(&self) -> &Value {
        self.working.current()
    }

    pub fn layout(&self) -> &[LayoutItem] {
        &self.layout
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    pub fn field(&self, path: &ValuePath) -> Result<&FieldEntry> {
        self.registry.lookup(path)
    }

    pub fn submit_button(&self) -> &SubmitButton {
        &self.submit_button
    }

    /// The form-wide message shown after a rejected submit.
    pub fn invalid_message(&self) -> &MessageLine {
        &self.invalid_message
    }

    pub fn submit_state(&self) -> SubmitState {
        self.controller.state()
    }

    pub fn is_submit_enabled(&self) -> bool {
        self.submit_button.is_enabled()
    }

    pub fn set_submit_enabled(&mut self, enabled: bool) {
        self.submit_button.set_enabled(enabled);
    }

    // --- fields ---

    /// Validates `raw` for the field at `path` and writes it into the working copy.
    pub fn set_field(&mut self, path: &ValuePath, raw: Value) -> Result<ValidationOutcome> {
        let entry = self.registry.lookup_mut(path)?;
        Ok(self
            .working
            .set_field(entry, raw, &self.config.default_error_message))
    }

    /// Puts `value` into the field's control, then applies the control's value the same
    /// way an edit would.
    pub fn set_control_value(&mut self, path: &ValuePath, value: Value) -> Result<ValidationOutcome> {
        let entry = self.registry.lookup_mut(path)?;
        entry.control.set_value(value.clone());
        let raw = entry.control.value().unwrap_or(value);
        self.set_field(path, raw)
    }

    /// Re-validates every field from its control and returns the failing paths.
    pub fn validate_all(&mut self) -> Vec<ValuePath> {
        self.working
            .validate_all(&mut self.registry, &self.config.default_error_message)
    }

    // --- submission ---

    pub fn submit(&mut self) -> SubmitOutcome {
        self.submit_at(Instant::now())
    }

    /// Validates every field; commits and notifies when all pass, otherwise marks the
    /// submit action failed until the feedback window ends.
    pub fn submit_at(&mut self, now: Instant) -> SubmitOutcome {
        self.controller.begin(now);
        let invalid = self.validate_all();

        if !invalid.is_empty() {
            let invalid: Vec<String> = invalid.iter().map(ToString::to_string).collect();
            warn!("form '{}' rejected: invalid {}", self.id, invalid.join(", "));
            self.controller.reject(now);
            self.submit_button.set_failed(true);
            self.invalid_message.show(self.config.invalid_message.clone());
            return SubmitOutcome::Rejected(FormError::FormValidation { invalid });
        }

        self.working.commit();
        self.controller.accept();
        self.submit_button.set_failed(false);
        self.invalid_message.hide();

        let value = self.working.bound().clone();
        info!("form '{}' submitted", self.id);
        if let Some(handler) = self.on_submit.as_mut() {
            handler(&SubmitEvent {
                form_id: self.id.clone(),
                value: value.clone(),
            });
        }
        SubmitOutcome::Committed(value)
    }

    /// Advances timed state. Returns true when anything needs a redraw.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        if self.controller.tick(now) {
            self.submit_button.set_failed(false);
            self.invalid_message.hide();
            changed = true;
        }
        for entry in self.registry.iter_mut() {
            changed |= entry.control.on_tick(now).request_render;
        }
        changed
    }

    /// How long the event loop may wait before the next `tick` is due.
    pub fn poll_timeout(&self, now: Instant, default_timeout: Duration) -> Duration {
        let mut timeout = self.controller.poll_timeout(now, default_timeout);
        for entry in self.registry.iter() {
            if let Some(form) = entry.control.as_list().and_then(ListEditor::panel_form) {
                timeout = timeout.min(form.poll_timeout(now, default_timeout));
            }
        }
        timeout
    }

    // --- list fields ---

    pub fn list_editor(&self, path: &ValuePath) -> Result<&ListEditor> {
        self.registry
            .lookup(path)?
            .control
            .as_list()
            .ok_or_else(|| not_a_list(path))
    }

    pub fn list_editor_mut(&mut self, path: &ValuePath) -> Result<&mut ListEditor> {
        self.registry
            .lookup_mut(path)?
            .control
            .as_list_mut()
            .ok_or_else(|| not_a_list(path))
    }

    /// Appends a default element to the list at `path` and opens its sub-form.
    pub fn list_add(&mut self, path: &ValuePath) -> Result<usize> {
        let index = self.list_editor_mut(path)?.add()?;
        self.sync_list(path)?;
        Ok(index)
    }

    pub fn list_select(&mut self, path: &ValuePath, index: usize) -> Result<()> {
        self.list_editor_mut(path)?.select(index)
    }

    pub fn list_delete(&mut self, path: &ValuePath, index: usize) -> Result<Value> {
        let removed = self.list_editor_mut(path)?.delete(index)?;
        self.sync_list(path)?;
        Ok(removed)
    }

    pub fn list_dismiss(&mut self, path: &ValuePath) -> Result<bool> {
        Ok(self.list_editor_mut(path)?.dismiss())
    }

    /// Submits the open sub-form of the list at `path`. `None` when no sub-form is open.
    ///
    /// A committed element is written into the bound value in place as well as the
    /// working copy, so it survives even if this form is never submitted.
    pub fn list_submit_open(
        &mut self,
        path: &ValuePath,
        now: Instant,
    ) -> Result<Option<SubmitOutcome>> {
        let editor = self.list_editor_mut(path)?;
        let index = editor.open_index();
        let outcome = editor.submit_panel(now);
        if let (Some(index), Some(SubmitOutcome::Committed(element))) = (index, &outcome) {
            self.sync_list(path)?;
            self.working.write_element(path, index, element.clone());
        }
        Ok(outcome)
    }

    fn sync_list(&mut self, path: &ValuePath) -> Result<ValidationOutcome> {
        let items = self.list_editor(path)?.value().unwrap_or_default();
        self.set_field(path, items)
    }

    // --- focus & keys ---

    fn focus_targets(&self) -> Vec<FocusTarget> {
        let mut targets: Vec<FocusTarget> = layout::field_order(&self.layout)
            .into_iter()
            .filter(|path| {
                self.registry
                    .get(path)
                    .is_some_and(|entry| entry.control.is_focusable())
            })
            .map(FocusTarget::Field)
            .collect();
        if self.config.show_submit_button && self.submit_button.focus_mode() != FocusMode::None {
            targets.push(FocusTarget::Submit);
        }
        targets
    }

    fn current_target(&self) -> Option<FocusTarget> {
        let targets = self.focus_targets();
        let last = targets.len().checked_sub(1)?;
        targets.into_iter().nth(self.focus.min(last))
    }

    /// Path of the focused field; `None` when the submit action has focus.
    pub fn focused_path(&self) -> Option<ValuePath> {
        match self.current_target()? {
            FocusTarget::Field(path) => Some(path),
            FocusTarget::Submit => None,
        }
    }

    pub fn focus_field(&mut self, path: &ValuePath) -> Result<()> {
        let position = self
            .focus_targets()
            .iter()
            .position(|target| matches!(target, FocusTarget::Field(p) if p == path))
            .ok_or_else(|| FormError::UnknownField(path.to_string()))?;
        self.focus = position;
        Ok(())
    }

    fn focused_id(&self) -> Option<String> {
        match self.current_target()? {
            FocusTarget::Field(path) => self
                .registry
                .get(&path)
                .map(|entry| entry.control.id().to_string()),
            FocusTarget::Submit => Some(self.submit_button.id().to_string()),
        }
    }

    fn move_focus(&mut self, forward: bool, wrap: bool) -> bool {
        let len = self.focus_targets().len();
        if len == 0 {
            return false;
        }
        let current = self.focus.min(len - 1);
        let next = match (forward, wrap) {
            (true, _) if current + 1 < len => current + 1,
            (true, true) => 0,
            (false, _) if current > 0 => current - 1,
            (false, true) => len - 1,
            _ => return false,
        };
        self.focus = next;
        true
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> InteractionResult {
        self.handle_key_at(key, Instant::now())
    }

    /// Routes a key to the focused control and applies the actions it emits. Tab and
    /// BackTab move focus unless the control is capturing; Up/Down move focus when the
    /// control leaves them unhandled.
    pub fn handle_key_at(&mut self, key: KeyEvent, now: Instant) -> InteractionResult {
        let Some(target) = self.current_target() else {
            return InteractionResult::ignored();
        };
        let capturing = match &target {
            FocusTarget::Field(path) => self
                .registry
                .get(path)
                .is_some_and(|entry| entry.control.is_capturing()),
            FocusTarget::Submit => false,
        };

        if !capturing {
            match key.code {
                KeyCode::Tab => {
                    self.move_focus(true, true);
                    return InteractionResult::handled();
                }
                KeyCode::BackTab => {
                    self.move_focus(false, true);
                    return InteractionResult::handled();
                }
                _ => {}
            }
        }

        let result = match &target {
            FocusTarget::Field(path) => match self.registry.lookup_mut(path) {
                Ok(entry) => entry.control.on_key(key),
                Err(_) => InteractionResult::ignored(),
            },
            FocusTarget::Submit => self.submit_button.on_key(key),
        };

        if !result.handled && !capturing {
            let moved = match key.code {
                KeyCode::Down => self.move_focus(true, false),
                KeyCode::Up => self.move_focus(false, false),
                _ => false,
            };
            if moved {
                return InteractionResult::handled();
            }
        }

        self.apply_actions(result, now)
    }

    fn apply_actions(&mut self, result: InteractionResult, now: Instant) -> InteractionResult {
        let mut out = InteractionResult {
            handled: result.handled,
            request_render: result.request_render,
            actions: Vec::new(),
        };
        for action in result.actions {
            match action {
                WidgetAction::ValueChanged { change } => {
                    if let Err(err) = self.set_field(&change.target, change.value) {
                        warn!("dropping change for '{}': {err}", change.target);
                    }
                    out.request_render = true;
                }
                WidgetAction::InputDone => {
                    self.move_focus(true, false);
                    out.request_render = true;
                }
                WidgetAction::SubmitRequested => {
                    if let SubmitOutcome::Committed(value) = self.submit_at(now) {
                        out.actions.push(WidgetAction::Submitted { value });
                    }
                    out.request_render = true;
                }
                WidgetAction::ElementCommitted { list, index, value } => {
                    self.working.write_element(&list, index, value);
                    out.request_render = true;
                }
                WidgetAction::Submitted { .. } => out.actions.push(action),
            }
        }
        out
    }

    pub fn draw(&self) -> DrawOutput {
        let focused_id = self.focused_id();
        render::FormView {
            config: &self.config,
            layout: &self.layout,
            registry: &self.registry,
            focused_id: focused_id.as_deref(),
            submit_button: self.config.show_submit_button.then_some(&self.submit_button),
            invalid_message: &self.invalid_message,
        }
        .render()
    }
}

fn not_a_list(path: &ValuePath) -> FormError {
    FormError::UnsupportedShape {
        path: path.to_string(),
        reason: "field is not a list of records".to_string(),
    }
}
