use std::time::Instant;

use crate::core::value::Value;
use crate::terminal::KeyEvent;
use crate::widgets::components::list_editor::ListEditor;
use crate::widgets::traits::{
    ControlKind, DrawOutput, FocusMode, InteractionResult, InteractiveNode, RenderContext,
};

/// A field control. List editors get their own variant so the form can reach their
/// element operations without downcasting.
pub enum Node {
    Input(Box<dyn InteractiveNode>),
    List(Box<ListEditor>),
}

impl Node {
    pub fn input(input: impl InteractiveNode + 'static) -> Self {
        Self::Input(Box::new(input))
    }

    pub fn list(editor: ListEditor) -> Self {
        Self::List(Box::new(editor))
    }

    fn inner(&self) -> &dyn InteractiveNode {
        match self {
            Self::Input(w) => w.as_ref(),
            Self::List(w) => w.as_ref(),
        }
    }

    fn inner_mut(&mut self) -> &mut dyn InteractiveNode {
        match self {
            Self::Input(w) => w.as_mut(),
            Self::List(w) => w.as_mut(),
        }
    }

    pub fn id(&self) -> &str {
        self.inner().id()
    }

    pub fn label(&self) -> &str {
        self.inner().label()
    }

    pub fn draw(&self, ctx: &RenderContext) -> DrawOutput {
        self.inner().draw(ctx)
    }

    pub fn kind(&self) -> ControlKind {
        self.inner().kind()
    }

    pub fn focus_mode(&self) -> FocusMode {
        self.inner().focus_mode()
    }

    pub fn is_focusable(&self) -> bool {
        matches!(self.focus_mode(), FocusMode::Leaf | FocusMode::Group)
    }

    pub fn on_key(&mut self, key: KeyEvent) -> InteractionResult {
        self.inner_mut().on_key(key)
    }

    pub fn on_tick(&mut self, now: Instant) -> InteractionResult {
        self.inner_mut().on_tick(now)
    }

    pub fn value(&self) -> Option<Value> {
        self.inner().value()
    }

    pub fn set_value(&mut self, value: Value) {
        self.inner_mut().set_value(value);
    }

    pub fn is_capturing(&self) -> bool {
        self.inner().is_capturing()
    }

    pub fn as_list(&self) -> Option<&ListEditor> {
        match self {
            Self::List(editor) => Some(editor),
            Self::Input(_) => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut ListEditor> {
        match self {
            Self::List(editor) => Some(editor),
            Self::Input(_) => None,
        }
    }
}
