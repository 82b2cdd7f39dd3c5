use crate::config::ControlStyle;
use crate::core::value::Value;
use crate::core::value_path::ValuePath;
use crate::runtime::event::{ValueChange, WidgetAction};
use crate::terminal::KeyEvent;
use crate::ui::span::{Span, SpanLine, line_text};
use std::time::Instant;

// ---------------------------------------------------------------------------
// Focus & control kinds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusMode {
    /// Node does not participate in focus cycling.
    None,
    /// A single focusable leaf (text input, toggle, button, …).
    Leaf,
    /// A component that manages focus internally (list editor with an open sub-form).
    Group,
}

/// What a control is, independent of its current value. The control factory's output
/// is checked against this in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    TextInput,
    Stepper,
    Toggle,
    Checkbox,
    DatePicker,
    RadioGroup,
    Dropdown,
    ListEditor,
    Button,
    Message,
}

// ---------------------------------------------------------------------------
// Render context & output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    pub focused_id: Option<String>,
    pub control_style: ControlStyle,
    pub control_width: Option<usize>,
}

impl RenderContext {
    pub fn new(control_style: ControlStyle, control_width: Option<usize>) -> Self {
        Self {
            focused_id: None,
            control_style,
            control_width,
        }
    }

    pub fn with_focus(mut self, id: impl Into<String>) -> Self {
        self.focused_id = Some(id.into());
        self
    }

    pub fn is_focused(&self, id: &str) -> bool {
        self.focused_id.as_deref() == Some(id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DrawOutput {
    pub lines: Vec<SpanLine>,
}

impl DrawOutput {
    pub fn plain_lines(lines: Vec<String>) -> Self {
        Self {
            lines: lines
                .into_iter()
                .map(|line| vec![Span::new(line).no_wrap()])
                .collect(),
        }
    }

    pub fn single(line: SpanLine) -> Self {
        Self { lines: vec![line] }
    }

    /// Unstyled text of every line.
    pub fn text_lines(&self) -> Vec<String> {
        self.lines.iter().map(|line| line_text(line)).collect()
    }
}

// ---------------------------------------------------------------------------
// Drawable — every node can draw itself
// ---------------------------------------------------------------------------

pub trait Drawable: Send {
    fn id(&self) -> &str;
    fn label(&self) -> &str {
        ""
    }
    fn draw(&self, ctx: &RenderContext) -> DrawOutput;
}

// ---------------------------------------------------------------------------
// InteractionResult
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct InteractionResult {
    pub handled: bool,
    pub request_render: bool,
    pub actions: Vec<WidgetAction>,
}

impl InteractionResult {
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn consumed() -> Self {
        Self {
            handled: true,
            request_render: false,
            actions: Vec::new(),
        }
    }

    pub fn handled() -> Self {
        Self {
            handled: true,
            request_render: true,
            actions: Vec::new(),
        }
    }

    pub fn with_action(action: WidgetAction) -> Self {
        Self {
            handled: true,
            request_render: true,
            actions: vec![action],
        }
    }

    pub fn input_done() -> Self {
        Self::with_action(WidgetAction::InputDone)
    }

    /// Change notification for the bound field, or a plain re-render when the control
    /// is not bound.
    pub fn value_changed(target: Option<&ValuePath>, value: Value) -> Self {
        match target {
            Some(target) => Self::with_action(WidgetAction::ValueChanged {
                change: ValueChange::new(target.clone(), value),
            }),
            None => Self::handled(),
        }
    }

    pub fn merge(&mut self, other: Self) {
        self.handled |= other.handled;
        self.request_render |= other.request_render;
        self.actions.extend(other.actions);
    }
}

// ---------------------------------------------------------------------------
// Interactive — input nodes
// ---------------------------------------------------------------------------

pub trait Interactive: Send {
    fn kind(&self) -> ControlKind;

    fn focus_mode(&self) -> FocusMode {
        FocusMode::Leaf
    }

    fn on_key(&mut self, key: KeyEvent) -> InteractionResult;

    fn on_tick(&mut self, _now: Instant) -> InteractionResult {
        InteractionResult::ignored()
    }

    // --- value ---

    /// Current assignable value; `None` means the control holds nothing to assign.
    fn value(&self) -> Option<Value> {
        None
    }
    fn set_value(&mut self, _value: Value) {}

    /// True while the control captures every key (an open dropdown or sub-form).
    fn is_capturing(&self) -> bool {
        false
    }
}

// ---------------------------------------------------------------------------
// InteractiveNode — combined bound used in Node
// ---------------------------------------------------------------------------

pub trait InteractiveNode: Drawable + Interactive {}
impl<T> InteractiveNode for T where T: Drawable + Interactive {}
