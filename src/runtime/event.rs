use crate::core::value::Value;
use crate::core::value_path::ValuePath;

#[derive(Debug, Clone, PartialEq)]
pub struct ValueChange {
    pub target: ValuePath,
    pub value: Value,
}

impl ValueChange {
    pub fn new(target: ValuePath, value: Value) -> Self {
        Self { target, value }
    }
}

/// Actions emitted by widgets in `InteractionResult`.
/// These flow upward from controls to the form that owns them.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetAction {
    ValueChanged { change: ValueChange },
    /// Control is done with its value; the form moves focus to the next field.
    InputDone,
    /// The submit button was activated.
    SubmitRequested,
    /// A form committed successfully; carries the committed value.
    Submitted { value: Value },
    /// A list element's sub-form committed. The element is written into the owning
    /// form's bound value in place, without waiting for that form's own submit.
    ElementCommitted {
        list: ValuePath,
        index: usize,
        value: Value,
    },
}

/// Timed events a form schedules for itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    /// End of the rejected-submit feedback window.
    RevertSubmitFeedback,
}
