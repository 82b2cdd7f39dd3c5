use log::{debug, warn};

use crate::core::value::{Value, ValueMap};
use crate::core::value_path::ValuePath;
use crate::error::FormError;
use crate::form::registry::{FieldEntry, FieldRegistry};
use crate::schema::capitalize;
use crate::schema::coerce::coerce;

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// The value that was written into the working copy.
    Valid(Value),
    Invalid(FormError),
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

/// In-progress edits of a bound value. Without autosave the edits land in a separate
/// copy until `commit`; with autosave they land in the bound value itself.
#[derive(Debug, Clone)]
pub struct WorkingCopy {
    bound: Value,
    working: Option<Value>,
}

impl WorkingCopy {
    pub fn new(bound: Value, autosave: bool) -> Self {
        let working = (!autosave).then(|| bound.clone());
        Self { bound, working }
    }

    pub fn is_autosave(&self) -> bool {
        self.working.is_none()
    }

    /// The value edits are applied to.
    pub fn current(&self) -> &Value {
        self.working.as_ref().unwrap_or(&self.bound)
    }

    fn current_mut(&mut self) -> &mut Value {
        self.working.as_mut().unwrap_or(&mut self.bound)
    }

    pub fn bound(&self) -> &Value {
        &self.bound
    }

    /// The whole working copy as an attribute mapping, as handed to validation rules.
    pub fn as_mapping(&self) -> ValueMap {
        self.current().as_object().cloned().unwrap_or_default()
    }

    /// Validates `raw` for the field and, when valid, writes it at the field's path.
    /// The field's message line is shown or hidden to match the outcome.
    pub fn set_field(
        &mut self,
        entry: &mut FieldEntry,
        raw: Value,
        default_message: &str,
    ) -> ValidationOutcome {
        let outcome = self.apply(entry, raw, default_message);
        match &outcome {
            ValidationOutcome::Valid(value) => {
                debug!("field '{}' set to {value}", entry.path);
                entry.message.hide();
            }
            ValidationOutcome::Invalid(err) => {
                debug!("field '{}' rejected: {err}", entry.path);
                entry.message.show(err.user_message());
            }
        }
        outcome
    }

    fn apply(&mut self, entry: &FieldEntry, raw: Value, default_message: &str) -> ValidationOutcome {
        let fallback = || {
            entry
                .description
                .clone()
                .unwrap_or_else(|| default_message.to_string())
        };
        let invalid = |message: String| {
            ValidationOutcome::Invalid(FormError::FieldValidation {
                path: entry.path.to_string(),
                message,
            })
        };

        let corrected = match &entry.rule {
            Some(rule) => {
                let mapping = self.as_mapping();
                match rule(&raw, &mapping, &entry.path, entry.owner.as_ref()) {
                    Ok(value) => value,
                    Err(message) if message.trim().is_empty() => return invalid(fallback()),
                    Err(message) => return invalid(capitalize(message.trim())),
                }
            }
            None => raw,
        };

        let value = match coerce(&entry.kind, corrected) {
            Ok(value) => value,
            Err(reason) => {
                debug!("coercion failed for '{}': {reason}", entry.path);
                return invalid(fallback());
            }
        };

        match self.current_mut().assign_path(&entry.path, value.clone()) {
            Ok(_) => ValidationOutcome::Valid(value),
            Err(err) => {
                warn!("cannot assign '{}': {err}", entry.path);
                ValidationOutcome::Invalid(FormError::Assignment {
                    path: entry.path.to_string(),
                    reason: err.to_string(),
                })
            }
        }
    }

    /// Re-runs `set_field` for every registered field with its control's current value
    /// and returns the paths that failed. Controls without a value are skipped.
    pub fn validate_all(
        &mut self,
        registry: &mut FieldRegistry,
        default_message: &str,
    ) -> Vec<ValuePath> {
        let mut invalid = Vec::new();
        for entry in registry.iter_mut() {
            let Some(raw) = entry.control.value() else {
                continue;
            };
            if !self.set_field(entry, raw, default_message).is_valid() {
                invalid.push(entry.path.clone());
            }
        }
        invalid
    }

    /// Writes a committed list element straight into the bound value at `list[index]`,
    /// bypassing the working copy. Elements added since the last commit have no slot in
    /// the bound value yet and are left to the next commit.
    pub fn write_element(&mut self, list: &ValuePath, index: usize, element: Value) -> bool {
        match self.bound.assign_path(&list.index(index), element) {
            Ok(_) => {
                debug!("wrote '{list}[{index}]' into the bound value");
                true
            }
            Err(err) => {
                debug!("'{list}[{index}]' waits for commit: {err}");
                false
            }
        }
    }

    /// Copies every top-level attribute of the working copy onto the bound value.
    /// Does nothing in autosave mode.
    pub fn commit(&mut self) {
        let Some(working) = &self.working else {
            return;
        };
        match (&mut self.bound, working) {
            (Value::Object(bound), Value::Object(working)) => {
                for (key, value) in working {
                    bound.insert(key.clone(), value.clone());
                }
            }
            (bound, working) => *bound = working.clone(),
        }
    }
}
