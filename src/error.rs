use thiserror::Error;

use crate::core::value_path::ValuePath;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("unsupported type shape at '{path}': {reason}")]
    UnsupportedShape { path: String, reason: String },

    #[error("'{path}': {feature} is not implemented")]
    NotImplemented { path: String, feature: String },

    #[error("'{path}': {value:?} is not a variant of {enum_name}")]
    InvalidEnumValue {
        path: String,
        enum_name: String,
        value: String,
    },

    #[error("cannot default-construct {model}: no default for {}", .missing.join(", "))]
    DefaultConstruction { model: String, missing: Vec<String> },

    #[error("'{path}': {message}")]
    FieldValidation { path: String, message: String },

    #[error("form has invalid fields: {}", .invalid.join(", "))]
    FormValidation { invalid: Vec<String> },

    #[error("cannot assign to '{path}': {reason}")]
    Assignment { path: String, reason: String },

    #[error("no field registered at '{0}'")]
    UnknownField(String),

    #[error("invalid form configuration: {0}")]
    Config(String),
}

impl FormError {
    pub(crate) fn unsupported(reason: impl Into<String>) -> Self {
        Self::UnsupportedShape {
            path: String::new(),
            reason: reason.into(),
        }
    }

    /// Attaches the field path to shape errors raised before the path was known.
    pub(crate) fn at(self, path: &ValuePath) -> Self {
        match self {
            Self::UnsupportedShape { path: p, reason } if p.is_empty() => Self::UnsupportedShape {
                path: path.to_string(),
                reason,
            },
            Self::NotImplemented { path: p, feature } if p.is_empty() => Self::NotImplemented {
                path: path.to_string(),
                feature,
            },
            other => other,
        }
    }

    /// User-facing text for message controls.
    pub fn user_message(&self) -> String {
        match self {
            Self::FieldValidation { message, .. } => message.clone(),
            Self::Assignment { reason, .. } => reason.clone(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FormError>;
