pub mod config;
pub mod core;
pub mod error;
pub mod form;
pub mod runtime;
pub mod schema;
pub mod terminal;
pub mod ui;
pub mod widgets;

pub use config::FormConfig;
pub use core::value;
pub use core::value_path;
pub use error::{FormError, Result};
pub use form::{Form, FormBuilder, SubmitEvent, SubmitOutcome};
pub use schema::{Attribute, DeclaredType, EnumDecl, ModelDecl};
pub use widgets::validators;
