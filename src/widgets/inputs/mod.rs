pub mod button;
pub mod choice;
pub mod date;
pub mod select;
pub mod stepper;
pub mod text;
pub mod text_edit;
pub mod toggle;
