pub mod list_editor;
