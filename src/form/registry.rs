use std::sync::Arc;

use indexmap::IndexMap;

use crate::core::value_path::ValuePath;
use crate::error::{FormError, Result};
use crate::schema::resolve::ResolvedKind;
use crate::schema::{ModelDecl, ValidationRule};
use crate::widgets::node::Node;
use crate::widgets::outputs::message::MessageLine;

/// A registered leaf field: its control, its message line and its rule.
pub struct FieldEntry {
    pub path: ValuePath,
    pub control: Node,
    pub message: MessageLine,
    pub rule: Option<ValidationRule>,
    pub kind: ResolvedKind,
    /// Record declaration that owns the attribute; passed to the rule.
    pub owner: Arc<ModelDecl>,
    pub label: String,
    pub description: Option<String>,
}

/// Field paths to live controls, in construction order.
#[derive(Default)]
pub struct FieldRegistry {
    entries: IndexMap<ValuePath, FieldEntry>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a leaf field; each path is registered exactly once.
    pub fn register(&mut self, entry: FieldEntry) -> Result<()> {
        if self.entries.contains_key(&entry.path) {
            return Err(FormError::Assignment {
                path: entry.path.to_string(),
                reason: "field is already registered".to_string(),
            });
        }
        self.entries.insert(entry.path.clone(), entry);
        Ok(())
    }

    pub fn lookup(&self, path: &ValuePath) -> Result<&FieldEntry> {
        self.entries
            .get(path)
            .ok_or_else(|| FormError::UnknownField(path.to_string()))
    }

    pub fn lookup_mut(&mut self, path: &ValuePath) -> Result<&mut FieldEntry> {
        self.entries
            .get_mut(path)
            .ok_or_else(|| FormError::UnknownField(path.to_string()))
    }

    pub fn get(&self, path: &ValuePath) -> Option<&FieldEntry> {
        self.entries.get(path)
    }

    pub fn all_paths(&self) -> Vec<ValuePath> {
        self.entries.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldEntry> {
        self.entries.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut FieldEntry> {
        self.entries.values_mut()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldEntry, FieldRegistry};
    use crate::core::value_path::ValuePath;
    use crate::error::FormError;
    use crate::schema::ModelDecl;
    use crate::schema::resolve::{PrimitiveKind, ResolvedKind};
    use crate::widgets::inputs::text::TextInput;
    use crate::widgets::node::Node;
    use crate::widgets::outputs::message::MessageLine;
    use std::sync::Arc;

    fn entry(path: &ValuePath) -> FieldEntry {
        FieldEntry {
            path: path.clone(),
            control: Node::input(TextInput::new(format!("f::{path}"), "Name")),
            message: MessageLine::new(format!("f::{path}__message")),
            rule: None,
            kind: ResolvedKind::Primitive(PrimitiveKind::Str),
            owner: Arc::new(ModelDecl::new("Person")),
            label: "Name".to_string(),
            description: None,
        }
    }

    #[test]
    fn paths_register_once_in_order() {
        let mut registry = FieldRegistry::new();
        let name = ValuePath::from_keys(["name"]);
        let street = ValuePath::from_keys(["address", "street"]);
        registry.register(entry(&name)).expect("name");
        registry.register(entry(&street)).expect("street");

        assert!(matches!(
            registry.register(entry(&name)),
            Err(FormError::Assignment { .. })
        ));
        assert_eq!(registry.all_paths(), vec![name, street]);
    }

    #[test]
    fn lookup_of_unknown_path_fails() {
        let registry = FieldRegistry::new();
        let err = registry
            .lookup(&ValuePath::from_keys(["missing"]))
            .err()
            .expect("unknown");
        assert_eq!(err, FormError::UnknownField("missing".to_string()));
    }
}
