//! Model declarations: the explicit schema a form is generated from.
//!
//! A [`ModelDecl`] is an ordered list of [`Attribute`]s, each with a [`DeclaredType`],
//! optional per-field metadata and an optional default factory. Any source binding (a
//! derive, a JSON schema, hand-written code) can produce one; the form never reflects on
//! Rust types.

pub mod coerce;
pub mod resolve;

use std::fmt;
use std::sync::Arc;

use crate::core::value::{Value, ValueMap};
use crate::core::value_path::ValuePath;
use crate::error::{FormError, Result};

/// Field rule: `(raw value, whole working copy, field path, owning model)` to the
/// corrected value, or a user-facing error message.
pub type ValidationRule =
    Arc<dyn Fn(&Value, &ValueMap, &ValuePath, &ModelDecl) -> std::result::Result<Value, String> + Send + Sync>;

pub type DefaultFactory = Arc<dyn Fn() -> Value + Send + Sync>;

pub type DisplayFn = Arc<dyn Fn(&Value) -> String + Send + Sync>;

#[derive(Clone)]
pub enum DeclaredType {
    /// A scalar type identified by its bare name (`int`, `date`, `EmailStr`, ...).
    Primitive(String),
    Enum(Arc<EnumDecl>),
    /// List annotation with its type arguments.
    List(Vec<DeclaredType>),
    Record(Arc<ModelDecl>),
    /// Union of alternatives; `Optional[T]` is `Union[T, None]`.
    Union(Vec<DeclaredType>),
}

impl DeclaredType {
    pub fn primitive(name: impl Into<String>) -> Self {
        Self::Primitive(name.into())
    }

    pub fn enumeration(decl: Arc<EnumDecl>) -> Self {
        Self::Enum(decl)
    }

    pub fn list_of(element: DeclaredType) -> Self {
        Self::List(vec![element])
    }

    pub fn record(model: Arc<ModelDecl>) -> Self {
        Self::Record(model)
    }

    pub fn union(alternatives: Vec<DeclaredType>) -> Self {
        Self::Union(alternatives)
    }

    pub fn optional(inner: DeclaredType) -> Self {
        Self::Union(vec![inner, Self::primitive("None")])
    }

    pub fn name(&self) -> String {
        match self {
            Self::Primitive(name) => name.clone(),
            Self::Enum(decl) => decl.name().to_string(),
            Self::List(args) => format!(
                "List[{}]",
                args.iter().map(Self::name).collect::<Vec<_>>().join(", ")
            ),
            Self::Record(model) => model.name().to_string(),
            Self::Union(alternatives) => format!(
                "Union[{}]",
                alternatives
                    .iter()
                    .map(Self::name)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }
}

impl fmt::Debug for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumVariant {
    pub name: String,
    pub value: Value,
}

#[derive(Debug, Clone)]
pub struct EnumDecl {
    name: String,
    variants: Vec<EnumVariant>,
}

impl EnumDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variants: Vec::new(),
        }
    }

    pub fn variant(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variants.push(EnumVariant {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variants(&self) -> &[EnumVariant] {
        self.variants.as_slice()
    }

    /// Finds the variant a value refers to, by value first, then by variant name.
    pub fn find(&self, value: &Value) -> Option<&EnumVariant> {
        if let Some(found) = self.variants.iter().find(|variant| &variant.value == value) {
            return Some(found);
        }
        let text = value.as_text()?;
        self.variants.iter().find(|variant| {
            variant.name.eq_ignore_ascii_case(text)
                || variant
                    .value
                    .as_text()
                    .is_some_and(|v| v.eq_ignore_ascii_case(text))
        })
    }

    pub fn position(&self, value: &Value) -> Option<usize> {
        let found = self.find(value)?;
        self.variants.iter().position(|variant| variant == found)
    }
}

#[derive(Clone, Default)]
pub struct FieldMeta {
    pub title: Option<String>,
    pub description: Option<String>,
    pub rule: Option<ValidationRule>,
}

impl FieldMeta {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.rule.is_none()
    }
}

impl fmt::Debug for FieldMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldMeta")
            .field("title", &self.title)
            .field("description", &self.description)
            .field("rule", &self.rule.is_some())
            .finish()
    }
}

#[derive(Clone)]
pub struct Attribute {
    name: String,
    declared: DeclaredType,
    default: Option<DefaultFactory>,
    meta: FieldMeta,
}

impl Attribute {
    pub fn new(name: impl Into<String>, declared: DeclaredType) -> Self {
        Self {
            name: name.into(),
            declared,
            default: None,
            meta: FieldMeta::default(),
        }
    }

    /// Default value; cloned for every new instance so collections are never shared.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.default = Some(Arc::new(move || value.clone()));
        self
    }

    pub fn with_default_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.default = Some(Arc::new(factory));
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.meta.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.meta.description = Some(description.into());
        self
    }

    pub fn with_rule(mut self, rule: ValidationRule) -> Self {
        self.meta.rule = Some(rule);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declared(&self) -> &DeclaredType {
        &self.declared
    }

    pub fn meta(&self) -> &FieldMeta {
        &self.meta
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    pub fn default_value(&self) -> Option<Value> {
        self.default.as_ref().map(|factory| factory())
    }

    /// Display label: the metadata title, or the humanized attribute name.
    pub fn label(&self) -> String {
        self.meta
            .title
            .clone()
            .unwrap_or_else(|| humanize(&self.name))
    }
}

impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("name", &self.name)
            .field("declared", &self.declared)
            .field("has_default", &self.default.is_some())
            .field("meta", &self.meta)
            .finish()
    }
}

#[derive(Clone)]
pub struct ModelDecl {
    name: String,
    attributes: Vec<Attribute>,
    display: Option<DisplayFn>,
}

impl ModelDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            display: None,
        }
    }

    /// Adds an attribute; redeclaring a name replaces the earlier declaration in place.
    pub fn attribute(mut self, attribute: Attribute) -> Self {
        if let Some(existing) = self
            .attributes
            .iter_mut()
            .find(|existing| existing.name == attribute.name)
        {
            *existing = attribute;
        } else {
            self.attributes.push(attribute);
        }
        self
    }

    pub fn with_display<F>(mut self, display: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.display = Some(Arc::new(display));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &[Attribute] {
        self.attributes.as_slice()
    }

    pub fn attribute_named(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attribute| attribute.name == name)
    }

    /// Builds a fresh instance from attribute defaults.
    pub fn default_value(&self) -> Result<Value> {
        let missing: Vec<String> = self
            .attributes
            .iter()
            .filter(|attribute| !attribute.has_default())
            .map(|attribute| attribute.name.clone())
            .collect();
        if !missing.is_empty() {
            return Err(FormError::DefaultConstruction {
                model: self.name.clone(),
                missing,
            });
        }

        let mut map = ValueMap::with_capacity(self.attributes.len());
        for attribute in &self.attributes {
            if let Some(value) = attribute.default_value() {
                map.insert(attribute.name.clone(), value);
            }
        }
        Ok(Value::Object(map))
    }

    /// Completes a caller-supplied instance: missing attributes take their defaults,
    /// attribute order follows the declaration, unknown keys are kept at the end.
    pub fn normalize(&self, value: Value) -> Result<Value> {
        let Value::Object(mut given) = value else {
            return Err(FormError::Assignment {
                path: self.name.clone(),
                reason: format!("expected a {} record, got {}", self.name, value.type_name()),
            });
        };

        let mut missing = Vec::new();
        let mut map = ValueMap::with_capacity(self.attributes.len());
        for attribute in &self.attributes {
            if let Some(current) = given.shift_remove(attribute.name.as_str()) {
                map.insert(attribute.name.clone(), current);
            } else if let Some(default) = attribute.default_value() {
                map.insert(attribute.name.clone(), default);
            } else {
                missing.push(attribute.name.clone());
            }
        }
        if !missing.is_empty() {
            return Err(FormError::DefaultConstruction {
                model: self.name.clone(),
                missing,
            });
        }
        map.extend(given);
        Ok(Value::Object(map))
    }

    /// One-line description of an instance, used for list rows.
    pub fn display(&self, value: &Value) -> String {
        if let Some(display) = &self.display {
            return display(value);
        }
        let fields = self
            .attributes
            .iter()
            .filter_map(|attribute| {
                let current = value.get(attribute.name())?;
                current
                    .is_scalar()
                    .then(|| format!("{}={}", attribute.name(), current))
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}({})", self.name, fields)
    }
}

impl fmt::Debug for ModelDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelDecl")
            .field("name", &self.name)
            .field("attributes", &self.attributes)
            .finish()
    }
}

/// `happy_today` -> `Happy today`.
pub fn humanize(name: &str) -> String {
    let spaced = name.replace('_', " ");
    capitalize(spaced.trim())
}

pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `pglet_with_python` -> `Pglet With Python`.
pub fn title_case(text: &str) -> String {
    text.split(['_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| capitalize(&word.to_lowercase()))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::{Attribute, DeclaredType, EnumDecl, ModelDecl, humanize, title_case};
    use crate::core::value::{Value, object};
    use crate::error::FormError;

    fn movie() -> ModelDecl {
        ModelDecl::new("Movie")
            .attribute(Attribute::new("title", DeclaredType::primitive("str")).with_default(""))
            .attribute(Attribute::new("year", DeclaredType::primitive("int")).with_default(2000))
            .attribute(
                Attribute::new("actors", DeclaredType::list_of(DeclaredType::primitive("str")))
                    .with_default_factory(|| Value::List(Vec::new())),
            )
    }

    #[test]
    fn defaults_are_fresh_per_instance() {
        let model = movie();
        let mut first = model.default_value().expect("default");
        let second = model.default_value().expect("default");
        if let Some(Value::List(actors)) = first.as_object_mut().and_then(|m| m.get_mut("actors")) {
            actors.push(Value::from("Sean Connery"));
        }
        assert_eq!(second.get("actors"), Some(&Value::List(Vec::new())));
        assert_ne!(first, second);
    }

    #[test]
    fn required_attributes_block_default_construction() {
        let model = ModelDecl::new("Movie")
            .attribute(Attribute::new("title", DeclaredType::primitive("str")))
            .attribute(Attribute::new("year", DeclaredType::primitive("int")).with_default(2000));
        let err = model.default_value().expect_err("title has no default");
        assert_eq!(
            err,
            FormError::DefaultConstruction {
                model: "Movie".to_string(),
                missing: vec!["title".to_string()],
            }
        );
    }

    #[test]
    fn normalize_fills_missing_attributes_in_declaration_order() {
        let model = movie();
        let value = model
            .normalize(object([("year", Value::from(1986)), ("title", Value::from("Rose"))]))
            .expect("normalize");
        let keys: Vec<&str> = value
            .as_object()
            .expect("object")
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["title", "year", "actors"]);
    }

    #[test]
    fn default_display_lists_scalar_fields() {
        let model = movie();
        let value = model.default_value().expect("default");
        assert_eq!(model.display(&value), "Movie(title=, year=2000)");

        let custom = movie().with_display(|v| {
            format!(
                "{} ({})",
                v.get("title").map(Value::to_string).unwrap_or_default(),
                v.get("year").map(Value::to_string).unwrap_or_default()
            )
        });
        let rose = object([("title", Value::from("Rose")), ("year", Value::from(1986))]);
        assert_eq!(custom.display(&rose), "Rose (1986)");
    }

    #[test]
    fn enum_lookup_accepts_values_and_names() {
        let decl = EnumDecl::new("ContactOptions")
            .variant("EMAIL", "email")
            .variant("PHONE", "phone");
        assert_eq!(decl.position(&Value::from("phone")), Some(1));
        assert_eq!(decl.position(&Value::from("EMAIL")), Some(0));
        assert_eq!(decl.position(&Value::from("dove")), None);
    }

    #[test]
    fn redeclared_attribute_replaces_previous() {
        let model = movie().attribute(Attribute::new("year", DeclaredType::primitive("float")));
        assert_eq!(model.attributes().len(), 3);
        assert_eq!(model.attributes()[1].declared().name(), "float");
    }

    #[test]
    fn labels_are_humanized() {
        assert_eq!(humanize("happy_today"), "Happy today");
        assert_eq!(title_case("pglet_with_python"), "Pglet With Python");
        let titled = Attribute::new("happy", DeclaredType::primitive("bool"))
            .with_title("Are you happy today?");
        assert_eq!(titled.label(), "Are you happy today?");
    }
}
