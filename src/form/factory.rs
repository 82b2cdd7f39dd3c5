use std::sync::Arc;

use log::debug;

use crate::config::FormConfig;
use crate::core::NodeId;
use crate::core::value::Value;
use crate::core::value_path::ValuePath;
use crate::error::{FormError, Result};
use crate::form::layout::LayoutItem;
use crate::form::registry::{FieldEntry, FieldRegistry};
use crate::schema::resolve::{PrimitiveKind, ResolvedKind, resolve};
use crate::schema::{Attribute, EnumDecl, ModelDecl, title_case};
use crate::widgets::components::list_editor::ListEditor;
use crate::widgets::inputs::choice::{ChoiceOption, RadioGroup};
use crate::widgets::inputs::date::DatePicker;
use crate::widgets::inputs::select::Dropdown;
use crate::widgets::inputs::stepper::Stepper;
use crate::widgets::inputs::text::TextInput;
use crate::widgets::inputs::toggle::Toggle;
use crate::widgets::node::Node;
use crate::widgets::outputs::message::MessageLine;
use crate::widgets::traits::ControlKind;

/// Control used for a primitive kind. Unmapped type names fall back to a text input.
pub fn control_kind_for(kind: &PrimitiveKind, config: &FormConfig) -> ControlKind {
    match kind {
        PrimitiveKind::Integer | PrimitiveKind::Float | PrimitiveKind::Decimal => {
            ControlKind::Stepper
        }
        PrimitiveKind::Bool if config.toggle_for_bool => ControlKind::Toggle,
        PrimitiveKind::Bool => ControlKind::Checkbox,
        PrimitiveKind::Date => ControlKind::DatePicker,
        PrimitiveKind::DateTime
        | PrimitiveKind::Time
        | PrimitiveKind::Str
        | PrimitiveKind::Unmapped(_) => ControlKind::TextInput,
    }
}

/// Builds controls for a model declaration and registers every leaf field.
pub struct ControlFactory<'a> {
    form_id: &'a NodeId,
    config: &'a FormConfig,
}

impl<'a> ControlFactory<'a> {
    pub fn new(form_id: &'a NodeId, config: &'a FormConfig) -> Self {
        Self { form_id, config }
    }

    /// Walks the attributes of `model` in declaration order. Nested records become
    /// groups; every other attribute gets a control registered under its full path.
    pub fn build_record(
        &self,
        model: &Arc<ModelDecl>,
        value: &Value,
        prefix: &ValuePath,
        registry: &mut FieldRegistry,
    ) -> Result<Vec<LayoutItem>> {
        let mut layout = Vec::with_capacity(model.attributes().len());
        for attribute in model.attributes() {
            let path = prefix.child(attribute.name());
            let kind = resolve(attribute.declared()).map_err(|err| err.at(&path))?;
            let current = value.get(attribute.name()).cloned().unwrap_or_default();
            debug!("building '{path}' as {}", kind.describe());

            if let ResolvedKind::NestedRecord(nested) = &kind {
                let items = self.build_record(nested, &current, &path, registry)?;
                layout.push(LayoutItem::Group {
                    label: attribute.label(),
                    path,
                    items,
                });
                continue;
            }

            let control = self.build_control(&kind, &current, &path, attribute)?;
            let message_id = self.form_id.field(&path).suffixed("message").into_inner();
            registry.register(FieldEntry {
                path: path.clone(),
                control,
                message: MessageLine::new(message_id),
                rule: attribute.meta().rule.clone(),
                kind,
                owner: model.clone(),
                label: attribute.label(),
                description: attribute.meta().description.clone(),
            })?;
            layout.push(LayoutItem::Field(path));
        }
        Ok(layout)
    }

    /// Control for one non-record attribute, bound to `path` and showing `current`.
    pub fn build_control(
        &self,
        kind: &ResolvedKind,
        current: &Value,
        path: &ValuePath,
        attribute: &Attribute,
    ) -> Result<Node> {
        let id = self.form_id.field(path).into_inner();
        let label = attribute.label();
        match kind {
            ResolvedKind::Primitive(primitive) => Ok(self.primitive_control(
                primitive,
                id,
                label,
                current,
                path,
                attribute.meta().description.as_deref(),
            )),
            ResolvedKind::Enumerated(decl) => self.enum_control(decl, id, label, current, path),
            ResolvedKind::ListOf(element) => match element.as_ref() {
                ResolvedKind::NestedRecord(model) => {
                    let items = match current {
                        Value::List(items) => items.clone(),
                        Value::None => Vec::new(),
                        other => {
                            return Err(FormError::Assignment {
                                path: path.to_string(),
                                reason: format!("expected a list, got {}", other.type_name()),
                            });
                        }
                    };
                    let editor = ListEditor::new(id, label, model.clone(), items, self.config.clone())
                        .with_change_target(path.clone());
                    Ok(Node::list(editor))
                }
                ResolvedKind::Enumerated(_) => Err(FormError::NotImplemented {
                    path: path.to_string(),
                    feature: "list of enumerated values".to_string(),
                }),
                other => Err(FormError::UnsupportedShape {
                    path: path.to_string(),
                    reason: format!("no list editor for elements of type {}", other.describe()),
                }),
            },
            ResolvedKind::NestedRecord(model) => Err(FormError::UnsupportedShape {
                path: path.to_string(),
                reason: format!("record {} is built as a group, not a control", model.name()),
            }),
        }
    }

    fn primitive_control(
        &self,
        primitive: &PrimitiveKind,
        id: String,
        label: String,
        current: &Value,
        path: &ValuePath,
        description: Option<&str>,
    ) -> Node {
        let target = path.clone();
        match control_kind_for(primitive, self.config) {
            ControlKind::Stepper => {
                let stepper = match primitive {
                    PrimitiveKind::Integer => Stepper::integer(id, label),
                    _ => Stepper::fractional(id, label, self.config.float_step),
                };
                Node::input(stepper.with_default(current.clone()).with_change_target(target))
            }
            ControlKind::Toggle => Node::input(
                Toggle::new(id, label)
                    .with_default(current.clone())
                    .with_change_target(target),
            ),
            ControlKind::Checkbox => Node::input(
                Toggle::checkbox(id, label)
                    .with_default(current.clone())
                    .with_change_target(target),
            ),
            ControlKind::DatePicker => Node::input(
                DatePicker::new(id, label)
                    .with_text_input(self.config.date_text_input)
                    .with_default(current.clone())
                    .with_change_target(target),
            ),
            _ => {
                let mut input = TextInput::new(id, label)
                    .with_default(current.clone())
                    .with_change_target(target);
                if let Some(description) = description {
                    input = input.with_placeholder(description);
                }
                Node::input(input)
            }
        }
    }

    fn enum_control(
        &self,
        decl: &EnumDecl,
        id: String,
        label: String,
        current: &Value,
        path: &ValuePath,
    ) -> Result<Node> {
        let selected = decl
            .position(current)
            .ok_or_else(|| FormError::InvalidEnumValue {
                path: path.to_string(),
                enum_name: decl.name().to_string(),
                value: current.to_string(),
            })?;
        let options: Vec<ChoiceOption> = decl
            .variants()
            .iter()
            .map(|variant| ChoiceOption::new(variant.value.clone(), title_case(&variant.value.to_string())))
            .collect();

        if options.len() >= self.config.dropdown_threshold {
            Ok(Node::input(
                Dropdown::new(id, label, options)
                    .with_selected(selected)
                    .with_change_target(path.clone()),
            ))
        } else {
            Ok(Node::input(
                RadioGroup::new(id, label, options)
                    .with_selected(selected)
                    .with_change_target(path.clone()),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ControlFactory, control_kind_for};
    use crate::config::FormConfig;
    use crate::core::NodeId;
    use crate::core::value::{Value, object};
    use crate::core::value_path::ValuePath;
    use crate::error::FormError;
    use crate::form::layout::{LayoutItem, field_order};
    use crate::form::registry::FieldRegistry;
    use crate::schema::resolve::{PrimitiveKind, resolve};
    use crate::schema::{Attribute, DeclaredType, EnumDecl, ModelDecl};
    use crate::widgets::traits::ControlKind;
    use std::sync::Arc;

    fn colors(count: usize) -> Arc<EnumDecl> {
        let names = ["red", "green", "blue", "black"];
        Arc::new(
            names
                .iter()
                .take(count)
                .fold(EnumDecl::new("Color"), |decl, name| {
                    decl.variant(name.to_uppercase(), *name)
                }),
        )
    }

    fn build_one(attribute: Attribute, current: Value, config: &FormConfig) -> crate::error::Result<ControlKind> {
        let form_id = NodeId::new("form");
        let factory = ControlFactory::new(&form_id, config);
        let kind = resolve(attribute.declared())?;
        let path = ValuePath::from_keys([attribute.name().to_string()]);
        factory
            .build_control(&kind, &current, &path, &attribute)
            .map(|node| node.kind())
    }

    #[test]
    fn primitive_table() {
        let config = FormConfig::new();
        let cases = [
            (PrimitiveKind::Integer, ControlKind::Stepper),
            (PrimitiveKind::Float, ControlKind::Stepper),
            (PrimitiveKind::Decimal, ControlKind::Stepper),
            (PrimitiveKind::Bool, ControlKind::Toggle),
            (PrimitiveKind::Date, ControlKind::DatePicker),
            (PrimitiveKind::DateTime, ControlKind::TextInput),
            (PrimitiveKind::Time, ControlKind::TextInput),
            (PrimitiveKind::Str, ControlKind::TextInput),
            (PrimitiveKind::Unmapped("Path".to_string()), ControlKind::TextInput),
        ];
        for (primitive, expected) in cases {
            assert_eq!(control_kind_for(&primitive, &config), expected, "{primitive:?}");
        }
        let checkbox = FormConfig::new().with_toggle_for_bool(false);
        assert_eq!(control_kind_for(&PrimitiveKind::Bool, &checkbox), ControlKind::Checkbox);
    }

    #[test]
    fn enum_threshold_is_inclusive_on_dropdown_side() {
        let config = FormConfig::new();
        let two = Attribute::new("color", DeclaredType::enumeration(colors(2)));
        let three = Attribute::new("color", DeclaredType::enumeration(colors(3)));
        let four = Attribute::new("color", DeclaredType::enumeration(colors(4)));
        assert_eq!(build_one(two, Value::from("red"), &config), Ok(ControlKind::RadioGroup));
        assert_eq!(build_one(three, Value::from("red"), &config), Ok(ControlKind::Dropdown));
        assert_eq!(build_one(four.clone(), Value::from("red"), &config), Ok(ControlKind::Dropdown));

        let raised = FormConfig::new().with_dropdown_threshold(5);
        assert_eq!(build_one(four, Value::from("red"), &raised), Ok(ControlKind::RadioGroup));
    }

    #[test]
    fn enum_value_must_match_a_variant() {
        let config = FormConfig::new();
        let attribute = Attribute::new("color", DeclaredType::enumeration(colors(2)));
        assert!(matches!(
            build_one(attribute.clone(), Value::from("purple"), &config),
            Err(FormError::InvalidEnumValue { .. })
        ));
        assert_eq!(build_one(attribute, Value::from("GREEN"), &config), Ok(ControlKind::RadioGroup));
    }

    #[test]
    fn lists_need_record_elements() {
        let config = FormConfig::new();
        let actor = Arc::new(ModelDecl::new("Actor"));
        let actors = Attribute::new("actors", DeclaredType::list_of(DeclaredType::record(actor)));
        assert_eq!(build_one(actors, Value::List(Vec::new()), &config), Ok(ControlKind::ListEditor));

        let tags = Attribute::new("tags", DeclaredType::list_of(DeclaredType::enumeration(colors(2))));
        assert!(matches!(
            build_one(tags, Value::List(Vec::new()), &config),
            Err(FormError::NotImplemented { .. })
        ));

        let names = Attribute::new("names", DeclaredType::list_of(DeclaredType::primitive("str")));
        assert!(matches!(
            build_one(names, Value::List(Vec::new()), &config),
            Err(FormError::UnsupportedShape { .. })
        ));
    }

    #[test]
    fn nested_records_register_leaves_under_full_paths() {
        let address = Arc::new(
            ModelDecl::new("Address")
                .attribute(Attribute::new("street", DeclaredType::primitive("str")))
                .attribute(Attribute::new("city", DeclaredType::primitive("str"))),
        );
        let person = Arc::new(
            ModelDecl::new("Person")
                .attribute(Attribute::new("name", DeclaredType::primitive("str")).with_title("Full name"))
                .attribute(Attribute::new("address", DeclaredType::record(address))),
        );
        let value = object([
            ("name", Value::from("Ada")),
            (
                "address",
                object([("street", Value::from("Main St")), ("city", Value::from("London"))]),
            ),
        ]);

        let form_id = NodeId::new("person");
        let config = FormConfig::new();
        let mut registry = FieldRegistry::new();
        let layout = ControlFactory::new(&form_id, &config)
            .build_record(&person, &value, &ValuePath::empty(), &mut registry)
            .expect("build");

        let paths: Vec<String> = registry.all_paths().iter().map(ToString::to_string).collect();
        assert_eq!(paths, ["name", "address.street", "address.city"]);
        assert_eq!(field_order(&layout), registry.all_paths());
        assert!(matches!(&layout[1], LayoutItem::Group { label, .. } if label == "Address"));

        let name = registry.lookup(&ValuePath::from_keys(["name"])).expect("name");
        assert_eq!(name.label, "Full name");
        assert_eq!(name.control.id(), "person::name");
        assert_eq!(name.control.value(), Some(Value::from("Ada")));
    }

    #[test]
    fn shape_errors_name_the_attribute() {
        let model = Arc::new(
            ModelDecl::new("Movie").attribute(Attribute::new("cast", DeclaredType::List(Vec::new()))),
        );
        let form_id = NodeId::new("movie");
        let config = FormConfig::new();
        let mut registry = FieldRegistry::new();
        let err = ControlFactory::new(&form_id, &config)
            .build_record(&model, &Value::None, &ValuePath::empty(), &mut registry)
            .err()
            .expect("shape error");
        assert!(matches!(err, FormError::UnsupportedShape { ref path, .. } if path == "cast"));
    }
}
