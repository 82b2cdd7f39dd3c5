use std::fmt;
use std::sync::Arc;

use crate::error::{FormError, Result};
use crate::schema::{DeclaredType, EnumDecl, ModelDecl};

/// Primitive shapes with a dedicated control. Everything else is `Unmapped` and edited
/// as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimitiveKind {
    Integer,
    Float,
    Decimal,
    Bool,
    Date,
    DateTime,
    Time,
    Str,
    Unmapped(String),
}

impl PrimitiveKind {
    /// Maps a bare type name (module prefixes are ignored) to its primitive kind.
    pub fn from_type_name(name: &str) -> Self {
        let bare = name
            .rsplit(|c: char| c == '.' || c == ':')
            .next()
            .unwrap_or(name)
            .trim();
        match bare {
            "int" | "i8" | "i16" | "i32" | "i64" | "isize" | "u8" | "u16" | "u32" | "u64"
            | "usize" | "ConstrainedInt" | "NegativeInt" | "PositiveInt" | "StrictInt" => {
                Self::Integer
            }
            "float" | "f32" | "f64" | "ConstrainedFloat" | "NegativeFloat" | "PositiveFloat"
            | "StrictFloat" => Self::Float,
            "Decimal" | "ConstrainedDecimal" => Self::Decimal,
            "bool" | "StrictBool" => Self::Bool,
            "date" | "NaiveDate" | "PastDate" | "FutureDate" => Self::Date,
            "datetime" | "NaiveDateTime" | "DateTime" => Self::DateTime,
            "time" | "NaiveTime" => Self::Time,
            "str" | "String" | "EmailStr" => Self::Str,
            other => Self::Unmapped(other.to_string()),
        }
    }
}

#[derive(Clone)]
pub enum ResolvedKind {
    Primitive(PrimitiveKind),
    Enumerated(Arc<EnumDecl>),
    ListOf(Box<ResolvedKind>),
    NestedRecord(Arc<ModelDecl>),
}

impl ResolvedKind {
    pub fn describe(&self) -> String {
        match self {
            Self::Primitive(PrimitiveKind::Unmapped(name)) => name.clone(),
            Self::Primitive(kind) => format!("{kind:?}").to_lowercase(),
            Self::Enumerated(decl) => decl.name().to_string(),
            Self::ListOf(inner) => format!("list of {}", inner.describe()),
            Self::NestedRecord(model) => model.name().to_string(),
        }
    }
}

impl fmt::Debug for ResolvedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(kind) => f.debug_tuple("Primitive").field(kind).finish(),
            Self::Enumerated(decl) => f.debug_tuple("Enumerated").field(&decl.name()).finish(),
            Self::ListOf(inner) => f.debug_tuple("ListOf").field(inner).finish(),
            Self::NestedRecord(model) => f.debug_tuple("NestedRecord").field(&model.name()).finish(),
        }
    }
}

/// Resolves a declared attribute type to the shape the control factory works with.
///
/// Unions resolve to their first alternative only.
pub fn resolve(declared: &DeclaredType) -> Result<ResolvedKind> {
    match declared {
        DeclaredType::Union(alternatives) => match alternatives.first() {
            Some(first) => resolve(first),
            None => Err(FormError::unsupported("union without alternatives")),
        },
        DeclaredType::List(args) => match args.as_slice() {
            [element] => Ok(ResolvedKind::ListOf(Box::new(resolve(element)?))),
            _ => Err(FormError::unsupported(format!(
                "list annotation needs exactly one type argument, got {}",
                args.len()
            ))),
        },
        DeclaredType::Enum(decl) => {
            if let Some(variant) = decl.variants().iter().find(|v| !v.value.is_scalar()) {
                return Err(FormError::unsupported(format!(
                    "variant {}.{} has no printable value",
                    decl.name(),
                    variant.name
                )));
            }
            Ok(ResolvedKind::Enumerated(decl.clone()))
        }
        DeclaredType::Record(model) => Ok(ResolvedKind::NestedRecord(model.clone())),
        DeclaredType::Primitive(name) => Ok(ResolvedKind::Primitive(PrimitiveKind::from_type_name(
            name,
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::{PrimitiveKind, ResolvedKind, resolve};
    use crate::core::value::Value;
    use crate::error::FormError;
    use crate::schema::{Attribute, DeclaredType, EnumDecl, ModelDecl};
    use std::sync::Arc;

    #[test]
    fn type_names_map_to_primitive_kinds() {
        let cases = [
            ("int", PrimitiveKind::Integer),
            ("PositiveInt", PrimitiveKind::Integer),
            ("float", PrimitiveKind::Float),
            ("decimal.Decimal", PrimitiveKind::Decimal),
            ("bool", PrimitiveKind::Bool),
            ("datetime.date", PrimitiveKind::Date),
            ("chrono::NaiveDate", PrimitiveKind::Date),
            ("datetime", PrimitiveKind::DateTime),
            ("time", PrimitiveKind::Time),
            ("pydantic.EmailStr", PrimitiveKind::Str),
            ("SecretStr", PrimitiveKind::Unmapped("SecretStr".to_string())),
        ];
        for (name, expected) in cases {
            assert_eq!(PrimitiveKind::from_type_name(name), expected, "{name}");
        }
    }

    #[test]
    fn unions_take_the_first_alternative() {
        let declared = DeclaredType::union(vec![
            DeclaredType::primitive("EmailStr"),
            DeclaredType::primitive("Literal"),
        ]);
        let kind = resolve(&declared).expect("resolve");
        assert!(matches!(kind, ResolvedKind::Primitive(PrimitiveKind::Str)));

        let optional = DeclaredType::optional(DeclaredType::primitive("int"));
        assert!(matches!(
            resolve(&optional).expect("resolve"),
            ResolvedKind::Primitive(PrimitiveKind::Integer)
        ));
    }

    #[test]
    fn lists_need_exactly_one_type_argument() {
        let err = resolve(&DeclaredType::List(Vec::new())).expect_err("no argument");
        assert!(matches!(err, FormError::UnsupportedShape { .. }));

        let two = DeclaredType::List(vec![
            DeclaredType::primitive("str"),
            DeclaredType::primitive("int"),
        ]);
        assert!(matches!(
            resolve(&two),
            Err(FormError::UnsupportedShape { .. })
        ));
    }

    #[test]
    fn records_and_lists_of_records_resolve_structurally() {
        let actor = Arc::new(
            ModelDecl::new("Actor")
                .attribute(Attribute::new("name", DeclaredType::primitive("str")).with_default("")),
        );
        let kind = resolve(&DeclaredType::list_of(DeclaredType::record(actor))).expect("resolve");
        let ResolvedKind::ListOf(inner) = kind else {
            panic!("expected list");
        };
        assert!(matches!(*inner, ResolvedKind::NestedRecord(ref model) if model.name() == "Actor"));
    }

    #[test]
    fn enum_variants_must_be_printable() {
        let broken = Arc::new(
            EnumDecl::new("Broken")
                .variant("OK", "ok")
                .variant("NESTED", Value::List(Vec::new())),
        );
        assert!(matches!(
            resolve(&DeclaredType::enumeration(broken)),
            Err(FormError::UnsupportedShape { .. })
        ));
    }
}
