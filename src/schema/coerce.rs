use chrono::NaiveDate;

use crate::core::value::Value;
use crate::schema::resolve::{PrimitiveKind, ResolvedKind};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Converts a value into the shape a field of `kind` stores, the way a record type would
/// on attribute assignment. The error is a user-facing reason.
pub fn coerce(kind: &ResolvedKind, value: Value) -> Result<Value, String> {
    match kind {
        ResolvedKind::Primitive(primitive) => coerce_primitive(primitive, value),
        ResolvedKind::Enumerated(decl) => match decl.find(&value) {
            Some(variant) => Ok(variant.value.clone()),
            None => {
                let permitted = decl
                    .variants()
                    .iter()
                    .map(|variant| format!("'{}'", variant.value))
                    .collect::<Vec<_>>()
                    .join(", ");
                Err(format!(
                    "value is not a valid enumeration member; permitted: {permitted}"
                ))
            }
        },
        ResolvedKind::ListOf(_) => match value {
            Value::List(items) => Ok(Value::List(items)),
            Value::None => Ok(Value::List(Vec::new())),
            other => Err(format!("value is not a valid list (got {})", other.type_name())),
        },
        ResolvedKind::NestedRecord(model) => match value {
            Value::Object(map) => Ok(Value::Object(map)),
            other => Err(format!(
                "value is not a valid {} (got {})",
                model.name(),
                other.type_name()
            )),
        },
    }
}

fn coerce_primitive(kind: &PrimitiveKind, value: Value) -> Result<Value, String> {
    match kind {
        PrimitiveKind::Integer => match value {
            Value::Number(v) => Ok(Value::Number(v)),
            Value::Float(v) if v.fract() == 0.0 && v.is_finite() => Ok(Value::Number(v as i64)),
            Value::Text(text) => text
                .trim()
                .parse::<i64>()
                .map(Value::Number)
                .map_err(|_| "value is not a valid integer".to_string()),
            _ => Err("value is not a valid integer".to_string()),
        },
        PrimitiveKind::Float | PrimitiveKind::Decimal => match value {
            Value::Float(v) => Ok(Value::Float(v)),
            Value::Number(v) => Ok(Value::Float(v as f64)),
            Value::Text(text) => match text.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(Value::Float(v)),
                _ => Err("value is not a valid number".to_string()),
            },
            _ => Err("value is not a valid number".to_string()),
        },
        PrimitiveKind::Bool => match value {
            Value::Bool(v) => Ok(Value::Bool(v)),
            Value::Number(0) => Ok(Value::Bool(false)),
            Value::Number(1) => Ok(Value::Bool(true)),
            Value::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Ok(Value::Bool(true)),
                "false" | "no" | "off" | "0" => Ok(Value::Bool(false)),
                _ => Err("value could not be parsed to a boolean".to_string()),
            },
            _ => Err("value could not be parsed to a boolean".to_string()),
        },
        PrimitiveKind::Date => match value {
            Value::Date(date) => Ok(Value::Date(date)),
            Value::None => Ok(Value::None),
            Value::Text(text) => parse_date(&text)
                .map(Value::Date)
                .ok_or_else(|| "invalid date format".to_string()),
            _ => Err("invalid date format".to_string()),
        },
        PrimitiveKind::DateTime
        | PrimitiveKind::Time
        | PrimitiveKind::Str
        | PrimitiveKind::Unmapped(_) => match value {
            Value::None => Ok(Value::Text(String::new())),
            Value::List(_) | Value::Object(_) => Err("str type expected".to_string()),
            other => Ok(Value::Text(other.to_string())),
        },
    }
}

pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).ok()
}
