use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

pub type ValueMap = IndexMap<String, Value>;

/// Dynamic record value edited by a form. Records are `Object`s keyed by attribute name,
/// in declaration order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    None,
    Text(String),
    Bool(bool),
    Number(i64),
    Float(f64),
    Date(NaiveDate),
    List(Vec<Value>),
    Object(ValueMap),
}

impl Value {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::None => true,
            Self::Text(v) => v.trim().is_empty(),
            Self::List(v) => v.is_empty(),
            Self::Object(v) => v.is_empty(),
            _ => false,
        }
    }

    /// Scalars can be shown as a single line of text (enum option labels, list rows).
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Self::Text(_) | Self::Bool(_) | Self::Number(_) | Self::Float(_) | Self::Date(_)
        )
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Text(_) => "text",
            Self::Bool(_) => "bool",
            Self::Number(_) => "integer",
            Self::Float(_) => "float",
            Self::Date(_) => "date",
            Self::List(_) => "list",
            Self::Object(_) => "object",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Number(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ValueMap> {
        match self {
            Self::Object(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut ValueMap> {
        match self {
            Self::Object(v) => Some(v),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Text shown inside a single-line control; `None` for composite values.
    pub fn to_text_scalar(&self) -> Option<String> {
        match self {
            Self::None => Some(String::new()),
            Self::List(_) | Self::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::None => serde_json::Value::Null,
            Self::Text(v) => serde_json::Value::String(v.clone()),
            Self::Bool(v) => serde_json::Value::Bool(*v),
            Self::Number(v) => serde_json::Value::from(*v),
            Self::Float(v) => serde_json::Number::from_f64(*v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Self::Date(v) => serde_json::Value::String(v.format("%Y-%m-%d").to_string()),
            Self::List(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
            Self::Object(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => Ok(()),
            Self::Text(v) => f.write_str(v),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Number(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            Self::List(items) => {
                f.write_str("[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Object(map) => {
                f.write_str("{")?;
                for (idx, (key, value)) in map.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::List(value)
    }
}

impl From<ValueMap> for Value {
    fn from(value: ValueMap) -> Self {
        Self::Object(value)
    }
}

/// Builds an `Object` from `(key, value)` pairs, keeping their order.
pub fn object<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Value
where
    K: Into<String>,
    V: Into<Value>,
{
    Value::Object(
        pairs
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::{Value, object};
    use chrono::NaiveDate;

    #[test]
    fn object_keeps_declaration_order() {
        let value = object([("name", Value::from("Ada")), ("age", Value::from(36))]);
        let keys: Vec<&str> = value
            .as_object()
            .expect("object")
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["name", "age"]);
    }

    #[test]
    fn dates_serialize_as_iso_strings() {
        let date = NaiveDate::from_ymd_opt(2000, 1, 1).expect("valid date");
        let value = object([("birthdate", Value::Date(date)), ("email", Value::None)]);
        let json = serde_json::to_string(&value).expect("serialize");
        assert_eq!(json, r#"{"birthdate":"2000-01-01","email":null}"#);
        assert_eq!(value.to_json()["birthdate"], "2000-01-01");
    }

    #[test]
    fn whitespace_text_counts_as_empty() {
        assert!(Value::from("   ").is_empty());
        assert!(!Value::from(0).is_empty());
    }
}
