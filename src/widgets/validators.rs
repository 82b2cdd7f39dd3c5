//! Reusable field rules. Each returns a [`ValidationRule`]: it receives the raw control
//! value, the whole working copy, the field path and the owning model, and yields the
//! corrected value or a message for the user.

use std::sync::{Arc, LazyLock};

use chrono::NaiveDate;
use regex::Regex;

use crate::core::value::{Value, ValueMap};
use crate::core::value_path::{PathSegment, ValuePath};
use crate::error::{FormError, Result};
use crate::schema::{ModelDecl, ValidationRule};

const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("email pattern is valid"));

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y"];

pub fn rule<F>(f: F) -> ValidationRule
where
    F: Fn(&Value, &ValueMap, &ValuePath, &ModelDecl) -> std::result::Result<Value, String>
        + Send
        + Sync
        + 'static,
{
    Arc::new(f)
}

pub fn required(message: impl Into<String>) -> ValidationRule {
    let message = message.into();
    rule(move |value, _, _, _| {
        if value.is_empty() {
            Err(message.clone())
        } else {
            Ok(value.clone())
        }
    })
}

pub fn pattern(pattern: &str, message: impl Into<String>) -> Result<ValidationRule> {
    let re = Regex::new(pattern)
        .map_err(|err| FormError::Config(format!("invalid pattern {pattern:?}: {err}")))?;
    let message = message.into();
    Ok(rule(move |value, _, _, _| {
        let text = value.to_text_scalar().unwrap_or_default();
        if re.is_match(&text) {
            Ok(value.clone())
        } else {
            Err(message.clone())
        }
    }))
}

/// Trims the address; with `allow_empty` a blank value passes as empty text.
pub fn email(allow_empty: bool) -> ValidationRule {
    rule(move |value, _, _, _| {
        let text = value.to_text_scalar().unwrap_or_default();
        let trimmed = text.trim();
        if trimmed.is_empty() && allow_empty {
            return Ok(Value::Text(String::new()));
        }
        if EMAIL.is_match(trimmed) {
            Ok(Value::Text(trimmed.to_string()))
        } else {
            Err("value is not a valid email address".to_string())
        }
    })
}

pub fn int_range(min: i64, max: i64) -> ValidationRule {
    rule(move |value, _, _, _| {
        let number = match value {
            Value::Number(v) => *v,
            Value::Text(text) => text
                .trim()
                .parse::<i64>()
                .map_err(|_| "value is not a valid integer".to_string())?,
            _ => return Err("value is not a valid integer".to_string()),
        };
        if number < min {
            Err(format!("ensure this value is greater than or equal to {min}"))
        } else if number > max {
            Err(format!("ensure this value is less than or equal to {max}"))
        } else {
            Ok(Value::Number(number))
        }
    })
}

/// Accepts dates typed as `2000-01-31`, `31.01.2000` or `31/01/2000`.
pub fn parse_date() -> ValidationRule {
    rule(|value, _, _, _| match value {
        Value::Date(date) => Ok(Value::Date(*date)),
        Value::None => Ok(Value::None),
        Value::Text(text) => DATE_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(text.trim(), format).ok())
            .map(Value::Date)
            .ok_or_else(|| "invalid date format".to_string()),
        _ => Err("invalid date format".to_string()),
    })
}

/// Cross-field rule: the field must be non-empty while the sibling attribute `other`
/// equals `when`.
pub fn required_when(
    other: impl Into<String>,
    when: impl Into<Value>,
    message: impl Into<String>,
) -> ValidationRule {
    let other = other.into();
    let when = when.into();
    let message = message.into();
    rule(move |value, mapping, path, _| {
        let current = sibling(mapping, path, &other);
        if current == Some(&when) && value.is_empty() {
            Err(message.clone())
        } else {
            Ok(value.clone())
        }
    })
}

/// Runs rules in order, feeding each the previous rule's corrected value.
pub fn all(rules: Vec<ValidationRule>) -> ValidationRule {
    rule(move |value, mapping, path, model| {
        let mut current = value.clone();
        for next in &rules {
            current = next(&current, mapping, path, model)?;
        }
        Ok(current)
    })
}

/// Attribute `name` of the record that owns the field at `path`.
fn sibling<'a>(mapping: &'a ValueMap, path: &ValuePath, name: &str) -> Option<&'a Value> {
    let (_, parents) = path.segments().split_last()?;
    let mut keys = parents.iter();
    let Some(first) = keys.next() else {
        return mapping.get(name);
    };
    let PathSegment::Key(first) = first else {
        return None;
    };
    let rest = ValuePath::new(keys.cloned().collect());
    mapping.get(first)?.get_path(&rest)?.get(name)
}

#[cfg(test)]
mod tests {
    use super::{all, email, int_range, parse_date, pattern, required, required_when};
    use crate::core::value::{Value, ValueMap, object};
    use crate::core::value_path::ValuePath;
    use crate::schema::ModelDecl;
    use chrono::NaiveDate;

    fn mapping(value: Value) -> ValueMap {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn email_trims_and_allows_empty_when_asked() {
        let model = ModelDecl::new("Person");
        let empty = ValueMap::new();
        let path = ValuePath::from_keys(["email"]);
        let strict = email(false);
        assert_eq!(
            strict(&Value::from(" ada@example.com "), &empty, &path, &model),
            Ok(Value::from("ada@example.com"))
        );
        assert!(strict(&Value::from(""), &empty, &path, &model).is_err());
        assert_eq!(
            email(true)(&Value::from("  "), &empty, &path, &model),
            Ok(Value::from(""))
        );
    }

    #[test]
    fn required_when_reads_sibling_of_nested_field() {
        let model = ModelDecl::new("Contact");
        let root = mapping(object([(
            "contact",
            object([("preference", Value::from("email")), ("email", Value::from(""))]),
        )]));
        let rule = required_when("preference", "email", "email is required");
        let path = ValuePath::from_keys(["contact", "email"]);
        assert_eq!(
            rule(&Value::from(""), &root, &path, &model),
            Err("email is required".to_string())
        );
        assert_eq!(
            rule(&Value::from("a@b.io"), &root, &path, &model),
            Ok(Value::from("a@b.io"))
        );
    }

    #[test]
    fn chained_rules_pass_corrected_values_along() {
        let model = ModelDecl::new("Person");
        let empty = ValueMap::new();
        let path = ValuePath::from_keys(["age"]);
        let age = all(vec![required("age is required"), int_range(0, 150)]);
        assert_eq!(age(&Value::from("42"), &empty, &path, &model), Ok(Value::Number(42)));
        assert_eq!(
            age(&Value::Number(151), &empty, &path, &model),
            Err("ensure this value is less than or equal to 150".to_string())
        );
    }

    #[test]
    fn date_and_pattern_rules() {
        let model = ModelDecl::new("Person");
        let empty = ValueMap::new();
        let path = ValuePath::from_keys(["birthdate"]);
        let expected = NaiveDate::from_ymd_opt(2000, 1, 31).expect("date");
        assert_eq!(
            parse_date()(&Value::from("31.01.2000"), &empty, &path, &model),
            Ok(Value::Date(expected))
        );
        let phone = pattern(r"^\+?[0-9 ]{6,}$", "not a phone number").expect("pattern");
        assert!(phone(&Value::from("+44 20 7946"), &empty, &path, &model).is_ok());
        assert!(pattern("(", "broken").is_err());
    }
}
