use crate::core::value::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Address of a (possibly nested) field inside a record value.
///
/// Form fields only ever use `Key` segments; `Index` segments address list elements,
/// e.g. `movies[1].title`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ValuePath {
    segments: Vec<PathSegment>,
}

impl ValuePath {
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: keys
                .into_iter()
                .map(|key| PathSegment::Key(key.into()))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn segments(&self) -> &[PathSegment] {
        self.segments.as_slice()
    }

    pub fn child(&self, key: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Key(key.into()));
        Self { segments }
    }

    pub fn last_key(&self) -> Option<&str> {
        match self.segments.last() {
            Some(PathSegment::Key(key)) => Some(key.as_str()),
            _ => None,
        }
    }

    pub fn starts_with(&self, prefix: &ValuePath) -> bool {
        self.segments.starts_with(prefix.segments())
    }

    /// Path of the list element at `index` below this path.
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }
}

impl fmt::Display for ValuePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) => {
                    if idx == 0 && is_identifier(key) {
                        f.write_str(key)?;
                    } else if is_identifier(key) {
                        f.write_str(".")?;
                        f.write_str(key)?;
                    } else {
                        f.write_str("[\"")?;
                        f.write_str(key.replace('\\', "\\\\").replace('"', "\\\"").as_str())?;
                        f.write_str("\"]")?;
                    }
                }
                PathSegment::Index(index) => {
                    write!(f, "[{index}]")?;
                }
            }
        }
        Ok(())
    }
}

impl<S: Into<String>> FromIterator<S> for ValuePath {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::from_keys(iter)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValuePathError {
    message: String,
}

impl ValuePathError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ValuePathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message.as_str())
    }
}

impl std::error::Error for ValuePathError {}

impl Value {
    pub fn get_path(&self, path: &ValuePath) -> Option<&Value> {
        let mut current = self;
        for segment in path.segments() {
            current = match (segment, current) {
                (PathSegment::Key(key), Value::Object(map)) => map.get(key.as_str())?,
                (PathSegment::Index(index), Value::List(items)) => items.get(*index)?,
                _ => return None,
            };
        }
        Some(current)
    }

    pub fn get_path_mut(&mut self, path: &ValuePath) -> Option<&mut Value> {
        let mut current = self;
        for segment in path.segments() {
            current = match (segment, current) {
                (PathSegment::Key(key), Value::Object(map)) => map.get_mut(key.as_str())?,
                (PathSegment::Index(index), Value::List(items)) => items.get_mut(*index)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Replaces the value at `path`, walking existing intermediate containers only.
    ///
    /// The leaf key may be new when its parent is an object; every intermediate segment
    /// must already resolve. Returns the previous leaf value.
    pub fn assign_path(
        &mut self,
        path: &ValuePath,
        value: Value,
    ) -> Result<Option<Value>, ValuePathError> {
        let Some((leaf, parents)) = path.segments().split_last() else {
            return Ok(Some(std::mem::replace(self, value)));
        };

        let parent_path = ValuePath::new(parents.to_vec());
        let Some(parent) = self.get_path_mut(&parent_path) else {
            return Err(ValuePathError::new(format!(
                "'{parent_path}' does not exist"
            )));
        };

        match (leaf, parent) {
            (PathSegment::Key(key), Value::Object(map)) => Ok(map.insert(key.clone(), value)),
            (PathSegment::Index(index), Value::List(items)) => match items.get_mut(*index) {
                Some(slot) => Ok(Some(std::mem::replace(slot, value))),
                None => Err(ValuePathError::new(format!(
                    "index {index} is out of bounds in '{parent_path}'"
                ))),
            },
            (_, other) => Err(ValuePathError::new(format!(
                "'{}' is a {}, not a container",
                parent_path,
                other.type_name()
            ))),
        }
    }
}

fn is_identifier(input: &str) -> bool {
    let mut chars = input.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}
