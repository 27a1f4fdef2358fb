//! Weakly-typed document values
//!
//! Provides [`DocValue`], the tagged union every artifact body is made of.
//! Extractors pattern-match on it instead of probing dynamic types.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Number;

/// Key-ordered mapping of field name to value
pub type Mapping = IndexMap<String, DocValue>;

/// One node of a parsed artifact body
///
/// Mirrors the JSON data model: scalars, ordered sequences and
/// key-ordered mappings. Keys keep document order so that walks,
/// structural paths and serialized text are stable across runs.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum DocValue {
    /// Explicit null (or absent YAML value)
    #[default]
    Null,

    /// Boolean scalar
    Bool(bool),

    /// Numeric scalar
    Number(Number),

    /// String scalar
    String(String),

    /// Ordered sequence
    Sequence(Vec<DocValue>),

    /// Key-ordered mapping
    Mapping(Mapping),
}

impl DocValue {
    /// Empty mapping
    #[inline]
    #[must_use]
    pub fn mapping() -> Self {
        Self::Mapping(Mapping::new())
    }

    /// Check if value is a scalar (not a sequence or mapping)
    #[inline]
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Self::Sequence(_) | Self::Mapping(_))
    }

    /// Check if value is a container worth walking into
    #[inline]
    #[must_use]
    pub fn is_container(&self) -> bool {
        !self.is_scalar()
    }

    /// String content, if this is a string scalar
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean content, if this is a boolean scalar
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Sequence items, if this is a sequence
    #[inline]
    #[must_use]
    pub fn as_sequence(&self) -> Option<&[DocValue]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Mapping entries, if this is a mapping
    #[inline]
    #[must_use]
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Lookup a field of a mapping
    ///
    /// Returns `None` for non-mappings and missing keys alike.
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&DocValue> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Lookup a non-empty string field of a mapping
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(DocValue::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Get value at path (dot notation, mapping keys only)
    #[must_use]
    pub fn get_path(&self, path: &str) -> Option<&DocValue> {
        let mut current = self;
        for segment in path.split('.') {
            current = current.get(segment)?;
        }
        Some(current)
    }
}

impl From<serde_json::Value> for DocValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                Self::Mapping(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<serde_yaml::Value> for DocValue {
    fn from(value: serde_yaml::Value) -> Self {
        use serde_yaml::Value;

        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => yaml_number(&n).map_or(Self::Null, Self::Number),
            Value::String(s) => Self::String(s),
            Value::Sequence(items) => {
                Self::Sequence(items.into_iter().map(Self::from).collect())
            }
            Value::Mapping(map) => Self::Mapping(
                map.into_iter()
                    .filter_map(|(k, v)| yaml_key(k).map(|k| (k, Self::from(v))))
                    .collect(),
            ),
            Value::Tagged(tagged) => Self::from(tagged.value),
        }
    }
}

impl From<&str> for DocValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for DocValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for DocValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Vec<DocValue>> for DocValue {
    fn from(items: Vec<DocValue>) -> Self {
        Self::Sequence(items)
    }
}

impl From<Mapping> for DocValue {
    fn from(map: Mapping) -> Self {
        Self::Mapping(map)
    }
}

fn yaml_number(n: &serde_yaml::Number) -> Option<Number> {
    if let Some(u) = n.as_u64() {
        Some(Number::from(u))
    } else if let Some(i) = n.as_i64() {
        Some(Number::from(i))
    } else {
        n.as_f64().and_then(Number::from_f64)
    }
}

/// Scalar YAML keys become strings; complex keys cannot name a field.
fn yaml_key(key: serde_yaml::Value) -> Option<String> {
    use serde_yaml::Value;

    match key {
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Null => Some("null".to_string()),
        Value::Tagged(tagged) => yaml_key(tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => None,
    }
}
