//! Parameter leaves.
//!
//! A [`Param`] is an ordered key/value record describing one tunable quantity.
//! The `value` entry always comes first and holds the current value; every
//! later entry is metadata such as `units`, `bounds` or `description`.

use std::fmt;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::error::ModelError;

/// Key used for the value entry by [`Param::new`].
pub const VALUE: &str = "value";

static ABSENT: MetaValue = MetaValue::Absent;

/// A metadata cell.
///
/// `Absent` marks a key the parameter never defined. It is distinct from every
/// JSON value, `null` and `0` included.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum MetaValue {
    #[default]
    Absent,
    Present(Value),
}

impl MetaValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, MetaValue::Absent)
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            MetaValue::Absent => None,
            MetaValue::Present(v) => Some(v),
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            MetaValue::Absent => None,
            MetaValue::Present(v) => Some(v),
        }
    }
}

impl From<Value> for MetaValue {
    fn from(value: Value) -> Self {
        MetaValue::Present(value)
    }
}

impl From<Option<Value>> for MetaValue {
    fn from(value: Option<Value>) -> Self {
        value.map_or(MetaValue::Absent, MetaValue::Present)
    }
}

macro_rules! meta_from {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for MetaValue {
                fn from(value: $t) -> Self {
                    MetaValue::Present(Value::from(value))
                }
            }
        )*
    };
}

meta_from!(bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, String, &str);

impl PartialEq<Value> for MetaValue {
    fn eq(&self, other: &Value) -> bool {
        matches!(self, MetaValue::Present(v) if v == other)
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Absent => f.write_str("absent"),
            MetaValue::Present(v) => write!(f, "{}", v),
        }
    }
}

impl Serialize for MetaValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MetaValue::Absent => serializer.serialize_none(),
            MetaValue::Present(v) => v.serialize(serializer),
        }
    }
}

/// A parameter leaf: an ordered, never-empty mapping from key to [`MetaValue`].
///
/// Params are immutable from the point of view of the traversal engine. Every
/// "modifying" method returns a new Param.
///
/// # Example
///
/// ```
/// use param_model::{MetaValue, Param};
/// use serde_json::json;
///
/// let p = Param::new(1.5).with("units", "m");
/// assert_eq!(p.keys().collect::<Vec<_>>(), vec!["value", "units"]);
///
/// let q = p.with_value(3.0);
/// assert_eq!(*q.value(), json!(3.0));
/// assert_eq!(*q.get("units").unwrap(), json!("m"));
/// assert_eq!(*p.value(), json!(1.5));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    fields: IndexMap<String, MetaValue>,
}

impl Param {
    /// Creates a Param holding only a `value` entry.
    pub fn new(value: impl Into<MetaValue>) -> Self {
        let mut fields = IndexMap::new();
        fields.insert(VALUE.to_string(), value.into());
        Self { fields }
    }

    /// Creates a Param from explicit fields. The `value` entry is moved to the
    /// front, the other fields keep their relative order.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MissingValue`] if `fields` has no `value` entry.
    pub fn from_fields<K, V, I>(fields: I) -> Result<Self, ModelError>
    where
        K: Into<String>,
        V: Into<MetaValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut fields: IndexMap<String, MetaValue> = fields
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let index = fields.get_index_of(VALUE).ok_or(ModelError::MissingValue)?;
        fields.move_index(index, 0);
        Ok(Self { fields })
    }

    /// Builder-style upsert. Existing keys keep their position, new keys go last.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Returns a new Param with `key` bound to `value`.
    pub fn set(&self, key: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        self.clone().with(key, value)
    }

    /// Returns a new Param with the `value` entry replaced.
    pub fn with_value(&self, value: impl Into<MetaValue>) -> Self {
        self.set(VALUE, value)
    }

    /// The current value.
    pub fn value(&self) -> &MetaValue {
        self.fields.get(VALUE).unwrap_or(&ABSENT)
    }

    /// # Errors
    ///
    /// Returns [`ModelError::KeyNotFound`] if the Param has no such key.
    pub fn get(&self, key: &str) -> Result<&MetaValue, ModelError> {
        self.fields
            .get(key)
            .ok_or_else(|| ModelError::KeyNotFound(key.to_string()))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> + '_ {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries, value included.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Rebuilds the Param over `value` followed by `keys`, in that order,
    /// filling keys it does not define with [`MetaValue::Absent`].
    ///
    /// Keys the Param defines but `keys` omits are dropped. An empty `keys`
    /// leaves the Param unchanged.
    pub fn conform(&self, keys: &[String]) -> Self {
        if keys.is_empty() {
            return self.clone();
        }
        let fields = std::iter::once(VALUE)
            .chain(keys.iter().map(String::as_str).filter(|k| *k != VALUE))
            .map(|k| (k.to_string(), self.fields.get(k).cloned().unwrap_or_default()))
            .collect();
        Self { fields }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Param(")?;
        for (i, (k, v)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} = {}", k, v)?;
        }
        f.write_str(")")
    }
}

/// Serializes as a map of the present entries; absent cells are omitted.
impl Serialize for Param {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (k, v) in &self.fields {
            if let MetaValue::Present(v) = v {
                map.serialize_entry(k, v)?;
            }
        }
        map.end()
    }
}
