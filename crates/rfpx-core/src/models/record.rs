//! The schema-conformant extraction result.

use std::fmt;

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::schema::{self, FIELD_COUNT, FIELDS};

/// Values for every schema field, in schema order.
///
/// The key set is fixed by construction: a record always holds exactly the
/// schema's fields and every value is a string (possibly empty).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ExtractionRecord {
    values: [String; FIELD_COUNT],
}

impl ExtractionRecord {
    /// Build a record from a parsed JSON object.
    ///
    /// Schema fields missing from `object` become empty strings; keys outside
    /// the schema are dropped.
    pub fn reconcile(object: &Map<String, Value>) -> Self {
        let mut record = Self::default();
        for (slot, field) in record.values.iter_mut().zip(FIELDS.iter()) {
            if let Some(value) = object.get(*field) {
                *slot = coerce(value);
            }
        }
        record
    }

    /// Value of a field, or `None` if the name is not in the schema.
    pub fn get(&self, field: &str) -> Option<&str> {
        schema::position(field).map(|i| self.values[i].as_str())
    }

    /// Set a field. Returns `false` (and changes nothing) for names outside
    /// the schema.
    pub fn set(&mut self, field: &str, value: impl Into<String>) -> bool {
        match schema::position(field) {
            Some(i) => {
                self.values[i] = value.into();
                true
            }
            None => false,
        }
    }

    /// `(field, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        FIELDS.iter().copied().zip(self.values.iter().map(String::as_str))
    }

    /// Number of non-blank fields and the total field count.
    pub fn coverage(&self) -> (usize, usize) {
        let filled = self.values.iter().filter(|v| !v.trim().is_empty()).count();
        (filled, FIELD_COUNT)
    }

    /// True when every field is the empty string.
    pub fn is_blank(&self) -> bool {
        self.values.iter().all(String::is_empty)
    }
}

impl Default for ExtractionRecord {
    fn default() -> Self {
        Self {
            values: std::array::from_fn(|_| String::new()),
        }
    }
}

impl fmt::Debug for ExtractionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl Serialize for ExtractionRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FIELD_COUNT))?;
        for (field, value) in self.iter() {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ExtractionRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let object = Map::<String, Value>::deserialize(deserializer)?;
        Ok(Self::reconcile(&object))
    }
}

/// String form of a JSON value as stored in a record.
fn coerce(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(_) | Value::Number(_) => value.to_string(),
        Value::Array(_) | Value::Object(_) => {
            serde_json::to_string(value).unwrap_or_default()
        }
    }
}
