//! Result rows
//!
//! Each row is a mapping from field name to value; relationship fields
//! come back as nested objects (`CreatedBy.Name` lives under the
//! `CreatedBy` object). Every returned row also carries an `attributes`
//! metadata object that tabular consumers drop.

use serde_json::{Map, Value};

use gus_core::error::ClientError;

/// Metadata key attached to every returned row.
const ATTRIBUTES_KEY: &str = "attributes";

/// One row of a query result
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from a decoded JSON object; anything but an object
    /// is a malformed row.
    pub fn from_value(value: Value) -> Result<Self, ClientError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ClientError::MalformedRow(other.to_string())),
        }
    }

    /// Look up a value by dotted path, traversing nested relationship
    /// objects (`get("CreatedBy.Name")`).
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.0.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Look up a string value by dotted path.
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    /// Set a top-level field (test fixtures, synthetic rows).
    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        self.0.insert(field.into(), value);
    }

    /// Drop the `attributes` metadata object.
    pub fn strip_attributes(mut self) -> Self {
        self.0.remove(ATTRIBUTES_KEY);
        self
    }

    /// Field names present on this row, in document order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of fields on this row.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the row carries no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
