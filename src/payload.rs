//! Declarative JSON payload construction.
//!
//! The five order operations share most of their fields (correlation id,
//! timestamp, terminal identity) but each omits a different subset.
//! [`Payload`] builds the request object field by field and drops absent
//! values, so each operation reads as a flat field list with a single point
//! of change for shared fields.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Result;

/// Builder for a JSON request body.
///
/// Absent values never reach the wire: [`Payload::opt`] skips `None`, and a
/// value that serializes to JSON `null` is dropped rather than inserted.
/// Transport-internal values (headers, the client itself) are never passed
/// in, so they cannot leak into a body. Field order is irrelevant; the API
/// parses objects, not ordered lists.
#[derive(Debug, Default)]
pub struct Payload {
    map: Map<String, Value>,
}

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field. Values serializing to `null` are silently dropped.
    pub fn field(mut self, name: &str, value: impl Serialize) -> Result<Self> {
        let value = serde_json::to_value(value)?;
        if !value.is_null() {
            self.map.insert(name.to_string(), value);
        }
        Ok(self)
    }

    /// Insert a field only when present; `None` is dropped entirely.
    pub fn opt(self, name: &str, value: Option<impl Serialize>) -> Result<Self> {
        match value {
            Some(value) => self.field(name, value),
            None => Ok(self),
        }
    }

    pub fn build(self) -> Value {
        Value::Object(self.map)
    }
}
