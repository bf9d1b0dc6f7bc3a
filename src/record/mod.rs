//! Structural value types serialized by the fixture.
//!
//! # Responsibilities
//! - Model response payloads as ordered, named fields
//! - Closed value variant: integer, string, or nested record
//! - Walkable by the JSON/XML writers without per-type code
//!
//! # Design Decisions
//! - Field order is declaration order (serializers must preserve it)
//! - Field names are unique; re-adding a name replaces in place
//! - Records are built bottom-up from literals, so cycles cannot occur

pub mod json;
pub mod xml;

use thiserror::Error;

/// Nesting depth past which serialization aborts.
///
/// Records are owned trees and cannot be cyclic, but a runaway builder
/// should fail loudly instead of recursing without bound.
pub const MAX_DEPTH: usize = 32;

/// Errors raised while rendering a record.
#[derive(Debug, Error)]
pub enum SerializeError {
    /// Record nesting exceeded [`MAX_DEPTH`].
    #[error("record nesting exceeds maximum depth of {0}")]
    DepthExceeded(usize),
}

/// A single field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Str(String),
    Record(Record),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Value::Record(v)
    }
}

/// An ordered sequence of uniquely named fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field append.
    ///
    /// Re-using an existing name replaces the value but keeps the
    /// field's original position.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
        self
    }

    /// Set an existing field's value.
    ///
    /// Returns `false` without touching the record when the name is
    /// unknown; form ingestion relies on this to ignore stray fields.
    pub fn update(&mut self, name: &str, value: impl Into<Value>) -> bool {
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => {
                slot.1 = value.into();
                true
            }
            None => false,
        }
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Iterate fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Minimal string quoting for scenario payloads.
///
/// Scenario data never contains embedded quotes, so no escaping is done.
pub fn quote(s: &str) -> String {
    format!("\"{s}\"")
}
