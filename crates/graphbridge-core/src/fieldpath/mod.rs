//! Field path engine for bridge mappings
//!
//! Paths address concrete fields in JSON records with dot and index
//! notation (`asset.files[0].url`). The dialect is deliberately small:
//! no wildcards, no filters, no recursive descent. Bridges map named
//! fields to named fields, so every path names exactly one location.
//!
//! Copyright (c) 2025 Graphbridge Team
//! Licensed under the Apache-2.0 license

pub mod error;
pub mod parser;

pub use error::FieldPathError;
pub use parser::Parser;

use serde_json::Value;
use std::fmt;

/// One step through a JSON document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Object member access by name
    Key(String),
    /// Array element access by position
    Index(usize),
}

/// A parsed field path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    /// Parse a path from its text form
    pub fn parse(path: &str) -> Result<Self, FieldPathError> {
        let segments = Parser::new(path)?.parse()?;
        Ok(Self { segments })
    }

    /// The parsed segments in order
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// First segment's field name, if the path starts with a key
    pub fn first_key(&self) -> Option<&str> {
        match self.segments.first() {
            Some(Segment::Key(key)) => Some(key),
            _ => None,
        }
    }

    /// Final segment's field name; `None` when the path ends in an index
    pub fn last_key(&self) -> Option<&str> {
        match self.segments.last() {
            Some(Segment::Key(key)) => Some(key),
            _ => None,
        }
    }

    /// Walk the path through `data`, returning the addressed value
    pub fn resolve<'a>(&self, data: &'a Value) -> Option<&'a Value> {
        let mut current = data;
        for segment in &self.segments {
            current = match segment {
                Segment::Key(key) => current.as_object()?.get(key)?,
                Segment::Index(index) => current.as_array()?.get(*index)?,
            };
        }
        Some(current)
    }

    /// Write `value` at the path inside `data`
    ///
    /// Missing intermediate locations are created: objects for key
    /// segments, arrays for index segments, with arrays padded by null
    /// up to the written index. Null values along the way are replaced
    /// by the container the next segment needs; any other type conflict
    /// is a [`FieldPathError::TypeMismatch`].
    pub fn assign(&self, data: &mut Value, value: Value) -> Result<(), FieldPathError> {
        let Some((last, init)) = self.segments.split_last() else {
            return Ok(());
        };

        let mut current = data;
        let mut walked = String::from("$");

        for segment in init {
            match segment {
                Segment::Key(key) => {
                    let map = object_slot(current, &walked)?;
                    current = map.entry(key.clone()).or_insert(Value::Null);
                    walked.push('.');
                    walked.push_str(key);
                }
                Segment::Index(index) => {
                    let items = array_slot(current, &walked)?;
                    if items.len() <= *index {
                        items.resize(index + 1, Value::Null);
                    }
                    current = &mut items[*index];
                    walked.push_str(&format!("[{}]", index));
                }
            }
        }

        match last {
            Segment::Key(key) => {
                object_slot(current, &walked)?.insert(key.clone(), value);
            }
            Segment::Index(index) => {
                let items = array_slot(current, &walked)?;
                if items.len() <= *index {
                    items.resize(index + 1, Value::Null);
                }
                items[*index] = value;
            }
        }

        Ok(())
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(key) => {
                    if i > 0 {
                        write!(f, ".{}", key)?;
                    } else {
                        write!(f, "{}", key)?;
                    }
                }
                Segment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

/// View a slot as a mutable object, coercing null into an empty object
fn object_slot<'v>(
    slot: &'v mut Value,
    walked: &str,
) -> Result<&'v mut serde_json::Map<String, Value>, FieldPathError> {
    if slot.is_null() {
        *slot = Value::Object(serde_json::Map::new());
    }
    match slot {
        Value::Object(map) => Ok(map),
        other => Err(FieldPathError::type_mismatch(
            "object",
            value_kind(other),
            walked,
        )),
    }
}

/// View a slot as a mutable array, coercing null into an empty array
fn array_slot<'v>(
    slot: &'v mut Value,
    walked: &str,
) -> Result<&'v mut Vec<Value>, FieldPathError> {
    if slot.is_null() {
        *slot = Value::Array(Vec::new());
    }
    match slot {
        Value::Array(items) => Ok(items),
        other => Err(FieldPathError::type_mismatch(
            "array",
            value_kind(other),
            walked,
        )),
    }
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
