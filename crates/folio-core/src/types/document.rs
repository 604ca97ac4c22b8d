//! Raw documents exchanged with a remote collection.

use std::cmp::Ordering;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::types::DocumentId;

/// A document read from a remote collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Identifier assigned by the remote store
    pub id: DocumentId,
    /// Document body
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Document {
    /// Creates a document from an id and its fields.
    pub fn new(id: impl Into<DocumentId>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Decodes the document with its id merged in as an `id` field.
    ///
    /// An `id` already present in the body takes precedence over the
    /// remote identifier.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        let mut merged = Map::with_capacity(self.fields.len() + 1);
        merged.insert("id".to_string(), Value::String(self.id.as_str().to_string()));
        for (key, value) in &self.fields {
            merged.insert(key.clone(), value.clone());
        }
        Ok(serde_json::from_value(Value::Object(merged))?)
    }

    /// Decodes only the document body, dropping the remote identifier.
    pub fn decode_fields<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(Value::Object(self.fields.clone()))?)
    }

    /// Returns a field value, if present.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

/// A document to append to a remote collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDocument {
    /// Document body
    pub fields: Map<String, Value>,
    /// Field the server fills with its own timestamp
    #[serde(rename = "serverTimestamp", skip_serializing_if = "Option::is_none")]
    pub server_timestamp: Option<String>,
}

impl NewDocument {
    /// Creates a document body with no server-assigned fields.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            server_timestamp: None,
        }
    }

    /// Marks `field` as a server timestamp placeholder.
    pub fn with_server_timestamp(mut self, field: impl Into<String>) -> Self {
        self.server_timestamp = Some(field.into());
        self
    }
}

/// Sort direction of a live collection view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Smallest first
    Asc,
    /// Largest first
    Desc,
}

/// Ordering of a live collection view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    /// Field to sort by
    pub field: String,
    /// Sort direction
    pub direction: Direction,
}

impl OrderBy {
    /// Ascending order on `field`.
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Asc,
        }
    }

    /// Descending order on `field`.
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Desc,
        }
    }

    /// Sorts a snapshot in place. Ties keep their insertion order.
    pub fn sort(&self, documents: &mut [Document]) {
        documents.sort_by(|a, b| {
            let ord = compare_values(a.field(&self.field), b.field(&self.field));
            match self.direction {
                Direction::Asc => ord,
                Direction::Desc => ord.reverse(),
            }
        });
    }
}

/// Total order over optional JSON values used for snapshot sorting.
///
/// Missing and `null` sort lowest, then booleans, numbers, strings; arrays
/// and objects compare equal to each other and sort last.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(Value::Array(_)) | Some(Value::Object(_)) => 4,
        }
    }

    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}
