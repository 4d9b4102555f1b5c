//! Document types for the search index.
//!
//! This module defines the `Document` trait every indexed type implements, and
//! `RawDocument`, a schemaless document backed by a JSON object.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A record persisted in the search engine.
///
/// Implementors declare their own fields and derive `Serialize`/`Deserialize`. The
/// identifier is optional: when it is `None` at index time the engine generates one.
/// Identifier uniqueness is enforced by the engine, not by this crate.
///
/// # Example
///
/// ```
/// use document_index_shared::Document;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Serialize, Deserialize)]
/// struct Shop {
///     #[serde(skip_serializing_if = "Option::is_none")]
///     id: Option<String>,
///     name: String,
/// }
///
/// impl Document for Shop {
///     fn id(&self) -> Option<&str> {
///         self.id.as_deref()
///     }
///
///     fn set_id(&mut self, id: String) {
///         self.id = Some(id);
///     }
/// }
///
/// let shop = Shop { id: None, name: "Corner".to_string() };
/// assert_eq!(shop.to_json_string().unwrap(), r#"{"name":"Corner"}"#);
/// ```
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    /// The document identifier, if one has been assigned.
    fn id(&self) -> Option<&str>;

    /// Assign the identifier, typically the one generated by the engine.
    fn set_id(&mut self, id: String);

    /// Serialize the whole document to a JSON string.
    fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize the whole document to a JSON value.
    fn to_json_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// A document without a fixed schema.
///
/// All fields other than `id` are kept in a flattened JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RawDocument {
    /// Create a document from a JSON object, taking `id` out of the object when present.
    ///
    /// Fails when the value is not an object or when `id` is present but not a string,
    /// so every document built here can be read back from the engine.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Get a field by name.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

impl Document for RawDocument {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }
}
