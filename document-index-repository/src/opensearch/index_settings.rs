//! OpenSearch index settings and mappings.
//!
//! Documents are schemaless to this crate, but some fields need an explicit
//! mapping before the first write (e.g. `geo_point` fields used by geo searches).

use serde_json::{json, Map, Value};

/// Settings used when creating an index.
///
/// # Sharding Configuration
///
/// Defaults to 1 primary shard and 1 replica.
#[derive(Debug, Clone)]
pub struct IndexSettings {
    pub number_of_shards: u32,
    pub number_of_replicas: u32,
    /// Fields mapped as `geo_point`.
    pub geo_point_fields: Vec<String>,
    /// Fields mapped as `keyword` (exact match, sortable, aggregatable).
    pub keyword_fields: Vec<String>,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            number_of_shards: 1,
            number_of_replicas: 1,
            geo_point_fields: Vec::new(),
            keyword_fields: Vec::new(),
        }
    }
}

impl IndexSettings {
    pub fn with_geo_point(mut self, field: impl Into<String>) -> Self {
        self.geo_point_fields.push(field.into());
        self
    }

    pub fn with_keyword(mut self, field: impl Into<String>) -> Self {
        self.keyword_fields.push(field.into());
        self
    }

    /// Render the index creation body.
    pub fn to_json(&self) -> Value {
        let mut properties = Map::new();
        for field in &self.keyword_fields {
            properties.insert(field.clone(), json!({ "type": "keyword" }));
        }
        for field in &self.geo_point_fields {
            properties.insert(field.clone(), json!({ "type": "geo_point" }));
        }

        json!({
            "settings": {
                "number_of_shards": self.number_of_shards,
                "number_of_replicas": self.number_of_replicas
            },
            "mappings": {
                "properties": properties
            }
        })
    }
}
