//! OpenSearch query builders.
//!
//! This module provides functions to build query clauses and full search
//! request bodies from caller parameters.

use serde_json::{json, Map, Value};

use document_index_shared::{BulkOperation, DistanceUnit, GeoPoint, SortSpec};

/// Query matching every document.
pub fn match_all() -> Value {
    json!({ "match_all": {} })
}

/// Filter keeping documents that have a value for `field`.
pub fn exists(field: &str) -> Value {
    json!({ "exists": { "field": field } })
}

/// Filter restricting documents to those within `distance` of `point`.
///
/// Distance is computed on the arc (great circle), matching the geo-distance sort.
pub fn geo_distance_filter(
    field: &str,
    point: GeoPoint,
    distance: f64,
    unit: DistanceUnit,
) -> Value {
    json!({
        "geo_distance": {
            "distance": unit.format(distance),
            "distance_type": "arc",
            field: point.to_json()
        }
    })
}

/// Builder for a search request body.
///
/// # Example
///
/// ```
/// use document_index_repository::opensearch::queries::{self, SearchBody};
/// use document_index_shared::{SortOrder, SortSpec};
///
/// let body = SearchBody::new(queries::match_all())
///     .from(20)
///     .size(10)
///     .sort(&SortSpec::field("created_at", SortOrder::Desc))
///     .build();
///
/// assert_eq!(body["from"], 20);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SearchBody {
    query: Option<Value>,
    from: Option<usize>,
    size: Option<usize>,
    sort: Vec<Value>,
    post_filter: Option<Value>,
    min_score: Option<f64>,
    source: Option<bool>,
    aggregations: Map<String, Value>,
}

impl SearchBody {
    pub fn new(query: Value) -> Self {
        Self {
            query: Some(query),
            ..Self::default()
        }
    }

    pub fn from(mut self, from: usize) -> Self {
        self.from = Some(from);
        self
    }

    pub fn size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    /// Append a sort clause. Clauses apply in the order they are added.
    pub fn sort(mut self, sort: &SortSpec) -> Self {
        self.sort.push(sort.to_json());
        self
    }

    pub fn sorts(self, sorts: &[SortSpec]) -> Self {
        sorts.iter().fold(self, |body, sort| body.sort(sort))
    }

    /// Filter applied after scoring, so it does not affect aggregations.
    pub fn post_filter(mut self, filter: Value) -> Self {
        self.post_filter = Some(filter);
        self
    }

    pub fn min_score(mut self, min_score: f64) -> Self {
        self.min_score = Some(min_score);
        self
    }

    /// Whether hits carry their `_source`.
    pub fn source(mut self, include: bool) -> Self {
        self.source = Some(include);
        self
    }

    pub fn aggregation(mut self, name: impl Into<String>, aggregation: Value) -> Self {
        self.aggregations.insert(name.into(), aggregation);
        self
    }

    pub fn build(self) -> Value {
        let mut body = Map::new();
        if let Some(query) = self.query {
            body.insert("query".to_string(), query);
        }
        if let Some(from) = self.from {
            body.insert("from".to_string(), json!(from));
        }
        if let Some(size) = self.size {
            body.insert("size".to_string(), json!(size));
        }
        if !self.sort.is_empty() {
            body.insert("sort".to_string(), Value::Array(self.sort));
        }
        if let Some(post_filter) = self.post_filter {
            body.insert("post_filter".to_string(), post_filter);
        }
        if let Some(min_score) = self.min_score {
            body.insert("min_score".to_string(), json!(min_score));
        }
        if let Some(source) = self.source {
            body.insert("_source".to_string(), json!(source));
        }
        if !self.aggregations.is_empty() {
            body.insert("aggs".to_string(), Value::Object(self.aggregations));
        }
        Value::Object(body)
    }
}

/// Render bulk operations as NDJSON lines: an action line, followed by a source
/// line for index operations.
pub fn bulk_lines(operations: &[BulkOperation]) -> Vec<Value> {
    let mut lines = Vec::with_capacity(operations.len() * 2);
    for operation in operations {
        match operation {
            BulkOperation::Index { id: Some(id), source } => {
                lines.push(json!({ "index": { "_id": id } }));
                lines.push(source.clone());
            }
            BulkOperation::Index { id: None, source } => {
                lines.push(json!({ "index": {} }));
                lines.push(source.clone());
            }
            BulkOperation::Delete { id } => {
                lines.push(json!({ "delete": { "_id": id } }));
            }
        }
    }
    lines
}
