//! Search types for the document index.
//!
//! This module defines the hits returned by search operations and the sort
//! clauses and geo coordinates callers pass in.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::types::document::Document;

/// A single hit from a search response.
///
/// Field names follow the engine's hit layout so a hit deserializes directly from
/// a `hits.hits[]` element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// The document identifier.
    #[serde(rename = "_id")]
    pub id: String,

    /// The concrete index the document lives in.
    #[serde(rename = "_index", default)]
    pub index: String,

    /// Relevance score. Absent when results are sorted by a non-score field.
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,

    /// The stored document source.
    #[serde(rename = "_source", default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Value>,

    /// Sort values, one per sort clause (e.g. the computed geo distance).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<Value>,
}

impl SearchHit {
    /// Deserialize the hit source into a document.
    ///
    /// The document takes the hit identifier when its own source carries none.
    /// Returns `Ok(None)` when the hit has no source.
    pub fn parse_source<T: Document>(&self) -> Result<Option<T>, serde_json::Error> {
        let Some(source) = &self.source else {
            return Ok(None);
        };
        let mut doc: T = serde_json::from_value(source.clone())?;
        if doc.id().is_none() {
            doc.set_id(self.id.clone());
        }
        Ok(Some(doc))
    }
}

/// A page of search hits with the total match count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchHits {
    /// Total number of matching documents.
    /// May be greater than the number of returned hits due to pagination.
    pub total: u64,

    /// Highest relevance score among the matches.
    pub max_score: Option<f64>,

    /// The hits of this page, in engine order.
    pub hits: Vec<SearchHit>,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Unit used for geo distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DistanceUnit {
    #[default]
    Kilometers,
    Meters,
    Miles,
}

impl DistanceUnit {
    /// The engine's abbreviation for the unit.
    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceUnit::Kilometers => "km",
            DistanceUnit::Meters => "m",
            DistanceUnit::Miles => "mi",
        }
    }

    /// Format a distance value with this unit (e.g. `"5km"`).
    pub fn format(&self, value: f64) -> String {
        format!("{}{}", value, self.as_str())
    }
}

/// A latitude/longitude coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Returns true if both coordinates are finite and within range.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    pub fn to_json(&self) -> Value {
        json!({ "lat": self.lat, "lon": self.lon })
    }
}

/// A sort clause for search requests.
#[derive(Debug, Clone, PartialEq)]
pub enum SortSpec {
    /// Sort on a document field.
    Field { field: String, order: SortOrder },

    /// Sort on arc distance from a point.
    GeoDistance {
        field: String,
        point: GeoPoint,
        unit: DistanceUnit,
        order: SortOrder,
    },
}

impl SortSpec {
    /// Sort on a field.
    pub fn field(field: impl Into<String>, order: SortOrder) -> Self {
        Self::Field {
            field: field.into(),
            order,
        }
    }

    /// Sort on distance from `point`, nearest first.
    pub fn geo_distance(field: impl Into<String>, point: GeoPoint, unit: DistanceUnit) -> Self {
        Self::GeoDistance {
            field: field.into(),
            point,
            unit,
            order: SortOrder::Asc,
        }
    }

    /// Render the sort clause in the engine's request format.
    pub fn to_json(&self) -> Value {
        match self {
            SortSpec::Field { field, order } => {
                json!({ field.as_str(): { "order": order.as_str() } })
            }
            SortSpec::GeoDistance {
                field,
                point,
                unit,
                order,
            } => json!({
                "_geo_distance": {
                    field.as_str(): point.to_json(),
                    "order": order.as_str(),
                    "unit": unit.as_str(),
                    "distance_type": "arc"
                }
            }),
        }
    }
}
