//! # Document Index Shared
//!
//! This crate defines the engine-independent data structures used across the
//! document index crates: the `Document` trait implemented by caller types,
//! search hits and sort clauses, and the outcomes of write operations.

pub mod types;

pub use types::document::{Document, RawDocument};
pub use types::outcome::{
    BulkItemResult, BulkOperation, BulkSummary, DeleteOutcome, IndexOutcome,
};
pub use types::search::{DistanceUnit, GeoPoint, SearchHit, SearchHits, SortOrder, SortSpec};
