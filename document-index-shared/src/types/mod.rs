//! This module defines the core data structures shared by the document index crates.
//! It re-exports the document trait, search types and operation outcomes.

pub mod document;
pub mod outcome;
pub mod search;

pub use document::{Document, RawDocument};
pub use outcome::{BulkItemResult, BulkOperation, BulkSummary, DeleteOutcome, IndexOutcome};
pub use search::{DistanceUnit, GeoPoint, SearchHit, SearchHits, SortOrder, SortSpec};
