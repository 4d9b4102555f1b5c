//! # Document Index Repository
//!
//! This crate provides the data-access layer over an external search engine:
//! a provider trait abstracting the engine, a concrete OpenSearch provider, and
//! `DocumentService`, the generic CRUD and query service application code uses.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod service;
pub mod types;
pub mod utils;

pub use config::DocumentServiceConfig;
pub use errors::SearchIndexError;
pub use interfaces::SearchEngineProvider;
pub use opensearch::{IndexSettings, OpenSearchProvider};
pub use service::DocumentService;
pub use types::SearchOutput;
pub use utils::validate_document_id;
