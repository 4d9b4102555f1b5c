//! Interface definitions for the search engine provider.
//!
//! This module defines the abstract `SearchEngineProvider` trait that allows
//! for dependency injection and swappable search backend implementations.

mod search_engine_provider;

pub use search_engine_provider::SearchEngineProvider;
