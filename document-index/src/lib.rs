//! # Document Index
//!
//! Command line access to a document index stored in OpenSearch.
//!
//! ## Modules
//!
//! - [`config`]: Settings and dependency initialization from the environment
//! - [`commands`]: Command line definition and execution against `DocumentService`
//! - [`errors`]: Error types for the binary

pub mod commands;
pub mod config;
pub mod errors;

pub use commands::{Cli, Command};
pub use config::{ConnectionMode, Dependencies, Settings};
pub use errors::AppError;
