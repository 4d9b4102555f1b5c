//! Command line definition and command execution.
//!
//! Each command maps to one `DocumentService` operation and produces a JSON value
//! that the binary prints to stdout.

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use document_index_repository::DocumentService;
use document_index_shared::{RawDocument, SortOrder, SortSpec};

use crate::AppError;

#[derive(Parser, Debug)]
#[command(name = "document-index")]
#[command(about = "Read, write and query documents of one search index", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Index one document (the id is taken from "id" when present)
    Index {
        #[arg(value_parser = parse_document)]
        document: RawDocument,
    },
    /// Index a JSON array of documents in one bulk request
    IndexMany {
        #[arg(value_parser = parse_json)]
        documents: Value,
    },
    /// Get a document by id
    Get { id: String },
    /// Get several documents by id, skipping missing ones
    GetMany {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Merge fields into an existing document
    Update {
        id: String,
        #[arg(value_parser = parse_document)]
        document: RawDocument,
    },
    /// Delete a document by id
    Delete { id: String },
    /// Delete every document of the index
    DeleteAll,
    /// Return one page of hits
    Search {
        #[arg(value_parser = parse_json)]
        query: Value,

        /// Offset of the first hit
        #[arg(long, default_value = "0")]
        from: usize,

        /// Page size
        #[arg(long, default_value = "10")]
        size: usize,

        /// Sort clause as field[:asc|desc], repeatable
        #[arg(long = "sort", value_parser = parse_sort)]
        sorts: Vec<SortSpec>,
    },
    /// Return every hit up to the result window
    SearchAll {
        #[arg(value_parser = parse_json)]
        query: Value,

        /// Sort clause as field[:asc|desc], repeatable
        #[arg(long = "sort", value_parser = parse_sort)]
        sorts: Vec<SortSpec>,
    },
    /// Return hits sorted by distance from a point
    Near {
        /// A geo_point field
        field: String,

        #[arg(allow_negative_numbers = true)]
        lon: f64,

        #[arg(allow_negative_numbers = true)]
        lat: f64,

        /// Only return hits within this many kilometres
        #[arg(long = "within-km")]
        distance_km: Option<f64>,
    },
    /// Run one named aggregation
    Aggregate {
        name: String,

        #[arg(value_parser = parse_json)]
        aggregation: Value,

        /// Query the aggregation runs over (default: match_all)
        #[arg(long, value_parser = parse_json)]
        query: Option<Value>,
    },
}

fn parse_json(arg: &str) -> Result<Value, String> {
    serde_json::from_str(arg).map_err(|e| format!("invalid JSON: {}", e))
}

fn parse_document(arg: &str) -> Result<RawDocument, String> {
    RawDocument::from_value(parse_json(arg)?)
        .map_err(|e| format!("invalid document: {}", e))
}

/// Parse `field`, `field:asc` or `field:desc`.
fn parse_sort(arg: &str) -> Result<SortSpec, String> {
    let (field, order) = match arg.rsplit_once(':') {
        Some((field, "asc")) => (field, SortOrder::Asc),
        Some((field, "desc")) => (field, SortOrder::Desc),
        Some((_, order)) => {
            return Err(format!(
                "sort order must be 'asc' or 'desc', got '{}'",
                order
            ))
        }
        None => (arg, SortOrder::Asc),
    };
    if field.is_empty() {
        return Err("sort field is required".to_string());
    }
    Ok(SortSpec::field(field, order))
}

/// Execute a command and return its JSON output.
pub async fn run(
    command: Command,
    service: &DocumentService<RawDocument>,
) -> Result<Value, AppError> {
    let output = match command {
        Command::Index { document } => json!({ "id": service.index_one(&document).await? }),
        Command::IndexMany { documents } => {
            let documents: Vec<RawDocument> = serde_json::from_value(documents)
                .map_err(|e| AppError::input(format!("Expected an array of documents: {}", e)))?;
            serde_json::to_value(service.index_list(&documents).await?)?
        }
        Command::Get { id } => serde_json::to_value(service.get_by_id(&id).await?)?,
        Command::GetMany { ids } => {
            serde_json::to_value(service.get_by_ids(ids.as_slice()).await?)?
        }
        Command::Update { id, document } => {
            json!({ "updated": service.update_by_id(&id, &document).await? })
        }
        Command::Delete { id } => json!({ "deleted": service.delete_by_id(&id).await? }),
        Command::DeleteAll => json!({ "success": service.delete_all().await? }),
        Command::Search {
            query,
            from,
            size,
            sorts,
        } => serde_json::to_value(service.page_query_and_sort(query, &sorts, from, size).await?)?,
        Command::SearchAll { query, sorts } => {
            serde_json::to_value(service.query_all_and_sort(query, &sorts).await?)?
        }
        Command::Near {
            field,
            lon,
            lat,
            distance_km,
        } => serde_json::to_value(
            service
                .list_geo_by_point(
                    &field,
                    Some(lon),
                    Some(lat),
                    distance_km,
                    json!({ "match_all": {} }),
                )
                .await?,
        )?,
        Command::Aggregate {
            name,
            aggregation,
            query,
        } => {
            let query = query.unwrap_or_else(|| json!({ "match_all": {} }));
            service.aggregation_query(query, &name, aggregation).await?
        }
    };
    Ok(output)
}
