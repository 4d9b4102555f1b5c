//! Parsing of OpenSearch response bodies.
//!
//! These functions are independent of the HTTP client so they can be tested with
//! recorded response bodies.

use serde_json::Value;

use document_index_shared::{
    BulkItemResult, BulkSummary, DeleteOutcome, IndexOutcome, SearchHit, SearchHits,
};

use crate::errors::SearchIndexError;
use crate::types::SearchOutput;

fn str_field<'a>(body: &'a Value, field: &str) -> Result<&'a str, SearchIndexError> {
    body.get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| SearchIndexError::parse(format!("Response is missing '{}'", field)))
}

/// Parse the response of an index request.
pub fn parse_index_response(body: &Value) -> Result<IndexOutcome, SearchIndexError> {
    Ok(IndexOutcome {
        index: str_field(body, "_index")?.to_string(),
        id: str_field(body, "_id")?.to_string(),
        created: body.get("result").and_then(Value::as_str) == Some("created"),
    })
}

/// Parse a get response. A `found: false` body yields `None`.
pub fn parse_get_response(body: &Value) -> Result<Option<SearchHit>, SearchIndexError> {
    if !body.get("found").and_then(Value::as_bool).unwrap_or(false) {
        return Ok(None);
    }
    serde_json::from_value(body.clone())
        .map(Some)
        .map_err(|e| SearchIndexError::parse(format!("Invalid get response: {}", e)))
}

/// Parse a multi-get response, keeping only documents that were found.
pub fn parse_mget_response(body: &Value) -> Result<Vec<SearchHit>, SearchIndexError> {
    let docs = body
        .get("docs")
        .and_then(Value::as_array)
        .ok_or_else(|| SearchIndexError::parse("Response is missing 'docs'"))?;

    let mut hits = Vec::with_capacity(docs.len());
    for doc in docs {
        if let Some(hit) = parse_get_response(doc)? {
            hits.push(hit);
        }
    }
    Ok(hits)
}

/// Parse a delete response.
pub fn parse_delete_response(body: &Value) -> Result<DeleteOutcome, SearchIndexError> {
    Ok(DeleteOutcome {
        id: str_field(body, "_id")?.to_string(),
        deleted: body.get("result").and_then(Value::as_str) == Some("deleted"),
    })
}

/// Parse a bulk response into per-item results.
///
/// An item fails when it carries an `error` object. A delete of a missing document
/// reports `not_found` without an error and counts as a success.
pub fn parse_bulk_response(body: &Value) -> Result<BulkSummary, SearchIndexError> {
    let items = body
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| SearchIndexError::parse("Response is missing 'items'"))?;

    let results = items
        .iter()
        .map(|item| -> Result<BulkItemResult, SearchIndexError> {
            // Each item is keyed by its action: {"index": {...}} or {"delete": {...}}
            let detail = item
                .as_object()
                .and_then(|actions| actions.values().next())
                .ok_or_else(|| SearchIndexError::parse("Bulk item has no action"))?;

            let error = detail.get("error").map(|error| {
                error
                    .get("reason")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| error.to_string())
            });

            Ok(BulkItemResult {
                id: detail.get("_id").and_then(Value::as_str).map(str::to_string),
                success: error.is_none(),
                error,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(BulkSummary::from_results(results))
}

/// Parse a search response.
///
/// `hits.total` is accepted both as an object (`{"value": n}`) and as a bare number.
pub fn parse_search_response(body: &Value) -> Result<SearchOutput, SearchIndexError> {
    let hits = body
        .get("hits")
        .ok_or_else(|| SearchIndexError::parse("Response is missing 'hits'"))?;

    let total = match hits.get("total") {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(total) => total.get("value").and_then(Value::as_u64).unwrap_or(0),
        None => 0,
    };

    let hit_list = match hits.get("hits") {
        Some(list) => serde_json::from_value::<Vec<SearchHit>>(list.clone())
            .map_err(|e| SearchIndexError::parse(format!("Invalid search hits: {}", e)))?,
        None => Vec::new(),
    };

    Ok(SearchOutput {
        hits: SearchHits {
            total,
            max_score: hits.get("max_score").and_then(Value::as_f64),
            hits: hit_list,
        },
        aggregations: body.get("aggregations").cloned(),
        took_ms: body.get("took").and_then(Value::as_u64).unwrap_or(0),
    })
}
