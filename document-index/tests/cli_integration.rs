//! Integration tests for command execution.
//!
//! These tests parse real command lines and run them through `commands::run` against
//! a `DocumentService` backed by an in-memory provider.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use clap::Parser;
use document_index::{commands, AppError, Cli};
use document_index_repository::{
    DocumentService, DocumentServiceConfig, SearchEngineProvider, SearchIndexError, SearchOutput,
};
use document_index_shared::{
    BulkItemResult, BulkOperation, BulkSummary, DeleteOutcome, IndexOutcome, RawDocument,
    SearchHit, SearchHits,
};

const INDEX: &str = "shops";

// In-memory provider; searches return every stored document and record the body
#[derive(Default)]
struct InMemoryProvider {
    documents: Mutex<BTreeMap<String, Value>>,
    search_bodies: Mutex<Vec<Value>>,
    bulk_sizes: Mutex<Vec<usize>>,
    aggregations: Option<Value>,
}

impl InMemoryProvider {
    fn hit(id: &str, source: &Value) -> SearchHit {
        SearchHit {
            id: id.to_string(),
            index: INDEX.to_string(),
            score: Some(1.0),
            source: Some(source.clone()),
            sort: Vec::new(),
        }
    }

    async fn last_search(&self) -> Value {
        self.search_bodies
            .lock()
            .await
            .last()
            .cloned()
            .unwrap_or(Value::Null)
    }
}

#[async_trait]
impl SearchEngineProvider for InMemoryProvider {
    async fn ensure_index(
        &self,
        _index: &str,
        _settings: Option<&Value>,
    ) -> Result<bool, SearchIndexError> {
        Ok(false)
    }

    async fn index_document(
        &self,
        index: &str,
        id: Option<&str>,
        source: &Value,
    ) -> Result<IndexOutcome, SearchIndexError> {
        let mut documents = self.documents.lock().await;
        let id = id
            .map(str::to_string)
            .unwrap_or_else(|| format!("auto-{}", documents.len() + 1));
        let created = documents.insert(id.clone(), source.clone()).is_none();
        Ok(IndexOutcome {
            index: index.to_string(),
            id,
            created,
        })
    }

    async fn get_document(
        &self,
        _index: &str,
        id: &str,
    ) -> Result<Option<SearchHit>, SearchIndexError> {
        let documents = self.documents.lock().await;
        Ok(documents.get(id).map(|source| Self::hit(id, source)))
    }

    async fn multi_get(
        &self,
        _index: &str,
        ids: &[String],
    ) -> Result<Vec<SearchHit>, SearchIndexError> {
        let documents = self.documents.lock().await;
        Ok(ids
            .iter()
            .filter_map(|id| documents.get(id).map(|source| Self::hit(id, source)))
            .collect())
    }

    async fn bulk(
        &self,
        _index: &str,
        operations: &[BulkOperation],
    ) -> Result<BulkSummary, SearchIndexError> {
        self.bulk_sizes.lock().await.push(operations.len());
        let mut documents = self.documents.lock().await;

        let mut results = Vec::with_capacity(operations.len());
        for operation in operations {
            let result = match operation {
                BulkOperation::Index { id, source } => {
                    let id = id
                        .clone()
                        .unwrap_or_else(|| format!("auto-{}", documents.len() + 1));
                    documents.insert(id.clone(), source.clone());
                    BulkItemResult {
                        id: Some(id),
                        success: true,
                        error: None,
                    }
                }
                BulkOperation::Delete { id } => {
                    let found = documents.remove(id).is_some();
                    BulkItemResult {
                        id: Some(id.clone()),
                        success: found,
                        error: (!found).then(|| "not_found".to_string()),
                    }
                }
            };
            results.push(result);
        }
        Ok(BulkSummary::from_results(results))
    }

    async fn delete_document(
        &self,
        _index: &str,
        id: &str,
    ) -> Result<DeleteOutcome, SearchIndexError> {
        let deleted = self.documents.lock().await.remove(id).is_some();
        Ok(DeleteOutcome {
            id: id.to_string(),
            deleted,
        })
    }

    async fn update_document(
        &self,
        _index: &str,
        id: &str,
        doc: &Value,
    ) -> Result<(), SearchIndexError> {
        let mut documents = self.documents.lock().await;
        let stored = documents.get_mut(id).ok_or_else(|| {
            SearchIndexError::update(format!("document_missing_exception [{}]", id))
        })?;
        if let (Some(stored), Some(fields)) = (stored.as_object_mut(), doc.as_object()) {
            for (key, value) in fields {
                stored.insert(key.clone(), value.clone());
            }
        }
        Ok(())
    }

    async fn search(&self, _index: &str, body: &Value) -> Result<SearchOutput, SearchIndexError> {
        self.search_bodies.lock().await.push(body.clone());
        let documents = self.documents.lock().await;
        let hits: Vec<SearchHit> = documents
            .iter()
            .map(|(id, source)| Self::hit(id, source))
            .collect();
        Ok(SearchOutput {
            hits: SearchHits {
                total: hits.len() as u64,
                max_score: Some(1.0),
                hits,
            },
            aggregations: self.aggregations.clone(),
            took_ms: 1,
        })
    }
}

fn service_with(
    provider: Arc<InMemoryProvider>,
    config: DocumentServiceConfig,
) -> DocumentService<RawDocument> {
    DocumentService::with_config(provider, INDEX, config)
}

async fn run(service: &DocumentService<RawDocument>, args: &[&str]) -> Result<Value, AppError> {
    let cli = Cli::try_parse_from(std::iter::once("document-index").chain(args.iter().copied()))
        .unwrap();
    commands::run(cli.command, service).await
}

#[tokio::test]
async fn test_index_get_update_delete_cycle() {
    let provider = Arc::new(InMemoryProvider::default());
    let service = service_with(provider.clone(), DocumentServiceConfig::default());

    let output = run(&service, &["index", r#"{"id":"s1","name":"Corner","rating":4}"#])
        .await
        .unwrap();
    assert_eq!(output, json!({ "id": "s1" }));

    let output = run(&service, &["update", "s1", r#"{"rating":5}"#])
        .await
        .unwrap();
    assert_eq!(output, json!({ "updated": true }));

    let output = run(&service, &["get", "s1"]).await.unwrap();
    assert_eq!(output["id"], json!("s1"));
    assert_eq!(output["name"], json!("Corner"));
    assert_eq!(output["rating"], json!(5));

    let output = run(&service, &["delete", "s1"]).await.unwrap();
    assert_eq!(output, json!({ "deleted": true }));

    let output = run(&service, &["get", "s1"]).await.unwrap();
    assert_eq!(output, Value::Null);

    let output = run(&service, &["delete", "s1"]).await.unwrap();
    assert_eq!(output, json!({ "deleted": false }));
}

#[tokio::test]
async fn test_index_without_id_returns_generated_id() {
    let provider = Arc::new(InMemoryProvider::default());
    let service = service_with(provider.clone(), DocumentServiceConfig::default());

    let output = run(&service, &["index", r#"{"name":"Kiosk"}"#]).await.unwrap();

    assert_eq!(output, json!({ "id": "auto-1" }));
    assert!(provider.documents.lock().await.contains_key("auto-1"));
}

#[tokio::test]
async fn test_update_missing_document_fails() {
    let provider = Arc::new(InMemoryProvider::default());
    let service = service_with(provider, DocumentServiceConfig::default());

    let result = run(&service, &["update", "ghost", r#"{"rating":1}"#]).await;

    assert!(matches!(
        result,
        Err(AppError::SearchIndexError(SearchIndexError::UpdateError(_)))
    ));
}

#[tokio::test]
async fn test_index_many_and_get_many() {
    let provider = Arc::new(InMemoryProvider::default());
    let service = service_with(provider, DocumentServiceConfig::default());

    let output = run(
        &service,
        &[
            "index-many",
            r#"[{"id":"a","name":"A"},{"id":"b","name":"B"},{"id":"c","name":"C"}]"#,
        ],
    )
    .await
    .unwrap();
    assert_eq!(output["total"], json!(3));
    assert_eq!(output["failed"], json!(0));

    let output = run(&service, &["get-many", "a", "missing", "c"])
        .await
        .unwrap();
    let names: Vec<&Value> = output
        .as_array()
        .unwrap()
        .iter()
        .map(|doc| &doc["name"])
        .collect();
    assert_eq!(names, vec![&json!("A"), &json!("C")]);
}

#[tokio::test]
async fn test_index_many_over_batch_limit_is_rejected() {
    let provider = Arc::new(InMemoryProvider::default());
    let service = service_with(provider.clone(), DocumentServiceConfig::with_max_batch_size(2));

    let result = run(
        &service,
        &["index-many", r#"[{"id":"a"},{"id":"b"},{"id":"c"}]"#],
    )
    .await;

    assert!(matches!(
        result,
        Err(AppError::SearchIndexError(
            SearchIndexError::BatchSizeExceeded { .. }
        ))
    ));
    assert!(provider.bulk_sizes.lock().await.is_empty());
}

#[tokio::test]
async fn test_delete_all_chunks_by_batch_size() {
    let provider = Arc::new(InMemoryProvider::default());
    let service = service_with(provider.clone(), DocumentServiceConfig::with_max_batch_size(2));

    for id in ["a", "b", "c", "d", "e"] {
        let document = format!(r#"{{"id":"{}"}}"#, id);
        run(&service, &["index", document.as_str()])
            .await
            .unwrap();
    }

    let output = run(&service, &["delete-all"]).await.unwrap();

    assert_eq!(output, json!({ "success": true }));
    assert!(provider.documents.lock().await.is_empty());
    assert_eq!(*provider.bulk_sizes.lock().await, vec![2, 2, 1]);
    assert_eq!(provider.last_search().await["_source"], json!(false));
}

#[tokio::test]
async fn test_delete_all_on_empty_index_succeeds() {
    let provider = Arc::new(InMemoryProvider::default());
    let service = service_with(provider.clone(), DocumentServiceConfig::default());

    let output = run(&service, &["delete-all"]).await.unwrap();

    assert_eq!(output, json!({ "success": true }));
    assert!(provider.bulk_sizes.lock().await.is_empty());
}

#[tokio::test]
async fn test_search_sends_paging_and_sort() {
    let provider = Arc::new(InMemoryProvider::default());
    let service = service_with(provider.clone(), DocumentServiceConfig::default());
    run(&service, &["index", r#"{"id":"a","rating":3}"#])
        .await
        .unwrap();

    let output = run(
        &service,
        &[
            "search",
            r#"{"term":{"city":"Lyon"}}"#,
            "--from",
            "10",
            "--size",
            "5",
            "--sort",
            "rating:desc",
        ],
    )
    .await
    .unwrap();
    assert_eq!(output["total"], json!(1));

    let body = provider.last_search().await;
    assert_eq!(body["query"], json!({ "term": { "city": "Lyon" } }));
    assert_eq!(body["from"], json!(10));
    assert_eq!(body["size"], json!(5));
    assert_eq!(body["sort"], json!([{ "rating": { "order": "desc" } }]));
}

#[tokio::test]
async fn test_search_sort_without_paging_uses_first_page() {
    let provider = Arc::new(InMemoryProvider::default());
    let service = service_with(provider.clone(), DocumentServiceConfig::default());

    run(
        &service,
        &["search", r#"{"match_all":{}}"#, "--sort", "rating:desc"],
    )
    .await
    .unwrap();

    let body = provider.last_search().await;
    assert_eq!(body["from"], json!(0));
    assert_eq!(body["size"], json!(10));
    assert_eq!(body["sort"], json!([{ "rating": { "order": "desc" } }]));
}

#[tokio::test]
async fn test_search_beyond_result_window_is_rejected() {
    let provider = Arc::new(InMemoryProvider::default());
    let service = service_with(provider.clone(), DocumentServiceConfig::default());

    let result = run(&service, &[
            "search",
            r#"{"match_all":{}}"#,
            "--from",
            "9995",
            "--size",
            "10",
        ],).await;

    assert!(matches!(
        result,
        Err(AppError::SearchIndexError(SearchIndexError::ValidationError(_)))
    ));
    assert!(provider.search_bodies.lock().await.is_empty());
}

#[tokio::test]
async fn test_search_all_uses_result_window() {
    let provider = Arc::new(InMemoryProvider::default());
    let service = service_with(provider.clone(), DocumentServiceConfig::default());
    run(&service, &["index-many", r#"[{"id":"a"},{"id":"b"}]"#])
        .await
        .unwrap();

    let output = run(&service, &["search-all", r#"{"match_all":{}}"#, "--sort", "name"])
        .await
        .unwrap();

    assert_eq!(output.as_array().map(Vec::len), Some(2));
    let body = provider.last_search().await;
    assert_eq!(body["size"], json!(10_000));
    assert_eq!(body["sort"], json!([{ "name": { "order": "asc" } }]));
}

#[tokio::test]
async fn test_near_builds_geo_filter_and_sort() {
    let provider = Arc::new(InMemoryProvider::default());
    let service = service_with(provider.clone(), DocumentServiceConfig::default());

    run(&service, &["near", "location", "121.47", "31.23", "--within-km", "3"])
        .await
        .unwrap();

    let body = provider.last_search().await;
    assert_eq!(body["min_score"], json!(0.1));
    assert_eq!(body["size"], json!(10_000));
    assert_eq!(body["post_filter"]["geo_distance"]["distance"], json!("3km"));
    assert_eq!(
        body["post_filter"]["geo_distance"]["location"],
        json!({ "lat": 31.23, "lon": 121.47 })
    );
    assert_eq!(body["sort"][0]["_geo_distance"]["unit"], json!("km"));
    assert_eq!(body["sort"][0]["_geo_distance"]["order"], json!("asc"));
}

#[tokio::test]
async fn test_near_without_radius_skips_unlocated_documents() {
    let provider = Arc::new(InMemoryProvider::default());
    let service = service_with(provider.clone(), DocumentServiceConfig::default());

    run(&service, &["near", "location", "2.35", "48.85"])
        .await
        .unwrap();

    let body = provider.last_search().await;
    assert_eq!(
        body["post_filter"],
        json!({ "exists": { "field": "location" } })
    );
    assert!(body["sort"][0].get("_geo_distance").is_some());
}

#[tokio::test]
async fn test_aggregate_returns_aggregations() {
    let buckets = json!({
        "by_city": { "buckets": [{ "key": "Lyon", "doc_count": 2 }] }
    });
    let provider = Arc::new(InMemoryProvider {
        aggregations: Some(buckets.clone()),
        ..InMemoryProvider::default()
    });
    let service = service_with(provider.clone(), DocumentServiceConfig::default());

    let output = run(
        &service,
        &["aggregate", "by_city", r#"{"terms":{"field":"city"}}"#],
    )
    .await
    .unwrap();

    assert_eq!(output, buckets);
    let body = provider.last_search().await;
    assert_eq!(body["size"], json!(0));
    assert_eq!(body["aggs"]["by_city"], json!({ "terms": { "field": "city" } }));
}

#[tokio::test]
async fn test_indexed_documents_read_back() {
    let provider = Arc::new(InMemoryProvider::default());
    let service = service_with(provider.clone(), DocumentServiceConfig::default());

    let output = run(&service, &["index", r#"{"name":"Kiosk","tags":["news"]}"#])
        .await
        .unwrap();
    let id = output["id"].as_str().unwrap().to_string();

    let fetched = run(&service, &["get", id.as_str()]).await.unwrap();
    assert_eq!(fetched, json!({ "id": id, "name": "Kiosk", "tags": ["news"] }));

    let fetched = run(&service, &["get-many", id.as_str()]).await.unwrap();
    assert_eq!(fetched.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_index_rejects_non_string_id() {
    let parsed = Cli::try_parse_from(["document-index", "index", r#"{"id":7,"name":"Kiosk"}"#]);
    assert!(parsed.is_err());

    let provider = Arc::new(InMemoryProvider::default());
    let service = service_with(provider.clone(), DocumentServiceConfig::default());

    let result = run(
        &service,
        &["index-many", r#"[{"id":"a"},{"id":7,"name":"Kiosk"}]"#],
    )
    .await;

    assert!(matches!(result, Err(AppError::InputError(_))));
    assert!(provider.documents.lock().await.is_empty());
}
