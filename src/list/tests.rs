//! Tests for list orchestration

use super::*;
use crate::payload::{BatchEntry, BatchResponse, SingleResponse};
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

// ============================================================================
// Fake backend
// ============================================================================

/// In-memory listing of `total` numbered entries served 50 per page
#[derive(Default)]
struct FakeBackend {
    total: u64,
    page_size: u64,
    calls: Mutex<Vec<Command>>,
    batches: Mutex<Vec<Vec<Command>>>,
    batch_errors: Vec<String>,
    fail_call: bool,
    fail_batch: bool,
}

impl FakeBackend {
    fn new(total: u64) -> Self {
        Self {
            total,
            page_size: 50,
            ..Self::default()
        }
    }

    fn page(&self, command: &Command) -> SingleResponse {
        let start = command.params["start"].as_u64().unwrap();
        let end = (start + self.page_size).min(self.total);
        let result = (start..end).map(|i| json!({"ID": i})).collect();
        let next = (end < self.total).then_some(end);
        let mut response = SingleResponse::new(result, self.total, next);
        response.time = json!(1);
        response
    }

    fn calls(&self) -> Vec<Command> {
        self.calls.lock().unwrap().clone()
    }

    fn batches(&self) -> Vec<Vec<Command>> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl CallExecutor for FakeBackend {
    async fn call(&self, command: &Command) -> Result<SingleResponse> {
        self.calls.lock().unwrap().push(command.clone());
        if self.fail_call {
            return Err(Error::http_status(503, "unavailable"));
        }
        Ok(self.page(command))
    }
}

#[async_trait]
impl BatchExecutor for FakeBackend {
    async fn batch(&self, commands: &[Command]) -> Result<BatchResponse> {
        self.batches.lock().unwrap().push(commands.to_vec());
        if self.fail_batch {
            return Err(Error::api("INTERNAL_SERVER_ERROR", "batch failed"));
        }

        let mut response = BatchResponse {
            time: json!(2),
            ..BatchResponse::default()
        };
        for (i, command) in commands.iter().enumerate() {
            let key = format!("cmd{i}");
            let page = self.page(command);
            response.result_total.insert(key.clone(), Some(page.total));
            response.result_next.insert(key.clone(), page.next);
            response
                .result
                .insert(key, BatchEntry::Sequence(page.result));
        }
        for (i, error) in self.batch_errors.iter().enumerate() {
            response.result_error.insert(format!("cmd{i}"), error.clone());
        }
        Ok(response)
    }
}

fn params(value: Value) -> Params {
    value.as_object().cloned().unwrap()
}

fn ids(payload: &ListPayload) -> Vec<u64> {
    payload
        .result
        .iter()
        .map(|e| e["ID"].as_u64().unwrap())
        .collect()
}

fn starts(commands: &[Command]) -> Vec<u64> {
    commands
        .iter()
        .map(|c| c.params["start"].as_u64().unwrap())
        .collect()
}

// ============================================================================
// Single page
// ============================================================================

#[tokio::test]
async fn test_single_page_returns_first_call() {
    let backend = FakeBackend::new(20);
    let lister = Lister::new(&backend, &backend);

    let payload = lister
        .list("crm.deal.list", params(json!({"select": ["ID"]})))
        .await
        .unwrap();

    assert_eq!(payload.len(), 20);
    assert_eq!(payload.total, 20);
    assert_eq!(payload.next, None);
    assert_eq!(payload.error, "");
    assert_eq!(payload.time, json!(1));
    assert!(backend.batches().is_empty());

    let calls = backend.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].params["start"], 0);
    assert_eq!(calls[0].params["select"], json!(["ID"]));
}

#[tokio::test]
async fn test_first_call_soft_error_is_kept() {
    struct SoftError;

    #[async_trait]
    impl CallExecutor for SoftError {
        async fn call(&self, _command: &Command) -> Result<SingleResponse> {
            let mut response = SingleResponse::new(vec![json!(1)], 1, None);
            response.error = Some("partial".to_string());
            Ok(response)
        }
    }

    let backend = FakeBackend::new(0);
    let lister = Lister::new(SoftError, &backend);

    let payload = lister.list("user.get", Params::new()).await.unwrap();
    assert_eq!(payload.result, vec![json!(1)]);
    assert_eq!(payload.error, "partial");
}

// ============================================================================
// Batched pages
// ============================================================================

#[tokio::test]
async fn test_full_listing_refetches_from_start() {
    let backend = FakeBackend::new(120);
    let lister = Lister::new(&backend, &backend);

    let payload = lister.list("crm.lead.list", Params::new()).await.unwrap();

    let batches = backend.batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(starts(&batches[0]), vec![0, 50, 100]);

    assert_eq!(payload.len(), 120);
    assert_eq!(ids(&payload), (0..120).collect::<Vec<_>>());
    assert_eq!(payload.total, 120);
    assert_eq!(payload.next, Some(100));
    assert_eq!(payload.time, json!(2));
}

#[tokio::test]
async fn test_listing_from_offset() {
    let backend = FakeBackend::new(120);
    let lister = Lister::new(&backend, &backend);

    let payload = lister
        .list("crm.lead.list", params(json!({"start": 50, "order": {"ID": "ASC"}})))
        .await
        .unwrap();

    assert_eq!(backend.calls()[0].params["start"], 50);

    let batches = backend.batches();
    assert_eq!(starts(&batches[0]), vec![50, 100]);
    for command in &batches[0] {
        assert_eq!(command.method, "crm.lead.list");
        assert_eq!(command.params["order"], json!({"ID": "ASC"}));
    }

    assert_eq!(ids(&payload), (50..120).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_batch_errors_are_joined() {
    let backend = FakeBackend {
        batch_errors: vec![String::new(), "ACCESS_DENIED".to_string()],
        ..FakeBackend::new(90)
    };
    let lister = Lister::new(&backend, &backend);

    let payload = lister.list("crm.deal.list", Params::new()).await.unwrap();
    assert_eq!(payload.error, "\nACCESS_DENIED");
    assert_eq!(payload.len(), 90);
}

#[tokio::test]
async fn test_custom_page_size() {
    let backend = FakeBackend {
        page_size: 10,
        ..FakeBackend::new(35)
    };
    let lister = Lister::new(&backend, &backend).with_page_size(10);

    let payload = lister.list("crm.deal.list", Params::new()).await.unwrap();
    assert_eq!(starts(&backend.batches()[0]), vec![0, 10, 20, 30]);
    assert_eq!(payload.len(), 35);
}

#[tokio::test]
async fn test_total_not_above_start_skips_batch() {
    struct Stale;

    #[async_trait]
    impl CallExecutor for Stale {
        async fn call(&self, _command: &Command) -> Result<SingleResponse> {
            Ok(SingleResponse::new(vec![json!("x")], 40, Some(90)))
        }
    }

    let backend = FakeBackend::new(0);
    let lister = Lister::new(Stale, &backend);

    let payload = lister
        .list("crm.deal.list", params(json!({"start": 50})))
        .await
        .unwrap();

    assert!(backend.batches().is_empty());
    assert_eq!(payload.result, vec![json!("x")]);
    assert_eq!(payload.total, 40);
    assert_eq!(payload.next, Some(90));
}

#[tokio::test]
async fn test_list_is_repeatable() {
    let backend = FakeBackend::new(75);
    let lister = Lister::new(&backend, &backend);

    let first = lister.list("crm.deal.list", Params::new()).await.unwrap();
    let second = lister.list("crm.deal.list", Params::new()).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_shared_executor() {
    let backend = Arc::new(FakeBackend::new(60));
    let lister = Lister::shared(Arc::clone(&backend));

    let payload = lister.list("crm.deal.list", Params::new()).await.unwrap();
    assert_eq!(payload.len(), 60);
    assert_eq!(backend.calls().len(), 1);
    assert_eq!(backend.batches().len(), 1);
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_call_failure_propagates() {
    let backend = FakeBackend {
        fail_call: true,
        ..FakeBackend::new(120)
    };
    let lister = Lister::new(&backend, &backend);

    let err = lister
        .list("crm.deal.list", Params::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 503, .. }));
    assert!(backend.batches().is_empty());
}

#[tokio::test]
async fn test_batch_failure_propagates() {
    let backend = FakeBackend {
        fail_batch: true,
        ..FakeBackend::new(120)
    };
    let lister = Lister::new(&backend, &backend);

    let err = lister
        .list("crm.deal.list", Params::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Api { .. }));
}

#[tokio::test]
async fn test_unlisted_method_is_rejected() {
    let backend = FakeBackend::new(10);
    let lister = Lister::new(&backend, &backend);

    let err = lister
        .list("crm.deal.get", Params::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotListable { .. }));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_custom_registry() {
    let backend = FakeBackend::new(10);
    let lister = Lister::new(&backend, &backend)
        .with_registry(MethodRegistry::empty().with_listable("app.item.list"));

    assert!(lister.list("app.item.list", Params::new()).await.is_ok());
    assert!(lister.list("crm.deal.list", Params::new()).await.is_err());
}

#[tokio::test]
async fn test_invalid_start_is_rejected() {
    let backend = FakeBackend::new(10);
    let lister = Lister::new(&backend, &backend);

    let err = lister
        .list("crm.deal.list", params(json!({"start": -5})))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidParams { .. }));
    assert!(backend.calls().is_empty());
}

#[test]
#[should_panic(expected = "page size must be positive")]
fn test_zero_page_size_panics() {
    let backend = FakeBackend::new(0);
    let _ = Lister::new(&backend, &backend).with_page_size(0);
}
