use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use txview_core::api::PaginatedRequestParams;
use txview_core::{
    ApiError, ApiResult, Backend, Employee, Endpoint, FetchController, PaginatedResponse,
    RequestCache, Transaction, TransactionPager, ViewController,
};

/// Serves canned responses keyed by request cache key and records every call.
#[derive(Default)]
struct ScriptedBackend {
    responses: HashMap<String, Value>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    fn respond(mut self, endpoint: Endpoint, params: Value, response: Value) -> Self {
        self.responses.insert(RequestCache::key(endpoint, &params), response);
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Backend for ScriptedBackend {
    async fn fetch(&self, endpoint: Endpoint, params: Value) -> ApiResult<Value> {
        let key = RequestCache::key(endpoint, &params);
        self.calls.lock().unwrap().push(key.clone());
        self.responses
            .get(&key)
            .cloned()
            .ok_or(ApiError::NotFound(key))
    }
}

fn employee(id: &str) -> Employee {
    Employee::new(id, "Test", id.to_uppercase())
}

fn transaction(id: &str, employee_id: &str) -> Value {
    json!({
        "id": id,
        "amount": 12.5,
        "employee": employee(employee_id),
        "merchant": "Corner Store",
        "date": "2024-05-01",
        "approved": false
    })
}

fn ids(transactions: Option<&[Transaction]>) -> Vec<&str> {
    transactions
        .unwrap_or_default()
        .iter()
        .map(|t| t.id.as_str())
        .collect()
}

fn scripted() -> ScriptedBackend {
    ScriptedBackend::default()
        .respond(Endpoint::Employees, Value::Null, json!([employee("a"), employee("b")]))
        .respond(
            Endpoint::PaginatedTransactions,
            json!({"page": 0}),
            json!({"data": [transaction("t1", "a"), transaction("t2", "b")], "nextPage": 1}),
        )
        .respond(
            Endpoint::PaginatedTransactions,
            json!({"page": 1}),
            json!({"data": [transaction("t3", "a")], "nextPage": null}),
        )
        .respond(
            Endpoint::TransactionsByEmployee,
            json!({"employeeId": "a"}),
            json!({"data": [transaction("t1", "a"), transaction("t3", "a")], "nextPage": null}),
        )
}

#[tokio::test]
async fn test_pager_merges_pages_then_stops() {
    let backend = Arc::new(scripted());
    let mut pager = TransactionPager::new(FetchController::new(
        backend.clone(),
        Arc::new(RequestCache::new()),
    ));

    pager.fetch_all().await.unwrap();
    pager.fetch_more().await.unwrap();

    assert_eq!(ids(pager.transactions()), vec!["t1", "t2", "t3"]);
    assert_eq!(pager.next_page(), None);

    let settled: Option<PaginatedResponse<Vec<Transaction>>> = pager.data().cloned();
    pager.fetch_more().await.unwrap();
    assert_eq!(pager.data().cloned(), settled);
    assert_eq!(backend.calls().len(), 2);
}

#[tokio::test]
async fn test_full_browsing_session() {
    let backend = Arc::new(scripted());
    let cache = Arc::new(RequestCache::new());
    let mut view = ViewController::new(backend.clone(), cache.clone());

    view.initialize().await.unwrap();
    assert_eq!(ids(view.transactions()), vec!["t1", "t2"]);
    assert!(view.show_view_more());

    view.load_more().await.unwrap();
    assert_eq!(ids(view.transactions()), vec!["t1", "t2", "t3"]);
    assert!(!view.show_view_more());

    view.set_approval("t2", true);

    view.select_employee(Some(employee("a"))).await.unwrap();
    assert_eq!(ids(view.transactions()), vec!["t1", "t3"]);
    assert!(!view.show_view_more());

    view.select_employee(Some(Employee::empty())).await.unwrap();
    assert_eq!(ids(view.transactions()), vec!["t1", "t2"]);
    assert_eq!(view.approvals().get("t2"), Some(&true));

    // Every distinct request reached the backend exactly once.
    let calls = backend.calls();
    assert_eq!(calls.len(), 4);
    assert_eq!(cache.len(), 4);
    assert!(calls.contains(&RequestCache::key(
        Endpoint::PaginatedTransactions,
        &serde_json::to_value(PaginatedRequestParams::page(1)).unwrap(),
    )));
}

#[tokio::test]
async fn test_backend_errors_reach_the_caller_unchanged() {
    let backend = Arc::new(scripted());
    let mut view = ViewController::new(backend, Arc::new(RequestCache::new()));
    view.initialize().await.unwrap();

    let err = view.select_employee(Some(employee("zzz"))).await.unwrap_err();
    match err {
        ApiError::NotFound(key) => assert_eq!(key, r#"transactionsByEmployee{"employeeId":"zzz"}"#),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(view.transactions().is_none());
}
