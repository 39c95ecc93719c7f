use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::time;

use reportal::context::{Branch, SessionContext, UserProfile};
use reportal::filter::{FieldValue, FilterValueStore};
use reportal::lookup::{LookupError, LookupOutcome, LookupResolver};
use reportal::schema::{ItemType, ParameterDescriptor};
use reportal::service::{
    ExecuteRequest, ExecuteResponse, LookupQuery, QueryService, ServiceError, ServiceResult,
};

/// Search stub that records calls and answers with a canned body after an
/// optional delay.
struct StubSearch {
    calls: AtomicUsize,
    last_query: Mutex<Option<LookupQuery>>,
    body: Value,
    delay: Duration,
}

impl StubSearch {
    fn new(body: Value) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            last_query: Mutex::new(None),
            body,
            delay: Duration::ZERO,
        }
    }

    fn with_delay(body: Value, delay: Duration) -> Self {
        Self {
            delay,
            ..Self::new(body)
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_query(&self) -> Option<LookupQuery> {
        self.last_query.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueryService for StubSearch {
    async fn search_lookup(&self, query: &LookupQuery) -> ServiceResult<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some(query.clone());
        if !self.delay.is_zero() {
            time::sleep(self.delay).await;
        }
        Ok(self.body.clone())
    }

    async fn execute_report(&self, _request: &ExecuteRequest) -> ServiceResult<ExecuteResponse> {
        Err(ServiceError::transport("not a report service"))
    }
}

fn lookup_field(name: &str, lookup_key: &str) -> ParameterDescriptor {
    ParameterDescriptor {
        module_id: 10,
        section: "Filters".to_string(),
        name: name.to_string(),
        item_type: ItemType::Combo,
        caption: None,
        order: 0,
        mandatory: false,
        hidden: false,
        lookup_key: Some(lookup_key.to_string()),
        max_length: None,
    }
}

fn context_with_profile(branch_id: &str) -> Arc<SessionContext> {
    Arc::new(SessionContext::new(
        Vec::new(),
        UserProfile {
            branch_id: Some(branch_id.to_string()),
        },
        None,
    ))
}

fn client_records() -> Value {
    json!({ "record": [
        { "ClientID": "C-1", "Name": "Acme Ltd" },
        { "ClientID": "C-2", "Name": "Apex Plc" },
    ]})
}

#[tokio::test]
async fn test_short_term_never_calls_the_service() {
    let service = Arc::new(StubSearch::new(client_records()));
    let resolver = LookupResolver::new(service.clone(), context_with_profile("007"));
    let field = lookup_field("ClientID", "ClientID");

    let outcome = resolver
        .resolve(&field, "a", &FilterValueStore::default())
        .await
        .unwrap();

    assert_eq!(outcome, LookupOutcome::Options(Vec::new()));
    assert_eq!(service.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_settled_term_issues_exactly_one_call() {
    let service = Arc::new(StubSearch::new(client_records()));
    let resolver = LookupResolver::new(service.clone(), context_with_profile("007"));
    let field = lookup_field("ClientID", "ClientID");

    let outcome = resolver
        .resolve(&field, "ac", &FilterValueStore::default())
        .await
        .unwrap();

    assert_eq!(service.call_count(), 1);
    let query = service.last_query().unwrap();
    assert_eq!(query.lookup_table, "ClientID");
    assert_eq!(query.branch_scope, "007");
    assert_eq!(query.search_term, "ac");

    match outcome {
        LookupOutcome::Options(options) => {
            assert_eq!(options.len(), 2);
            assert_eq!(options[0].value, "C-1");
            assert_eq!(options[0].label, "C-1 - Acme Ltd");
        }
        LookupOutcome::Superseded => panic!("expected options"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_new_keystroke_supersedes_pending_call() {
    let service = Arc::new(StubSearch::new(client_records()));
    let resolver = LookupResolver::new(service.clone(), context_with_profile("007"));
    let field = lookup_field("ClientID", "ClientID");
    let store = FilterValueStore::default();

    let (first, second) = tokio::join!(resolver.resolve(&field, "ac", &store), async {
        time::sleep(Duration::from_millis(100)).await;
        resolver.resolve(&field, "acm", &store).await
    });

    // The superseded call never reached the service.
    assert_eq!(service.call_count(), 1);
    assert_eq!(first.unwrap(), LookupOutcome::Superseded);
    assert!(matches!(second.unwrap(), LookupOutcome::Options(_)));
    assert_eq!(service.last_query().unwrap().search_term, "acm");
}

#[tokio::test(start_paused = true)]
async fn test_stale_response_is_never_published() {
    let service = Arc::new(StubSearch::with_delay(
        client_records(),
        Duration::from_millis(300),
    ));
    let resolver = LookupResolver::new(service.clone(), context_with_profile("007"));
    let field = lookup_field("ClientID", "ClientID");
    let store = FilterValueStore::default();

    // The first call is in flight at the service when the second starts;
    // its late response must be discarded, not applied over the newer one.
    let (first, second) = tokio::join!(resolver.resolve(&field, "ac", &store), async {
        time::sleep(Duration::from_millis(600)).await;
        resolver.resolve(&field, "acme", &store).await
    });

    assert_eq!(service.call_count(), 2);
    assert_eq!(first.unwrap(), LookupOutcome::Superseded);

    let LookupOutcome::Options(options) = second.unwrap() else {
        panic!("expected options");
    };
    assert_eq!(resolver.options("ClientID").await, options);
    assert_eq!(service.last_query().unwrap().search_term, "acme");
}

#[tokio::test(start_paused = true)]
async fn test_branch_scope_precedence() {
    let service = Arc::new(StubSearch::new(client_records()));
    let branches = vec![Branch {
        branch_id: "001".to_string(),
        branch_name: "Head Office".to_string(),
    }];
    let context = Arc::new(SessionContext::new(
        branches,
        UserProfile {
            branch_id: Some("007".to_string()),
        },
        None,
    ));
    let resolver = LookupResolver::new(service.clone(), context);
    let field = lookup_field("ClientID", "ClientID");

    // A branch-id field value in the store wins over the profile.
    let mut store = FilterValueStore::default();
    store.set("OurBranchID", FieldValue::text("014"));
    resolver.resolve(&field, "ac", &store).await.unwrap();
    assert_eq!(service.last_query().unwrap().branch_scope, "014");

    // Without a store value the profile branch wins over the cached list.
    let store = FilterValueStore::default();
    resolver.resolve(&field, "ac", &store).await.unwrap();
    assert_eq!(service.last_query().unwrap().branch_scope, "007");
}

#[tokio::test(start_paused = true)]
async fn test_first_cached_branch_is_the_last_resort() {
    let service = Arc::new(StubSearch::new(client_records()));
    let branches = vec![Branch {
        branch_id: "001".to_string(),
        branch_name: "Head Office".to_string(),
    }];
    let context = Arc::new(SessionContext::new(branches, UserProfile::default(), None));
    let resolver = LookupResolver::new(service.clone(), context);
    let field = lookup_field("ClientID", "ClientID");

    resolver
        .resolve(&field, "ac", &FilterValueStore::default())
        .await
        .unwrap();
    assert_eq!(service.last_query().unwrap().branch_scope, "001");
}

#[tokio::test(start_paused = true)]
async fn test_missing_branch_scope_fails_fast() {
    let service = Arc::new(StubSearch::new(client_records()));
    let resolver = LookupResolver::new(service.clone(), Arc::new(SessionContext::default()));
    let field = lookup_field("ClientID", "ClientID");

    let err = resolver
        .resolve(&field, "ac", &FilterValueStore::default())
        .await
        .unwrap_err();

    assert!(matches!(err, LookupError::MissingBranchScope));
    assert_eq!(service.call_count(), 0);
}

#[tokio::test]
async fn test_branch_lookup_resolves_from_cache_without_service() {
    let service = Arc::new(StubSearch::new(client_records()));
    let records = [
        json!({ "branchId": "001", "branchName": "Head Office" }),
        json!({ "branchId": "014", "branchName": "Harbor" }),
    ];
    let context = Arc::new(SessionContext::from_raw_branches(
        &records,
        UserProfile::default(),
        None,
    ));
    let resolver = LookupResolver::new(service.clone(), context);
    let field = lookup_field("OurBranchID", "Branches");

    let outcome = resolver
        .resolve(&field, "har", &FilterValueStore::default())
        .await
        .unwrap();

    let LookupOutcome::Options(options) = outcome else {
        panic!("expected options");
    };
    assert_eq!(options.len(), 1);
    assert_eq!(options[0].value, "014");
    assert_eq!(options[0].label, "014 - Harbor");
    assert_eq!(service.call_count(), 0);
}

#[tokio::test]
async fn test_field_without_lookup_key_resolves_empty() {
    let service = Arc::new(StubSearch::new(client_records()));
    let resolver = LookupResolver::new(service.clone(), context_with_profile("007"));
    let mut field = lookup_field("Note", "");
    field.lookup_key = None;

    let outcome = resolver
        .resolve(&field, "anything", &FilterValueStore::default())
        .await
        .unwrap();

    assert_eq!(outcome, LookupOutcome::Options(Vec::new()));
    assert_eq!(service.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_lookups_for_distinct_fields_run_concurrently() {
    let service = Arc::new(StubSearch::new(client_records()));
    let resolver = LookupResolver::new(service.clone(), context_with_profile("007"));
    let clients = lookup_field("ClientID", "ClientID");
    let names = lookup_field("ClientName", "Names");
    let store = FilterValueStore::default();

    let (first, second) = tokio::join!(
        resolver.resolve(&clients, "ac", &store),
        resolver.resolve(&names, "ap", &store),
    );

    // Neither field supersedes the other.
    assert!(matches!(first.unwrap(), LookupOutcome::Options(_)));
    assert!(matches!(second.unwrap(), LookupOutcome::Options(_)));
    assert_eq!(service.call_count(), 2);
}
