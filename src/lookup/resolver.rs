//! Debounced resolution of lookup fields against the search service.
//!
//! One debounce window per field: a new call for the same field supersedes
//! the pending one, while lookups for distinct fields may be in flight
//! concurrently. Every call carries a per-field sequence number and a
//! response is published only when it is still the latest for its field, so
//! a slow, stale response can never overwrite a newer one.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time;

use super::projection::{LookupOption, Projection};
use crate::config::LookupSettings;
use crate::context::SessionContext;
use crate::filter::FilterValueStore;
use crate::schema::ParameterDescriptor;
use crate::service::{lookup_records, LookupQuery, QueryService, ServiceError};

/// Default quiet interval before a lookup call fires.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Search terms shorter than this never reach the service.
pub const MIN_TERM_LEN: usize = 2;

/// Store fields consulted, in order, for the branch scope of a lookup call.
const BRANCH_SCOPE_FIELDS: [&str; 2] = ["OurBranchID", "FromBranchID"];

pub type LookupResult<T> = Result<T, LookupError>;

/// Lookup failures degrade to an empty option list at the form; they never
/// block it.
#[derive(Debug, Error)]
pub enum LookupError {
    /// No branch scope could be resolved; the service is never called
    /// without one.
    #[error("no branch scope available for lookup")]
    MissingBranchScope,

    /// The search call itself failed.
    #[error("lookup search failed: {0}")]
    Service(#[from] ServiceError),
}

/// Outcome of a single resolve call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// Options for the latest search term of the field.
    Options(Vec<LookupOption>),
    /// A newer call for the same field superseded this one; its result was
    /// discarded.
    Superseded,
}

#[derive(Default)]
struct FieldState {
    latest_seq: u64,
    options: Vec<LookupOption>,
}

/// Resolves free-text input into selectable options for lookup fields.
pub struct LookupResolver {
    service: Arc<dyn QueryService>,
    context: Arc<SessionContext>,
    debounce: Duration,
    min_term_len: usize,
    fields: Mutex<HashMap<String, FieldState>>,
}

impl LookupResolver {
    pub fn new(service: Arc<dyn QueryService>, context: Arc<SessionContext>) -> Self {
        Self::with_debounce(service, context, DEFAULT_DEBOUNCE)
    }

    pub fn with_debounce(
        service: Arc<dyn QueryService>,
        context: Arc<SessionContext>,
        debounce: Duration,
    ) -> Self {
        Self {
            service,
            context,
            debounce,
            min_term_len: MIN_TERM_LEN,
            fields: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_settings(
        service: Arc<dyn QueryService>,
        context: Arc<SessionContext>,
        settings: &LookupSettings,
    ) -> Self {
        Self {
            service,
            context,
            debounce: settings.debounce(),
            min_term_len: settings.min_term_len,
            fields: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve options for a field and search term.
    ///
    /// Branch-kind lookups are answered from the injected branch cache
    /// without debouncing or a service call. Terms shorter than the minimum
    /// return empty immediately.
    pub async fn resolve(
        &self,
        field: &ParameterDescriptor,
        term: &str,
        store: &FilterValueStore,
    ) -> LookupResult<LookupOutcome> {
        let Some(lookup_key) = field.lookup_key.as_deref().filter(|k| !k.is_empty()) else {
            return Ok(LookupOutcome::Options(Vec::new()));
        };

        if is_branch_lookup(lookup_key) {
            let options: Vec<LookupOption> = self
                .context
                .match_branches(term)
                .into_iter()
                .map(|b| LookupOption {
                    label: format!("{} - {}", b.branch_id, b.branch_name),
                    value: b.branch_id,
                })
                .collect();
            self.publish_local(&field.name, options.clone()).await;
            return Ok(LookupOutcome::Options(options));
        }

        if term.chars().count() < self.min_term_len {
            return Ok(LookupOutcome::Options(Vec::new()));
        }

        let seq = self.begin(&field.name).await;
        time::sleep(self.debounce).await;
        if !self.is_latest(&field.name, seq).await {
            tracing::debug!(field = %field.name, "lookup superseded during debounce");
            return Ok(LookupOutcome::Superseded);
        }

        let Some(branch_scope) = self.resolve_branch_scope(store) else {
            tracing::warn!(field = %field.name, "lookup skipped: no branch scope available");
            return Err(LookupError::MissingBranchScope);
        };

        let query = LookupQuery {
            lookup_table: lookup_key.to_string(),
            branch_scope,
            search_term: term.to_string(),
        };
        let body = self.service.search_lookup(&query).await?;

        let projection = Projection::for_lookup_key(lookup_key);
        let options: Vec<LookupOption> = lookup_records(&body)
            .iter()
            .filter_map(|record| projection.project(record))
            .collect();

        if self.publish(&field.name, seq, options.clone()).await {
            Ok(LookupOutcome::Options(options))
        } else {
            tracing::debug!(field = %field.name, "discarding stale lookup response");
            Ok(LookupOutcome::Superseded)
        }
    }

    /// Cached options from the most recent published lookup for a field.
    pub async fn options(&self, field_name: &str) -> Vec<LookupOption> {
        let fields = self.fields.lock().await;
        fields
            .get(field_name)
            .map(|state| state.options.clone())
            .unwrap_or_default()
    }

    /// Branch scope precedence: a branch-id store value, the profile's
    /// branch, then the first cached branch.
    fn resolve_branch_scope(&self, store: &FilterValueStore) -> Option<String> {
        for name in BRANCH_SCOPE_FIELDS {
            if let Some(text) = store.get(name).raw_text() {
                if !text.is_empty() {
                    return Some(text);
                }
            }
        }
        self.context.default_branch_id().map(str::to_string)
    }

    async fn begin(&self, field: &str) -> u64 {
        let mut fields = self.fields.lock().await;
        let state = fields.entry(field.to_string()).or_default();
        state.latest_seq += 1;
        state.latest_seq
    }

    async fn is_latest(&self, field: &str, seq: u64) -> bool {
        let fields = self.fields.lock().await;
        fields.get(field).is_some_and(|state| state.latest_seq == seq)
    }

    /// Publish a service response; refused when a newer call took over.
    async fn publish(&self, field: &str, seq: u64, options: Vec<LookupOption>) -> bool {
        let mut fields = self.fields.lock().await;
        match fields.get_mut(field) {
            Some(state) if state.latest_seq == seq => {
                state.options = options;
                true
            }
            _ => false,
        }
    }

    /// Publish locally-resolved options outside the sequence protocol.
    async fn publish_local(&self, field: &str, options: Vec<LookupOption>) {
        let mut fields = self.fields.lock().await;
        fields.entry(field.to_string()).or_default().options = options;
    }
}

/// Whether a lookup key denotes the locally-cached branch list.
pub fn is_branch_lookup(key: &str) -> bool {
    key.to_ascii_lowercase().contains("branch")
}
