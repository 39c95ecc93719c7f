//! The query service seam.
//!
//! The network transport (an authenticated HTTP client) is owned by the
//! host application; this crate only defines the async contract it must
//! satisfy. Tests substitute in-memory implementations.

use async_trait::async_trait;
use serde_json::Value;

use super::error::ServiceResult;
use super::protocol::{ExecuteRequest, ExecuteResponse, LookupQuery};

/// Authenticated request/response channel to the reporting backend.
#[async_trait]
pub trait QueryService: Send + Sync {
    /// `GET` the lookup search endpoint.
    ///
    /// Returns the raw response body; shape variance is handled by
    /// [`lookup_records`](super::protocol::lookup_records).
    async fn search_lookup(&self, query: &LookupQuery) -> ServiceResult<Value>;

    /// `POST` a report execution request.
    async fn execute_report(&self, request: &ExecuteRequest) -> ServiceResult<ExecuteResponse>;
}
