//! Issues the execution request and unwraps the tabular result.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::service::{ExecuteRequest, QueryService, ReportRow, ServiceError};

/// Fallback text when the backend fails without a message.
pub const GENERIC_FAILURE_MESSAGE: &str = "Report execution failed";

/// Execution failures are recoverable: the operator re-triggers the run.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// A run is already pending for this executor.
    #[error("a report execution is already in progress")]
    AlreadyRunning,

    /// The call itself failed.
    #[error("report execution request failed: {0}")]
    Service(#[from] ServiceError),

    /// The backend answered with `Success: false`.
    #[error("{message}")]
    Backend { message: String },
}

/// Result set of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    /// At least one row in the first result table.
    Rows(Vec<ReportRow>),
    /// Successful response with no rows: a no-data condition, distinct from
    /// a failure.
    Empty,
}

/// Runs stored procedures against the query service, one at a time.
pub struct ReportExecutor {
    service: Arc<dyn QueryService>,
    in_flight: AtomicBool,
}

impl ReportExecutor {
    pub fn new(service: Arc<dyn QueryService>) -> Self {
        Self {
            service,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Execute a stored procedure with a serialized parameter payload.
    ///
    /// At most one run is in flight; a concurrent caller gets
    /// [`ExecutionError::AlreadyRunning`] instead of a queued request.
    /// No automatic retries.
    pub async fn run(
        &self,
        stored_procedure: &str,
        parameters: Map<String, Value>,
        module_id: i64,
    ) -> Result<ExecutionOutcome, ExecutionError> {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            return Err(ExecutionError::AlreadyRunning);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let request = ExecuteRequest {
            stored_procedure: stored_procedure.to_string(),
            parameters,
            module_id,
        };
        tracing::debug!(procedure = %request.stored_procedure, module_id, "executing report");
        let response = self.service.execute_report(&request).await?;

        if !response.success {
            let message = response
                .error_message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());
            tracing::warn!(%message, "report execution rejected by backend");
            return Err(ExecutionError::Backend { message });
        }

        let rows = response.first_table_rows();
        if rows.is_empty() {
            tracing::debug!(module_id, "report returned no rows");
            Ok(ExecutionOutcome::Empty)
        } else {
            tracing::debug!(module_id, row_count = rows.len(), "report returned rows");
            Ok(ExecutionOutcome::Rows(rows.to_vec()))
        }
    }
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
