//! Wire types for the lookup-search and report-execution endpoints.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One row of a report result set: column name to scalar value.
///
/// Columns are derived from the keys of the first row only; the backend
/// upholds row homogeneity.
pub type ReportRow = Map<String, Value>;

/// Query-string parameters of the lookup search endpoint (`GET`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupQuery {
    #[serde(rename = "lookupTable")]
    pub lookup_table: String,

    #[serde(rename = "branchScope")]
    pub branch_scope: String,

    #[serde(rename = "searchTerm")]
    pub search_term: String,
}

/// Body of the report execution request (`POST`).
#[derive(Debug, Clone, Serialize)]
pub struct ExecuteRequest {
    #[serde(rename = "storedProcedureName")]
    pub stored_procedure: String,

    pub parameters: Map<String, Value>,

    #[serde(rename = "moduleID")]
    pub module_id: i64,
}

/// Response envelope of the report execution endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecuteResponse {
    #[serde(rename = "Success")]
    pub success: bool,

    #[serde(rename = "Data", default)]
    pub data: Vec<ResultTable>,

    #[serde(rename = "ErrorMessage", default)]
    pub error_message: Option<String>,
}

impl ExecuteResponse {
    /// Rows of the first result table; empty when no table came back.
    pub fn first_table_rows(&self) -> &[ReportRow] {
        self.data.first().map(|t| t.rows.as_slice()).unwrap_or(&[])
    }
}

/// One result table inside an execution response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultTable {
    #[serde(rename = "Rows", default)]
    pub rows: Vec<ReportRow>,
}

/// Extract lookup records from a search response body.
///
/// The endpoint answers either `{ "record": [...] }` or a bare array; any
/// other shape yields no records.
pub fn lookup_records(body: &Value) -> &[Value] {
    match body {
        Value::Array(records) => records,
        Value::Object(map) => match map.get("record") {
            Some(Value::Array(records)) => records,
            _ => &[],
        },
        _ => &[],
    }
}
