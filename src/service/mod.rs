//! Contracts of the backend services this crate consumes: the seam trait,
//! wire protocol types, and transport-level errors.

pub mod error;
pub mod protocol;
pub mod provider;

pub use error::{ServiceError, ServiceResult};
pub use protocol::{
    lookup_records, ExecuteRequest, ExecuteResponse, LookupQuery, ReportRow, ResultTable,
};
pub use provider::QueryService;
