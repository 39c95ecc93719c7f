//! # Reportal
//!
//! A metadata-driven report parameter engine: interprets per-report
//! parameter metadata into typed filter fields, resolves autocomplete
//! lookups against a branch-scoped search service, serializes filter
//! values into the execution payload, and pages the tabular result.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │        Parameter metadata (per-report descriptors)       │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [schema::interpreter]
//! ┌─────────────────────────────────────────────────────────┐
//! │       FilterLayout (range pairs, initial/advanced)       │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!            ┌─────────────┼──────────────┐
//!            ▼             ▼              ▼
//!     [filter::store] [lookup]      [filter::validator]
//!            │   (debounced options)      │
//!            ▼                            │
//!     [filter::serializer] ◄──────────────┘
//!            │ payload
//!            ▼ [report::locator + report::executor]
//! ┌─────────────────────────────────────────────────────────┐
//! │            Result rows → [report::pager] → text          │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Rendering, export, auth and the HTTP transport live in the host
//! application; the transport is injected through [`service::QueryService`]
//! and the per-sign-in state through [`context::SessionContext`].

pub mod config;
pub mod context;
pub mod filter;
pub mod lookup;
pub mod render;
pub mod report;
pub mod schema;
pub mod service;
pub mod session;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::config::Settings;
    pub use crate::context::{Branch, SessionContext, UserProfile};
    pub use crate::filter::{
        serialize, validate, FieldValue, FilterValueStore, MissingField, ValidationError,
    };
    pub use crate::lookup::{LookupOption, LookupOutcome, LookupResolver};
    pub use crate::render::{render_page, render_table, NO_DATA_MESSAGE};
    pub use crate::report::{
        locate, ExecutionError, ExecutionOutcome, LocatorError, ModuleCatalog, Pager,
        ReportExecutor, ReportModule, SubReportModule,
    };
    pub use crate::schema::{
        interpret, FilterField, FilterLayout, ItemType, ParameterDescriptor, RawDescriptor,
        SchemaError,
    };
    pub use crate::service::{
        ExecuteRequest, ExecuteResponse, LookupQuery, QueryService, ReportRow, ServiceError,
        ServiceResult,
    };
    pub use crate::session::{ReportError, ReportSession, ResultState};
}

pub use session::{ReportError, ReportSession, ResultState};
