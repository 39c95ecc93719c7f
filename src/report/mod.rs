//! Report execution: locating the stored procedure, running it, and paging
//! the result rows.

pub mod executor;
pub mod locator;
pub mod pager;

pub use executor::{
    ExecutionError, ExecutionOutcome, ReportExecutor, GENERIC_FAILURE_MESSAGE,
};
pub use locator::{locate, LocatorError, ModuleCatalog, ReportModule, SubReportModule};
pub use pager::{page_slice, total_pages, Pager, DEFAULT_PAGE_SIZE};
