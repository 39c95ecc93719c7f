//! Autocomplete resolution: debounced, branch-scoped searches and the
//! per-lookup-key option projections.

pub mod projection;
pub mod resolver;

pub use projection::{LookupOption, Projection};
pub use resolver::{
    is_branch_lookup, LookupError, LookupOutcome, LookupResolver, LookupResult, DEFAULT_DEBOUNCE,
    MIN_TERM_LEN,
};
