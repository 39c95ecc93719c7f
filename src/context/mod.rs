//! Injected read-only session state: branch cache, user profile, working date.
//!
//! The host application loads these once at sign-in and passes them in at
//! construction; nothing in this crate reaches for ambient global state.

use chrono::{Local, NaiveDate};
use serde_json::Value;

/// Upstream key names observed for the branch id column.
const BRANCH_ID_KEYS: [&str; 4] = ["branchId", "BranchID", "OurBranchID", "branch_id"];

/// Upstream key names observed for the branch name column.
const BRANCH_NAME_KEYS: [&str; 4] = ["branchName", "BranchName", "Name", "branch_name"];

/// One entry of the cached branch list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub branch_id: String,
    pub branch_name: String,
}

impl Branch {
    /// Normalize one raw branch record; `None` when no id key is present.
    pub fn from_raw(record: &Value) -> Option<Self> {
        let branch_id = first_key(record, &BRANCH_ID_KEYS)?;
        let branch_name = first_key(record, &BRANCH_NAME_KEYS).unwrap_or_default();
        Some(Self {
            branch_id,
            branch_name,
        })
    }
}

fn first_key(record: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| scalar_text(record.get(*key)?))
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// The logged-in operator's profile, as far as this crate needs it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    /// Home branch of the operator, when the profile carries one.
    pub branch_id: Option<String>,
}

/// Read-only state shared by every report session of one sign-in.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    branches: Vec<Branch>,
    profile: UserProfile,
    working_date: Option<NaiveDate>,
}

impl SessionContext {
    pub fn new(branches: Vec<Branch>, profile: UserProfile, working_date: Option<NaiveDate>) -> Self {
        Self {
            branches,
            profile,
            working_date,
        }
    }

    /// Build a context from raw branch records, normalizing key names.
    /// Records without a recognizable id are skipped.
    pub fn from_raw_branches(
        records: &[Value],
        profile: UserProfile,
        working_date: Option<NaiveDate>,
    ) -> Self {
        let branches = records.iter().filter_map(Branch::from_raw).collect();
        Self::new(branches, profile, working_date)
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// The operator's business date; today when none was provided.
    pub fn working_date(&self) -> NaiveDate {
        self.working_date
            .unwrap_or_else(|| Local::now().date_naive())
    }

    /// Default branch: the profile's, falling back to the first cached entry.
    pub fn default_branch_id(&self) -> Option<&str> {
        self.profile
            .branch_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .or_else(|| self.branches.first().map(|b| b.branch_id.as_str()))
    }

    /// Branches whose id or name contains the term, case-insensitive.
    /// An empty term matches the full list.
    pub fn match_branches(&self, term: &str) -> Vec<Branch> {
        let needle = term.to_ascii_lowercase();
        self.branches
            .iter()
            .filter(|b| {
                b.branch_id.to_ascii_lowercase().contains(&needle)
                    || b.branch_name.to_ascii_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }
}
