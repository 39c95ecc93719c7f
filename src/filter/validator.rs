//! Mandatory-field validation over the current filter values.

use thiserror::Error;

use super::store::{FieldValue, FilterValueStore};
use crate::schema::{FilterLayout, ItemType};

/// A mandatory parameter with no usable value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingField {
    pub name: String,
    pub label: String,
}

/// Validation failure that blocks execution. Fully recoverable by filling
/// the named fields and re-running.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("required filters are missing: {}", .labels.join(", "))]
    MissingFields { labels: Vec<String> },
}

/// Collect mandatory, visible descriptors whose current value is unusable,
/// in field order.
pub fn missing_fields(layout: &FilterLayout, store: &FilterValueStore) -> Vec<MissingField> {
    let mut missing = Vec::new();
    for descriptor in layout.descriptors() {
        if !descriptor.mandatory || descriptor.hidden {
            continue;
        }
        let value = store.get(&descriptor.name);
        let unsatisfied = match descriptor.item_type {
            // 0 is a valid checkbox state; only an unset value fails.
            ItemType::Checkbox => matches!(value, FieldValue::Null),
            _ => value.is_empty(),
        };
        if unsatisfied {
            missing.push(MissingField {
                name: descriptor.name.clone(),
                label: descriptor.label().to_string(),
            });
        }
    }
    missing
}

/// Fail with one aggregated message when any mandatory field is unsatisfied.
pub fn validate(layout: &FilterLayout, store: &FilterValueStore) -> Result<(), ValidationError> {
    let missing = missing_fields(layout, store);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingFields {
            labels: missing.into_iter().map(|m| m.label).collect(),
        })
    }
}
