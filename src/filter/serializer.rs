//! Turns the filter value store into the execution-service payload.

use serde_json::{Map, Value};

use super::store::{FieldValue, FilterValueStore};
use crate::schema::{FilterLayout, ItemType, ParameterDescriptor};

/// Midnight time component appended to date parameters.
const DATE_TIME_SUFFIX: &str = " 00:00:00";

/// Width of a zero-padded region id.
const REGION_ID_WIDTH: usize = 2;

/// Serialize the current values into the payload the execution service
/// expects. Hidden descriptors are dropped entirely; the rest are keyed by
/// item name in field order.
pub fn serialize(layout: &FilterLayout, store: &FilterValueStore) -> Map<String, Value> {
    let mut payload = Map::new();
    for descriptor in layout.descriptors() {
        if descriptor.hidden {
            continue;
        }
        let value = serialize_value(descriptor, store.get(&descriptor.name));
        payload.insert(descriptor.name.clone(), value);
    }
    payload
}

/// Per-descriptor serialization. Type rules are evaluated before the
/// name-substring rules, so a checkbox or date named `...BranchID` still
/// serializes by type.
fn serialize_value(descriptor: &ParameterDescriptor, value: &FieldValue) -> Value {
    match descriptor.item_type {
        ItemType::Checkbox => Value::from(i64::from(value.is_truthy())),
        ItemType::Date => match value.raw_text() {
            Some(text) if !text.is_empty() => Value::String(format!("{text}{DATE_TIME_SUFFIX}")),
            _ => Value::Null,
        },
        // Name-substring role classification is a legacy fallback carried
        // from the source metadata, which has no first-class role tags.
        _ if descriptor.name.contains("RegionID") => match value.raw_text() {
            Some(text) if !text.is_empty() => {
                Value::String(format!("{text:0>width$}", width = REGION_ID_WIDTH))
            }
            _ => Value::Null,
        },
        _ if descriptor.name.contains("BranchID") => match value.raw_text() {
            Some(text) if !text.is_empty() => Value::String(text),
            _ => Value::Null,
        },
        _ => match value {
            FieldValue::Null => Value::Null,
            FieldValue::Text(s) if s.is_empty() => Value::Null,
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::Number(n) => Value::from(*n),
        },
    }
}
