//! Field-specific projection of raw lookup records into options.

use serde_json::Value;

/// A selectable option resolved for a lookup field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupOption {
    /// Value submitted with the filter payload.
    pub value: String,
    /// Text shown to the operator.
    pub label: String,
}

/// How a lookup key maps raw records onto option value and label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// `ClientID` lookups: value is the id, label "id - name".
    ClientId,
    /// `Names` lookups: value is the name, label "name - id".
    Names,
    /// Undeclared lookup shapes: first non-null property as both value and
    /// label. A heuristic fallback, kept as its own variant so it stays
    /// independently testable.
    FirstNonNull,
}

impl Projection {
    /// Select the projection for a lookup key.
    pub fn for_lookup_key(key: &str) -> Self {
        if key.eq_ignore_ascii_case("ClientID") {
            Self::ClientId
        } else if key.eq_ignore_ascii_case("Names") {
            Self::Names
        } else {
            Self::FirstNonNull
        }
    }

    /// Project one record; `None` when the record lacks usable values.
    pub fn project(&self, record: &Value) -> Option<LookupOption> {
        match self {
            Self::ClientId => {
                let id = text_field(record, "ClientID")?;
                let name = text_field(record, "Name").unwrap_or_default();
                Some(LookupOption {
                    label: format!("{id} - {name}"),
                    value: id,
                })
            }
            Self::Names => {
                let name = text_field(record, "Name")?;
                let id = text_field(record, "ClientID").unwrap_or_default();
                Some(LookupOption {
                    label: format!("{name} - {id}"),
                    value: name,
                })
            }
            Self::FirstNonNull => {
                let map = record.as_object()?;
                let value = map.values().find(|v| !v.is_null())?;
                let text = scalar_text(value)?;
                Some(LookupOption {
                    value: text.clone(),
                    label: text,
                })
            }
        }
    }
}

fn text_field(record: &Value, key: &str) -> Option<String> {
    record.get(key).and_then(scalar_text)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
