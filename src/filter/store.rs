//! Current values of every report parameter, keyed by item name.

use std::collections::HashMap;

use serde_json::Value;

use crate::context::SessionContext;
use crate::schema::{FilterLayout, ItemType};

static NULL: FieldValue = FieldValue::Null;

/// The value of one parameter: free text, a small integer (checkbox state),
/// or nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Number(i64),
    Null,
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Null or empty text.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.is_empty(),
            Self::Number(_) => false,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Text(s) => !s.is_empty(),
            Self::Number(n) => *n != 0,
        }
    }

    /// Textual form of the value; `None` for null.
    pub fn raw_text(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Text(s) => Some(s.clone()),
            Self::Number(n) => Some(n.to_string()),
        }
    }

    /// Lossy conversion from a JSON scalar; non-scalars become null.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::String(s) => Self::Text(s.clone()),
            Value::Number(n) => n
                .as_i64()
                .map(Self::Number)
                .unwrap_or_else(|| Self::Text(n.to_string())),
            Value::Bool(b) => Self::Number(i64::from(*b)),
            _ => Self::Null,
        }
    }
}

/// Mutable value store for one report load.
///
/// Seeded once from the interpreted layout; mutated only through [`set`].
/// The validator and serializer read it without ever writing back.
///
/// [`set`]: FilterValueStore::set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterValueStore {
    values: HashMap<String, FieldValue>,
}

impl FilterValueStore {
    /// Seed defaults for every descriptor of the layout: checkbox 0, date
    /// the working date, mandatory text an empty string, everything else
    /// null.
    pub fn seed(layout: &FilterLayout, context: &SessionContext) -> Self {
        let mut values = HashMap::new();
        for descriptor in layout.descriptors() {
            let value = match descriptor.item_type {
                ItemType::Checkbox => FieldValue::Number(0),
                ItemType::Date => {
                    FieldValue::Text(context.working_date().format("%Y-%m-%d").to_string())
                }
                ItemType::Text if descriptor.mandatory => FieldValue::Text(String::new()),
                _ => FieldValue::Null,
            };
            values.insert(descriptor.name.clone(), value);
        }
        Self { values }
    }

    /// Current value; null for names the store has never seen.
    pub fn get(&self, name: &str) -> &FieldValue {
        self.values.get(name).unwrap_or(&NULL)
    }

    pub fn set(&mut self, name: impl Into<String>, value: FieldValue) {
        self.values.insert(name.into(), value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
