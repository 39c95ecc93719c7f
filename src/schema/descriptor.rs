//! Report parameter descriptors as delivered by the metadata service.

use serde::Deserialize;
use thiserror::Error;

/// Section tag marking a descriptor as an input parameter rather than an
/// output/display column.
pub(crate) const INPUT_SECTION: &str = "Filters";

/// Error raised while turning raw descriptor metadata into typed form.
///
/// A malformed or missing descriptor list is not fatal for the report
/// session; rejected descriptors are collected on the layout and the report
/// simply presents fewer parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The descriptor carried a type tag outside the known set.
    #[error("parameter '{name}' has unknown item type '{tag}'")]
    UnknownItemType { name: String, tag: String },
}

/// The closed set of parameter input types.
///
/// Upstream metadata tags types with free-form strings; anything outside
/// this set is rejected with [`SchemaError::UnknownItemType`] instead of
/// falling through to a generic text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemType {
    Text,
    Date,
    Checkbox,
    Combo,
}

impl ItemType {
    /// Parse an upstream type tag (case-insensitive).
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "text" => Some(Self::Text),
            "date" => Some(Self::Date),
            "checkbox" => Some(Self::Checkbox),
            "combo" => Some(Self::Combo),
            _ => None,
        }
    }

    /// Tag used when printing a field summary.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Date => "date",
            Self::Checkbox => "checkbox",
            Self::Combo => "combo",
        }
    }
}

/// Wire form of a parameter descriptor, straight from the metadata service.
///
/// Field-name aliases accept the Pascal-case variants some endpoints emit.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDescriptor {
    #[serde(rename = "moduleId", alias = "ModuleID")]
    pub module_id: i64,

    #[serde(rename = "itemSection", alias = "ItemSection")]
    pub item_section: String,

    #[serde(rename = "itemName", alias = "ItemName")]
    pub item_name: String,

    #[serde(rename = "itemType", alias = "ItemType")]
    pub item_type: String,

    #[serde(rename = "itemCaption", alias = "ItemCaption", default)]
    pub item_caption: Option<String>,

    /// Display order; missing means 0.
    #[serde(rename = "itemOrder", alias = "ItemOrder", default)]
    pub item_order: Option<i64>,

    #[serde(rename = "isMandatory", alias = "IsMandatory", default)]
    pub is_mandatory: bool,

    #[serde(rename = "isHidden", alias = "IsHidden", default)]
    pub is_hidden: bool,

    /// Lookup table key for autocomplete fields.
    #[serde(rename = "helpLookupKey", alias = "HelpLookupKey", default)]
    pub help_lookup_key: Option<String>,

    #[serde(rename = "itemMaxLength", alias = "ItemMaxLength", default)]
    pub item_max_length: Option<u32>,
}

impl RawDescriptor {
    /// Whether this descriptor belongs to the input-parameter section.
    pub fn is_input(&self) -> bool {
        self.item_section.eq_ignore_ascii_case(INPUT_SECTION)
    }
}

/// Typed form of a parameter descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDescriptor {
    pub module_id: i64,
    pub section: String,
    /// Unique key within a report.
    pub name: String,
    pub item_type: ItemType,
    pub caption: Option<String>,
    pub order: i64,
    pub mandatory: bool,
    pub hidden: bool,
    pub lookup_key: Option<String>,
    pub max_length: Option<u32>,
}

impl ParameterDescriptor {
    /// Convert a raw descriptor, rejecting unknown type tags.
    pub fn from_raw(raw: &RawDescriptor) -> Result<Self, SchemaError> {
        let item_type =
            ItemType::parse(&raw.item_type).ok_or_else(|| SchemaError::UnknownItemType {
                name: raw.item_name.clone(),
                tag: raw.item_type.clone(),
            })?;

        Ok(Self {
            module_id: raw.module_id,
            section: raw.item_section.clone(),
            name: raw.item_name.clone(),
            item_type,
            caption: raw.item_caption.clone(),
            order: raw.item_order.unwrap_or(0),
            mandatory: raw.is_mandatory,
            hidden: raw.is_hidden,
            lookup_key: raw.help_lookup_key.clone(),
            max_length: raw.item_max_length,
        })
    }

    /// Human label: caption, falling back to the item name.
    pub fn label(&self) -> &str {
        self.caption.as_deref().filter(|c| !c.is_empty()).unwrap_or(&self.name)
    }

    /// Whether valid values come from a lookup search rather than free entry.
    pub fn has_lookup(&self) -> bool {
        self.lookup_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}
