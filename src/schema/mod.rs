//! Parameter metadata: descriptors and their interpretation into filter fields.

pub mod descriptor;
pub mod interpreter;

pub use descriptor::{ItemType, ParameterDescriptor, RawDescriptor, SchemaError};
pub use interpreter::{
    interpret, FilterField, FilterLayout, INITIAL_FIELD_COUNT, SUMMARY_STRIPPED_REPORTS,
};
