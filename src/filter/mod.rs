//! Filter values: the per-report value store, mandatory-field validation,
//! and serialization into the execution payload.

pub mod serializer;
pub mod store;
pub mod validator;

pub use serializer::serialize;
pub use store::{FieldValue, FilterValueStore};
pub use validator::{missing_fields, validate, MissingField, ValidationError};
