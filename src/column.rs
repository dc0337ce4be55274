//! Typed column bindings
//!
//! A column binding owns one column's in-memory values together with the schema
//! information needed to declare it: its key, its flags and its kind-specific
//! metadata. Models are ordered lists of bindings.
//!
//! - [`Field`] is the typed binding declared on a model (`Field<i64>`, `Field<String>`, ...)
//! - [`ColumnBinding`] is its object-safe, type-erased view used by the model layer
//! - [`ClickHouseTypeName`] and [`resolve`] turn a kind plus metadata into DDL type names

pub mod binding;
pub mod field;
pub mod metadata;
pub mod type_name;

pub use binding::ColumnBinding;
pub use field::Field;
pub use metadata::{ColumnFlags, ColumnMetadata};
pub use type_name::{resolve, ClickHouseTypeName, ValueKind};
