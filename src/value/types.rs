//! ColumnType trait for typed column storage
//!
//! The `ColumnType` trait maps a Rust element type to its `ColumnValues` variant
//! and to the logical `ValueKind` used when resolving the ClickHouse type name.
//! It is sealed: the set of supported kinds is closed, so every downcast is a
//! match against a known variant.
//!
//! ## Supported types
//!
//! - Integers: `i8`, `i16`, `i32`, `i64`, `u8`, `u16`, `u32`, `u64`
//! - Floating point: `f32`, `f64`
//! - `String` (also `FixedString(n)` when the column declares a length)
//! - `bool`, `uuid::Uuid`
//! - `Date`, `Date32`, `DateTime`, `DateTime64`
//! - `Enum8`, `Enum16`
//! - `Vec<T>` for any supported `T` (ClickHouse `Array(T)`)
//! - `Option<T>` for any supported `T` (ClickHouse `Nullable(T)`)
//!
//! ## Example
//!
//! ```rust
//! use chorm::value::{ColumnType, ColumnValues};
//! use chorm::column::ColumnMetadata;
//!
//! let values = i64::into_values(vec![100, 200], &ColumnMetadata::default());
//! assert_eq!(values, ColumnValues::Int64(vec![100, 200]));
//!
//! // A different kind is not accepted
//! assert!(i32::from_values(values).is_none());
//! ```

use super::{ColumnValues, Date, Date32, DateTime, DateTime64, Enum16, Enum8};
use crate::column::{ColumnMetadata, ValueKind};
use std::fmt::Debug;
use uuid::Uuid;

mod sealed {
    pub trait Sealed {}
}

/// Trait for Rust types that can be stored in a column.
pub trait ColumnType: Clone + Debug + PartialEq + sealed::Sealed {
    /// Logical value kind of this type.
    fn kind() -> ValueKind;

    /// Wrap typed values into their type-erased form.
    ///
    /// `metadata` decides between variants that share a Rust type, such as
    /// `String` and `FixedString`.
    fn into_values(values: Vec<Self>, metadata: &ColumnMetadata) -> ColumnValues;

    /// Unwrap type-erased values, or `None` if they hold a different kind.
    fn from_values(values: ColumnValues) -> Option<Vec<Self>>;
}

macro_rules! scalar_column_type {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl sealed::Sealed for $ty {}

        impl ColumnType for $ty {
            fn kind() -> ValueKind {
                ValueKind::$variant
            }

            fn into_values(values: Vec<Self>, _metadata: &ColumnMetadata) -> ColumnValues {
                ColumnValues::$variant(values)
            }

            fn from_values(values: ColumnValues) -> Option<Vec<Self>> {
                match values {
                    ColumnValues::$variant(values) => Some(values),
                    _ => None,
                }
            }
        }
    )*};
}

scalar_column_type! {
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
    bool => Bool,
    Uuid => Uuid,
    Date => Date,
    Date32 => Date32,
    DateTime => DateTime,
    DateTime64 => DateTime64,
    Enum8 => Enum8,
    Enum16 => Enum16,
}

impl sealed::Sealed for String {}

impl ColumnType for String {
    fn kind() -> ValueKind {
        ValueKind::String
    }

    fn into_values(values: Vec<Self>, metadata: &ColumnMetadata) -> ColumnValues {
        match metadata.fixed_string_len {
            Some(length) => ColumnValues::FixedString { length, values },
            None => ColumnValues::String(values),
        }
    }

    fn from_values(values: ColumnValues) -> Option<Vec<Self>> {
        match values {
            ColumnValues::String(values) | ColumnValues::FixedString { values, .. } => Some(values),
            _ => None,
        }
    }
}

impl<T: ColumnType> sealed::Sealed for Vec<T> {}

impl<T: ColumnType> ColumnType for Vec<T> {
    fn kind() -> ValueKind {
        ValueKind::Array(Box::new(T::kind()))
    }

    fn into_values(values: Vec<Self>, metadata: &ColumnMetadata) -> ColumnValues {
        ColumnValues::Array(
            values
                .into_iter()
                .map(|row| T::into_values(row, metadata))
                .collect(),
        )
    }

    fn from_values(values: ColumnValues) -> Option<Vec<Self>> {
        match values {
            ColumnValues::Array(rows) => rows.into_iter().map(T::from_values).collect(),
            _ => None,
        }
    }
}

impl<T: ColumnType + Default> sealed::Sealed for Option<T> {}

impl<T: ColumnType + Default> ColumnType for Option<T> {
    fn kind() -> ValueKind {
        ValueKind::Nullable(Box::new(T::kind()))
    }

    fn into_values(values: Vec<Self>, metadata: &ColumnMetadata) -> ColumnValues {
        let nulls = values.iter().map(Option::is_none).collect();
        let values = values.into_iter().map(Option::unwrap_or_default).collect();
        ColumnValues::Nullable {
            nulls,
            values: Box::new(T::into_values(values, metadata)),
        }
    }

    fn from_values(values: ColumnValues) -> Option<Vec<Self>> {
        match values {
            ColumnValues::Nullable { nulls, values } => {
                let values = T::from_values(*values)?;
                if values.len() != nulls.len() {
                    return None;
                }
                Some(
                    values
                        .into_iter()
                        .zip(nulls)
                        .map(|(value, is_null)| (!is_null).then_some(value))
                        .collect(),
                )
            }
            _ => None,
        }
    }
}
