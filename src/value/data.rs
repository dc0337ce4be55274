//! Type-erased column payloads.
//!
//! `ColumnValues` is the closed sum over every value kind a column may hold. It is
//! what a column hands to the executor on insert and what the executor hands back
//! for each result column of a query.

use super::{Date, Date32, DateTime, DateTime64, Enum16, Enum8};
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Values of one column, tagged with their kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    Int8(Vec<i8>),
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    UInt8(Vec<u8>),
    UInt16(Vec<u16>),
    UInt32(Vec<u32>),
    UInt64(Vec<u64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    String(Vec<String>),
    /// Strings bound to a `FixedString(length)` column. The codec truncates longer
    /// values to `length` bytes and pads shorter ones.
    FixedString { length: usize, values: Vec<String> },
    Bool(Vec<bool>),
    Uuid(Vec<Uuid>),
    Date(Vec<Date>),
    Date32(Vec<Date32>),
    DateTime(Vec<DateTime>),
    DateTime64(Vec<DateTime64>),
    Enum8(Vec<Enum8>),
    Enum16(Vec<Enum16>),
    /// One entry per row, each holding that row's array elements.
    Array(Vec<ColumnValues>),
    /// `nulls[i]` marks row `i` as NULL; `values` holds a placeholder for it.
    Nullable {
        nulls: Vec<bool>,
        values: Box<ColumnValues>,
    },
}

impl ColumnValues {
    /// Number of rows.
    pub fn len(&self) -> usize {
        match self {
            Self::Int8(v) => v.len(),
            Self::Int16(v) => v.len(),
            Self::Int32(v) => v.len(),
            Self::Int64(v) => v.len(),
            Self::UInt8(v) => v.len(),
            Self::UInt16(v) => v.len(),
            Self::UInt32(v) => v.len(),
            Self::UInt64(v) => v.len(),
            Self::Float32(v) => v.len(),
            Self::Float64(v) => v.len(),
            Self::String(v) => v.len(),
            Self::FixedString { values, .. } => values.len(),
            Self::Bool(v) => v.len(),
            Self::Uuid(v) => v.len(),
            Self::Date(v) => v.len(),
            Self::Date32(v) => v.len(),
            Self::DateTime(v) => v.len(),
            Self::DateTime64(v) => v.len(),
            Self::Enum8(v) => v.len(),
            Self::Enum16(v) => v.len(),
            Self::Array(rows) => rows.len(),
            Self::Nullable { nulls, .. } => nulls.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short name of the value kind, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Int8(_) => "Int8",
            Self::Int16(_) => "Int16",
            Self::Int32(_) => "Int32",
            Self::Int64(_) => "Int64",
            Self::UInt8(_) => "UInt8",
            Self::UInt16(_) => "UInt16",
            Self::UInt32(_) => "UInt32",
            Self::UInt64(_) => "UInt64",
            Self::Float32(_) => "Float32",
            Self::Float64(_) => "Float64",
            Self::String(_) => "String",
            Self::FixedString { .. } => "FixedString",
            Self::Bool(_) => "Bool",
            Self::Uuid(_) => "UUID",
            Self::Date(_) => "Date",
            Self::Date32(_) => "Date32",
            Self::DateTime(_) => "DateTime",
            Self::DateTime64(_) => "DateTime64",
            Self::Enum8(_) => "Enum8",
            Self::Enum16(_) => "Enum16",
            Self::Array(_) => "Array",
            Self::Nullable { .. } => "Nullable",
        }
    }

    /// Append `other` onto `self` when both hold the same kind.
    ///
    /// On a kind mismatch `other` is handed back untouched.
    pub fn extend(&mut self, other: ColumnValues) -> Result<(), ColumnValues> {
        match (self, other) {
            (Self::Int8(a), Self::Int8(b)) => a.extend(b),
            (Self::Int16(a), Self::Int16(b)) => a.extend(b),
            (Self::Int32(a), Self::Int32(b)) => a.extend(b),
            (Self::Int64(a), Self::Int64(b)) => a.extend(b),
            (Self::UInt8(a), Self::UInt8(b)) => a.extend(b),
            (Self::UInt16(a), Self::UInt16(b)) => a.extend(b),
            (Self::UInt32(a), Self::UInt32(b)) => a.extend(b),
            (Self::UInt64(a), Self::UInt64(b)) => a.extend(b),
            (Self::Float32(a), Self::Float32(b)) => a.extend(b),
            (Self::Float64(a), Self::Float64(b)) => a.extend(b),
            (Self::String(a), Self::String(b)) => a.extend(b),
            (
                Self::FixedString { length, values: a },
                Self::FixedString { length: other_length, values: b },
            ) if *length == other_length => a.extend(b),
            (Self::Bool(a), Self::Bool(b)) => a.extend(b),
            (Self::Uuid(a), Self::Uuid(b)) => a.extend(b),
            (Self::Date(a), Self::Date(b)) => a.extend(b),
            (Self::Date32(a), Self::Date32(b)) => a.extend(b),
            (Self::DateTime(a), Self::DateTime(b)) => a.extend(b),
            (Self::DateTime64(a), Self::DateTime64(b)) => a.extend(b),
            (Self::Enum8(a), Self::Enum8(b)) => a.extend(b),
            (Self::Enum16(a), Self::Enum16(b)) => a.extend(b),
            (Self::Array(a), Self::Array(b)) if rows_share_kind(a.as_slice(), &b) => a.extend(b),
            (
                Self::Nullable { nulls, values },
                Self::Nullable { nulls: other_nulls, values: other_values },
            ) => {
                values.extend(*other_values).map_err(|rejected| Self::Nullable {
                    nulls: other_nulls.clone(),
                    values: Box::new(rejected),
                })?;
                nulls.extend(other_nulls);
            }
            (_, other) => return Err(other),
        }
        Ok(())
    }

    /// Whether `other` can be appended onto `self`.
    ///
    /// Arrays compare their element kind; an array column without rows matches
    /// any other array column.
    pub fn is_same_kind(&self, other: &ColumnValues) -> bool {
        match (self, other) {
            (
                Self::FixedString { length, .. },
                Self::FixedString { length: other_length, .. },
            ) => length == other_length,
            (Self::Array(a), Self::Array(b)) => rows_share_kind(a, b),
            (Self::Nullable { values, .. }, Self::Nullable { values: other_values, .. }) => {
                values.is_same_kind(other_values)
            }
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }

    /// Encode the rows as a JSON array.
    ///
    /// Temporal values use their ISO representation, enums their word and
    /// NULL rows of a nullable column become `null`.
    pub fn to_json(&self) -> Result<JsonValue, serde_json::Error> {
        match self {
            Self::Int8(v) => serde_json::to_value(v),
            Self::Int16(v) => serde_json::to_value(v),
            Self::Int32(v) => serde_json::to_value(v),
            Self::Int64(v) => serde_json::to_value(v),
            Self::UInt8(v) => serde_json::to_value(v),
            Self::UInt16(v) => serde_json::to_value(v),
            Self::UInt32(v) => serde_json::to_value(v),
            Self::UInt64(v) => serde_json::to_value(v),
            Self::Float32(v) => serde_json::to_value(v),
            Self::Float64(v) => serde_json::to_value(v),
            Self::String(v) => serde_json::to_value(v),
            Self::FixedString { values, .. } => serde_json::to_value(values),
            Self::Bool(v) => serde_json::to_value(v),
            Self::Uuid(v) => serde_json::to_value(v),
            Self::Date(v) => serde_json::to_value(v),
            Self::Date32(v) => serde_json::to_value(v),
            Self::DateTime(v) => serde_json::to_value(v),
            Self::DateTime64(v) => serde_json::to_value(v),
            Self::Enum8(v) => serde_json::to_value(v),
            Self::Enum16(v) => serde_json::to_value(v),
            Self::Array(rows) => rows
                .iter()
                .map(ColumnValues::to_json)
                .collect::<Result<Vec<_>, _>>()
                .map(JsonValue::Array),
            Self::Nullable { nulls, values } => match values.to_json()? {
                JsonValue::Array(items) => Ok(JsonValue::Array(
                    items
                        .into_iter()
                        .zip(nulls)
                        .map(|(item, is_null)| if *is_null { JsonValue::Null } else { item })
                        .collect(),
                )),
                other => Ok(other),
            },
        }
    }
}

fn rows_share_kind(a: &[ColumnValues], b: &[ColumnValues]) -> bool {
    match a.iter().chain(b).next() {
        Some(first) => a.iter().chain(b).all(|row| row.is_same_kind(first)),
        None => true,
    }
}
