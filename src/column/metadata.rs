//! Column schema flags and kind-specific metadata.

/// Flags controlling how a column is declared in the table DDL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnFlags {
    /// Column is part of `PRIMARY KEY (...)`
    pub is_primary: bool,
    /// Column is part of `ORDER BY (...)`
    pub is_order_by: bool,
    /// Wrap the type in `LowCardinality(...)` when the type allows it
    pub is_low_cardinality: bool,
}

/// Kind-specific column metadata
///
/// Only the entries that apply to the column's kind are set; `Field`'s builder
/// methods reject the others when the column is declared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMetadata {
    /// Byte length of a `FixedString(n)` column
    pub fixed_string_len: Option<usize>,
    /// Timezone of a `DateTime`/`DateTime64` column, emitted verbatim (e.g. `'GMT'`)
    pub time_zone: Option<String>,
    /// Sub-second precision of a `DateTime64` column
    pub precision: Option<u8>,
    /// Word to code mapping of an `Enum8`/`Enum16` column, in declaration order
    pub enum_mapping: Option<Vec<(String, i16)>>,
}
