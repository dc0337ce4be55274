//! ClickHouse type names and their resolution from value kinds.
//!
//! `resolve` maps a logical [`ValueKind`] plus the column's [`ColumnMetadata`] to the
//! [`ClickHouseTypeName`] written into `CREATE TABLE`. The mapping is pure; kinds
//! that need metadata they were not given (a `DateTime64` without precision, an
//! enum without a mapping) are declaration bugs and panic.

use super::ColumnMetadata;
use std::fmt;

/// Logical value kind of a column, independent of its metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueKind {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    String,
    Bool,
    Uuid,
    Date,
    Date32,
    DateTime,
    DateTime64,
    Enum8,
    Enum16,
    Array(Box<ValueKind>),
    Nullable(Box<ValueKind>),
}

impl ValueKind {
    /// Innermost kind, with `Array` and `Nullable` wrappers removed.
    pub fn element(&self) -> &ValueKind {
        match self {
            ValueKind::Array(inner) | ValueKind::Nullable(inner) => inner.element(),
            other => other,
        }
    }
}

/// A ClickHouse column type as rendered in DDL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickHouseTypeName {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    String,
    FixedString(usize),
    Bool,
    Uuid,
    Date,
    Date32,
    DateTime {
        time_zone: Option<String>,
    },
    DateTime64 {
        precision: u8,
        time_zone: Option<String>,
    },
    Enum8(Vec<(String, i8)>),
    Enum16(Vec<(String, i16)>),
    Array(Box<ClickHouseTypeName>),
    Nullable(Box<ClickHouseTypeName>),
}

impl ClickHouseTypeName {
    /// Whether the type may be wrapped in `LowCardinality(...)`.
    ///
    /// Numeric types and strings support dictionary encoding; UUID, booleans,
    /// temporal types, enums and arrays do not. `Nullable(T)` follows `T`.
    pub fn supports_low_cardinality(&self) -> bool {
        match self {
            ClickHouseTypeName::Float32
            | ClickHouseTypeName::Float64
            | ClickHouseTypeName::Int8
            | ClickHouseTypeName::Int16
            | ClickHouseTypeName::Int32
            | ClickHouseTypeName::Int64
            | ClickHouseTypeName::UInt8
            | ClickHouseTypeName::UInt16
            | ClickHouseTypeName::UInt32
            | ClickHouseTypeName::UInt64 => true,
            ClickHouseTypeName::Uuid => false,
            ClickHouseTypeName::FixedString(_) | ClickHouseTypeName::String => true,
            ClickHouseTypeName::Nullable(inner) => inner.supports_low_cardinality(),
            ClickHouseTypeName::Array(_)
            | ClickHouseTypeName::Bool
            | ClickHouseTypeName::Date
            | ClickHouseTypeName::Date32
            | ClickHouseTypeName::DateTime { .. }
            | ClickHouseTypeName::DateTime64 { .. }
            | ClickHouseTypeName::Enum8(_)
            | ClickHouseTypeName::Enum16(_) => false,
        }
    }
}

fn write_enum_mapping<V: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    mapping: &[(String, V)],
) -> fmt::Result {
    write!(f, "{name}(")?;
    for (i, (word, code)) in mapping.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        let escaped = word.replace('\\', "\\\\").replace('\'', "\\'");
        write!(f, "'{escaped}'={code}")?;
    }
    f.write_str(")")
}

impl fmt::Display for ClickHouseTypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClickHouseTypeName::Int8 => f.write_str("Int8"),
            ClickHouseTypeName::Int16 => f.write_str("Int16"),
            ClickHouseTypeName::Int32 => f.write_str("Int32"),
            ClickHouseTypeName::Int64 => f.write_str("Int64"),
            ClickHouseTypeName::UInt8 => f.write_str("UInt8"),
            ClickHouseTypeName::UInt16 => f.write_str("UInt16"),
            ClickHouseTypeName::UInt32 => f.write_str("UInt32"),
            ClickHouseTypeName::UInt64 => f.write_str("UInt64"),
            ClickHouseTypeName::Float32 => f.write_str("Float32"),
            ClickHouseTypeName::Float64 => f.write_str("Float64"),
            ClickHouseTypeName::String => f.write_str("String"),
            ClickHouseTypeName::FixedString(length) => write!(f, "FixedString({length})"),
            ClickHouseTypeName::Bool => f.write_str("Bool"),
            ClickHouseTypeName::Uuid => f.write_str("UUID"),
            ClickHouseTypeName::Date => f.write_str("Date"),
            ClickHouseTypeName::Date32 => f.write_str("Date32"),
            ClickHouseTypeName::DateTime { time_zone: None } => f.write_str("DateTime"),
            ClickHouseTypeName::DateTime {
                time_zone: Some(time_zone),
            } => write!(f, "DateTime({time_zone})"),
            ClickHouseTypeName::DateTime64 {
                precision,
                time_zone: None,
            } => write!(f, "DateTime64({precision})"),
            ClickHouseTypeName::DateTime64 {
                precision,
                time_zone: Some(time_zone),
            } => write!(f, "DateTime64({precision}, {time_zone})"),
            ClickHouseTypeName::Enum8(mapping) => write_enum_mapping(f, "Enum8", mapping),
            ClickHouseTypeName::Enum16(mapping) => write_enum_mapping(f, "Enum16", mapping),
            ClickHouseTypeName::Array(inner) => write!(f, "Array({inner})"),
            ClickHouseTypeName::Nullable(inner) => write!(f, "Nullable({inner})"),
        }
    }
}

/// Resolve the ClickHouse type name for a value kind.
///
/// # Panics
///
/// Panics when the kind needs metadata that is missing or invalid:
/// - `DateTime64` without a precision
/// - `Enum8`/`Enum16` without a mapping, or an `Enum8` code outside `i8`
/// - `Nullable` wrapping an `Array` or another `Nullable`
pub fn resolve(kind: &ValueKind, metadata: &ColumnMetadata) -> ClickHouseTypeName {
    match kind {
        ValueKind::Int8 => ClickHouseTypeName::Int8,
        ValueKind::Int16 => ClickHouseTypeName::Int16,
        ValueKind::Int32 => ClickHouseTypeName::Int32,
        ValueKind::Int64 => ClickHouseTypeName::Int64,
        ValueKind::UInt8 => ClickHouseTypeName::UInt8,
        ValueKind::UInt16 => ClickHouseTypeName::UInt16,
        ValueKind::UInt32 => ClickHouseTypeName::UInt32,
        ValueKind::UInt64 => ClickHouseTypeName::UInt64,
        ValueKind::Float32 => ClickHouseTypeName::Float32,
        ValueKind::Float64 => ClickHouseTypeName::Float64,
        ValueKind::String => match metadata.fixed_string_len {
            Some(length) => ClickHouseTypeName::FixedString(length),
            None => ClickHouseTypeName::String,
        },
        ValueKind::Bool => ClickHouseTypeName::Bool,
        ValueKind::Uuid => ClickHouseTypeName::Uuid,
        ValueKind::Date => ClickHouseTypeName::Date,
        ValueKind::Date32 => ClickHouseTypeName::Date32,
        ValueKind::DateTime => ClickHouseTypeName::DateTime {
            time_zone: metadata.time_zone.clone(),
        },
        ValueKind::DateTime64 => {
            let Some(precision) = metadata.precision else {
                panic!("DateTime64 columns require a precision");
            };
            ClickHouseTypeName::DateTime64 {
                precision,
                time_zone: metadata.time_zone.clone(),
            }
        }
        ValueKind::Enum8 => {
            let mapping = enum_mapping(metadata, "Enum8")
                .iter()
                .map(|(word, code)| {
                    let code = i8::try_from(*code).unwrap_or_else(|_| {
                        panic!("Enum8 code {code} for '{word}' does not fit into 8 bits")
                    });
                    (word.clone(), code)
                })
                .collect();
            ClickHouseTypeName::Enum8(mapping)
        }
        ValueKind::Enum16 => ClickHouseTypeName::Enum16(enum_mapping(metadata, "Enum16").to_vec()),
        ValueKind::Array(inner) => ClickHouseTypeName::Array(Box::new(resolve(inner, metadata))),
        ValueKind::Nullable(inner) => {
            assert!(
                !matches!(**inner, ValueKind::Array(_) | ValueKind::Nullable(_)),
                "Nullable cannot wrap {inner:?}"
            );
            ClickHouseTypeName::Nullable(Box::new(resolve(inner, metadata)))
        }
    }
}

fn enum_mapping<'a>(metadata: &'a ColumnMetadata, name: &str) -> &'a [(String, i16)] {
    match metadata.enum_mapping.as_deref() {
        Some(mapping) if !mapping.is_empty() => mapping,
        _ => panic!("{name} columns require a word to code mapping"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(kind: ValueKind) -> ClickHouseTypeName {
        resolve(&kind, &ColumnMetadata::default())
    }

    #[test]
    fn test_resolve_scalars() {
        assert_eq!(plain(ValueKind::Int8).to_string(), "Int8");
        assert_eq!(plain(ValueKind::Int16).to_string(), "Int16");
        assert_eq!(plain(ValueKind::Int32).to_string(), "Int32");
        assert_eq!(plain(ValueKind::Int64).to_string(), "Int64");
        assert_eq!(plain(ValueKind::UInt8).to_string(), "UInt8");
        assert_eq!(plain(ValueKind::UInt16).to_string(), "UInt16");
        assert_eq!(plain(ValueKind::UInt32).to_string(), "UInt32");
        assert_eq!(plain(ValueKind::UInt64).to_string(), "UInt64");
        assert_eq!(plain(ValueKind::Float32).to_string(), "Float32");
        assert_eq!(plain(ValueKind::Float64).to_string(), "Float64");
        assert_eq!(plain(ValueKind::String).to_string(), "String");
        assert_eq!(plain(ValueKind::Bool).to_string(), "Bool");
        assert_eq!(plain(ValueKind::Uuid).to_string(), "UUID");
        assert_eq!(plain(ValueKind::Date32).to_string(), "Date32");
        assert_eq!(plain(ValueKind::DateTime).to_string(), "DateTime");
    }

    #[test]
    fn test_resolve_with_metadata() {
        let fixed = ColumnMetadata {
            fixed_string_len: Some(10),
            ..Default::default()
        };
        assert_eq!(resolve(&ValueKind::String, &fixed).to_string(), "FixedString(10)");

        let zoned = ColumnMetadata {
            time_zone: Some("'GMT'".to_string()),
            ..Default::default()
        };
        assert_eq!(resolve(&ValueKind::DateTime, &zoned).to_string(), "DateTime('GMT')");

        let precise = ColumnMetadata {
            precision: Some(3),
            ..Default::default()
        };
        assert_eq!(resolve(&ValueKind::DateTime64, &precise).to_string(), "DateTime64(3)");

        let precise_zoned = ColumnMetadata {
            precision: Some(3),
            time_zone: Some("'GMT'".to_string()),
            ..Default::default()
        };
        assert_eq!(
            resolve(&ValueKind::DateTime64, &precise_zoned).to_string(),
            "DateTime64(3, 'GMT')"
        );
    }

    #[test]
    fn test_resolve_enums_in_declaration_order() {
        let metadata = ColumnMetadata {
            enum_mapping: Some(vec![("a".into(), 12), ("b".into(), 1), ("c".into(), 600)]),
            ..Default::default()
        };
        assert_eq!(
            resolve(&ValueKind::Enum16, &metadata).to_string(),
            "Enum16('a'=12,'b'=1,'c'=600)"
        );

        let quoted = ColumnMetadata {
            enum_mapping: Some(vec![("it's".into(), 0)]),
            ..Default::default()
        };
        assert_eq!(resolve(&ValueKind::Enum8, &quoted).to_string(), "Enum8('it\\'s'=0)");

        let backslashed = ColumnMetadata {
            enum_mapping: Some(vec![("a\\".into(), 0), ("b\\'".into(), 1)]),
            ..Default::default()
        };
        assert_eq!(
            resolve(&ValueKind::Enum8, &backslashed).to_string(),
            r"Enum8('a\\'=0,'b\\\''=1)"
        );
    }

    #[test]
    fn test_resolve_wrappers() {
        let array = ValueKind::Array(Box::new(ValueKind::Int64));
        assert_eq!(plain(array).to_string(), "Array(Int64)");

        let fixed = ColumnMetadata {
            fixed_string_len: Some(4),
            ..Default::default()
        };
        let nullable = ValueKind::Nullable(Box::new(ValueKind::String));
        assert_eq!(resolve(&nullable, &fixed).to_string(), "Nullable(FixedString(4))");
    }

    #[test]
    fn test_low_cardinality_support_matrix() {
        for eligible in [
            ClickHouseTypeName::Int8,
            ClickHouseTypeName::UInt64,
            ClickHouseTypeName::Float64,
            ClickHouseTypeName::String,
            ClickHouseTypeName::FixedString(10),
        ] {
            assert!(eligible.supports_low_cardinality(), "{eligible} should be eligible");
        }

        for ineligible in [
            ClickHouseTypeName::Uuid,
            ClickHouseTypeName::Bool,
            ClickHouseTypeName::Date,
            ClickHouseTypeName::Date32,
            ClickHouseTypeName::DateTime { time_zone: None },
            ClickHouseTypeName::DateTime64 {
                precision: 3,
                time_zone: None,
            },
            ClickHouseTypeName::Enum8(vec![("a".into(), 0)]),
            ClickHouseTypeName::Enum16(vec![("a".into(), 0)]),
            ClickHouseTypeName::Array(Box::new(ClickHouseTypeName::String)),
        ] {
            assert!(!ineligible.supports_low_cardinality(), "{ineligible} should not be eligible");
        }
    }

    #[test]
    fn test_nullable_low_cardinality_follows_inner_type() {
        let nullable_string = ClickHouseTypeName::Nullable(Box::new(ClickHouseTypeName::String));
        assert!(nullable_string.supports_low_cardinality());

        let nullable_date = ClickHouseTypeName::Nullable(Box::new(ClickHouseTypeName::Date));
        assert!(!nullable_date.supports_low_cardinality());
    }

    #[test]
    #[should_panic(expected = "DateTime64 columns require a precision")]
    fn test_datetime64_without_precision_panics() {
        plain(ValueKind::DateTime64);
    }

    #[test]
    #[should_panic(expected = "does not fit into 8 bits")]
    fn test_enum8_code_out_of_range_panics() {
        let metadata = ColumnMetadata {
            enum_mapping: Some(vec![("c".into(), 600)]),
            ..Default::default()
        };
        resolve(&ValueKind::Enum8, &metadata);
    }

    #[test]
    fn test_element_strips_wrappers() {
        let kind = ValueKind::Array(Box::new(ValueKind::Nullable(Box::new(ValueKind::Enum8))));
        assert_eq!(kind.element(), &ValueKind::Enum8);
    }
}
