//! Typed column declared on a model.

use super::{ColumnFlags, ColumnMetadata, ValueKind};
use crate::value::ColumnType;
use std::ops::{Deref, DerefMut};

/// A named, typed column of a model.
///
/// `Field` owns the column's values and dereferences to the underlying `Vec<T>`,
/// so rows are pushed and read like a vector. Schema information is declared
/// once through the builder methods:
///
/// ```rust
/// use chorm::column::Field;
///
/// let mut timestamp = Field::<i64>::new("timestamp").primary().order_by();
/// timestamp.push(100);
/// timestamp.extend([200, 300]);
/// assert_eq!(timestamp.len(), 3);
///
/// let fixed = Field::<String>::new("fixed").low_cardinality().fixed_string(10);
/// assert_eq!(fixed.metadata().fixed_string_len, Some(10));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Field<T: ColumnType> {
    key: String,
    values: Vec<T>,
    flags: ColumnFlags,
    metadata: ColumnMetadata,
}

impl<T: ColumnType> Field<T> {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            values: Vec::new(),
            flags: ColumnFlags::default(),
            metadata: ColumnMetadata::default(),
        }
    }

    /// Part of `PRIMARY KEY (...)`.
    pub fn primary(mut self) -> Self {
        self.flags.is_primary = true;
        self
    }

    /// Part of `ORDER BY (...)`.
    pub fn order_by(mut self) -> Self {
        self.flags.is_order_by = true;
        self
    }

    /// Request `LowCardinality(...)`; ignored for types that do not support it.
    pub fn low_cardinality(mut self) -> Self {
        self.flags.is_low_cardinality = true;
        self
    }

    /// Declare a `FixedString(length)` column.
    ///
    /// # Panics
    ///
    /// Panics unless the element kind is `String`.
    pub fn fixed_string(mut self, length: usize) -> Self {
        assert_eq!(
            T::kind().element(),
            &ValueKind::String,
            "column `{}`: fixed_string requires String values",
            self.key
        );
        self.metadata.fixed_string_len = Some(length);
        self
    }

    /// Timezone of a `DateTime`/`DateTime64` column, emitted verbatim (`"'GMT'"`).
    ///
    /// # Panics
    ///
    /// Panics unless the element kind is `DateTime` or `DateTime64`.
    pub fn time_zone(mut self, time_zone: impl Into<String>) -> Self {
        assert!(
            matches!(
                T::kind().element(),
                ValueKind::DateTime | ValueKind::DateTime64
            ),
            "column `{}`: time_zone requires DateTime or DateTime64 values",
            self.key
        );
        self.metadata.time_zone = Some(time_zone.into());
        self
    }

    /// Sub-second precision of a `DateTime64` column.
    ///
    /// # Panics
    ///
    /// Panics unless the element kind is `DateTime64` and `precision <= 9`.
    pub fn precision(mut self, precision: u8) -> Self {
        assert_eq!(
            T::kind().element(),
            &ValueKind::DateTime64,
            "column `{}`: precision requires DateTime64 values",
            self.key
        );
        assert!(precision <= 9, "column `{}`: precision {precision} > 9", self.key);
        self.metadata.precision = Some(precision);
        self
    }

    /// Word to code mapping of an `Enum8`/`Enum16` column, in declaration order.
    ///
    /// # Panics
    ///
    /// Panics unless the element kind is an enum, or when an `Enum8` code does not
    /// fit into `i8`.
    pub fn mapping<S, I>(mut self, mapping: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, i16)>,
    {
        let mapping: Vec<(String, i16)> = mapping
            .into_iter()
            .map(|(word, code)| (word.into(), code))
            .collect();
        match T::kind().element() {
            ValueKind::Enum8 => {
                let out_of_range = mapping.iter().find(|(_, code)| i8::try_from(*code).is_err());
                if let Some((word, code)) = out_of_range {
                    panic!(
                        "column `{}`: Enum8 code {code} for '{word}' does not fit into 8 bits",
                        self.key
                    );
                }
            }
            ValueKind::Enum16 => {}
            other => panic!("column `{}`: mapping requires enum values, found {other:?}", self.key),
        }
        self.metadata.enum_mapping = Some(mapping);
        self
    }

    /// Replace the values, keeping the schema.
    pub fn with_values(mut self, values: impl Into<Vec<T>>) -> Self {
        self.values = values.into();
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn flags(&self) -> ColumnFlags {
        self.flags
    }

    pub fn metadata(&self) -> &ColumnMetadata {
        &self.metadata
    }

    /// Replace the values in place.
    pub fn set(&mut self, values: Vec<T>) {
        self.values = values;
    }

    pub fn into_values(self) -> Vec<T> {
        self.values
    }

    /// Keep the rows where `mask` is true.
    ///
    /// # Panics
    ///
    /// Panics when `mask.len()` differs from the number of rows.
    pub fn filter(&mut self, mask: &[bool]) {
        assert_eq!(
            mask.len(),
            self.values.len(),
            "column `{}`: filter mask length must equal the row count",
            self.key
        );
        let mut row = 0;
        self.values.retain(|_| {
            let keep = mask[row];
            row += 1;
            keep
        });
    }

    /// Make room for `capacity` rows in total.
    pub fn reserve_total(&mut self, capacity: usize) {
        let additional = capacity.saturating_sub(self.values.len());
        self.values.reserve(additional);
    }
}

impl<T: ColumnType> Deref for Field<T> {
    type Target = Vec<T>;

    fn deref(&self) -> &Vec<T> {
        &self.values
    }
}

impl<T: ColumnType> DerefMut for Field<T> {
    fn deref_mut(&mut self) -> &mut Vec<T> {
        &mut self.values
    }
}
