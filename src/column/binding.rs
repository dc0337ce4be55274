//! Type-erased view of a column.

use super::{resolve, ClickHouseTypeName, ColumnFlags, ColumnMetadata, Field};
use crate::executor::ClickHouseColumn;
use crate::model::ModelError;
use crate::value::{ColumnType, ColumnValues};
use std::fmt::Debug;

/// Object-safe access to a model column, independent of its element type.
///
/// Every [`Field<T>`] implements this trait. The model layer works exclusively
/// through `&dyn ColumnBinding` so that one model can hold columns of different
/// types in declaration order.
pub trait ColumnBinding: Debug {
    /// Column name, used in DDL and as the wire column name.
    fn key(&self) -> &str;

    fn flags(&self) -> ColumnFlags;

    fn metadata(&self) -> &ColumnMetadata;

    /// Number of rows currently held.
    fn count(&self) -> usize;

    /// Pre-allocate room for `capacity` rows in total.
    fn reserve(&mut self, capacity: usize);

    /// Append rows of the same kind.
    ///
    /// Returns [`ModelError::MismatchingDataType`] and leaves the column untouched
    /// when `values` holds a different kind.
    fn append(&mut self, values: ColumnValues) -> Result<(), ModelError>;

    /// Replace all rows. Same kind rules as [`ColumnBinding::append`].
    fn set_all(&mut self, values: ColumnValues) -> Result<(), ModelError>;

    /// Copy of all rows in type-erased form.
    fn get_all(&self) -> ColumnValues;

    /// Keep the rows where `mask` is true.
    ///
    /// # Panics
    ///
    /// Panics when `mask.len() != self.count()`.
    fn filter(&mut self, mask: &[bool]);

    /// ClickHouse type name from the column's kind and metadata.
    fn resolved_type_name(&self) -> ClickHouseTypeName;

    fn is_primary(&self) -> bool {
        self.flags().is_primary
    }

    fn is_order_by(&self) -> bool {
        self.flags().is_order_by
    }

    fn is_low_cardinality(&self) -> bool {
        self.flags().is_low_cardinality
    }

    /// Insert payload for this column.
    fn to_column(&self) -> ClickHouseColumn {
        ClickHouseColumn::new(self.key(), self.get_all())
    }
}

impl<T: ColumnType> ColumnBinding for Field<T> {
    fn key(&self) -> &str {
        Field::key(self)
    }

    fn flags(&self) -> ColumnFlags {
        Field::flags(self)
    }

    fn metadata(&self) -> &ColumnMetadata {
        Field::metadata(self)
    }

    fn count(&self) -> usize {
        self.len()
    }

    fn reserve(&mut self, capacity: usize) {
        self.reserve_total(capacity);
    }

    fn append(&mut self, values: ColumnValues) -> Result<(), ModelError> {
        let rows = T::from_values(values).ok_or_else(|| ModelError::MismatchingDataType {
            column: Field::key(self).to_string(),
        })?;
        self.extend(rows);
        Ok(())
    }

    fn set_all(&mut self, values: ColumnValues) -> Result<(), ModelError> {
        let rows = T::from_values(values).ok_or_else(|| ModelError::MismatchingDataType {
            column: Field::key(self).to_string(),
        })?;
        self.set(rows);
        Ok(())
    }

    fn get_all(&self) -> ColumnValues {
        T::into_values(self.to_vec(), Field::metadata(self))
    }

    fn filter(&mut self, mask: &[bool]) {
        Field::filter(self, mask);
    }

    fn resolved_type_name(&self) -> ClickHouseTypeName {
        resolve(&T::kind(), Field::metadata(self))
    }
}
