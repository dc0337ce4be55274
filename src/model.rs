//! Columnar models
//!
//! A model is one table's row set stored column by column. It is an ordered list
//! of [`ColumnBinding`]s (see [`ColumnSet`]) plus the [`ClickHouseEngine`] that
//! names its table ([`ClickHouseModel`]). All table operations are provided by
//! `ClickHouseModel`; implementors only declare their columns and their engine.
//!
//! # Example
//!
//! ```rust
//! use chorm::column::Field;
//! use chorm::memory::MemoryExecutor;
//! use chorm::model::ClickHouseModel;
//! use chorm::table::ReplacingMergeTree;
//!
//! chorm::column_set! {
//!     pub struct Weather {
//!         pub timestamp: Field<i64> = Field::new("timestamp").primary().order_by(),
//!         pub station: Field<String> = Field::new("station").primary().order_by().low_cardinality(),
//!         pub temperature: Field<f32> = Field::new("temperature"),
//!     }
//! }
//!
//! impl ClickHouseModel for Weather {
//!     type Engine = ReplacingMergeTree;
//!
//!     fn engine() -> ReplacingMergeTree {
//!         ReplacingMergeTree::new("weather")
//!     }
//! }
//!
//! # fn main() -> Result<(), chorm::model::ModelError> {
//! let executor = MemoryExecutor::new();
//! Weather::create_table(&executor)?;
//!
//! let mut rows = Weather::default();
//! rows.timestamp.extend([100, 200]);
//! rows.station.extend(["x010".to_string(), "ax51".to_string()]);
//! rows.temperature.extend([11.1, 10.4]);
//! rows.insert(&executor)?;
//!
//! let stored = Weather::select(&executor)?;
//! assert_eq!(stored.count(), 2);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod select;

pub use error::ModelError;
pub use select::SelectQuery;

use crate::column::ColumnBinding;
use crate::executor::{
    execute_command, execute_insert, execute_query, ClickHouseColumn, ClickHouseExecutor,
};
use crate::table::ClickHouseEngine;

/// Ordered set of columns.
///
/// Declaration order is significant: it is the column order of generated DDL,
/// insert payloads and default select lists. Usually generated by
/// [`column_set!`](crate::column_set).
pub trait ColumnSet {
    fn columns(&self) -> Vec<&dyn ColumnBinding>;

    fn columns_mut(&mut self) -> Vec<&mut dyn ColumnBinding>;

    /// Column by key.
    fn column(&self, key: &str) -> Option<&dyn ColumnBinding> {
        self.columns().into_iter().find(|column| column.key() == key)
    }
}

/// A table stored in ClickHouse, with its rows held column by column.
pub trait ClickHouseModel: ColumnSet + Default {
    type Engine: ClickHouseEngine;

    /// Engine describing the model's table.
    fn engine() -> Self::Engine;

    /// Number of rows: the length of the first non-empty column, or 0.
    fn count(&self) -> usize {
        self.columns()
            .iter()
            .map(|column| column.count())
            .find(|count| *count > 0)
            .unwrap_or(0)
    }

    /// Keep the rows where `mask` is true, in every non-empty column.
    ///
    /// # Panics
    ///
    /// Panics when `mask.len()` differs from [`ClickHouseModel::count`].
    fn filter(&mut self, mask: &[bool]) {
        assert_eq!(
            mask.len(),
            self.count(),
            "filter mask length must equal the row count"
        );
        for column in self.columns_mut() {
            if column.count() > 0 {
                column.filter(mask);
            }
        }
    }

    /// Append the rows of `other`, column by column in declaration order.
    fn append(&mut self, other: &Self) -> Result<(), ModelError> {
        for (column, rows) in self.columns_mut().into_iter().zip(other.columns()) {
            column.append(rows.get_all())?;
        }
        Ok(())
    }

    /// Pre-allocate room for `capacity` rows in every column.
    fn reserve_capacity(&mut self, capacity: usize) {
        for column in self.columns_mut() {
            column.reserve(capacity);
        }
    }

    /// Create the table if it does not exist.
    fn create_table<E>(executor: &E) -> Result<(), ModelError>
    where
        E: ClickHouseExecutor + ?Sized,
    {
        Self::create_table_with_engine(executor, &Self::engine())
    }

    /// Create the table described by `engine` with this model's columns.
    fn create_table_with_engine<E>(
        executor: &E,
        engine: &dyn ClickHouseEngine,
    ) -> Result<(), ModelError>
    where
        E: ClickHouseExecutor + ?Sized,
    {
        let model = Self::default();
        let query = engine.create_table_query(&model.columns());
        log::debug!("{query}");
        if engine.is_using_cluster() {
            execute_query(executor, "create", &query)?;
        } else {
            execute_command(executor, "create", &query)?;
        }
        Ok(())
    }

    /// Insert all rows. Nothing is sent when the model is empty.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MismatchingRowCount`] before anything is sent when the
    /// columns hold different numbers of rows.
    fn insert<E>(&self, executor: &E) -> Result<(), ModelError>
    where
        E: ClickHouseExecutor + ?Sized,
    {
        self.insert_with_engine(executor, &Self::engine())
    }

    fn insert_with_engine<E>(
        &self,
        executor: &E,
        engine: &dyn ClickHouseEngine,
    ) -> Result<(), ModelError>
    where
        E: ClickHouseExecutor + ?Sized,
    {
        let row_count = self.count();
        if row_count == 0 {
            return Ok(());
        }

        let columns = self.columns();
        if let Some(column) = columns.iter().find(|column| column.count() != row_count) {
            log::warn!(
                "rejecting insert into {}: column {} has {} rows, expected {}",
                engine.table_with_database(),
                column.key(),
                column.count(),
                row_count
            );
            return Err(ModelError::MismatchingRowCount {
                count: column.count(),
                expected: row_count,
            });
        }

        let data: Vec<ClickHouseColumn> = columns.iter().map(|column| column.to_column()).collect();
        execute_insert(executor, &engine.table_with_database(), data, row_count)?;
        Ok(())
    }

    /// Drop the table. This cannot be undone.
    fn delete_table<E>(executor: &E) -> Result<(), ModelError>
    where
        E: ClickHouseExecutor + ?Sized,
    {
        Self::delete_table_with_engine(executor, &Self::engine())
    }

    fn delete_table_with_engine<E>(
        executor: &E,
        engine: &dyn ClickHouseEngine,
    ) -> Result<(), ModelError>
    where
        E: ClickHouseExecutor + ?Sized,
    {
        let query = engine.drop_table_query();
        log::info!("{query}");
        if engine.is_using_cluster() {
            execute_query(executor, "drop", &query)?;
        } else {
            execute_command(executor, "drop", &query)?;
        }
        Ok(())
    }

    /// Run `sql` verbatim and apply every result column whose name matches a key.
    ///
    /// Result columns without a matching key are ignored; columns that were not
    /// selected stay empty.
    fn select_sql<E>(executor: &E, sql: &str) -> Result<Self, ModelError>
    where
        E: ClickHouseExecutor + ?Sized,
    {
        log::debug!("{sql}");
        let result = execute_query(executor, "select", sql)?;
        let mut model = Self::default();
        for column in result.columns {
            let binding = model
                .columns_mut()
                .into_iter()
                .find(|binding| binding.key() == column.name);
            if let Some(binding) = binding {
                binding.set_all(column.values)?;
            }
        }
        Ok(model)
    }

    /// Select all rows and columns.
    fn select<E>(executor: &E) -> Result<Self, ModelError>
    where
        E: ClickHouseExecutor + ?Sized,
    {
        Self::find().all(executor)
    }

    /// Start a select query.
    fn find() -> SelectQuery<Self> {
        SelectQuery::new()
    }

    /// JSON object mapping each column key to its rows.
    fn encode_json(&self) -> Result<serde_json::Value, ModelError> {
        let mut object = serde_json::Map::new();
        for column in self.columns() {
            object.insert(column.key().to_string(), column.get_all().to_json()?);
        }
        Ok(serde_json::Value::Object(object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryExecutor;
    use crate::tests_cfg::{InheritedTestModel, TestModel};
    use crate::value::ColumnValues;
    use serde_json::json;

    fn three_rows() -> TestModel {
        let mut model = TestModel::default();
        model.timestamp.extend([100, 200, 300]);
        model.id.extend(["x010", "ax51", "cd22"].map(String::from));
        model.temperature.extend([11.1, 10.4, 8.9]);
        model
    }

    #[test]
    fn test_count_uses_first_non_empty_column() {
        let mut model = TestModel::default();
        assert_eq!(model.count(), 0);
        model.temperature.push(1.0);
        assert_eq!(model.count(), 1);
    }

    #[test]
    fn test_filter_applies_mask_to_populated_columns() {
        let mut model = three_rows();
        model.filter(&[true, false, true]);
        assert_eq!(*model.timestamp, vec![100, 300]);
        assert_eq!(*model.id, vec!["x010".to_string(), "cd22".to_string()]);
        assert_eq!(*model.temperature, vec![11.1, 8.9]);
        assert!(model.fixed.is_empty());
    }

    #[test]
    #[should_panic(expected = "filter mask length")]
    fn test_filter_rejects_wrong_mask_length() {
        let mut model = three_rows();
        model.filter(&[true]);
    }

    #[test]
    fn test_append_concatenates_columns() {
        let mut model = three_rows();
        let other = three_rows();
        model.append(&other).unwrap();
        assert_eq!(model.count(), 6);
        assert_eq!(model.timestamp[3], 100);
    }

    #[test]
    fn test_reserve_capacity() {
        let mut model = TestModel::default();
        model.reserve_capacity(128);
        assert!(model.timestamp.capacity() >= 128);
        assert!(model.arr.capacity() >= 128);
    }

    #[test]
    fn test_insert_empty_model_is_noop() {
        let executor = MemoryExecutor::new();
        TestModel::default().insert(&executor).unwrap();
        assert!(executor.statements().is_empty());
        assert!(executor.inserts().is_empty());
    }

    #[test]
    fn test_insert_rejects_mismatching_row_count() {
        let executor = MemoryExecutor::new();
        let mut model = InheritedTestModel::default();
        model.base.timestamp.extend([1, 2, 3]);
        model.base.id.extend(["a", "b"].map(String::from));
        model.temperature.extend([1.0, 2.0, 3.0]);

        let err = model.insert(&executor).unwrap_err();
        assert_eq!(err, ModelError::MismatchingRowCount { count: 2, expected: 3 });
        assert!(executor.inserts().is_empty());
    }

    #[test]
    fn test_select_sql_ignores_unknown_columns() {
        let executor = MemoryExecutor::new();
        executor.queue_result(crate::executor::QueryResult::new(vec![
            ClickHouseColumn::new("timestamp", ColumnValues::Int64(vec![5])),
            ClickHouseColumn::new("unknown", ColumnValues::Bool(vec![true])),
        ]));
        let model =
            TestModel::select_sql(&executor, "SELECT timestamp, unknown FROM test").unwrap();
        assert_eq!(*model.timestamp, vec![5]);
        assert!(model.temperature.is_empty());
    }

    #[test]
    fn test_select_sql_reports_kind_mismatch() {
        let executor = MemoryExecutor::new();
        executor.queue_result(crate::executor::QueryResult::new(vec![ClickHouseColumn::new(
            "timestamp",
            ColumnValues::String(vec!["oops".into()]),
        )]));
        let err = TestModel::select_sql(&executor, "SELECT timestamp FROM test").unwrap_err();
        assert_eq!(
            err,
            ModelError::MismatchingDataType {
                column: "timestamp".into()
            }
        );
    }

    #[test]
    fn test_encode_json_is_column_wise() {
        let mut model = InheritedTestModel::default();
        model.base.timestamp.extend([1, 2]);
        model.base.id.extend(["a", "b"].map(String::from));
        model.temperature.extend([0.5, 1.5]);
        assert_eq!(
            model.encode_json().unwrap(),
            json!({
                "timestamp": [1, 2],
                "stationID": ["a", "b"],
                "temperature": [0.5, 1.5],
            })
        );
    }

    #[test]
    fn test_column_lookup_by_key() {
        let model = InheritedTestModel::default();
        assert!(model.column("stationID").is_some());
        assert!(model.column("fixed").is_none());
    }
}
