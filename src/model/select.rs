//! Select query builder for models.
//!
//! `SelectQuery` is returned by [`ClickHouseModel::find`] and renders
//!
//! ```text
//! SELECT <fields> FROM <table> [FINAL] [WHERE <clause>] [ORDER BY <clause>] [LIMIT <offset>,<limit> | LIMIT <limit>]
//! ```
//!
//! Clauses are passed through as SQL text.

use super::{ClickHouseModel, ModelError};
use crate::executor::ClickHouseExecutor;
use crate::table::ClickHouseEngine;
use std::marker::PhantomData;

/// Query builder for selecting a model's rows
///
/// # Example
///
/// ```no_run
/// use chorm::model::ClickHouseModel;
/// # use chorm::column::Field;
/// # use chorm::table::ReplacingMergeTree;
/// # chorm::column_set! {
/// #     pub struct Weather {
/// #         pub timestamp: Field<i64> = Field::new("timestamp").primary().order_by(),
/// #         pub temperature: Field<f32> = Field::new("temperature"),
/// #     }
/// # }
/// # impl ClickHouseModel for Weather {
/// #     type Engine = ReplacingMergeTree;
/// #     fn engine() -> ReplacingMergeTree { ReplacingMergeTree::new("weather") }
/// # }
///
/// let sql = Weather::find()
///     .fields(["timestamp"])
///     .with_final()
///     .filter("timestamp > 100")
///     .order_by("timestamp DESC")
///     .limit(10)
///     .offset(20)
///     .to_sql();
/// assert_eq!(
///     sql,
///     "SELECT timestamp FROM `weather` FINAL WHERE timestamp > 100 ORDER BY timestamp DESC LIMIT 20,10"
/// );
/// ```
pub struct SelectQuery<M>
where
    M: ClickHouseModel,
{
    fields: Option<Vec<String>>,
    is_final: bool,
    filter: Option<String>,
    order_by: Option<String>,
    limit: Option<u64>,
    offset: Option<u64>,
    engine: Option<Box<dyn ClickHouseEngine>>,
    _model: PhantomData<M>,
}

impl<M> SelectQuery<M>
where
    M: ClickHouseModel,
{
    pub fn new() -> Self {
        Self {
            fields: None,
            is_final: false,
            filter: None,
            order_by: None,
            limit: None,
            offset: None,
            engine: None,
            _model: PhantomData,
        }
    }

    /// Select only these expressions. Defaults to every column key, backtick-quoted.
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Add `FINAL`, forcing replacing merges at query time.
    pub fn with_final(mut self) -> Self {
        self.is_final = true;
        self
    }

    /// `WHERE` clause.
    pub fn filter(mut self, clause: impl Into<String>) -> Self {
        self.filter = Some(clause.into());
        self
    }

    /// `ORDER BY` clause.
    pub fn order_by(mut self, clause: impl Into<String>) -> Self {
        self.order_by = Some(clause.into());
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Rows to skip. Only applied together with [`SelectQuery::limit`].
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Read from `engine`'s table instead of the model's own.
    pub fn engine(mut self, engine: impl ClickHouseEngine + 'static) -> Self {
        self.engine = Some(Box::new(engine));
        self
    }

    pub fn to_sql(&self) -> String {
        let table = match &self.engine {
            Some(engine) => engine.table_with_database(),
            None => M::engine().table_with_database(),
        };
        let fields = match &self.fields {
            Some(fields) => fields.join(","),
            None => M::default()
                .columns()
                .iter()
                .map(|column| format!("`{}`", column.key()))
                .collect::<Vec<_>>()
                .join(","),
        };

        let mut sql = format!("SELECT {fields} FROM {table}");
        if self.is_final {
            sql.push_str(" FINAL");
        }
        if let Some(filter) = &self.filter {
            sql.push_str(&format!(" WHERE {filter}"));
        }
        if let Some(order_by) = &self.order_by {
            sql.push_str(&format!(" ORDER BY {order_by}"));
        }
        match (self.limit, self.offset) {
            (Some(limit), Some(offset)) => sql.push_str(&format!(" LIMIT {offset},{limit}")),
            (Some(limit), None) => sql.push_str(&format!(" LIMIT {limit}")),
            (None, _) => {}
        }
        sql
    }

    /// Run the query and return the populated model.
    pub fn all<E>(self, executor: &E) -> Result<M, ModelError>
    where
        E: ClickHouseExecutor + ?Sized,
    {
        M::select_sql(executor, &self.to_sql())
    }
}

impl<M> Default for SelectQuery<M>
where
    M: ClickHouseModel,
{
    fn default() -> Self {
        Self::new()
    }
}
