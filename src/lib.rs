//! # chorm
//!
//! Typed columnar models for ClickHouse.
//!
//! A model declares its columns once, with their keys, flags and type metadata,
//! and holds its rows column by column. From that declaration the crate
//! generates the `CREATE TABLE` statement, builds column-wise insert blocks and
//! binds query results back onto the typed columns.
//!
//! - [`column`]: typed column bindings and ClickHouse type names
//! - [`value`]: the closed set of value kinds and their type-erased payloads
//! - [`table`]: table engines and DDL generation
//! - [`model`]: the model traits and the select builder
//! - [`executor`]: the executor trait a ClickHouse client implements
//! - [`memory`]: an in-memory executor for tests and local development

pub mod column;
pub mod config;
pub mod executor;
mod macros;
pub mod memory;
pub mod metrics;
pub mod model;
pub mod table;
pub mod value;

#[cfg(test)]
mod tests_cfg;

pub use column::{ColumnBinding, Field};
pub use config::ClickHouseConfig;
pub use executor::{ClickHouseColumn, ClickHouseError, ClickHouseExecutor, QueryResult};
pub use model::{ClickHouseModel, ColumnSet, ModelError, SelectQuery};
pub use table::{ClickHouseEngine, ReplacingMergeTree};
pub use value::{ColumnType, ColumnValues};
