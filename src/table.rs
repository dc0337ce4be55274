//! Table identity and DDL shape.
//!
//! A [`ClickHouseEngine`] names the table a model is stored in (table, optional
//! database, optional cluster) and renders the `CREATE TABLE` / `DROP TABLE`
//! statements for it. [`ReplacingMergeTree`] is the engine models use by default.

pub mod engine;

pub use engine::{ClickHouseEngine, ReplacingMergeTree};
