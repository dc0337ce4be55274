//! Macros Module
//!
//! - `column_set!` declares a model struct together with its ordered
//!   [`ColumnSet`](crate::model::ColumnSet) implementation.

mod column_set;
