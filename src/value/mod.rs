//! Value kinds for ClickHouse columns
//!
//! This module defines the closed set of value kinds a column can hold and the
//! conversions between typed Rust vectors and their type-erased form.
//!
//! ## Types
//!
//! - **`ColumnValues`** - Type-erased column payload, one variant per value kind
//! - **`ColumnType`** - Sealed trait mapping a Rust type to its `ColumnValues` variant
//! - **`Date`**, **`Date32`**, **`DateTime`**, **`DateTime64`** - Temporal wrappers
//! - **`Enum8`**, **`Enum16`** - Enum words; the word-to-number mapping lives in column metadata

pub mod data;
pub mod enumeration;
pub mod temporal;
pub mod types;

pub use data::ColumnValues;
pub use enumeration::{Enum16, Enum8};
pub use temporal::{Date, Date32, DateTime, DateTime64};
pub use types::ColumnType;
