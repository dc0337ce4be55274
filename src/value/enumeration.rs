//! Enum values.
//!
//! A row of an `Enum8`/`Enum16` column is carried as its word. The numeric codes
//! are declared once on the column (see `Field::mapping`) and rendered into the
//! DDL, so the server performs the word-to-code translation.

use serde::Serialize;

/// A value of an `Enum8` column.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Enum8(pub String);

/// A value of an `Enum16` column.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Enum16(pub String);

macro_rules! enum_word {
    ($($name:ident),*) => {$(
        impl $name {
            pub fn new(word: impl Into<String>) -> Self {
                Self(word.into())
            }

            pub fn word(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(word: &str) -> Self {
                Self(word.to_string())
            }
        }
    )*};
}

enum_word!(Enum8, Enum16);
