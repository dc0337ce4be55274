/// Declare a model struct and its [`ColumnSet`](crate::model::ColumnSet) implementation.
///
/// Each field is a column binding with an initializer that declares its schema.
/// The generated `Default` builds every column empty from those initializers,
/// and `columns()` lists them in declaration order.
///
/// A struct may `extend` another column set: the base is embedded as a named
/// field and its columns come first.
///
/// ```rust
/// use chorm::column::Field;
/// use chorm::model::ColumnSet;
///
/// chorm::column_set! {
///     pub struct Station {
///         pub timestamp: Field<i64> = Field::new("timestamp").primary().order_by(),
///         pub id: Field<String> = Field::new("stationID").primary().order_by().low_cardinality(),
///     }
/// }
///
/// chorm::column_set! {
///     pub struct Reading extends Station as base {
///         pub temperature: Field<f32> = Field::new("temperature"),
///     }
/// }
///
/// let reading = Reading::default();
/// let keys: Vec<&str> = reading.columns().iter().map(|column| column.key()).collect();
/// assert_eq!(keys, ["timestamp", "stationID", "temperature"]);
/// ```
#[macro_export]
macro_rules! column_set {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident extends $base:ty as $base_field:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty = $init:expr
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis struct $name {
            pub $base_field: $base,
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl ::std::default::Default for $name {
            fn default() -> Self {
                Self {
                    $base_field: <$base as ::std::default::Default>::default(),
                    $( $field: $init, )*
                }
            }
        }

        impl $crate::model::ColumnSet for $name {
            fn columns(&self) -> ::std::vec::Vec<&dyn $crate::column::ColumnBinding> {
                #[allow(unused_mut)]
                let mut columns = $crate::model::ColumnSet::columns(&self.$base_field);
                $( columns.push(&self.$field); )*
                columns
            }

            fn columns_mut(&mut self) -> ::std::vec::Vec<&mut dyn $crate::column::ColumnBinding> {
                #[allow(unused_mut)]
                let mut columns = $crate::model::ColumnSet::columns_mut(&mut self.$base_field);
                $( columns.push(&mut self.$field); )*
                columns
            }
        }
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty = $init:expr
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl ::std::default::Default for $name {
            fn default() -> Self {
                Self {
                    $( $field: $init, )*
                }
            }
        }

        impl $crate::model::ColumnSet for $name {
            fn columns(&self) -> ::std::vec::Vec<&dyn $crate::column::ColumnBinding> {
                ::std::vec![ $( &self.$field as &dyn $crate::column::ColumnBinding ),* ]
            }

            fn columns_mut(&mut self) -> ::std::vec::Vec<&mut dyn $crate::column::ColumnBinding> {
                ::std::vec![ $( &mut self.$field as &mut dyn $crate::column::ColumnBinding ),* ]
            }
        }
    };
}
