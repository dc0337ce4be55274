//! Models shared by the unit tests.

use crate::column::Field;
use crate::model::ClickHouseModel;
use crate::table::ReplacingMergeTree;
use crate::value::{Date, DateTime, DateTime64, Enum16, Enum8};

const PARTITION_BY_MONTH: &str = "toYYYYMM(toDateTime(timestamp))";

crate::column_set! {
    /// One column of every kind the test server supports.
    pub struct TestModel {
        pub timestamp: Field<i64> = Field::new("timestamp").primary().order_by(),
        pub id: Field<String> = Field::new("stationID").primary().order_by().low_cardinality(),
        pub fixed: Field<String> = Field::new("fixed").low_cardinality().fixed_string(10),
        pub arr: Field<Vec<i64>> = Field::new("arr"),
        pub dat: Field<Date> = Field::new("dat"),
        pub datt: Field<DateTime> = Field::new("datt"),
        pub dattz: Field<DateTime> = Field::new("dattz").time_zone("'GMT'"),
        pub datt64: Field<DateTime64> = Field::new("datt64").precision(3),
        pub datt64z: Field<DateTime64> = Field::new("datt64z").precision(3).time_zone("'GMT'"),
        pub en8: Field<Enum8> = Field::new("en8").mapping([("a", 0), ("b", 1)]),
        pub en16: Field<Enum16> = Field::new("en16").mapping([("a", 12), ("b", 1), ("c", 600)]),
        pub temperature: Field<f32> = Field::new("temperature"),
    }
}

impl ClickHouseModel for TestModel {
    type Engine = ReplacingMergeTree;

    fn engine() -> ReplacingMergeTree {
        ReplacingMergeTree::new("test").partition_by(PARTITION_BY_MONTH)
    }
}

crate::column_set! {
    pub struct TestParent {
        pub timestamp: Field<i64> = Field::new("timestamp").primary().order_by(),
        pub id: Field<String> = Field::new("stationID").primary().order_by().low_cardinality(),
    }
}

crate::column_set! {
    pub struct InheritedTestModel extends TestParent as base {
        pub temperature: Field<f32> = Field::new("temperature"),
    }
}

impl ClickHouseModel for InheritedTestModel {
    type Engine = ReplacingMergeTree;

    fn engine() -> ReplacingMergeTree {
        ReplacingMergeTree::new("testInherited").partition_by(PARTITION_BY_MONTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryExecutor;

    #[test]
    fn test_model_create_table_query() {
        let executor = MemoryExecutor::new();
        TestModel::create_table(&executor).unwrap();
        assert_eq!(
            executor.statements(),
            ["CREATE TABLE IF NOT EXISTS `test`  (timestamp Int64,stationID LowCardinality(String),fixed LowCardinality(FixedString(10)),arr Array(Int64),dat Date,datt DateTime,dattz DateTime('GMT'),datt64 DateTime64(3),datt64z DateTime64(3, 'GMT'),en8 Enum8('a'=0,'b'=1),en16 Enum16('a'=12,'b'=1,'c'=600),temperature Float32)\nENGINE = ReplacingMergeTree()\nPRIMARY KEY (timestamp,stationID) PARTITION BY (toYYYYMM(toDateTime(timestamp))) ORDER BY (timestamp,stationID)"]
        );
    }

    #[test]
    fn test_inherited_create_table_query() {
        let executor = MemoryExecutor::new();
        InheritedTestModel::create_table(&executor).unwrap();
        assert_eq!(
            executor.statements(),
            ["CREATE TABLE IF NOT EXISTS `testInherited`  (timestamp Int64,stationID LowCardinality(String),temperature Float32)\nENGINE = ReplacingMergeTree()\nPRIMARY KEY (timestamp,stationID) PARTITION BY (toYYYYMM(toDateTime(timestamp))) ORDER BY (timestamp,stationID)"]
        );
    }
}
