//! DDL generation through the model facade

use chorm::column::{ClickHouseTypeName, ColumnBinding, Field};
use chorm::memory::MemoryExecutor;
use chorm::model::ClickHouseModel;
use chorm::table::{ClickHouseEngine, ReplacingMergeTree};
use chorm::value::{Date, DateTime64, Enum8};
use uuid::Uuid;

chorm::column_set! {
    pub struct Event {
        pub id: Field<u64> = Field::new("id").primary().order_by(),
        pub at: Field<DateTime64> = Field::new("at").order_by().precision(6).time_zone("'UTC'"),
        pub source: Field<Option<String>> = Field::new("source").low_cardinality(),
        pub day: Field<Date> = Field::new("day").low_cardinality(),
        pub trace: Field<Uuid> = Field::new("trace").low_cardinality(),
        pub kind: Field<Enum8> = Field::new("kind")
            .low_cardinality()
            .mapping([("open", 1), ("close", 2)]),
        pub tags: Field<Vec<String>> = Field::new("tags").low_cardinality(),
        pub code: Field<Option<i32>> = Field::new("code"),
    }
}

impl ClickHouseModel for Event {
    type Engine = ReplacingMergeTree;

    fn engine() -> ReplacingMergeTree {
        ReplacingMergeTree::new("events").in_database("audit")
    }
}

#[test]
fn test_low_cardinality_only_on_eligible_columns() {
    let executor = MemoryExecutor::new();
    Event::create_table(&executor).unwrap();
    assert_eq!(
        executor.statements(),
        ["CREATE TABLE IF NOT EXISTS `audit`.`events`  (id UInt64,at DateTime64(6, 'UTC'),source LowCardinality(Nullable(String)),day Date,trace UUID,kind Enum8('open'=1,'close'=2),tags Array(String),code Nullable(Int32))\nENGINE = ReplacingMergeTree()\nPRIMARY KEY (id) ORDER BY (id,at)"]
    );
}

#[test]
fn test_cluster_statements_run_as_queries() {
    let executor = MemoryExecutor::new();
    let engine = ReplacingMergeTree::new("events")
        .in_database("audit")
        .on_cluster("analytics")
        .partition_by("toDate(at)");

    Event::create_table_with_engine(&executor, &engine).unwrap();
    Event::delete_table_with_engine(&executor, &engine).unwrap();

    let statements = executor.statements();
    assert_eq!(
        statements[0],
        "CREATE TABLE IF NOT EXISTS `audit`.`events` ON CLUSTER analytics (id UInt64,at DateTime64(6, 'UTC'),source LowCardinality(Nullable(String)),day Date,trace UUID,kind Enum8('open'=1,'close'=2),tags Array(String),code Nullable(Int32))\n\
         ENGINE = ReplicatedReplacingMergeTree('/clickhouse/{cluster}/tables/{database}.{table}/{shard}', '{replica}')\n\
         PRIMARY KEY (id) PARTITION BY (toDate(at)) ORDER BY (id,at)"
    );
    assert_eq!(
        statements[1],
        "DROP TABLE IF EXISTS `audit`.`events` ON CLUSTER analytics"
    );
    assert!(engine.is_using_cluster());
}

#[test]
fn test_insert_with_engine_targets_override() {
    let executor = MemoryExecutor::new();
    let archive = ReplacingMergeTree::new("events_archive");
    Event::create_table_with_engine(&executor, &archive).unwrap();

    let mut event = Event::default();
    event.id.push(1);
    event.at.push(DateTime64::default());
    event.source.push(None);
    event.day.push(Date::default());
    event.trace.push(Uuid::nil());
    event.kind.push(Enum8::new("open"));
    event.tags.push(vec!["a".into(), "b".into()]);
    event.code.push(Some(7));
    event.insert_with_engine(&executor, &archive).unwrap();

    assert_eq!(executor.inserts()[0].table, "`events_archive`");
    let stored = Event::find().engine(archive).all(&executor).unwrap();
    assert_eq!(*stored.source, vec![None::<String>]);
    assert_eq!(*stored.code, vec![Some(7)]);
    assert_eq!(*stored.tags, vec![vec!["a".to_string(), "b".to_string()]]);
}

#[test]
fn test_resolved_type_names() {
    let event = Event::default();
    assert_eq!(
        event.source.resolved_type_name(),
        ClickHouseTypeName::Nullable(Box::new(ClickHouseTypeName::String))
    );
    assert!(event.source.resolved_type_name().supports_low_cardinality());
    assert!(!event.tags.resolved_type_name().supports_low_cardinality());
}
