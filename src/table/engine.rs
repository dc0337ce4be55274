use crate::column::ColumnBinding;
use std::fmt::Debug;

const REPLICATED_ENGINE: &str =
    "ReplicatedReplacingMergeTree('/clickhouse/{cluster}/tables/{database}.{table}/{shard}', '{replica}')";
const PLAIN_ENGINE: &str = "ReplacingMergeTree()";

/// Storage engine of a table: where it lives and how it is created.
pub trait ClickHouseEngine: Debug {
    fn table(&self) -> &str;

    fn database(&self) -> Option<&str>;

    /// Cluster the DDL runs on. Clustered statements return rows and are sent as queries.
    fn cluster(&self) -> Option<&str>;

    /// `CREATE TABLE` statement for the given columns, in declaration order.
    fn create_table_query(&self, columns: &[&dyn ColumnBinding]) -> String;

    fn is_using_cluster(&self) -> bool {
        self.cluster().is_some()
    }

    /// Backtick-quoted identifier, `` `database`.`table` `` or `` `table` ``.
    fn table_with_database(&self) -> String {
        match self.database() {
            Some(database) => format!("`{}`.`{}`", database, self.table()),
            None => format!("`{}`", self.table()),
        }
    }

    fn drop_table_query(&self) -> String {
        match self.cluster() {
            Some(cluster) => format!(
                "DROP TABLE IF EXISTS {} ON CLUSTER {}",
                self.table_with_database(),
                cluster
            ),
            None => format!("DROP TABLE IF EXISTS {}", self.table_with_database()),
        }
    }
}

/// `ReplacingMergeTree`, or its replicated variant when a cluster is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacingMergeTree {
    table: String,
    database: Option<String>,
    cluster: Option<String>,
    partition_by: Option<String>,
}

impl ReplacingMergeTree {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            database: None,
            cluster: None,
            partition_by: None,
        }
    }

    pub fn in_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn on_cluster(mut self, cluster: impl Into<String>) -> Self {
        self.cluster = Some(cluster.into());
        self
    }

    /// Partition expression, emitted as `PARTITION BY (<expression>)`.
    pub fn partition_by(mut self, expression: impl Into<String>) -> Self {
        self.partition_by = Some(expression.into());
        self
    }

    pub fn partition_expression(&self) -> Option<&str> {
        self.partition_by.as_deref()
    }
}

impl ClickHouseEngine for ReplacingMergeTree {
    fn table(&self) -> &str {
        &self.table
    }

    fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    fn cluster(&self) -> Option<&str> {
        self.cluster.as_deref()
    }

    /// # Panics
    ///
    /// Panics when no column is marked primary or none is marked order-by.
    fn create_table_query(&self, columns: &[&dyn ColumnBinding]) -> String {
        let ids: Vec<&str> = columns
            .iter()
            .filter(|column| column.is_primary())
            .map(|column| column.key())
            .collect();
        assert!(!ids.is_empty(), "table `{}` declares no primary key column", self.table);
        let order: Vec<&str> = columns
            .iter()
            .filter(|column| column.is_order_by())
            .map(|column| column.key())
            .collect();
        assert!(!order.is_empty(), "table `{}` declares no order-by column", self.table);

        let descriptions = columns
            .iter()
            .map(|column| {
                let type_name = column.resolved_type_name();
                if column.is_low_cardinality() && type_name.supports_low_cardinality() {
                    format!("{} LowCardinality({})", column.key(), type_name)
                } else {
                    format!("{} {}", column.key(), type_name)
                }
            })
            .collect::<Vec<_>>()
            .join(",");

        let on_cluster = self
            .cluster
            .as_ref()
            .map(|cluster| format!("ON CLUSTER {cluster}"))
            .unwrap_or_default();
        let engine = if self.is_using_cluster() {
            REPLICATED_ENGINE
        } else {
            PLAIN_ENGINE
        };

        let mut query = format!(
            "CREATE TABLE IF NOT EXISTS {} {} ({})\nENGINE = {}\nPRIMARY KEY ({})",
            self.table_with_database(),
            on_cluster,
            descriptions,
            engine,
            ids.join(",")
        );
        if let Some(partition_by) = &self.partition_by {
            query.push_str(&format!(" PARTITION BY ({partition_by})"));
        }
        query.push_str(&format!(" ORDER BY ({})", order.join(",")));
        query
    }
}
