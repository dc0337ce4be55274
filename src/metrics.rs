//! Statement metrics and tracing spans.
//!
//! With the `metrics` feature every executor call is counted and timed in the
//! global [`METRICS`] registry, which exports in the Prometheus text format.
//! With the `tracing` feature every executor call runs inside a span from
//! [`tracing_helpers`].

#[cfg(feature = "metrics")]
pub use self::prometheus_metrics::{ChormMetrics, METRICS};

#[cfg(feature = "metrics")]
mod prometheus_metrics {
    use once_cell::sync::Lazy;
    use opentelemetry::{
        metrics::{Counter, Histogram, MeterProvider},
        KeyValue,
    };
    use opentelemetry_sdk::metrics::SdkMeterProvider;
    use prometheus::{Registry, TextEncoder};
    use std::time::Duration;

    pub static METRICS: Lazy<ChormMetrics> = Lazy::new(ChormMetrics::init);

    pub struct ChormMetrics {
        registry: Registry,
        _provider: SdkMeterProvider,
        pub statements_total: Counter<u64>,
        pub statement_errors_total: Counter<u64>,
        pub inserted_rows_total: Counter<u64>,
        pub statement_duration: Histogram<f64>,
    }

    impl ChormMetrics {
        pub fn init() -> Self {
            let registry = Registry::new();
            let exporter = opentelemetry_prometheus::exporter()
                .with_registry(registry.clone())
                .build()
                .expect("failed to build prometheus exporter");
            let provider = SdkMeterProvider::builder().with_reader(exporter).build();
            let meter = provider.meter("chorm");

            let statements_total = meter
                .u64_counter("chorm_statements_total")
                .with_description("Statements sent to ClickHouse")
                .build();

            let statement_errors_total = meter
                .u64_counter("chorm_statement_errors_total")
                .with_description("Statements that failed")
                .build();

            let inserted_rows_total = meter
                .u64_counter("chorm_inserted_rows_total")
                .with_description("Rows inserted")
                .build();

            let statement_duration = meter
                .f64_histogram("chorm_statement_duration_seconds")
                .with_description("Duration of statements")
                .build();

            Self {
                registry,
                _provider: provider,
                statements_total,
                statement_errors_total,
                inserted_rows_total,
                statement_duration,
            }
        }

        /// Count and time one statement; `kind` is `create`, `insert`, `select` or `drop`.
        pub fn record_statement(&self, kind: &'static str, elapsed: Duration) {
            let attributes = [KeyValue::new("kind", kind)];
            self.statements_total.add(1, &attributes);
            self.statement_duration.record(elapsed.as_secs_f64(), &attributes);
        }

        pub fn record_error(&self, kind: &'static str) {
            self.statement_errors_total.add(1, &[KeyValue::new("kind", kind)]);
        }

        pub fn record_inserted_rows(&self, rows: usize) {
            self.inserted_rows_total.add(rows as u64, &[]);
        }

        /// Current values in the Prometheus text exposition format.
        pub fn gather_text(&self) -> String {
            TextEncoder::new()
                .encode_to_string(&self.registry.gather())
                .unwrap_or_default()
        }
    }
}

#[cfg(feature = "tracing")]
pub mod tracing_helpers {
    use tracing::Span;

    /// Span around a statement sent with `query` or `command`.
    pub fn execute_query_span(kind: &'static str, sql: &str) -> Span {
        tracing::debug_span!("clickhouse.statement", kind = kind, sql = sql)
    }

    /// Span around an insert call.
    pub fn insert_span(table: &str, rows: usize) -> Span {
        tracing::debug_span!("clickhouse.insert", table = table, rows = rows)
    }
}

#[cfg(all(test, feature = "metrics"))]
mod tests {
    use super::METRICS;
    use std::time::Duration;

    #[test]
    fn test_recorded_statements_are_exported() {
        METRICS.record_statement("select", Duration::from_millis(3));
        METRICS.record_inserted_rows(3);
        let text = METRICS.gather_text();
        assert!(text.contains("chorm_statements_total"), "{text}");
        assert!(text.contains("chorm_inserted_rows_total"), "{text}");
    }
}
