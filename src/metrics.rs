// src/metrics.rs
//
// Prometheus wiring for the query layer: series registration, recorder
// install, and the /metrics route.

use axum::{routing::get, Router};
use metrics::{describe_counter, describe_gauge, describe_histogram, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

/// One-time registration of the query-layer series (so they show up on
/// /metrics before the first fetch).
pub(crate) fn describe_query_series() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "query_records_total",
            "Records fetched from upstream sources."
        );
        describe_counter!(
            "query_source_errors_total",
            "Source fetch/parse errors substituted or propagated."
        );
        describe_histogram!(
            "query_fetch_ms",
            "Full working-set fetch time in milliseconds."
        );
        describe_gauge!(
            "query_last_fetch_ts",
            "Unix ts when the working set was last fetched."
        );
        describe_gauge!(
            "query_sources_configured",
            "Number of collection sources in the active config."
        );
    });
}

pub struct QueryMetrics {
    pub handle: PrometheusHandle,
}

impl QueryMetrics {
    /// Install the Prometheus recorder, register the query-layer series,
    /// and publish the configured source count.
    pub fn init(source_count: usize) -> Self {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .expect("prometheus: install recorder");

        describe_query_series();
        gauge!("query_sources_configured").set(source_count as f64);

        Self { handle }
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
