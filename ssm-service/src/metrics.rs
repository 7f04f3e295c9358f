//! Prometheus metrics for the SSM service.
//!
//! Provides counters and histograms for observability.

use once_cell::sync::Lazy;
use prometheus::{register_counter_vec, register_histogram_vec, CounterVec, HistogramVec};

/// Crypto-service operations counter.
pub static SSM_OPERATIONS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "ssm_operations_total",
        "Total number of crypto-service operations",
        &["operation", "outcome"]
    )
    .expect("Failed to register ssm_operations metric")
});

/// gRPC method latency histogram.
pub static GRPC_LATENCY: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "ssm_grpc_latency_seconds",
        "gRPC method latency in seconds",
        &["method"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
    )
    .expect("Failed to register grpc_latency metric")
});

/// Record a completed operation with its outcome (`ok` or an error label).
pub fn record_operation(operation: &str, outcome: &str) {
    SSM_OPERATIONS
        .with_label_values(&[operation, outcome])
        .inc();
}

/// Record gRPC method latency.
pub fn record_grpc_latency(method: &str, duration_secs: f64) {
    GRPC_LATENCY
        .with_label_values(&[method])
        .observe(duration_secs);
}
