//! Metrics collection and exposition.
//!
//! # Metrics
//! - `smc_queries_total` (counter): registry reads by method, outcome
//! - `smc_transactions_total` (counter): submissions by method, outcome
//! - `smc_rpc_health` (gauge): 1=reachable, 0=unreachable
//!
//! Recording is a no-op until a recorder is installed, so library users
//! who never call [`init_metrics`] pay nothing.

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and HTTP scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_query(method: &'static str, outcome: &'static str) {
    counter!("smc_queries_total", "method" => method, "outcome" => outcome).increment(1);
}

pub fn record_transaction(method: &'static str, outcome: &'static str) {
    counter!("smc_transactions_total", "method" => method, "outcome" => outcome).increment(1);
}

pub fn record_rpc_health(healthy: bool) {
    gauge!("smc_rpc_health").set(if healthy { 1.0 } else { 0.0 });
}
