//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Queries and submissions produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → Log aggregation (stderr)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Structured fields, never key material
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
