//! Observability for the session gateway.
//!
//! Metrics are emitted through the `metrics` facade; the embedding service
//! installs the recorder (Prometheus or otherwise).

pub mod metrics;
