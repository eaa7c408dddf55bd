//! Telemetry module
//!
//! Logging and risk metrics

mod logging;
mod metrics;

pub use logging::{init_logging, LogFormat};
pub use metrics::{publish_risk_metrics, record_rejection, set_gauge, GaugeMetric};

use crate::config::TelemetryConfig;

/// Initialize all telemetry subsystems
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<()> {
    init_logging(&config.log_level, config.log_format)
}
