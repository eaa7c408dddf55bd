//! Risk metrics published through the `metrics` facade
//!
//! No recorder is installed by this crate; without one the calls are no-ops.

use ::metrics::{counter, gauge};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::risk::RiskMetrics;

/// Gauge metric types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GaugeMetric {
    /// Summed risk amount of open positions
    TotalRiskExposure,
    /// Open position count
    OpenPositions,
    /// Exposure / total risk limit
    RiskUtilization,
}

impl GaugeMetric {
    /// Exported metric name
    pub fn name(self) -> &'static str {
        match self {
            GaugeMetric::TotalRiskExposure => "riskcore_total_risk_exposure",
            GaugeMetric::OpenPositions => "riskcore_open_positions",
            GaugeMetric::RiskUtilization => "riskcore_risk_utilization",
        }
    }
}

const ADMISSION_REJECTIONS: &str = "riskcore_admission_rejections";

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    tracing::trace!(metric = metric.name(), value, "Setting gauge");
    gauge!(metric.name()).set(value);
}

/// Publish a risk snapshot as gauges
pub fn publish_risk_metrics(metrics: &RiskMetrics) {
    set_gauge(
        GaugeMetric::TotalRiskExposure,
        to_f64(metrics.total_risk_exposure),
    );
    set_gauge(
        GaugeMetric::OpenPositions,
        metrics.open_positions_count as f64,
    );
    set_gauge(GaugeMetric::RiskUtilization, to_f64(metrics.risk_utilization));
}

/// Count a rejected admission, labelled by the failed gate
pub fn record_rejection(reason: &'static str) {
    counter!(ADMISSION_REJECTIONS, "reason" => reason).increment(1);
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}
