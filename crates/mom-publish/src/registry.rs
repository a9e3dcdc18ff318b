//! Gauge registry built from one aggregation run.

use mom_core::error::{MomError, Result};
use mom_core::models::{AggregationResult, StatusKey};
use prometheus::{Encoder, Gauge, GaugeVec, Opts, Registry, TextEncoder};

/// Global totals exposed as scalar gauges.
///
/// `total` is aggregated but not published as its own gauge.
pub const PUBLISHED_TOTALS: [StatusKey; 6] = [
    StatusKey::Local,
    StatusKey::Modified,
    StatusKey::NeedsMerge,
    StatusKey::NeedsSync,
    StatusKey::Repackaged,
    StatusKey::Unmodified,
];

fn publish_err(e: prometheus::Error) -> MomError {
    MomError::Publish(e.to_string())
}

/// A fresh registry holding the merge gauges for one team.
pub struct MergeMetrics {
    registry: Registry,
}

impl MergeMetrics {
    /// Build the gauges for `team_name` from `result`.
    ///
    /// Registers `{team}_mom{component,status}` for every per-component value
    /// and `{team}_mom_<status>_total` for each of [`PUBLISHED_TOTALS`].
    pub fn build(team_name: &str, result: &AggregationResult) -> Result<Self> {
        let registry = Registry::new();

        let by_status = GaugeVec::new(
            Opts::new(
                format!("{team_name}_mom"),
                "merge-o-matic package counts by component and status",
            ),
            &["component", "status"],
        )
        .map_err(publish_err)?;
        for (component, counters) in &result.by_component {
            for (status, count) in counters.iter() {
                by_status
                    .with_label_values(&[component.as_str(), status.as_str()])
                    .set(count as f64);
            }
        }
        registry
            .register(Box::new(by_status))
            .map_err(publish_err)?;

        for status in PUBLISHED_TOTALS {
            let gauge = Gauge::with_opts(Opts::new(
                format!("{team_name}_mom_{}_total", status.metric_name()),
                format!("merge-o-matic total of {status} packages"),
            ))
            .map_err(publish_err)?;
            gauge.set(result.totals.get(status).unwrap_or(0) as f64);
            registry.register(Box::new(gauge)).map_err(publish_err)?;
        }

        Ok(Self { registry })
    }

    /// Encode every gauge in the Prometheus text exposition format.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(publish_err)?;
        Ok(buffer)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}
