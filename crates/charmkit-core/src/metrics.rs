//! Charm metrics schema (`metrics.yaml`)

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::error::{CoreError, Result};

/// Metric name reserved for the controller-reported unit count
pub const BUILTIN_UNITS_METRIC: &str = "juju-units";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    #[serde(default, deserialize_with = "bare_metrics")]
    pub metrics: BTreeMap<String, Metric>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    /// Absent only for the builtin unit metric
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub metric_type: Option<MetricType>,

    #[serde(default)]
    pub description: String,
}

/// How a metric's values are aggregated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricType {
    /// Point-in-time reading
    Gauge,
    /// Ever-increasing total
    Absolute,
}

/// Allows `juju-units:` with no body
fn bare_metrics<'de, D>(
    deserializer: D,
) -> std::result::Result<BTreeMap<String, Metric>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, Option<Metric>>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(name, metric)| (name, metric.unwrap_or_default()))
        .collect())
}

impl Metrics {
    /// Parse and check `metrics.yaml` content
    pub fn parse(content: &[u8]) -> Result<Self> {
        let metrics: Metrics = serde_yaml::from_slice(content)?;

        for (name, metric) in &metrics.metrics {
            let builtin = name == BUILTIN_UNITS_METRIC;
            match (&metric.metric_type, builtin) {
                (None, false) => {
                    return Err(CoreError::InvalidCharm {
                        message: format!("metrics.yaml: metric {name:?} has no type"),
                    });
                }
                (Some(_), true) => {
                    return Err(CoreError::InvalidCharm {
                        message: format!(
                            "metrics.yaml: builtin metric {name:?} cannot declare a type"
                        ),
                    });
                }
                _ => {}
            }
        }

        Ok(metrics)
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}
