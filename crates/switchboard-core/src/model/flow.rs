// ── Flow domain types ──

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// A traffic flow associated with a switch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowRecord {
    #[serde(default)]
    pub flow_id: Option<String>,
    /// Bandwidth ceiling in kbps (1000x the display unit).
    #[serde(default)]
    pub maximum_bandwidth: u64,
}

/// Accumulated bandwidth of a switch's flows.
///
/// `Zero` is what an empty or failed fetch produces and renders as `0`;
/// `Total` renders with exactly three decimals.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum BandwidthSum {
    #[default]
    Zero,
    Total(f64),
}

impl fmt::Display for BandwidthSum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zero => f.write_str("0"),
            Self::Total(mbps) => write!(f, "{mbps:.3}"),
        }
    }
}

impl Serialize for BandwidthSum {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Zero => serializer.serialize_u8(0),
            Self::Total(_) => serializer.collect_str(self),
        }
    }
}

/// Per-switch aggregate of its flow records.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FlowSummary {
    #[serde(rename = "sumofbandwidth")]
    pub sum_of_bandwidth: BandwidthSum,
    #[serde(rename = "noofflows")]
    pub no_of_flows: usize,
}

impl FlowSummary {
    /// Reduce a switch's flow records. No records means a zero summary.
    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    pub fn from_records(records: &[FlowRecord]) -> Self {
        if records.is_empty() {
            return Self::default();
        }
        let total = records
            .iter()
            .map(|flow| flow.maximum_bandwidth as f64 / 1000.0)
            .sum();
        Self {
            sum_of_bandwidth: BandwidthSum::Total(total),
            no_of_flows: records.len(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn flow(bw: u64) -> FlowRecord {
        FlowRecord {
            flow_id: None,
            maximum_bandwidth: bw,
        }
    }

    #[test]
    fn sums_and_formats_three_decimals() {
        let summary = FlowSummary::from_records(&[flow(1000), flow(2000)]);
        assert_eq!(summary.sum_of_bandwidth.to_string(), "3.000");
        assert_eq!(summary.no_of_flows, 2);
    }

    #[test]
    fn fractional_bandwidth_keeps_precision() {
        let summary = FlowSummary::from_records(&[flow(1500), flow(250)]);
        assert_eq!(summary.sum_of_bandwidth.to_string(), "1.750");
    }

    #[test]
    fn no_records_is_zero_zero() {
        let summary = FlowSummary::from_records(&[]);
        assert_eq!(summary, FlowSummary::default());
        assert_eq!(summary.sum_of_bandwidth.to_string(), "0");
        assert_eq!(summary.no_of_flows, 0);
    }

    #[test]
    fn serializes_like_the_table_side_map() {
        let summary = FlowSummary::from_records(&[flow(1000), flow(2000)]);
        assert_eq!(
            serde_json::to_value(summary).unwrap(),
            serde_json::json!({ "sumofbandwidth": "3.000", "noofflows": 2 })
        );
        assert_eq!(
            serde_json::to_value(FlowSummary::default()).unwrap(),
            serde_json::json!({ "sumofbandwidth": 0, "noofflows": 0 })
        );
    }
}
