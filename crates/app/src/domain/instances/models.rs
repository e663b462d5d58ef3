//! Instance endpoint models.

use jiff::Timestamp;
use serde::Deserialize;
use stratus::monitoring::{CounterSample, rate_between};

/// A remote console session issued by the backend.
///
/// The WebSocket URL is handed to the external viewer; this client never
/// speaks the framebuffer protocol itself.
#[derive(Debug, Clone, Deserialize)]
pub struct ConsoleSession {
    pub ws_url: String,
    #[serde(default)]
    pub vnc_port: Option<u16>,
}

/// A generated SSH key pair. The private half is shown to the user once and
/// never stored by this client.
#[derive(Debug, Clone, Deserialize)]
pub struct SshKeyPair {
    pub public_key: String,
    pub private_key: String,
}

/// Provisioned hardware of an instance.
#[derive(Debug, Clone, Deserialize)]
pub struct Hardware {
    #[serde(default)]
    pub cpu_cores: u32,
    #[serde(default)]
    pub memory_mb: u64,
    #[serde(default)]
    pub disk_gb: u64,
}

/// One point of the historical metrics range.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricPoint {
    pub at: Timestamp,
    #[serde(default)]
    pub cpu_percent: f64,
    #[serde(default)]
    pub memory_used_mb: f64,
    #[serde(default)]
    pub net_rx_bytes: u64,
    #[serde(default)]
    pub net_tx_bytes: u64,
    #[serde(default)]
    pub disk_read_bytes: u64,
    #[serde(default)]
    pub disk_write_bytes: u64,
}

/// One live sample. Network and disk counters are cumulative; gauges pass
/// through as-is.
#[derive(Debug, Clone, Deserialize)]
pub struct LiveStats {
    pub at: Timestamp,
    #[serde(default)]
    pub cpu_percent: f64,
    #[serde(default)]
    pub memory_used_mb: f64,
    #[serde(default)]
    pub memory_total_mb: f64,
    #[serde(default)]
    pub net_rx_bytes: u64,
    #[serde(default)]
    pub net_tx_bytes: u64,
    #[serde(default)]
    pub disk_read_bytes: u64,
    #[serde(default)]
    pub disk_write_bytes: u64,
}

/// Per-second rates derived from two consecutive live samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveRates {
    pub at: Timestamp,
    pub cpu_percent: f64,
    pub memory_used_mb: f64,
    pub net_rx_per_sec: f64,
    pub net_tx_per_sec: f64,
    pub disk_read_per_sec: f64,
    pub disk_write_per_sec: f64,
}

impl LiveRates {
    /// Derive rates between two samples; counter resets and non-advancing
    /// clocks yield zero rates.
    #[must_use]
    pub fn between(prev: &LiveStats, next: &LiveStats) -> Self {
        let counter = |prev_value: u64, next_value: u64| {
            rate_between(
                CounterSample {
                    at: prev.at,
                    value: prev_value,
                },
                CounterSample {
                    at: next.at,
                    value: next_value,
                },
            )
        };

        Self {
            at: next.at,
            cpu_percent: next.cpu_percent,
            memory_used_mb: next.memory_used_mb,
            net_rx_per_sec: counter(prev.net_rx_bytes, next.net_rx_bytes),
            net_tx_per_sec: counter(prev.net_tx_bytes, next.net_tx_bytes),
            disk_read_per_sec: counter(prev.disk_read_bytes, next.disk_read_bytes),
            disk_write_per_sec: counter(prev.disk_write_bytes, next.disk_write_bytes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(seconds: i64, rx: u64) -> LiveStats {
        LiveStats {
            at: Timestamp::new(seconds, 0).expect("test timestamp"),
            cpu_percent: 12.5,
            memory_used_mb: 512.0,
            memory_total_mb: 2048.0,
            net_rx_bytes: rx,
            net_tx_bytes: 0,
            disk_read_bytes: 0,
            disk_write_bytes: 0,
        }
    }

    #[test]
    fn counters_become_rates_and_gauges_pass_through() {
        let rates = LiveRates::between(&sample(0, 1_000), &sample(2, 9_000));

        assert!((rates.net_rx_per_sec - 4_000.0).abs() < f64::EPSILON);
        assert!((rates.cpu_percent - 12.5).abs() < f64::EPSILON);
        assert!((rates.memory_used_mb - 512.0).abs() < f64::EPSILON);
    }

    #[test]
    fn counter_resets_yield_zero_rates() {
        let rates = LiveRates::between(&sample(0, 9_000), &sample(2, 100));

        assert!((rates.net_rx_per_sec - 0.0).abs() < f64::EPSILON);
    }
}
