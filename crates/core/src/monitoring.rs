//! Monitoring rate derivation
//!
//! Live VM stats report network and disk counters cumulatively; the charts
//! want per-second rates. Rates are derived client-side from consecutive
//! samples. A counter reset or a non-positive time delta yields a zero rate
//! for that interval instead of a negative or infinite value.

use jiff::Timestamp;

/// One observation of a cumulative counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterSample {
    /// When the sample was taken.
    pub at: Timestamp,
    /// The cumulative counter value, e.g. total bytes received.
    pub value: u64,
}

/// A derived per-second rate at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatePoint {
    /// The timestamp of the later sample of the pair.
    pub at: Timestamp,
    pub per_second: f64,
}

/// The rate between two consecutive counter samples.
///
/// Returns 0.0 when time did not advance or the counter went backwards
/// (reset).
#[must_use]
pub fn rate_between(prev: CounterSample, next: CounterSample) -> f64 {
    let elapsed = next.at.duration_since(prev.at).as_secs_f64();

    if elapsed <= 0.0 || next.value < prev.value {
        return 0.0;
    }

    let delta = next.value - prev.value;

    // f64 holds counter deltas of this size exactly enough for charting.
    #[expect(
        clippy::cast_precision_loss,
        reason = "chart rates do not need integer precision"
    )]
    let delta = delta as f64;

    delta / elapsed
}

/// Derive the per-second rate series for an ordered run of counter samples.
///
/// The series has one point per consecutive pair, stamped at the later
/// sample; fewer than two samples yield an empty series.
#[must_use]
pub fn rates(samples: &[CounterSample]) -> Vec<RatePoint> {
    samples
        .windows(2)
        .filter_map(|pair| match pair {
            [prev, next] => Some(RatePoint {
                at: next.at,
                per_second: rate_between(*prev, *next),
            }),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn sample(seconds: i64, value: u64) -> CounterSample {
        CounterSample {
            at: Timestamp::new(seconds, 0).expect("test timestamp"),
            value,
        }
    }

    #[test]
    fn rate_between_consecutive_samples() {
        let rate = rate_between(sample(0, 1_000), sample(2, 5_000));

        assert!((rate - 2_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn counter_reset_yields_zero() {
        let rate = rate_between(sample(0, 5_000), sample(2, 100));

        assert!((rate - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn non_advancing_clock_yields_zero() {
        let rate = rate_between(sample(2, 1_000), sample(2, 5_000));

        assert!((rate - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn series_has_one_point_per_pair() -> TestResult {
        let series = rates(&[sample(0, 0), sample(2, 4_000), sample(4, 4_000)]);

        assert_eq!(series.len(), 2);

        let per_second: Vec<f64> = series.iter().map(|point| point.per_second).collect();

        assert!((per_second.first().copied().unwrap_or_default() - 2_000.0).abs() < f64::EPSILON);
        assert!((per_second.get(1).copied().unwrap_or_default() - 0.0).abs() < f64::EPSILON);

        Ok(())
    }

    #[test]
    fn short_series_is_empty() {
        assert!(rates(&[]).is_empty());
        assert!(rates(&[sample(0, 0)]).is_empty());
    }
}
