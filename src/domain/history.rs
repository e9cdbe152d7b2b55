//! History - Retention and Dedup-by-Change Compaction
//!
//! The history is kept as a run-length style series: the first sample, every
//! sample at which some reading changed, and the most recent sample.

use crate::domain::sample::Sample;

/// Compact a time-ordered history
///
/// 1. Drops every sample older than `now_ms - retention_ms`.
/// 2. Keeps the first survivor, keeps an interior sample only when its
///    readings differ from the last kept sample, and always keeps the last
///    survivor.
pub fn compact(history: &[Sample], now_ms: i64, retention_ms: i64) -> Vec<Sample> {
    let horizon = now_ms.saturating_sub(retention_ms);
    let retained: Vec<Sample> = history
        .iter()
        .filter(|sample| sample.timestamp >= horizon)
        .copied()
        .collect();

    let [first, interior @ .., last] = retained.as_slice() else {
        return retained;
    };

    let mut compacted = Vec::with_capacity(retained.len());
    let mut kept = *first;
    compacted.push(kept);
    for sample in interior {
        if !kept.same_readings(sample) {
            kept = *sample;
            compacted.push(kept);
        }
    }
    compacted.push(*last);
    compacted
}

/// Samples collected within the last `window_ms`
pub fn recent(history: &[Sample], now_ms: i64, window_ms: i64) -> &[Sample] {
    let horizon = now_ms.saturating_sub(window_ms);
    let start = history.partition_point(|sample| sample.timestamp < horizon);
    &history[start..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const HOUR: i64 = 60 * 60 * 1000;

    fn sample(timestamp: i64, wind_avg: f64) -> Sample {
        Sample {
            timestamp,
            wind_avg,
            wind_degrees: 90.0,
            wind_min: 2.0,
            wind_max: 8.0,
            temperature: 10.0,
        }
    }

    fn timestamps(samples: &[Sample]) -> Vec<i64> {
        samples.iter().map(|s| s.timestamp).collect()
    }

    #[test]
    fn test_empty_and_single_unchanged() {
        assert!(compact(&[], 100, HOUR).is_empty());
        let single = [sample(100, 3.0)];
        assert_eq!(timestamps(&compact(&single, 100, HOUR)), vec![100]);
    }

    #[test]
    fn test_identical_run_keeps_first_and_last() {
        let history = [sample(1, 3.0), sample(2, 3.0), sample(3, 3.0), sample(4, 3.0)];
        assert_eq!(timestamps(&compact(&history, 4, HOUR)), vec![1, 4]);
    }

    #[test]
    fn test_changes_are_kept() {
        let history = [
            sample(1, 3.0),
            sample(2, 3.0),
            sample(3, 4.0),
            sample(4, 4.0),
            sample(5, 3.0),
            sample(6, 3.0),
        ];
        assert_eq!(timestamps(&compact(&history, 6, HOUR)), vec![1, 3, 5, 6]);
    }

    #[test]
    fn test_return_to_earlier_value_is_a_change() {
        let history = [
            sample(1, 3.0),
            sample(2, 5.0),
            sample(3, 5.0),
            sample(4, 3.0),
            sample(5, 3.0),
            sample(6, 3.0),
        ];
        assert_eq!(timestamps(&compact(&history, 6, HOUR)), vec![1, 2, 4, 6]);
    }

    #[test]
    fn test_missing_readings_compare_equal() {
        let history = [
            Sample::empty(1),
            Sample::empty(2),
            Sample::empty(3),
        ];
        assert_eq!(timestamps(&compact(&history, 3, HOUR)), vec![1, 3]);
    }

    #[test]
    fn test_retention_drops_old_samples() {
        let now = 30 * HOUR;
        let history = [
            sample(now - 25 * HOUR, 1.0),
            sample(now - 24 * HOUR, 2.0),
            sample(now - HOUR, 3.0),
            sample(now, 4.0),
        ];
        let compacted = compact(&history, now, 24 * HOUR);
        assert_eq!(
            timestamps(&compacted),
            vec![now - 24 * HOUR, now - HOUR, now]
        );
    }

    #[test]
    fn test_retention_can_empty_history() {
        let history = [sample(1, 1.0), sample(2, 2.0)];
        assert!(compact(&history, 10 * HOUR, HOUR).is_empty());
    }

    #[test]
    fn test_recent_window() {
        let history = [sample(HOUR, 1.0), sample(2 * HOUR, 2.0), sample(3 * HOUR, 3.0)];
        let window = recent(&history, 3 * HOUR, HOUR);
        assert_eq!(timestamps(window), vec![2 * HOUR, 3 * HOUR]);
        assert!(recent(&history, 10 * HOUR, HOUR).is_empty());
    }

    fn arb_history() -> impl Strategy<Value = Vec<Sample>> {
        // Few distinct values so runs of equal readings are common
        let reading = prop_oneof![Just(f64::NAN), (0u8..3).prop_map(f64::from)];
        prop::collection::vec((1i64..5_000, reading.clone(), reading), 0..40).prop_map(
            |steps| {
                let mut timestamp = 0;
                steps
                    .into_iter()
                    .map(|(step, wind_avg, temperature)| {
                        timestamp += step;
                        Sample {
                            temperature,
                            ..sample(timestamp, wind_avg)
                        }
                    })
                    .collect()
            },
        )
    }

    fn same(a: &[Sample], b: &[Sample]) -> bool {
        a.len() == b.len()
            && a.iter()
                .zip(b)
                .all(|(x, y)| x.timestamp == y.timestamp && x.same_readings(y))
    }

    proptest! {
        #[test]
        fn prop_idempotent(history in arb_history(), now in 0i64..200_000, retention in 0i64..200_000) {
            let once = compact(&history, now, retention);
            let twice = compact(&once, now, retention);
            prop_assert!(same(&once, &twice));
        }

        #[test]
        fn prop_keeps_first_and_last(history in arb_history()) {
            let now = history.last().map_or(0, |s| s.timestamp);
            let compacted = compact(&history, now, i64::MAX / 2);
            if let (Some(first), Some(last)) = (history.first(), history.last()) {
                prop_assert_eq!(compacted.first().map(|s| s.timestamp), Some(first.timestamp));
                prop_assert_eq!(compacted.last().map(|s| s.timestamp), Some(last.timestamp));
            } else {
                prop_assert!(compacted.is_empty());
            }
        }

        #[test]
        fn prop_no_equal_neighbours_in_interior(history in arb_history()) {
            let now = history.last().map_or(0, |s| s.timestamp);
            let compacted = compact(&history, now, i64::MAX / 2);
            let kept_without_last = compacted.len().saturating_sub(1);
            for pair in compacted[..kept_without_last].windows(2) {
                prop_assert!(!pair[0].same_readings(&pair[1]));
            }
        }

        #[test]
        fn prop_retention_horizon(history in arb_history(), now in 0i64..200_000, retention in 0i64..200_000) {
            let compacted = compact(&history, now, retention);
            prop_assert!(compacted.iter().all(|s| s.timestamp >= now - retention));
        }

        #[test]
        fn prop_output_is_ordered_subsequence(history in arb_history(), now in 0i64..200_000) {
            let compacted = compact(&history, now, 100_000);
            prop_assert!(compacted.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
            let source: Vec<i64> = history.iter().map(|s| s.timestamp).collect();
            prop_assert!(compacted.iter().all(|s| source.contains(&s.timestamp)));
        }
    }
}
