use chrono::DateTime;

use crate::activity::config::BucketingConfig;
use crate::models::ChartBucket;

/// Collapse a per-second activity signal into chart buckets.
///
/// The width comes from `total_secs`; the slices walk the whole signal and
/// the last one may be shorter than the width. `total_secs == 0` yields no
/// buckets.
pub fn bucket_activity(
    signal: &[bool],
    range_start_millis: i64,
    total_secs: u64,
    config: &BucketingConfig,
) -> Vec<ChartBucket> {
    if total_secs == 0 || signal.is_empty() {
        return Vec::new();
    }

    let width = config.width_for(total_secs) as usize;

    signal
        .chunks(width)
        .enumerate()
        .map(|(chunk_idx, slice)| {
            let start_idx = chunk_idx * width;
            let end_idx = start_idx + slice.len();
            let active_count = slice.iter().filter(|active| **active).count() as u64;

            let start_millis = range_start_millis + start_idx as i64 * 1000;
            let end_millis = range_start_millis + end_idx as i64 * 1000;

            ChartBucket {
                start_millis,
                end_millis,
                active_count,
                inactive_count: slice.len() as u64 - active_count,
                width: slice.len() as u64,
                label: bucket_label(start_millis, end_millis),
            }
        })
        .collect()
}

/// Bucket a whole signal, taking its length as the total duration.
pub fn bucket_signal(
    signal: &[bool],
    range_start_millis: i64,
    config: &BucketingConfig,
) -> Vec<ChartBucket> {
    bucket_activity(signal, range_start_millis, signal.len() as u64, config)
}

/// Upper bound of the chart's y-axis: the widest bucket, never below the floor.
pub fn axis_max(buckets: &[ChartBucket], config: &BucketingConfig) -> u64 {
    buckets
        .iter()
        .map(|bucket| bucket.width)
        .max()
        .unwrap_or(0)
        .max(config.min_axis_value)
}

fn bucket_label(start_millis: i64, end_millis: i64) -> String {
    format!("{} - {}", clock_time(start_millis), clock_time(end_millis))
}

fn clock_time(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> BucketingConfig {
        BucketingConfig::default()
    }

    #[test]
    fn test_empty_signal_has_no_buckets() {
        assert!(bucket_signal(&[], 0, &cfg()).is_empty());
        assert!(bucket_activity(&[true, false], 0, 0, &cfg()).is_empty());
        assert_eq!(axis_max(&[], &cfg()), 10);
    }

    #[test]
    fn test_ten_second_signal_single_bucket() {
        let signal = [
            true, true, false, true, false, true, false, true, false, true,
        ];
        let buckets = bucket_signal(&signal, 0, &cfg());

        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].active_count, 6);
        assert_eq!(buckets[0].inactive_count, 4);
        assert_eq!(buckets[0].width, 10);
        assert_eq!(buckets[0].start_millis, 0);
        assert_eq!(buckets[0].end_millis, 10_000);
        assert_eq!(buckets[0].label, "00:00:00 - 00:00:10");
    }

    #[test]
    fn test_ninety_seconds_in_thirty_second_buckets() {
        let signal = vec![true; 90];
        let buckets = bucket_signal(&signal, 1_000_000, &cfg());

        assert_eq!(buckets.len(), 3);
        let boundaries: Vec<i64> = buckets.iter().map(|b| b.start_millis).collect();
        assert_eq!(boundaries, vec![1_000_000, 1_030_000, 1_060_000]);
        assert_eq!(buckets[2].end_millis, 1_090_000);
        for bucket in &buckets {
            assert_eq!(bucket.width, 30);
            assert_eq!(bucket.active_count, 30);
            assert_eq!(bucket.inactive_count, 0);
        }
        assert_eq!(axis_max(&buckets, &cfg()), 30);
    }

    #[test]
    fn test_partial_final_bucket() {
        let signal: Vec<bool> = (0..45).map(|i| i % 3 == 0).collect();
        let buckets = bucket_signal(&signal, 0, &cfg());

        assert_eq!(buckets.len(), 5);
        assert_eq!(buckets[4].width, 5);
        assert_eq!(buckets[4].start_millis, 40_000);
        assert_eq!(buckets[4].end_millis, 45_000);
    }

    #[test]
    fn test_long_signal_uses_minute_buckets() {
        let signal = vec![false; 1200];
        let buckets = bucket_signal(&signal, 0, &cfg());

        assert_eq!(buckets.len(), 20);
        assert!(buckets.iter().all(|b| b.width == 60 && b.inactive_count == 60));
    }

    #[test]
    fn test_counts_and_widths_cover_signal() {
        for len in [1usize, 9, 61, 299, 301, 1799, 1801, 4000] {
            let signal: Vec<bool> = (0..len).map(|i| i % 7 < 3).collect();
            let buckets = bucket_signal(&signal, 0, &cfg());

            let counted: u64 = buckets.iter().map(|b| b.active_count + b.inactive_count).sum();
            let widths: u64 = buckets.iter().map(|b| b.width).sum();
            let active: u64 = buckets.iter().map(|b| b.active_count).sum();

            assert_eq!(counted, len as u64);
            assert_eq!(widths, len as u64);
            assert_eq!(active, signal.iter().filter(|a| **a).count() as u64);
        }
    }

    #[test]
    fn test_forty_second_range_boundaries() {
        let t0: i64 = 1_700_000_000;
        let signal = vec![true; 40];
        let buckets = bucket_signal(&signal, t0 * 1000, &cfg());

        assert_eq!(buckets.first().unwrap().start_millis, t0 * 1000);
        assert_eq!(buckets.last().unwrap().end_millis, (t0 + 40) * 1000);
    }

    #[test]
    fn test_recomputation_is_identical() {
        let signal: Vec<bool> = (0..333).map(|i| i % 2 == 0).collect();
        let first = bucket_signal(&signal, 42_000, &cfg());
        let second = bucket_signal(&signal, 42_000, &cfg());
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_width_follows_total_not_signal_length() {
        // A short partial signal for a long range keeps the range's bucket width.
        let signal = vec![true; 100];
        let buckets = bucket_activity(&signal, 0, 3600, &cfg());
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].width, 100);
        assert_eq!(axis_max(&buckets, &cfg()), 100);
    }
}
