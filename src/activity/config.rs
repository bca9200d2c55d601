/// Bucket width selection for the activity chart.
#[derive(Debug, Clone)]
pub struct BucketingConfig {
    /// `(max total seconds, bucket width seconds)`, ascending by the first field.
    pub tiers: Vec<(u64, u64)>,

    /// Width used when the total exceeds every tier.
    pub fallback_width_secs: u64,

    /// Lower bound for the chart's y-axis.
    pub min_axis_value: u64,
}

impl Default for BucketingConfig {
    fn default() -> Self {
        Self {
            tiers: vec![(60, 10), (300, 30), (1800, 60)],
            fallback_width_secs: 300,
            min_axis_value: 10,
        }
    }
}

impl BucketingConfig {
    /// Bucket width in seconds for a signal lasting `total_secs`.
    pub fn width_for(&self, total_secs: u64) -> u64 {
        self.tiers
            .iter()
            .find(|(max_total, _)| total_secs <= *max_total)
            .map(|(_, width)| *width)
            .unwrap_or(self.fallback_width_secs)
            .max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_tiers() {
        let config = BucketingConfig::default();
        assert_eq!(config.width_for(1), 10);
        assert_eq!(config.width_for(60), 10);
        assert_eq!(config.width_for(61), 30);
        assert_eq!(config.width_for(300), 30);
        assert_eq!(config.width_for(1200), 60);
        assert_eq!(config.width_for(1800), 60);
        assert_eq!(config.width_for(1801), 300);
        assert_eq!(config.width_for(86_400), 300);
    }

    #[test]
    fn test_width_is_monotonic() {
        let config = BucketingConfig::default();
        let mut previous = 0;
        for total in 0..4000 {
            let width = config.width_for(total);
            assert!(width >= previous, "width shrank at {total}s");
            previous = width;
        }
    }
}
