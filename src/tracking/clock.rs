/// Detections per second produced by the upstream tracker.
pub const DEFAULT_SAMPLE_RATE_HZ: u32 = 15;

/// Sample index reached after `offset_secs` of playback.
///
/// `floor(offset_secs * sample_rate)` clamped to `[0, sequence_len]`. Negative,
/// NaN and overshooting offsets clamp instead of failing: players report times
/// slightly past the tracked range.
pub fn sample_index_for_offset(offset_secs: f64, sample_rate: f64, sequence_len: usize) -> usize {
    let raw = (offset_secs * sample_rate).floor();
    if raw.is_nan() || raw <= 0.0 {
        return 0;
    }
    if raw >= sequence_len as f64 {
        return sequence_len;
    }
    raw as usize
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleRateClock {
    rate_hz: u32,
}

impl SampleRateClock {
    pub fn new(rate_hz: u32) -> Self {
        Self { rate_hz }
    }

    pub fn rate_hz(&self) -> u32 {
        self.rate_hz
    }

    pub fn index_for(&self, offset_secs: f64, sequence_len: usize) -> usize {
        sample_index_for_offset(offset_secs, self.rate_hz as f64, sequence_len)
    }

    /// Elapsed seconds at which `index` is first revealed.
    pub fn offset_for(&self, index: usize) -> f64 {
        if self.rate_hz == 0 {
            return 0.0;
        }
        index as f64 / self.rate_hz as f64
    }
}

impl Default for SampleRateClock {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE_HZ)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_of_offset_times_rate() {
        assert_eq!(sample_index_for_offset(0.0, 15.0, 100), 0);
        assert_eq!(sample_index_for_offset(1.0, 15.0, 100), 15);
        assert_eq!(sample_index_for_offset(2.99, 15.0, 100), 44);
    }

    #[test]
    fn test_negative_offset_clamps_to_zero() {
        assert_eq!(sample_index_for_offset(-5.0, 15.0, 100), 0);
        assert_eq!(sample_index_for_offset(f64::NAN, 15.0, 100), 0);
    }

    #[test]
    fn test_overshoot_clamps_to_length() {
        assert_eq!(sample_index_for_offset(1_000.0, 15.0, 100), 100);
        assert_eq!(sample_index_for_offset(f64::INFINITY, 15.0, 100), 100);
        assert_eq!(sample_index_for_offset(3.0, 15.0, 0), 0);
    }

    #[test]
    fn test_clock_round_trips_whole_seconds() {
        let clock = SampleRateClock::default();
        assert_eq!(clock.rate_hz(), 15);
        assert_eq!(clock.index_for(4.0, 1_000), 60);
        assert_eq!(clock.offset_for(60), 4.0);
        assert_eq!(SampleRateClock::new(0).offset_for(10), 0.0);
    }
}
