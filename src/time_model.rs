use std::fmt;
use std::ops::Sub;
use crate::errors::TimeError;

// @module: Tick-based timestamp normalization

/// Number of microseconds in one second, the fixed-point base for
/// [`NormalizedTime`].
const MICROS_PER_SECOND: u64 = 1_000_000;

/// A track-independent point in time, stored as unsigned microseconds.
///
/// Cues from different tracks may carry different tick rates; all cross-track
/// comparisons go through this type so raw tick counts are never compared
/// across differing rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct NormalizedTime(u64);

impl NormalizedTime {
    /// Build directly from microseconds - used by tests and rendering
    pub fn from_micros(micros: u64) -> Self {
        NormalizedTime(micros)
    }

    /// Build from whole milliseconds
    pub fn from_millis(millis: u64) -> Self {
        NormalizedTime(millis * 1_000)
    }

    // @creates: Normalized time from a tick count and its tick rate
    // @validates: Tick rate must be non-zero and the result must fit u64 micros
    pub fn normalize(tick_count: u64, tick_rate: u64) -> Result<Self, TimeError> {
        if tick_rate == 0 {
            return Err(TimeError::InvalidTimeInput { tick_count, tick_rate });
        }

        // Whole computation in u128 so a large tick count at a low tick rate
        // cannot overflow; rounding is half-up at the microsecond. A result
        // past u64 microseconds comes from a nonsense timestamp and fails
        // like any other invalid time input, scoped to the one cue.
        let micros = (tick_count as u128 * MICROS_PER_SECOND as u128 + tick_rate as u128 / 2)
            / tick_rate as u128;

        u64::try_from(micros)
            .map(NormalizedTime)
            .map_err(|_| TimeError::InvalidTimeInput { tick_count, tick_rate })
    }

    /// Absolute distance between two normalized times, regardless of argument
    /// order
    pub fn difference(a: NormalizedTime, b: NormalizedTime) -> NormalizedTime {
        NormalizedTime(a.0.abs_diff(b.0))
    }

    /// Build from a non-negative seconds value (used for gap thresholds)
    pub fn from_seconds_f64(seconds: f64) -> Self {
        NormalizedTime((seconds * MICROS_PER_SECOND as f64).round() as u64)
    }

    /// Value in microseconds
    pub fn as_micros(&self) -> u64 {
        self.0
    }

    /// Value in whole milliseconds, rounded half-up
    pub fn as_millis(&self) -> u64 {
        (self.0 + 500) / 1_000
    }

    /// Value in seconds as a float - for logging only, never for ordering
    pub fn as_seconds_f64(&self) -> f64 {
        self.0 as f64 / MICROS_PER_SECOND as f64
    }

    /// Format as an SRT timestamp (HH:MM:SS,mmm)
    pub fn format_timestamp(&self) -> String {
        let ms = self.as_millis();
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }
}

impl Sub for NormalizedTime {
    type Output = NormalizedTime;

    fn sub(self, rhs: Self) -> Self::Output {
        NormalizedTime(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Display for NormalizedTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.format_timestamp())
    }
}
