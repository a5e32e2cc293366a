// Wall clock and time-to-index resolution
use chrono::{DateTime, FixedOffset, Local, Timelike};

use super::units::TICK_SECONDS;

/// Source of local wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Seconds elapsed since local midnight.
pub fn seconds_today<T: Timelike>(now: &T) -> u32 {
    now.hour() * 3600 + now.minute() * 60 + now.second()
}

/// Maps the wall clock onto the 5-second bucket of a day-long series.
///
/// Out-of-range buckets (the last seconds of the day, or feeds shorter than
/// a day) clamp to the last sample instead of failing.
pub fn resolve_index<T: Timelike>(now: &T, series_len: usize) -> usize {
    let raw_index = (seconds_today(now) / TICK_SECONDS) as usize;
    raw_index.min(series_len.saturating_sub(1))
}

/// `HH:MM:SS` for an offset in seconds from midnight.
pub fn format_time_from_seconds(seconds: u32) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}
