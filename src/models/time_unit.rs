//! Wall-clock granularity used to measure gaps between attempts.
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

/// A fixed-length unit of wall-clock time.
///
/// Timestamps carry no timezone, so a day is always 24 hours and a week 7 days.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Nanosecond,
    Microsecond,
    Millisecond,
    Second,
    Minute,
    Hour,
    #[default]
    Day,
    Week,
}

impl TimeUnit {
    /// Length of one unit in nanoseconds.
    pub fn nanoseconds(self) -> i128 {
        match self {
            TimeUnit::Nanosecond => 1,
            TimeUnit::Microsecond => 1_000,
            TimeUnit::Millisecond => 1_000_000,
            TimeUnit::Second => 1_000_000_000,
            TimeUnit::Minute => 60 * 1_000_000_000,
            TimeUnit::Hour => 3_600 * 1_000_000_000,
            TimeUnit::Day => 86_400 * 1_000_000_000,
            TimeUnit::Week => 604_800 * 1_000_000_000,
        }
    }

    /// Expresses `delta` as a fractional number of this unit.
    ///
    /// Whole units are counted in integer nanoseconds, so a gap of exactly `n` units
    /// always totals `n.0`. Only the remainder goes through a float division.
    pub fn total(self, delta: TimeDelta) -> f64 {
        let nanos = i128::from(delta.num_seconds()) * 1_000_000_000
            + i128::from(delta.subsec_nanos());
        let unit = self.nanoseconds();
        (nanos / unit) as f64 + (nanos % unit) as f64 / unit as f64
    }

    /// A duration of `count` whole units, or `None` if it does not fit in a `TimeDelta`.
    pub fn duration(self, count: i64) -> Option<TimeDelta> {
        match self {
            TimeUnit::Nanosecond => Some(TimeDelta::nanoseconds(count)),
            TimeUnit::Microsecond => Some(TimeDelta::microseconds(count)),
            TimeUnit::Millisecond => TimeDelta::try_milliseconds(count),
            TimeUnit::Second => TimeDelta::try_seconds(count),
            TimeUnit::Minute => TimeDelta::try_minutes(count),
            TimeUnit::Hour => TimeDelta::try_hours(count),
            TimeUnit::Day => TimeDelta::try_days(count),
            TimeUnit::Week => TimeDelta::try_weeks(count),
        }
    }
}
