// File: crates/linechart-core/src/time.rs
// Summary: Date detection/conversion and calendar intervals used by the time scale.
// Notes:
// - Dates travel through the chart as epoch milliseconds (`f64`).
// - All calendar arithmetic happens in UTC so output does not depend on the host clock.

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveDateTime, Timelike, Utc};

use crate::scale::tick_step;

pub const DURATION_SECOND: f64 = 1_000.0;
pub const DURATION_MINUTE: f64 = DURATION_SECOND * 60.0;
pub const DURATION_HOUR: f64 = DURATION_MINUTE * 60.0;
pub const DURATION_DAY: f64 = DURATION_HOUR * 24.0;
pub const DURATION_WEEK: f64 = DURATION_DAY * 7.0;
pub const DURATION_MONTH: f64 = DURATION_DAY * 30.0;
pub const DURATION_YEAR: f64 = DURATION_DAY * 365.0;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse the date notations hosts commonly send. Zone-less values are read as UTC.
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(d) = DateTime::parse_from_rfc3339(s) {
        return Some(d.with_timezone(&Utc));
    }
    if let Ok(d) = DateTime::parse_from_rfc2822(s) {
        return Some(d.with_timezone(&Utc));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(n) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(n.and_utc());
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return midnight(d.year(), d.month(), d.day());
    }
    let all_digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
    if let Some((y, m)) = s.split_once('-') {
        if y.len() == 4 && m.len() == 2 && all_digits(y) && all_digits(m) {
            return midnight(y.parse().ok()?, m.parse().ok()?, 1);
        }
        return None;
    }
    if s.len() == 4 && all_digits(s) {
        return midnight(s.parse().ok()?, 1, 1);
    }
    None
}

fn midnight(year: i32, month: u32, day: u32) -> Option<DateTime<Utc>> {
    Some(NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)?.and_utc())
}

#[inline]
pub fn to_millis(d: &DateTime<Utc>) -> f64 {
    d.timestamp_millis() as f64
}

/// Epoch milliseconds back to a UTC date; `None` for non-finite or out-of-range input.
pub fn from_millis(ms: f64) -> Option<DateTime<Utc>> {
    if !ms.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(ms.round() as i64)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeUnit {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    /// Weeks start on Sunday.
    Week,
    Month,
    Year,
}

/// A calendar interval: every `step` units, aligned to multiples of `step`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeInterval {
    pub unit: TimeUnit,
    pub step: u32,
}

const TICK_INTERVALS: &[(TimeUnit, u32, f64)] = &[
    (TimeUnit::Second, 1, DURATION_SECOND),
    (TimeUnit::Second, 5, 5.0 * DURATION_SECOND),
    (TimeUnit::Second, 15, 15.0 * DURATION_SECOND),
    (TimeUnit::Second, 30, 30.0 * DURATION_SECOND),
    (TimeUnit::Minute, 1, DURATION_MINUTE),
    (TimeUnit::Minute, 5, 5.0 * DURATION_MINUTE),
    (TimeUnit::Minute, 15, 15.0 * DURATION_MINUTE),
    (TimeUnit::Minute, 30, 30.0 * DURATION_MINUTE),
    (TimeUnit::Hour, 1, DURATION_HOUR),
    (TimeUnit::Hour, 3, 3.0 * DURATION_HOUR),
    (TimeUnit::Hour, 6, 6.0 * DURATION_HOUR),
    (TimeUnit::Hour, 12, 12.0 * DURATION_HOUR),
    (TimeUnit::Day, 1, DURATION_DAY),
    (TimeUnit::Day, 2, 2.0 * DURATION_DAY),
    (TimeUnit::Week, 1, DURATION_WEEK),
    (TimeUnit::Month, 1, DURATION_MONTH),
    (TimeUnit::Month, 3, 3.0 * DURATION_MONTH),
    (TimeUnit::Year, 1, DURATION_YEAR),
];

// Upper bound on generated boundaries; protects against absurd spans.
const MAX_RANGE: usize = 10_000;

impl TimeInterval {
    pub const fn new(unit: TimeUnit, step: u32) -> Self {
        Self { unit, step: if step == 0 { 1 } else { step } }
    }

    /// Interval whose duration best matches `|stop - start| / count`.
    pub fn for_ticks(start: f64, stop: f64, count: usize) -> Self {
        let target = (stop - start).abs() / count.max(1) as f64;
        let i = TICK_INTERVALS.partition_point(|&(_, _, d)| d <= target);
        if i == TICK_INTERVALS.len() {
            let step = tick_step(start / DURATION_YEAR, stop / DURATION_YEAR, count).abs();
            return Self::new(TimeUnit::Year, step.max(1.0) as u32);
        }
        if i == 0 {
            let step = tick_step(start, stop, count).abs();
            return Self::new(TimeUnit::Millisecond, step.max(1.0) as u32);
        }
        let (lo, hi) = (TICK_INTERVALS[i - 1], TICK_INTERVALS[i]);
        let (unit, step, _) = if target / lo.2 < hi.2 / target { lo } else { hi };
        Self::new(unit, step)
    }

    /// Latest boundary at or before `ms`. NaN when the date is unrepresentable.
    pub fn floor(&self, ms: f64) -> f64 {
        if self.unit == TimeUnit::Millisecond {
            let k = self.step as f64;
            return (ms / k).floor() * k;
        }
        from_millis(ms)
            .and_then(|d| self.floor_date(d))
            .map(|d| to_millis(&d))
            .unwrap_or(f64::NAN)
    }

    /// Earliest boundary at or after `ms`.
    pub fn ceil(&self, ms: f64) -> f64 {
        let f = self.floor(ms);
        if f >= ms || f.is_nan() { f } else { self.next(f) }
    }

    /// Boundary following the boundary `ms`.
    pub fn next(&self, ms: f64) -> f64 {
        let k = self.step as i64;
        let advanced = match self.unit {
            TimeUnit::Millisecond => return ms + self.step as f64,
            TimeUnit::Second => ms + (k as f64) * DURATION_SECOND,
            TimeUnit::Minute => ms + (k as f64) * DURATION_MINUTE,
            TimeUnit::Hour => ms + (k as f64) * DURATION_HOUR,
            TimeUnit::Day | TimeUnit::Week => {
                let days = if self.unit == TimeUnit::Week { 7 } else { k };
                match from_millis(ms).and_then(|d| d.checked_add_signed(Duration::days(days))) {
                    Some(d) => to_millis(&d),
                    None => return f64::NAN,
                }
            }
            TimeUnit::Month | TimeUnit::Year => {
                let months = if self.unit == TimeUnit::Year { 12 * self.step } else { self.step };
                match from_millis(ms).and_then(|d| d.checked_add_months(Months::new(months))) {
                    Some(d) => to_millis(&d),
                    None => return f64::NAN,
                }
            }
        };
        let mut n = self.floor(advanced);
        // Alignment can snap back onto `ms` when a month has fewer days than the step expects.
        if n <= ms {
            n = self.floor(advanced + (k as f64) * DURATION_DAY);
        }
        n
    }

    /// Boundaries `t` with `start <= t < stop`.
    pub fn range(&self, start: f64, stop: f64) -> Vec<f64> {
        let mut out = Vec::new();
        let mut t = self.ceil(start);
        while t.is_finite() && t < stop && out.len() < MAX_RANGE {
            out.push(t);
            let n = self.next(t);
            if !(n > t) {
                break;
            }
            t = n;
        }
        out
    }

    fn floor_date(&self, d: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let k = self.step;
        let date = d.date_naive();
        let (h, m, s) = (d.hour(), d.minute(), d.second());
        let at = |date: NaiveDate, h: u32, m: u32, s: u32| Some(date.and_hms_opt(h, m, s)?.and_utc());
        match self.unit {
            TimeUnit::Millisecond => Some(d),
            TimeUnit::Second => at(date, h, m, s - s % k),
            TimeUnit::Minute => at(date, h, m - m % k, 0),
            TimeUnit::Hour => at(date, h - h % k, 0, 0),
            TimeUnit::Day => {
                let d0 = date.day0();
                at(date.with_day0(d0 - d0 % k)?, 0, 0, 0)
            }
            TimeUnit::Week => {
                let back = date.weekday().num_days_from_sunday() as i64;
                at(date.checked_sub_signed(Duration::days(back))?, 0, 0, 0)
            }
            TimeUnit::Month => {
                let m0 = date.month0();
                at(NaiveDate::from_ymd_opt(date.year(), m0 - m0 % k + 1, 1)?, 0, 0, 0)
            }
            TimeUnit::Year => {
                let y = date.year().div_euclid(k as i32) * k as i32;
                at(NaiveDate::from_ymd_opt(y, 1, 1)?, 0, 0, 0)
            }
        }
    }
}
