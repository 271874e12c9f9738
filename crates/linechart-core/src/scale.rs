// File: crates/linechart-core/src/scale.rs
// Summary: Linear and time scales (domain -> pixel range) with nice domains and tick generation.

use crate::time::TimeInterval;

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = 1.4142135623730951; // sqrt(2)

/// Operations shared by every scale the chart can draw against.
pub trait Scale {
    /// Domain value to pixel.
    fn apply(&self, v: f64) -> f64;
    /// Pixel back to domain value.
    fn invert(&self, px: f64) -> f64;
    /// Roughly `count` representative domain values.
    fn ticks(&self, count: usize) -> Vec<f64>;
    fn domain(&self) -> (f64, f64);
    fn range(&self) -> (f64, f64);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScaleKind {
    Linear,
    Time,
}

/// Step between ticks as a power-of-ten multiple of 1, 2 or 5.
/// Negative results encode the reciprocal (`-10` means a step of `0.1`).
pub fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let step = (stop - start) / count.max(1) as f64;
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };
    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -10f64.powf(-power) / factor
    }
}

/// Signed tick step between `start` and `stop`.
pub fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let step0 = (stop - start).abs() / count.max(1) as f64;
    let mut step1 = 10f64.powf(step0.log10().floor());
    let error = step0 / step1;
    if error >= E10 {
        step1 *= 10.0;
    } else if error >= E5 {
        step1 *= 5.0;
    } else if error >= E2 {
        step1 *= 2.0;
    }
    if stop < start { -step1 } else { step1 }
}

/// Evenly spaced round values covering `[start, stop]`.
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if !start.is_finite() || !stop.is_finite() || count == 0 {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };
    let step = tick_increment(lo, hi, count);
    if step == 0.0 || !step.is_finite() {
        return Vec::new();
    }
    let mut out: Vec<f64> = if step > 0.0 {
        let (a, b) = ((lo / step).ceil() as i64, (hi / step).floor() as i64);
        (a..=b).map(|i| i as f64 * step).collect()
    } else {
        let inv = -step;
        let (a, b) = ((lo * inv).ceil() as i64, (hi * inv).floor() as i64);
        (a..=b).map(|i| i as f64 / inv).collect()
    };
    if reverse {
        out.reverse();
    }
    out
}

/// Continuous linear mapping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Extend the domain outward to round tick values.
    pub fn nice(mut self, count: usize) -> Self {
        let (d0, d1) = self.domain;
        if !d0.is_finite() || !d1.is_finite() || d0 == d1 {
            return self;
        }
        let reverse = d1 < d0;
        let (mut start, mut stop) = if reverse { (d1, d0) } else { (d0, d1) };
        let mut prestep = f64::NAN;
        for _ in 0..10 {
            let step = tick_increment(start, stop, count);
            if step == prestep {
                break;
            } else if step > 0.0 {
                start = (start / step).floor() * step;
                stop = (stop / step).ceil() * step;
            } else if step < 0.0 {
                start = (start * step).ceil() / step;
                stop = (stop * step).floor() / step;
            } else {
                break;
            }
            prestep = step;
        }
        self.domain = if reverse { (stop, start) } else { (start, stop) };
        self
    }
}

impl Scale for LinearScale {
    #[inline]
    fn apply(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        if span == 0.0 {
            return if v.is_nan() { v } else { r0 + (r1 - r0) * 0.5 };
        }
        r0 + (v - d0) / span * (r1 - r0)
    }

    #[inline]
    fn invert(&self, px: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = r1 - r0;
        if span == 0.0 {
            return d0 + (d1 - d0) * 0.5;
        }
        d0 + (px - r0) / span * (d1 - d0)
    }

    fn ticks(&self, count: usize) -> Vec<f64> {
        ticks(self.domain.0, self.domain.1, count)
    }

    fn domain(&self) -> (f64, f64) { self.domain }
    fn range(&self) -> (f64, f64) { self.range }
}

/// Linear mapping over epoch milliseconds with calendar-aware nice/ticks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeScale {
    inner: LinearScale,
}

impl TimeScale {
    pub fn new(domain_ms: (f64, f64), range: (f64, f64)) -> Self {
        Self { inner: LinearScale::new(domain_ms, range) }
    }

    /// Tick interval chosen for `count` ticks over the current domain.
    pub fn tick_interval(&self, count: usize) -> TimeInterval {
        let (d0, d1) = self.inner.domain;
        TimeInterval::for_ticks(d0.min(d1), d0.max(d1), count)
    }

    /// Snap the domain outward to the tick interval's boundaries.
    pub fn nice(mut self, count: usize) -> Self {
        let (d0, d1) = self.inner.domain;
        if !d0.is_finite() || !d1.is_finite() {
            return self;
        }
        let interval = self.tick_interval(count);
        let (lo, hi) = (d0.min(d1), d0.max(d1));
        let (lo, hi) = (interval.floor(lo), interval.ceil(hi));
        if lo.is_finite() && hi.is_finite() {
            self.inner.domain = if d1 < d0 { (hi, lo) } else { (lo, hi) };
        }
        self
    }
}

impl Scale for TimeScale {
    fn apply(&self, v: f64) -> f64 { self.inner.apply(v) }
    fn invert(&self, px: f64) -> f64 { self.inner.invert(px) }

    fn ticks(&self, count: usize) -> Vec<f64> {
        let (d0, d1) = self.inner.domain;
        if !d0.is_finite() || !d1.is_finite() || count == 0 {
            return Vec::new();
        }
        let (lo, hi) = (d0.min(d1), d0.max(d1));
        let mut out = self.tick_interval(count).range(lo, hi + 1.0);
        if d1 < d0 {
            out.reverse();
        }
        out
    }

    fn domain(&self) -> (f64, f64) { self.inner.domain }
    fn range(&self) -> (f64, f64) { self.inner.range }
}

/// The x scale: linear for numbers, time for dates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum XScale {
    Linear(LinearScale),
    Time(TimeScale),
}

impl XScale {
    pub fn kind(&self) -> ScaleKind {
        match self {
            XScale::Linear(_) => ScaleKind::Linear,
            XScale::Time(_) => ScaleKind::Time,
        }
    }

    pub fn time_interval(&self, count: usize) -> Option<TimeInterval> {
        match self {
            XScale::Time(t) => Some(t.tick_interval(count)),
            XScale::Linear(_) => None,
        }
    }
}

impl Scale for XScale {
    fn apply(&self, v: f64) -> f64 {
        match self {
            XScale::Linear(s) => s.apply(v),
            XScale::Time(s) => s.apply(v),
        }
    }

    fn invert(&self, px: f64) -> f64 {
        match self {
            XScale::Linear(s) => s.invert(px),
            XScale::Time(s) => s.invert(px),
        }
    }

    fn ticks(&self, count: usize) -> Vec<f64> {
        match self {
            XScale::Linear(s) => s.ticks(count),
            XScale::Time(s) => s.ticks(count),
        }
    }

    fn domain(&self) -> (f64, f64) {
        match self {
            XScale::Linear(s) => s.domain,
            XScale::Time(s) => Scale::domain(s),
        }
    }

    fn range(&self) -> (f64, f64) {
        match self {
            XScale::Linear(s) => s.range,
            XScale::Time(s) => Scale::range(s),
        }
    }
}
