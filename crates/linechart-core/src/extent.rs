// File: crates/linechart-core/src/extent.rs
// Summary: Min/max extents over all series, with the lower bound pulled down to an origin.

use crate::series::PlotSeries;

/// `[min, max]` of a set of values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extent {
    pub min: f64,
    pub max: f64,
}

impl Extent {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Extent of the finite values; `None` when there are none.
    pub fn of(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values.into_iter().filter(|v| v.is_finite()).fold(None, |acc, v| match acc {
            None => Some(Self::new(v, v)),
            Some(e) => Some(Self::new(e.min.min(v), e.max.max(v))),
        })
    }

    /// Lower `min` to `origin` when the natural minimum lies above it.
    pub fn clamp_to_origin(self, origin: f64) -> Self {
        if self.min > origin { Self::new(origin, self.max) } else { self }
    }

    pub fn as_tuple(&self) -> (f64, f64) {
        (self.min, self.max)
    }
}

/// Extents used to build the chart's scales.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartExtent {
    pub x: Option<Extent>,
    /// Whether the point holding the x minimum is date-like.
    pub x_is_date: bool,
    pub y: Option<Extent>,
}

impl ChartExtent {
    /// Scan every point of every series. The x minimum is clamped to `origin`
    /// only for numeric x; the y minimum is always clamped.
    pub fn compute(series: &[PlotSeries], origin: f64) -> Self {
        let points = || series.iter().flat_map(|s| s.points.iter());

        let x_min_point = points()
            .filter(|p| p.x.is_finite())
            .fold(None::<&crate::series::DataPoint>, |best, p| match best {
                Some(b) if b.x <= p.x => Some(b),
                _ => Some(p),
            });
        let x_is_date = x_min_point.map(|p| p.is_date).unwrap_or(false);

        let mut x = Extent::of(points().map(|p| p.x));
        if !x_is_date {
            x = x.map(|e| e.clamp_to_origin(origin));
        }
        let y = Extent::of(points().map(|p| p.y)).map(|e| e.clamp_to_origin(origin));

        Self { x, x_is_date, y }
    }
}
