// File: crates/linechart-core/src/hover.rs
// Summary: Nearest-point lookup driving the hover marker.
// Notes:
// - `xvalues` is the sorted, de-duplicated set of x positions over all series.
// - The x match is a bisection; the series match is a linear scan at that x.

use crate::series::PlotSeries;

/// First index in `xs[lo..]` whose value is not less than `x`.
pub fn bisect_left(xs: &[f64], x: f64, lo: usize) -> usize {
    let (mut lo, mut hi) = (lo.min(xs.len()), xs.len());
    while lo < hi {
        let mid = (lo + hi) / 2;
        if xs[mid] < x {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

/// Index of the x value closest to `x`. Ties go to the lower neighbour.
pub fn nearest_index(xs: &[f64], x: f64) -> Option<usize> {
    if xs.is_empty() || x.is_nan() {
        return None;
    }
    let i1 = bisect_left(xs, x, 1);
    let i0 = i1 - 1;
    if i1 < xs.len() && x - xs[i0] > xs[i1] - x {
        Some(i1)
    } else {
        Some(i0)
    }
}

/// Sorted distinct finite x positions across every series.
pub fn collect_xvalues(series: &[PlotSeries]) -> Vec<f64> {
    let mut xs: Vec<f64> = series
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.x))
        .filter(|x| x.is_finite())
        .collect();
    xs.sort_by(f64::total_cmp);
    xs.dedup();
    xs
}

/// Point picked for the marker.
#[derive(Clone, Debug, PartialEq)]
pub struct Hover {
    /// Index into `xvalues`.
    pub index: usize,
    pub x: f64,
    /// Index into the series list.
    pub series: usize,
    pub y: f64,
    pub label: String,
}

/// Nearest x position to `xm`, then the series whose y at that x is closest to `ym`.
/// Series without a point at the matched x are not candidates.
pub fn nearest(xvalues: &[f64], series: &[PlotSeries], xm: f64, ym: f64) -> Option<Hover> {
    let index = nearest_index(xvalues, xm)?;
    let x = xvalues[index];
    let (si, y) = series
        .iter()
        .enumerate()
        .filter_map(|(i, s)| s.y_at(x).filter(|y| !y.is_nan()).map(|y| (i, y)))
        .min_by(|a, b| (a.1 - ym).abs().total_cmp(&(b.1 - ym).abs()))?;
    Some(Hover { index, x, series: si, y, label: series[si].label.clone() })
}
