// File: crates/linechart-core/tests/extent.rs
// Purpose: Extent computation over all series, origin clamping and the x date switch.

use linechart_core::extent::{ChartExtent, Extent};
use linechart_core::series::{PlotSeries, Series};

fn plot(series: &[Series]) -> Vec<PlotSeries> {
    series
        .iter()
        .map(|s| PlotSeries { label: s.label.clone(), color: "#000".into(), points: s.plot_points() })
        .collect()
}

#[test]
fn extent_ignores_nan_and_handles_empty() {
    assert_eq!(Extent::of([3.0, f64::NAN, -1.0, 7.5]), Some(Extent::new(-1.0, 7.5)));
    assert_eq!(Extent::of(std::iter::empty()), None);
    assert_eq!(Extent::of([f64::NAN]), None);
}

#[test]
fn extent_skips_infinities() {
    assert_eq!(Extent::of([f64::INFINITY, 2.0, f64::NEG_INFINITY, 4.0]), Some(Extent::new(2.0, 4.0)));
    assert_eq!(Extent::of([f64::INFINITY]), None);

    let series = [Series::new("a").with_values([("inf", 5.0), ("1", 2.0), ("-Infinity", 3.0), ("3", 4.0)])];
    let e = ChartExtent::compute(&plot(&series), 0.0);
    assert_eq!(e.x, Some(Extent::new(0.0, 3.0)));
}

#[test]
fn positive_data_is_clamped_to_origin() {
    let series = [
        Series::new("a").with_values([(2, 4.0), (5, 9.0)]),
        Series::new("b").with_values([(3, 3.0), (4, 6.0)]),
    ];
    let e = ChartExtent::compute(&plot(&series), 0.0);
    assert!(!e.x_is_date);
    assert_eq!(e.x, Some(Extent::new(0.0, 5.0)));
    assert_eq!(e.y, Some(Extent::new(0.0, 9.0)));
}

#[test]
fn negative_minimum_is_kept() {
    let series = [Series::new("a").with_values([(-3, -4.0), (5, 9.0)])];
    let e = ChartExtent::compute(&plot(&series), 0.0);
    assert_eq!(e.x, Some(Extent::new(-3.0, 5.0)));
    assert_eq!(e.y, Some(Extent::new(-4.0, 9.0)));
}

#[test]
fn custom_origin_applies_to_both_axes() {
    let series = [Series::new("a").with_values([(20, 40.0), (30, 90.0)])];
    let e = ChartExtent::compute(&plot(&series), 10.0);
    assert_eq!(e.x, Some(Extent::new(10.0, 30.0)));
    assert_eq!(e.y, Some(Extent::new(10.0, 90.0)));
}

#[test]
fn date_x_is_not_clamped() {
    let series = [Series::new("a").with_values([("2020-01-01", 5.0), ("2020-03-01", 8.0)])];
    let e = ChartExtent::compute(&plot(&series), 0.0);
    assert!(e.x_is_date);
    let x = e.x.expect("x extent");
    assert!(x.min > 0.0, "date minimum must stay at its epoch value");
    assert!(x.max > x.min);
    assert_eq!(e.y, Some(Extent::new(0.0, 8.0)));
}

#[test]
fn empty_dataset_has_no_extent() {
    let e = ChartExtent::compute(&[], 0.0);
    assert_eq!(e.x, None);
    assert_eq!(e.y, None);
    assert!(!e.x_is_date);

    let e = ChartExtent::compute(&plot(&[Series::new("empty")]), 0.0);
    assert_eq!(e.x, None);
}
