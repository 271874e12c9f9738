// File: crates/linechart-core/tests/dates.rs
// Purpose: Date-like x detection and conversion to epoch milliseconds.

use chrono::{NaiveDate, TimeZone, Utc};
use linechart_core::series::{Dataset, Series, XValue};
use linechart_core::time::parse_date;

fn ms(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> f64 {
    Utc.with_ymd_and_hms(y, m, d, h, min, s).single().expect("valid date").timestamp_millis() as f64
}

#[test]
fn recognises_date_notations() {
    let cases = [
        ("2020-01-01", ms(2020, 1, 1, 0, 0, 0)),
        ("2020-03", ms(2020, 3, 1, 0, 0, 0)),
        ("2021", ms(2021, 1, 1, 0, 0, 0)),
        ("2020-01-01T12:30:00Z", ms(2020, 1, 1, 12, 30, 0)),
        ("2020-01-01T12:30:00+02:00", ms(2020, 1, 1, 10, 30, 0)),
        ("2020-01-01T12:30", ms(2020, 1, 1, 12, 30, 0)),
        ("2020-01-01 08:15:30", ms(2020, 1, 1, 8, 15, 30)),
        ("Wed, 01 Jan 2020 00:00:00 +0000", ms(2020, 1, 1, 0, 0, 0)),
    ];
    for (text, want) in cases {
        let x = XValue::from(text);
        assert!(x.is_date(), "{text} should be a date");
        let pos = x.resolve().expect("resolves");
        assert!(pos.is_date);
        assert_eq!(pos.value, want, "{text}");
    }
}

#[test]
fn rejects_non_dates() {
    for text in ["", "apple", "12.5", "2020-13-01", "20201", "1e3"] {
        assert!(parse_date(text).is_none(), "{text} should not be a date");
    }
}

#[test]
fn numbers_are_never_dates() {
    let x = XValue::from(1_577_836_800_000.0);
    assert!(!x.is_date());
    let pos = x.resolve().expect("number resolves");
    assert!(!pos.is_date);
    assert_eq!(pos.value, 1_577_836_800_000.0);
}

#[test]
fn numeric_text_resolves_to_a_number() {
    let pos = XValue::from("12.5").resolve().expect("numeric text");
    assert!(!pos.is_date);
    assert_eq!(pos.value, 12.5);
    assert_eq!(XValue::from("pear").resolve(), None);
}

#[test]
fn normalisation_turns_date_text_into_dates() {
    let x = XValue::from("2020-02-01").normalized();
    assert_eq!(x, XValue::Date(Utc.with_ymd_and_hms(2020, 2, 1, 0, 0, 0).unwrap()));
    assert_eq!(XValue::from("pear").normalized(), XValue::from("pear"));

    let from_naive = XValue::from(NaiveDate::from_ymd_opt(2020, 2, 1).unwrap());
    assert_eq!(from_naive, x);
}

#[test]
fn unparseable_points_become_nan() {
    let s = Series::new("mixed").with_values([("2020-01-01", 1.0), ("soon", 2.0)]);
    let pts = s.plot_points();
    assert!(pts[0].is_date);
    assert!(pts[1].x.is_nan());
    assert_eq!(pts[1].y, 2.0);
    assert!(s.try_plot_points().is_err());
}

#[test]
fn dataset_json_shape() {
    let json = r##"{
        "labels": {"axis": {"x": "Month", "y": "Kg"}},
        "series": [
            {"label": "apple", "color": "#ff0000", "values": [["2020-01-01", 3], ["2020-02-01", 4.5]]},
            {"label": "pear", "values": [[1, 2], [2, 3]]}
        ]
    }"##;
    let ds = Dataset::from_json(json).expect("parses");
    assert_eq!(ds.axis_label_x(), Some("Month"));
    assert_eq!(ds.axis_label_y(), Some("Kg"));
    assert_eq!(ds.series.len(), 2);
    assert_eq!(ds.series[0].color.as_deref(), Some("#ff0000"));
    assert_eq!(ds.series[0].values[1], (XValue::from("2020-02-01"), 4.5));
    assert_eq!(ds.series[1].color, None);
    assert_eq!(ds.series[1].values[0], (XValue::Number(1.0), 2.0));
}
