// File: crates/linechart-core/tests/format.rs
// Purpose: Locale-aware number and date tick formatting.

use chrono::{TimeZone, Utc};
use linechart_core::format::{chrono_locale, number_locale, DateFormat, NumberFormat, TickFormat};
use linechart_core::LinechartError;

fn ms(y: i32, m: u32, d: u32, h: u32, min: u32) -> f64 {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).single().expect("valid date").timestamp_millis() as f64
}

#[test]
fn decimal_defaults_match_en_gb() {
    let f = NumberFormat::decimal("en-GB", 2);
    assert_eq!(f.format(1234.5678), "1,234.57");
    assert_eq!(f.format(0.1 + 0.2), "0.3");
    assert_eq!(f.format(-0.001), "0");
    assert_eq!(f.format(-1500.0), "-1,500");
    assert_eq!(f.format(999.0), "999");
    assert_eq!(f.format(1_000_000.0), "1,000,000");
    assert_eq!(f.format(f64::NAN), "NaN");
    assert_eq!(f.format(f64::INFINITY), "∞");
}

#[test]
fn separators_follow_locale() {
    assert_eq!(NumberFormat::decimal("de-DE", 2).format(1234.5), "1.234,5");
    assert_eq!(NumberFormat::decimal("de", 2).format(-1_000_000.0), "-1.000.000");
    assert_eq!(NumberFormat::decimal("es", 2).format(12345.0), "12.345");

    // French groups with a space-like separator and a decimal comma.
    let fr = NumberFormat::decimal("fr", 2).format(1234.5);
    assert!(fr.starts_with('1') && fr.ends_with("234,5") && fr != "1234,5", "{fr}");
    // Swiss German keeps the decimal point.
    let ch = NumberFormat::decimal("de_CH", 2).format(1234.5);
    assert!(ch.ends_with("234.5") && ch != "1234.5", "{ch}");
}

#[test]
fn unknown_locales_use_english_symbols() {
    assert_eq!(number_locale("xx-YY"), number_locale("en"));
    assert_eq!(NumberFormat::decimal("xx-YY", 1).format(12345.44), "12,345.4");
    assert_eq!(NumberFormat::decimal("en-GB", 0).format(f64::NEG_INFINITY), "-∞");
}

#[test]
fn fraction_digit_bounds() {
    let f = NumberFormat::decimal("en-GB", 3).with_min_fraction_digits(1);
    assert_eq!(f.format(2.0), "2.0");
    assert_eq!(f.format(2.12345), "2.123");
    let plain = NumberFormat::decimal("en-GB", 0).with_grouping(false);
    assert_eq!(plain.format(12345.6), "12346");
}

#[test]
fn multi_scale_date_labels() {
    let f = DateFormat::multi("en-GB");
    assert_eq!(f.format_value(ms(2020, 1, 1, 0, 0)), "2020");
    assert_eq!(f.format_value(ms(2020, 3, 1, 0, 0)), "March");
    // 2020-03-05 is a Thursday, not a week boundary.
    assert_eq!(f.format_value(ms(2020, 3, 5, 0, 0)), "Thu 05");
    // 2020-03-08 is a Sunday.
    assert_eq!(f.format_value(ms(2020, 3, 8, 0, 0)), "Mar 08");
    assert_eq!(f.format_value(ms(2020, 3, 5, 13, 30)), "01:30");
    assert_eq!(f.format_value(f64::NAN), "Invalid Date");
}

#[test]
fn fixed_date_pattern_and_locales() {
    let f = DateFormat::pattern("en-GB", "%d %b %Y").expect("known locale");
    assert_eq!(f.format_value(ms(2020, 3, 5, 0, 0)), "05 Mar 2020");

    let fr = DateFormat::pattern("fr-FR", "%B").expect("known locale");
    assert_eq!(fr.format_value(ms(2020, 3, 5, 0, 0)), "mars");

    assert!(chrono_locale("en-GB").is_ok());
    assert!(chrono_locale("fr").is_ok(), "bare language falls back to its main region");
    assert!(matches!(chrono_locale("xx-YY"), Err(LinechartError::UnknownLocale(_))));
    assert!(DateFormat::try_multi("zz").is_err());
}

#[test]
fn closures_are_formatters() {
    let pct = |v: f64| format!("{:.0}%", v * 100.0);
    let f: &dyn TickFormat = &pct;
    assert_eq!(f.format_value(0.25), "25%");
}
