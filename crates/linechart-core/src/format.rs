// File: crates/linechart-core/src/format.rs
// Summary: Locale-aware tick label formatters for numbers and dates.

use chrono::{DateTime, Locale, Utc};
use num_format::{Locale as NumLocale, ToFormattedString};

use crate::error::{LinechartError, LinechartResult};
use crate::time::{from_millis, TimeInterval, TimeUnit};

/// Turns a domain value (number, or epoch ms for dates) into a label.
pub trait TickFormat {
    fn format_value(&self, value: f64) -> String;
}

impl<F> TickFormat for F
where
    F: Fn(f64) -> String,
{
    fn format_value(&self, value: f64) -> String {
        self(value)
    }
}

/// Resolve a BCP 47 style tag (`en-GB`, `de_CH`) to num-format's CLDR data:
/// the full tag first, then its language, then `en`.
pub fn number_locale(tag: &str) -> NumLocale {
    let norm = tag.trim().replace('_', "-");
    if let Ok(l) = NumLocale::from_name(norm.as_str()) {
        return l;
    }
    let lang = norm.split('-').next().unwrap_or("").to_ascii_lowercase();
    NumLocale::from_name(lang.as_str()).unwrap_or_else(|_| {
        tracing::debug!(tag, "no number locale, using en");
        NumLocale::en
    })
}

/// Decimal number format with locale separators and bounded fraction digits.
#[derive(Clone, Debug, PartialEq)]
pub struct NumberFormat {
    pub locale: String,
    pub min_fraction_digits: usize,
    pub max_fraction_digits: usize,
    pub grouping: bool,
    symbols: NumLocale,
}

impl NumberFormat {
    pub fn decimal(locale: &str, max_fraction_digits: usize) -> Self {
        Self {
            locale: locale.to_string(),
            min_fraction_digits: 0,
            max_fraction_digits,
            grouping: true,
            symbols: number_locale(locale),
        }
    }

    pub fn with_min_fraction_digits(mut self, digits: usize) -> Self {
        self.min_fraction_digits = digits.min(self.max_fraction_digits);
        self
    }

    pub fn with_grouping(mut self, grouping: bool) -> Self {
        self.grouping = grouping;
        self
    }

    pub fn format(&self, value: f64) -> String {
        if value.is_nan() {
            return self.symbols.nan().to_string();
        }
        if value.is_infinite() {
            let inf = self.symbols.infinity();
            return if value < 0.0 { format!("{}{inf}", self.symbols.minus_sign()) } else { inf.to_string() };
        }
        let fixed = format!("{:.*}", self.max_fraction_digits, value.abs());
        let (int_part, frac_part) = match fixed.split_once('.') {
            Some((i, f)) => (i, f),
            None => (fixed.as_str(), ""),
        };
        let mut frac = frac_part.to_string();
        while frac.len() > self.min_fraction_digits && frac.ends_with('0') {
            frac.pop();
        }

        let is_zero = int_part.bytes().all(|b| b == b'0') && frac.bytes().all(|b| b == b'0');
        let mut out = String::with_capacity(fixed.len() + 8);
        if value < 0.0 && !is_zero {
            out.push_str(self.symbols.minus_sign());
        }
        // Integer parts beyond u128 are printed ungrouped.
        match int_part.parse::<u128>() {
            Ok(n) if self.grouping => out.push_str(&n.to_formatted_string(&self.symbols)),
            _ => out.push_str(int_part),
        }
        if !frac.is_empty() {
            out.push_str(self.symbols.decimal());
            out.push_str(&frac);
        }
        out
    }
}

impl TickFormat for NumberFormat {
    fn format_value(&self, value: f64) -> String {
        self.format(value)
    }
}

/// Resolve a BCP 47 style tag (`en-GB`, `fr`) to a chrono locale.
pub fn chrono_locale(tag: &str) -> LinechartResult<Locale> {
    let norm = tag.trim().replace('-', "_");
    if let Ok(l) = Locale::try_from(norm.as_str()) {
        return Ok(l);
    }
    let lang = norm.split('_').next().unwrap_or("").to_ascii_lowercase();
    let guess = format!("{lang}_{}", lang.to_ascii_uppercase());
    Locale::try_from(guess.as_str()).map_err(|_| LinechartError::UnknownLocale(tag.to_string()))
}

#[derive(Clone, Debug, PartialEq)]
enum DatePattern {
    /// Picks the coarsest unit the date is aligned to (year, month, day, ...).
    Multi,
    Fixed(String),
}

/// Locale-aware date label format.
#[derive(Clone, Debug, PartialEq)]
pub struct DateFormat {
    locale: Locale,
    pattern: DatePattern,
}

impl DateFormat {
    /// Multi-scale tick format; unknown locales fall back to POSIX names.
    pub fn multi(locale: &str) -> Self {
        Self::try_multi(locale).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "falling back to POSIX date names");
            Self { locale: Locale::POSIX, pattern: DatePattern::Multi }
        })
    }

    pub fn try_multi(locale: &str) -> LinechartResult<Self> {
        Ok(Self { locale: chrono_locale(locale)?, pattern: DatePattern::Multi })
    }

    /// Fixed strftime pattern, e.g. `"%d %b %Y"`.
    pub fn pattern(locale: &str, pattern: impl Into<String>) -> LinechartResult<Self> {
        Ok(Self { locale: chrono_locale(locale)?, pattern: DatePattern::Fixed(pattern.into()) })
    }

    pub fn format_date(&self, d: &DateTime<Utc>) -> String {
        let fmt = match &self.pattern {
            DatePattern::Fixed(p) => p.as_str(),
            DatePattern::Multi => multi_pattern(d.timestamp_millis() as f64),
        };
        d.format_localized(fmt, self.locale).to_string()
    }
}

impl TickFormat for DateFormat {
    fn format_value(&self, value: f64) -> String {
        match from_millis(value) {
            Some(d) => self.format_date(&d),
            None => "Invalid Date".to_string(),
        }
    }
}

fn multi_pattern(ms: f64) -> &'static str {
    let above = |unit: TimeUnit| TimeInterval::new(unit, 1).floor(ms) < ms;
    if above(TimeUnit::Second) {
        "%.3f"
    } else if above(TimeUnit::Minute) {
        ":%S"
    } else if above(TimeUnit::Hour) {
        "%I:%M"
    } else if above(TimeUnit::Day) {
        "%I %p"
    } else if above(TimeUnit::Month) {
        if above(TimeUnit::Week) { "%a %d" } else { "%b %d" }
    } else if above(TimeUnit::Year) {
        "%B"
    } else {
        "%Y"
    }
}
