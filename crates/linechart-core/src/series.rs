// File: crates/linechart-core/src/series.rs
// Summary: Dataset model (series, x values, axis labels) and its resolution to plottable points.
// Notes:
// - `Series`/`Dataset` mirror the JSON shape hosts already produce, so they
//   deserialize straight from `serde_json`.
// - `PlotSeries` is the numeric view the scales and hit-tests work on.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LinechartError, LinechartResult};
use crate::time::{parse_date, to_millis};

/// An x coordinate as supplied by the host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum XValue {
    Number(f64),
    Text(String),
    #[serde(skip_deserializing)]
    Date(DateTime<Utc>),
}

impl XValue {
    /// True when the value is, or parses as, a date.
    pub fn is_date(&self) -> bool {
        match self {
            XValue::Date(_) => true,
            XValue::Text(s) => parse_date(s).is_some(),
            XValue::Number(_) => false,
        }
    }

    /// Turn date-like text into `Date`; everything else is returned unchanged.
    pub fn normalized(&self) -> XValue {
        match self {
            XValue::Text(s) => match parse_date(s) {
                Some(d) => XValue::Date(d),
                None => self.clone(),
            },
            other => other.clone(),
        }
    }

    /// Numeric position on the x axis: epoch milliseconds for dates.
    /// Returns `None` for text that is neither a date nor a finite number
    /// ("inf" and "NaN" do not count).
    pub fn resolve(&self) -> Option<XPos> {
        match self {
            XValue::Number(v) => Some(XPos { value: *v, is_date: false }),
            XValue::Date(d) => Some(XPos { value: to_millis(d), is_date: true }),
            XValue::Text(s) => {
                if let Some(d) = parse_date(s) {
                    return Some(XPos { value: to_millis(&d), is_date: true });
                }
                s.trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .map(|v| XPos { value: v, is_date: false })
            }
        }
    }
}

impl From<f64> for XValue {
    fn from(v: f64) -> Self { XValue::Number(v) }
}

impl From<i32> for XValue {
    fn from(v: i32) -> Self { XValue::Number(v as f64) }
}

impl From<&str> for XValue {
    fn from(v: &str) -> Self { XValue::Text(v.to_string()) }
}

impl From<String> for XValue {
    fn from(v: String) -> Self { XValue::Text(v) }
}

impl From<DateTime<Utc>> for XValue {
    fn from(v: DateTime<Utc>) -> Self { XValue::Date(v) }
}

impl From<NaiveDate> for XValue {
    fn from(v: NaiveDate) -> Self {
        XValue::Date(v.and_time(NaiveTime::MIN).and_utc())
    }
}

impl fmt::Display for XValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XValue::Number(v) => write!(f, "{v}"),
            XValue::Text(s) => f.write_str(s),
            XValue::Date(d) => f.write_str(&d.to_rfc3339()),
        }
    }
}

/// Resolved x position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct XPos {
    pub value: f64,
    pub is_date: bool,
}

/// One plotted line as supplied by the host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Series {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub label: String,
    pub values: Vec<(XValue, f64)>,
}

impl Series {
    pub fn new(label: impl Into<String>) -> Self {
        Self { color: None, label: label.into(), values: Vec::new() }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_values<X: Into<XValue>>(mut self, values: impl IntoIterator<Item = (X, f64)>) -> Self {
        self.values = values.into_iter().map(|(x, y)| (x.into(), y)).collect();
        self
    }

    pub fn push(&mut self, x: impl Into<XValue>, y: f64) {
        self.values.push((x.into(), y));
    }

    /// Resolve every point; unparseable x values become NaN.
    pub fn plot_points(&self) -> Vec<DataPoint> {
        self.values
            .iter()
            .map(|(x, y)| match x.resolve() {
                Some(p) => DataPoint { x: p.value, is_date: p.is_date, y: *y },
                None => {
                    tracing::warn!(series = %self.label, value = %x, "x value is neither a number nor a date");
                    DataPoint { x: f64::NAN, is_date: false, y: *y }
                }
            })
            .collect()
    }

    /// Resolve every point, failing on the first unparseable x value.
    pub fn try_plot_points(&self) -> LinechartResult<Vec<DataPoint>> {
        self.values
            .iter()
            .enumerate()
            .map(|(index, (x, y))| {
                x.resolve()
                    .map(|p| DataPoint { x: p.value, is_date: p.is_date, y: *y })
                    .ok_or_else(|| LinechartError::InvalidX {
                        series: self.label.clone(),
                        index,
                        value: x.to_string(),
                    })
            })
            .collect()
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)?;
        if let Some(c) = &self.color {
            write!(f, " ({c})")?;
        }
        f.write_str(":")?;
        for (x, y) in &self.values {
            write!(f, " [{x}, {y}]")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisLabels {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Labels {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis: Option<AxisLabels>,
}

/// Series plus optional axis captions.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Labels>,
    pub series: Vec<Series>,
}

impl Dataset {
    pub fn new(series: Vec<Series>) -> Self {
        Self { labels: None, series }
    }

    pub fn with_axis_labels(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.labels = Some(Labels { axis: Some(AxisLabels { x: Some(x.into()), y: Some(y.into()) }) });
        self
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn axis_label_x(&self) -> Option<&str> {
        self.labels.as_ref()?.axis.as_ref()?.x.as_deref()
    }

    pub fn axis_label_y(&self) -> Option<&str> {
        self.labels.as_ref()?.axis.as_ref()?.y.as_deref()
    }
}

/// A resolved point: x in data units (epoch ms for dates).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DataPoint {
    pub x: f64,
    pub is_date: bool,
    pub y: f64,
}

/// Numeric view of a series with its final colour.
#[derive(Clone, Debug, PartialEq)]
pub struct PlotSeries {
    pub label: String,
    pub color: String,
    pub points: Vec<DataPoint>,
}

impl PlotSeries {
    /// y of the first point sitting exactly at `x`.
    pub fn y_at(&self, x: f64) -> Option<f64> {
        self.points.iter().find(|p| p.x == x).map(|p| p.y)
    }
}
