// File: crates/linechart-core/src/types.rs
// Summary: Shared types and constants (sizes, margins, tick defaults).

/// Default body width in pixels for a freshly created document.
pub const WIDTH: f64 = 1024.0;
/// Default body height in pixels for a freshly created document.
pub const HEIGHT: f64 = 640.0;

/// Default number of ticks requested from each scale.
pub const DEFAULT_TICKS: usize = 10;
/// Default locale for number and date formatting.
pub const DEFAULT_LOCALE: &str = "en-GB";

/// Space between the svg edge and the plotting canvas, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self { top, right, bottom, left }
    }

    /// Replace NaN sides with zero.
    pub fn sanitized(self) -> Self {
        let fix = |v: f64| if v.is_nan() { 0.0 } else { v };
        Self {
            top: fix(self.top),
            right: fix(self.right),
            bottom: fix(self.bottom),
            left: fix(self.left),
        }
    }

    /// Total horizontal margin (left + right).
    pub fn hsum(&self) -> f64 { self.left + self.right }
    /// Total vertical margin (top + bottom).
    pub fn vsum(&self) -> f64 { self.top + self.bottom }
}

impl Default for Margin {
    fn default() -> Self {
        Self::new(20.0, 30.0, 20.0, 20.0)
    }
}

/// How the host delivers pointer input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Mouse,
    Touch,
}
