// File: crates/linechart-core/src/theme.rs
// Summary: Light/Dark theming, the class stylesheet and the categorical series palette.

use std::collections::HashMap;

/// The 12-colour "Paired" categorical scheme.
pub const SCHEME_PAIRED: [&str; 12] = [
    "#a6cee3", "#1f78b4", "#b2df8a", "#33a02c", "#fb9a99", "#e31a1c",
    "#fdbf6f", "#ff7f00", "#cab2d6", "#6a3d9a", "#ffff99", "#b15928",
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    pub name: &'static str,
    pub background: &'static str,
    /// Tick lines and tick labels (`currentColor` in axis output).
    pub axis: &'static str,
    pub axis_label: &'static str,
    /// Stroke for series that are not under the pointer while hovering.
    pub muted_stroke: &'static str,
    pub marker: &'static str,
    pub stroke_width: f64,
    pub selected_stroke_width: f64,
    pub fade_opacity: f64,
    /// Pointer distance, in pixels, within which a click hits a line.
    pub hit_tolerance: f64,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            name: "light",
            background: "#ffffff",
            axis: "#000000",
            axis_label: "#333333",
            muted_stroke: "#dddddd",
            marker: "#000000",
            stroke_width: 1.5,
            selected_stroke_width: 3.0,
            fade_opacity: 0.2,
            hit_tolerance: 4.0,
        }
    }

    pub fn dark() -> Self {
        Self {
            name: "dark",
            background: "#121214",
            axis: "#b4b4be",
            axis_label: "#ebebf5",
            muted_stroke: "#3a3a40",
            marker: "#ffe646",
            ..Self::light()
        }
    }

    pub fn high_contrast_dark() -> Self {
        Self {
            name: "high-contrast-dark",
            background: "#000000",
            axis: "#ffffff",
            axis_label: "#ffffff",
            muted_stroke: "#444444",
            marker: "#ffff00",
            selected_stroke_width: 4.0,
            fade_opacity: 0.35,
            ..Self::light()
        }
    }

    /// CSS rules for the classes the chart toggles; embedded in SVG output.
    pub fn stylesheet(&self) -> String {
        format!(
            "svg.linechart path.linechart{{fill:none;stroke-width:{sw}}}\
             svg.linechart path.linechart.selected{{stroke-width:{ssw}}}\
             svg.linechart path.linechart.fade{{opacity:{fo}}}\
             svg.linechart .line-axis-x-text,svg.linechart .line-axis-y-text{{fill:{lbl};font:10px sans-serif}}",
            sw = self.stroke_width,
            ssw = self.selected_stroke_width,
            fo = self.fade_opacity,
            lbl = self.axis_label,
        )
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

/// Return a list of built-in theme presets.
pub fn presets() -> Vec<Theme> {
    vec![Theme::light(), Theme::dark(), Theme::high_contrast_dark()]
}

/// Find a theme by its `name`, falling back to light.
pub fn find(name: &str) -> Theme {
    for t in presets() { if t.name.eq_ignore_ascii_case(name) { return t; } }
    Theme::light()
}

/// Ordinal colour scale: each new label takes the next scheme colour, wrapping around.
/// Labels keep their colour for the palette's lifetime.
#[derive(Clone, Debug, Default)]
pub struct OrdinalPalette {
    assigned: HashMap<String, usize>,
}

impl OrdinalPalette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color(&mut self, label: &str) -> &'static str {
        let next = self.assigned.len();
        let idx = *self.assigned.entry(label.to_string()).or_insert(next);
        SCHEME_PAIRED[idx % SCHEME_PAIRED.len()]
    }

    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}
