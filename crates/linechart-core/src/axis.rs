// File: crates/linechart-core/src/axis.rs
// Summary: Axis model: tick generation from a scale and rendering into an axis group.

use crate::dom::{Document, NodeId};
use crate::format::TickFormat;
use crate::scale::Scale;

/// Length of a tick line, in pixels.
pub const TICK_SIZE: f64 = 6.0;
/// Gap between the tick line's end and its label.
pub const TICK_PADDING: f64 = 3.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orient {
    Bottom,
    Left,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AxisTick {
    pub value: f64,
    /// Position along the axis, in pixels.
    pub offset: f64,
    pub label: String,
}

pub struct Axis<'a> {
    pub orient: Orient,
    pub scale: &'a dyn Scale,
    pub count: usize,
    pub format: &'a dyn TickFormat,
}

impl<'a> Axis<'a> {
    pub fn new(orient: Orient, scale: &'a dyn Scale, count: usize, format: &'a dyn TickFormat) -> Self {
        Self { orient, scale, count, format }
    }

    pub fn ticks(&self) -> Vec<AxisTick> {
        self.scale
            .ticks(self.count)
            .into_iter()
            .map(|value| AxisTick {
                value,
                offset: self.scale.apply(value),
                label: self.format.format_value(value),
            })
            .collect()
    }

    /// Bring the tick groups under `group` in line with the current ticks.
    /// Existing groups are updated in place; only the surplus is removed. No
    /// domain line is drawn.
    pub fn render(&self, doc: &mut Document, group: NodeId) -> Vec<AxisTick> {
        doc.set_attr(group, "fill", "none");
        doc.set_attr(group, "font-size", 10);
        doc.set_attr(group, "font-family", "sans-serif");
        doc.set_attr(
            group,
            "text-anchor",
            match self.orient {
                Orient::Bottom => "middle",
                Orient::Left => "end",
            },
        );

        let ticks = self.ticks();
        let existing = doc.select_children(group, "g.tick");
        for old in existing.iter().skip(ticks.len()) {
            doc.remove(*old);
        }

        let spacing = TICK_SIZE + TICK_PADDING;
        for (i, t) in ticks.iter().enumerate() {
            let g = match existing.get(i) {
                Some(g) => *g,
                None => {
                    let g = doc.append(group, "g");
                    doc.classed(g, "tick", true);
                    doc.set_attr(g, "opacity", 1);
                    let line = doc.append(g, "line");
                    doc.set_attr(line, "stroke", "currentColor");
                    let text = doc.append(g, "text");
                    doc.set_attr(text, "fill", "currentColor");
                    g
                }
            };
            let line = doc.select_children(g, "line").first().copied();
            let text = doc.select_children(g, "text").first().copied();
            let (Some(line), Some(text)) = (line, text) else { continue };
            match self.orient {
                Orient::Bottom => {
                    doc.set_attr(g, "transform", format!("translate({},0)", t.offset));
                    doc.set_attr(line, "y2", TICK_SIZE);
                    doc.set_attr(text, "y", spacing);
                    doc.set_attr(text, "dy", "0.71em");
                }
                Orient::Left => {
                    doc.set_attr(g, "transform", format!("translate(0,{})", t.offset));
                    doc.set_attr(line, "x2", -TICK_SIZE);
                    doc.set_attr(text, "x", -spacing);
                    doc.set_attr(text, "dy", "0.32em");
                }
            }
            doc.set_text(text, Some(&t.label));
        }
        ticks
    }
}
