// File: crates/linechart-core/src/render.rs
// Summary: Headless raster pipeline: paints a drawn chart's svg subtree with Skia CPU surfaces.
// Notes:
// - Only the element kinds the chart produces are painted: g/svg (translate
//   transforms), path (M/L data), line, circle and text.
// - Class rules mirror the stylesheet embedded in SVG output (`Theme::stylesheet`).

use anyhow::{Context, Result};
use skia_safe as skia;

use crate::chart::Linechart;
use crate::color::{parse_css_color, Rgba};
use crate::dom::{Document, NodeId};
use crate::error::LinechartError;
use crate::path::parse_path;
use crate::text::{TextAnchor, TextShaper};
use crate::theme::Theme;

pub struct RenderOptions {
    /// Canvas clear colour; the theme background when `None`.
    pub background: Option<Rgba>,
    /// Text is skipped when false, which keeps output identical across font setups.
    pub draw_labels: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { background: None, draw_labels: true }
    }
}

/// Presentation state inherited down the tree.
#[derive(Clone, Copy, Debug)]
struct Inherited {
    fill: Option<Rgba>,
    stroke: Option<Rgba>,
    stroke_width: f32,
    font_size: f32,
    anchor: TextAnchor,
    opacity: f64,
    multiply: bool,
}

impl Inherited {
    fn root() -> Self {
        Self {
            fill: Some(Rgba::new(0, 0, 0, 255)),
            stroke: None,
            stroke_width: 1.0,
            font_size: 16.0,
            anchor: TextAnchor::Start,
            opacity: 1.0,
            multiply: false,
        }
    }
}

struct Painter<'a> {
    doc: &'a Document,
    theme: &'a Theme,
    text: Option<TextShaper>,
}

impl<'a> Painter<'a> {
    /// Inline style wins over class rules, which win over attributes.
    fn property(&self, node: NodeId, name: &str) -> Option<String> {
        if let Some(v) = self.doc.style(node, name) {
            return Some(v.to_string());
        }
        if let Some(v) = self.class_rule(node, name) {
            return Some(v);
        }
        self.doc.attr(node, name).map(str::to_string)
    }

    fn class_rule(&self, node: NodeId, name: &str) -> Option<String> {
        let doc = self.doc;
        let t = self.theme;
        if doc.tag(node) == Some("path") && doc.has_class(node, "linechart") {
            return match name {
                "fill" => Some("none".into()),
                "stroke-width" if doc.has_class(node, "selected") => Some(t.selected_stroke_width.to_string()),
                "stroke-width" => Some(t.stroke_width.to_string()),
                "opacity" if doc.has_class(node, "fade") => Some(t.fade_opacity.to_string()),
                _ => None,
            };
        }
        if doc.has_class(node, "line-axis-x-text") || doc.has_class(node, "line-axis-y-text") {
            return match name {
                "fill" => Some(t.axis_label.into()),
                "font-size" => Some("10".into()),
                _ => None,
            };
        }
        None
    }

    fn paint_color(&self, value: &str) -> Option<Option<Rgba>> {
        match value.trim() {
            "none" => Some(None),
            "currentColor" => Some(parse_css_color(self.theme.axis)),
            other => parse_css_color(other).map(Some),
        }
    }

    fn resolve(&self, node: NodeId, parent: Inherited) -> Inherited {
        let mut st = parent;
        if let Some(c) = self.property(node, "fill").and_then(|v| self.paint_color(&v)) {
            st.fill = c;
        }
        if let Some(c) = self.property(node, "stroke").and_then(|v| self.paint_color(&v)) {
            st.stroke = c;
        }
        if let Some(w) = self.property(node, "stroke-width").and_then(|v| v.parse::<f32>().ok()) {
            st.stroke_width = w;
        }
        if let Some(s) = self.property(node, "font-size").and_then(|v| v.trim_end_matches("px").parse::<f32>().ok()) {
            st.font_size = s;
        }
        if let Some(a) = self.property(node, "text-anchor") {
            st.anchor = TextAnchor::parse(&a);
        }
        if let Some(o) = self.property(node, "opacity").and_then(|v| v.parse::<f64>().ok()) {
            st.opacity *= o.clamp(0.0, 1.0);
        }
        st.multiply = self.property(node, "mix-blend-mode").as_deref() == Some("multiply");
        st
    }

    fn num(&self, node: NodeId, name: &str) -> f32 {
        self.doc.attr(node, name).and_then(|v| v.parse::<f32>().ok()).unwrap_or(0.0)
    }

    fn paint_node(&self, canvas: &skia::Canvas, node: NodeId, parent: Inherited) {
        let Some(tag) = self.doc.tag(node) else { return };
        if matches!(tag, "style" | "title") || self.property(node, "display").as_deref() == Some("none") {
            return;
        }
        let st = self.resolve(node, parent);

        canvas.save();
        if let Some((dx, dy)) = self.doc.attr(node, "transform").and_then(parse_translate) {
            canvas.translate((dx, dy));
        }
        match tag {
            "path" => {
                if let Some(d) = self.doc.attr(node, "d") {
                    let mut path = skia::Path::new();
                    for run in parse_path(d) {
                        let mut pts = run.into_iter();
                        if let Some((x, y)) = pts.next() {
                            path.move_to((x as f32, y as f32));
                        }
                        for (x, y) in pts {
                            path.line_to((x as f32, y as f32));
                        }
                    }
                    self.fill_and_stroke(canvas, &st, |c, p| {
                        c.draw_path(&path, p);
                    });
                }
            }
            "line" => {
                if let Some(paint) = stroke_paint(&st) {
                    let a = (self.num(node, "x1"), self.num(node, "y1"));
                    let b = (self.num(node, "x2"), self.num(node, "y2"));
                    canvas.draw_line(a, b, &paint);
                }
            }
            "circle" => {
                let center = (self.num(node, "cx"), self.num(node, "cy"));
                let r = self.num(node, "r");
                self.fill_and_stroke(canvas, &st, |c, p| {
                    c.draw_circle(center, r, p);
                });
            }
            "text" => self.paint_text(canvas, node, &st),
            _ => {}
        }
        for child in self.doc.children(node) {
            self.paint_node(canvas, *child, st);
        }
        canvas.restore();
    }

    fn fill_and_stroke(&self, canvas: &skia::Canvas, st: &Inherited, draw: impl Fn(&skia::Canvas, &skia::Paint)) {
        if let Some(fill) = st.fill {
            let mut paint = base_paint(fill, st);
            paint.set_style(skia::paint::Style::Fill);
            draw(canvas, &paint);
        }
        if let Some(paint) = stroke_paint(st) {
            draw(canvas, &paint);
        }
    }

    fn paint_text(&self, canvas: &skia::Canvas, node: NodeId, st: &Inherited) {
        let (Some(shaper), Some(text), Some(fill)) = (&self.text, self.doc.text(node), st.fill) else { return };
        if text.is_empty() {
            return;
        }
        let dy = self
            .doc
            .attr(node, "dy")
            .and_then(|v| v.strip_suffix("em").and_then(|e| e.parse::<f32>().ok()))
            .map(|em| em * st.font_size)
            .unwrap_or(0.0);
        let color = to_skia(fill.with_opacity(st.opacity));
        shaper.draw(
            canvas,
            text,
            self.num(node, "x"),
            self.num(node, "y") + dy,
            st.font_size,
            color,
            st.anchor,
        );
    }
}

fn to_skia(c: Rgba) -> skia::Color {
    skia::Color::from_argb(c.a, c.r, c.g, c.b)
}

fn base_paint(color: Rgba, st: &Inherited) -> skia::Paint {
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_color(to_skia(color.with_opacity(st.opacity)));
    if st.multiply {
        paint.set_blend_mode(skia::BlendMode::Multiply);
    }
    paint
}

fn stroke_paint(st: &Inherited) -> Option<skia::Paint> {
    let stroke = st.stroke?;
    let mut paint = base_paint(stroke, st);
    paint.set_style(skia::paint::Style::Stroke);
    paint.set_stroke_width(st.stroke_width);
    Some(paint)
}

/// `translate(x,y)` or `translate(x y)`; a missing y is 0.
fn parse_translate(s: &str) -> Option<(f32, f32)> {
    let inner = s.trim().strip_prefix("translate(")?.strip_suffix(')')?;
    let mut parts = inner.split([',', ' ']).filter(|p| !p.is_empty());
    let x = parts.next()?.parse::<f32>().ok()?;
    let y = parts.next().map(|p| p.parse::<f32>()).transpose().ok()?.unwrap_or(0.0);
    Some((x, y))
}

/// Paint the subtree rooted at `svg` onto a new raster surface sized from its
/// width/height attributes.
pub fn render_surface(doc: &Document, svg: NodeId, theme: &Theme, opts: &RenderOptions) -> Result<skia::Surface> {
    doc.try_element(svg)?;
    let (w, h) = doc.bounding_box(svg);
    let (width, height) = ((w.round() as i32).max(1), (h.round() as i32).max(1));
    let mut surface = skia::surfaces::raster_n32_premul((width, height))
        .ok_or(LinechartError::Surface { width, height })?;
    let canvas = surface.canvas();

    let background = opts.background.or_else(|| parse_css_color(theme.background));
    canvas.clear(background.map(to_skia).unwrap_or(skia::Color::WHITE));

    let painter = Painter { doc, theme, text: opts.draw_labels.then(TextShaper::new) };
    painter.paint_node(canvas, svg, Inherited::root());
    tracing::trace!(width, height, "document painted");
    Ok(surface)
}

impl Linechart {
    fn surface(&self, opts: &RenderOptions) -> Result<skia::Surface> {
        let svg = self.svg().ok_or(LinechartError::NotDrawn)?;
        let doc = self.host().document.borrow();
        render_surface(&doc, svg, &self.theme, opts)
    }

    /// Render the drawn chart to PNG bytes.
    pub fn render_to_png_bytes(&self, opts: &RenderOptions) -> Result<Vec<u8>> {
        let mut surface = self.surface(opts)?;
        let image = surface.image_snapshot();
        #[allow(deprecated)]
        let data = image
            .encode_to_data(skia::EncodedImageFormat::PNG)
            .ok_or_else(|| anyhow::anyhow!("encode PNG failed"))?;
        Ok(data.as_bytes().to_vec())
    }

    /// Render the drawn chart to a PNG at `output_png_path`, creating parent directories.
    pub fn render_to_png(&self, opts: &RenderOptions, output_png_path: impl AsRef<std::path::Path>) -> Result<()> {
        let bytes = self.render_to_png_bytes(opts)?;
        let path = output_png_path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create '{}'", parent.display()))?;
        }
        std::fs::write(path, bytes).with_context(|| format!("failed to write '{}'", path.display()))?;
        Ok(())
    }

    /// Unpremultiplied RGBA pixels: `(pixels, width, height, row_bytes)`.
    pub fn render_to_rgba8(&self, opts: &RenderOptions) -> Result<(Vec<u8>, i32, i32, usize)> {
        let mut surface = self.surface(opts)?;
        let (w, h) = (surface.width(), surface.height());
        let info = skia::ImageInfo::new((w, h), skia::ColorType::RGBA8888, skia::AlphaType::Unpremul, None);
        let row_bytes = w as usize * 4;
        let mut pixels = vec![0u8; row_bytes * h as usize];
        if !surface.read_pixels(&info, &mut pixels, row_bytes, (0, 0)) {
            anyhow::bail!("failed to read back {w}x{h} pixels");
        }
        Ok((pixels, w, h, row_bytes))
    }
}
