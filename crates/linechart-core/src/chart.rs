// File: crates/linechart-core/src/chart.rs
// Summary: Linechart widget: data intake, scaling, drawing into the host document, hover and selection.
// Notes:
// - Every document mutation happens under one short `RefCell` borrow that is
//   released before any event is dispatched.
// - Pointer coordinates are surface (svg) pixels; the canvas sits at the
//   left/top margin offset inside the svg.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::axis::{Axis, Orient};
use crate::dom::{Document, NodeId};
use crate::error::LinechartResult;
use crate::events::{CustomEvent, Host, Listener, ListenerId, HIDE_MENU, LINE_SELECTED};
use crate::extent::ChartExtent;
use crate::format::{DateFormat, NumberFormat, TickFormat};
use crate::geometry::polyline_distance;
use crate::hover::{collect_xvalues, nearest, Hover};
use crate::path::line_path;
use crate::scale::{LinearScale, Scale, ScaleKind, TimeScale, XScale};
use crate::series::{Dataset, PlotSeries};
use crate::theme::{OrdinalPalette, Theme};
use crate::types::{InputMode, Margin, DEFAULT_LOCALE, DEFAULT_TICKS};

/// Construction options. `Default` gives the stock margins, `en-GB`, 10 ticks per axis.
pub struct LinechartOptions {
    /// Element the svg is appended to; the document body when `None`.
    pub container: Option<NodeId>,
    pub data: Dataset,
    /// Formatter for x tick labels. When unset, numeric axes use a two-digit
    /// decimal format and time axes a multi-scale date format.
    pub format_x: Option<Box<dyn TickFormat>>,
    pub format_y: Option<Box<dyn TickFormat>>,
    pub locale: String,
    pub margin: Margin,
    pub ticks_x: usize,
    pub ticks_y: usize,
    pub input: InputMode,
    pub theme: Theme,
    /// Baseline pulled into the extents when the data sits above it.
    pub origin: f64,
}

impl Default for LinechartOptions {
    fn default() -> Self {
        Self {
            container: None,
            data: Dataset::default(),
            format_x: None,
            format_y: None,
            locale: DEFAULT_LOCALE.to_string(),
            margin: Margin::default(),
            ticks_x: DEFAULT_TICKS,
            ticks_y: DEFAULT_TICKS,
            input: InputMode::default(),
            theme: Theme::default(),
            origin: 0.0,
        }
    }
}

impl LinechartOptions {
    pub fn new(data: Dataset) -> Self {
        Self { data, ..Self::default() }
    }
}

/// Handles to the elements a drawn chart owns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Elements {
    svg: NodeId,
    canvas: NodeId,
}

pub struct Linechart {
    host: Rc<Host>,
    pub container: NodeId,
    pub locale: String,
    pub margin: Margin,
    pub origin: f64,
    pub ticks_x: usize,
    pub ticks_y: usize,
    pub input: InputMode,
    pub theme: Theme,
    pub w: f64,
    pub h: f64,
    pub rw: f64,
    pub rh: f64,

    format_x: Box<dyn TickFormat>,
    format_y: Box<dyn TickFormat>,
    custom_format_x: bool,
    date_format: DateFormat,
    palette: OrdinalPalette,

    data: Dataset,
    plot: Vec<PlotSeries>,
    xvalues: Vec<f64>,
    extent: ChartExtent,
    scale_x: XScale,
    scale_y: LinearScale,

    id: String,
    elements: Option<Elements>,
    axis_x: Option<NodeId>,
    axis_y: Option<NodeId>,
    series_group: Option<NodeId>,
    paths: Vec<NodeId>,
    marker: Rc<Cell<Option<NodeId>>>,
    hide_listener: Option<ListenerId>,

    hover: Option<Hover>,
    selected: Option<NodeId>,
}

impl Linechart {
    /// Measure the container, then load `opts.data`. Nothing is drawn until `draw`.
    pub fn new(host: Rc<Host>, opts: LinechartOptions) -> Self {
        let margin = opts.margin.sanitized();
        let container = opts.container.unwrap_or_else(|| host.document.borrow().body());
        let (w, h) = host.document.borrow().bounding_box(container);
        let custom_format_x = opts.format_x.is_some();
        let format_x = opts
            .format_x
            .unwrap_or_else(|| Box::new(NumberFormat::decimal(&opts.locale, 2)) as Box<dyn TickFormat>);
        let format_y = opts
            .format_y
            .unwrap_or_else(|| Box::new(NumberFormat::decimal(&opts.locale, 2)) as Box<dyn TickFormat>);

        let mut chart = Self {
            host,
            container,
            date_format: DateFormat::multi(&opts.locale),
            locale: opts.locale,
            margin,
            origin: opts.origin,
            ticks_x: opts.ticks_x,
            ticks_y: opts.ticks_y,
            input: opts.input,
            theme: opts.theme,
            w,
            h,
            rw: w - margin.hsum(),
            rh: h - margin.vsum(),
            format_x,
            format_y,
            custom_format_x,
            palette: OrdinalPalette::new(),
            data: Dataset::default(),
            plot: Vec::new(),
            xvalues: Vec::new(),
            extent: ChartExtent { x: None, x_is_date: false, y: None },
            scale_x: XScale::Linear(LinearScale::new((0.0, 0.0), (0.0, 0.0))),
            scale_y: LinearScale::new((0.0, 0.0), (0.0, 0.0)),
            id: String::new(),
            elements: None,
            axis_x: None,
            axis_y: None,
            series_group: None,
            paths: Vec::new(),
            marker: Rc::new(Cell::new(None)),
            hide_listener: None,
            hover: None,
            selected: None,
        };
        chart.data(opts.data);
        chart
    }

    /// Replace the dataset and recompute extents and scales. Before the first
    /// `draw` nothing is shown; once drawn, the chart redraws with the new data.
    /// Missing colours come from the palette; date-like x text becomes dates.
    pub fn data(&mut self, mut data: Dataset) -> &mut Self {
        for s in &mut data.series {
            if s.color.is_none() {
                s.color = Some(self.palette.color(&s.label).to_string());
            }
            for (x, _) in &mut s.values {
                *x = x.normalized();
            }
        }
        self.plot = data
            .series
            .iter()
            .map(|s| PlotSeries {
                label: s.label.clone(),
                color: s.color.clone().unwrap_or_default(),
                points: s.plot_points(),
            })
            .collect();
        self.xvalues = collect_xvalues(&self.plot);
        self.data = data;
        self.hover = None;
        self.scaling_extent().scaling();
        tracing::debug!(
            series = self.plot.len(),
            xvalues = self.xvalues.len(),
            x_domain = ?self.scale_x.domain(),
            y_domain = ?self.scale_y.domain(),
            "linechart data replaced"
        );
        if self.elements.is_some() {
            self.draw();
        }
        self
    }

    /// Like `data`, but rejects x values that are neither numbers nor dates.
    pub fn try_data(&mut self, data: Dataset) -> LinechartResult<&mut Self> {
        for s in &data.series {
            s.try_plot_points()?;
        }
        Ok(self.data(data))
    }

    /// Re-measure the container and rescale; redraws when already drawn.
    pub fn resize(&mut self) -> &mut Self {
        let (w, h) = self.host.document.borrow().bounding_box(self.container);
        self.w = w;
        self.h = h;
        self.rw = w - self.margin.hsum();
        self.rh = h - self.margin.vsum();
        self.scaling();
        if self.elements.is_some() {
            self.draw();
        }
        self
    }

    fn scaling_extent(&mut self) -> &mut Self {
        self.extent = ChartExtent::compute(&self.plot, self.origin);
        self
    }

    fn scaling(&mut self) -> &mut Self {
        let x = self.extent.x.map(|e| e.as_tuple()).unwrap_or((0.0, 0.0));
        let y = self.extent.y.map(|e| e.as_tuple()).unwrap_or((0.0, 0.0));
        self.scale_x = if self.extent.x_is_date {
            XScale::Time(TimeScale::new(x, (0.0, self.rw)).nice(self.ticks_x))
        } else {
            XScale::Linear(LinearScale::new(x, (0.0, self.rw)).nice(self.ticks_x))
        };
        self.scale_y = LinearScale::new(y, (self.rh, 0.0)).nice(self.ticks_y);
        self
    }

    /// Create or update the svg, axes, series paths and hover marker.
    pub fn draw(&mut self) -> &mut Self {
        let host = Rc::clone(&self.host);
        let mut doc = host.document.borrow_mut();
        let el = self.draw_canvas(&mut doc);
        self.draw_axes(&mut doc, el);
        self.draw_series(&mut doc, el);
        self.draw_marker(&mut doc, el);
        tracing::debug!(id = %self.id, paths = self.paths.len(), w = self.w, h = self.h, "linechart drawn");
        self
    }

    fn draw_canvas(&mut self, doc: &mut Document) -> Elements {
        if let Some(el) = self.elements.filter(|el| doc.contains(el.svg)) {
            doc.set_attr(el.svg, "width", self.w);
            doc.set_attr(el.svg, "height", self.h);
            doc.set_attr(el.canvas, "transform", format!("translate({},{})", self.margin.left, self.margin.top));
            return el;
        }
        self.forget_elements();

        let existing = doc.select_all(doc.body(), "svg.linechart").len();
        self.id = format!("linechart{existing}");
        let svg = doc.append(self.container, "svg");
        doc.set_attr(svg, "id", &self.id);
        doc.classed(svg, "linechart", true);
        doc.set_attr(svg, "width", self.w);
        doc.set_attr(svg, "height", self.h);
        let style = doc.append(svg, "style");
        doc.set_text(style, Some(&self.theme.stylesheet()));

        let canvas = doc.append(svg, "g");
        doc.classed(canvas, "canvas", true);
        doc.set_attr(canvas, "transform", format!("translate({},{})", self.margin.left, self.margin.top));
        if self.input == InputMode::Touch {
            doc.set_style(canvas, "-webkit-tap-highlight-color", "transparent");
        }

        let weak = Rc::downgrade(&self.host);
        let marker = Rc::clone(&self.marker);
        let on_hide: Listener = Rc::new(move |_: &CustomEvent| {
            let (Some(host), Some(dot)) = (weak.upgrade(), marker.get()) else { return };
            if let Ok(mut doc) = host.document.try_borrow_mut() {
                doc.set_attr(dot, "display", "none");
            };
        });
        self.hide_listener = Some(self.host.window.add_event_listener(HIDE_MENU, on_hide));

        let el = Elements { svg, canvas };
        self.elements = Some(el);
        el
    }

    fn draw_axes(&mut self, doc: &mut Document, el: Elements) {
        let gx = *self.axis_x.get_or_insert_with(|| {
            let g = doc.append(el.canvas, "g");
            doc.classed(g, "line-axis-x", true);
            g
        });
        doc.set_attr(gx, "transform", format!("translate(0,{})", self.rh));
        let fx: &dyn TickFormat = match self.scale_x.kind() {
            ScaleKind::Time if !self.custom_format_x => &self.date_format,
            _ => self.format_x.as_ref(),
        };
        Axis::new(Orient::Bottom, &self.scale_x, self.ticks_x, fx).render(doc, gx);

        let gy = *self.axis_y.get_or_insert_with(|| {
            let g = doc.append(el.canvas, "g");
            doc.classed(g, "line-axis-y", true);
            doc.set_attr(g, "transform", "translate(0,0)");
            g
        });
        Axis::new(Orient::Left, &self.scale_y, self.ticks_y, self.format_y.as_ref()).render(doc, gy);

        let lx = doc.select(el.canvas, "text.line-axis-x-text").unwrap_or_else(|| {
            let t = doc.append(el.canvas, "text");
            doc.classed(t, "line-axis-x-text", true);
            doc.set_attr(t, "text-anchor", "end");
            t
        });
        doc.set_attr(lx, "x", self.rw);
        doc.set_attr(lx, "y", self.rh - 10.0);
        doc.set_text(lx, self.data.axis_label_x());

        let ly = doc.select(el.canvas, "text.line-axis-y-text").unwrap_or_else(|| {
            let t = doc.append(el.canvas, "text");
            doc.classed(t, "line-axis-y-text", true);
            doc.set_attr(t, "text-anchor", "start");
            doc.set_attr(t, "x", 10);
            doc.set_attr(t, "y", 0);
            t
        });
        doc.set_text(ly, self.data.axis_label_y());
    }

    fn draw_series(&mut self, doc: &mut Document, el: Elements) {
        let g = *self.series_group.get_or_insert_with(|| {
            let g = doc.append(el.canvas, "g");
            doc.classed(g, "series", true);
            g
        });

        let existing = doc.select_children(g, "path.linechart");
        let mut paths = Vec::with_capacity(self.plot.len());
        for (i, s) in self.plot.iter().enumerate() {
            let pid = format!("{}_p{i}", self.id);
            let path = match existing.iter().copied().find(|p| doc.attr(*p, "id") == Some(pid.as_str())) {
                Some(p) => p,
                None => {
                    let p = doc.append(g, "path");
                    doc.set_attr(p, "id", &pid);
                    doc.classed(p, "linechart", true);
                    doc.set_style(p, "mix-blend-mode", "multiply");
                    doc.append(p, "title");
                    p
                }
            };
            let pts: Vec<(f64, f64)> = s
                .points
                .iter()
                .map(|p| (self.scale_x.apply(p.x), self.scale_y.apply(p.y)))
                .collect();
            match line_path(&pts) {
                Some(d) => doc.set_attr(path, "d", d),
                None => doc.remove_attr(path, "d"),
            }
            doc.set_style(path, "stroke", &s.color);
            if let Some(title) = doc.select_children(path, "title").first().copied() {
                doc.set_text(title, Some(&s.label));
            }
            paths.push(path);
        }
        for stale in existing.into_iter().filter(|p| !paths.contains(p)) {
            doc.remove(stale);
        }
        if self.selected.is_some_and(|s| !paths.contains(&s)) {
            self.selected = None;
        }
        self.paths = paths;
    }

    fn draw_marker(&mut self, doc: &mut Document, el: Elements) {
        if self.marker.get().is_some_and(|m| doc.contains(m)) {
            return;
        }
        let dot = doc.append(el.canvas, "g");
        doc.classed(dot, "marker", true);
        doc.set_attr(dot, "display", "none");
        doc.set_attr(dot, "fill", self.theme.marker);
        let circle = doc.append(dot, "circle");
        doc.set_attr(circle, "r", 2.5);
        let text = doc.append(dot, "text");
        doc.set_attr(text, "font-family", "sans-serif");
        doc.set_attr(text, "font-size", 10);
        doc.set_attr(text, "text-anchor", "middle");
        doc.set_attr(text, "y", -8);
        self.marker.set(Some(dot));
    }

    /// Pointer entered the canvas: mute every series and show the marker.
    pub fn pointer_enter(&mut self) {
        let Some(dot) = self.marker.get() else { return };
        let mut doc = self.host.document.borrow_mut();
        for p in &self.paths {
            doc.remove_style(*p, "mix-blend-mode");
            doc.set_style(*p, "stroke", self.theme.muted_stroke);
        }
        doc.remove_attr(dot, "display");
    }

    /// Pointer moved to surface coordinates `(x, y)`: move the marker to the
    /// nearest point and highlight its series.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<Hover> {
        let dot = self.marker.get()?;
        let (cx, cy) = (x - self.margin.left, y - self.margin.top);
        let xm = self.scale_x.invert(cx);
        let ym = self.scale_y.invert(cy);
        let hit = nearest(&self.xvalues, &self.plot, xm, ym);
        tracing::trace!(x, y, xm, ym, hit = ?hit.as_ref().map(|h| h.series), "pointer move");
        let h = hit?;

        let mut doc = self.host.document.borrow_mut();
        for (i, (p, s)) in self.paths.iter().zip(&self.plot).enumerate() {
            let stroke = if i == h.series { s.color.as_str() } else { self.theme.muted_stroke };
            doc.set_style(*p, "stroke", stroke);
        }
        if let Some(p) = self.paths.get(h.series) {
            doc.raise(*p);
        }
        doc.remove_attr(dot, "display");
        doc.set_attr(
            dot,
            "transform",
            format!("translate({},{})", self.scale_x.apply(h.x), self.scale_y.apply(h.y)),
        );
        if let Some(text) = doc.select(dot, "text") {
            doc.set_text(text, Some(&h.label));
        }
        self.hover = Some(h.clone());
        Some(h)
    }

    /// Pointer left the canvas: restore series colours and hide the marker.
    pub fn pointer_leave(&mut self) {
        let Some(dot) = self.marker.get() else { return };
        let mut doc = self.host.document.borrow_mut();
        for (p, s) in self.paths.iter().zip(&self.plot) {
            doc.set_style(*p, "mix-blend-mode", "multiply");
            doc.set_style(*p, "stroke", &s.color);
        }
        doc.set_attr(dot, "display", "none");
        self.hover = None;
    }

    /// Select the series drawn by `node`: it gains `selected`, every other
    /// series `fade`, and `line-selected` is dispatched on the window.
    /// Returns false when `node` is not one of this chart's paths.
    pub fn click_series(&mut self, node: NodeId) -> bool {
        if !self.paths.contains(&node) {
            return false;
        }
        self.clear_selection();
        let id = self.host.document.borrow().attr(node, "id").map(str::to_string);
        tracing::debug!(?id, "series selected");
        self.host.dispatch(&CustomEvent::with_element(LINE_SELECTED, node, id));

        let mut doc = self.host.document.borrow_mut();
        for p in &self.paths {
            if *p == node {
                doc.classed(*p, "selected", true);
            } else {
                doc.classed(*p, "fade", true);
            }
        }
        self.selected = Some(node);
        true
    }

    /// Click on the chart background.
    pub fn click_background(&mut self) {
        self.clear_selection();
    }

    /// Click at surface coordinates: select the series under the pointer or clear.
    pub fn click_at(&mut self, x: f64, y: f64) -> Option<usize> {
        match self.series_at(x, y).and_then(|i| Some((i, *self.paths.get(i)?))) {
            Some((i, path)) => {
                self.click_series(path);
                Some(i)
            }
            None => {
                self.click_background();
                None
            }
        }
    }

    /// Series whose drawn line passes within the theme's hit tolerance of
    /// surface coordinates `(x, y)`; the closest wins.
    pub fn series_at(&self, x: f64, y: f64) -> Option<usize> {
        if self.elements.is_none() {
            return None;
        }
        let p = (x - self.margin.left, y - self.margin.top);
        let reach = self.theme.hit_tolerance + self.theme.selected_stroke_width * 0.5;
        self.plot
            .iter()
            .enumerate()
            .filter_map(|(i, s)| {
                let d = self
                    .projected_runs(s)
                    .iter()
                    .map(|run| polyline_distance(p, run))
                    .fold(f64::INFINITY, f64::min);
                (d <= reach).then_some((i, d))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    fn projected_runs(&self, s: &PlotSeries) -> Vec<Vec<(f64, f64)>> {
        let mut runs = vec![Vec::new()];
        for p in &s.points {
            let q = (self.scale_x.apply(p.x), self.scale_y.apply(p.y));
            if q.0.is_finite() && q.1.is_finite() {
                if let Some(run) = runs.last_mut() {
                    run.push(q);
                }
            } else if runs.last().is_some_and(|r| !r.is_empty()) {
                runs.push(Vec::new());
            }
        }
        runs
    }

    /// Remove `selected` and `fade` from every element of this chart.
    pub fn clear_selection(&mut self) -> &mut Self {
        if let Some(el) = self.elements {
            let mut doc = self.host.document.borrow_mut();
            for n in doc.select_all(el.svg, ".selected") {
                doc.classed(n, "selected", false);
            }
            for n in doc.select_all(el.svg, ".fade") {
                doc.classed(n, "fade", false);
            }
        }
        self.selected = None;
        self
    }

    /// Remove the svg from the document and stop listening for `hide-menu`.
    pub fn destroy(&mut self) -> &mut Self {
        if let Some(el) = self.elements {
            self.host.document.borrow_mut().remove(el.svg);
            tracing::debug!(id = %self.id, "linechart destroyed");
        }
        self.forget_elements();
        self
    }

    fn forget_elements(&mut self) {
        if let Some(l) = self.hide_listener.take() {
            self.host.window.remove_event_listener(l);
        }
        self.elements = None;
        self.axis_x = None;
        self.axis_y = None;
        self.series_group = None;
        self.paths.clear();
        self.marker.set(None);
        self.hover = None;
        self.selected = None;
    }

    pub fn host(&self) -> &Rc<Host> { &self.host }
    /// `linechartN`; empty until first drawn.
    pub fn id(&self) -> &str { &self.id }
    pub fn svg(&self) -> Option<NodeId> { self.elements.map(|e| e.svg) }
    pub fn canvas(&self) -> Option<NodeId> { self.elements.map(|e| e.canvas) }
    /// Path element per series, in series order.
    pub fn paths(&self) -> &[NodeId] { &self.paths }
    pub fn marker(&self) -> Option<NodeId> { self.marker.get() }
    pub fn dataset(&self) -> &Dataset { &self.data }
    pub fn plot_series(&self) -> &[PlotSeries] { &self.plot }
    pub fn xvalues(&self) -> &[f64] { &self.xvalues }
    pub fn extent(&self) -> &ChartExtent { &self.extent }
    pub fn scale_x(&self) -> &XScale { &self.scale_x }
    pub fn scale_y(&self) -> &LinearScale { &self.scale_y }

    /// Current marker position while it is shown.
    pub fn hover(&self) -> Option<&Hover> {
        let dot = self.marker.get()?;
        let hidden = self.host.document.borrow().attr(dot, "display") == Some("none");
        self.hover.as_ref().filter(|_| !hidden)
    }

    /// Index of the selected series.
    pub fn selected(&self) -> Option<usize> {
        let node = self.selected?;
        self.paths.iter().position(|p| *p == node)
    }
}

impl Drop for Linechart {
    fn drop(&mut self) {
        if let Some(l) = self.hide_listener.take() {
            self.host.window.remove_event_listener(l);
        }
    }
}

impl fmt::Display for Linechart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("data:\n")?;
        let lines: Vec<String> = self.data.series.iter().map(|s| s.to_string()).collect();
        f.write_str(&lines.join("\n"))
    }
}
