// File: crates/demo/src/main.rs
// Summary: Demo loads a JSON or CSV dataset, draws the line chart, simulates hover/selection and writes SVG + PNG.

use anyhow::{Context, Result};
use linechart_core::events::{EventDetail, HIDE_MENU, LINE_SELECTED};
use linechart_core::{theme, CustomEvent, Dataset, Host, Linechart, LinechartOptions, RenderOptions, Scale, Series, XValue};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Args: [data.json|data.csv] [theme]
    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(env!("CARGO_MANIFEST_DIR")).join("data/fruit.json"));
    let theme = theme::find(args.next().as_deref().unwrap_or("light"));
    tracing::info!(input = %path.display(), theme = theme.name, "loading dataset");

    let data = load_dataset(&path).with_context(|| format!("failed to load '{}'", path.display()))?;
    if data.series.is_empty() {
        anyhow::bail!("no series loaded from {}", path.display());
    }
    tracing::info!(series = data.series.len(), points = data.series.iter().map(|s| s.values.len()).sum::<usize>(), "dataset loaded");

    let host = Host::with_size(960.0, 540.0);
    host.window.add_event_listener(
        LINE_SELECTED,
        Rc::new(|e: &CustomEvent| {
            if let EventDetail::Element { id, .. } = &e.detail {
                tracing::info!(path = ?id, "line selected");
            }
        }),
    );

    let opts = LinechartOptions { theme, ..LinechartOptions::new(data) };
    let mut chart = Linechart::new(Rc::clone(&host), opts);
    chart.draw();
    println!("{chart}");

    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("chart").to_string();
    let out_dir = PathBuf::from("target/out");
    std::fs::create_dir_all(&out_dir).with_context(|| format!("failed to create '{}'", out_dir.display()))?;
    let render = RenderOptions::default();

    chart.render_to_png(&render, out_dir.join(format!("linechart_{stem}.png")))?;

    // Hover a third of the way across the plot, halfway down.
    let (px, py) = (chart.margin.left + chart.rw / 3.0, chart.margin.top + chart.rh / 2.0);
    chart.pointer_enter();
    match chart.pointer_move(px, py) {
        Some(hit) => tracing::info!(series = %hit.label, x = hit.x, y = hit.y, "hovering"),
        None => tracing::warn!(px, py, "nothing under the pointer"),
    }

    // Click the hovered point so its series becomes the selection.
    let click = chart.hover().map(|h| (h.x, h.y)).map(|(x, y)| {
        (chart.margin.left + chart.scale_x().apply(x), chart.margin.top + chart.scale_y().apply(y))
    });
    if let Some((cx, cy)) = click {
        let selected = chart.click_at(cx, cy);
        tracing::info!(?selected, "clicked hovered point");
    }
    chart.render_to_png(&render, out_dir.join(format!("linechart_{stem}_hover.png")))?;
    write_svg(&chart, &out_dir.join(format!("linechart_{stem}_hover.svg")))?;

    // A host closing its menus also hides the marker.
    host.dispatch(&CustomEvent::new(HIDE_MENU));
    chart.pointer_leave();
    write_svg(&chart, &out_dir.join(format!("linechart_{stem}.svg")))?;

    println!("Wrote charts to {}", out_dir.display());
    Ok(())
}

fn write_svg(chart: &Linechart, path: &Path) -> Result<()> {
    let svg = chart.svg().context("chart has not been drawn")?;
    let markup = chart.host().document.borrow().to_svg(svg)?;
    std::fs::write(path, markup).with_context(|| format!("failed to write '{}'", path.display()))?;
    tracing::info!(path = %path.display(), "wrote svg");
    Ok(())
}

fn load_dataset(path: &Path) -> Result<Dataset> {
    let ext = path.extension().map(|e| e.to_string_lossy().to_lowercase()).unwrap_or_default();
    match ext.as_str() {
        "csv" => load_csv(path),
        _ => {
            let text = std::fs::read_to_string(path)?;
            Ok(Dataset::from_json(&text)?)
        }
    }
}

/// Long-format CSV: `label,x,y[,color]`, one row per point.
fn load_csv(path: &Path) -> Result<Dataset> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers = rdr.headers()?.iter().map(|h| h.trim().to_lowercase()).collect::<Vec<_>>();
    let idx = |want: &str| headers.iter().position(|h| h == want);
    let (i_label, i_x, i_y) = match (idx("label"), idx("x"), idx("y")) {
        (Some(l), Some(x), Some(y)) => (l, x, y),
        _ => anyhow::bail!("expected label, x and y columns, found {headers:?}"),
    };
    let i_color = idx("color");

    let mut series: Vec<Series> = Vec::new();
    for (row, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let field = |i: usize| rec.get(i).map(str::trim).unwrap_or("");
        let label = field(i_label);
        let y = field(i_y).parse::<f64>().unwrap_or(f64::NAN);
        let x = match field(i_x).parse::<f64>() {
            Ok(n) => XValue::Number(n),
            Err(_) => XValue::Text(field(i_x).to_string()),
        };
        if y.is_nan() {
            tracing::warn!(row, label, "y is not a number");
        }

        let pos = match series.iter().position(|s| s.label == label) {
            Some(p) => p,
            None => {
                series.push(Series::new(label));
                series.len() - 1
            }
        };
        let s = &mut series[pos];
        if let Some(c) = i_color.map(field).filter(|c| !c.is_empty()) {
            s.color.get_or_insert_with(|| c.to_string());
        }
        s.push(x, y);
    }
    Ok(Dataset::new(series))
}
