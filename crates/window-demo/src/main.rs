// File: crates/window-demo/src/main.rs
// Summary: Windowed demo that drives linechart-core with real pointer input and blits its RGBA raster (CPU) using winit + softbuffer.
// Keys: Esc dispatches `hide-menu`, C clears the selection.

use anyhow::{Context, Result};
use linechart_core::{CustomEvent, Dataset, Host, Linechart, LinechartOptions, RenderOptions, HIDE_MENU};
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;
use winit::event::{ElementState, Event, KeyboardInput, MouseButton, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Arg: dataset JSON (defaults to the demo crate's fruit sample)
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../demo/data/fruit.json"));
    let text = std::fs::read_to_string(&path).with_context(|| format!("failed to read '{}'", path.display()))?;
    let data = Dataset::from_json(&text).with_context(|| format!("failed to parse '{}'", path.display()))?;

    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title("Line chart - Window Demo")
        .with_inner_size(winit::dpi::LogicalSize::new(1024.0, 640.0))
        .build(&event_loop)
        .context("build window")?;

    let context = unsafe { softbuffer::Context::new(&window) }.map_err(|e| anyhow::anyhow!("softbuffer context: {e}"))?;
    let mut surface =
        unsafe { softbuffer::Surface::new(&context, &window) }.map_err(|e| anyhow::anyhow!("softbuffer surface: {e}"))?;

    // The host body tracks the window's physical size so cursor positions map 1:1.
    let size = window.inner_size();
    let host = Host::with_size(size.width as f64, size.height as f64);
    let mut chart = Linechart::new(Rc::clone(&host), LinechartOptions::new(data));
    chart.draw();

    let opts = RenderOptions::default();
    let mut cursor: Option<(f64, f64)> = None;

    event_loop.run(move |event, _, cf| {
        *cf = ControlFlow::Wait;
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    *cf = ControlFlow::Exit;
                }
                WindowEvent::Resized(new_size) => {
                    {
                        let mut doc = host.document.borrow_mut();
                        let body = doc.body();
                        doc.set_size(body, new_size.width.max(1) as f64, new_size.height.max(1) as f64);
                    }
                    chart.resize().draw();
                    window.request_redraw();
                }
                WindowEvent::CursorLeft { .. } => {
                    cursor = None;
                    chart.pointer_leave();
                    window.request_redraw();
                }
                WindowEvent::CursorMoved { position, .. } => {
                    if cursor.is_none() {
                        chart.pointer_enter();
                    }
                    cursor = Some((position.x, position.y));
                    chart.pointer_move(position.x, position.y);
                    window.request_redraw();
                }
                WindowEvent::MouseInput { state: ElementState::Pressed, button: MouseButton::Left, .. } => {
                    if let Some((x, y)) = cursor {
                        let hit = chart.click_at(x, y);
                        tracing::info!(?hit, "click");
                        window.request_redraw();
                    }
                }
                WindowEvent::KeyboardInput {
                    input: KeyboardInput { state: ElementState::Pressed, virtual_keycode: Some(key), .. },
                    ..
                } => match key {
                    VirtualKeyCode::Escape => {
                        host.dispatch(&CustomEvent::new(HIDE_MENU));
                        window.request_redraw();
                    }
                    VirtualKeyCode::C => {
                        chart.click_background();
                        window.request_redraw();
                    }
                    _ => {}
                },
                _ => {}
            },
            Event::RedrawRequested(_) => {
                if let Err(e) = present(&chart, &opts, &mut surface) {
                    tracing::error!(error = %e, "present failed");
                }
            }
            _ => {}
        }
    });
}

/// Render to RGBA and convert to the 0RGB u32 pixels softbuffer expects.
fn present(chart: &Linechart, opts: &RenderOptions, surface: &mut softbuffer::Surface) -> Result<()> {
    let (rgba, w, h, _) = chart.render_to_rgba8(opts)?;
    let (Some(nw), Some(nh)) = (NonZeroU32::new(w as u32), NonZeroU32::new(h as u32)) else {
        return Ok(());
    };
    surface.resize(nw, nh).map_err(|e| anyhow::anyhow!("resize surface: {e}"))?;
    let mut frame = surface.buffer_mut().map_err(|e| anyhow::anyhow!("frame: {e}"))?;
    for (dst, px) in frame.iter_mut().zip(rgba.chunks_exact(4)) {
        let (r, g, b) = (px[0] as u32, px[1] as u32, px[2] as u32);
        *dst = (r << 16) | (g << 8) | b;
    }
    frame.present().map_err(|e| anyhow::anyhow!("present: {e}"))?;
    Ok(())
}
