// File: crates/linechart-core/src/lib.rs
// Summary: Core library entry point; exports the line chart widget, its host document and rendering.

pub mod axis;
pub mod chart;
pub mod color;
pub mod dom;
pub mod error;
pub mod events;
pub mod extent;
pub mod format;
pub mod geometry;
pub mod hover;
pub mod path;
pub mod render;
pub mod scale;
pub mod series;
pub mod svg;
pub mod text;
pub mod theme;
pub mod time;
pub mod types;

pub use chart::{Linechart, LinechartOptions};
pub use dom::{Document, NodeId};
pub use error::{LinechartError, LinechartResult};
pub use events::{CustomEvent, EventDetail, Host, HIDE_MENU, LINE_SELECTED};
pub use extent::{ChartExtent, Extent};
pub use format::{DateFormat, NumberFormat, TickFormat};
pub use hover::Hover;
pub use render::RenderOptions;
pub use scale::{LinearScale, Scale, TimeScale, XScale};
pub use series::{Dataset, Series, XValue};
pub use text::TextShaper;
pub use theme::Theme;
pub use types::{InputMode, Margin};
