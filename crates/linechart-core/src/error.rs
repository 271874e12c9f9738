// File: crates/linechart-core/src/error.rs
// Summary: Error type for strict data loading, document lookups and raster set-up.

use thiserror::Error;

use crate::dom::NodeId;

pub type LinechartResult<T> = Result<T, LinechartError>;

#[derive(Debug, Error)]
pub enum LinechartError {
    #[error("series '{series}' point {index}: x value '{value}' is neither a number nor a date")]
    InvalidX { series: String, index: usize, value: String },

    #[error("node {0:?} does not exist in the document")]
    UnknownNode(NodeId),

    #[error("unknown locale '{0}'")]
    UnknownLocale(String),

    #[error("chart has not been drawn")]
    NotDrawn,

    #[error("failed to create a {width}x{height} raster surface")]
    Surface { width: i32, height: i32 },
}
