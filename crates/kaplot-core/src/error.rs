// File: crates/kaplot-core/src/error.rs
// Summary: Error taxonomy for configuration calls, persistence and rendering.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("no layer named '{0}'")]
    UnknownLayer(String),
    #[error("layer '{0}' already exists")]
    DuplicateLayer(String),
    #[error("'{0}' is not a valid plot type (line, bar, hist, boxplot, boxscatter)")]
    UnknownPlotType(String),
    #[error("'{0}' is not a valid axes type (linear, log-log, semilog-x, semilog-y)")]
    UnknownAxesType(String),
    #[error("'{0}' is not a valid location (upper left, upper right, lower left, lower right)")]
    UnknownLocation(String),
    #[error("'{0}' is not a valid twin axis (x or y)")]
    UnknownTwinAxis(String),
    #[error("'{0}' is not a valid number")]
    InvalidNumber(String),
    #[error("'{0}' is not a known settings preset")]
    UnknownPreset(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

pub type PlotResult<T> = Result<T, PlotError>;
