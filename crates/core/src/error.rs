//! Error types for fimkit
//!
//! One taxonomy for the whole engine. Every variant is terminal: nothing is
//! retried internally, and the caller sees exactly one outcome per run.

use thiserror::Error;

/// Main error type for fimkit operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no input rasters provided")]
    EmptyInputSet,

    #[error("cannot open raster `{path}`: {reason}")]
    Open { path: String, reason: String },

    #[error("resolution mismatch: ({found_x}, {found_y}) differs from reference ({base_x}, {base_y})")]
    ResolutionMismatch {
        base_x: f64,
        base_y: f64,
        found_x: f64,
        found_y: f64,
    },

    #[error("CRS mismatch: {0} vs {1}")]
    CrsMismatch(String, String),

    #[error("degenerate pixel size: ({res_x}, {res_y})")]
    DegenerateResolution { res_x: f64, res_y: f64 },

    #[error("invalid block size: {0} (must be positive)")]
    InvalidBlockSize(usize),

    #[error("cannot open clip mask: {0}")]
    MaskOpen(String),

    #[error("write failed: {0}")]
    Write(String),

    #[error("invalid raster dimensions: {cols}x{rows}")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("index out of bounds: ({row}, {col}) in raster of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error(
        "window {win_cols}x{win_rows}+{col_off}+{row_off} outside raster of size {cols}x{rows}"
    )]
    WindowOutOfBounds {
        col_off: usize,
        row_off: usize,
        win_cols: usize,
        win_rows: usize,
        rows: usize,
        cols: usize,
    },
}

/// Result type alias for fimkit operations
pub type Result<T> = std::result::Result<T, Error>;
