use thiserror::Error;

/// Configuration errors raised while initializing the grid. All are fatal:
/// the grid does not render.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("asset manifest is empty")]
    EmptyManifest,

    #[error("tile {axis} must be a positive whole number of pixels, got {size}")]
    InvalidTileSize { axis: &'static str, size: f64 },

    #[error("wrap-around stride (fixed_cols) must be at least 1")]
    InvalidStride,

    #[error("viewport element '{0}' not found")]
    MissingViewport(String),
}
