use thiserror::Error;

/// Errors originating from the core module.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CoreError {
    /// Invalid configuration value or structure.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A charset-indexing strategy was given no glyphs.
    #[error("charset is empty")]
    EmptyCharset,

    /// Mode identifier that maps to no glyph strategy.
    #[error("unsupported mode: {mode}")]
    UnsupportedMode {
        /// The identifier the caller asked for.
        mode: String,
    },

    /// Brightness bucketing over color pixels without a monochrome converter.
    #[error("image is not monochrome and no color converter was supplied")]
    MissingBrightnessSource,

    /// Animation carries no frame timing.
    #[error("there is no duration in the animation")]
    MissingDuration,

    /// Glyph sequence and pixel grid disagree on cell count.
    #[error("glyph sequence has {glyphs} entries for {cells} cells")]
    LengthMismatch {
        /// Number of glyphs produced.
        glyphs: usize,
        /// Number of cells in the grid.
        cells: usize,
    },

    /// Invalid width/height dimensions.
    #[error("invalid dimensions: {width}×{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Referenced file does not exist.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: String,
    },
}
