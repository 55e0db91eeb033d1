use pg_core::charset::{Charset, DEFAULT_BLOCK};
use pg_core::error::CoreError;
use pg_core::frame::{GlyphSequence, PixelGrid};
use pg_core::traits::GlyphStrategy;
use rand::RngCore;

/// Repeats a charset end to end over the grid, truncating the last pass.
///
/// Deterministic: the RNG is never touched.
///
/// # Example
/// ```
/// use pg_core::charset::Charset;
/// use pg_core::frame::PixelGrid;
/// use pg_core::traits::GlyphStrategy;
/// use pg_glyph::cycle::CycleStrategy;
///
/// let strategy = CycleStrategy::new(Charset::new("AB").unwrap());
/// let grid = PixelGrid::from_luma(5, 1, vec![0; 5]).unwrap();
/// let glyphs = strategy.generate(&grid, &mut rand::rng()).unwrap();
/// assert_eq!(glyphs.to_string(), "ABABA");
/// ```
pub struct CycleStrategy {
    charset: Charset,
}

impl CycleStrategy {
    /// Cycle over `charset`.
    #[must_use]
    pub fn new(charset: Charset) -> Self {
        Self { charset }
    }

    /// Cycle over custom symbols, or the single default block.
    ///
    /// # Errors
    /// Returns [`CoreError::EmptyCharset`] for `Some("")`.
    pub fn from_symbols(symbols: Option<&str>) -> Result<Self, CoreError> {
        Ok(Self::new(Charset::new(symbols.unwrap_or(DEFAULT_BLOCK))?))
    }
}

impl GlyphStrategy for CycleStrategy {
    fn generate(
        &self,
        grid: &PixelGrid,
        _rng: &mut dyn RngCore,
    ) -> Result<GlyphSequence, CoreError> {
        Ok(self
            .charset
            .glyphs()
            .iter()
            .copied()
            .cycle()
            .take(grid.len())
            .collect())
    }

    fn name(&self) -> &'static str {
        "cycle"
    }
}
