use pg_core::charset::{BLOCK_ELEMENTS, Charset, PRINTABLE_ASCII};
use pg_core::error::CoreError;
use pg_core::frame::{GlyphSequence, PixelGrid};
use pg_core::traits::GlyphStrategy;
use rand::{Rng, RngCore};

/// Draws every cell's glyph uniformly, with replacement, from a charset.
///
/// # Example
/// ```
/// use pg_core::charset::Charset;
/// use pg_core::frame::PixelGrid;
/// use pg_core::traits::GlyphStrategy;
/// use pg_glyph::random::RandomStrategy;
///
/// let strategy = RandomStrategy::new(Charset::new("X").unwrap());
/// let grid = PixelGrid::from_luma(3, 2, vec![0; 6]).unwrap();
/// assert_eq!(strategy.generate(&grid, &mut rand::rng()).unwrap().to_string(), "XXXXXX");
/// ```
pub struct RandomStrategy {
    charset: Charset,
}

impl RandomStrategy {
    /// Sample from `charset`.
    #[must_use]
    pub fn new(charset: Charset) -> Self {
        Self { charset }
    }

    /// Sample from custom symbols, or printable ASCII `!`..=`~`.
    ///
    /// # Errors
    /// Returns [`CoreError::EmptyCharset`] for `Some("")`.
    pub fn from_symbols(symbols: Option<&str>) -> Result<Self, CoreError> {
        let charset = match symbols {
            Some(s) => Charset::new(s)?,
            None => Charset::from_range(PRINTABLE_ASCII)?,
        };
        Ok(Self::new(charset))
    }

    /// Sample from the Unicode block elements.
    ///
    /// # Errors
    /// Never fails in practice; the range is fixed and non-empty.
    pub fn block_elements() -> Result<Self, CoreError> {
        Ok(Self::new(Charset::from_range(BLOCK_ELEMENTS)?))
    }
}

impl GlyphStrategy for RandomStrategy {
    fn generate(
        &self,
        grid: &PixelGrid,
        rng: &mut dyn RngCore,
    ) -> Result<GlyphSequence, CoreError> {
        let glyphs = self.charset.glyphs();
        Ok((0..grid.len())
            .map(|_| glyphs[rng.random_range(0..glyphs.len())])
            .collect())
    }

    fn name(&self) -> &'static str {
        "random"
    }
}
