use rand::RngCore;

use crate::error::CoreError;
use crate::frame::{GlyphSequence, PixelGrid};

/// Chooses one glyph per cell of a sampled grid.
///
/// Implémenté par : `CycleStrategy`, `RandomStrategy`, `BucketedStrategy`.
/// Strategies that only need the grid dimensions ignore the pixel values.
/// Randomized strategies draw from `rng` exclusively, so a seeded RNG gives
/// a reproducible sequence.
///
/// # Example
/// ```
/// use pg_core::traits::GlyphStrategy;
/// use pg_core::frame::{GlyphSequence, PixelGrid};
/// use pg_core::error::CoreError;
/// use rand::RngCore;
///
/// struct Dots;
/// impl GlyphStrategy for Dots {
///     fn generate(&self, grid: &PixelGrid, _rng: &mut dyn RngCore)
///         -> Result<GlyphSequence, CoreError> {
///         Ok(std::iter::repeat_n('.', grid.len()).collect())
///     }
///     fn name(&self) -> &'static str { "dots" }
/// }
/// ```
pub trait GlyphStrategy: Send + Sync {
    /// Produce exactly `grid.len()` glyphs in row-major order.
    ///
    /// # Errors
    /// Returns a [`CoreError`] when the grid cannot be mapped (e.g. color
    /// pixels reach a brightness strategy without a converter).
    fn generate(
        &self,
        grid: &PixelGrid,
        rng: &mut dyn RngCore,
    ) -> Result<GlyphSequence, CoreError>;

    /// Nom lisible pour le debug/logs.
    fn name(&self) -> &'static str;
}

/// Resamples a native-resolution grid to a target cell size.
///
/// Implémenté par le collaborateur image (`pg_source::resize::LanczosResampler`).
pub trait Resample: Send + Sync {
    /// Resample `src` to `width × height` cells, keeping its channel layout.
    ///
    /// # Errors
    /// Returns an error if the dimensions are invalid or resampling fails.
    fn resample(&self, src: &PixelGrid, width: u32, height: u32) -> anyhow::Result<PixelGrid>;
}
