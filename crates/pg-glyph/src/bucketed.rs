use pg_core::charset::BucketTable;
use pg_core::color::Rgb;
use pg_core::error::CoreError;
use pg_core::frame::{ChannelLayout, GlyphSequence, PixelGrid, Pixels};
use pg_core::traits::GlyphStrategy;
use rand::{Rng, RngCore};

/// Maps a color to a brightness byte.
pub type MonochromeFn = fn(Rgb) -> u8;

/// Picks each cell's glyph from the brightness bucket its pixel falls in.
///
/// Brightness comes straight from single-channel grids, or from the
/// monochrome converter for color grids. When a bucket holds several glyphs
/// of equal ink coverage, one is drawn at random so flat regions don't repeat
/// a single character.
///
/// # Example
/// ```
/// use pg_core::charset::BucketTable;
/// use pg_core::color::rgb_to_monochrome;
/// use pg_core::frame::{ChannelLayout, PixelGrid};
/// use pg_core::traits::GlyphStrategy;
/// use pg_glyph::bucketed::BucketedStrategy;
///
/// let table = BucketTable::from_groups(vec![".".into(), "#".into()]).unwrap();
/// let strategy =
///     BucketedStrategy::new(table, ChannelLayout::Luma, Some(rgb_to_monochrome)).unwrap();
/// let grid = PixelGrid::from_luma(3, 1, vec![0, 127, 255]).unwrap();
/// assert_eq!(strategy.generate(&grid, &mut rand::rng()).unwrap().to_string(), "..#");
/// ```
pub struct BucketedStrategy {
    table: BucketTable,
    converter: Option<MonochromeFn>,
}

impl BucketedStrategy {
    /// Build for sources with the given channel layout.
    ///
    /// # Errors
    /// Returns [`CoreError::MissingBrightnessSource`] when `layout` is color
    /// and no converter is supplied.
    pub fn new(
        table: BucketTable,
        layout: ChannelLayout,
        converter: Option<MonochromeFn>,
    ) -> Result<Self, CoreError> {
        if layout == ChannelLayout::Rgb && converter.is_none() {
            return Err(CoreError::MissingBrightnessSource);
        }
        Ok(Self { table, converter })
    }

    /// The bucket table in use.
    #[must_use]
    pub fn table(&self) -> &BucketTable {
        &self.table
    }

    #[inline(always)]
    fn pick(&self, brightness: u8, rng: &mut dyn RngCore) -> char {
        let bucket = self.table.bucket(brightness);
        if bucket.len() == 1 {
            bucket[0]
        } else {
            bucket[rng.random_range(0..bucket.len())]
        }
    }
}

impl GlyphStrategy for BucketedStrategy {
    fn generate(
        &self,
        grid: &PixelGrid,
        rng: &mut dyn RngCore,
    ) -> Result<GlyphSequence, CoreError> {
        match grid.pixels() {
            Pixels::Luma(levels) => Ok(levels.iter().map(|&l| self.pick(l, rng)).collect()),
            Pixels::Rgb(colors) => {
                let convert = self.converter.ok_or(CoreError::MissingBrightnessSource)?;
                Ok(colors.iter().map(|&c| self.pick(convert(c), rng)).collect())
            }
        }
    }

    fn name(&self) -> &'static str {
        "bucketed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pg_core::charset::CHARSET_COMPACT;
    use pg_core::color::rgb_to_monochrome;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn two_buckets() -> BucketTable {
        BucketTable::from_groups(vec![".".into(), "#".into()]).unwrap()
    }

    #[test]
    fn color_source_without_converter_fails_at_construction() {
        let err = BucketedStrategy::new(two_buckets(), ChannelLayout::Rgb, None).err();
        assert_eq!(err, Some(CoreError::MissingBrightnessSource));
    }

    #[test]
    fn luma_source_needs_no_converter() {
        assert!(BucketedStrategy::new(two_buckets(), ChannelLayout::Luma, None).is_ok());
    }

    #[test]
    fn two_bucket_boundaries() {
        let s = BucketedStrategy::new(two_buckets(), ChannelLayout::Luma, None).unwrap();
        let grid = PixelGrid::from_luma(4, 1, vec![0, 127, 128, 255]).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(s.generate(&grid, &mut rng).unwrap().to_string(), "..##");
    }

    #[test]
    fn color_grid_goes_through_converter() {
        let table = BucketTable::from_charset(CHARSET_COMPACT).unwrap();
        let s = BucketedStrategy::new(table, ChannelLayout::Rgb, Some(rgb_to_monochrome)).unwrap();
        let grid = PixelGrid::from_rgb(2, 1, vec![Rgb::BLACK, Rgb::WHITE]).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(s.generate(&grid, &mut rng).unwrap().to_string(), " @");
    }

    #[test]
    fn color_grid_on_luma_strategy_is_error() {
        let s = BucketedStrategy::new(two_buckets(), ChannelLayout::Luma, None).unwrap();
        let grid = PixelGrid::from_rgb(1, 1, vec![Rgb::WHITE]).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            s.generate(&grid, &mut rng),
            Err(CoreError::MissingBrightnessSource)
        );
    }

    #[test]
    fn ties_pick_within_bucket() {
        let table = BucketTable::from_groups(vec![" ".into(), "xyz".into()]).unwrap();
        let s = BucketedStrategy::new(table, ChannelLayout::Luma, None).unwrap();
        let grid = PixelGrid::from_luma(300, 1, vec![255; 300]).unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        let glyphs = s.generate(&grid, &mut rng).unwrap();
        assert!(glyphs.as_slice().iter().all(|c| "xyz".contains(*c)));
        // 300 uniform draws over three glyphs hit each of them.
        for c in ['x', 'y', 'z'] {
            assert!(glyphs.as_slice().contains(&c), "{c} never drawn");
        }
    }

    #[test]
    fn seeded_ties_are_reproducible() {
        let table = BucketTable::from_groups(vec!["ab".into(), "cd".into()]).unwrap();
        let s = BucketedStrategy::new(table, ChannelLayout::Luma, None).unwrap();
        let grid = PixelGrid::from_luma(32, 1, (0..32).map(|i| i * 8).collect()).unwrap();
        let a = s.generate(&grid, &mut StdRng::seed_from_u64(5)).unwrap();
        let b = s.generate(&grid, &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(a, b);
    }
}
