use std::fmt;

use crate::color::Rgb;
use crate::error::CoreError;

/// Pixel storage of a grid: full color, or a single brightness channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Pixels {
    /// One RGB triple per cell.
    Rgb(Vec<Rgb>),
    /// One brightness byte per cell (grayscale sources).
    Luma(Vec<u8>),
}

impl Pixels {
    fn len(&self) -> usize {
        match self {
            Self::Rgb(v) => v.len(),
            Self::Luma(v) => v.len(),
        }
    }
}

/// Which channel layout a grid (or the image it came from) uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelLayout {
    /// Three color channels.
    Rgb,
    /// A single brightness channel.
    Luma,
}

/// Row-major grid of sampled colors, `width × height` cells.
///
/// Produced by the image source collaborator, only read by the glyph and
/// render code.
///
/// # Example
/// ```
/// use pg_core::frame::PixelGrid;
/// use pg_core::color::Rgb;
/// let grid = PixelGrid::from_rgb(2, 1, vec![Rgb(1, 2, 3), Rgb(4, 5, 6)]).unwrap();
/// assert_eq!(grid.len(), 2);
/// assert_eq!(grid.color(1), Rgb(4, 5, 6));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelGrid {
    /// Width in cells.
    pub width: u32,
    /// Height in cells.
    pub height: u32,
    pixels: Pixels,
}

impl PixelGrid {
    /// Wrap pixel storage, checking it holds exactly `width × height` cells.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidDimensions`] for a zero dimension, and
    /// [`CoreError::LengthMismatch`] when the storage length is wrong.
    pub fn new(width: u32, height: u32, pixels: Pixels) -> Result<Self, CoreError> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidDimensions { width, height });
        }
        let cells = width as usize * height as usize;
        if pixels.len() != cells {
            return Err(CoreError::LengthMismatch {
                glyphs: pixels.len(),
                cells,
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Color grid.
    ///
    /// # Errors
    /// See [`PixelGrid::new`].
    pub fn from_rgb(width: u32, height: u32, colors: Vec<Rgb>) -> Result<Self, CoreError> {
        Self::new(width, height, Pixels::Rgb(colors))
    }

    /// Single-channel brightness grid.
    ///
    /// # Errors
    /// See [`PixelGrid::new`].
    pub fn from_luma(width: u32, height: u32, levels: Vec<u8>) -> Result<Self, CoreError> {
        Self::new(width, height, Pixels::Luma(levels))
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Never true for a constructed grid.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Channel layout of the storage.
    #[must_use]
    pub fn layout(&self) -> ChannelLayout {
        match self.pixels {
            Pixels::Rgb(_) => ChannelLayout::Rgb,
            Pixels::Luma(_) => ChannelLayout::Luma,
        }
    }

    /// Raw storage.
    #[must_use]
    pub fn pixels(&self) -> &Pixels {
        &self.pixels
    }

    /// Color of cell `index`; brightness grids read back as gray.
    #[inline(always)]
    #[must_use]
    pub fn color(&self, index: usize) -> Rgb {
        match &self.pixels {
            Pixels::Rgb(v) => v[index],
            Pixels::Luma(v) => Rgb::gray(v[index]),
        }
    }

    /// All cell colors in row-major order.
    pub fn colors(&self) -> impl Iterator<Item = Rgb> + '_ {
        (0..self.len()).map(|i| self.color(i))
    }
}

/// Flat row-major glyph list, one per output cell.
///
/// # Example
/// ```
/// use pg_core::frame::GlyphSequence;
/// let seq: GlyphSequence = "ABA".chars().collect();
/// assert_eq!(seq.len(), 3);
/// assert_eq!(seq.to_string(), "ABA");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GlyphSequence(Vec<char>);

impl GlyphSequence {
    /// Glyphs in order.
    #[must_use]
    pub fn as_slice(&self) -> &[char] {
        &self.0
    }

    /// Number of glyphs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no glyph was produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check the sequence covers `grid` one-to-one.
    ///
    /// # Errors
    /// Returns [`CoreError::LengthMismatch`] otherwise.
    pub fn check_covers(&self, grid: &PixelGrid) -> Result<(), CoreError> {
        if self.len() == grid.len() {
            Ok(())
        } else {
            Err(CoreError::LengthMismatch {
                glyphs: self.len(),
                cells: grid.len(),
            })
        }
    }
}

impl FromIterator<char> for GlyphSequence {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<char>> for GlyphSequence {
    fn from(glyphs: Vec<char>) -> Self {
        Self(glyphs)
    }
}

impl fmt::Display for GlyphSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in &self.0 {
            fmt::Write::write_char(f, *ch)?;
        }
        Ok(())
    }
}

/// How many times an animation plays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoopCount {
    /// Loops forever. Also used when the source declares nothing.
    #[default]
    Infinite,
    /// Plays the given number of times.
    Finite(u16),
}

/// Frames of a multi-frame source plus the metadata written back on save.
///
/// Frames are kept at native resolution; resampling happens per render.
#[derive(Clone, Debug)]
pub struct Animation {
    /// Fully composited frames, in display order.
    pub frames: Vec<PixelGrid>,
    /// Per-frame delay in milliseconds. 0 where the source had none.
    pub delays_ms: Vec<u32>,
    /// Loop count.
    pub loop_count: LoopCount,
    /// Global palette, possibly empty.
    pub palette: Vec<Rgb>,
    /// Index of the background color in `palette`.
    pub background_index: Option<usize>,
}

impl Animation {
    /// Number of frames.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Display duration of the first timed frame, in milliseconds.
    ///
    /// # Errors
    /// Returns [`CoreError::MissingDuration`] if no frame carries timing.
    ///
    /// # Example
    /// ```
    /// use pg_core::frame::{Animation, LoopCount};
    /// let mut anim = Animation {
    ///     frames: Vec::new(),
    ///     delays_ms: vec![0, 0],
    ///     loop_count: LoopCount::Infinite,
    ///     palette: Vec::new(),
    ///     background_index: None,
    /// };
    /// assert!(anim.duration().is_err());
    /// anim.delays_ms = vec![0, 120];
    /// assert_eq!(anim.duration(), Ok(120));
    /// ```
    pub fn duration(&self) -> Result<u32, CoreError> {
        self.delays_ms
            .iter()
            .copied()
            .find(|&d| d > 0)
            .ok_or(CoreError::MissingDuration)
    }

    /// Palette background color, or `fallback` when the source has none.
    #[must_use]
    pub fn background(&self, fallback: Rgb) -> Rgb {
        self.background_index
            .and_then(|i| self.palette.get(i).copied())
            .unwrap_or(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anim(delays_ms: Vec<u32>) -> Animation {
        Animation {
            frames: Vec::new(),
            delays_ms,
            loop_count: LoopCount::default(),
            palette: vec![Rgb(1, 1, 1), Rgb(9, 8, 7)],
            background_index: Some(1),
        }
    }

    #[test]
    fn grid_rejects_wrong_length() {
        let err = PixelGrid::from_rgb(2, 2, vec![Rgb::BLACK; 3]).unwrap_err();
        assert_eq!(err, CoreError::LengthMismatch { glyphs: 3, cells: 4 });
    }

    #[test]
    fn grid_rejects_zero_dimension() {
        let err = PixelGrid::from_luma(0, 3, Vec::new()).unwrap_err();
        assert_eq!(err, CoreError::InvalidDimensions { width: 0, height: 3 });
    }

    #[test]
    fn luma_reads_as_gray() {
        let grid = PixelGrid::from_luma(1, 2, vec![0, 200]).unwrap();
        assert_eq!(grid.layout(), ChannelLayout::Luma);
        assert_eq!(
            grid.colors().collect::<Vec<_>>(),
            vec![Rgb::BLACK, Rgb::gray(200)]
        );
    }

    #[test]
    fn glyph_sequence_coverage() {
        let grid = PixelGrid::from_luma(2, 1, vec![0, 0]).unwrap();
        let ok: GlyphSequence = "ab".chars().collect();
        let short: GlyphSequence = "a".chars().collect();
        assert!(ok.check_covers(&grid).is_ok());
        assert!(short.check_covers(&grid).is_err());
    }

    #[test]
    fn duration_uses_first_frame() {
        assert_eq!(anim(vec![40, 80]).duration(), Ok(40));
        assert_eq!(anim(Vec::new()).duration(), Err(CoreError::MissingDuration));
    }

    #[test]
    fn untimed_first_frame_takes_first_timed_delay() {
        assert_eq!(anim(vec![0, 100, 100]).duration(), Ok(100));
        assert_eq!(anim(vec![0, 0]).duration(), Err(CoreError::MissingDuration));
    }

    #[test]
    fn background_from_palette_or_fallback() {
        let mut a = anim(vec![10]);
        assert_eq!(a.background(Rgb(5, 5, 5)), Rgb(9, 8, 7));
        a.background_index = Some(7);
        assert_eq!(a.background(Rgb(5, 5, 5)), Rgb(5, 5, 5));
        a.background_index = None;
        assert_eq!(a.background(Rgb(5, 5, 5)), Rgb(5, 5, 5));
    }
}
