use pg_core::color::{DEFAULT_BRIGHTEN, Rgb, brighten};
use pg_core::error::CoreError;
use pg_core::frame::{GlyphSequence, PixelGrid};
use pg_core::layout::CellSize;

use crate::terminal::DEFAULT_BACKGROUND;

/// Canvas geometry and color policy for raster output.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RasterOptions {
    /// Pixel size of one glyph cell.
    pub cell: CellSize,
    /// Band cropped off the top of the canvas (font ascent compensation).
    pub top_padding: u32,
    /// Canvas fill.
    pub background: Rgb,
    /// Lift applied to glyph colors so they read on the dark fill.
    pub brighten_delta: u8,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            cell: CellSize::default(),
            top_padding: 3,
            background: DEFAULT_BACKGROUND,
            brighten_delta: DEFAULT_BRIGHTEN,
        }
    }
}

/// One glyph to draw: top-left anchor in cropped canvas coordinates.
///
/// `y` is negative for the first row when the padding band cuts into it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphPlacement {
    /// Character to draw.
    pub glyph: char,
    /// Brightened source color.
    pub color: Rgb,
    /// Left edge in pixels.
    pub x: i32,
    /// Top edge in pixels.
    pub y: i32,
}

/// Everything a rasterizer needs to draw one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterPlacements {
    /// Canvas width in pixels (`grid_w * cell_w`).
    pub width: u32,
    /// Canvas height in pixels after the padding crop (`grid_h * cell_h`).
    pub height: u32,
    /// Canvas fill.
    pub background: Rgb,
    /// Glyphs in row-major order.
    pub placements: Vec<GlyphPlacement>,
}

/// Lay out a grid's glyphs on a canvas.
///
/// The canvas is conceptually `grid_w * cell_w` by
/// `grid_h * cell_h + top_padding`, with each glyph's anchor at
/// `(col * cell_w, row * cell_h)`; the top padding band is then cropped, so
/// the returned coordinates are shifted up by `top_padding`.
///
/// # Errors
/// Returns [`CoreError::LengthMismatch`] if the glyph count is not the cell
/// count.
///
/// # Example
/// ```
/// use pg_core::color::Rgb;
/// use pg_core::frame::{GlyphSequence, PixelGrid};
/// use pg_glyph::raster::{render_raster, RasterOptions};
///
/// let grid = PixelGrid::from_rgb(2, 1, vec![Rgb(10, 10, 10), Rgb(250, 0, 0)]).unwrap();
/// let glyphs: GlyphSequence = "ab".chars().collect();
/// let out = render_raster(&grid, &glyphs, &RasterOptions::default()).unwrap();
/// assert_eq!((out.width, out.height), (12, 8));
/// assert_eq!(out.placements[1].color, Rgb(255, 20, 20));
/// assert_eq!((out.placements[1].x, out.placements[1].y), (6, -3));
/// ```
pub fn render_raster(
    grid: &PixelGrid,
    glyphs: &GlyphSequence,
    options: &RasterOptions,
) -> Result<RasterPlacements, CoreError> {
    glyphs.check_covers(grid)?;
    let width = grid.width as usize;
    let cell = options.cell;

    let placements = glyphs
        .as_slice()
        .iter()
        .zip(grid.colors())
        .enumerate()
        .map(|(i, (&glyph, color))| GlyphPlacement {
            glyph,
            color: brighten(color, options.brighten_delta),
            x: ((i % width) as u32 * cell.width) as i32,
            y: ((i / width) as u32 * cell.height) as i32 - options.top_padding as i32,
        })
        .collect();

    Ok(RasterPlacements {
        width: grid.width * cell.width,
        height: grid.height * cell.height,
        background: options.background,
        placements,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_is_grid_times_cell() {
        let grid = PixelGrid::from_luma(3, 2, vec![0; 6]).unwrap();
        let glyphs: GlyphSequence = "abcdef".chars().collect();
        let options = RasterOptions {
            cell: CellSize {
                width: 8,
                height: 16,
            },
            ..RasterOptions::default()
        };
        let out = render_raster(&grid, &glyphs, &options).unwrap();
        assert_eq!((out.width, out.height), (24, 32));
        assert_eq!(out.placements.len(), 6);
        let last = out.placements[5];
        assert_eq!((last.glyph, last.x, last.y), ('f', 16, 13));
    }

    #[test]
    fn colors_are_brightened_and_clamped() {
        let grid = PixelGrid::from_rgb(1, 1, vec![Rgb(250, 250, 250)]).unwrap();
        let glyphs: GlyphSequence = "#".chars().collect();
        let out = render_raster(&grid, &glyphs, &RasterOptions::default()).unwrap();
        assert_eq!(out.placements[0].color, Rgb::WHITE);
    }

    #[test]
    fn zero_delta_keeps_source_color() {
        let grid = PixelGrid::from_rgb(1, 1, vec![Rgb(1, 2, 3)]).unwrap();
        let glyphs: GlyphSequence = "#".chars().collect();
        let options = RasterOptions {
            brighten_delta: 0,
            top_padding: 0,
            ..RasterOptions::default()
        };
        let out = render_raster(&grid, &glyphs, &options).unwrap();
        assert_eq!(out.placements[0].color, Rgb(1, 2, 3));
        assert_eq!(out.placements[0].y, 0);
    }

    #[test]
    fn mismatch_is_rejected() {
        let grid = PixelGrid::from_luma(2, 1, vec![0, 0]).unwrap();
        let glyphs: GlyphSequence = "a".chars().collect();
        assert!(render_raster(&grid, &glyphs, &RasterOptions::default()).is_err());
    }
}
