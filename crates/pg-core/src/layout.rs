//! Output grid sizing.
//!
//! Height is always derived from the requested width so the text keeps the
//! source aspect ratio once drawn in non-square glyph cells.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Widths at or above this are read as pixels rather than cells.
pub const PIXEL_WIDTH_THRESHOLD: u32 = 1000;

/// Terminal glyph cells are assumed twice as tall as wide.
pub const TERMINAL_CELL_ASPECT: f64 = 2.0;

/// Pixel footprint of one glyph cell on a raster canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct CellSize {
    /// Cell width in pixels.
    pub width: u32,
    /// Cell height in pixels.
    pub height: u32,
}

impl Default for CellSize {
    fn default() -> Self {
        Self {
            width: 6,
            height: 8,
        }
    }
}

fn check(src_w: u32, src_h: u32, width: u32) -> Result<(), CoreError> {
    if src_w == 0 || src_h == 0 {
        return Err(CoreError::InvalidDimensions {
            width: src_w,
            height: src_h,
        });
    }
    if width == 0 {
        return Err(CoreError::InvalidDimensions { width, height: 0 });
    }
    Ok(())
}

/// Grid size for terminal output: `height = round(src_h * width / (src_w * 2))`.
///
/// Height never drops below one row.
///
/// # Errors
/// Returns [`CoreError::InvalidDimensions`] for a zero source dimension or
/// zero width.
///
/// # Example
/// ```
/// use pg_core::layout::terminal_grid;
/// assert_eq!(terminal_grid(200, 100, 80).unwrap(), (80, 20));
/// ```
pub fn terminal_grid(src_w: u32, src_h: u32, width: u32) -> Result<(u32, u32), CoreError> {
    check(src_w, src_h, width)?;
    let rows = f64::from(src_h) * f64::from(width) / (f64::from(src_w) * TERMINAL_CELL_ASPECT);
    Ok((width, (rows.round() as u32).max(1)))
}

/// Reinterpret a pixel-looking width (≥ 1000) as a cell count.
///
/// # Example
/// ```
/// use pg_core::layout::{raster_cell_width, CellSize};
/// assert_eq!(raster_cell_width(120, CellSize::default()), 120);
/// assert_eq!(raster_cell_width(1200, CellSize::default()), 201);
/// ```
#[must_use]
pub fn raster_cell_width(width: u32, cell: CellSize) -> u32 {
    if width >= PIXEL_WIDTH_THRESHOLD {
        width / cell.width.max(1) + 1
    } else {
        width
    }
}

/// Grid size for raster output:
/// `height = round(src_h * (width * cell_w / src_w) / cell_h)`.
///
/// # Errors
/// Returns [`CoreError::InvalidDimensions`] for a zero source dimension, zero
/// width, or a degenerate cell.
///
/// # Example
/// ```
/// use pg_core::layout::{raster_grid, CellSize};
/// assert_eq!(raster_grid(600, 400, 100, CellSize::default()).unwrap(), (100, 50));
/// ```
pub fn raster_grid(
    src_w: u32,
    src_h: u32,
    width: u32,
    cell: CellSize,
) -> Result<(u32, u32), CoreError> {
    check(src_w, src_h, width)?;
    if cell.width == 0 || cell.height == 0 {
        return Err(CoreError::InvalidDimensions {
            width: cell.width,
            height: cell.height,
        });
    }
    let width = raster_cell_width(width, cell);
    let scale = f64::from(width) * f64::from(cell.width) / f64::from(src_w);
    let height = (f64::from(src_h) * scale / f64::from(cell.height)).round();
    Ok((width, (height as u32).max(1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_halves_rows() {
        assert_eq!(terminal_grid(100, 100, 50).unwrap(), (50, 25));
        // Very wide source still gets one row.
        assert_eq!(terminal_grid(10_000, 10, 10).unwrap(), (10, 1));
    }

    #[test]
    fn zero_sizes_are_rejected() {
        assert!(terminal_grid(0, 10, 10).is_err());
        assert!(terminal_grid(10, 10, 0).is_err());
        let cell = CellSize {
            width: 0,
            height: 8,
        };
        assert!(raster_grid(10, 10, 10, cell).is_err());
    }

    #[test]
    fn pixel_width_threshold() {
        let cell = CellSize::default();
        assert_eq!(raster_cell_width(999, cell), 999);
        assert_eq!(raster_cell_width(1000, cell), 167);
    }

    #[test]
    fn raster_height_uses_cell_metrics() {
        let cell = CellSize {
            width: 8,
            height: 16,
        };
        // 50 cells * 8px = 400px wide, scale 2.0, 300px -> 600px -> 37.5 rows.
        assert_eq!(raster_grid(200, 300, 50, cell).unwrap(), (50, 38));
    }
}
