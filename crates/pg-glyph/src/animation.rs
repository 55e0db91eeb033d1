use anyhow::Result;
use pg_core::color::Rgb;
use pg_core::frame::{Animation, PixelGrid};
use pg_core::layout::{raster_grid, terminal_grid};
use pg_core::traits::{GlyphStrategy, Resample};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;

use crate::raster::{RasterOptions, RasterPlacements, render_raster};
use crate::terminal::render_terminal;

/// Where a rendering is headed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RenderTarget {
    /// Escape-coded text, sized for a 2:1 terminal cell.
    Terminal {
        /// Background behind the glyphs.
        background: Rgb,
    },
    /// Glyph placements for a rasterizer, sized from the cell metrics.
    Raster(RasterOptions),
}

impl RenderTarget {
    fn background(self) -> Rgb {
        match self {
            Self::Terminal { background } => background,
            Self::Raster(o) => o.background,
        }
    }

    fn with_background(self, background: Rgb) -> Self {
        match self {
            Self::Terminal { .. } => Self::Terminal { background },
            Self::Raster(o) => Self::Raster(RasterOptions { background, ..o }),
        }
    }
}

/// Output of one frame.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderResult {
    /// Terminal string.
    Terminal(String),
    /// Raster placements.
    Raster(RasterPlacements),
}

/// How frames of an animation are scheduled.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameSchedule {
    /// Base seed; frame `i` uses `seed + i`. None = OS entropy per frame.
    pub seed: Option<u64>,
    /// Render frames on the rayon pool.
    pub parallel: bool,
}

/// RNG for frame `index`.
#[must_use]
pub fn frame_rng(seed: Option<u64>, index: usize) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s.wrapping_add(index as u64)),
        None => StdRng::from_os_rng(),
    }
}

/// Resample a native-resolution image to `width` cells, pick its glyphs, and
/// render it.
///
/// # Errors
/// Returns an error on zero dimensions, resampling failure, or a strategy
/// that cannot map the grid.
pub fn render_frame(
    source: &PixelGrid,
    width: u32,
    strategy: &dyn GlyphStrategy,
    target: RenderTarget,
    resampler: &dyn Resample,
    rng: &mut dyn RngCore,
) -> Result<RenderResult> {
    let (cols, rows) = match target {
        RenderTarget::Terminal { .. } => terminal_grid(source.width, source.height, width)?,
        RenderTarget::Raster(o) => raster_grid(source.width, source.height, width, o.cell)?,
    };
    log::debug!(
        "{}x{} -> {cols}x{rows} cells ({})",
        source.width,
        source.height,
        strategy.name()
    );
    let grid = resampler.resample(source, cols, rows)?;
    let glyphs = strategy.generate(&grid, rng)?;

    Ok(match target {
        RenderTarget::Terminal { background } => {
            RenderResult::Terminal(render_terminal(&grid, &glyphs, background)?)
        }
        RenderTarget::Raster(o) => RenderResult::Raster(render_raster(&grid, &glyphs, &o)?),
    })
}

/// Render every frame of an animation, in frame order.
///
/// The canvas/terminal background is the animation's palette background,
/// falling back to the target's. Each frame gets its own RNG, so random
/// strategies lay glyphs out differently from one frame to the next.
///
/// # Errors
/// Returns the first frame error encountered.
pub fn render_all(
    animation: &Animation,
    width: u32,
    strategy: &dyn GlyphStrategy,
    target: RenderTarget,
    resampler: &dyn Resample,
    schedule: FrameSchedule,
) -> Result<Vec<RenderResult>> {
    let target = target.with_background(animation.background(target.background()));
    let render = |(i, frame): (usize, &PixelGrid)| {
        let mut rng = frame_rng(schedule.seed, i);
        render_frame(frame, width, strategy, target, resampler, &mut rng)
    };

    log::info!(
        "rendering {} frames ({})",
        animation.frame_count(),
        if schedule.parallel {
            "parallel"
        } else {
            "sequential"
        }
    );
    if schedule.parallel {
        animation.frames.par_iter().enumerate().map(render).collect()
    } else {
        animation.frames.iter().enumerate().map(render).collect()
    }
}
