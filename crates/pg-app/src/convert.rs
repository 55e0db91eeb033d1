use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pg_core::charset::BucketTable;
use pg_core::config::Config;
use pg_core::frame::{ChannelLayout, PixelGrid};
use pg_core::traits::GlyphStrategy;
use pg_export::{Rasterizer, save_gif, save_png};
use pg_glyph::animation::frame_rng;
use pg_glyph::raster::{RasterOptions, RasterPlacements};
use pg_glyph::{FrameSchedule, Mode, RenderResult, RenderTarget, StrategyOptions};
use pg_glyph::{create_strategy, render_all, render_frame};
use pg_source::{LanczosResampler, load_animation, load_image};

/// Table of valid mode ids, followed by what the user typed.
#[must_use]
pub fn mode_help(entered: &str) -> String {
    let rows: Vec<String> = Mode::ALL
        .iter()
        .map(|mode| format!("   {:<13} {}", mode.id(), mode.internal_name()))
        .collect();
    format!(
        "-- enter this -- Internal name --\n{}\nYou entered: {entered}",
        rows.join("\n")
    )
}

/// `<dir>/<stem>_<mode>_result.<ext>` next to the source.
#[must_use]
pub fn output_path(src: &Path, mode: Mode, ext: &str) -> PathBuf {
    let stem = src
        .file_stem()
        .map_or_else(|| "image".into(), |s| s.to_string_lossy());
    src.with_file_name(format!("{stem}_{mode}_result.{ext}"))
}

fn raster_options(config: &Config) -> RasterOptions {
    RasterOptions {
        cell: config.cell,
        top_padding: config.top_padding,
        background: config.background,
        brighten_delta: config.brighten_delta,
    }
}

fn load_rasterizer(config: &Config) -> Result<Rasterizer> {
    Rasterizer::from_file(&config.font_path, config.font_size)
        .with_context(|| format!("raster output needs a font ({})", config.font_path.display()))
}

/// Build the strategy for `mode` from the configured symbols and table.
///
/// # Errors
/// Returns an error if the bucket table cannot be loaded or the symbols are
/// empty.
pub fn build_strategy(
    config: &Config,
    mode: Mode,
    layout: ChannelLayout,
) -> Result<Box<dyn GlyphStrategy>> {
    let bucket_table = match (&config.bucket_table, mode) {
        (Some(path), Mode::HsvValue) => Some(BucketTable::load(path)?),
        _ => None,
    };
    let options = StrategyOptions {
        symbols: config.symbols.as_deref(),
        bucket_table,
        layout,
    };
    Ok(create_strategy(mode, options)?)
}

/// Terminal rendering of a still image at the configured width.
///
/// # Errors
/// Returns an error if the strategy cannot be built or the frame rendered.
pub fn terminal_text(grid: &PixelGrid, config: &Config, mode: Mode) -> Result<String> {
    let strategy = build_strategy(config, mode, grid.layout())?;
    let mut rng = frame_rng(config.seed, 0);
    let target = RenderTarget::Terminal {
        background: config.background,
    };
    match render_frame(
        grid,
        config.terminal_width,
        strategy.as_ref(),
        target,
        &LanczosResampler::new(),
        &mut rng,
    )? {
        RenderResult::Terminal(text) => Ok(text),
        RenderResult::Raster(_) => anyhow::bail!("terminal target produced placements"),
    }
}

fn placements(results: Vec<RenderResult>) -> Vec<RasterPlacements> {
    results
        .into_iter()
        .filter_map(|r| match r {
            RenderResult::Raster(p) => Some(p),
            RenderResult::Terminal(_) => None,
        })
        .collect()
}

/// Print a still image to stdout, and save its raster rendering when a
/// raster width is configured.
///
/// # Errors
/// Returns an error if the image cannot be loaded, rendered, or saved.
pub fn convert_image(src: &Path, config: &Config, mode: Mode) -> Result<()> {
    let grid = load_image(src)?;
    println!("{}", terminal_text(&grid, config, mode)?);

    if config.raster_width == 0 {
        return Ok(());
    }
    let strategy = build_strategy(config, mode, grid.layout())?;
    let mut rng = frame_rng(config.seed, 0);
    let result = render_frame(
        &grid,
        config.raster_width,
        strategy.as_ref(),
        RenderTarget::Raster(raster_options(config)),
        &LanczosResampler::new(),
        &mut rng,
    )?;
    let Some(frame) = placements(vec![result]).pop() else {
        anyhow::bail!("raster target produced no placements");
    };

    let mut rasterizer = load_rasterizer(config)?;
    rasterizer.warm(&frame);
    save_png(&output_path(src, mode, "png"), &rasterizer.draw(&frame))
}

/// Render every frame of a GIF to a raster and save the result as a GIF.
///
/// Uses the raster width when set, else the terminal width.
///
/// # Errors
/// Returns an error if the GIF cannot be decoded, has no frame timing, or
/// cannot be rendered or saved.
pub fn convert_gif(src: &Path, config: &Config, mode: Mode) -> Result<PathBuf> {
    let animation = load_animation(src)?;
    let duration = animation.duration()?;
    log::debug!(
        "{}: {} frames, {duration}ms",
        src.display(),
        animation.frame_count()
    );
    let width = if config.raster_width > 0 {
        config.raster_width
    } else {
        config.terminal_width
    };
    let strategy = build_strategy(config, mode, ChannelLayout::Rgb)?;
    let schedule = FrameSchedule {
        seed: config.seed,
        parallel: config.parallel_frames,
    };
    let frames = placements(render_all(
        &animation,
        width,
        strategy.as_ref(),
        RenderTarget::Raster(raster_options(config)),
        &LanczosResampler::new(),
        schedule,
    )?);

    let mut rasterizer = load_rasterizer(config)?;
    for frame in &frames {
        rasterizer.warm(frame);
    }
    let images = if config.parallel_frames {
        rasterizer.draw_all(&frames)
    } else {
        frames.iter().map(|f| rasterizer.draw(f)).collect()
    };

    let out = output_path(src, mode, "gif");
    save_gif(&out, images, &animation.delays_ms, animation.loop_count)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pg_core::color::Rgb;
    use pg_core::error::CoreError;

    #[test]
    fn help_lists_every_mode() {
        let help = mode_help("sparkles");
        assert!(help.starts_with("-- enter this -- Internal name --\n"));
        for mode in Mode::ALL {
            assert!(help.contains(mode.id()));
            assert!(help.contains(mode.internal_name()));
        }
        assert!(help.ends_with("You entered: sparkles"));
    }

    #[test]
    fn output_sits_next_to_source() {
        assert_eq!(
            output_path(Path::new("pics/cat.png"), Mode::HsvValue, "png"),
            PathBuf::from("pics/cat_hsv_result.png")
        );
        assert_eq!(
            output_path(Path::new("dance.gif"), Mode::RandomBlocks, "gif"),
            PathBuf::from("dance_rand_blocks_result.gif")
        );
    }

    #[test]
    fn terminal_text_has_one_line_per_row() {
        let grid = PixelGrid::from_rgb(40, 20, vec![Rgb(200, 10, 10); 800]).unwrap();
        let config = Config {
            terminal_width: 10,
            seed: Some(3),
            ..Config::default()
        };
        let text = terminal_text(&grid, &config, Mode::Blocks).unwrap();
        // 20 * 10 / (40 * 2) = 2.5 -> 3 rows.
        assert_eq!(text.matches('\n').count(), 3);
        assert_eq!(text.matches('▚').count(), 30);
    }

    #[test]
    fn seeded_text_is_reproducible() {
        let grid = PixelGrid::from_luma(16, 16, (0..=255).collect()).unwrap();
        let config = Config {
            terminal_width: 8,
            seed: Some(11),
            ..Config::default()
        };
        let a = terminal_text(&grid, &config, Mode::RandomText).unwrap();
        let b = terminal_text(&grid, &config, Mode::RandomText).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn missing_table_is_reported() {
        let config = Config {
            bucket_table: Some(PathBuf::from("/nonexistent/table.toml")),
            ..Config::default()
        };
        assert!(build_strategy(&config, Mode::HsvValue, ChannelLayout::Rgb).is_err());
        // Other modes never read it.
        assert!(build_strategy(&config, Mode::Blocks, ChannelLayout::Rgb).is_ok());
    }

    fn write_gif(path: &Path, delay_ms: u32) {
        use image::codecs::gif::GifEncoder;
        use image::{Delay, Frame, RgbaImage};

        let file = std::fs::File::create(path).unwrap();
        let mut encoder = GifEncoder::new(file);
        for shade in [0u8, 255] {
            let img = RgbaImage::from_pixel(4, 4, image::Rgba([shade, shade, shade, 255]));
            let delay = Delay::from_numer_denom_ms(delay_ms, 1);
            let frame = Frame::from_parts(img, 0, 0, delay);
            encoder.encode_frame(frame).unwrap();
        }
    }

    #[test]
    fn untimed_gif_is_rejected_before_rendering() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("still.gif");
        write_gif(&src, 0);
        let config = Config {
            font_path: PathBuf::from("/nonexistent/mono.ttf"),
            ..Config::default()
        };
        let err = convert_gif(&src, &config, Mode::Blocks).unwrap_err();
        assert_eq!(
            err.downcast_ref::<CoreError>(),
            Some(&CoreError::MissingDuration)
        );
        assert!(!output_path(&src, Mode::Blocks, "gif").exists());
    }
}
