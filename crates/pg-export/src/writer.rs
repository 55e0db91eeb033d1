use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result, bail};
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, DynamicImage, Frame, ImageFormat, RgbImage};
use pg_core::frame::LoopCount;

/// Write one rendered frame as PNG.
///
/// # Errors
/// Returns an error if the file cannot be created or encoded.
pub fn save_png(path: &Path, image: &RgbImage) -> Result<()> {
    image
        .save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("cannot write {}", path.display()))?;
    log::info!("wrote {}", path.display());
    Ok(())
}

/// Loop block for the encoder: loop 0 means forever.
fn repeat_for(loop_count: LoopCount) -> Repeat {
    match loop_count {
        LoopCount::Infinite | LoopCount::Finite(0) => Repeat::Infinite,
        LoopCount::Finite(n) => Repeat::Finite(n),
    }
}

/// Write rendered frames as an animated GIF, one delay per frame.
///
/// # Errors
/// Returns an error if there are no frames, the delay count differs from
/// the frame count, or encoding fails.
///
/// # Example
/// ```no_run
/// use image::RgbImage;
/// use pg_core::frame::LoopCount;
/// use pg_export::writer::save_gif;
///
/// let frames = vec![RgbImage::new(12, 8), RgbImage::new(12, 8)];
/// save_gif("out.gif".as_ref(), frames, &[100, 100], LoopCount::Infinite).unwrap();
/// ```
pub fn save_gif(
    path: &Path,
    frames: Vec<RgbImage>,
    delays_ms: &[u32],
    loop_count: LoopCount,
) -> Result<()> {
    if frames.is_empty() {
        bail!("no frames to write to {}", path.display());
    }
    if frames.len() != delays_ms.len() {
        bail!(
            "{} frames but {} delays for {}",
            frames.len(),
            delays_ms.len(),
            path.display()
        );
    }

    let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    let mut encoder = GifEncoder::new(BufWriter::new(file));
    encoder.set_repeat(repeat_for(loop_count))?;

    let count = frames.len();
    let frames = frames.into_iter().zip(delays_ms).map(|(rgb, &ms)| {
        let rgba = DynamicImage::ImageRgb8(rgb).into_rgba8();
        Frame::from_parts(rgba, 0, 0, Delay::from_numer_denom_ms(ms, 1))
    });
    encoder
        .encode_frames(frames)
        .with_context(|| format!("cannot encode {}", path.display()))?;

    log::info!("wrote {} ({count} frames)", path.display());
    Ok(())
}
