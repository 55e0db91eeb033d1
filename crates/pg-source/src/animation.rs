use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result};
use image::AnimationDecoder;
use image::codecs::gif::GifDecoder;
use pg_core::color::Rgb;
use pg_core::frame::{Animation, LoopCount, PixelGrid};

/// Header data the frame decoder does not expose.
struct GifMetadata {
    palette: Vec<Rgb>,
    background_index: Option<usize>,
    loop_count: LoopCount,
}

fn read_metadata(bytes: &[u8]) -> Result<GifMetadata> {
    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::Indexed);
    let decoder = options
        .read_info(Cursor::new(bytes))
        .context("invalid GIF header")?;

    let palette = decoder
        .global_palette()
        .map(|p| p.chunks_exact(3).map(|c| Rgb(c[0], c[1], c[2])).collect())
        .unwrap_or_default();

    // gif reports Finite(0) when no NETSCAPE loop block is present.
    let loop_count = match decoder.repeat() {
        gif::Repeat::Infinite | gif::Repeat::Finite(0) => LoopCount::Infinite,
        gif::Repeat::Finite(n) => LoopCount::Finite(n),
    };

    Ok(GifMetadata {
        palette,
        background_index: decoder.bg_color(),
        loop_count,
    })
}

/// Decode every frame of a GIF, fully composited, plus its metadata.
///
/// Frames keep the logical screen size; alpha is dropped.
///
/// # Errors
/// Returns an error if the file cannot be read or is not a valid GIF.
///
/// # Example
/// ```no_run
/// use pg_source::animation::load_animation;
/// use std::path::Path;
/// let anim = load_animation(Path::new("cat.gif")).unwrap();
/// println!("{} frames", anim.frame_count());
/// ```
pub fn load_animation(path: &Path) -> Result<Animation> {
    let bytes = std::fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
    let animation =
        decode_animation(&bytes).with_context(|| format!("cannot decode {}", path.display()))?;
    log::info!(
        "loaded {} ({} frames, loop {:?})",
        path.display(),
        animation.frame_count(),
        animation.loop_count
    );
    Ok(animation)
}

/// [`load_animation`] over in-memory bytes.
///
/// # Errors
/// Returns an error if the bytes are not a valid GIF.
pub fn decode_animation(bytes: &[u8]) -> Result<Animation> {
    let meta = read_metadata(bytes)?;

    let decoder = GifDecoder::new(Cursor::new(bytes))?;
    let decoded = decoder.into_frames().collect_frames()?;

    let mut frames = Vec::with_capacity(decoded.len());
    let mut delays_ms = Vec::with_capacity(decoded.len());
    for frame in decoded {
        let (numer, denom) = frame.delay().numer_denom_ms();
        delays_ms.push(numer / denom.max(1));

        let rgba = frame.into_buffer();
        let (width, height) = rgba.dimensions();
        let colors = rgba.pixels().map(|p| Rgb(p.0[0], p.0[1], p.0[2])).collect();
        frames.push(PixelGrid::from_rgb(width, height, colors)?);
    }

    Ok(Animation {
        frames,
        delays_ms,
        loop_count: meta.loop_count,
        palette: meta.palette,
        background_index: meta.background_index,
    })
}
