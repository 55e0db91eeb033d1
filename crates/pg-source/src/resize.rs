use anyhow::{Context, Result, bail};
use fast_image_resize::images::Image;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer as FirResizer};
use pg_core::color::Rgb;
use pg_core::frame::{PixelGrid, Pixels};
use pg_core::traits::Resample;

/// Lanczos3 resampler backed by `fast_image_resize`.
///
/// Keeps the grid's channel layout: RGB grids resample as `U8x3`, luma grids
/// as `U8`. A fresh `fast_image_resize` resizer is built per call so the
/// resampler can be shared across rayon workers.
///
/// # Example
/// ```
/// use pg_core::color::Rgb;
/// use pg_core::frame::PixelGrid;
/// use pg_core::traits::Resample;
/// use pg_source::resize::LanczosResampler;
///
/// let src = PixelGrid::from_rgb(100, 100, vec![Rgb(0, 0, 0); 10_000]).unwrap();
/// let dst = LanczosResampler::new().resample(&src, 10, 5).unwrap();
/// assert_eq!((dst.width, dst.height), (10, 5));
/// ```
#[derive(Clone, Debug)]
pub struct LanczosResampler {
    options: ResizeOptions,
}

impl LanczosResampler {
    /// Create a Lanczos3 resampler.
    #[must_use]
    pub fn new() -> Self {
        Self {
            options: ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3)),
        }
    }

    fn resize_bytes(
        &self,
        bytes: Vec<u8>,
        src: (u32, u32),
        dst: (u32, u32),
        pixel_type: PixelType,
    ) -> Result<Vec<u8>> {
        let src_image = Image::from_vec_u8(src.0, src.1, bytes, pixel_type)
            .context("Invalid source dimensions")?;
        let mut dst_image = Image::new(dst.0, dst.1, pixel_type);
        FirResizer::new()
            .resize(&src_image, &mut dst_image, Some(&self.options))
            .context("Resize failed")?;
        Ok(dst_image.into_vec())
    }
}

impl Default for LanczosResampler {
    fn default() -> Self {
        Self::new()
    }
}

impl Resample for LanczosResampler {
    fn resample(&self, src: &PixelGrid, width: u32, height: u32) -> Result<PixelGrid> {
        if width == 0 || height == 0 {
            bail!("cannot resample to {width}x{height}");
        }
        if src.width == width && src.height == height {
            return Ok(src.clone());
        }
        let from = (src.width, src.height);
        let to = (width, height);

        let grid = match src.pixels() {
            Pixels::Rgb(colors) => {
                let bytes = colors.iter().flat_map(|c| [c.0, c.1, c.2]).collect();
                let out = self.resize_bytes(bytes, from, to, PixelType::U8x3)?;
                let colors = out.chunks_exact(3).map(|c| Rgb(c[0], c[1], c[2])).collect();
                PixelGrid::from_rgb(width, height, colors)?
            }
            Pixels::Luma(levels) => {
                let out = self.resize_bytes(levels.clone(), from, to, PixelType::U8)?;
                PixelGrid::from_luma(width, height, out)?
            }
        };
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pg_core::frame::ChannelLayout;

    #[test]
    fn uniform_color_survives() {
        let src = PixelGrid::from_rgb(64, 48, vec![Rgb(200, 100, 50); 64 * 48]).unwrap();
        let dst = LanczosResampler::new().resample(&src, 16, 6).unwrap();
        assert_eq!(dst.len(), 96);
        for c in dst.colors() {
            assert!(
                c.0.abs_diff(200) <= 1 && c.1.abs_diff(100) <= 1 && c.2.abs_diff(50) <= 1
            );
        }
    }

    #[test]
    fn luma_stays_luma() {
        let src = PixelGrid::from_luma(10, 10, vec![77; 100]).unwrap();
        let dst = LanczosResampler::new().resample(&src, 3, 2).unwrap();
        assert_eq!(dst.layout(), ChannelLayout::Luma);
        assert!(dst.colors().all(|c| c.0.abs_diff(77) <= 1));
    }

    #[test]
    fn upscale_works() {
        let src = PixelGrid::from_rgb(2, 2, vec![Rgb::WHITE; 4]).unwrap();
        let dst = LanczosResampler::new().resample(&src, 8, 8).unwrap();
        assert_eq!((dst.width, dst.height), (8, 8));
    }

    #[test]
    fn same_size_is_identity() {
        let src = PixelGrid::from_rgb(2, 1, vec![Rgb(1, 2, 3), Rgb(4, 5, 6)]).unwrap();
        let dst = LanczosResampler::new().resample(&src, 2, 1).unwrap();
        assert_eq!(dst, src);
    }

    #[test]
    fn zero_target_is_error() {
        let src = PixelGrid::from_luma(2, 2, vec![0; 4]).unwrap();
        assert!(LanczosResampler::new().resample(&src, 0, 3).is_err());
    }
}
