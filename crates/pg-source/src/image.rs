use std::path::Path;

use anyhow::{Context, Result};
use image::DynamicImage;
use pg_core::color::Rgb;
use pg_core::frame::PixelGrid;

/// Load a still image from disk at native resolution.
///
/// Grayscale files keep a single brightness channel; everything else is
/// converted to RGB with alpha dropped.
///
/// # Errors
/// Returns an error if the image cannot be loaded.
///
/// # Example
/// ```no_run
/// use pg_source::image::load_image;
/// use std::path::Path;
/// let grid = load_image(Path::new("photo.png")).unwrap();
/// ```
pub fn load_image(path: &Path) -> Result<PixelGrid> {
    let img = image::open(path).with_context(|| format!("cannot load {}", path.display()))?;
    log::info!(
        "loaded {} ({}x{}, {:?})",
        path.display(),
        img.width(),
        img.height(),
        img.color()
    );
    grid_from_dynamic(&img)
}

/// Convert a decoded image to a pixel grid.
///
/// # Errors
/// Returns an error for a zero-sized image.
pub fn grid_from_dynamic(img: &DynamicImage) -> Result<PixelGrid> {
    let (width, height) = (img.width(), img.height());
    let grid = if img.color().has_color() {
        let colors = img
            .to_rgb8()
            .pixels()
            .map(|p| Rgb(p.0[0], p.0[1], p.0[2]))
            .collect();
        PixelGrid::from_rgb(width, height, colors)?
    } else {
        PixelGrid::from_luma(width, height, img.to_luma8().into_raw())?
    };
    Ok(grid)
}

/// True when the path has a `.gif` extension (any case).
///
/// # Example
/// ```
/// use pg_source::image::is_gif;
/// use std::path::Path;
/// assert!(is_gif(Path::new("cat.GIF")));
/// assert!(!is_gif(Path::new("cat.png")));
/// ```
#[must_use]
pub fn is_gif(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gif"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgba, RgbaImage};
    use pg_core::frame::ChannelLayout;

    #[test]
    fn color_png_loads_as_rgb() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.png");
        let mut img = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255]));
        img.put_pixel(2, 1, Rgba([200, 0, 0, 0]));
        img.save(&path).unwrap();

        let grid = load_image(&path).unwrap();
        assert_eq!((grid.width, grid.height), (3, 2));
        assert_eq!(grid.layout(), ChannelLayout::Rgb);
        assert_eq!(grid.color(0), Rgb(10, 20, 30));
        assert_eq!(grid.color(5), Rgb(200, 0, 0));
    }

    #[test]
    fn gray_png_keeps_single_channel() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("g.png");
        GrayImage::from_pixel(2, 2, Luma([99])).save(&path).unwrap();

        let grid = load_image(&path).unwrap();
        assert_eq!(grid.layout(), ChannelLayout::Luma);
        assert_eq!(grid.color(3), Rgb::gray(99));
    }

    #[test]
    fn missing_file_is_error() {
        assert!(load_image(Path::new("/nonexistent/nothing.png")).is_err());
    }
}
