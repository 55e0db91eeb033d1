use std::collections::HashMap;
use std::ops::RangeInclusive;

use ab_glyph::{Font, FontArc, PxScale, ScaleFont, point};
use anyhow::{Context, Result};
use image::{Rgb as Pixel, RgbImage};
use pg_core::color::Rgb;
use pg_core::error::CoreError;
use pg_glyph::raster::{GlyphPlacement, RasterPlacements};
use rayon::prelude::*;

/// Ranges rasterized up front: printable ASCII, Latin-1 symbols, box drawing
/// and block elements, geometric shapes.
const PRECACHED: [RangeInclusive<u32>; 3] = [0x20..=0x7E, 0xA0..=0xFF, 0x2500..=0x25FF];

/// Coverage mask of one glyph, positioned relative to its cell's top-left.
#[derive(Clone, Debug, Default)]
struct GlyphMask {
    left: i32,
    top: i32,
    width: u32,
    height: u32,
    coverage: Vec<u8>,
}

impl GlyphMask {
    fn ink(&self) -> u64 {
        self.coverage.iter().map(|&c| u64::from(c)).sum()
    }
}

/// Draws glyph placements onto RGB canvases.
///
/// Maintien d'un cache de masques : les plages courantes sont rasterisées à
/// la construction, le reste à la demande.
///
/// # Example
/// ```no_run
/// use pg_export::rasterizer::Rasterizer;
/// let font = std::fs::read("DejaVuSansMono.ttf").unwrap();
/// let rasterizer = Rasterizer::new(font, 10.0).unwrap();
/// ```
pub struct Rasterizer {
    font: FontArc,
    scale: PxScale,
    ascent: f32,
    glyph_cache: HashMap<char, GlyphMask>,
}

impl Rasterizer {
    /// Parse a TTF/OTF font and pre-rasterize the common ranges at `px_size`.
    ///
    /// # Errors
    /// Retourne une erreur si la police fournie est invalide.
    pub fn new(font_data: Vec<u8>, px_size: f32) -> Result<Self> {
        let font = FontArc::try_from_vec(font_data).context("invalid font data")?;
        let scale = PxScale::from(px_size);
        let ascent = font.as_scaled(scale).ascent();

        let mut rasterizer = Self {
            font,
            scale,
            ascent,
            glyph_cache: HashMap::new(),
        };
        for range in PRECACHED {
            rasterizer.cache_range(range);
        }
        log::debug!(
            "rasterizer: {} glyphs cached at {px_size}px",
            rasterizer.glyph_cache.len()
        );
        Ok(rasterizer)
    }

    /// Load a font file and build a rasterizer from it.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a font.
    pub fn from_file(path: &std::path::Path, px_size: f32) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::FileNotFound {
                path: path.display().to_string(),
            }
            .into());
        }
        let data =
            std::fs::read(path).with_context(|| format!("cannot read font {}", path.display()))?;
        Self::new(data, px_size)
    }

    fn cache_range(&mut self, range: RangeInclusive<u32>) {
        for ch in range.filter_map(char::from_u32) {
            if let Some(mask) = self.rasterize(ch) {
                self.glyph_cache.insert(ch, mask);
            }
        }
    }

    /// Coverage mask of `ch`, or None if the font has no glyph for it.
    fn rasterize(&self, ch: char) -> Option<GlyphMask> {
        // glyph id 0 = .notdef
        let gid = self.font.glyph_id(ch);
        if gid.0 == 0 {
            return None;
        }
        let glyph = gid.with_scale_and_position(self.scale, point(0.0, self.ascent));
        let Some(outline) = self.font.outline_glyph(glyph) else {
            // Whitespace: known to the font but nothing to draw.
            return Some(GlyphMask::default());
        };

        let bounds = outline.px_bounds();
        let width = bounds.width() as u32;
        let height = bounds.height() as u32;
        let mut coverage = vec![0u8; (width * height) as usize];
        outline.draw(|x, y, v| {
            if x < width && y < height {
                coverage[(y * width + x) as usize] = (v.clamp(0.0, 1.0) * 255.0).round() as u8;
            }
        });
        Some(GlyphMask {
            left: bounds.min.x as i32,
            top: bounds.min.y as i32,
            width,
            height,
            coverage,
        })
    }

    /// Rasterize and cache every glyph of `placements` not cached yet.
    pub fn warm(&mut self, placements: &RasterPlacements) {
        for p in &placements.placements {
            if !self.glyph_cache.contains_key(&p.glyph)
                && let Some(mask) = self.rasterize(p.glyph)
            {
                self.glyph_cache.insert(p.glyph, mask);
            }
        }
    }

    /// Total ink of `ch` at this size (sum of coverage bytes), None if the
    /// font lacks it.
    #[must_use]
    pub fn ink(&self, ch: char) -> Option<u64> {
        match self.glyph_cache.get(&ch) {
            Some(mask) => Some(mask.ink()),
            None => self.rasterize(ch).map(|m| m.ink()),
        }
    }

    /// Draw one frame: background fill, then every glyph alpha-blended in
    /// its placement color. Glyphs missing from the font are skipped.
    #[must_use]
    pub fn draw(&self, placements: &RasterPlacements) -> RgbImage {
        let mut canvas = RgbImage::from_pixel(
            placements.width,
            placements.height,
            to_pixel(placements.background),
        );
        for p in &placements.placements {
            match self.glyph_cache.get(&p.glyph) {
                Some(mask) => blend(&mut canvas, mask, p),
                None => {
                    if let Some(mask) = self.rasterize(p.glyph) {
                        blend(&mut canvas, &mask, p);
                    }
                }
            }
        }
        canvas
    }

    /// [`Rasterizer::draw`] over many frames on the rayon pool, in order.
    #[must_use]
    pub fn draw_all(&self, frames: &[RasterPlacements]) -> Vec<RgbImage> {
        frames.par_iter().map(|f| self.draw(f)).collect()
    }
}

fn to_pixel(c: Rgb) -> Pixel<u8> {
    Pixel([c.0, c.1, c.2])
}

fn blend(canvas: &mut RgbImage, mask: &GlyphMask, placement: &GlyphPlacement) {
    let (cw, ch) = (canvas.width() as i32, canvas.height() as i32);
    let fg = [placement.color.0, placement.color.1, placement.color.2];
    let origin_x = placement.x + mask.left;
    let origin_y = placement.y + mask.top;

    for my in 0..mask.height {
        let y = origin_y + my as i32;
        if y < 0 || y >= ch {
            continue;
        }
        for mx in 0..mask.width {
            let x = origin_x + mx as i32;
            if x < 0 || x >= cw {
                continue;
            }
            let alpha = mask.coverage[(my * mask.width + mx) as usize];
            if alpha == 0 {
                continue;
            }
            let a = f32::from(alpha) / 255.0;
            let px = canvas.get_pixel_mut(x as u32, y as u32);
            for (dst, src) in px.0.iter_mut().zip(fg) {
                *dst = (f32::from(src) * a + f32::from(*dst) * (1.0 - a)).round() as u8;
            }
        }
    }
}
