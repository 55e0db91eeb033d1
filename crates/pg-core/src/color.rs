use serde::{Deserialize, Serialize};

/// An RGB color, one byte per channel.
///
/// Serialized as a three-element array so config files read `[5, 5, 5]`.
///
/// # Example
/// ```
/// use pg_core::color::Rgb;
/// let c = Rgb(200, 50, 50);
/// assert_eq!(c.max_channel(), 200);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Pure black.
    pub const BLACK: Self = Self(0, 0, 0);
    /// Pure white.
    pub const WHITE: Self = Self(255, 255, 255);

    /// Brightest channel.
    #[inline(always)]
    #[must_use]
    pub fn max_channel(self) -> u8 {
        self.0.max(self.1).max(self.2)
    }

    /// Darkest channel.
    #[inline(always)]
    #[must_use]
    pub fn min_channel(self) -> u8 {
        self.0.min(self.1).min(self.2)
    }

    /// Gray color with every channel set to `level`.
    #[inline(always)]
    #[must_use]
    pub fn gray(level: u8) -> Self {
        Self(level, level, level)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self(r, g, b)
    }
}

impl From<Rgb> for (u8, u8, u8) {
    fn from(c: Rgb) -> Self {
        (c.0, c.1, c.2)
    }
}

/// An HSV color.
///
/// H ∈ [0.0, 360.0) in degrees, S ∈ [0.0, 1.0], V ∈ [0.0, 1.0].
///
/// The value channel is always normalized. Callers that need the raw
/// brightest-channel byte use [`Hsv::value_byte`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Hsv {
    /// Hue in degrees. 0 for grays.
    pub h: f32,
    /// Saturation.
    pub s: f32,
    /// Value (brightness), normalized.
    pub v: f32,
}

impl Hsv {
    /// Value channel scaled back to [0, 255].
    ///
    /// # Example
    /// ```
    /// use pg_core::color::{rgb_to_hsv, Rgb};
    /// assert_eq!(rgb_to_hsv(Rgb(10, 200, 30)).value_byte(), 200);
    /// ```
    #[must_use]
    pub fn value_byte(self) -> u8 {
        (self.v * 255.0).round().clamp(0.0, 255.0) as u8
    }
}

/// Perceptual luminance weights (R, G, B).
pub const LUMA_WEIGHTS: (f32, f32, f32) = (0.2125, 0.7154, 0.0721);

/// Default lift applied to glyph colors drawn on a dark canvas.
pub const DEFAULT_BRIGHTEN: u8 = 20;

/// Convertit RGB [0,255] → HSV. H in degrees, S and V normalized.
///
/// Grays (zero chroma) get hue 0 and saturation 0.
///
/// # Example
/// ```
/// use pg_core::color::{rgb_to_hsv, Rgb};
/// let hsv = rgb_to_hsv(Rgb(255, 0, 0));
/// assert!((hsv.h - 0.0).abs() < 0.01);
/// assert!((hsv.s - 1.0).abs() < 0.01);
/// assert!((hsv.v - 1.0).abs() < 0.01);
/// ```
#[must_use]
pub fn rgb_to_hsv(color: Rgb) -> Hsv {
    let r = f32::from(color.0);
    let g = f32::from(color.1);
    let b = f32::from(color.2);

    let value = f32::from(color.max_channel());
    let chroma = value - f32::from(color.min_channel());

    let h = if chroma == 0.0 {
        0.0
    } else if color.max_channel() == color.0 {
        (60.0 * ((g - b) / chroma)).rem_euclid(360.0)
    } else if color.max_channel() == color.1 {
        60.0 * (2.0 + (b - r) / chroma)
    } else {
        60.0 * (4.0 + (r - g) / chroma)
    };
    let s = if value == 0.0 { 0.0 } else { chroma / value };

    Hsv {
        h,
        s,
        v: value / 255.0,
    }
}

/// Convertit HSV → RGB [0,255] using the hexagonal-segment algorithm.
///
/// Hue is wrapped into [0, 360). Saturation and value are clamped to
/// [0, 1] and every output channel is clamped to [0, 255].
///
/// # Example
/// ```
/// use pg_core::color::{hsv_to_rgb, Hsv, Rgb};
/// assert_eq!(hsv_to_rgb(Hsv { h: 0.0, s: 1.0, v: 1.0 }), Rgb(255, 0, 0));
/// assert_eq!(hsv_to_rgb(Hsv { h: 480.0, s: 1.0, v: 1.0 }), Rgb(0, 255, 0));
/// ```
#[must_use]
pub fn hsv_to_rgb(hsv: Hsv) -> Rgb {
    let h = hsv.h.rem_euclid(360.0);
    let s = hsv.s.clamp(0.0, 1.0);
    let v = hsv.v.clamp(0.0, 1.0);

    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let (r, g, b) = match h {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = v - c;

    Rgb(to_channel(r + m), to_channel(g + m), to_channel(b + m))
}

#[inline(always)]
fn to_channel(unit: f32) -> u8 {
    (unit * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Stretch a color so its brightest channel becomes 255, keeping hue and
/// saturation.
///
/// Pure black has no hue to keep and maps to white.
///
/// # Example
/// ```
/// use pg_core::color::{max_rgb_value, Rgb};
/// assert_eq!(max_rgb_value(Rgb(0, 0, 0)), Rgb(255, 255, 255));
/// assert_eq!(max_rgb_value(Rgb(128, 64, 32)).max_channel(), 255);
/// ```
#[must_use]
pub fn max_rgb_value(color: Rgb) -> Rgb {
    let v = f32::from(color.max_channel());
    if v == 0.0 {
        return Rgb::WHITE;
    }
    let stretch = |c: u8| (f32::from(c) / v * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb(stretch(color.0), stretch(color.1), stretch(color.2))
}

/// Apply [`max_rgb_value`] to every color of a slice.
#[must_use]
pub fn max_rgb_values(colors: &[Rgb]) -> Vec<Rgb> {
    colors.iter().copied().map(max_rgb_value).collect()
}

/// Perceptual luminance `0.2125 R + 0.7154 G + 0.0721 B`, rounded.
///
/// # Example
/// ```
/// use pg_core::color::{rgb_to_monochrome, Rgb};
/// assert_eq!(rgb_to_monochrome(Rgb(255, 255, 255)), 255);
/// assert_eq!(rgb_to_monochrome(Rgb(0, 0, 0)), 0);
/// ```
#[inline(always)]
#[must_use]
pub fn rgb_to_monochrome(color: Rgb) -> u8 {
    let (wr, wg, wb) = LUMA_WEIGHTS;
    let lum = wr * f32::from(color.0) + wg * f32::from(color.1) + wb * f32::from(color.2);
    lum.round().clamp(0.0, 255.0) as u8
}

/// Add `delta` to every channel, saturating at 255.
///
/// # Example
/// ```
/// use pg_core::color::{brighten, Rgb};
/// assert_eq!(brighten(Rgb(250, 250, 250), 20), Rgb(255, 255, 255));
/// assert_eq!(brighten(Rgb(10, 20, 30), 20), Rgb(30, 40, 50));
/// ```
#[inline(always)]
#[must_use]
pub fn brighten(color: Rgb, delta: u8) -> Rgb {
    Rgb(
        color.0.saturating_add(delta),
        color.1.saturating_add(delta),
        color.2.saturating_add(delta),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grays_have_no_hue_or_saturation() {
        for level in 0..=255u8 {
            let hsv = rgb_to_hsv(Rgb::gray(level));
            assert_eq!(hsv.h, 0.0, "hue for gray {level}");
            assert_eq!(hsv.s, 0.0, "saturation for gray {level}");
        }
    }

    #[test]
    fn rgb_hsv_roundtrip() {
        for r in (0..=255).step_by(17) {
            for g in (0..=255).step_by(17) {
                for b in (0..=255).step_by(17) {
                    let c = Rgb(r as u8, g as u8, b as u8);
                    let hsv = rgb_to_hsv(c);
                    let back = hsv_to_rgb(hsv);
                    assert!(
                        (i16::from(c.0) - i16::from(back.0)).abs() <= 1,
                        "R mismatch: {c:?} vs {back:?} ({hsv:?})"
                    );
                    assert!(
                        (i16::from(c.1) - i16::from(back.1)).abs() <= 1,
                        "G mismatch: {c:?} vs {back:?}"
                    );
                    assert!(
                        (i16::from(c.2) - i16::from(back.2)).abs() <= 1,
                        "B mismatch: {c:?} vs {back:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn hue_by_dominant_channel() {
        assert!((rgb_to_hsv(Rgb(0, 255, 0)).h - 120.0).abs() < 0.01);
        assert!((rgb_to_hsv(Rgb(0, 0, 255)).h - 240.0).abs() < 0.01);
        // Red max with blue > green lands in the upper segment, not negative.
        let magenta_red = rgb_to_hsv(Rgb(255, 0, 128));
        assert!(magenta_red.h > 300.0 && magenta_red.h < 360.0);
    }

    #[test]
    fn hsv_to_rgb_clamps_out_of_range_input() {
        let c = hsv_to_rgb(Hsv {
            h: -30.0,
            s: 4.0,
            v: 9.0,
        });
        assert_eq!(c.max_channel(), 255);
        assert_eq!(hsv_to_rgb(Hsv { h: 0.0, s: 0.0, v: -1.0 }), Rgb::BLACK);
    }

    #[test]
    fn value_is_normalized() {
        let hsv = rgb_to_hsv(Rgb(0, 0, 51));
        assert!((hsv.v - 0.2).abs() < 1e-6);
        assert_eq!(hsv.value_byte(), 51);
    }

    #[test]
    fn max_value_stretch() {
        assert_eq!(max_rgb_value(Rgb::BLACK), Rgb::WHITE);
        assert_eq!(max_rgb_value(Rgb(128, 64, 32)), Rgb(255, 128, 64));
        assert_eq!(max_rgb_value(Rgb(1, 1, 1)), Rgb::WHITE);
        let stretched = max_rgb_values(&[Rgb(0, 10, 0), Rgb(255, 0, 0)]);
        assert_eq!(stretched, vec![Rgb(0, 255, 0), Rgb(255, 0, 0)]);
    }

    #[test]
    fn monochrome_weights() {
        assert_eq!(rgb_to_monochrome(Rgb::WHITE), 255);
        assert_eq!(rgb_to_monochrome(Rgb::BLACK), 0);
        assert_eq!(rgb_to_monochrome(Rgb(0, 255, 0)), 182);
        assert_eq!(rgb_to_monochrome(Rgb(255, 0, 0)), 54);
    }

    #[test]
    fn brighten_saturates() {
        assert_eq!(brighten(Rgb(250, 250, 250), 20), Rgb::WHITE);
        assert_eq!(
            brighten(Rgb(240, 0, 235), DEFAULT_BRIGHTEN),
            Rgb(255, 20, 255)
        );
    }
}
