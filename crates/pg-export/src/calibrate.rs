use std::ops::RangeInclusive;
use std::path::Path;

use anyhow::{Context, Result, bail};
use pg_core::charset::BucketTable;

use crate::rasterizer::Rasterizer;

/// Code points measured by the calibration: printable ASCII, the Latin-1
/// degree/fraction block, box drawing through geometric shapes.
pub const CALIBRATION_RANGES: [RangeInclusive<u32>; 3] =
    [0x20..=0x7E, 0xB0..=0xBE, 0x2500..=0x25FF];

/// Ink coverage of every calibration symbol the font can draw.
#[must_use]
pub fn measure(rasterizer: &Rasterizer) -> Vec<(char, u64)> {
    CALIBRATION_RANGES
        .into_iter()
        .flatten()
        .filter_map(char::from_u32)
        .filter_map(|ch| rasterizer.ink(ch).map(|ink| (ch, ink)))
        .collect()
}

/// Group symbols by relative ink, lightest group first.
///
/// Relative ink is `ink / max_ink` rounded to two decimals; symbols with the
/// same value share a group and keep their measurement order.
///
/// # Example
/// ```
/// use pg_export::calibrate::group_by_brightness;
/// let groups = group_by_brightness(&[('#', 90), (' ', 0), ('.', 8), ('`', 8)]);
/// assert_eq!(groups, vec![" ", ".`", "#"]);
/// ```
#[must_use]
pub fn group_by_brightness(samples: &[(char, u64)]) -> Vec<String> {
    let max = samples.iter().map(|&(_, ink)| ink).max().unwrap_or(0).max(1);
    // Hundredths, so equal brightness compares exactly.
    let level = |ink: u64| (ink as f64 / max as f64 * 100.0).round() as u32;

    let mut ranked: Vec<(u32, char)> = samples.iter().map(|&(ch, ink)| (level(ink), ch)).collect();
    ranked.sort_by_key(|&(l, _)| l);

    let mut groups: Vec<String> = Vec::new();
    let mut current = None;
    for (l, ch) in ranked {
        match groups.last_mut() {
            Some(group) if current == Some(l) => group.push(ch),
            _ => {
                groups.push(ch.to_string());
                current = Some(l);
            }
        }
    }
    groups
}

/// Measure a font and build its brightness table.
///
/// # Errors
/// Returns an error if the font draws none of the calibration symbols.
pub fn calibrate(rasterizer: &Rasterizer) -> Result<BucketTable> {
    let samples = measure(rasterizer);
    if samples.is_empty() {
        bail!("font covers none of the calibration symbols");
    }
    let groups = group_by_brightness(&samples);
    log::info!(
        "calibrated {} symbols into {} brightness groups",
        samples.len(),
        groups.len()
    );
    Ok(BucketTable::from_groups(groups)?)
}

/// Calibrate the font at `font_path` and write the table as TOML.
///
/// # Errors
/// Returns an error if the font cannot be loaded or the table written.
pub fn calibrate_font(font_path: &Path, px_size: f32, out: &Path) -> Result<BucketTable> {
    let rasterizer = Rasterizer::from_file(font_path, px_size)?;
    let table = calibrate(&rasterizer)?;
    std::fs::write(out, table.to_toml()?)
        .with_context(|| format!("cannot write {}", out.display()))?;
    log::info!("wrote {}", out.display());
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_levels_share_a_group() {
        // 50/100 and 504/1000 both round to 0.50.
        let samples = [('a', 504), ('b', 1000), ('c', 500), ('d', 0)];
        assert_eq!(group_by_brightness(&samples), vec!["d", "ac", "b"]);
    }

    #[test]
    fn sort_is_stable() {
        let samples = [('z', 10), ('y', 10), ('x', 10)];
        assert_eq!(group_by_brightness(&samples), vec!["zyx"]);
    }

    #[test]
    fn all_blank_is_one_group() {
        let samples = [(' ', 0), ('\u{a0}', 0)];
        assert_eq!(group_by_brightness(&samples), vec![" \u{a0}"]);
    }

    #[test]
    fn nothing_in_nothing_out() {
        assert!(group_by_brightness(&[]).is_empty());
    }

    #[test]
    fn groups_feed_a_bucket_table() {
        let groups = group_by_brightness(&[(' ', 0), ('#', 100)]);
        let table = BucketTable::from_groups(groups).unwrap();
        assert_eq!(table.bucket(0), &[' ']);
        assert_eq!(table.bucket(255), &['#']);
    }

    #[test]
    fn ranges_cover_expected_symbols() {
        let count: usize = CALIBRATION_RANGES.iter().map(|r| r.clone().count()).sum();
        assert_eq!(count, 95 + 15 + 256);
    }
}
