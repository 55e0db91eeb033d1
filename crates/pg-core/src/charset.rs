use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// 10 caractères, compact, bon contraste. Default brightness ramp.
pub const CHARSET_COMPACT: &str = " .:-=+*#%@";

/// Single diagonal block used when the cycle mode gets no symbols.
pub const DEFAULT_BLOCK: &str = "▚";

/// Unicode block elements (U+2580..=U+259F).
pub const BLOCK_ELEMENTS: std::ops::RangeInclusive<u32> = 0x2580..=0x259F;

/// Printable ASCII without space (U+0021..=U+007E).
pub const PRINTABLE_ASCII: std::ops::RangeInclusive<u32> = 0x21..=0x7E;

/// Non-empty ordered sequence of glyphs. Duplicates are kept.
///
/// # Example
/// ```
/// use pg_core::charset::Charset;
/// let cs = Charset::new("AB").unwrap();
/// assert_eq!(cs.len(), 2);
/// assert!(Charset::new("").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Charset {
    glyphs: Vec<char>,
}

impl Charset {
    /// Build a charset from the characters of `symbols`.
    ///
    /// # Errors
    /// Returns [`CoreError::EmptyCharset`] if `symbols` has no characters.
    pub fn new(symbols: &str) -> Result<Self, CoreError> {
        Self::from_glyphs(symbols.chars().collect())
    }

    /// Build a charset from an explicit glyph list.
    ///
    /// # Errors
    /// Returns [`CoreError::EmptyCharset`] if `glyphs` is empty.
    pub fn from_glyphs(glyphs: Vec<char>) -> Result<Self, CoreError> {
        if glyphs.is_empty() {
            return Err(CoreError::EmptyCharset);
        }
        Ok(Self { glyphs })
    }

    /// Every valid `char` in a code-point range, in order.
    ///
    /// # Errors
    /// Returns [`CoreError::EmptyCharset`] if the range holds no valid `char`.
    ///
    /// # Example
    /// ```
    /// use pg_core::charset::{Charset, BLOCK_ELEMENTS};
    /// let blocks = Charset::from_range(BLOCK_ELEMENTS).unwrap();
    /// assert_eq!(blocks.len(), 32);
    /// assert_eq!(blocks.glyphs()[0], '▀');
    /// ```
    pub fn from_range(range: std::ops::RangeInclusive<u32>) -> Result<Self, CoreError> {
        Self::from_glyphs(range.filter_map(char::from_u32).collect())
    }

    /// Glyphs in order.
    #[must_use]
    pub fn glyphs(&self) -> &[char] {
        &self.glyphs
    }

    /// Number of glyphs, always ≥ 1.
    #[must_use]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Always false; kept for API symmetry with slices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

/// Brightness-ordered glyph groups, lightest first.
///
/// Each group holds glyphs of equal measured ink coverage. A 256-entry
/// lookup maps a brightness byte to its group index with
/// `round(brightness / 255 * (len - 1))`, computed once at construction.
///
/// # Example
/// ```
/// use pg_core::charset::BucketTable;
/// let table = BucketTable::from_groups(vec![".".into(), "#".into()]).unwrap();
/// assert_eq!(table.bucket(0), &['.']);
/// assert_eq!(table.bucket(127), &['.']);
/// assert_eq!(table.bucket(255), &['#']);
/// ```
#[derive(Clone, Debug)]
pub struct BucketTable {
    groups: Vec<Vec<char>>,
    lut: [u16; 256],
}

/// On-disk form of a bucket table, as written by the calibration tool.
#[derive(Debug, Deserialize, Serialize)]
struct BucketTableFile {
    groups: Vec<String>,
}

impl BucketTable {
    /// Build a table from one string per brightness group.
    ///
    /// # Errors
    /// Returns [`CoreError::EmptyCharset`] if there are no groups or any group
    /// is empty, and [`CoreError::Config`] past `u16::MAX` groups.
    pub fn from_groups(groups: Vec<String>) -> Result<Self, CoreError> {
        let groups: Vec<Vec<char>> = groups.iter().map(|g| g.chars().collect()).collect();
        if groups.is_empty() || groups.iter().any(Vec::is_empty) {
            return Err(CoreError::EmptyCharset);
        }
        if groups.len() > usize::from(u16::MAX) {
            return Err(CoreError::Config(format!(
                "bucket table has {} groups",
                groups.len()
            )));
        }
        let last = (groups.len() - 1) as f32;
        let mut lut = [0u16; 256];
        for (i, slot) in lut.iter_mut().enumerate() {
            *slot = (i as f32 / 255.0 * last).round() as u16;
        }
        Ok(Self { groups, lut })
    }

    /// One single-glyph group per character of `charset`.
    ///
    /// # Errors
    /// Returns [`CoreError::EmptyCharset`] if `charset` is empty.
    ///
    /// # Example
    /// ```
    /// use pg_core::charset::{BucketTable, CHARSET_COMPACT};
    /// let table = BucketTable::from_charset(CHARSET_COMPACT).unwrap();
    /// assert_eq!(table.len(), 10);
    /// assert_eq!(table.bucket(255), &['@']);
    /// ```
    pub fn from_charset(charset: &str) -> Result<Self, CoreError> {
        Self::from_groups(charset.chars().map(String::from).collect())
    }

    /// Load a table written by the calibration tool (`groups = [...]`).
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or holds an
    /// empty group.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Err(CoreError::FileNotFound {
                path: path.display().to_string(),
            }
            .into());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read bucket table {}", path.display()))?;
        let file: BucketTableFile = toml::from_str(&content)
            .with_context(|| format!("TOML parse error in {}", path.display()))?;
        let table = Self::from_groups(file.groups)?;
        log::debug!(
            "loaded {} brightness groups from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    /// Serialize back to the calibration file format.
    ///
    /// # Errors
    /// Returns an error if TOML serialization fails.
    pub fn to_toml(&self) -> anyhow::Result<String> {
        let file = BucketTableFile {
            groups: self.groups.iter().map(|g| g.iter().collect()).collect(),
        };
        Ok(toml::to_string(&file)?)
    }

    /// Group index for a brightness byte.
    #[inline(always)]
    #[must_use]
    pub fn index(&self, brightness: u8) -> usize {
        usize::from(self.lut[usize::from(brightness)])
    }

    /// Candidate glyphs for a brightness byte.
    #[inline(always)]
    #[must_use]
    pub fn bucket(&self, brightness: u8) -> &[char] {
        &self.groups[self.index(brightness)]
    }

    /// Number of groups, always ≥ 1.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Always false; kept for API symmetry with slices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// All groups, lightest first.
    #[must_use]
    pub fn groups(&self) -> &[Vec<char>] {
        &self.groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_charset_is_rejected() {
        assert_eq!(Charset::new(""), Err(CoreError::EmptyCharset));
        assert_eq!(
            Charset::from_glyphs(Vec::new()),
            Err(CoreError::EmptyCharset)
        );
    }

    #[test]
    fn charset_keeps_duplicates_and_order() {
        let cs = Charset::new("abca").unwrap();
        assert_eq!(cs.glyphs(), &['a', 'b', 'c', 'a']);
    }

    #[test]
    fn printable_ascii_bounds() {
        let cs = Charset::from_range(PRINTABLE_ASCII).unwrap();
        assert_eq!(cs.len(), 94);
        assert_eq!(cs.glyphs().first(), Some(&'!'));
        assert_eq!(cs.glyphs().last(), Some(&'~'));
    }

    #[test]
    fn bucket_table_rejects_empty_groups() {
        assert!(BucketTable::from_groups(Vec::new()).is_err());
        assert!(BucketTable::from_groups(vec![".".into(), String::new()]).is_err());
    }

    #[test]
    fn single_group_table_maps_everything_to_it() {
        let table = BucketTable::from_groups(vec!["xy".into()]).unwrap();
        assert_eq!(table.index(0), 0);
        assert_eq!(table.index(255), 0);
    }

    #[test]
    fn bucket_index_is_monotonic_and_spans_table() {
        let table = BucketTable::from_charset(CHARSET_COMPACT).unwrap();
        let mut prev = 0usize;
        for b in 0..=255u8 {
            let idx = table.index(b);
            assert!(idx >= prev, "index non monotone at brightness {b}");
            prev = idx;
        }
        assert_eq!(table.index(0), 0);
        assert_eq!(table.index(255), table.len() - 1);
    }

    #[test]
    fn bucket_index_rounds() {
        let table = BucketTable::from_groups(vec![".".into(), "#".into()]).unwrap();
        assert_eq!(table.index(127), 0);
        assert_eq!(table.index(128), 1);
    }

    #[test]
    fn table_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.toml");
        let table = BucketTable::from_groups(vec![" ".into(), ".,".into(), "#@".into()]).unwrap();
        std::fs::write(&path, table.to_toml().unwrap()).unwrap();

        let loaded = BucketTable::load(&path).unwrap();
        assert_eq!(loaded.groups(), table.groups());
    }

    #[test]
    fn table_file_missing_is_error() {
        let err = BucketTable::load(Path::new("/nonexistent/table.toml")).unwrap_err();
        assert_eq!(
            err.downcast_ref::<CoreError>(),
            Some(&CoreError::FileNotFound {
                path: "/nonexistent/table.toml".to_string()
            })
        );
    }
}
