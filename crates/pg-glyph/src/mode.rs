use std::fmt;
use std::str::FromStr;

use pg_core::charset::{BucketTable, CHARSET_COMPACT};
use pg_core::color::rgb_to_monochrome;
use pg_core::error::CoreError;
use pg_core::frame::ChannelLayout;
use pg_core::traits::GlyphStrategy;

use crate::bucketed::BucketedStrategy;
use crate::cycle::CycleStrategy;
use crate::random::RandomStrategy;

/// Glyph generation modes selectable from the command line.
///
/// # Example
/// ```
/// use pg_glyph::mode::Mode;
/// let mode: Mode = "hsv".parse().unwrap();
/// assert_eq!(mode, Mode::HsvValue);
/// assert!("sparkles".parse::<Mode>().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Cycle over custom symbols, default `▚`.
    Blocks,
    /// Random Unicode block elements.
    RandomBlocks,
    /// Glyph chosen by pixel brightness.
    HsvValue,
    /// Random custom symbols, default printable ASCII.
    RandomText,
}

impl Mode {
    /// Every mode, in help order.
    pub const ALL: [Self; 4] = [
        Self::Blocks,
        Self::RandomBlocks,
        Self::HsvValue,
        Self::RandomText,
    ];

    /// Identifier typed on the command line.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Blocks => "blocks",
            Self::RandomBlocks => "rand_blocks",
            Self::HsvValue => "hsv",
            Self::RandomText => "rand_text",
        }
    }

    /// Internal name shown next to the identifier in help output.
    #[must_use]
    pub fn internal_name(self) -> &'static str {
        match self {
            Self::Blocks => "BLOCKS",
            Self::RandomBlocks => "RANDOM_BLOCKS",
            Self::HsvValue => "HSV_VALUE",
            Self::RandomText => "RANDOM_TEXT",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Mode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.id() == s)
            .ok_or_else(|| CoreError::UnsupportedMode { mode: s.to_string() })
    }
}

/// Everything a mode may need to configure its strategy.
#[derive(Clone, Debug)]
pub struct StrategyOptions<'a> {
    /// Custom symbols (cycle/random modes, or the brightness ramp).
    pub symbols: Option<&'a str>,
    /// Calibrated brightness groups for `hsv`.
    pub bucket_table: Option<BucketTable>,
    /// Channel layout of the source image.
    pub layout: ChannelLayout,
}

impl Default for StrategyOptions<'_> {
    fn default() -> Self {
        Self {
            symbols: None,
            bucket_table: None,
            layout: ChannelLayout::Rgb,
        }
    }
}

/// Build the strategy a mode stands for.
///
/// For [`Mode::HsvValue`] the table is, in order of preference: the
/// calibrated table, the custom symbols as a one-glyph-per-level ramp, then
/// [`CHARSET_COMPACT`].
///
/// # Errors
/// Returns [`CoreError::EmptyCharset`] for empty custom symbols.
///
/// # Example
/// ```
/// use pg_glyph::mode::{create_strategy, Mode, StrategyOptions};
/// let s = create_strategy(Mode::Blocks, StrategyOptions::default()).unwrap();
/// assert_eq!(s.name(), "cycle");
/// ```
pub fn create_strategy(
    mode: Mode,
    options: StrategyOptions<'_>,
) -> Result<Box<dyn GlyphStrategy>, CoreError> {
    let strategy: Box<dyn GlyphStrategy> = match mode {
        Mode::Blocks => Box::new(CycleStrategy::from_symbols(options.symbols)?),
        Mode::RandomBlocks => Box::new(RandomStrategy::block_elements()?),
        Mode::HsvValue => {
            let table = match (options.bucket_table, options.symbols) {
                (Some(table), _) => table,
                (None, Some(ramp)) => BucketTable::from_charset(ramp)?,
                (None, None) => BucketTable::from_charset(CHARSET_COMPACT)?,
            };
            Box::new(BucketedStrategy::new(
                table,
                options.layout,
                Some(rgb_to_monochrome),
            )?)
        }
        Mode::RandomText => Box::new(RandomStrategy::from_symbols(options.symbols)?),
    };
    log::debug!("mode {mode} -> {} strategy", strategy.name());
    Ok(strategy)
}

/// Parse a mode identifier and build its strategy.
///
/// # Errors
/// Returns [`CoreError::UnsupportedMode`] for an unknown identifier, or any
/// error of [`create_strategy`].
pub fn strategy_for(
    id: &str,
    options: StrategyOptions<'_>,
) -> Result<Box<dyn GlyphStrategy>, CoreError> {
    create_strategy(id.parse()?, options)
}
