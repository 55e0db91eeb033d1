//! Color math, shared types, traits, and configuration for pixglyph.
//!
//! This crate holds everything the strategy, source, export, and app crates
//! agree on: the RGB/HSV value types and their conversions, charsets and
//! brightness bucket tables, the pixel grid data model, and the TOML config.

pub mod charset;
pub mod color;
pub mod config;
pub mod error;
pub mod frame;
pub mod layout;
pub mod traits;

pub use charset::{BucketTable, Charset};
pub use color::{Hsv, Rgb};
pub use config::Config;
pub use error::CoreError;
pub use frame::{Animation, ChannelLayout, GlyphSequence, LoopCount, PixelGrid, Pixels};
pub use traits::{GlyphStrategy, Resample};

