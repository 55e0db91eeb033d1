//! Glyph selection and text rendering for pixglyph.
//!
//! Strategies turn a sampled pixel grid into one glyph per cell; renderers
//! pair those glyphs with the grid's colors for a terminal or a raster
//! canvas; the animation adapter does both for every frame of a GIF.

pub mod animation;
pub mod bucketed;
pub mod cycle;
pub mod mode;
pub mod random;
pub mod raster;
pub mod terminal;

pub use animation::{FrameSchedule, RenderResult, RenderTarget, render_all, render_frame};
pub use mode::{Mode, StrategyOptions, create_strategy, strategy_for};
