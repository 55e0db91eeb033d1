//! Output collaborators for pixglyph: glyph rasterization, PNG/GIF files,
//! and the offline font calibration tool.

pub mod calibrate;
pub mod rasterizer;
pub mod writer;

pub use crate::rasterizer::Rasterizer;
pub use crate::writer::{save_gif, save_png};
