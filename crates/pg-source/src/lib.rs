//! Image source collaborator for pixglyph: still images, animated GIFs,
//! and resampling to the output grid.

pub mod animation;
pub mod image;
pub mod resize;

pub use crate::animation::load_animation;
pub use crate::image::{is_gif, load_image};
pub use crate::resize::LanczosResampler;
