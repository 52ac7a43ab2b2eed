//! Pixel operations. Each one reads a source buffer and returns (or draws
//! into) a new one; none of them know about the image-state manager.

pub mod channels;
pub mod shapes;
pub mod transform;

pub use channels::{Channel, isolate_channel};
pub use shapes::{CircleSpec, CircleStyle, draw_circle};
pub use transform::{CropRegion, crop, rotate_about_center};
