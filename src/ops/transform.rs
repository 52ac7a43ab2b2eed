// ============================================================================
// GEOMETRIC TRANSFORMS — rectangular crop, rotation about the image center
// ============================================================================

use image::{Rgb, RgbImage, imageops};
use imageproc::geometric_transformations::{Interpolation, rotate};

use crate::error::{EditorError, Result};

/// Crop rectangle in pixel edges: columns `x1..x2`, rows `y1..y2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropRegion {
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
}

impl CropRegion {
    pub fn new(x1: i64, y1: i64, x2: i64, y2: i64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Checks the region against a `width` x `height` image.
    ///
    /// Every edge must lie inside `[0, width] x [0, height]` and the region
    /// must be non-empty (`x1 < x2`, `y1 < y2`). Bounds are checked first.
    pub fn validate(self, width: u32, height: u32) -> Result<Self> {
        let (w, h) = (width as i64, height as i64);
        let in_x = |v: i64| (0..=w).contains(&v);
        let in_y = |v: i64| (0..=h).contains(&v);

        if !(in_x(self.x1) && in_x(self.x2) && in_y(self.y1) && in_y(self.y2)) {
            return Err(EditorError::CropOutOfBounds {
                x1: self.x1,
                y1: self.y1,
                x2: self.x2,
                y2: self.y2,
                width,
                height,
            });
        }
        if self.x1 >= self.x2 || self.y1 >= self.y2 {
            return Err(EditorError::EmptyCropRegion {
                x1: self.x1,
                y1: self.y1,
                x2: self.x2,
                y2: self.y2,
            });
        }
        Ok(self)
    }

    pub fn width(&self) -> u32 {
        (self.x2 - self.x1).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        (self.y2 - self.y1).max(0) as u32
    }
}

/// Copies the pixels of a validated region out of `image`.
pub fn crop(image: &RgbImage, region: CropRegion) -> RgbImage {
    imageops::crop_imm(
        image,
        region.x1 as u32,
        region.y1 as u32,
        region.width(),
        region.height(),
    )
    .to_image()
}

/// Rotates `image` counter-clockwise by `degrees` about `(w / 2, h / 2)`.
///
/// The output keeps the input size; corners that rotate out are lost and
/// uncovered pixels are black.
pub fn rotate_about_center(image: &RgbImage, degrees: f64) -> Result<RgbImage> {
    if !degrees.is_finite() {
        return Err(EditorError::InvalidAngle(degrees));
    }
    let center = ((image.width() / 2) as f32, (image.height() / 2) as f32);
    // imageproc turns clockwise for positive theta (y axis points down)
    let theta = -(degrees.to_radians() as f32);
    Ok(rotate(
        image,
        center,
        theta,
        Interpolation::Bilinear,
        Rgb([0, 0, 0]),
    ))
}
