// ============================================================================
// SHAPES — circle annotation
// ============================================================================

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_circle_mut;

use crate::error::{EditorError, Result};

/// Circle placement in image pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CircleSpec {
    pub x: i64,
    pub y: i64,
    pub radius: i64,
}

impl CircleSpec {
    pub fn new(x: i64, y: i64, radius: i64) -> Self {
        Self { x, y, radius }
    }

    /// The radius must be positive and the center must be a pixel of a
    /// `width` x `height` image. The outline itself may leave the image.
    pub fn validate(self, width: u32, height: u32) -> Result<Self> {
        if self.radius <= 0 {
            return Err(EditorError::NonPositiveRadius(self.radius));
        }
        let inside = (0..width as i64).contains(&self.x) && (0..height as i64).contains(&self.y);
        if !inside {
            return Err(EditorError::CircleOutOfBounds {
                x: self.x,
                y: self.y,
                width,
                height,
            });
        }
        Ok(self)
    }
}

/// Outline color and stroke width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CircleStyle {
    pub color: Rgb<u8>,
    pub thickness: u32,
}

impl Default for CircleStyle {
    fn default() -> Self {
        Self {
            color: Rgb([255, 0, 0]),
            thickness: 2,
        }
    }
}

/// Strokes a validated circle onto `image`.
///
/// The stroke is `thickness` concentric one-pixel rings straddling the
/// radius, so a thickness of 2 covers `radius - 1` and `radius`. Rings
/// wider than the image diagonal touch no pixel and are skipped.
pub fn draw_circle(image: &mut RgbImage, spec: CircleSpec, style: CircleStyle) {
    let thickness = style.thickness.max(1) as i64;
    let (w, h) = image.dimensions();
    let reach = (w as f64).hypot(h as f64).ceil() as i64 + 1;
    let inner = spec.radius.min(reach + thickness) - thickness / 2;
    let center = (spec.x as i32, spec.y as i32);

    for r in inner..inner + thickness {
        if r <= 0 || r > reach {
            continue;
        }
        let Ok(r) = i32::try_from(r) else { continue };
        draw_hollow_circle_mut(image, center, r, style.color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_and_negative_radius_are_rejected() {
        assert!(matches!(
            CircleSpec::new(5, 5, 0).validate(10, 10),
            Err(EditorError::NonPositiveRadius(0))
        ));
        assert!(matches!(
            CircleSpec::new(5, 5, -3).validate(10, 10),
            Err(EditorError::NonPositiveRadius(-3))
        ));
    }

    #[test]
    fn center_outside_is_rejected() {
        for (x, y) in [(-1, 5), (10, 5), (5, -1), (5, 10)] {
            assert!(matches!(
                CircleSpec::new(x, y, 3).validate(10, 10),
                Err(EditorError::CircleOutOfBounds { .. })
            ));
        }
    }

    #[test]
    fn large_circle_with_inner_center_is_allowed() {
        assert!(CircleSpec::new(0, 0, 500).validate(10, 10).is_ok());
    }

    #[test]
    fn outline_is_drawn_and_center_untouched() {
        let mut img = RgbImage::new(40, 40);
        let spec = CircleSpec::new(20, 20, 10).validate(40, 40).unwrap();
        draw_circle(&mut img, spec, CircleStyle::default());

        let red = Rgb([255, 0, 0]);
        assert_eq!(*img.get_pixel(30, 20), red);
        assert_eq!(*img.get_pixel(29, 20), red);
        assert_eq!(*img.get_pixel(20, 10), red);
        assert_eq!(*img.get_pixel(20, 20), Rgb([0, 0, 0]));
        assert_eq!(*img.get_pixel(32, 20), Rgb([0, 0, 0]));
    }

    #[test]
    fn custom_color_and_single_pixel_stroke() {
        let mut img = RgbImage::new(30, 30);
        let style = CircleStyle {
            color: Rgb([0, 255, 0]),
            thickness: 1,
        };
        draw_circle(&mut img, CircleSpec::new(15, 15, 5), style);
        assert_eq!(*img.get_pixel(20, 15), Rgb([0, 255, 0]));
        assert_eq!(*img.get_pixel(19, 15), Rgb([0, 0, 0]));
    }

    #[test]
    fn radius_beyond_the_diagonal_leaves_image_untouched() {
        let blank = RgbImage::new(40, 40);
        for radius in [i64::MAX, i32::MAX as i64, (1i64 << 32) + 5, 1_000_000_000] {
            let mut img = blank.clone();
            let spec = CircleSpec::new(20, 20, radius).validate(40, 40).unwrap();
            draw_circle(&mut img, spec, CircleStyle::default());
            assert_eq!(img, blank, "radius {radius}");
        }
    }

    #[test]
    fn ring_reaching_the_corner_is_still_drawn() {
        let mut img = RgbImage::new(10, 10);
        let style = CircleStyle {
            color: Rgb([255, 0, 0]),
            thickness: 1,
        };
        draw_circle(&mut img, CircleSpec::new(0, 0, 9), style);
        assert_eq!(*img.get_pixel(9, 0), Rgb([255, 0, 0]));
    }

    proptest! {
        #[test]
        fn validation_matches_rule(
            w in 1u32..50,
            h in 1u32..50,
            x in -10i64..60,
            y in -10i64..60,
            r in -5i64..40,
        ) {
            let ok = r > 0 && 0 <= x && x < w as i64 && 0 <= y && y < h as i64;
            prop_assert_eq!(CircleSpec::new(x, y, r).validate(w, h).is_ok(), ok);
        }
    }
}
