// ============================================================================
// IMAGE PROCESSOR — original baseline + derived working image
// ============================================================================
//
// Every edit reads the original and replaces the working image wholesale,
// so edits never stack: rotating by 30 then by 45 shows the original turned
// by 45. Crop, rotation and circle work on the full-color original, so they
// put the channel label back to `Original`. A failed edit returns before
// touching any state.

use image::RgbImage;
use log::{debug, info};
use std::path::{Path, PathBuf};

use crate::camera::CameraSource;
use crate::error::{EditorError, Result};
use crate::io;
use crate::ops::{self, Channel, CircleSpec, CircleStyle, CropRegion};

/// Where the current baseline came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    File(PathBuf),
    Camera(String),
}

impl ImageSource {
    /// Name used for the window title and the suggested save name.
    pub fn display_name(&self) -> String {
        match self {
            ImageSource::File(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            ImageSource::Camera(name) => name.clone(),
        }
    }

    /// File stem for the save dialog.
    pub fn suggested_stem(&self) -> String {
        match self {
            ImageSource::File(path) => path
                .file_stem()
                .map(|s| format!("{}_edited", s.to_string_lossy()))
                .unwrap_or_else(|| "image".to_string()),
            ImageSource::Camera(_) => "capture".to_string(),
        }
    }
}

#[derive(Default)]
pub struct ImageProcessor {
    original: Option<RgbImage>,
    working: Option<RgbImage>,
    channel: Channel,
    source: Option<ImageSource>,
    /// Bumped on every working-image change; the canvas re-uploads on change.
    generation: u64,
    circle_style: CircleStyle,
}

impl ImageProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_circle_style(mut self, style: CircleStyle) -> Self {
        self.circle_style = style;
        self
    }

    // --- Accessors ----------------------------------------------------------

    /// The working image, if any.
    pub fn image(&self) -> Option<&RgbImage> {
        self.working.as_ref()
    }

    pub fn original(&self) -> Option<&RgbImage> {
        self.original.as_ref()
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn source(&self) -> Option<&ImageSource> {
        self.source.as_ref()
    }

    pub fn has_image(&self) -> bool {
        self.original.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Dimensions of the working image.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.working.as_ref().map(|img| img.dimensions())
    }

    pub fn circle_style(&self) -> CircleStyle {
        self.circle_style
    }

    pub fn set_circle_style(&mut self, style: CircleStyle) {
        self.circle_style = style;
    }

    // --- Sources ------------------------------------------------------------

    /// Load a file as the new baseline.
    pub fn load_image(&mut self, path: &Path) -> Result<&RgbImage> {
        let image = io::load_image(path)?;
        info!(
            "loaded {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );
        Ok(self.set_image(image, ImageSource::File(path.to_path_buf())))
    }

    /// Grab one frame from `camera` as the new baseline.
    pub fn capture_from_camera(&mut self, camera: &mut dyn CameraSource) -> Result<&RgbImage> {
        let image = camera.capture_frame()?;
        let name = camera.describe();
        info!("captured {}x{} from {}", image.width(), image.height(), name);
        Ok(self.set_image(image, ImageSource::Camera(name)))
    }

    /// Install a decoded image as the new baseline. The channel view resets.
    pub fn set_image(&mut self, image: RgbImage, source: ImageSource) -> &RgbImage {
        self.working = Some(image.clone());
        self.original = Some(image);
        self.channel = Channel::Original;
        self.source = Some(source);
        self.commit()
    }

    // --- Edits --------------------------------------------------------------

    /// Back to the untouched original with the `Original` channel view.
    pub fn reset_image(&mut self) -> Result<&RgbImage> {
        let original = self.require_original()?.clone();
        self.channel = Channel::Original;
        self.working = Some(original);
        debug!("reset to original");
        Ok(self.commit())
    }

    /// Write the working image. Returns the path actually written.
    pub fn save_image(&self, path: &Path, jpeg_quality: u8) -> Result<PathBuf> {
        let image = self.working.as_ref().ok_or(EditorError::NoImage)?;
        io::save_image(image, path, jpeg_quality)
    }

    pub fn show_channel(&mut self, channel: Channel) -> Result<&RgbImage> {
        let view = ops::isolate_channel(self.require_original()?, channel);
        self.channel = channel;
        self.working = Some(view);
        debug!("channel view {:?}", channel);
        Ok(self.commit())
    }

    /// Crop the original to columns `x1..x2` and rows `y1..y2`.
    pub fn apply_crop(&mut self, x1: i64, y1: i64, x2: i64, y2: i64) -> Result<&RgbImage> {
        let original = self.require_original()?;
        let region = CropRegion::new(x1, y1, x2, y2).validate(original.width(), original.height())?;
        let cropped = ops::crop(original, region);
        debug!("crop {:?} -> {}x{}", region, cropped.width(), cropped.height());
        self.channel = Channel::Original;
        self.working = Some(cropped);
        Ok(self.commit())
    }

    /// Rotate the original by `angle` degrees, counter-clockwise for positive values.
    pub fn apply_rotation(&mut self, angle: f64) -> Result<&RgbImage> {
        let rotated = ops::rotate_about_center(self.require_original()?, angle)?;
        self.channel = Channel::Original;
        self.working = Some(rotated);
        Ok(self.commit())
    }

    /// A copy of the original with a circle outline centered at `(x, y)`.
    pub fn draw_circle(&mut self, x: i64, y: i64, radius: i64) -> Result<&RgbImage> {
        let original = self.require_original()?;
        let spec = CircleSpec::new(x, y, radius).validate(original.width(), original.height())?;
        let mut annotated = original.clone();
        ops::draw_circle(&mut annotated, spec, self.circle_style);
        debug!("circle {:?}", spec);
        self.channel = Channel::Original;
        self.working = Some(annotated);
        Ok(self.commit())
    }

    fn require_original(&self) -> Result<&RgbImage> {
        self.original.as_ref().ok_or(EditorError::NoImage)
    }

    fn commit(&mut self) -> &RgbImage {
        self.generation = self.generation.wrapping_add(1);
        // every caller has just stored a working image
        self.working.get_or_insert_with(RgbImage::default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use proptest::prelude::*;

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 5) as u8, (y * 9) as u8, ((x ^ y) * 3) as u8])
        })
    }

    fn loaded(width: u32, height: u32) -> ImageProcessor {
        let mut p = ImageProcessor::new();
        p.set_image(gradient(width, height), ImageSource::File("test.png".into()));
        p
    }

    struct FakeCamera {
        frame: Option<RgbImage>,
    }

    impl CameraSource for FakeCamera {
        fn capture_frame(&mut self) -> Result<RgbImage> {
            self.frame
                .take()
                .ok_or_else(|| EditorError::CameraUnavailable("no device".into()))
        }

        fn describe(&self) -> String {
            "fake camera".into()
        }
    }

    #[test]
    fn empty_processor_rejects_every_edit() {
        let mut p = ImageProcessor::new();
        assert!(matches!(p.reset_image(), Err(EditorError::NoImage)));
        assert!(matches!(p.show_channel(Channel::Red), Err(EditorError::NoImage)));
        assert!(matches!(p.apply_crop(0, 0, 1, 1), Err(EditorError::NoImage)));
        assert!(matches!(p.apply_rotation(10.0), Err(EditorError::NoImage)));
        assert!(matches!(p.draw_circle(0, 0, 1), Err(EditorError::NoImage)));
        assert!(matches!(
            p.save_image(Path::new("out.png"), 90),
            Err(EditorError::NoImage)
        ));
        assert_eq!(p.generation(), 0);
    }

    #[test]
    fn crop_reads_the_original_not_the_working_image() {
        let mut p = loaded(20, 10);
        p.apply_crop(0, 0, 5, 5).unwrap();
        // a second crop larger than the first result is still valid
        let out = p.apply_crop(10, 2, 20, 10).unwrap();
        assert_eq!(out.dimensions(), (10, 8));
        assert_eq!(out.get_pixel(0, 0), gradient(20, 10).get_pixel(10, 2));
    }

    #[test]
    fn rotation_does_not_accumulate() {
        let mut a = loaded(30, 30);
        a.apply_rotation(30.0).unwrap();
        let twice = a.apply_rotation(45.0).unwrap().clone();

        let mut b = loaded(30, 30);
        let once = b.apply_rotation(45.0).unwrap().clone();
        assert_eq!(twice, once);
    }

    #[test]
    fn circle_is_drawn_on_a_fresh_copy() {
        let mut p = loaded(40, 40);
        p.draw_circle(10, 10, 5).unwrap();
        let out = p.draw_circle(30, 30, 5).unwrap();
        // the first circle's rightmost point is gone
        assert_eq!(out.get_pixel(15, 10), gradient(40, 40).get_pixel(15, 10));
        assert_eq!(*out.get_pixel(35, 30), Rgb([255, 0, 0]));
        assert_eq!(p.original().unwrap(), &gradient(40, 40));
    }

    #[test]
    fn circle_uses_configured_style() {
        let style = CircleStyle {
            color: Rgb([0, 0, 255]),
            thickness: 1,
        };
        let mut p = ImageProcessor::new().with_circle_style(style);
        p.set_image(RgbImage::new(20, 20), ImageSource::Camera("cam".into()));
        let out = p.draw_circle(10, 10, 4).unwrap();
        assert_eq!(*out.get_pixel(14, 10), Rgb([0, 0, 255]));
    }

    #[test]
    fn failed_edit_keeps_previous_state() {
        let mut p = loaded(10, 10);
        p.show_channel(Channel::Green).unwrap();
        let before = p.image().unwrap().clone();
        let generation = p.generation();

        assert!(p.apply_crop(5, 5, 2, 8).is_err());
        assert!(p.draw_circle(3, 3, 0).is_err());
        assert!(p.draw_circle(30, 3, 2).is_err());
        assert!(p.apply_rotation(f64::NAN).is_err());

        assert_eq!(p.image().unwrap(), &before);
        assert_eq!(p.channel(), Channel::Green);
        assert_eq!(p.generation(), generation);
    }

    #[test]
    fn edits_show_the_full_color_original() {
        let mut p = loaded(20, 20);
        p.show_channel(Channel::Red).unwrap();
        p.apply_crop(0, 0, 10, 10).unwrap();
        assert_eq!(p.channel(), Channel::Original);

        p.show_channel(Channel::Green).unwrap();
        p.apply_rotation(15.0).unwrap();
        assert_eq!(p.channel(), Channel::Original);

        p.show_channel(Channel::Blue).unwrap();
        let out = p.draw_circle(10, 10, 3).unwrap();
        assert_eq!(out.get_pixel(19, 5), gradient(20, 20).get_pixel(19, 5));
        assert_eq!(p.channel(), Channel::Original);
    }

    #[test]
    fn loading_resets_the_channel_view() {
        let mut p = loaded(4, 4);
        p.show_channel(Channel::Blue).unwrap();
        p.set_image(gradient(3, 3), ImageSource::Camera("cam".into()));
        assert_eq!(p.channel(), Channel::Original);
        assert_eq!(p.dimensions(), Some((3, 3)));
    }

    #[test]
    fn camera_frame_becomes_the_baseline() {
        let mut p = ImageProcessor::new();
        let mut camera = FakeCamera {
            frame: Some(gradient(8, 6)),
        };
        p.capture_from_camera(&mut camera).unwrap();
        assert_eq!(p.original().unwrap(), &gradient(8, 6));
        assert_eq!(p.source(), Some(&ImageSource::Camera("fake camera".into())));

        // the next read fails and the current image stays
        let err = p.capture_from_camera(&mut camera).unwrap_err();
        assert!(matches!(err, EditorError::CameraUnavailable(_)));
        assert_eq!(p.dimensions(), Some((8, 6)));
    }

    #[test]
    fn load_and_save_round_trip_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("input.png");
        gradient(12, 7).save(&src).unwrap();

        let mut p = ImageProcessor::new();
        p.load_image(&src).unwrap();
        p.apply_crop(2, 1, 10, 6).unwrap();
        let written = p.save_image(&dir.path().join("cropped.png"), 90).unwrap();

        let reread = io::load_image(&written).unwrap();
        assert_eq!(reread.dimensions(), (8, 5));
        assert_eq!(p.source().unwrap().display_name(), "input.png");
        assert_eq!(p.source().unwrap().suggested_stem(), "input_edited");
    }

    #[test]
    fn failed_load_keeps_current_image() {
        let dir = tempfile::tempdir().unwrap();
        let mut p = loaded(5, 5);
        assert!(p.load_image(&dir.path().join("missing.jpg")).is_err());
        assert_eq!(p.dimensions(), Some((5, 5)));
    }

    proptest! {
        #[test]
        fn reset_restores_original_after_any_edit(
            w in 1u32..32,
            h in 1u32..32,
            op in 0u8..4,
            a in -40i64..40,
            b in -40i64..40,
            c in -40i64..40,
        ) {
            let mut p = loaded(w, h);
            let _ = match op {
                0 => p.apply_crop(a.min(b), a.min(c), a.max(b), a.max(c)).map(|_| ()),
                1 => p.apply_rotation(a as f64 * 4.5).map(|_| ()),
                2 => p.draw_circle(a, b, c).map(|_| ()),
                _ => p.show_channel(Channel::ALL[(a.rem_euclid(4)) as usize]).map(|_| ()),
            };
            let restored = p.reset_image().unwrap().clone();
            prop_assert_eq!(&restored, &gradient(w, h));
            prop_assert_eq!(p.channel(), Channel::Original);
        }
    }
}
