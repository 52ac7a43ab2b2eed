//! Single-frame camera capture.
//!
//! The editor only ever needs one still frame, so a source is opened, read
//! once and released inside `capture_frame`. Capture blocks the caller.

use image::RgbImage;

use crate::error::{EditorError, Result};

/// Anything that can hand over one RGB frame.
pub trait CameraSource {
    /// Grab one frame. The device is released before returning.
    fn capture_frame(&mut self) -> Result<RgbImage>;

    /// Short human-readable name for logs and the window title.
    fn describe(&self) -> String;
}

/// The platform camera at a device index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NativeCamera {
    pub index: u32,
}

impl NativeCamera {
    pub fn new(index: u32) -> Self {
        Self { index }
    }
}

impl CameraSource for NativeCamera {
    #[cfg(feature = "camera")]
    fn capture_frame(&mut self) -> Result<RgbImage> {
        use nokhwa::Camera;
        use nokhwa::pixel_format::RgbFormat;
        use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};

        let unavailable = |e: nokhwa::NokhwaError| EditorError::CameraUnavailable(e.to_string());

        let requested =
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
        let mut camera =
            Camera::new(CameraIndex::Index(self.index), requested).map_err(unavailable)?;
        camera.open_stream().map_err(unavailable)?;
        let frame = camera.frame();
        // release the device whatever the read returned
        let _ = camera.stop_stream();

        let decoded = frame
            .map_err(unavailable)?
            .decode_image::<RgbFormat>()
            .map_err(unavailable)?;
        let (width, height) = (decoded.width(), decoded.height());
        RgbImage::from_raw(width, height, decoded.into_raw()).ok_or_else(|| {
            EditorError::CameraUnavailable(format!("malformed {}x{} frame", width, height))
        })
    }

    #[cfg(not(feature = "camera"))]
    fn capture_frame(&mut self) -> Result<RgbImage> {
        Err(EditorError::CameraUnavailable(format!(
            "camera {} cannot be opened: built without camera support",
            self.index
        )))
    }

    fn describe(&self) -> String {
        format!("camera {}", self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_names_the_index() {
        assert_eq!(NativeCamera::new(2).describe(), "camera 2");
    }

    #[cfg(not(feature = "camera"))]
    #[test]
    fn capture_without_support_is_unavailable() {
        let err = NativeCamera::new(0).capture_frame().unwrap_err();
        assert!(matches!(err, EditorError::CameraUnavailable(_)));
    }
}
