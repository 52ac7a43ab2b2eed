//! The single error type shared by the image-state manager, file IO and
//! camera capture. Every variant ends up in a user-facing message window.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EditorError>;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("no image is loaded")]
    NoImage,

    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("file is empty or damaged: {}", .0.display())]
    EmptyFile(PathBuf),

    #[error("cannot decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("unsupported image format: .{0}")]
    UnsupportedFormat(String),

    #[error("cannot write {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("camera unavailable: {0}")]
    CameraUnavailable(String),

    #[error("crop ({x1}, {y1})-({x2}, {y2}) lies outside the {width}x{height} image")]
    CropOutOfBounds {
        x1: i64,
        y1: i64,
        x2: i64,
        y2: i64,
        width: u32,
        height: u32,
    },

    #[error("crop ({x1}, {y1})-({x2}, {y2}) is empty: x1 must be < x2 and y1 < y2")]
    EmptyCropRegion { x1: i64, y1: i64, x2: i64, y2: i64 },

    #[error("circle radius must be positive, got {0}")]
    NonPositiveRadius(i64),

    #[error("circle center ({x}, {y}) lies outside the {width}x{height} image")]
    CircleOutOfBounds {
        x: i64,
        y: i64,
        width: u32,
        height: u32,
    },

    #[error("rotation angle must be finite, got {0}")]
    InvalidAngle(f64),

    #[error("not a whole number: {0:?}")]
    InvalidNumber(String),
}

impl EditorError {
    /// Warnings are expected user mistakes; everything else is an error.
    pub fn is_warning(&self) -> bool {
        matches!(self, EditorError::NoImage)
    }
}
