//! Desktop image editor.
//!
//! [`processor::ImageProcessor`] keeps an original image and a working copy
//! derived from it; the [`ops`] module holds the pixel operations it
//! dispatches to, and [`app`] is the eframe shell around both.

#[macro_use]
pub mod i18n;
pub mod app;
pub mod camera;
pub mod canvas;
pub mod cli;
pub mod error;
pub mod io;
pub mod logger;
pub mod ops;
pub mod processor;
pub mod settings;

pub use error::{EditorError, Result};
pub use processor::{ImageProcessor, ImageSource};
