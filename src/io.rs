use image::codecs::bmp::BmpEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, ImageError, RgbImage};
use log::{debug, info};
use rfd::FileDialog;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{EditorError, Result};

/// Extensions offered by the open dialog.
pub const OPEN_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp"];

/// Default JPEG quality, matching common desktop encoders.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

// ============================================================================
// LOADING
// ============================================================================

/// Load an image file as 8-bit RGB.
///
/// Checks, in order: the file exists, the file is not empty, the content
/// decodes. Alpha is dropped.
pub fn load_image(path: &Path) -> Result<RgbImage> {
    let meta = match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => meta,
        _ => return Err(EditorError::FileNotFound(path.to_path_buf())),
    };
    if meta.len() == 0 {
        return Err(EditorError::EmptyFile(path.to_path_buf()));
    }

    let decoded = image::open(path).map_err(|source| EditorError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        "decoded {} ({}x{}, {:?})",
        path.display(),
        decoded.width(),
        decoded.height(),
        decoded.color()
    );
    Ok(decoded.to_rgb8())
}

// ============================================================================
// SAVING
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SaveFormat {
    #[default]
    Jpeg,
    Png,
    Bmp,
}

impl SaveFormat {
    pub const ALL: [SaveFormat; 3] = [SaveFormat::Jpeg, SaveFormat::Png, SaveFormat::Bmp];

    pub fn extension(&self) -> &'static str {
        match self {
            SaveFormat::Jpeg => "jpg",
            SaveFormat::Png => "png",
            SaveFormat::Bmp => "bmp",
        }
    }

    /// Dialog filter name.
    pub fn filter_name(&self) -> &'static str {
        match self {
            SaveFormat::Jpeg => "JPEG",
            SaveFormat::Png => "PNG",
            SaveFormat::Bmp => "BMP",
        }
    }

    pub fn filter_extensions(&self) -> &'static [&'static str] {
        match self {
            SaveFormat::Jpeg => &["jpg", "jpeg"],
            SaveFormat::Png => &["png"],
            SaveFormat::Bmp => &["bmp"],
        }
    }

    /// Case-insensitive lookup by file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(SaveFormat::Jpeg),
            "png" => Some(SaveFormat::Png),
            "bmp" => Some(SaveFormat::Bmp),
            _ => None,
        }
    }
}

/// Work out the final path and encoder for a save request.
/// A path without an extension gets `.jpg`.
pub fn resolve_save_target(path: &Path) -> Result<(PathBuf, SaveFormat)> {
    match path.extension() {
        None => {
            let format = SaveFormat::default();
            Ok((path.with_extension(format.extension()), format))
        }
        Some(ext) => {
            let ext = ext.to_string_lossy();
            SaveFormat::from_extension(&ext)
                .map(|format| (path.to_path_buf(), format))
                .ok_or_else(|| EditorError::UnsupportedFormat(ext.into_owned()))
        }
    }
}

/// Encode `image` into `path`, choosing the encoder from the extension.
/// Returns the path actually written.
pub fn save_image(image: &RgbImage, path: &Path, jpeg_quality: u8) -> Result<PathBuf> {
    let (target, format) = resolve_save_target(path)?;
    encode_and_write(image, &target, format, jpeg_quality).map_err(|source| {
        EditorError::Encode {
            path: target.clone(),
            source,
        }
    })?;
    info!("saved {} as {:?}", target.display(), format);
    Ok(target)
}

fn encode_and_write(
    image: &RgbImage,
    path: &Path,
    format: SaveFormat,
    quality: u8,
) -> std::result::Result<(), ImageError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let (w, h) = image.dimensions();

    match format {
        SaveFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut writer, quality.clamp(1, 100));
            encoder.write_image(image.as_raw(), w, h, ColorType::Rgb8)?;
        }
        SaveFormat::Png => {
            PngEncoder::new(&mut writer).write_image(image.as_raw(), w, h, ColorType::Rgb8)?;
        }
        SaveFormat::Bmp => {
            BmpEncoder::new(&mut writer).write_image(image.as_raw(), w, h, ColorType::Rgb8)?;
        }
    }
    // BufWriter ignores errors when flushing on drop
    writer.flush()?;
    Ok(())
}

// ============================================================================
// FILE HANDLER — native dialogs
// ============================================================================

pub struct FileHandler {
    /// Directory the dialogs start in
    pub last_directory: Option<PathBuf>,
    /// Last path written by a save
    pub last_saved: Option<PathBuf>,
}

impl Default for FileHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl FileHandler {
    pub fn new() -> Self {
        Self {
            last_directory: None,
            last_saved: None,
        }
    }

    /// Show the open dialog. `None` when the user cancels.
    pub fn pick_open_path(&mut self, filter_name: &str, all_files_name: &str) -> Option<PathBuf> {
        let mut dialog = FileDialog::new()
            .add_filter(filter_name, OPEN_EXTENSIONS)
            .add_filter(all_files_name, &["*"]);
        if let Some(dir) = &self.last_directory {
            dialog = dialog.set_directory(dir);
        }
        let path = dialog.pick_file()?;
        self.remember_directory(&path);
        Some(path)
    }

    /// Show the save dialog, suggesting `<suggested_stem>.jpg`.
    pub fn pick_save_path(&mut self, suggested_stem: &str) -> Option<PathBuf> {
        let mut dialog = FileDialog::new()
            .set_file_name(format!("{}.{}", suggested_stem, SaveFormat::default().extension()));
        for format in SaveFormat::ALL {
            dialog = dialog.add_filter(format.filter_name(), format.filter_extensions());
        }
        if let Some(dir) = &self.last_directory {
            dialog = dialog.set_directory(dir);
        }
        let path = dialog.save_file()?;
        self.remember_directory(&path);
        Some(path)
    }

    pub fn remember_directory(&mut self, path: &Path) {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.last_directory = Some(parent.to_path_buf());
        }
    }
}
