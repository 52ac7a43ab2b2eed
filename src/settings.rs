use image::Rgb;
use log::{debug, warn};
use std::path::PathBuf;

use crate::io::DEFAULT_JPEG_QUALITY;
use crate::ops::CircleStyle;

/// User settings that persist across sessions.
#[derive(Clone, Debug, PartialEq)]
pub struct EditorSettings {
    /// Language code ("en", "ru"). Empty string = detect from the system.
    pub language: String,
    /// Device index used by "From camera"
    pub camera_index: u32,
    /// JPEG quality 1–100
    pub jpeg_quality: u8,
    /// Circle outline color
    pub circle_color: Rgb<u8>,
    /// Circle outline width in pixels, 1–32
    pub circle_thickness: u32,
    /// Directory the open/save dialogs start in
    pub last_directory: Option<PathBuf>,
}

impl Default for EditorSettings {
    fn default() -> Self {
        let style = CircleStyle::default();
        Self {
            language: String::new(),
            camera_index: 0,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            circle_color: style.color,
            circle_thickness: style.thickness,
            last_directory: None,
        }
    }
}

impl EditorSettings {
    /// Path to the settings file.
    /// On Linux:   ~/.config/image-editor/image_editor_settings.cfg  (XDG_CONFIG_HOME respected)
    /// On Windows: %APPDATA%\image-editor\image_editor_settings.cfg
    /// On macOS:   ~/Library/Application Support/image-editor/image_editor_settings.cfg
    pub fn settings_path() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        let base = std::env::var("APPDATA").ok().map(PathBuf::from);
        #[cfg(target_os = "macos")]
        let base = std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join("Library").join("Application Support"));
        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        let base = std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| std::env::var("HOME").ok().map(|home| PathBuf::from(home).join(".config")));

        base.map(|dir| dir.join("image-editor").join("image_editor_settings.cfg"))
    }

    pub fn circle_style(&self) -> CircleStyle {
        CircleStyle {
            color: self.circle_color,
            thickness: self.circle_thickness,
        }
    }

    /// Serialize a color as "r,g,b"
    fn color_to_str(c: Rgb<u8>) -> String {
        format!("{},{},{}", c[0], c[1], c[2])
    }

    /// Parse a color from "r,g,b"
    fn str_to_color(s: &str) -> Option<Rgb<u8>> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 3 {
            return None;
        }
        let r = parts[0].trim().parse::<u8>().ok()?;
        let g = parts[1].trim().parse::<u8>().ok()?;
        let b = parts[2].trim().parse::<u8>().ok()?;
        Some(Rgb([r, g, b]))
    }

    /// One `key=value` per line.
    pub fn to_config_string(&self) -> String {
        let last_dir = self
            .last_directory
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        format!(
            "language={}\n\
             camera_index={}\n\
             jpeg_quality={}\n\
             circle_color={}\n\
             circle_thickness={}\n\
             last_directory={}\n",
            self.language,
            self.camera_index,
            self.jpeg_quality,
            Self::color_to_str(self.circle_color),
            self.circle_thickness,
            last_dir,
        )
    }

    /// Parse a settings file. Unknown keys and bad values keep their defaults.
    pub fn from_config_str(content: &str) -> Self {
        let mut s = Self::default();
        for line in content.lines() {
            let Some((key, val)) = line.split_once('=') else { continue };
            let val = val.trim();
            match key.trim() {
                "language" => s.language = val.to_string(),
                "camera_index" => {
                    if let Ok(v) = val.parse() {
                        s.camera_index = v;
                    }
                }
                "jpeg_quality" => {
                    if let Ok(v) = val.parse::<u32>() {
                        s.jpeg_quality = v.clamp(1, 100) as u8;
                    }
                }
                "circle_color" => {
                    if let Some(c) = Self::str_to_color(val) {
                        s.circle_color = c;
                    }
                }
                "circle_thickness" => {
                    if let Ok(v) = val.parse::<u32>() {
                        s.circle_thickness = v.clamp(1, 32);
                    }
                }
                "last_directory" => {
                    s.last_directory = (!val.is_empty()).then(|| PathBuf::from(val));
                }
                other => debug!("ignoring unknown setting {:?}", other),
            }
        }
        s
    }

    /// Save settings to disk. Failures are logged, never fatal.
    pub fn save(&self) {
        let Some(path) = Self::settings_path() else { return };
        if let Some(dir) = path.parent() {
            let _ = std::fs::create_dir_all(dir);
        }
        if let Err(e) = std::fs::write(&path, self.to_config_string()) {
            warn!("cannot write settings {}: {}", path.display(), e);
        }
    }

    /// Load settings from disk (returns default if file missing or corrupt)
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else { return Self::default() };
        match std::fs::read_to_string(&path) {
            Ok(content) => Self::from_config_str(&content),
            Err(_) => Self::default(),
        }
    }
}
