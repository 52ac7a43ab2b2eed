//! Session logger — writes every `log` record to a per-session file.
//!
//! Log file location:
//!   Linux:    `$XDG_DATA_HOME/image-editor/image_editor.log`
//!             (falls back to `~/.local/share/image-editor/image_editor.log`)
//!   Windows:  `%APPDATA%\image-editor\image_editor.log`
//!   macOS:    `~/Library/Application Support/image-editor/image_editor.log`
//!
//! Use the ordinary `log::info!` / `log::warn!` / `log::error!` macros.
//! Warnings and errors are mirrored to stderr. The level comes from the
//! `IMAGE_EDITOR_LOG` variable (`error`, `warn`, `info`, `debug`, `trace`).

use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

pub const LEVEL_ENV: &str = "IMAGE_EDITOR_LOG";

static LOGGER: OnceLock<SessionLogger> = OnceLock::new();

struct SessionLogger {
    file: Option<Mutex<File>>,
    path: PathBuf,
    level: LevelFilter,
}

impl Log for SessionLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(
            &timestamp(),
            record.level().as_str(),
            record.target(),
            &record.args().to_string(),
        );
        if record.level() <= log::Level::Warn {
            eprintln!("{}", line);
        }
        self.write_line(&line);
    }

    fn flush(&self) {
        if let Some(Ok(mut file)) = self.file.as_ref().map(|m| m.lock()) {
            let _ = file.flush();
        }
    }
}

impl SessionLogger {
    /// I/O errors are swallowed so logging never takes the editor down.
    fn write_line(&self, line: &str) {
        if let Some(Ok(mut file)) = self.file.as_ref().map(|m| m.lock()) {
            let _ = writeln!(file, "{}", line);
        }
    }
}

/// Install the session logger. Later calls are no-ops.
///
/// * Creates (or truncates) the log file.
/// * Installs a panic hook that writes the panic message to the log before
///   running the default handler.
pub fn init() {
    let path = log_file_path();
    let level = parse_level(std::env::var(LEVEL_ENV).ok().as_deref());

    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let file = match OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&path)
    {
        Ok(f) => Some(Mutex::new(f)),
        Err(e) => {
            // not fatal, records still reach stderr
            eprintln!("[logger] cannot open log file {}: {}", path.display(), e);
            None
        }
    };

    let logger = LOGGER.get_or_init(|| SessionLogger { file, path, level });
    if log::set_logger(logger).is_err() {
        return;
    }
    log::set_max_level(level);

    logger.write_line(&format!(
        "=== image-editor {} session started (unix {}) ===",
        env!("CARGO_PKG_VERSION"),
        unix_seconds()
    ));
    logger.write_line(&format!("Log file: {}", logger.path.display()));

    let prev = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if let Some(l) = LOGGER.get() {
            l.write_line(&format_line(&timestamp(), "PANIC", "panic", &info.to_string()));
        }
        prev(info);
    }));
}

fn parse_level(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|v| v.trim().parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info)
}

fn format_line(ts: &str, level: &str, target: &str, msg: &str) -> String {
    format!("[{}] [{}] {}: {}", ts, level, target, msg)
}

fn log_file_path() -> PathBuf {
    data_dir().join("image-editor").join("image_editor.log")
}

/// Platform data directory (without the app sub-folder).
fn data_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata);
        }
    }
    #[cfg(target_os = "macos")]
    {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support");
        }
    }
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(xdg);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".local").join("share");
    }
    PathBuf::from(".")
}

fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// HH:MM:SS (UTC) within the current day.
fn timestamp() -> String {
    let secs = unix_seconds();
    format!(
        "{:02}:{:02}:{:02}",
        (secs % 86400) / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}
