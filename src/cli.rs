// ============================================================================
// Program invocation — `image-editor [FILE]`
// ============================================================================

use std::path::PathBuf;

use clap::Parser;

/// Desktop image editor: channel views, crop, rotation and circle annotation.
#[derive(Parser, Debug, Default, PartialEq)]
#[command(name = "image-editor", version)]
pub struct CliArgs {
    /// Image to open on start-up (JPG, JPEG, PNG or BMP).
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,
}
