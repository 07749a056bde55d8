//! Init command implementation.
//!
//! Writes a `spritecut.yaml` with every setting at its default, so the
//! knobs are visible and can be tuned per project.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::config::{Settings, CONFIG_FILENAME};
use crate::error::{CutError, Result};
use crate::output::{display_path, Printer};

/// Write a default spritecut.yaml
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to write into (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite an existing spritecut.yaml
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, printer: &Printer) -> Result<PathBuf> {
    let settings_path = args.path.join(CONFIG_FILENAME);

    if settings_path.exists() && !args.force {
        return Err(CutError::Build {
            message: format!("{} already exists", CONFIG_FILENAME),
            help: Some("Use --force to overwrite".to_string()),
        });
    }

    if !args.path.exists() {
        fs::create_dir_all(&args.path).map_err(|e| CutError::Io {
            path: args.path.clone(),
            message: format!("Failed to create directory: {}", e),
        })?;
    }

    fs::write(&settings_path, Settings::template()).map_err(|e| CutError::Io {
        path: settings_path.clone(),
        message: format!("Failed to write settings: {}", e),
    })?;

    printer.success("Created", &display_path(&settings_path));

    Ok(settings_path)
}
