//! Matte command implementation.
//!
//! Flood-fills the background of opaque images to transparency, one file
//! or a whole directory at a time.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use walkdir::WalkDir;

use crate::error::{CutError, Result};
use crate::output::{display_path, plural, Printer};
use crate::render::{load_rgba, write_png};
use crate::report::print_report;

use super::load_settings;

/// Remove a flat background by flood fill from the corners
#[derive(Args, Debug)]
pub struct MatteArgs {
    /// Images or directories of PNGs to matte
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output file (single input) or directory
    #[arg(long, short)]
    pub output: PathBuf,

    /// Squared RGB distance below which neighbouring pixels join the fill
    #[arg(long)]
    pub threshold: Option<u32>,

    /// Settings file (default: ./spritecut.yaml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// A discovered input image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PngInput {
    pub path: PathBuf,
    /// Path relative to the directory it was found in; the bare file name
    /// for inputs given as files.
    pub relative: PathBuf,
}

impl PngInput {
    /// Relative path without the extension, e.g. `hero/idle`.
    pub fn stem(&self) -> String {
        self.relative
            .with_extension("")
            .to_string_lossy()
            .replace('\\', "/")
    }
}

/// Expand inputs into image files, directories walked recursively and
/// sorted by file name.
pub fn collect_pngs(inputs: &[PathBuf]) -> Result<Vec<PngInput>> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let found = WalkDir::new(input)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file() && is_png(e.path()))
                .filter_map(|e| {
                    let relative = e.path().strip_prefix(input).ok()?.to_path_buf();
                    Some(PngInput {
                        path: e.into_path(),
                        relative,
                    })
                });
            files.extend(found);
        } else if input.exists() {
            let relative = input.file_name().map(PathBuf::from).unwrap_or_default();
            files.push(PngInput {
                path: input.clone(),
                relative,
            });
        } else {
            return Err(CutError::Io {
                path: input.clone(),
                message: "File not found".to_string(),
            });
        }
    }

    Ok(files)
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"))
}

pub fn run(args: MatteArgs, printer: &Printer) -> Result<Vec<PathBuf>> {
    let mut settings = load_settings(args.config.as_deref(), printer)?;
    if let Some(threshold) = args.threshold {
        settings.matte_threshold = threshold;
    }
    let matte = settings.matte();

    let files = collect_pngs(&args.inputs)?;
    let single_file = files.len() == 1 && args.inputs.len() == 1 && !args.inputs[0].is_dir();
    let to_file = single_file && is_png(&args.output);

    if !to_file && !args.output.exists() {
        fs::create_dir_all(&args.output).map_err(|e| CutError::Io {
            path: args.output.clone(),
            message: format!("Failed to create output directory: {}", e),
        })?;
    }

    let mut written: Vec<PathBuf> = Vec::with_capacity(files.len());
    let mut unchanged = 0usize;

    for file in &files {
        let target = if to_file {
            args.output.clone()
        } else {
            args.output.join(file.relative.with_extension("png"))
        };
        if written.contains(&target) {
            return Err(CutError::Build {
                message: format!(
                    "{} and an earlier input both map to {}",
                    display_path(&file.path),
                    display_path(&target)
                ),
                help: Some("Matte inputs with the same file name in separate runs".to_string()),
            });
        }

        let img = load_rgba(&file.path)?;
        let result = matte.apply(&img);

        printer.status(
            "Matting",
            &format!(
                "{} ({} of {} pixels cleared)",
                display_path(&file.path),
                result.cleared,
                img.width() as usize * img.height() as usize
            ),
        );
        if result.is_noop() {
            unchanged += 1;
        }
        print_report(&result.report, printer);

        if let Some(parent) = target.parent().filter(|p| !p.exists()) {
            fs::create_dir_all(parent).map_err(|e| CutError::Io {
                path: parent.to_path_buf(),
                message: format!("Failed to create output directory: {}", e),
            })?;
        }
        write_png(&result.image, &target)?;
        printer.verbose("Writing", &display_path(&target));
        written.push(target);
    }

    if unchanged > 0 {
        printer.warning(
            "Unchanged",
            &format!("{} left as-is", plural(unchanged, "image", "images")),
        );
    }
    printer.success("Finished", &plural(written.len(), "image", "images"));

    Ok(written)
}
