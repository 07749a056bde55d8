//! Pack command implementation.
//!
//! Packs a directory of frames, sorted by file name, into a grid sprite
//! sheet with TexturePacker JSON metadata alongside.

use std::path::PathBuf;

use clap::Args;

use crate::error::{CutError, Result};
use crate::output::{display_path, plural, Printer};
use crate::render::{load_rgba, write_png, write_sheet_json, SheetMeta, SheetPacker, Sprite};

use super::load_settings;
use super::matte::collect_pngs;

/// Pack a directory of frames into a grid sprite sheet
#[derive(Args, Debug)]
pub struct PackArgs {
    /// Directory of PNG frames
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output sheet PNG; metadata is written next to it as .json
    #[arg(long, short)]
    pub output: PathBuf,

    /// Cells per row
    #[arg(long)]
    pub columns: Option<u32>,

    /// Pack every frame into a single row
    #[arg(long, conflicts_with = "columns")]
    pub strip: bool,

    /// Gap between cells, in pixels
    #[arg(long)]
    pub padding: Option<u32>,

    /// Settings file (default: ./spritecut.yaml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: PackArgs, printer: &Printer) -> Result<SheetMeta> {
    let settings = load_settings(args.config.as_deref(), printer)?;
    let columns = if args.strip {
        0
    } else {
        args.columns.unwrap_or(settings.columns)
    };
    let padding = args.padding.unwrap_or(settings.sheet_padding);

    if !args.input.is_dir() {
        return Err(CutError::Io {
            path: args.input.clone(),
            message: "Not a directory".to_string(),
        });
    }

    let files = collect_pngs(std::slice::from_ref(&args.input))?;
    if files.is_empty() {
        return Err(CutError::Build {
            message: format!("No PNG frames in {}", display_path(&args.input)),
            help: Some("Point at a directory of .png files, e.g. the output of `extract`".to_string()),
        });
    }

    let mut sprites = Vec::with_capacity(files.len());
    for file in &files {
        sprites.push(Sprite::new(file.stem(), load_rgba(&file.path)?));
    }
    printer.status("Packing", &plural(sprites.len(), "frame", "frames"));

    let packer = SheetPacker::new(columns, padding);
    let (sheet, mut meta) = packer.pack(&sprites);

    if let Some(name) = args.output.file_name() {
        meta.image = name.to_string_lossy().into_owned();
    }
    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| CutError::Io {
            path: parent.to_path_buf(),
            message: format!("Failed to create output directory: {}", e),
        })?;
    }

    let json_path = args.output.with_extension("json");
    write_png(&sheet, &args.output)?;
    write_sheet_json(&meta, &json_path)?;

    let cols = packer.effective_columns(sprites.len());
    let rows = (sprites.len() as u32).div_ceil(cols);
    printer.success(
        "Packed",
        &format!(
            "{} ({}x{}, {}x{} cells)",
            display_path(&args.output),
            meta.size.0,
            meta.size.1,
            cols,
            rows
        ),
    );

    Ok(meta)
}
