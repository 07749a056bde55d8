//! Extract command implementation.
//!
//! Segments a sprite sheet and writes each frame as a fixed-size PNG.

use std::path::PathBuf;

use clap::Args;

use crate::error::Result;
use crate::extract::matte_frames;
use crate::output::{display_path, plural, Printer};
use crate::render::{
    load_rgba, remove_stale_frames, write_canvases, write_png, write_sheet_json, Resample,
    SheetPacker, Sprite,
};
use crate::report::print_report;
use crate::segment::Segmenter;

use super::SegmentArgs;

/// Extract frames from a sprite sheet into fixed-size PNGs
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Sprite sheet to cut
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output directory for frames
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Canvas size as WxH (e.g. 64x64)
    #[arg(long)]
    pub size: Option<String>,

    /// File name prefix for frames
    #[arg(long)]
    pub prefix: Option<String>,

    /// Resampling policy
    #[arg(long, value_enum)]
    pub resample: Option<Resample>,

    /// Flood-fill each frame's background to transparency
    #[arg(long)]
    pub matte: bool,

    /// Squared RGB distance for --matte
    #[arg(long)]
    pub matte_threshold: Option<u32>,

    /// Also pack the frames into sheet.png and sheet.json
    #[arg(long)]
    pub sheet: bool,

    /// Sheet columns for --sheet
    #[arg(long)]
    pub columns: Option<u32>,

    /// Pack --sheet as a single row
    #[arg(long, conflicts_with = "columns")]
    pub strip: bool,

    #[command(flatten)]
    pub segment: SegmentArgs,
}

pub fn run(args: ExtractArgs, printer: &Printer) -> Result<Vec<PathBuf>> {
    let mut settings = args.segment.settings(printer)?;
    if let Some(output) = &args.output {
        settings.output = output.clone();
    }
    if let Some(size) = &args.size {
        settings.size = size.clone();
    }
    if let Some(prefix) = &args.prefix {
        settings.prefix = prefix.clone();
    }
    if let Some(resample) = args.resample {
        settings.resample = resample;
    }
    if let Some(threshold) = args.matte_threshold {
        settings.matte_threshold = threshold;
    }
    if let Some(columns) = args.columns {
        settings.columns = columns;
    }
    if args.strip {
        settings.columns = 0;
    }

    let config = settings.segment_config()?;
    let normalizer = settings.normalizer()?;

    let img = load_rgba(&args.input)?;
    printer.status(
        "Loading",
        &format!("{} ({}x{})", display_path(&args.input), img.width(), img.height()),
    );

    let segmentation = Segmenter::new(config)?.segment(&img);

    if let Some(reference) = segmentation.reference {
        printer.verbose("Background", &reference.to_string());
    }
    printer.status(
        "Segmenting",
        &format!(
            "{}x{} grid at factor {}, {} kept, {} dropped",
            segmentation.grid.0,
            segmentation.grid.1,
            segmentation.factor,
            plural(segmentation.retained.len(), "component", "components"),
            segmentation.dropped.len()
        ),
    );
    print_report(&segmentation.report, printer);

    let canvases = if args.matte {
        let (canvases, report) =
            matte_frames(&img, &segmentation.frames, &normalizer, &settings.matte());
        print_report(&report, printer);
        canvases
    } else {
        normalizer.normalize_all(&img, &segmentation.frames)
    };

    let written = write_canvases(&canvases, &settings.output, &settings.prefix)?;
    for path in &written {
        printer.verbose("Writing", &display_path(path));
    }
    let stale = remove_stale_frames(&settings.output, &settings.prefix, &written)?;
    if !stale.is_empty() {
        printer.warning(
            "Removed",
            &format!("{} from an earlier run", plural(stale.len(), "stale frame", "stale frames")),
        );
    }

    if args.sheet && !canvases.is_empty() {
        let total = canvases.len();
        let sprites: Vec<Sprite> = canvases
            .iter()
            .map(|c| Sprite::from_canvas(c, &settings.prefix, total))
            .collect();
        let packer = SheetPacker::new(settings.columns, settings.sheet_padding);
        let (sheet, meta) = packer.pack(&sprites);

        let sheet_path = settings.output.join(&meta.image);
        write_png(&sheet, &sheet_path)?;
        write_sheet_json(&meta, &settings.output.join("sheet.json"))?;
        printer.status(
            "Packed",
            &format!("{} ({}x{})", display_path(&sheet_path), meta.size.0, meta.size.1),
        );
    }

    printer.success(
        "Finished",
        &format!(
            "{} into {}",
            plural(written.len(), "frame", "frames"),
            display_path(&settings.output)
        ),
    );

    Ok(written)
}
