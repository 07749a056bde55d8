//! Inspect command implementation.
//!
//! Runs segmentation without writing frames and lists every component,
//! largest first, so thresholds can be tuned before an extract.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::error::{CutError, Result};
use crate::output::{display_path, plural, Printer};
use crate::render::load_rgba;
use crate::report::{print_report, DiagnosticKind, DropReason, Report};
use crate::segment::{Component, ComponentFilter, Segmentation, Segmenter};
use crate::types::BoundingBox;

use super::SegmentArgs;

/// List the components found in a sprite sheet
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Sprite sheet to inspect
    #[arg(required = true)]
    pub input: PathBuf,

    /// Print JSON to stdout instead of a listing
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub segment: SegmentArgs,
}

/// Machine-readable inspection result.
#[derive(Debug, Serialize)]
pub struct Inspection {
    pub input: PathBuf,
    pub width: u32,
    pub height: u32,
    pub background: Option<String>,
    pub factor: u32,
    pub grid: (u32, u32),
    pub components: Vec<ComponentRow>,
    pub diagnostics: Report,
}

/// One component, retained or dropped.
#[derive(Debug, Serialize)]
pub struct ComponentRow {
    pub id: u32,
    pub pixel_count: u32,
    pub estimated_area: u64,
    /// Unpadded full-resolution bounds.
    pub bounds: BoundingBox,
    /// Sequence index of the frame this component became.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dropped: Option<DropReason>,
}

impl Inspection {
    fn new(
        input: PathBuf,
        width: u32,
        height: u32,
        seg: Segmentation,
        filter: &ComponentFilter,
    ) -> Self {
        let factor = seg.factor;
        let row = |c: &Component, frame: Option<usize>| ComponentRow {
            id: c.id,
            pixel_count: c.pixel_count,
            estimated_area: c.estimated_area(factor),
            bounds: c.full_res_bounds(factor),
            frame,
            dropped: filter.reject_reason(c),
        };

        let mut components: Vec<ComponentRow> = seg
            .retained
            .iter()
            .enumerate()
            .map(|(i, c)| row(c, Some(i)))
            .chain(seg.dropped.iter().map(|c| row(c, None)))
            .collect();
        components.sort_by(|a, b| b.pixel_count.cmp(&a.pixel_count).then(a.id.cmp(&b.id)));

        Self {
            input,
            width,
            height,
            background: seg.reference.map(|c| c.to_string()),
            factor,
            grid: seg.grid,
            components,
            diagnostics: seg.report,
        }
    }
}

pub fn run(args: InspectArgs, printer: &Printer) -> Result<Inspection> {
    let settings = args.segment.settings(printer)?;
    let config = settings.segment_config()?;
    let filter = ComponentFilter::new(config.min_pixels, config.max_pixels)?;

    let img = load_rgba(&args.input)?;
    let seg = Segmenter::new(config)?.segment(&img);
    let inspection = Inspection::new(args.input.clone(), img.width(), img.height(), seg, &filter);

    if args.json {
        let json = serde_json::to_string_pretty(&inspection).map_err(|e| CutError::Build {
            message: format!("Failed to serialize inspection: {}", e),
            help: None,
        })?;
        println!("{}", json);
        return Ok(inspection);
    }

    printer.status(
        "Inspecting",
        &format!(
            "{} ({}x{}, background {})",
            display_path(&inspection.input),
            inspection.width,
            inspection.height,
            inspection.background.as_deref().unwrap_or("none")
        ),
    );

    for c in &inspection.components {
        let detail = format!(
            "#{:<5} {:>6} cells  ~{:>7} px  {}",
            c.id, c.pixel_count, c.estimated_area, c.bounds
        );
        match (c.frame, c.dropped) {
            (Some(i), _) => printer.info(&format!("Frame {}", i), &detail),
            (None, Some(DropReason::Noise)) => printer.warning("Noise", &detail),
            (None, _) => printer.warning("Oversized", &detail),
        }
    }

    // Dropped components are already in the listing
    let mut rest = Report::new();
    for d in inspection.diagnostics.iter() {
        if !matches!(d.kind, DiagnosticKind::ComponentDropped { .. }) {
            rest.push(d.clone());
        }
    }
    print_report(&rest, printer);

    let kept = inspection.components.iter().filter(|c| c.frame.is_some()).count();
    printer.success(
        "Finished",
        &format!(
            "{} kept, {} dropped",
            plural(kept, "component", "components"),
            inspection.components.len() - kept
        ),
    );

    Ok(inspection)
}
