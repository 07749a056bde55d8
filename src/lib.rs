//! spritecut - Sprite sheet segmentation
//!
//! Cuts a composite image of loosely arranged sprite frames into
//! fixed-size transparent canvases in reading order, and removes flat
//! backgrounds by flood fill.

pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod matte;
pub mod output;
pub mod render;
pub mod report;
pub mod segment;
pub mod types;

pub use config::{parse_dimensions, Settings, CONFIG_FILENAME};
pub use error::{CutError, Result};
pub use extract::{extract_frames, matte_frames, Extraction};
pub use matte::{Matte, TransparencyMatte, DEFAULT_MATTE_THRESHOLD};
pub use render::{
    load_rgba, remove_stale_frames, write_canvases, write_png, write_sheet_json, Canvas,
    FrameNormalizer, Resample, SheetFrame, SheetMeta, SheetPacker, Sprite,
};
pub use report::{ComponentSummary, Diagnostic, DiagnosticKind, DropReason, Report, Severity};
pub use segment::{
    label_components, BackgroundMatcher, BoundingBoxMapper, Component, ComponentFilter,
    ContentMask, DisjointSet, Downsampler, Frame, Labeling, RowClusterer, SegmentConfig,
    Segmentation, Segmenter,
};
pub use types::{BoundingBox, Colour};
