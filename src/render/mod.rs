//! Rendering frames to disk.
//!
//! Normalizes segmented frames into fixed-size canvases, writes them as
//! PNGs, and packs canvases into sprite sheets.

mod normalize;
mod png;
mod sheet;

pub use normalize::{Canvas, FrameNormalizer, Resample};
pub use png::{load_rgba, remove_stale_frames, write_canvases, write_png};
pub use sheet::{write_sheet_json, SheetFrame, SheetMeta, SheetPacker, Sprite};
