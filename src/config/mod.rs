//! Project settings (spritecut.yaml).
//!
//! Every field is optional in the file and defaults to the library
//! defaults. Command-line flags are applied on top of the loaded settings
//! before they are resolved into pipeline stages.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CutError, Result};
use crate::matte::{TransparencyMatte, DEFAULT_MATTE_THRESHOLD};
use crate::render::{FrameNormalizer, Resample};
use crate::segment::{
    SegmentConfig, DEFAULT_CONTENT_THRESHOLD, DEFAULT_FACTOR, DEFAULT_MAX_PIXELS,
    DEFAULT_MIN_PIXELS, DEFAULT_PADDING, DEFAULT_ROW_OVERLAP,
};
use crate::types::Colour;

/// Settings file name looked up in the working directory.
pub const CONFIG_FILENAME: &str = "spritecut.yaml";

/// Default output canvas size.
pub const DEFAULT_SIZE: &str = "64x64";

/// Default number of sheet columns.
pub const DEFAULT_COLUMNS: u32 = 8;

/// Settings loaded from spritecut.yaml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Output directory for extracted frames.
    pub output: PathBuf,

    /// Canvas size as WxH.
    pub size: String,

    /// Downsample factor used for labeling.
    pub factor: u32,

    /// Content threshold (sum of channel differences from the background).
    pub threshold: u32,

    /// Smallest retained component, in labeling-grid cells.
    pub min_pixels: u32,

    /// Largest retained component, in labeling-grid cells.
    pub max_pixels: u32,

    /// Padding around each frame, in source pixels.
    pub padding: u32,

    /// Vertical overlap ratio for grouping frames into rows.
    pub row_overlap: f64,

    /// Background colour as hex; sampled from the top-left pixel if unset.
    pub background: Option<String>,

    /// Expected number of frames.
    pub expect: Option<usize>,

    /// File name prefix for written frames.
    pub prefix: String,

    /// Resampling policy.
    pub resample: Resample,

    /// Squared RGB distance for the flood-fill matte.
    pub matte_threshold: u32,

    /// Sprite sheet columns; 0 packs a single strip.
    pub columns: u32,

    /// Gap between sprite sheet cells.
    pub sheet_padding: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output: PathBuf::from("frames"),
            size: DEFAULT_SIZE.to_string(),
            factor: DEFAULT_FACTOR,
            threshold: DEFAULT_CONTENT_THRESHOLD,
            min_pixels: DEFAULT_MIN_PIXELS,
            max_pixels: DEFAULT_MAX_PIXELS,
            padding: DEFAULT_PADDING,
            row_overlap: DEFAULT_ROW_OVERLAP,
            background: None,
            expect: None,
            prefix: "frame".to_string(),
            resample: Resample::default(),
            matte_threshold: DEFAULT_MATTE_THRESHOLD,
            columns: DEFAULT_COLUMNS,
            sheet_padding: 0,
        }
    }
}

impl Settings {
    /// Load settings from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CutError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read settings: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse settings from a YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| CutError::Parse {
            message: format!("Invalid settings: {}", e),
            help: Some(format!("Check {} syntax", CONFIG_FILENAME)),
        })
    }

    /// Load `explicit` if given, else `spritecut.yaml` in `dir` if present,
    /// else defaults. Returns the file the settings came from.
    pub fn resolve(explicit: Option<&Path>, dir: &Path) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, Some(path.to_path_buf())));
        }

        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.is_file() {
            Ok((Self::load(&candidate)?, Some(candidate)))
        } else {
            Ok((Self::default(), None))
        }
    }

    /// Parsed canvas dimensions.
    pub fn dimensions(&self) -> Result<(u32, u32)> {
        parse_dimensions(&self.size)
    }

    /// Build a validated segmentation config.
    pub fn segment_config(&self) -> Result<SegmentConfig> {
        let background = match &self.background {
            Some(hex) => Some(Colour::from_hex(hex)?),
            None => None,
        };

        let config = SegmentConfig {
            factor: self.factor,
            content_threshold: self.threshold,
            min_pixels: self.min_pixels,
            max_pixels: self.max_pixels,
            padding: self.padding,
            row_overlap: self.row_overlap,
            background,
            expected_frames: self.expect,
        };

        // Surface stage validation errors here rather than mid-run
        crate::segment::Segmenter::new(config.clone())?;
        Ok(config)
    }

    /// Build the frame normalizer for the configured canvas size.
    pub fn normalizer(&self) -> Result<FrameNormalizer> {
        let (w, h) = self.dimensions()?;
        FrameNormalizer::new(w, h, self.resample)
    }

    pub fn matte(&self) -> TransparencyMatte {
        TransparencyMatte::new(self.matte_threshold)
    }

    /// Default settings file contents, with comments.
    pub fn template() -> String {
        let d = Settings::default();
        format!(
            "\
# spritecut settings
# Command-line flags override these values.

# Where extracted frames are written
output: {output}

# Output canvas size (WxH)
size: {size}
prefix: {prefix}
resample: {resample}

# Segmentation
factor: {factor}
threshold: {threshold}
min_pixels: {min_pixels}
max_pixels: {max_pixels}
padding: {padding}
row_overlap: {row_overlap}
# background: \"#ff00ff\"
# expect: 12

# Flood-fill matte
matte_threshold: {matte_threshold}

# Sprite sheet
columns: {columns}
sheet_padding: {sheet_padding}
",
            output = d.output.display(),
            size = d.size,
            prefix = d.prefix,
            resample = d.resample,
            factor = d.factor,
            threshold = d.threshold,
            min_pixels = d.min_pixels,
            max_pixels = d.max_pixels,
            padding = d.padding,
            row_overlap = d.row_overlap,
            matte_threshold = d.matte_threshold,
            columns = d.columns,
            sheet_padding = d.sheet_padding,
        )
    }
}

/// Parse a "WxH" dimension string into (width, height).
pub fn parse_dimensions(s: &str) -> Result<(u32, u32)> {
    let parts: Vec<&str> = s.splitn(2, |c| c == 'x' || c == 'X').collect();
    if parts.len() != 2 {
        return Err(CutError::Parse {
            message: format!("Invalid dimensions '{}': expected WxH (e.g. 64x64)", s),
            help: Some("Use the format WxH, for example: 64x64, 32x48".to_string()),
        });
    }

    let w: u32 = parts[0].trim().parse().map_err(|_| CutError::Parse {
        message: format!("Invalid width '{}' in dimensions '{}'", parts[0], s),
        help: Some("Width must be a positive integer".to_string()),
    })?;

    let h: u32 = parts[1].trim().parse().map_err(|_| CutError::Parse {
        message: format!("Invalid height '{}' in dimensions '{}'", parts[1], s),
        help: Some("Height must be a positive integer".to_string()),
    })?;

    if w == 0 || h == 0 {
        return Err(CutError::Parse {
            message: format!("Dimensions must be non-zero, got {}x{}", w, h),
            help: Some("Both width and height must be at least 1".to_string()),
        });
    }

    Ok((w, h))
}
