pub mod completions;
pub mod extract;
pub mod init;
pub mod inspect;
pub mod matte;
pub mod pack;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::config::Settings;
use crate::error::Result;
use crate::output::{display_path, Printer};

/// spritecut - Cut loosely arranged sprite sheets into frames
#[derive(Parser, Debug)]
#[command(name = "spritecut")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Show every dropped component and other details
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract frames from a sprite sheet into fixed-size PNGs
    Extract(extract::ExtractArgs),

    /// List the components found in a sprite sheet
    Inspect(inspect::InspectArgs),

    /// Remove a flat background by flood fill from the corners
    Matte(matte::MatteArgs),

    /// Pack a directory of frames into a grid sprite sheet
    Pack(pack::PackArgs),

    /// Write a default spritecut.yaml
    Init(init::InitArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Segmentation flags shared by `extract` and `inspect`.
///
/// Unset flags fall back to the settings file, then to the defaults.
#[derive(Args, Debug, Default, Clone)]
pub struct SegmentArgs {
    /// Settings file (default: ./spritecut.yaml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Downsample factor used for labeling
    #[arg(long)]
    pub factor: Option<u32>,

    /// Content threshold: summed channel difference from the background
    #[arg(long)]
    pub threshold: Option<u32>,

    /// Drop components smaller than this many grid cells
    #[arg(long)]
    pub min_pixels: Option<u32>,

    /// Drop components larger than this many grid cells
    #[arg(long)]
    pub max_pixels: Option<u32>,

    /// Padding around each frame, in pixels
    #[arg(long)]
    pub padding: Option<u32>,

    /// Vertical overlap ratio for grouping frames into rows
    #[arg(long)]
    pub row_overlap: Option<f64>,

    /// Background colour as hex (default: sampled from the top-left pixel)
    #[arg(long)]
    pub background: Option<String>,

    /// Expected number of frames; a mismatch lists every component found
    #[arg(long)]
    pub expect: Option<usize>,
}

impl SegmentArgs {
    /// Load settings and apply these flags on top.
    pub fn settings(&self, printer: &Printer) -> Result<Settings> {
        let mut settings = load_settings(self.config.as_deref(), printer)?;
        self.apply(&mut settings);
        Ok(settings)
    }

    /// Override `settings` with every flag that was given.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(v) = self.factor {
            settings.factor = v;
        }
        if let Some(v) = self.threshold {
            settings.threshold = v;
        }
        if let Some(v) = self.min_pixels {
            settings.min_pixels = v;
        }
        if let Some(v) = self.max_pixels {
            settings.max_pixels = v;
        }
        if let Some(v) = self.padding {
            settings.padding = v;
        }
        if let Some(v) = self.row_overlap {
            settings.row_overlap = v;
        }
        if let Some(v) = &self.background {
            settings.background = Some(v.clone());
        }
        if let Some(v) = self.expect {
            settings.expect = Some(v);
        }
    }
}

/// Load settings from `explicit` or the working directory.
pub fn load_settings(explicit: Option<&Path>, printer: &Printer) -> Result<Settings> {
    let (settings, source) = Settings::resolve(explicit, Path::new("."))?;
    if let Some(path) = source {
        printer.verbose("Config", &display_path(&path));
    }
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_segment_args_override_settings() {
        let mut settings = Settings {
            factor: 2,
            padding: 9,
            ..Default::default()
        };
        let args = SegmentArgs {
            factor: Some(1),
            background: Some("#fff".to_string()),
            ..Default::default()
        };
        args.apply(&mut settings);

        assert_eq!(settings.factor, 1);
        assert_eq!(settings.padding, 9);
        assert_eq!(settings.background.as_deref(), Some("#fff"));
    }

    #[test]
    fn test_parse_extract_flags() {
        let cli = Cli::parse_from([
            "spritecut",
            "extract",
            "sheet.png",
            "--size",
            "32x32",
            "--factor",
            "2",
            "--expect",
            "8",
            "-v",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Extract(args) => {
                assert_eq!(args.size.as_deref(), Some("32x32"));
                assert_eq!(args.segment.factor, Some(2));
                assert_eq!(args.segment.expect, Some(8));
            }
            other => panic!("expected extract, got {:?}", other),
        }
    }
}
