//! PNG input and output.

use std::fs;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use walkdir::WalkDir;

use crate::error::{CutError, Result};

use super::Canvas;

/// Decode an image file into an RGBA buffer.
///
/// Any decoder failure is fatal for the run and surfaces as
/// [`CutError::Decode`].
pub fn load_rgba(path: &Path) -> Result<RgbaImage> {
    if !path.exists() {
        return Err(CutError::Io {
            path: path.to_path_buf(),
            message: "File not found".to_string(),
        });
    }

    let img = image::open(path).map_err(|e| CutError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(img.to_rgba8())
}

/// Write an RGBA buffer to a PNG file.
pub fn write_png(img: &RgbaImage, path: &Path) -> Result<()> {
    img.save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| CutError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to write PNG: {}", e),
        })
}

/// Write canvases into `dir` as `<prefix>_<index>.png`.
///
/// Creates `dir` if needed and returns the written paths in sequence order.
pub fn write_canvases(canvases: &[Canvas], dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| CutError::Io {
            path: dir.to_path_buf(),
            message: format!("Failed to create output directory: {}", e),
        })?;
    }

    let mut written = Vec::with_capacity(canvases.len());
    for canvas in canvases {
        let path = dir.join(canvas.file_name(prefix, canvases.len()));
        write_png(&canvas.image, &path)?;
        written.push(path);
    }

    Ok(written)
}

/// Delete `<prefix>_<digits>.png` files in `dir` that are not in `keep`.
///
/// A rerun that yields fewer frames would otherwise leave the tail of the
/// previous run next to the new frames. Only the top level of `dir` is
/// scanned. Returns the removed paths, sorted by file name.
pub fn remove_stale_frames(dir: &Path, prefix: &str, keep: &[PathBuf]) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let stale: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| is_frame_name(&e.file_name().to_string_lossy(), prefix))
        .map(|e| e.into_path())
        .filter(|p| !keep.contains(p))
        .collect();

    for path in &stale {
        fs::remove_file(path).map_err(|e| CutError::Io {
            path: path.clone(),
            message: format!("Failed to remove stale frame: {}", e),
        })?;
    }

    Ok(stale)
}

fn is_frame_name(name: &str, prefix: &str) -> bool {
    name.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('_'))
        .and_then(|rest| rest.strip_suffix(".png"))
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use tempfile::tempdir;

    #[test]
    fn test_write_and_load_round_trip_alpha() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(1, 0, Rgba([255, 0, 0, 128]));

        let dir = tempdir().unwrap();
        let path = dir.path().join("alpha.png");
        write_png(&img, &path).unwrap();

        let loaded = load_rgba(&path).unwrap();
        assert_eq!(loaded.get_pixel(0, 0).0, [0, 0, 0, 0]);
        assert_eq!(loaded.get_pixel(1, 0).0, [255, 0, 0, 128]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_rgba(Path::new("/nonexistent/sheet.png")).unwrap_err();
        assert!(matches!(err, CutError::Io { .. }));
    }

    #[test]
    fn test_load_corrupt_file_is_decode_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.png");
        fs::write(&path, b"not a png at all").unwrap();

        let err = load_rgba(&path).unwrap_err();
        assert!(matches!(err, CutError::Decode { .. }));
    }

    #[test]
    fn test_write_canvases_names_and_order() {
        let canvases: Vec<Canvas> = (0..3)
            .map(|index| Canvas {
                index,
                image: RgbaImage::from_pixel(4, 4, Rgba([index as u8, 0, 0, 255])),
            })
            .collect();

        let dir = tempdir().unwrap();
        let out = dir.path().join("frames");
        let written = write_canvases(&canvases, &out, "frame").unwrap();

        let names: Vec<String> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["frame_00.png", "frame_01.png", "frame_02.png"]);

        let second = load_rgba(&written[1]).unwrap();
        assert_eq!(second.get_pixel(0, 0).0, [1, 0, 0, 255]);
    }

    #[test]
    fn test_remove_stale_frames_after_shorter_run() {
        let dir = tempdir().unwrap();
        let out = dir.path();
        let canvas = |index| Canvas {
            index,
            image: RgbaImage::new(2, 2),
        };

        let first: Vec<Canvas> = (0..5).map(canvas).collect();
        write_canvases(&first, out, "frame").unwrap();
        fs::write(out.join("frame_notes.png"), b"kept").unwrap();
        fs::write(out.join("walk_00.png"), b"kept").unwrap();
        fs::write(out.join("sheet.png"), b"kept").unwrap();

        let second: Vec<Canvas> = (0..2).map(canvas).collect();
        let written = write_canvases(&second, out, "frame").unwrap();
        let removed = remove_stale_frames(out, "frame", &written).unwrap();

        let names: Vec<String> = removed
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["frame_02.png", "frame_03.png", "frame_04.png"]);
        assert!(out.join("frame_01.png").exists());
        assert!(out.join("frame_notes.png").exists());
        assert!(out.join("walk_00.png").exists());
        assert!(out.join("sheet.png").exists());
    }

    #[test]
    fn test_remove_stale_frames_missing_dir() {
        let dir = tempdir().unwrap();
        let removed = remove_stale_frames(&dir.path().join("absent"), "frame", &[]).unwrap();
        assert!(removed.is_empty());
    }
}
