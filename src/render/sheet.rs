//! Sprite sheet packer.
//!
//! Packs frames into a fixed-column grid in sequence order, the layout
//! animation tools expect from a sheet cut by `extract`. Outputs a
//! TexturePacker-compatible JSON Hash for game engine interop.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use image::{imageops, RgbaImage};
use serde::Serialize;

use crate::error::{CutError, Result};

use super::Canvas;

/// A named image to place on a sheet.
#[derive(Debug, Clone)]
pub struct Sprite {
    pub name: String,
    pub image: RgbaImage,
}

impl Sprite {
    pub fn new(name: impl Into<String>, image: RgbaImage) -> Self {
        Self {
            name: name.into(),
            image,
        }
    }

    /// Name a canvas after its output file stem, e.g. `frame_03`.
    pub fn from_canvas(canvas: &Canvas, prefix: &str, total: usize) -> Self {
        let file_name = canvas.file_name(prefix, total);
        let stem = file_name.trim_end_matches(".png");
        Self::new(stem, canvas.image.clone())
    }
}

/// A frame in the sprite sheet.
#[derive(Debug, Clone)]
pub struct SheetFrame {
    pub name: String,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// Sprite sheet metadata.
#[derive(Debug, Clone)]
pub struct SheetMeta {
    pub frames: Vec<SheetFrame>,
    pub image: String,
    pub size: (u32, u32),
    /// Grid cell size every sprite is placed into.
    pub cell: (u32, u32),
}

/// Grid sprite sheet packer.
#[derive(Debug, Clone, Copy)]
pub struct SheetPacker {
    /// Cells per row; 0 packs everything into a single strip.
    pub columns: u32,
    pub padding: u32,
}

impl SheetPacker {
    pub fn new(columns: u32, padding: u32) -> Self {
        Self { columns, padding }
    }

    /// Columns actually used for `count` sprites.
    pub fn effective_columns(&self, count: usize) -> u32 {
        let count = count.max(1) as u32;
        if self.columns == 0 {
            count
        } else {
            self.columns.min(count)
        }
    }

    /// Pack sprites into a grid, row-major in input order.
    ///
    /// The cell is the largest sprite extent. Smaller sprites are centred
    /// horizontally and bottom-aligned in their cell, never rescaled.
    pub fn pack(&self, sprites: &[Sprite]) -> (RgbaImage, SheetMeta) {
        if sprites.is_empty() {
            let meta = SheetMeta {
                frames: vec![],
                image: "sheet.png".to_string(),
                size: (0, 0),
                cell: (0, 0),
            };
            return (RgbaImage::new(0, 0), meta);
        }

        let cell_w = sprites.iter().map(|s| s.image.width()).max().unwrap_or(0);
        let cell_h = sprites.iter().map(|s| s.image.height()).max().unwrap_or(0);

        let columns = self.effective_columns(sprites.len());
        let rows = (sprites.len() as u32).div_ceil(columns);

        let sheet_w = columns * cell_w + (columns - 1) * self.padding;
        let sheet_h = rows * cell_h + (rows - 1) * self.padding;

        let mut sheet = RgbaImage::new(sheet_w, sheet_h);
        let mut frames = Vec::with_capacity(sprites.len());

        for (i, sprite) in sprites.iter().enumerate() {
            let col = i as u32 % columns;
            let row = i as u32 / columns;
            let (w, h) = sprite.image.dimensions();

            let x = col * (cell_w + self.padding) + (cell_w - w) / 2;
            let y = row * (cell_h + self.padding) + (cell_h - h);

            imageops::replace(&mut sheet, &sprite.image, i64::from(x), i64::from(y));
            frames.push(SheetFrame {
                name: sprite.name.clone(),
                x,
                y,
                w,
                h,
            });
        }

        let meta = SheetMeta {
            frames,
            image: "sheet.png".to_string(),
            size: (sheet_w, sheet_h),
            cell: (cell_w, cell_h),
        };

        (sheet, meta)
    }
}

/// Write sheet metadata as TexturePacker-compatible JSON Hash format.
pub fn write_sheet_json(meta: &SheetMeta, path: &Path) -> Result<()> {
    let output = TexturePackerJson::from_meta(meta);
    let json = serde_json::to_string_pretty(&output).map_err(|e| CutError::Build {
        message: format!("Failed to serialize sheet metadata: {}", e),
        help: None,
    })?;
    fs::write(path, json).map_err(|e| CutError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write sheet metadata: {}", e),
    })?;
    Ok(())
}

// --- TexturePacker JSON serialization types ---

#[derive(Serialize)]
struct TexturePackerJson {
    frames: BTreeMap<String, TPFrame>,
    meta: TPMeta,
}

#[derive(Serialize)]
struct TPFrame {
    frame: TPRect,
    rotated: bool,
    trimmed: bool,
    #[serde(rename = "spriteSourceSize")]
    sprite_source_size: TPRect,
    #[serde(rename = "sourceSize")]
    source_size: TPSize,
}

#[derive(Serialize)]
struct TPRect {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

#[derive(Serialize)]
struct TPSize {
    w: u32,
    h: u32,
}

#[derive(Serialize)]
struct TPMeta {
    app: String,
    version: String,
    image: String,
    format: String,
    size: TPSize,
    scale: String,
}

impl TexturePackerJson {
    fn from_meta(meta: &SheetMeta) -> Self {
        let mut frames = BTreeMap::new();
        for f in &meta.frames {
            frames.insert(
                f.name.clone(),
                TPFrame {
                    frame: TPRect {
                        x: f.x,
                        y: f.y,
                        w: f.w,
                        h: f.h,
                    },
                    rotated: false,
                    trimmed: false,
                    sprite_source_size: TPRect {
                        x: 0,
                        y: 0,
                        w: f.w,
                        h: f.h,
                    },
                    source_size: TPSize { w: f.w, h: f.h },
                },
            );
        }

        TexturePackerJson {
            frames,
            meta: TPMeta {
                app: "spritecut".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                image: meta.image.clone(),
                format: "RGBA8888".to_string(),
                size: TPSize {
                    w: meta.size.0,
                    h: meta.size.1,
                },
                scale: "1".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn make_sprite(name: &str, w: u32, h: u32, shade: u8) -> Sprite {
        Sprite::new(name, RgbaImage::from_pixel(w, h, Rgba([shade, shade, shade, 255])))
    }

    #[test]
    fn test_pack_empty() {
        let packer = SheetPacker::new(4, 0);
        let (sheet, meta) = packer.pack(&[]);
        assert_eq!(sheet.dimensions(), (0, 0));
        assert!(meta.frames.is_empty());
    }

    #[test]
    fn test_grid_layout_row_major() {
        let packer = SheetPacker::new(2, 0);
        let sprites: Vec<Sprite> = (0..3)
            .map(|i| make_sprite(&format!("frame_{:02}", i), 8, 8, i as u8))
            .collect();
        let (sheet, meta) = packer.pack(&sprites);

        assert_eq!(meta.size, (16, 16));
        let positions: Vec<(u32, u32)> = meta.frames.iter().map(|f| (f.x, f.y)).collect();
        assert_eq!(positions, vec![(0, 0), (8, 0), (0, 8)]);
        assert_eq!(sheet.get_pixel(9, 1).0, [1, 1, 1, 255]);
        // The fourth cell stays empty
        assert_eq!(sheet.get_pixel(12, 12).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_strip_when_columns_zero() {
        let packer = SheetPacker::new(0, 1);
        let sprites: Vec<Sprite> = (0..4).map(|i| make_sprite(&i.to_string(), 4, 4, 9)).collect();
        let (_sheet, meta) = packer.pack(&sprites);

        assert_eq!(packer.effective_columns(4), 4);
        assert_eq!(meta.size, (4 * 4 + 3, 4));
        assert_eq!(meta.frames[3].x, 15);
    }

    #[test]
    fn test_smaller_sprites_bottom_centred() {
        let packer = SheetPacker::new(2, 0);
        let sprites = vec![make_sprite("big", 8, 8, 1), make_sprite("small", 4, 2, 2)];
        let (_sheet, meta) = packer.pack(&sprites);

        assert_eq!(meta.cell, (8, 8));
        let small = &meta.frames[1];
        assert_eq!((small.x, small.y, small.w, small.h), (10, 6, 4, 2));
    }

    #[test]
    fn test_frames_do_not_overlap_with_padding() {
        let packer = SheetPacker::new(3, 2);
        let sprites: Vec<Sprite> = (0..7).map(|i| make_sprite(&i.to_string(), 5, 7, 3)).collect();
        let (_sheet, meta) = packer.pack(&sprites);

        for i in 0..meta.frames.len() {
            for j in (i + 1)..meta.frames.len() {
                let a = &meta.frames[i];
                let b = &meta.frames[j];
                let no_overlap = b.x >= a.x + a.w
                    || a.x >= b.x + b.w
                    || b.y >= a.y + a.h
                    || a.y >= b.y + b.h;
                assert!(no_overlap, "frames {} and {} overlap", a.name, b.name);
            }
        }
    }

    #[test]
    fn test_sprite_from_canvas_name() {
        let canvas = Canvas {
            index: 4,
            image: RgbaImage::new(2, 2),
        };
        assert_eq!(Sprite::from_canvas(&canvas, "walk", 12).name, "walk_04");
    }

    #[test]
    fn test_write_sheet_json() {
        let meta = SheetMeta {
            frames: vec![SheetFrame {
                name: "frame_00".to_string(),
                x: 0,
                y: 0,
                w: 64,
                h: 64,
            }],
            image: "sheet.png".to_string(),
            size: (64, 64),
            cell: (64, 64),
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.json");
        write_sheet_json(&meta, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();

        assert!(parsed["frames"]["frame_00"].is_object());
        assert_eq!(parsed["frames"]["frame_00"]["frame"]["w"], 64);
        assert_eq!(parsed["frames"]["frame_00"]["rotated"], false);
        assert_eq!(parsed["meta"]["app"], "spritecut");
        assert_eq!(parsed["meta"]["image"], "sheet.png");
        assert_eq!(parsed["meta"]["size"]["h"], 64);
    }
}
