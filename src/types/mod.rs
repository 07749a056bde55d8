//! Core domain types for spritecut.
//!
//! - `Colour` - RGBA colour values and the distance metrics the pipeline uses
//! - `BoundingBox` - full-resolution pixel rectangles

mod colour;
mod rect;

pub use colour::Colour;
pub use rect::BoundingBox;
