//! Colour type, parsing, and distance metrics.

use std::fmt;
use std::str::FromStr;

use image::Rgba;

use crate::error::{CutError, Result};

/// An RGBA colour value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Colour {
    /// Create a new colour from RGBA components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a new opaque colour from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Fully transparent colour.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// White.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Magenta, the usual chroma-key background of generated sheets.
    pub const MAGENTA: Self = Self::rgb(255, 0, 255);

    /// Parse a hex colour string.
    ///
    /// Supports formats:
    /// - `#RGB` (3 digits, expanded to 6)
    /// - `#RRGGBB` (6 digits)
    /// - `#RRGGBBAA` (8 digits)
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        let hex = s.strip_prefix('#').unwrap_or(s);

        if !hex.is_ascii() {
            return Err(invalid_hex(s));
        }

        match hex.len() {
            3 => {
                let mut channels = [0u8; 3];
                for (slot, c) in channels.iter_mut().zip(hex.chars()) {
                    let d = parse_hex_digit(c)?;
                    *slot = d << 4 | d;
                }
                Ok(Self::rgb(channels[0], channels[1], channels[2]))
            }
            6 => Ok(Self::rgb(
                parse_hex_byte(&hex[0..2])?,
                parse_hex_byte(&hex[2..4])?,
                parse_hex_byte(&hex[4..6])?,
            )),
            8 => Ok(Self::new(
                parse_hex_byte(&hex[0..2])?,
                parse_hex_byte(&hex[2..4])?,
                parse_hex_byte(&hex[4..6])?,
                parse_hex_byte(&hex[6..8])?,
            )),
            _ => Err(invalid_hex(s)),
        }
    }

    /// Convert to an RGBA array.
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Check if the colour is fully transparent.
    pub fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Check if the colour is fully opaque.
    pub fn is_opaque(self) -> bool {
        self.a == 255
    }

    /// Sum of absolute per-channel differences over R, G, B and A.
    pub fn manhattan_distance(self, other: Colour) -> u32 {
        self.to_rgba()
            .iter()
            .zip(other.to_rgba().iter())
            .map(|(&a, &b)| u32::from(a.abs_diff(b)))
            .sum()
    }

    /// Squared Euclidean distance over R, G and B. Alpha is ignored.
    pub fn squared_rgb_distance(self, other: Colour) -> u32 {
        let dr = u32::from(self.r.abs_diff(other.r));
        let dg = u32::from(self.g.abs_diff(other.g));
        let db = u32::from(self.b.abs_diff(other.b));
        dr * dr + dg * dg + db * db
    }
}

impl From<Rgba<u8>> for Colour {
    fn from(p: Rgba<u8>) -> Self {
        Self::new(p[0], p[1], p[2], p[3])
    }
}

impl From<&Rgba<u8>> for Colour {
    fn from(p: &Rgba<u8>) -> Self {
        Self::from(*p)
    }
}

impl From<Colour> for Rgba<u8> {
    fn from(c: Colour) -> Self {
        Rgba(c.to_rgba())
    }
}

impl FromStr for Colour {
    type Err = CutError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

fn invalid_hex(s: &str) -> CutError {
    CutError::Parse {
        message: format!("Invalid hex colour: {}", s),
        help: Some("Use #RGB, #RRGGBB, or #RRGGBBAA format".to_string()),
    }
}

/// Parse a single hex digit.
fn parse_hex_digit(c: char) -> Result<u8> {
    c.to_digit(16)
        .map(|d| d as u8)
        .ok_or_else(|| CutError::Parse {
            message: format!("Invalid hex digit: {}", c),
            help: None,
        })
}

/// Parse a two-character hex byte.
fn parse_hex_byte(s: &str) -> Result<u8> {
    u8::from_str_radix(s, 16).map_err(|_| CutError::Parse {
        message: format!("Invalid hex byte: {}", s),
        help: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_6digit() {
        let c = Colour::from_hex("#FF00FF").unwrap();
        assert_eq!(c, Colour::MAGENTA);

        let c = Colour::from_hex("#1a1a2e").unwrap();
        assert_eq!(c, Colour::rgb(0x1a, 0x1a, 0x2e));
    }

    #[test]
    fn test_from_hex_3digit() {
        let c = Colour::from_hex("#ABC").unwrap();
        assert_eq!(c, Colour::rgb(0xAA, 0xBB, 0xCC));
    }

    #[test]
    fn test_from_hex_8digit_and_no_hash() {
        assert_eq!(Colour::from_hex("FF000080").unwrap(), Colour::new(255, 0, 0, 128));
    }

    #[test]
    fn test_from_hex_invalid() {
        assert!(Colour::from_hex("#GGG").is_err());
        assert!(Colour::from_hex("#12345").is_err());
        assert!(Colour::from_hex("").is_err());
        assert!(Colour::from_hex("#ééé").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Colour::rgb(255, 0, 0)), "#FF0000");
        assert_eq!(format!("{}", Colour::new(255, 0, 0, 128)), "#FF000080");
    }

    #[test]
    fn test_manhattan_distance_counts_alpha() {
        let a = Colour::new(10, 20, 30, 255);
        let b = Colour::new(20, 10, 30, 250);
        assert_eq!(a.manhattan_distance(b), 25);
        assert_eq!(b.manhattan_distance(a), 25);
        assert_eq!(a.manhattan_distance(a), 0);
    }

    #[test]
    fn test_squared_rgb_distance_ignores_alpha() {
        let a = Colour::new(0, 0, 0, 255);
        let b = Colour::new(30, 40, 0, 0);
        assert_eq!(a.squared_rgb_distance(b), 2500);
        assert_eq!(Colour::BLACK.squared_rgb_distance(Colour::WHITE), 3 * 255 * 255);
    }

    #[test]
    fn test_rgba_conversion() {
        let c: Colour = Rgba([1, 2, 3, 4]).into();
        assert_eq!(c, Colour::new(1, 2, 3, 4));
        let p: Rgba<u8> = c.into();
        assert_eq!(p.0, [1, 2, 3, 4]);
    }
}
