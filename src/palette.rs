//! Fixed color palette
//!
//! Segments never store raw RGB values, only small palette indices. The
//! table is a process-wide constant, so a valid [`ColorId`] always resolves.

use crate::color::{Rgb, rgb_from_u32};

/// Number of entries in the palette
pub const PALETTE_SIZE: usize = 11;

/// Largest valid color index
#[allow(clippy::cast_possible_truncation)]
pub const MAX_COLOR_ID: u8 = (PALETTE_SIZE - 1) as u8;

/// Create a palette from a list of hex colors (0xRRGGBB format)
macro_rules! hex_palette {
    ($($color:expr),*) => {
        [
            $(rgb_from_u32($color)),*
        ]
    };
}

#[allow(clippy::unreadable_literal)]
const COLOR_MAP: [Rgb; PALETTE_SIZE] = hex_palette![
    0x000000, // Black
    0xFF0000, // Red
    0x00FF00, // Green
    0x0000FF, // Blue
    0xFFFF00, // Yellow
    0xFF00FF, // Magenta
    0x00FFFF, // Cyan
    0xFFFFFF, // White
    0xFF7F00, // Orange
    0x7F00FF, // Purple
    0x007FFF  // Light blue
];

const COLOR_NAMES: [&str; PALETTE_SIZE] = [
    "Black",
    "Red",
    "Green",
    "Blue",
    "Yellow",
    "Magenta",
    "Cyan",
    "White",
    "Orange",
    "Purple",
    "Light Blue",
];

/// Index into the palette.
///
/// Construction clamps into `0..=MAX_COLOR_ID`, so every value of this type
/// is a valid table index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorId(u8);

impl ColorId {
    pub const BLACK: Self = Self(0);
    pub const RED: Self = Self(1);
    pub const GREEN: Self = Self(2);
    pub const BLUE: Self = Self(3);
    pub const YELLOW: Self = Self(4);
    pub const MAGENTA: Self = Self(5);
    pub const CYAN: Self = Self(6);
    pub const WHITE: Self = Self(7);
    pub const ORANGE: Self = Self(8);
    pub const PURPLE: Self = Self(9);
    pub const LIGHT_BLUE: Self = Self(10);

    /// Create a color id, clamping out-of-range values to the nearest bound
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub const fn new(raw: i32) -> Self {
        let clamped = if raw < 0 {
            0
        } else if raw > MAX_COLOR_ID as i32 {
            MAX_COLOR_ID as i32
        } else {
            raw
        };
        Self(clamped as u8)
    }

    /// Create a color id only if `raw` is a valid index
    pub const fn from_raw(raw: u8) -> Option<Self> {
        if raw > MAX_COLOR_ID {
            return None;
        }
        Some(Self(raw))
    }

    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Resolve the id to its RGB value
    pub const fn rgb(self) -> Rgb {
        COLOR_MAP[self.0 as usize]
    }

    /// Human readable color name
    pub const fn name(self) -> &'static str {
        COLOR_NAMES[self.0 as usize]
    }
}
