//! RGB color triple with hex string conversion
//!
//! Owners store colors as linear `f32` triples; control surfaces edit them as
//! `#RRGGBB` strings. [`Rgb::to_hex`] always produces the canonical uppercase
//! six-digit form, [`Rgb::from_hex`] accepts the common spellings.

use serde::{Deserialize, Serialize};

use crate::core::error::BindingError;
use crate::foundation::math::Vec3;

/// Color with components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Rgb {
    /// Opaque white
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    /// Create from components
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create from a packed `0xRRGGBB` integer
    pub fn from_u32(hex: u32) -> Self {
        let channel = |shift: u32| f32::from(((hex >> shift) & 0xFF) as u8) / 255.0;
        Self::new(channel(16), channel(8), channel(0))
    }

    /// Pack into `0xRRGGBB`, clamping and rounding each channel
    pub fn to_u32(self) -> u32 {
        let channel = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    /// Parse `#RRGGBB`, `#RGB`, `RRGGBB` or `0xRRGGBB` (case-insensitive)
    pub fn from_hex(input: &str) -> Result<Self, BindingError> {
        let parse_error = |reason: &str| BindingError::Parse {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix('#')
            .or_else(|| trimmed.strip_prefix("0x"))
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(parse_error("not a hexadecimal color"));
        }

        let expanded: String = match digits.len() {
            6 => digits.to_string(),
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            _ => return Err(parse_error("expected 3 or 6 hex digits")),
        };

        u32::from_str_radix(&expanded, 16)
            .map(Self::from_u32)
            .map_err(|e| parse_error(&e.to_string()))
    }

    /// Canonical `#RRGGBB` form
    pub fn to_hex(self) -> String {
        format!("#{:06X}", self.to_u32())
    }

    /// Components as a vector
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.r, self.g, self.b)
    }
}

impl From<Vec3> for Rgb {
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}
