//! Hex and rgba color values.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// An opaque 8-bit RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    /// Blend toward `other` by `t`, clamped to `0.0..=1.0`.
    pub fn mix(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let channel = |a: u8, b: u8| {
            let a = f64::from(a);
            (a + (f64::from(b) - a) * t).round() as u8
        };
        Rgb(
            channel(self.0, other.0),
            channel(self.1, other.1),
            channel(self.2, other.2),
        )
    }

    pub fn to_hex(self) -> HexColor {
        HexColor(self)
    }

    pub fn with_alpha(self, alpha: f64) -> Rgba {
        Rgba {
            rgb: self,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }
}

/// A `#rrggbb` color.
///
/// Always renders as six lower-case hex digits prefixed with `#`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor(Rgb);

impl HexColor {
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        HexColor(Rgb(r, g, b))
    }

    pub fn rgb(self) -> Rgb {
        self.0
    }

    /// Parse `value`, falling back to `default` when it is not a 6-digit hex color.
    pub fn parse_or(value: &str, default: HexColor) -> HexColor {
        value.parse().unwrap_or(default)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Rgb(r, g, b) = self.0;
        write!(f, "#{:02x}{:02x}{:02x}", r, g, b)
    }
}

impl FromStr for HexColor {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let digits = raw.strip_prefix('#').unwrap_or(raw);

        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidHex(s.to_string()));
        }

        let byte = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| ColorError::InvalidHex(s.to_string()))
        };

        Ok(HexColor(Rgb(byte(0)?, byte(2)?, byte(4)?)))
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A translucent color rendered as `rgba(r,g,b,a)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: f64,
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Rgb(r, g, b) = self.rgb;
        write!(f, "rgba({},{},{},{:.2})", r, g, b, self.alpha)
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Errors that can occur when parsing colors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ColorError {
    #[error("Invalid hex color: {0:?} (expected 6 hex digits)")]
    InvalidHex(String),
}
