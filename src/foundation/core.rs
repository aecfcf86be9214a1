use crate::foundation::error::{MemeError, MemeResult};

pub use kurbo::{Affine, Point, Vec2};

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const WHITE: Self = Self::opaque(255, 255, 255);
    pub const BLACK: Self = Self::opaque(0, 0, 0);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse a CSS hex color: `#rgb`, `#rrggbb`, or `#rrggbbaa` (leading `#` optional).
    pub fn parse_hex(s: &str) -> MemeResult<Self> {
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return Err(MemeError::validation(format!("invalid color '{s}'")));
        }

        let nibble = |c: u8| -> MemeResult<u8> {
            (c as char)
                .to_digit(16)
                .map(|d| d as u8)
                .ok_or_else(|| MemeError::validation(format!("invalid color '{s}'")))
        };
        let byte = |i: usize| -> MemeResult<u8> {
            let b = hex.as_bytes();
            Ok(nibble(b[i])? << 4 | nibble(b[i + 1])?)
        };

        match hex.len() {
            3 => {
                let b = hex.as_bytes();
                let (r, g, bl) = (nibble(b[0])?, nibble(b[1])?, nibble(b[2])?);
                Ok(Self::opaque(r * 17, g * 17, bl * 17))
            }
            6 => Ok(Self::opaque(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Self {
                r: byte(0)?,
                g: byte(2)?,
                b: byte(4)?,
                a: byte(6)?,
            }),
            _ => Err(MemeError::validation(format!(
                "invalid color '{s}': expected #rgb, #rrggbb or #rrggbbaa"
            ))),
        }
    }

    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl std::str::FromStr for Rgba8 {
    type Err = MemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

/// Whole-pixel surface dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    /// Truncate fractional canvas dimensions the way assigning them to a canvas does.
    pub fn from_f64_truncated(width: f64, height: f64) -> Self {
        Self {
            width: width.max(0.0) as u32,
            height: height.max(0.0) as u32,
        }
    }

    pub fn pixel_len(self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
