//! Grayscale, invert and sepia over interleaved RGBA8 (`[R, G, B, A, ...]`).
//!
//! Every transform reads and writes R, G, B in lock-step and never touches alpha. Buffers must be
//! a whole number of pixels; that is a caller precondition, not a runtime error.

/// Independently combinable effect toggles.
///
/// When several are set they run in a fixed order: grayscale, then invert, then sepia, each
/// consuming the previous transform's output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct EffectFlags {
    #[serde(default)]
    pub grayscale: bool,
    #[serde(default)]
    pub invert: bool,
    #[serde(default)]
    pub sepia: bool,
}

impl EffectFlags {
    pub const NONE: Self = Self {
        grayscale: false,
        invert: false,
        sepia: false,
    };

    pub fn any(self) -> bool {
        self.grayscale || self.invert || self.sepia
    }
}

/// Apply every enabled effect in place and hand the buffer back for chaining.
///
/// With no flag set the buffer is neither read nor written.
pub fn apply_effects(pixels: &mut [u8], flags: EffectFlags) -> &mut [u8] {
    debug_assert!(
        pixels.len().is_multiple_of(4),
        "rgba8 buffer length must be a multiple of 4"
    );
    if !flags.any() {
        return pixels;
    }

    if flags.grayscale {
        grayscale_in_place(pixels);
    }
    if flags.invert {
        invert_in_place(pixels);
    }
    if flags.sepia {
        sepia_in_place(pixels);
    }
    pixels
}

/// R = G = B = truncated mean of the three channels.
pub fn grayscale_in_place(pixels: &mut [u8]) {
    for px in pixels.chunks_exact_mut(4) {
        let sum = u16::from(px[0]) + u16::from(px[1]) + u16::from(px[2]);
        let avg = (sum / 3) as u8;
        px[0] = avg;
        px[1] = avg;
        px[2] = avg;
    }
}

pub fn invert_in_place(pixels: &mut [u8]) {
    for px in pixels.chunks_exact_mut(4) {
        px[0] = 255 - px[0];
        px[1] = 255 - px[1];
        px[2] = 255 - px[2];
    }
}

const SEPIA: [[f64; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

pub fn sepia_in_place(pixels: &mut [u8]) {
    for px in pixels.chunks_exact_mut(4) {
        let rgb = [f64::from(px[0]), f64::from(px[1]), f64::from(px[2])];
        for (out, row) in px.iter_mut().zip(SEPIA.iter()) {
            let v = row[0] * rgb[0] + row[1] * rgb[1] + row[2] * rgb[2];
            *out = clamp_u8(v);
        }
    }
}

// Clamped byte store: exact halves round to even.
fn clamp_u8(v: f64) -> u8 {
    v.clamp(0.0, 255.0).round_ties_even() as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/pixel.rs"]
mod tests;
