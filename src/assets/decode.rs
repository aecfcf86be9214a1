use std::sync::Arc;

use crate::foundation::{
    core::Dimensions,
    error::{MemeError, MemeResult},
};

/// Decoded raster image in straight RGBA8 form.
///
/// Immutable once loaded; cloning shares the pixel storage.
#[derive(Clone, Debug)]
pub struct SourceImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Straight-alpha pixels, row-major.
    pub pixels: Arc<image::RgbaImage>,
}

impl SourceImage {
    pub fn from_rgba(image: image::RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            pixels: Arc::new(image),
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width,
            height: self.height,
        }
    }
}

/// Decode encoded image bytes (any format the `image` crate reads) into a [`SourceImage`].
pub fn decode_image(bytes: &[u8]) -> MemeResult<SourceImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| MemeError::decode(format!("decode image from memory: {e}")))?;
    let image = SourceImage::from_rgba(dyn_img.to_rgba8());
    if image.width == 0 || image.height == 0 {
        return Err(MemeError::decode("decoded image has zero area"));
    }
    Ok(image)
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        let un = |c: u8| -> u8 { ((c as u16 * 255 + a / 2) / a).min(255) as u8 };
        px[0] = un(px[0]);
        px[1] = un(px[1]);
        px[2] = un(px[2]);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
