//! Serialize a finished canvas.

use std::{io::Cursor, path::Path};

use anyhow::Context;
use base64::Engine as _;

use crate::{
    foundation::error::{MemeError, MemeResult},
    render::canvas::Canvas,
};

/// File name offered for downloads.
pub const DEFAULT_FILE_NAME: &str = "meme.png";

pub fn to_rgba_image<C: Canvas + ?Sized>(canvas: &mut C) -> MemeResult<image::RgbaImage> {
    let (w, h) = (canvas.width(), canvas.height());
    let rgba = canvas.image_data()?;
    image::RgbaImage::from_raw(w, h, rgba)
        .ok_or_else(|| MemeError::render("canvas pixel buffer does not match its size"))
}

pub fn to_png<C: Canvas + ?Sized>(canvas: &mut C) -> MemeResult<Vec<u8>> {
    let img = to_rgba_image(canvas)?;
    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .map_err(|e| MemeError::render(format!("encode png: {e}")))?;
    Ok(out)
}

/// `data:image/png;base64,...` form of the canvas.
pub fn to_data_uri<C: Canvas + ?Sized>(canvas: &mut C) -> MemeResult<String> {
    let png = to_png(canvas)?;
    Ok(format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png)
    ))
}

/// Write the canvas as PNG. A directory path gets [`DEFAULT_FILE_NAME`] appended.
#[tracing::instrument(skip(canvas))]
pub fn save_png<C: Canvas + ?Sized>(canvas: &mut C, path: &Path) -> MemeResult<std::path::PathBuf> {
    let path = if path.is_dir() {
        path.join(DEFAULT_FILE_NAME)
    } else {
        path.to_path_buf()
    };
    let png = to_png(canvas)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&path, png).with_context(|| format!("write '{}'", path.display()))?;
    tracing::info!(path = %path.display(), "saved meme");
    Ok(path)
}

#[cfg(test)]
#[path = "../tests/unit/export.rs"]
mod tests;
