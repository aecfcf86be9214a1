use crate::{
    assets::decode::SourceImage,
    foundation::{
        core::{Point, Rgba8},
        error::MemeResult,
    },
    text::wrap::TextMeasure,
};

/// Text state applied to subsequent measure/stroke/fill calls.
///
/// Text is always centered horizontally on the x coordinate passed to the draw calls and sits on
/// the alphabetic baseline at y.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    pub family: String,
    pub size_px: f64,
    pub bold: bool,
    pub fill: Rgba8,
    pub stroke: Rgba8,
    pub line_width: f64,
}

/// Mutable raster target with a 2-D canvas style API.
///
/// Pixel reads and writes use straight (non-premultiplied) RGBA8, row-major.
pub trait Canvas: TextMeasure {
    /// Resize to `width` x `height`, discarding all current content.
    fn resize(&mut self, width: u32, height: u32) -> MemeResult<()>;

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Draw `image` scaled to cover the whole surface.
    fn draw_image(&mut self, image: &SourceImage) -> MemeResult<()>;

    /// Read back every pixel.
    fn image_data(&mut self) -> MemeResult<Vec<u8>>;

    /// Replace every pixel. `rgba.len()` must equal `width * height * 4`.
    fn put_image_data(&mut self, rgba: &[u8]) -> MemeResult<()>;

    fn set_text_style(&mut self, style: &TextStyle) -> MemeResult<()>;

    /// Outline `text` with the stroke color and line width.
    fn stroke_text(&mut self, text: &str, at: Point) -> MemeResult<()>;

    /// Paint the interior of `text` with the fill color.
    fn fill_text(&mut self, text: &str, at: Point) -> MemeResult<()>;
}

#[cfg(test)]
#[path = "../../tests/unit/render/canvas.rs"]
pub(crate) mod tests;
