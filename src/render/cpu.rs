use std::collections::HashMap;

use crate::{
    assets::decode::{SourceImage, premultiply_rgba8_in_place, unpremultiply_rgba8_in_place},
    foundation::{
        core::{Point, Rgba8},
        error::{MemeError, MemeResult},
    },
    render::canvas::{Canvas, TextStyle},
    text::{
        engine::{ShapedLine, TextEngine},
        fonts::{FontLibrary, ResolvedFont},
        wrap::TextMeasure,
    },
};

/// Software [`Canvas`] backed by a premultiplied `vello_cpu` pixmap.
///
/// Text calls are shaped immediately but rasterized in batches; any pixel access flushes the
/// batch first.
pub struct CpuCanvas {
    width: u16,
    height: u16,
    pixmap: vello_cpu::Pixmap,
    fonts: FontLibrary,
    engine: TextEngine,
    font_cache: HashMap<String, vello_cpu::peniko::FontData>,
    active: Option<ActiveStyle>,
    pending: Vec<GlyphDraw>,
}

struct ActiveStyle {
    style: TextStyle,
    /// Resolved on first use, so captionless renders never need a font.
    face: Option<(ResolvedFont, vello_cpu::peniko::FontData)>,
}

enum GlyphPaint {
    Stroke { color: Rgba8, width: f64 },
    Fill { color: Rgba8 },
}

struct GlyphDraw {
    line: ShapedLine,
    font_data: vello_cpu::peniko::FontData,
    at: Point,
    paint: GlyphPaint,
}

impl CpuCanvas {
    pub fn new(fonts: FontLibrary) -> Self {
        Self {
            width: 1,
            height: 1,
            pixmap: vello_cpu::Pixmap::new(1, 1),
            fonts,
            engine: TextEngine::new(),
            font_cache: HashMap::new(),
            active: None,
            pending: Vec::new(),
        }
    }

    pub fn fonts(&self) -> &FontLibrary {
        &self.fonts
    }

    /// Family actually used for text, after fallback. `None` until text has been measured or
    /// drawn with the current style.
    pub fn resolved_family(&self) -> Option<&str> {
        self.active
            .as_ref()
            .and_then(|a| a.face.as_ref())
            .map(|(font, _)| font.family.as_str())
    }

    /// Current style plus its face, resolving the face on first use.
    fn active_face(
        &mut self,
    ) -> MemeResult<(TextStyle, ResolvedFont, vello_cpu::peniko::FontData)> {
        let active = self
            .active
            .as_mut()
            .ok_or_else(|| MemeError::render("no text style set"))?;
        if active.face.is_none() {
            let font = self.fonts.resolve(&active.style.family)?;
            let font_data = self
                .font_cache
                .entry(font.family.to_lowercase())
                .or_insert_with(|| {
                    vello_cpu::peniko::FontData::new(
                        vello_cpu::peniko::Blob::from(font.bytes.as_ref().clone()),
                        0,
                    )
                })
                .clone();
            tracing::debug!(requested = %active.style.family, family = %font.family, "caption font resolved");
            active.face = Some((font, font_data));
        }
        let (font, font_data) = active
            .face
            .clone()
            .ok_or_else(|| MemeError::render("caption font unavailable"))?;
        Ok((active.style.clone(), font, font_data))
    }

    fn queue_text(&mut self, text: &str, at: Point, stroke: bool) -> MemeResult<()> {
        let (style, font, font_data) = self.active_face()?;
        let line = self.engine.shape_line(text, &font, style.size_px as f32)?;
        let paint = if stroke {
            GlyphPaint::Stroke {
                color: style.stroke,
                width: style.line_width,
            }
        } else {
            GlyphPaint::Fill { color: style.fill }
        };
        self.pending.push(GlyphDraw {
            line,
            font_data,
            at,
            paint,
        });
        Ok(())
    }

    /// Rasterize queued text over the current pixels.
    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }

        let mut ctx = vello_cpu::RenderContext::new(self.width, self.height);
        for draw in self.pending.drain(..) {
            draw_glyphs(&mut ctx, &draw);
        }
        ctx.flush();

        let mut layer = vello_cpu::Pixmap::new(self.width, self.height);
        ctx.render_to_pixmap(&mut layer);
        over_in_place(
            self.pixmap.data_as_u8_slice_mut(),
            layer.data_as_u8_slice(),
        );
    }

    fn surface_len(&self) -> usize {
        usize::from(self.width) * usize::from(self.height) * 4
    }
}

fn draw_glyphs(ctx: &mut vello_cpu::RenderContext, draw: &GlyphDraw) {
    let origin_x = draw.at.x - draw.line.advance / 2.0;
    let origin_y = draw.at.y - draw.line.baseline;
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((origin_x, origin_y)));
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

    let color = match draw.paint {
        GlyphPaint::Stroke { color, width } => {
            ctx.set_stroke(
                vello_cpu::kurbo::Stroke::new(width)
                    .with_join(vello_cpu::kurbo::Join::Miter)
                    .with_miter_limit(10.0),
            );
            color
        }
        GlyphPaint::Fill { color } => color,
    };
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
        color.r, color.g, color.b, color.a,
    ));

    for line in draw.line.layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            // Pen-advanced positions with y on the line baseline, in layout coordinates.
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            let builder = ctx
                .glyph_run(&draw.font_data)
                .font_size(run.run().font_size());
            match draw.paint {
                GlyphPaint::Stroke { .. } => builder.stroke_glyphs(glyphs),
                GlyphPaint::Fill { .. } => builder.fill_glyphs(glyphs),
            }
        }
    }
}

impl TextMeasure for CpuCanvas {
    fn measure_text(&mut self, text: &str) -> MemeResult<f64> {
        let (style, font, _) = self.active_face()?;
        self.engine.measure(text, &font, style.size_px as f32)
    }
}

impl Canvas for CpuCanvas {
    fn resize(&mut self, width: u32, height: u32) -> MemeResult<()> {
        let width_u16: u16 = width
            .try_into()
            .map_err(|_| MemeError::render("surface width exceeds u16"))?;
        let height_u16: u16 = height
            .try_into()
            .map_err(|_| MemeError::render("surface height exceeds u16"))?;
        if width_u16 == 0 || height_u16 == 0 {
            return Err(MemeError::render("surface must be at least 1x1"));
        }

        self.pending.clear();
        self.width = width_u16;
        self.height = height_u16;
        self.pixmap = vello_cpu::Pixmap::new(width_u16, height_u16);
        Ok(())
    }

    fn width(&self) -> u32 {
        u32::from(self.width)
    }

    fn height(&self) -> u32 {
        u32::from(self.height)
    }

    fn draw_image(&mut self, image: &SourceImage) -> MemeResult<()> {
        self.flush();
        let (w, h) = (self.width(), self.height());
        let mut rgba = if image.pixels.dimensions() == (w, h) {
            image.pixels.as_raw().clone()
        } else {
            image::imageops::resize(
                &*image.pixels,
                w,
                h,
                image::imageops::FilterType::Triangle,
            )
            .into_raw()
        };
        premultiply_rgba8_in_place(&mut rgba);
        over_in_place(self.pixmap.data_as_u8_slice_mut(), &rgba);
        Ok(())
    }

    fn image_data(&mut self) -> MemeResult<Vec<u8>> {
        self.flush();
        let mut rgba = self.pixmap.data_as_u8_slice().to_vec();
        unpremultiply_rgba8_in_place(&mut rgba);
        Ok(rgba)
    }

    fn put_image_data(&mut self, rgba: &[u8]) -> MemeResult<()> {
        if rgba.len() != self.surface_len() {
            return Err(MemeError::validation(format!(
                "pixel buffer has {} bytes, surface needs {}",
                rgba.len(),
                self.surface_len()
            )));
        }
        self.pending.clear();
        let dst = self.pixmap.data_as_u8_slice_mut();
        dst.copy_from_slice(rgba);
        premultiply_rgba8_in_place(dst);
        Ok(())
    }

    fn set_text_style(&mut self, style: &TextStyle) -> MemeResult<()> {
        let face = match &self.active {
            Some(a) if a.style.family == style.family => a.face.clone(),
            _ => None,
        };
        self.active = Some(ActiveStyle {
            style: style.clone(),
            face,
        });
        Ok(())
    }

    fn stroke_text(&mut self, text: &str, at: Point) -> MemeResult<()> {
        self.queue_text(text, at, true)
    }

    fn fill_text(&mut self, text: &str, at: Point) -> MemeResult<()> {
        self.queue_text(text, at, false)
    }
}

/// Premultiplied source-over of `src` onto `dst`. Both buffers are the same size.
fn over_in_place(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        if s[3] == 0 {
            continue;
        }
        let inv = 255 - u16::from(s[3]);
        for i in 0..4 {
            d[i] = s[i].saturating_add(mul_div255(u16::from(d[i]), inv));
        }
    }
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
