//! Bounded resize, effects and captions over a [`Canvas`].

use crate::{
    assets::decode::SourceImage,
    effects::pixel::apply_effects,
    foundation::{
        core::{Dimensions, Point},
        error::MemeResult,
    },
    render::{
        canvas::Canvas,
        config::{CompositorOptions, RenderConfig},
    },
    text::wrap::draw_text,
};

/// Gap between the top edge and the top caption's first baseline, on top of the font size.
const TOP_MARGIN_PX: f64 = 10.0;

/// Scale `(width, height)` into `opts` keeping the aspect ratio.
///
/// The width is clamped first and the height second, each step scaling both sides. This is not
/// a single min-ratio fit: the second step sees the already width-clamped height.
pub fn bounded_size(width: f64, height: f64, opts: &CompositorOptions) -> (f64, f64) {
    let (mut w, mut h) = (width, height);
    if w > opts.max_width {
        let ratio = opts.max_width / w;
        w = opts.max_width;
        h *= ratio;
    }
    if h > opts.max_height {
        let ratio = opts.max_height / h;
        h = opts.max_height;
        w *= ratio;
    }
    (w, h)
}

/// What a render produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderSummary {
    pub size: Dimensions,
    pub top_lines: usize,
    pub bottom_lines: usize,
}

/// Stateless meme compositor. Every call fully overwrites the canvas.
#[derive(Clone, Copy, Debug, Default)]
pub struct Compositor {
    opts: CompositorOptions,
}

impl Compositor {
    pub fn new(opts: CompositorOptions) -> MemeResult<Self> {
        opts.validate()?;
        Ok(Self { opts })
    }

    pub fn options(&self) -> &CompositorOptions {
        &self.opts
    }

    #[tracing::instrument(skip_all, fields(src_w = source.width, src_h = source.height))]
    pub fn render<C: Canvas + ?Sized>(
        &self,
        source: &SourceImage,
        config: &RenderConfig,
        canvas: &mut C,
    ) -> MemeResult<RenderSummary> {
        config.validate()?;

        let (w, h) = bounded_size(f64::from(source.width), f64::from(source.height), &self.opts);
        let mut size = Dimensions::from_f64_truncated(w, h);
        // Extreme aspect ratios can truncate a side to zero.
        size.width = size.width.max(1);
        size.height = size.height.max(1);
        tracing::debug!(width = size.width, height = size.height, "bounded surface size");

        canvas.resize(size.width, size.height)?;
        canvas.draw_image(source)?;

        if config.effects.any() {
            tracing::debug!(effects = ?config.effects, "applying pixel effects");
            let mut pixels = canvas.image_data()?;
            apply_effects(&mut pixels, config.effects);
            canvas.put_image_data(&pixels)?;
        }

        canvas.set_text_style(&config.text_style())?;

        let size_px = config.font_size();
        let line_height = config.line_height();
        let mut summary = RenderSummary {
            size,
            top_lines: 0,
            bottom_lines: 0,
        };
        if !config.top_text.is_empty() {
            let anchor = Point::new(w / 2.0, size_px + TOP_MARGIN_PX);
            summary.top_lines = draw_text(canvas, &config.top_text, anchor, line_height)?;
        }
        if !config.bottom_text.is_empty() {
            let anchor = Point::new(w / 2.0, h - size_px / 2.0);
            summary.bottom_lines = draw_text(canvas, &config.bottom_text, anchor, line_height)?;
        }

        Ok(summary)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
