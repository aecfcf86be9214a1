use std::{borrow::Cow, collections::HashMap};

use crate::{
    foundation::error::{MemeError, MemeResult},
    text::fonts::ResolvedFont,
};

/// One shaped caption line ready to be drawn.
pub struct ShapedLine {
    pub layout: parley::Layout<()>,
    /// Horizontal advance of the whole line in pixels.
    pub advance: f64,
    /// Distance from the top of the layout to the baseline.
    pub baseline: f64,
}

/// Stateful helper for shaping caption text with Parley.
///
/// Each family's bytes are registered once; later layouts reuse the registration.
pub struct TextEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    registered: HashMap<String, String>,
}

impl Default for TextEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextEngine {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            registered: HashMap::new(),
        }
    }

    /// Make `font` available for shaping and return the family name Parley knows it by.
    pub fn register(&mut self, font: &ResolvedFont) -> MemeResult<String> {
        let key = font.family.to_lowercase();
        if let Some(name) = self.registered.get(&key) {
            return Ok(name.clone());
        }

        let families = self.font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(font.bytes.as_ref().clone()),
            None,
        );
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| MemeError::render("no font families registered from font bytes"))?;
        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| MemeError::render("registered font family has no name"))?
            .to_string();

        self.registered.insert(key, family_name.clone());
        Ok(family_name)
    }

    /// Shape `text` as a single bold line. Line breaks in `text` are treated as spaces.
    pub fn shape_line(
        &mut self,
        text: &str,
        font: &ResolvedFont,
        size_px: f32,
    ) -> MemeResult<ShapedLine> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(MemeError::validation("font size must be finite and > 0"));
        }
        let family_name = self.register(font)?;
        let text: Cow<'_, str> = if text.contains(['\n', '\r']) {
            Cow::Owned(text.replace(['\n', '\r'], " "))
        } else {
            Cow::Borrowed(text)
        };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, &text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::BOLD,
        ));

        let mut layout: parley::Layout<()> = builder.build(&text);
        layout.break_all_lines(None);

        let (advance, baseline) = layout
            .lines()
            .next()
            .map(|line| {
                let m = line.metrics();
                (f64::from(m.advance), f64::from(m.baseline))
            })
            .unwrap_or((0.0, 0.0));

        Ok(ShapedLine {
            layout,
            advance,
            baseline,
        })
    }

    /// Advance width of `text` on one line.
    pub fn measure(&mut self, text: &str, font: &ResolvedFont, size_px: f32) -> MemeResult<f64> {
        if text.is_empty() {
            return Ok(0.0);
        }
        Ok(self.shape_line(text, font, size_px)?.advance)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/engine.rs"]
mod tests;
