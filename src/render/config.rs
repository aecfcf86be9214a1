use serde::{Deserialize, Serialize};

use crate::{
    effects::pixel::EffectFlags,
    foundation::{
        core::Rgba8,
        error::{MemeError, MemeResult},
    },
    render::canvas::TextStyle,
};

/// Largest output surface the compositor produces.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompositorOptions {
    pub max_width: f64,
    pub max_height: f64,
}

impl Default for CompositorOptions {
    fn default() -> Self {
        Self {
            max_width: 800.0,
            max_height: 800.0,
        }
    }
}

impl CompositorOptions {
    pub fn validate(&self) -> MemeResult<()> {
        let ok = |v: f64| v.is_finite() && v >= 1.0;
        if !ok(self.max_width) || !ok(self.max_height) {
            return Err(MemeError::validation(
                "compositor bounds must be finite and >= 1",
            ));
        }
        Ok(())
    }
}

/// Everything a single render needs besides the source image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub font_family: String,
    pub font_size_px: u32,
    pub fill: Rgba8,
    pub stroke: Rgba8,
    pub effects: EffectFlags,
    pub top_text: String,
    pub bottom_text: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            font_family: "Impact".to_string(),
            font_size_px: 40,
            fill: Rgba8::WHITE,
            stroke: Rgba8::BLACK,
            effects: EffectFlags::NONE,
            top_text: String::new(),
            bottom_text: String::new(),
        }
    }
}

impl RenderConfig {
    pub fn font_size(&self) -> f64 {
        f64::from(self.font_size_px)
    }

    pub fn stroke_width(&self) -> f64 {
        self.font_size() / 15.0
    }

    pub fn line_height(&self) -> f64 {
        self.font_size() * 1.2
    }

    pub fn validate(&self) -> MemeResult<()> {
        if self.font_size_px == 0 {
            return Err(MemeError::validation("font size must be > 0"));
        }
        Ok(())
    }

    pub fn text_style(&self) -> TextStyle {
        TextStyle {
            family: self.font_family.clone(),
            size_px: self.font_size(),
            bold: true,
            fill: self.fill,
            stroke: self.stroke,
            line_width: self.stroke_width(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/config.rs"]
mod tests;
