//! Caption wrapping and stacked stroke/fill drawing.

use crate::{
    foundation::{core::Point, error::MemeResult},
    render::canvas::Canvas,
};

/// Share of the surface width a wrapped line must stay under.
pub const WRAP_WIDTH_RATIO: f64 = 0.9;

/// Width measurement in the currently configured text style.
pub trait TextMeasure {
    fn measure_text(&mut self, text: &str) -> MemeResult<f64>;
}

/// Greedily break `text` into lines narrower than `max_width`.
///
/// Tokens are split on single spaces, so runs of spaces keep their empty tokens. A single token
/// wider than `max_width` still gets a line of its own.
pub fn wrap_lines<M: TextMeasure + ?Sized>(
    measure: &mut M,
    text: &str,
    max_width: f64,
) -> MemeResult<Vec<String>> {
    let mut words = text.split(' ');
    let mut line = words.next().unwrap_or_default().to_string();
    let mut lines = Vec::new();

    for word in words {
        let candidate = format!("{line} {word}");
        if measure.measure_text(&candidate)? < max_width {
            line = candidate;
        } else {
            lines.push(std::mem::replace(&mut line, word.to_string()));
        }
    }
    lines.push(line);
    Ok(lines)
}

/// Wrap `text` against the canvas width and draw each line, stroke first then fill, centered on
/// `anchor.x`. Line `i` sits on baseline `anchor.y + i * line_height`.
///
/// Returns the number of lines drawn.
pub fn draw_text<C: Canvas + ?Sized>(
    canvas: &mut C,
    text: &str,
    anchor: Point,
    line_height: f64,
) -> MemeResult<usize> {
    let max_width = f64::from(canvas.width()) * WRAP_WIDTH_RATIO;
    let lines = wrap_lines(canvas, text, max_width)?;
    tracing::debug!(lines = lines.len(), max_width, "wrapped caption");

    for (i, line) in lines.iter().enumerate() {
        let at = Point::new(anchor.x, anchor.y + i as f64 * line_height);
        canvas.stroke_text(line, at)?;
        canvas.fill_text(line, at)?;
    }
    Ok(lines.len())
}

#[cfg(test)]
#[path = "../../tests/unit/text/wrap.rs"]
mod tests;
