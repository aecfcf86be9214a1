use super::*;
use crate::foundation::error::MemeError;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum RecordedOp {
    Resize(u32, u32),
    DrawImage { width: u32, height: u32 },
    ImageData,
    PutImageData,
    SetTextStyle(TextStyle),
    Stroke { text: String, x: f64, y: f64 },
    Fill { text: String, x: f64, y: f64 },
}

/// Canvas that records calls, samples images nearest-neighbour and measures every character as a
/// fixed width.
pub(crate) struct MockCanvas {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
    pub char_width: f64,
    pub ops: Vec<RecordedOp>,
}

impl MockCanvas {
    pub fn new() -> Self {
        Self::with_char_width(10.0)
    }

    pub fn with_char_width(char_width: f64) -> Self {
        Self {
            width: 0,
            height: 0,
            pixels: Vec::new(),
            char_width,
            ops: Vec::new(),
        }
    }

    pub fn strokes(&self) -> Vec<(String, f64, f64)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                RecordedOp::Stroke { text, x, y } => Some((text.clone(), *x, *y)),
                _ => None,
            })
            .collect()
    }

    pub fn fills(&self) -> Vec<(String, f64, f64)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                RecordedOp::Fill { text, x, y } => Some((text.clone(), *x, *y)),
                _ => None,
            })
            .collect()
    }
}

impl TextMeasure for MockCanvas {
    fn measure_text(&mut self, text: &str) -> MemeResult<f64> {
        Ok(text.chars().count() as f64 * self.char_width)
    }
}

impl Canvas for MockCanvas {
    fn resize(&mut self, width: u32, height: u32) -> MemeResult<()> {
        self.width = width;
        self.height = height;
        self.pixels = vec![0; width as usize * height as usize * 4];
        self.ops.push(RecordedOp::Resize(width, height));
        Ok(())
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn draw_image(&mut self, image: &SourceImage) -> MemeResult<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let sx = (u64::from(x) * u64::from(image.width) / u64::from(self.width)) as u32;
                let sy = (u64::from(y) * u64::from(image.height) / u64::from(self.height)) as u32;
                let px = image.pixels.get_pixel(sx, sy).0;
                let i = (y as usize * self.width as usize + x as usize) * 4;
                self.pixels[i..i + 4].copy_from_slice(&px);
            }
        }
        self.ops.push(RecordedOp::DrawImage {
            width: self.width,
            height: self.height,
        });
        Ok(())
    }

    fn image_data(&mut self) -> MemeResult<Vec<u8>> {
        self.ops.push(RecordedOp::ImageData);
        Ok(self.pixels.clone())
    }

    fn put_image_data(&mut self, rgba: &[u8]) -> MemeResult<()> {
        if rgba.len() != self.pixels.len() {
            return Err(MemeError::validation("pixel buffer length mismatch"));
        }
        self.pixels.copy_from_slice(rgba);
        self.ops.push(RecordedOp::PutImageData);
        Ok(())
    }

    fn set_text_style(&mut self, style: &TextStyle) -> MemeResult<()> {
        self.ops.push(RecordedOp::SetTextStyle(style.clone()));
        Ok(())
    }

    fn stroke_text(&mut self, text: &str, at: Point) -> MemeResult<()> {
        self.ops.push(RecordedOp::Stroke {
            text: text.to_string(),
            x: at.x,
            y: at.y,
        });
        Ok(())
    }

    fn fill_text(&mut self, text: &str, at: Point) -> MemeResult<()> {
        self.ops.push(RecordedOp::Fill {
            text: text.to_string(),
            x: at.x,
            y: at.y,
        });
        Ok(())
    }
}

#[test]
fn mock_samples_source_on_resize() {
    let mut canvas = MockCanvas::new();
    canvas.resize(4, 2).unwrap();
    let img = image::RgbaImage::from_fn(2, 1, |x, _| {
        if x == 0 {
            image::Rgba([255, 0, 0, 255])
        } else {
            image::Rgba([0, 0, 255, 255])
        }
    });
    canvas.draw_image(&SourceImage::from_rgba(img)).unwrap();
    let data = canvas.image_data().unwrap();
    assert_eq!(&data[0..4], &[255, 0, 0, 255]);
    assert_eq!(&data[12..16], &[0, 0, 255, 255]);
    assert!(canvas.put_image_data(&[0; 4]).is_err());
}
