//! Rendering of flat 28×28 MNIST buffers onto an `ImageDisplay`.

use std::fmt;

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma};

use crate::display::{DisplayError, ImageDisplay};

pub const MNIST_SIDE: usize = 28;
pub const MNIST_PIXELS: usize = MNIST_SIDE * MNIST_SIDE;
pub const DISPLAY_SIDE: u32 = 280;
pub const FRAME_DURATION_HINT_MILLIS: u64 = 1000;

#[derive(Debug)]
pub enum RenderError {
    BufferLength { expected: usize, found: usize },
    Display(DisplayError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::BufferLength { expected, found } => write!(
                f,
                "cannot render {} pixels as a digit, expected {}",
                found, expected
            ),
            RenderError::Display(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Display(e) => Some(e),
            RenderError::BufferLength { .. } => None,
        }
    }
}

impl From<DisplayError> for RenderError {
    fn from(e: DisplayError) -> Self {
        RenderError::Display(e)
    }
}

/// Builds the 28×28 grayscale raster for a column-major pixel buffer.
///
/// Pixel `(row r, col c)` is taken from `pixels[c * 28 + r]` and inverted,
/// so 0.0 is white and 1.0 is black. Values are converted to 8 bits by
/// truncating toward zero and keeping the low byte; out-of-range inputs
/// wrap instead of clamping.
pub fn to_raster(pixels: &[f32]) -> Result<GrayImage, RenderError> {
    if pixels.len() != MNIST_PIXELS {
        return Err(RenderError::BufferLength {
            expected: MNIST_PIXELS,
            found: pixels.len(),
        });
    }
    let side = MNIST_SIDE as u32;
    Ok(GrayImage::from_fn(side, side, |col, row| {
        let value = pixels[col as usize * MNIST_SIDE + row as usize];
        let original = f64::from(value * 255.0);
        Luma([to_byte(255.0 - original)])
    }))
}

/// Renders `pixels` at 280×280 (bilinear upsampling) and hands it to `display`.
pub fn draw<D: ImageDisplay + ?Sized>(pixels: &[f32], display: &mut D) -> Result<(), RenderError> {
    let raster = to_raster(pixels)?;
    let resized = imageops::resize(&raster, DISPLAY_SIDE, DISPLAY_SIDE, FilterType::Triangle);
    display.on_frame_update(&resized, FRAME_DURATION_HINT_MILLIS)?;
    Ok(())
}

fn to_byte(value: f64) -> u8 {
    value as i32 as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::RecordingDisplay;

    #[test]
    fn zeros_render_white_and_ones_render_black() {
        let white = to_raster(&[0.0; MNIST_PIXELS]).unwrap();
        assert!(white.pixels().all(|p| p.0[0] == 255));
        let black = to_raster(&[1.0; MNIST_PIXELS]).unwrap();
        assert!(black.pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn column_major_source_is_transposed() {
        let (r, c) = (3usize, 17usize);
        let mut pixels = [0.0f32; MNIST_PIXELS];
        pixels[c * MNIST_SIDE + r] = 1.0;
        let raster = to_raster(&pixels).unwrap();
        for (x, y, p) in raster.enumerate_pixels() {
            let expected = if (y as usize, x as usize) == (r, c) { 0 } else { 255 };
            assert_eq!(p.0[0], expected, "pixel at row {} col {}", y, x);
        }
    }

    #[test]
    fn rendering_is_deterministic() {
        let pixels: Vec<f32> = (0..MNIST_PIXELS).map(|i| (i % 97) as f32 / 96.0).collect();
        assert_eq!(to_raster(&pixels).unwrap(), to_raster(&pixels).unwrap());
    }

    #[test]
    fn out_of_range_values_wrap_instead_of_clamping() {
        let mut pixels = [0.0f32; MNIST_PIXELS];
        pixels[0] = 2.0; // 255 - 510 = -255 -> low byte 1
        pixels[1] = -0.5; // 255 + 127.5 = 382.5 -> 382 -> low byte 126
        let raster = to_raster(&pixels).unwrap();
        assert_eq!(raster.get_pixel(0, 0).0[0], 1);
        assert_eq!(raster.get_pixel(0, 1).0[0], 126);
    }

    #[test]
    fn draw_sends_an_upsampled_frame() {
        let mut display = RecordingDisplay::new();
        draw(&[0.5; MNIST_PIXELS], &mut display).unwrap();
        let (frame, hint) = &display.frames[0];
        assert_eq!(frame.dimensions(), (DISPLAY_SIDE, DISPLAY_SIDE));
        assert_eq!(*hint, FRAME_DURATION_HINT_MILLIS);
    }

    #[test]
    fn wrong_buffer_length_is_an_error() {
        let mut display = RecordingDisplay::new();
        assert!(matches!(
            draw(&[0.0; 10], &mut display),
            Err(RenderError::BufferLength { expected: 784, found: 10 })
        ));
        assert_eq!(display.frame_count(), 0);
    }
}
