//! Frame sinks for rendered digits.
//!
//! Every sink implements `ImageDisplay`; the demo does not care whether the
//! frame ends up in a browser tab, on disk, or in memory.

pub mod http;
pub mod png_directory;
pub mod recording;

use std::fmt;

use image::GrayImage;

pub use http::HttpFrameDisplay;
pub use png_directory::PngDirectoryDisplay;
pub use recording::RecordingDisplay;

#[derive(Debug)]
pub enum DisplayError {
    Io(std::io::Error),
    Image(image::ImageError),
    Server(String),
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayError::Io(e) => write!(f, "display I/O error: {}", e),
            DisplayError::Image(e) => write!(f, "cannot encode frame: {}", e),
            DisplayError::Server(msg) => write!(f, "frame server error: {}", msg),
        }
    }
}

impl std::error::Error for DisplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DisplayError::Io(e) => Some(e),
            DisplayError::Image(e) => Some(e),
            DisplayError::Server(_) => None,
        }
    }
}

impl From<std::io::Error> for DisplayError {
    fn from(e: std::io::Error) -> Self {
        DisplayError::Io(e)
    }
}

impl From<image::ImageError> for DisplayError {
    fn from(e: image::ImageError) -> Self {
        DisplayError::Image(e)
    }
}

/// Receives each rendered frame.
pub trait ImageDisplay {
    /// `duration_hint_millis` is how long the frame is meant to stay up; sinks
    /// may ignore it.
    fn on_frame_update(&mut self, image: &GrayImage, duration_hint_millis: u64) -> Result<(), DisplayError>;
}

impl<D: ImageDisplay + ?Sized> ImageDisplay for Box<D> {
    fn on_frame_update(&mut self, image: &GrayImage, duration_hint_millis: u64) -> Result<(), DisplayError> {
        (**self).on_frame_update(image, duration_hint_millis)
    }
}

/// PNG-encodes a grayscale frame in memory.
pub fn encode_png(image: &GrayImage) -> Result<Vec<u8>, DisplayError> {
    use image::codecs::png::PngEncoder;
    use image::{ColorType, ImageEncoder};

    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes).write_image(image.as_raw(), image.width(), image.height(), ColorType::L8)?;
    Ok(bytes)
}
