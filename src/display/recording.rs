use image::GrayImage;

use crate::display::{DisplayError, ImageDisplay};

/// Keeps every frame in memory.
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    pub frames: Vec<(GrayImage, u64)>,
}

impl RecordingDisplay {
    pub fn new() -> RecordingDisplay {
        RecordingDisplay::default()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

impl ImageDisplay for RecordingDisplay {
    fn on_frame_update(&mut self, image: &GrayImage, duration_hint_millis: u64) -> Result<(), DisplayError> {
        self.frames.push((image.clone(), duration_hint_millis));
        Ok(())
    }
}
