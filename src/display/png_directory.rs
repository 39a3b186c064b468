use std::fs;
use std::path::{Path, PathBuf};

use image::GrayImage;
use log::debug;

use crate::display::{encode_png, DisplayError, ImageDisplay};

/// Writes frames as `frame_00000.png`, `frame_00001.png`, ... into a directory.
#[derive(Debug)]
pub struct PngDirectoryDisplay {
    dir: PathBuf,
    next_frame: usize,
}

impl PngDirectoryDisplay {
    /// Creates `dir` (and parents) if it does not exist yet.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<PngDirectoryDisplay, DisplayError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(PngDirectoryDisplay { dir, next_frame: 0 })
    }

    pub fn frames_written(&self) -> usize {
        self.next_frame
    }
}

impl ImageDisplay for PngDirectoryDisplay {
    fn on_frame_update(&mut self, image: &GrayImage, _duration_hint_millis: u64) -> Result<(), DisplayError> {
        let path = self.dir.join(format!("frame_{:05}.png", self.next_frame));
        fs::write(&path, encode_png(image)?)?;
        debug!("Wrote {}", path.display());
        self.next_frame += 1;
        Ok(())
    }
}
