//! Frame sources
//!
//! Stand-ins for a live camera: a single still image, or a directory of
//! numbered frames played back in file-name order.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use image::RgbImage;
use tracing::debug;

use crate::asset;
use crate::error::{OverlayError, Result};

/// File extensions recognized as frames in a sequence directory
pub const FRAME_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tiff"];

/// Produces frames until exhausted
pub trait FrameSource {
    /// Next frame, or `None` at the end of the stream
    fn next_frame(&mut self) -> Result<Option<RgbImage>>;
}

/// One image, yielded once
#[derive(Debug, Clone)]
pub struct StillImage {
    path: PathBuf,
    done: bool,
}

impl StillImage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            done: false,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FrameSource for StillImage {
    fn next_frame(&mut self) -> Result<Option<RgbImage>> {
        if self.done {
            return Ok(None);
        }
        self.done = true;
        asset::load_frame(&self.path).map(Some)
    }
}

/// Frames read from a directory, sorted by file name
#[derive(Debug, Clone)]
pub struct ImageSequence {
    pending: VecDeque<PathBuf>,
    current: Option<PathBuf>,
}

fn is_frame_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| FRAME_EXTENSIONS.iter().any(|f| f.eq_ignore_ascii_case(ext)))
}

impl ImageSequence {
    /// Collect the frame files in `dir`; other files are ignored
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(OverlayError::AssetNotFound(dir.to_path_buf()));
        }

        let mut frames = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if is_frame_file(&path) {
                frames.push(path);
            }
        }
        frames.sort();
        debug!(dir = %dir.display(), frames = frames.len(), "frame sequence opened");

        Ok(Self {
            pending: frames.into(),
            current: None,
        })
    }

    /// Frames not yet read
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// Path of the frame most recently returned
    #[must_use]
    pub fn current_path(&self) -> Option<&Path> {
        self.current.as_deref()
    }
}

impl FrameSource for ImageSequence {
    fn next_frame(&mut self) -> Result<Option<RgbImage>> {
        let Some(path) = self.pending.pop_front() else {
            return Ok(None);
        };
        let frame = asset::load_frame(&path)?;
        self.current = Some(path);
        Ok(Some(frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("facefx-source-{}-{name}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_still_image_yields_once() {
        let dir = temp_dir("still");
        let path = dir.join("photo.png");
        RgbImage::from_pixel(3, 2, Rgb([7, 8, 9])).save(&path).unwrap();

        let mut source = StillImage::new(&path);
        let frame = source.next_frame().unwrap().unwrap();
        assert_eq!(frame.dimensions(), (3, 2));
        assert!(source.next_frame().unwrap().is_none());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_still_image_missing() {
        let mut source = StillImage::new("/definitely/not/here.png");
        assert!(matches!(
            source.next_frame(),
            Err(OverlayError::AssetNotFound(_))
        ));
    }

    #[test]
    fn test_sequence_sorted_and_filtered() {
        let dir = temp_dir("seq");
        for (name, level) in [("frame_002.png", 2u8), ("frame_000.png", 0), ("frame_001.bmp", 1)] {
            RgbImage::from_pixel(2, 2, Rgb([level; 3]))
                .save(dir.join(name))
                .unwrap();
        }
        std::fs::write(dir.join("notes.txt"), "skip me").unwrap();

        let mut source = ImageSequence::open(&dir).unwrap();
        assert_eq!(source.remaining(), 3);

        let mut levels = Vec::new();
        while let Some(frame) = source.next_frame().unwrap() {
            levels.push(frame.get_pixel(0, 0).0[0]);
        }
        assert_eq!(levels, vec![0, 1, 2]);
        assert_eq!(
            source.current_path().and_then(Path::file_name),
            Some(std::ffi::OsStr::new("frame_002.png"))
        );
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_sequence_missing_dir() {
        assert!(ImageSequence::open("/definitely/not/a/dir").is_err());
    }
}
