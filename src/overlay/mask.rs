//! Full-face static overlay
//!
//! Stretches one transparent image over each detected face. The box is a
//! little narrower and taller than the face and centered above the face's
//! middle, so "ears" in the artwork sit over the forehead.

use std::path::Path;

use image::{RgbImage, RgbaImage};
use tracing::{info, warn};

use super::compositor;
use super::pipeline::FrameEffect;
use crate::asset;
use crate::error::Result;
use crate::face::FaceRegion;
use crate::sprite::Sprite;

/// Overlay width in percent of face width
pub const WIDTH_PERCENT: u64 = 95;
/// Overlay height in percent of face height
pub const HEIGHT_PERCENT: u64 = 115;
/// Vertical position of the overlay center, in percent of face height
pub const CENTER_Y_PERCENT: u64 = 35;

/// `value * percent / 100`, truncated
fn percent_of(value: u32, percent: u64) -> u64 {
    u64::from(value) * percent / 100
}

/// Destination box for the overlay on one face: center and size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskPlacement {
    pub center: (i64, i64),
    pub width: u32,
    pub height: u32,
}

impl MaskPlacement {
    /// Box for `face`; every fractional size and offset is truncated
    #[must_use]
    pub fn for_face(face: &FaceRegion) -> Self {
        let center_x = i64::from(face.x()) + i64::from(face.width() / 2);
        let center_y = i64::from(face.y()) + percent_of(face.height(), CENTER_Y_PERCENT) as i64;

        Self {
            center: (center_x, center_y),
            width: percent_of(face.width(), WIDTH_PERCENT) as u32,
            height: u32::try_from(percent_of(face.height(), HEIGHT_PERCENT)).unwrap_or(u32::MAX),
        }
    }
}

/// Single full-face overlay
///
/// The overlay image must have an alpha channel; that is checked when it is
/// loaded, never while drawing.
#[derive(Debug, Default)]
pub struct FullFaceOverlay {
    overlay: Option<Sprite>,
    enabled: bool,
}

impl FullFaceOverlay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the overlay image; fails (and disables) without an alpha channel
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        match asset::load_overlay(path) {
            Ok(img) => {
                info!(
                    "Face overlay loaded: {} ({}x{})",
                    path.display(),
                    img.width(),
                    img.height()
                );
                self.set_overlay(img);
                Ok(())
            }
            Err(e) => {
                warn!("Face overlay disabled: {e}");
                self.overlay = None;
                self.enabled = false;
                Err(e)
            }
        }
    }

    /// Install an in-memory overlay and enable drawing
    pub fn set_overlay(&mut self, overlay: RgbaImage) {
        self.overlay = Some(Sprite::Rgba(overlay));
        self.enabled = true;
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Flip the enabled flag; stays off while no overlay is loaded
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled && self.overlay.is_some();
        info!(
            "Face overlay {}",
            if self.enabled { "enabled" } else { "disabled" }
        );
        self.enabled
    }

    /// Draw the overlay once per face
    pub fn draw(&self, frame: &mut RgbImage, faces: &[FaceRegion]) {
        if !self.enabled {
            return;
        }
        let Some(overlay) = self.overlay.as_ref() else {
            return;
        };

        for face in faces {
            let placement = MaskPlacement::for_face(face);
            compositor::blend_in_rect(
                frame,
                overlay,
                placement.center,
                placement.width,
                placement.height,
            );
        }
    }
}

impl FrameEffect for FullFaceOverlay {
    fn name(&self) -> &'static str {
        "face-overlay"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn apply(&mut self, frame: &mut RgbImage, faces: &[FaceRegion]) {
        self.draw(frame, faces);
    }
}
