//! Animated stickers pinned to face anchor points
//!
//! One sprite sheet animates in lockstep on every selected anchor of every
//! detected face. Sticker size follows face size:
//! `scale = sticker_scale * max(face_w, face_h) / reference_size`.

use std::path::Path;

use image::RgbImage;
use tracing::{debug, info, warn};

use super::compositor;
use super::pipeline::FrameEffect;
use crate::asset;
use crate::clock::{Clock, MonotonicClock};
use crate::error::Result;
use crate::face::{derive_anchor_points, FaceLandmark, FaceRegion};
use crate::sprite::{FrameSequencer, SpriteSheet};

/// Smallest and largest accepted sticker scale (fraction of face size)
pub const STICKER_SCALE_RANGE: (f32, f32) = (0.05, 0.5);

/// Default sticker size as a fraction of face size
pub const DEFAULT_STICKER_SCALE: f32 = 0.20;

/// Face size, in pixels, at which a sticker is drawn at its native size
/// (before applying the sticker scale)
pub const DEFAULT_REFERENCE_SIZE: u32 = 64;

/// Settings of the animated sticker overlay
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedStickerSettings {
    /// Anchors that receive a sticker
    pub points: Vec<FaceLandmark>,
    /// Sticker size as a fraction of the face size
    pub sticker_scale: f32,
    /// Reference frame size the scale is expressed against
    pub reference_size: u32,
}

impl Default for AnimatedStickerSettings {
    fn default() -> Self {
        Self {
            points: FaceLandmark::default_sticker_points(),
            sticker_scale: DEFAULT_STICKER_SCALE,
            reference_size: DEFAULT_REFERENCE_SIZE,
        }
    }
}

/// Multi-point animated sticker overlay
///
/// Disabled until a sprite sheet is loaded. Owns its animation state
/// exclusively.
#[derive(Debug)]
pub struct AnimatedStickerOverlay<C: Clock + Clone = MonotonicClock> {
    sequencer: Option<FrameSequencer<C>>,
    settings: AnimatedStickerSettings,
    enabled: bool,
    clock: C,
}

impl AnimatedStickerOverlay<MonotonicClock> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(MonotonicClock)
    }
}

impl Default for AnimatedStickerOverlay<MonotonicClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock + Clone> AnimatedStickerOverlay<C> {
    /// Create a disabled overlay whose animation reads `clock`
    #[must_use]
    pub fn with_clock(clock: C) -> Self {
        Self {
            sequencer: None,
            settings: AnimatedStickerSettings::default(),
            enabled: false,
            clock,
        }
    }

    /// Replace all settings; the scale is clamped to [`STICKER_SCALE_RANGE`]
    #[must_use]
    pub fn with_settings(mut self, settings: AnimatedStickerSettings) -> Self {
        self.settings = settings;
        self.set_sticker_scale(self.settings.sticker_scale);
        self.settings.reference_size = self.settings.reference_size.max(1);
        self
    }

    /// Load and slice a sprite sheet, enabling the overlay on success
    ///
    /// On failure the overlay is left disabled with no sheet.
    pub fn load_spritesheet(
        &mut self,
        path: impl AsRef<Path>,
        frame_width: u32,
        frame_height: u32,
        fps: u32,
        looping: bool,
    ) -> Result<()> {
        let path = path.as_ref();
        let result = asset::load_sprite(path)
            .and_then(|sheet| SpriteSheet::slice(&sheet, frame_width, frame_height))
            .and_then(|sheet| self.set_sheet(sheet, fps, looping));

        match &result {
            Ok(()) => info!(
                "Sprite sheet loaded: {} ({} frames @ {fps}fps)",
                path.display(),
                self.frame_count()
            ),
            Err(e) => {
                warn!("Animated stickers disabled: {e}");
                self.sequencer = None;
                self.enabled = false;
            }
        }
        result
    }

    /// Install an already sliced sheet and enable the overlay
    pub fn set_sheet(&mut self, sheet: SpriteSheet, fps: u32, looping: bool) -> Result<()> {
        let sequencer = FrameSequencer::with_clock(sheet, fps, looping, self.clock.clone())?;
        self.sequencer = Some(sequencer);
        self.enabled = true;
        Ok(())
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Flip the enabled flag; stays off while no sheet is loaded
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled && self.sequencer.is_some();
        info!(
            "Animated stickers {}",
            if self.enabled { "enabled" } else { "disabled" }
        );
        self.enabled
    }

    /// Set the sticker scale, clamped to [`STICKER_SCALE_RANGE`]
    pub fn set_sticker_scale(&mut self, scale: f32) {
        let (min, max) = STICKER_SCALE_RANGE;
        self.settings.sticker_scale = if scale.is_nan() {
            DEFAULT_STICKER_SCALE
        } else {
            scale.clamp(min, max)
        };
    }

    #[must_use]
    pub fn sticker_scale(&self) -> f32 {
        self.settings.sticker_scale
    }

    /// Change animation speed; a no-op without a loaded sheet
    pub fn set_fps(&mut self, fps: u32) -> Result<()> {
        match self.sequencer.as_mut() {
            Some(sequencer) => sequencer.set_fps(fps),
            None => Ok(()),
        }
    }

    #[must_use]
    pub fn fps(&self) -> Option<u32> {
        self.sequencer.as_ref().map(FrameSequencer::fps)
    }

    pub fn set_points(&mut self, points: Vec<FaceLandmark>) {
        self.settings.points = points;
    }

    #[must_use]
    pub fn settings(&self) -> &AnimatedStickerSettings {
        &self.settings
    }

    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.sequencer.as_ref().map_or(0, FrameSequencer::frame_count)
    }

    #[must_use]
    pub fn sequencer(&self) -> Option<&FrameSequencer<C>> {
        self.sequencer.as_ref()
    }

    /// Restart the animation from its first frame
    pub fn reset(&mut self) {
        if let Some(sequencer) = self.sequencer.as_mut() {
            sequencer.reset();
        }
    }

    /// Scale applied to the current frame for a face of `region`'s size
    #[must_use]
    pub fn scale_for(&self, region: &FaceRegion) -> f32 {
        self.settings.sticker_scale * region.size() as f32 / self.settings.reference_size as f32
    }

    /// Draw the current animation frame on every selected anchor of every face
    pub fn draw(&mut self, frame: &mut RgbImage, faces: &[FaceRegion]) {
        if !self.enabled || faces.is_empty() {
            return;
        }

        for face in faces {
            let scale = self.scale_for(face);
            let Some(sequencer) = self.sequencer.as_mut() else {
                return;
            };
            let Some(sticker) = sequencer.current_frame().scaled(scale) else {
                debug!(%face, scale, "sticker scaled to nothing");
                continue;
            };

            for point in derive_anchor_points(face) {
                if self.settings.points.contains(&point.label) {
                    compositor::blend(frame, &sticker, point.position(), 1.0);
                }
            }
        }
    }
}

impl<C: Clock + Clone> FrameEffect for AnimatedStickerOverlay<C> {
    fn name(&self) -> &'static str {
        "animated-stickers"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn apply(&mut self, frame: &mut RgbImage, faces: &[FaceRegion]) {
        self.draw(frame, faces);
    }
}
