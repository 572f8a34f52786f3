//! Per-frame overlay pipeline: detect -> draw effects in order
//!
//! The detector runs at most once per frame, and only when some enabled
//! effect draws relative to faces.

use image::RgbImage;
use tracing::{debug, trace};

use crate::face::{CenteredFaceDetector, FaceDetector, FaceRegion};

/// Something drawn onto every frame
pub trait FrameEffect {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    fn is_enabled(&self) -> bool;

    /// Whether the effect draws relative to detected faces
    fn needs_faces(&self) -> bool {
        true
    }

    /// Draw onto `frame`; `faces` is empty when no face was found
    fn apply(&mut self, frame: &mut RgbImage, faces: &[FaceRegion]);
}

/// Ordered effects sharing one face detector
pub struct OverlayPipeline {
    detector: Box<dyn FaceDetector>,
    effects: Vec<Box<dyn FrameEffect>>,
}

impl std::fmt::Debug for OverlayPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayPipeline")
            .field(
                "effects",
                &self.effects.iter().map(|e| e.name()).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

impl Default for OverlayPipeline {
    fn default() -> Self {
        Self::new(CenteredFaceDetector)
    }
}

impl OverlayPipeline {
    pub fn new(detector: impl FaceDetector + 'static) -> Self {
        Self {
            detector: Box::new(detector),
            effects: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: impl FrameEffect + 'static) -> Self {
        self.push(effect);
        self
    }

    /// Append an effect; later effects draw over earlier ones
    pub fn push(&mut self, effect: impl FrameEffect + 'static) {
        self.effects.push(Box::new(effect));
    }

    #[must_use]
    pub fn effects(&self) -> &[Box<dyn FrameEffect>] {
        &self.effects
    }

    pub fn effects_mut(&mut self) -> &mut [Box<dyn FrameEffect>] {
        &mut self.effects
    }

    /// Run all enabled effects on `frame` and return it
    pub fn apply(&mut self, mut frame: RgbImage) -> RgbImage {
        let wants_faces = self
            .effects
            .iter()
            .any(|e| e.is_enabled() && e.needs_faces());

        let faces = if wants_faces {
            self.detector.detect(&frame)
        } else {
            Vec::new()
        };
        debug!(faces = faces.len(), "frame analyzed");

        for effect in self.effects.iter_mut().filter(|e| e.is_enabled()) {
            trace!(effect = effect.name(), "applying");
            effect.apply(&mut frame, &faces);
        }
        frame
    }
}
