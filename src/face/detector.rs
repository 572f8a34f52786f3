//! Face region detection capability
//!
//! The compositing engine does not care how faces are found. Anything that
//! turns a frame into rectangles can sit behind [`FaceDetector`].

use image::RgbImage;

use super::FaceRegion;

/// Pluggable face detector
///
/// Implement this trait to integrate a trained model. The crate ships a
/// geometric fallback ([`CenteredFaceDetector`]) and a fixed-region detector
/// for callers that already know where the faces are.
pub trait FaceDetector {
    /// Detect zero or more face regions in `frame`
    fn detect(&mut self, frame: &RgbImage) -> Vec<FaceRegion>;
}

/// Fallback detector reporting one synthetic face in the middle of the frame
///
/// The region spans the central half of the frame in both directions.
#[derive(Debug, Clone, Copy, Default)]
pub struct CenteredFaceDetector;

impl FaceDetector for CenteredFaceDetector {
    fn detect(&mut self, frame: &RgbImage) -> Vec<FaceRegion> {
        let (w, h) = frame.dimensions();
        FaceRegion::new((w / 4) as i32, (h / 4) as i32, w / 2, h / 2)
            .into_iter()
            .collect()
    }
}

/// Detector that always reports the same regions
#[derive(Debug, Clone, Default)]
pub struct StaticFaceDetector {
    regions: Vec<FaceRegion>,
}

impl StaticFaceDetector {
    #[must_use]
    pub fn new(regions: Vec<FaceRegion>) -> Self {
        Self { regions }
    }

    #[must_use]
    pub fn regions(&self) -> &[FaceRegion] {
        &self.regions
    }
}

impl FaceDetector for StaticFaceDetector {
    fn detect(&mut self, _frame: &RgbImage) -> Vec<FaceRegion> {
        self.regions.clone()
    }
}

impl<F> FaceDetector for F
where
    F: FnMut(&RgbImage) -> Vec<FaceRegion>,
{
    fn detect(&mut self, frame: &RgbImage) -> Vec<FaceRegion> {
        self(frame)
    }
}
