//! `facefx` - Face-anchored overlay compositing
//!
//! # Features
//!
//! - **Anchor points**: 11 landmark positions derived from a face bounding box
//! - **Animated stickers**: sprite-sheet animation driven by elapsed time,
//!   scaled with the face and pinned to selected anchors
//! - **Face masks**: one transparent image stretched over each face
//! - **Static stickers**: a named sticker library placed at fixed positions
//! - **Compositing**: clipped alpha blending; RGB sprites use black as a color key
//!
//! # Example
//!
//! ```rust,no_run
//! use facefx::overlay::{AnimatedStickerOverlay, OverlayPipeline};
//! use facefx::{asset, CenteredFaceDetector};
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut stickers = AnimatedStickerOverlay::new();
//!     stickers.load_spritesheet("sparkles.png", 64, 64, 12, true)?;
//!
//!     let mut pipeline = OverlayPipeline::new(CenteredFaceDetector).with_effect(stickers);
//!     let frame = pipeline.apply(asset::load_frame("selfie.jpg")?);
//!     asset::save_frame(&frame, "selfie-fx.png")?;
//!     Ok(())
//! }
//! ```

pub mod asset;
pub mod clock;
pub mod config;
pub mod error;
pub mod face;
pub mod overlay;
pub mod source;
pub mod sprite;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::SessionConfig;
pub use error::{OverlayError, Result};
pub use face::{
    derive_anchor_points, CenteredFaceDetector, FaceDetector, FaceLandmark, FacePoint, FaceRegion,
    StaticFaceDetector,
};
pub use overlay::{
    blend, blend_in_rect, AnimatedStickerOverlay, FrameEffect, FullFaceOverlay, OverlayPipeline,
    StickerBoard,
};
pub use source::{FrameSource, ImageSequence, StillImage};
pub use sprite::{FrameSequencer, Sprite, SpriteSheet};

/// Version of facefx
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
