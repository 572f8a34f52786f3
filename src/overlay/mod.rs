//! Overlay effects and compositing
//!
//! - [`compositor`]: clipped alpha blending primitives
//! - [`animated`]: animated sprite-sheet stickers on face anchors
//! - [`mask`]: one static image stretched over each face
//! - [`stickers`]: static stickers at absolute frame positions
//! - [`pipeline`]: runs detection and the effects above in order

pub mod animated;
pub mod compositor;
pub mod mask;
pub mod pipeline;
pub mod stickers;

pub use animated::{AnimatedStickerOverlay, AnimatedStickerSettings};
pub use compositor::{blend, blend_in_rect, composite_at, ClipRect};
pub use mask::{FullFaceOverlay, MaskPlacement};
pub use pipeline::{FrameEffect, OverlayPipeline};
pub use stickers::{PlacedSticker, StickerBoard};
