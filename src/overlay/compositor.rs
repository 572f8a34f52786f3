//! Alpha compositing of sprites onto frames
//!
//! All entry points mutate the background in place and never fail. Sprites
//! that land partly outside the frame are clipped; sprites that miss the
//! frame entirely, or collapse to zero size after scaling, leave it untouched.
//!
//! Alpha resolution:
//! - RGBA sprites use their alpha plane, normalized to `[0, 1]`
//! - RGB sprites are opaque except for pure black, which is fully transparent
//!
//! Per channel: `out = round(a * sprite + (1 - a) * background)`.

use std::borrow::Cow;

use image::RgbImage;

use crate::sprite::Sprite;

/// Matching sub-rectangles of a sprite and the frame it is drawn on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipRect {
    /// Top-left of the visible part, in sprite coordinates
    pub src_x: u32,
    pub src_y: u32,
    /// Top-left of the visible part, in frame coordinates
    pub dst_x: u32,
    pub dst_y: u32,
    pub width: u32,
    pub height: u32,
}

impl ClipRect {
    /// Intersect a `sprite_size` box placed at `top_left` with a frame of `frame_size`
    ///
    /// Returns `None` when the intersection is empty. Coordinates anywhere in
    /// the `i64` range are accepted.
    #[must_use]
    pub fn compute(frame_size: (u32, u32), sprite_size: (u32, u32), top_left: (i64, i64)) -> Option<Self> {
        let (frame_w, frame_h) = (i64::from(frame_size.0), i64::from(frame_size.1));
        let (sprite_w, sprite_h) = (i64::from(sprite_size.0), i64::from(sprite_size.1));
        let (x, y) = top_left;

        let dst_x0 = x.max(0);
        let dst_y0 = y.max(0);
        let dst_x1 = x.saturating_add(sprite_w).min(frame_w);
        let dst_y1 = y.saturating_add(sprite_h).min(frame_h);

        if dst_x1 <= dst_x0 || dst_y1 <= dst_y0 {
            return None;
        }

        Some(Self {
            src_x: (dst_x0 - x) as u32,
            src_y: (dst_y0 - y) as u32,
            dst_x: dst_x0 as u32,
            dst_y: dst_y0 as u32,
            width: (dst_x1 - dst_x0) as u32,
            height: (dst_y1 - dst_y0) as u32,
        })
    }
}

/// Top-left corner of a `size` box centered on `center`
#[must_use]
pub fn centered_top_left(center: (i64, i64), size: (u32, u32)) -> (i64, i64) {
    (
        center.0.saturating_sub(i64::from(size.0 / 2)),
        center.1.saturating_sub(i64::from(size.1 / 2)),
    )
}

/// Whether a `size` box at `top_left` lies entirely inside `frame`
#[must_use]
pub fn fits_within(frame: &RgbImage, size: (u32, u32), top_left: (i64, i64)) -> bool {
    let (x, y) = top_left;
    let right = x.checked_add(i64::from(size.0));
    let bottom = y.checked_add(i64::from(size.1));
    x >= 0
        && y >= 0
        && right.is_some_and(|r| r <= i64::from(frame.width()))
        && bottom.is_some_and(|b| b <= i64::from(frame.height()))
}

#[inline]
fn mix(sprite: u8, background: u8, alpha: f32) -> u8 {
    (alpha * f32::from(sprite) + (1.0 - alpha) * f32::from(background))
        .round()
        .clamp(0.0, 255.0) as u8
}

/// Composite `sprite` with its top-left corner at `top_left`, clipping to the frame
///
/// Returns `true` when any pixel of the frame was written.
pub fn composite_at(background: &mut RgbImage, sprite: &Sprite, top_left: (i64, i64)) -> bool {
    let Some(clip) = ClipRect::compute(background.dimensions(), sprite.dimensions(), top_left)
    else {
        return false;
    };

    for row in 0..clip.height {
        for col in 0..clip.width {
            let (color, alpha) = sprite.pixel(clip.src_x + col, clip.src_y + row);
            if alpha == 0 {
                continue;
            }
            let px = background.get_pixel_mut(clip.dst_x + col, clip.dst_y + row);
            if alpha == u8::MAX {
                px.0 = color;
                continue;
            }
            let a = f32::from(alpha) / 255.0;
            for (dst, &src) in px.0.iter_mut().zip(color.iter()) {
                *dst = mix(src, *dst, a);
            }
        }
    }

    true
}

/// Blend `sprite`, optionally scaled, centered on `anchor`
///
/// With `scale != 1.0` the sprite is resized to
/// `(round(w * scale), round(h * scale))` with area averaging first.
pub fn blend(background: &mut RgbImage, sprite: &Sprite, anchor: (i64, i64), scale: f32) -> bool {
    #[allow(clippy::float_cmp)]
    let sprite = if scale == 1.0 {
        Cow::Borrowed(sprite)
    } else {
        match sprite.scaled(scale) {
            Some(scaled) => Cow::Owned(scaled),
            None => return false,
        }
    };

    let top_left = centered_top_left(anchor, sprite.dimensions());
    composite_at(background, &sprite, top_left)
}

/// Blend `sprite` resized to fill a `width`×`height` box centered on `center`
///
/// The sprite is stretched to the box (no aspect preservation). Only the part
/// of the box inside the frame is resampled. An empty box is a no-op.
pub fn blend_in_rect(
    background: &mut RgbImage,
    sprite: &Sprite,
    center: (i64, i64),
    width: u32,
    height: u32,
) -> bool {
    if width == 0 || height == 0 || sprite.is_empty() {
        return false;
    }

    let top_left = centered_top_left(center, (width, height));
    let Some(clip) = ClipRect::compute(background.dimensions(), (width, height), top_left) else {
        return false;
    };

    let visible = sprite.resize_region(
        width,
        height,
        (clip.src_x, clip.src_y, clip.width, clip.height),
    );
    composite_at(
        background,
        &visible,
        (i64::from(clip.dst_x), i64::from(clip.dst_y)),
    )
}
