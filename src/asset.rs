//! Sprite asset loading and frame output
//!
//! Three loaders with different alpha policies:
//! - [`load_sprite`] keeps whatever the file has; RGB sprites get the
//!   chroma-key treatment when blended
//! - [`load_overlay`] requires an alpha channel and fails without one
//! - [`load_sticker`] caps the size at [`STICKER_MAX_DIMENSION`] and
//!   permanently promotes RGB files to opaque RGBA

use std::path::Path;

use image::{RgbImage, RgbaImage};
use tracing::{debug, info};

use crate::error::{OverlayError, Result};
use crate::sprite::Sprite;

/// Stickers larger than this in either dimension are downscaled on load
pub const STICKER_MAX_DIMENSION: u32 = 150;

/// File extensions accepted for static stickers
pub const STICKER_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp"];

fn decode(path: &Path) -> Result<image::DynamicImage> {
    if !path.exists() {
        return Err(OverlayError::AssetNotFound(path.to_path_buf()));
    }
    image::open(path).map_err(|source| OverlayError::AssetDecode {
        path: path.to_path_buf(),
        source,
    })
}

/// Decode an image file into a sprite, keeping its alpha channel if present
pub fn load_sprite(path: impl AsRef<Path>) -> Result<Sprite> {
    let path = path.as_ref();
    let sprite = Sprite::from(decode(path)?);
    debug!(
        path = %path.display(),
        width = sprite.width(),
        height = sprite.height(),
        channels = sprite.channels(),
        "sprite decoded"
    );
    Ok(sprite)
}

/// Decode an overlay that must carry its own transparency
pub fn load_overlay(path: impl AsRef<Path>) -> Result<RgbaImage> {
    let path = path.as_ref();
    let img = decode(path)?;
    if !img.color().has_alpha() {
        return Err(OverlayError::MissingAlphaChannel(path.to_path_buf()));
    }
    Ok(img.into_rgba8())
}

/// Whether `path` has one of the [`STICKER_EXTENSIONS`] (case-insensitive)
#[must_use]
pub fn is_supported_sticker(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            STICKER_EXTENSIONS
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        })
}

/// Size a sticker is reduced to so it fits the cap, preserving aspect ratio
#[must_use]
pub fn capped_size(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let largest = width.max(height);
    if largest <= max_dimension {
        return (width, height);
    }
    let fit = |v: u32| {
        let scaled = u64::from(v) * u64::from(max_dimension) / u64::from(largest);
        (scaled as u32).max(1)
    };
    (fit(width), fit(height))
}

/// Prepare a decoded sticker: cap its size and promote it to RGBA
#[must_use]
pub fn prepare_sticker(sprite: Sprite) -> Sprite {
    let (width, height) = sprite.dimensions();
    let (new_width, new_height) = capped_size(width, height, STICKER_MAX_DIMENSION);
    let sprite = if (new_width, new_height) == (width, height) {
        sprite
    } else {
        info!("Resized sticker from {width}x{height} to {new_width}x{new_height}");
        sprite.resize(new_width, new_height)
    };
    sprite.with_opaque_alpha()
}

/// Load a static sticker image
pub fn load_sticker(path: impl AsRef<Path>) -> Result<Sprite> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(OverlayError::AssetNotFound(path.to_path_buf()));
    }
    if !is_supported_sticker(path) {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        return Err(OverlayError::UnsupportedFormat(format!(
            "'{ext}' (accepted: {})",
            STICKER_EXTENSIONS.join(", ")
        )));
    }

    let sprite = load_sprite(path)?;
    if !sprite.has_alpha() {
        debug!(path = %path.display(), "sticker has no alpha, adding opaque plane");
    }
    Ok(prepare_sticker(sprite))
}

/// Decode a frame (photo) as RGB
pub fn load_frame(path: impl AsRef<Path>) -> Result<RgbImage> {
    Ok(decode(path.as_ref())?.into_rgb8())
}

/// Write a composited frame; the format follows the file extension
pub fn save_frame(frame: &RgbImage, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    frame.save(path).map_err(|source| OverlayError::Encode {
        path: path.to_path_buf(),
        source,
    })
}
