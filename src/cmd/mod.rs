pub mod anchors;
pub mod apply;
pub mod sequence;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use facefx::config::{PlacementConfig, StickerConfig};
use facefx::SessionConfig;

use crate::OverlayArgs;

/// Command-line paths are relative to the working directory, not the session file
fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).with_context(|| format!("invalid path {}", path.display()))
}

/// Load the session file and apply command-line overrides on top
pub fn session(args: &OverlayArgs) -> Result<SessionConfig> {
    let mut config = SessionConfig::load(args.config.as_deref())?;

    if !args.faces.is_empty() {
        config.faces.clone_from(&args.faces);
    }

    let animated = &mut config.animated;
    if let Some(sheet) = &args.sprite_sheet {
        animated.sprite_sheet = Some(absolute(sheet)?);
    }
    if let Some(width) = args.frame_width {
        animated.frame_width = width;
    }
    if let Some(height) = args.frame_height {
        animated.frame_height = height;
    }
    if let Some(fps) = args.fps {
        animated.fps = fps;
    }
    if args.no_loop {
        animated.looping = false;
    }
    if let Some(scale) = args.sticker_scale {
        animated.sticker_scale = scale;
    }

    if let Some(mask) = &args.mask {
        config.mask.image = Some(absolute(mask)?);
    }

    for sticker in &args.stickers {
        config.stickers.push(StickerConfig {
            name: sticker.name.clone(),
            path: absolute(&sticker.path)?,
        });
        config.placements.push(PlacementConfig {
            name: sticker.name.clone(),
            x: sticker.x,
            y: sticker.y,
        });
    }

    Ok(config)
}
