//! Session configuration loaded from `~/.config/facefx/session.toml`.
//!
//! Every section is optional:
//!
//! ```toml
//! [animated]
//! sprite_sheet = "sparkles.png"
//! frame_width = 64
//! frame_height = 64
//! fps = 12
//! loop = true
//! sticker_scale = 0.2
//! points = ["left-eye", "right-eye", "nose"]
//!
//! [mask]
//! image = "dog.png"
//!
//! [[stickers]]
//! name = "star"
//! path = "star.png"
//!
//! [[placements]]
//! name = "star"
//! x = 10
//! y = 20
//!
//! [[faces]]
//! x = 120
//! y = 80
//! width = 200
//! height = 240
//! ```
//!
//! Relative asset paths are resolved against the directory holding the
//! config file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::clock::Clock;
use crate::face::{CenteredFaceDetector, FaceLandmark, FaceRegion, StaticFaceDetector};
use crate::overlay::animated::{
    AnimatedStickerOverlay, AnimatedStickerSettings, DEFAULT_REFERENCE_SIZE, DEFAULT_STICKER_SCALE,
};
use crate::overlay::{FullFaceOverlay, OverlayPipeline, StickerBoard};

/// Default animation speed
pub const DEFAULT_FPS: u32 = 12;
/// Default sprite-sheet frame edge, in pixels
pub const DEFAULT_FRAME_SIZE: u32 = 64;

/// `[animated]` section
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AnimatedConfig {
    pub sprite_sheet: Option<PathBuf>,
    pub frame_width: u32,
    pub frame_height: u32,
    pub fps: u32,
    #[serde(rename = "loop")]
    pub looping: bool,
    pub sticker_scale: f32,
    pub reference_size: u32,
    pub points: Vec<FaceLandmark>,
}

impl Default for AnimatedConfig {
    fn default() -> Self {
        Self {
            sprite_sheet: None,
            frame_width: DEFAULT_FRAME_SIZE,
            frame_height: DEFAULT_FRAME_SIZE,
            fps: DEFAULT_FPS,
            looping: true,
            sticker_scale: DEFAULT_STICKER_SCALE,
            reference_size: DEFAULT_REFERENCE_SIZE,
            points: FaceLandmark::default_sticker_points(),
        }
    }
}

/// `[mask]` section
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(default, deny_unknown_fields)]
pub struct MaskConfig {
    pub image: Option<PathBuf>,
}

/// One `[[stickers]]` library entry
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StickerConfig {
    pub name: String,
    pub path: PathBuf,
}

/// One `[[placements]]` entry; `(x, y)` is the sticker's top-left corner
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PlacementConfig {
    pub name: String,
    pub x: i64,
    pub y: i64,
}

/// Top-level session file
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub animated: AnimatedConfig,
    pub mask: MaskConfig,
    pub stickers: Vec<StickerConfig>,
    pub placements: Vec<PlacementConfig>,
    /// Fixed face regions; when empty the fallback detector is used
    pub faces: Vec<FaceRegion>,
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl SessionConfig {
    /// Parse a session from TOML text; relative paths stay as written
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("invalid session TOML")
    }

    /// Load an explicit file, or the default location, or fall back to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the chosen file cannot be read or parsed. An
    /// explicit path that does not exist is an error; a missing default
    /// file is not.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = default_path();
                if !path.exists() {
                    debug!("No session file at {}, using defaults", path.display());
                    return Ok(Self::default());
                }
                path
            }
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let mut config: Self =
            toml::from_str(&content).with_context(|| format!("invalid TOML in {}", path.display()))?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        debug!("Session loaded from {}", path.display());
        Ok(config)
    }

    /// Resolve an asset path against the config file's directory
    #[must_use]
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    #[must_use]
    pub fn animated_settings(&self) -> AnimatedStickerSettings {
        AnimatedStickerSettings {
            points: self.animated.points.clone(),
            sticker_scale: self.animated.sticker_scale,
            reference_size: self.animated.reference_size,
        }
    }

    /// Animated overlay with the configured sheet loaded
    ///
    /// A sheet that fails to load leaves the overlay disabled.
    pub fn build_animated<C: Clock + Clone>(&self, clock: C) -> AnimatedStickerOverlay<C> {
        let mut overlay =
            AnimatedStickerOverlay::with_clock(clock).with_settings(self.animated_settings());
        if let Some(sheet) = &self.animated.sprite_sheet {
            let a = &self.animated;
            overlay
                .load_spritesheet(
                    self.resolve(sheet),
                    a.frame_width,
                    a.frame_height,
                    a.fps,
                    a.looping,
                )
                .ok();
        }
        overlay
    }

    /// Full-face overlay with the configured image loaded
    pub fn build_mask(&self) -> FullFaceOverlay {
        let mut mask = FullFaceOverlay::new();
        if let Some(image) = &self.mask.image {
            mask.load(self.resolve(image)).ok();
        }
        mask
    }

    /// Sticker board with the library loaded and placements applied
    pub fn build_stickers(&self) -> StickerBoard {
        let mut board = StickerBoard::new();
        for sticker in &self.stickers {
            board
                .load(sticker.name.clone(), self.resolve(&sticker.path))
                .ok();
        }
        for placement in &self.placements {
            if !board.place(&placement.name, placement.x, placement.y) {
                warn!("Placement of '{}' dropped", placement.name);
            }
        }
        board
    }

    /// Pipeline drawing, bottom to top: face mask, animated stickers, static stickers
    ///
    /// Configured `faces` are used as-is; without them every frame gets the
    /// centered fallback region.
    pub fn build_pipeline<C: Clock + Clone + 'static>(&self, clock: C) -> OverlayPipeline {
        let pipeline = if self.faces.is_empty() {
            OverlayPipeline::new(CenteredFaceDetector)
        } else {
            OverlayPipeline::new(StaticFaceDetector::new(self.faces.clone()))
        };
        pipeline
            .with_effect(self.build_mask())
            .with_effect(self.build_animated(clock))
            .with_effect(self.build_stickers())
    }
}

/// Return the path to the default session file.
#[must_use]
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("facefx")
        .join("session.toml")
}
