//! Static sticker board
//!
//! A named library of sticker images plus an ordered list of placements.
//! Placements are absolute frame positions (top-left corner) and do not
//! follow faces. A placement is drawn only when it fits entirely inside the
//! frame; partly visible placements are skipped, not clipped.

use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use image::RgbImage;
use tracing::{debug, info, warn};

use super::compositor;
use super::pipeline::FrameEffect;
use crate::asset;
use crate::error::Result;
use crate::face::FaceRegion;
use crate::sprite::Sprite;

/// One sticker instance on the board
#[derive(Debug, Clone)]
pub struct PlacedSticker {
    pub name: String,
    pub sprite: Rc<Sprite>,
    /// Top-left corner in frame coordinates
    pub x: i64,
    pub y: i64,
}

impl PlacedSticker {
    #[must_use]
    pub fn top_left(&self) -> (i64, i64) {
        (self.x, self.y)
    }
}

/// Sticker library and placements, drawn in insertion order
#[derive(Debug)]
pub struct StickerBoard {
    library: HashMap<String, Rc<Sprite>>,
    placements: Vec<PlacedSticker>,
    enabled: bool,
}

impl Default for StickerBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl StickerBoard {
    /// Create an empty, enabled board
    #[must_use]
    pub fn new() -> Self {
        Self {
            library: HashMap::new(),
            placements: Vec::new(),
            enabled: true,
        }
    }

    /// Load a sticker file into the library under `name`
    ///
    /// Replaces any sticker already registered under that name. Existing
    /// placements keep the image they were placed with.
    pub fn load(&mut self, name: impl Into<String>, path: impl AsRef<Path>) -> Result<()> {
        let name = name.into();
        let path = path.as_ref();
        let sprite = asset::load_sticker(path).inspect_err(|e| {
            warn!("Sticker '{name}' not loaded: {e}");
        })?;
        info!(
            "Sticker '{name}' loaded from {} ({}x{})",
            path.display(),
            sprite.width(),
            sprite.height()
        );
        self.library.insert(name, Rc::new(sprite));
        Ok(())
    }

    /// Register an in-memory sticker, applying the same size cap as [`load`](Self::load)
    pub fn insert(&mut self, name: impl Into<String>, sprite: Sprite) {
        self.library
            .insert(name.into(), Rc::new(asset::prepare_sticker(sprite)));
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.library.contains_key(name)
    }

    /// Names in the library, sorted
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.library.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Place library sticker `name` with its top-left corner at `(x, y)`
    ///
    /// Returns `false` (and places nothing) for an unknown name.
    pub fn place(&mut self, name: &str, x: i64, y: i64) -> bool {
        let Some(sprite) = self.library.get(name) else {
            warn!("Unknown sticker '{name}'; nothing placed");
            return false;
        };
        self.placements.push(PlacedSticker {
            name: name.to_string(),
            sprite: Rc::clone(sprite),
            x,
            y,
        });
        debug!(name, x, y, "sticker placed");
        true
    }

    /// Remove every placement; the library is kept
    pub fn clear(&mut self) {
        info!("Cleared {} sticker placements", self.placements.len());
        self.placements.clear();
    }

    #[must_use]
    pub fn placements(&self) -> &[PlacedSticker] {
        &self.placements
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        info!(
            "Static stickers {}",
            if self.enabled { "enabled" } else { "disabled" }
        );
        self.enabled
    }

    /// Draw every placement that fits the frame; returns how many were drawn
    pub fn apply_all(&self, frame: &mut RgbImage) -> usize {
        if !self.enabled {
            return 0;
        }

        let mut drawn = 0;
        for placed in &self.placements {
            if !compositor::fits_within(frame, placed.sprite.dimensions(), placed.top_left()) {
                debug!(
                    name = %placed.name,
                    x = placed.x,
                    y = placed.y,
                    "sticker outside frame, skipped"
                );
                continue;
            }
            compositor::composite_at(frame, &placed.sprite, placed.top_left());
            drawn += 1;
        }
        drawn
    }
}

impl FrameEffect for StickerBoard {
    fn name(&self) -> &'static str {
        "static-stickers"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn needs_faces(&self) -> bool {
        false
    }

    fn apply(&mut self, frame: &mut RgbImage, _faces: &[FaceRegion]) {
        self.apply_all(frame);
    }
}
