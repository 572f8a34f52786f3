//! Sprite pixel buffers
//!
//! A sprite is an RGB or RGBA image. RGB sprites have no stored alpha; the
//! compositor treats their pure-black pixels as transparent while blending
//! (see [`Sprite::pixel`]). Load-time promotion ([`Sprite::with_opaque_alpha`])
//! instead stores a fully opaque alpha plane permanently.

pub mod resize;
pub mod sheet;

use image::{imageops, DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};

pub use resize::{resize_area, resize_area_region};
pub use sheet::{FrameSequencer, SpriteSheet};

/// Color key treated as transparent in sprites without an alpha plane
pub const CHROMA_KEY: Rgb<u8> = Rgb([0, 0, 0]);

/// Owned sprite image with three or four channels
#[derive(Debug, Clone, PartialEq)]
pub enum Sprite {
    /// No alpha plane; black is transparent when blended
    Rgb(RgbImage),
    /// Explicit alpha plane
    Rgba(RgbaImage),
}

impl Sprite {
    #[must_use]
    pub fn width(&self) -> u32 {
        self.dimensions().0
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.dimensions().1
    }

    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::Rgb(img) => img.dimensions(),
            Self::Rgba(img) => img.dimensions(),
        }
    }

    /// Number of color channels (3 or 4)
    #[must_use]
    pub fn channels(&self) -> u8 {
        match self {
            Self::Rgb(_) => 3,
            Self::Rgba(_) => 4,
        }
    }

    #[must_use]
    pub fn has_alpha(&self) -> bool {
        matches!(self, Self::Rgba(_))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        let (w, h) = self.dimensions();
        w == 0 || h == 0
    }

    /// Color and resolved alpha of the pixel at `(x, y)`
    ///
    /// RGBA sprites report their stored alpha. RGB sprites report 0 for the
    /// chroma key (pure black) and 255 for everything else.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> ([u8; 3], u8) {
        match self {
            Self::Rgb(img) => {
                let px = *img.get_pixel(x, y);
                let alpha = if px == CHROMA_KEY { 0 } else { 255 };
                (px.0, alpha)
            }
            Self::Rgba(img) => {
                let [r, g, b, a] = img.get_pixel(x, y).0;
                ([r, g, b], a)
            }
        }
    }

    /// Copy out the `width`×`height` sub-image at `(x, y)`, clamped to bounds
    #[must_use]
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Self {
        match self {
            Self::Rgb(img) => Self::Rgb(imageops::crop_imm(img, x, y, width, height).to_image()),
            Self::Rgba(img) => Self::Rgba(imageops::crop_imm(img, x, y, width, height).to_image()),
        }
    }

    /// Resize to exactly `width`×`height` with area averaging
    #[must_use]
    pub fn resize(&self, width: u32, height: u32) -> Self {
        match self {
            Self::Rgb(img) => Self::Rgb(resize_area(img, width, height)),
            Self::Rgba(img) => Self::Rgba(resize_area(img, width, height)),
        }
    }

    /// The `(x, y, w, h)` window of this sprite resized to `width`×`height`
    #[must_use]
    pub fn resize_region(&self, width: u32, height: u32, region: (u32, u32, u32, u32)) -> Self {
        match self {
            Self::Rgb(img) => Self::Rgb(resize_area_region(img, width, height, region)),
            Self::Rgba(img) => Self::Rgba(resize_area_region(img, width, height, region)),
        }
    }

    /// Uniformly scale by `scale`, rounding each dimension to the nearest pixel
    ///
    /// Returns `None` when the result would be empty or `scale` is not a
    /// positive finite number.
    #[must_use]
    pub fn scaled(&self, scale: f32) -> Option<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return None;
        }
        let width = (self.width() as f32 * scale).round();
        let height = (self.height() as f32 * scale).round();
        if width < 1.0 || height < 1.0 || width > u32::MAX as f32 || height > u32::MAX as f32 {
            return None;
        }
        Some(self.resize(width as u32, height as u32))
    }

    /// Promote to RGBA with a fully opaque alpha plane
    ///
    /// RGBA sprites are returned unchanged. Unlike the blend-time chroma key,
    /// black pixels stay visible after promotion.
    #[must_use]
    pub fn with_opaque_alpha(self) -> Self {
        match self {
            Self::Rgb(img) => Self::Rgba(DynamicImage::ImageRgb8(img).into_rgba8()),
            rgba @ Self::Rgba(_) => rgba,
        }
    }

    /// Convert to an RGBA buffer, applying the chroma key to RGB sprites
    #[must_use]
    pub fn to_rgba(&self) -> RgbaImage {
        match self {
            Self::Rgb(img) => RgbaImage::from_fn(img.width(), img.height(), |x, y| {
                let ([r, g, b], a) = self.pixel(x, y);
                Rgba([r, g, b, a])
            }),
            Self::Rgba(img) => img.clone(),
        }
    }
}

impl From<RgbImage> for Sprite {
    fn from(img: RgbImage) -> Self {
        Self::Rgb(img)
    }
}

impl From<RgbaImage> for Sprite {
    fn from(img: RgbaImage) -> Self {
        Self::Rgba(img)
    }
}

impl From<DynamicImage> for Sprite {
    /// Keep alpha when the decoded image has it, otherwise drop to RGB
    fn from(img: DynamicImage) -> Self {
        if img.color().has_alpha() {
            Self::Rgba(img.into_rgba8())
        } else {
            Self::Rgb(img.into_rgb8())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, LumaA};

    #[test]
    fn test_rgb_chroma_key_alpha() {
        let mut img = RgbImage::from_pixel(2, 1, Rgb([255, 255, 255]));
        img.put_pixel(0, 0, Rgb([0, 0, 0]));
        let sprite = Sprite::from(img);

        assert_eq!(sprite.pixel(0, 0), ([0, 0, 0], 0));
        assert_eq!(sprite.pixel(1, 0), ([255, 255, 255], 255));
        assert_eq!(sprite.channels(), 3);
    }

    #[test]
    fn test_near_black_is_opaque() {
        let sprite = Sprite::from(RgbImage::from_pixel(1, 1, Rgb([0, 0, 1])));
        assert_eq!(sprite.pixel(0, 0).1, 255);
    }

    #[test]
    fn test_rgba_reports_stored_alpha() {
        let sprite = Sprite::from(RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 77])));
        assert_eq!(sprite.pixel(0, 0), ([0, 0, 0], 77));
        assert!(sprite.has_alpha());
    }

    #[test]
    fn test_opaque_promotion_keeps_black_visible() {
        let sprite = Sprite::from(RgbImage::from_pixel(3, 2, Rgb([0, 0, 0]))).with_opaque_alpha();
        assert_eq!(sprite.channels(), 4);
        assert_eq!(sprite.pixel(2, 1), ([0, 0, 0], 255));
    }

    #[test]
    fn test_to_rgba_applies_chroma_key() {
        let sprite = Sprite::from(RgbImage::from_pixel(1, 1, Rgb([0, 0, 0])));
        assert_eq!(sprite.to_rgba().get_pixel(0, 0), &Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_from_dynamic_image_tracks_alpha() {
        let gray = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(2, 2, Luma([9])));
        assert_eq!(Sprite::from(gray).channels(), 3);

        let gray_alpha =
            DynamicImage::ImageLumaA8(image::GrayAlphaImage::from_pixel(2, 2, LumaA([9, 10])));
        let sprite = Sprite::from(gray_alpha);
        assert_eq!(sprite.channels(), 4);
        assert_eq!(sprite.pixel(0, 0), ([9, 9, 9], 10));
    }

    #[test]
    fn test_scaled_rounds_dimensions() {
        let sprite = Sprite::from(RgbImage::new(64, 64));
        assert_eq!(sprite.scaled(0.5).unwrap().dimensions(), (32, 32));
        // 64 * 0.3 = 19.2 -> 19
        assert_eq!(sprite.scaled(0.3).unwrap().dimensions(), (19, 19));
        // 10 * 0.25 = 2.5 -> 3
        let small = Sprite::from(RgbImage::new(10, 10));
        assert_eq!(small.scaled(0.25).unwrap().dimensions(), (3, 3));
    }

    #[test]
    fn test_scaled_rejects_degenerate() {
        let sprite = Sprite::from(RgbImage::new(10, 10));
        assert!(sprite.scaled(0.01).is_none());
        assert!(sprite.scaled(0.0).is_none());
        assert!(sprite.scaled(-1.0).is_none());
        assert!(sprite.scaled(f32::NAN).is_none());
    }

    #[test]
    fn test_crop_clamps_to_bounds() {
        let sprite = Sprite::from(RgbaImage::new(10, 4));
        assert_eq!(sprite.crop(8, 0, 5, 5).dimensions(), (2, 4));
    }
}
