//! Face geometry: detected regions and the anchor points derived from them
//!
//! Anchor points are a purely geometric approximation: fixed fractional
//! offsets inside the detected bounding box. No landmark model is involved.

pub mod detector;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use detector::{CenteredFaceDetector, FaceDetector, StaticFaceDetector};

/// Rectangular face region in pixel coordinates
///
/// Width and height are always positive; use [`FaceRegion::new`] to build one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRegion", into = "RawRegion")]
pub struct FaceRegion {
    x: i32,
    y: i32,
    width: u32,
    height: u32,
}

#[derive(Serialize, Deserialize)]
struct RawRegion {
    x: i32,
    y: i32,
    width: u32,
    height: u32,
}

impl TryFrom<RawRegion> for FaceRegion {
    type Error = String;

    fn try_from(raw: RawRegion) -> Result<Self, Self::Error> {
        Self::new(raw.x, raw.y, raw.width, raw.height)
            .ok_or_else(|| format!("face region {}x{} must be non-empty", raw.width, raw.height))
    }
}

impl From<FaceRegion> for RawRegion {
    fn from(region: FaceRegion) -> Self {
        Self {
            x: region.x,
            y: region.y,
            width: region.width,
            height: region.height,
        }
    }
}

impl FaceRegion {
    /// Create a region, or `None` when it would be empty
    #[must_use]
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Option<Self> {
        (width > 0 && height > 0).then_some(Self {
            x,
            y,
            width,
            height,
        })
    }

    #[must_use]
    pub fn x(&self) -> i32 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> i32 {
        self.y
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Larger of width and height, used to scale stickers with the face
    #[must_use]
    pub fn size(&self) -> u32 {
        self.width.max(self.height)
    }
}

impl fmt::Display for FaceRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{} {}x{}", self.x, self.y, self.width, self.height)
    }
}

impl FromStr for FaceRegion {
    type Err = String;

    /// Parse `X,Y,W,H`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [x, y, w, h] = parts.as_slice() else {
            return Err(format!("expected X,Y,W,H but got '{s}'"));
        };

        let x = x.parse::<i32>().map_err(|e| format!("bad x '{x}': {e}"))?;
        let y = y.parse::<i32>().map_err(|e| format!("bad y '{y}': {e}"))?;
        let w = w.parse::<u32>().map_err(|e| format!("bad width '{w}': {e}"))?;
        let h = h.parse::<u32>().map_err(|e| format!("bad height '{h}': {e}"))?;

        Self::new(x, y, w, h).ok_or_else(|| format!("face region '{s}' must be non-empty"))
    }
}

/// Semantic tag of an anchor point on the face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FaceLandmark {
    Center,
    LeftEye,
    RightEye,
    Nose,
    Mouth,
    LeftCheek,
    RightCheek,
    Forehead,
    Chin,
    UpperLeftCorner,
    UpperRightCorner,
}

impl FaceLandmark {
    /// All landmarks, in the order [`derive_anchor_points`] emits them
    pub const ALL: [FaceLandmark; 11] = [
        Self::Center,
        Self::LeftEye,
        Self::RightEye,
        Self::Nose,
        Self::Mouth,
        Self::LeftCheek,
        Self::RightCheek,
        Self::Forehead,
        Self::Chin,
        Self::UpperLeftCorner,
        Self::UpperRightCorner,
    ];

    /// Kebab-case label, matching the config file spelling
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::LeftEye => "left-eye",
            Self::RightEye => "right-eye",
            Self::Nose => "nose",
            Self::Mouth => "mouth",
            Self::LeftCheek => "left-cheek",
            Self::RightCheek => "right-cheek",
            Self::Forehead => "forehead",
            Self::Chin => "chin",
            Self::UpperLeftCorner => "upper-left-corner",
            Self::UpperRightCorner => "upper-right-corner",
        }
    }

    /// Landmarks that receive an animated sticker unless configured otherwise
    #[must_use]
    pub fn default_sticker_points() -> Vec<FaceLandmark> {
        vec![
            Self::LeftEye,
            Self::RightEye,
            Self::Nose,
            Self::LeftCheek,
            Self::RightCheek,
            Self::Forehead,
            Self::UpperLeftCorner,
            Self::UpperRightCorner,
        ]
    }
}

impl fmt::Display for FaceLandmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Named pixel coordinate on a detected face
///
/// May lie outside the frame for regions near the border; clipping happens
/// downstream in the compositor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FacePoint {
    pub x: i64,
    pub y: i64,
    pub label: FaceLandmark,
}

impl FacePoint {
    #[must_use]
    pub fn new(x: i64, y: i64, label: FaceLandmark) -> Self {
        Self { x, y, label }
    }

    #[must_use]
    pub fn position(&self) -> (i64, i64) {
        (self.x, self.y)
    }
}

/// Derive the 11 anchor points of a face region
///
/// Fixed order and labels (see [`FaceLandmark::ALL`]); offsets are integer
/// fractions of the region's width and height.
#[must_use]
pub fn derive_anchor_points(region: &FaceRegion) -> [FacePoint; 11] {
    let x = i64::from(region.x);
    let y = i64::from(region.y);
    let w = i64::from(region.width);
    let h = i64::from(region.height);

    let eye_y = y + h / 3;

    [
        FacePoint::new(x + w / 2, y + h / 2, FaceLandmark::Center),
        FacePoint::new(x + w / 3, eye_y, FaceLandmark::LeftEye),
        FacePoint::new(x + 2 * w / 3, eye_y, FaceLandmark::RightEye),
        FacePoint::new(x + w / 2, y + 2 * h / 3, FaceLandmark::Nose),
        FacePoint::new(x + w / 2, y + 5 * h / 6, FaceLandmark::Mouth),
        FacePoint::new(x + w / 4, y + h / 2, FaceLandmark::LeftCheek),
        FacePoint::new(x + 3 * w / 4, y + h / 2, FaceLandmark::RightCheek),
        FacePoint::new(x + w / 2, y + h / 6, FaceLandmark::Forehead),
        FacePoint::new(x + w / 2, y + h, FaceLandmark::Chin),
        FacePoint::new(x + w / 8, eye_y, FaceLandmark::UpperLeftCorner),
        FacePoint::new(x + 7 * w / 8, eye_y, FaceLandmark::UpperRightCorner),
    ]
}
