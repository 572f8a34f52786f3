//! Sprite-sheet slicing and time-driven frame sequencing
//!
//! A sheet is a single row of equally sized frames read left to right. The
//! sequencer picks the frame to show from elapsed clock time, so the
//! animation runs at its own fps no matter how often it is polled.

use std::time::{Duration, Instant};

use tracing::debug;

use super::Sprite;
use crate::clock::{Clock, MonotonicClock};
use crate::error::{OverlayError, Result};

/// Frames sliced out of a sprite sheet
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    frames: Vec<Sprite>,
    frame_width: u32,
    frame_height: u32,
}

impl SpriteSheet {
    /// Slice `sheet` into `floor(sheet_width / frame_width)` frames
    ///
    /// Columns left over after the last whole frame are ignored. Frames are
    /// cut from row 0; a sheet shorter than `frame_height` yields shorter
    /// frames.
    pub fn slice(sheet: &Sprite, frame_width: u32, frame_height: u32) -> Result<Self> {
        if frame_width == 0 || frame_height == 0 {
            return Err(OverlayError::InvalidSpriteSheet(format!(
                "frame size {frame_width}x{frame_height} must be non-zero"
            )));
        }

        let (sheet_width, sheet_height) = sheet.dimensions();
        let count = sheet_width / frame_width;
        if count == 0 || sheet_height == 0 {
            return Err(OverlayError::InvalidSpriteSheet(format!(
                "{sheet_width}x{sheet_height} sheet holds no {frame_width}x{frame_height} frame"
            )));
        }

        let frames = (0..count)
            .map(|i| sheet.crop(i * frame_width, 0, frame_width, frame_height))
            .collect();

        Ok(Self {
            frames,
            frame_width,
            frame_height,
        })
    }

    /// Build a sheet from frames that were already separated
    pub fn from_frames(frames: Vec<Sprite>) -> Result<Self> {
        let Some(first) = frames.first() else {
            return Err(OverlayError::InvalidSpriteSheet("no frames".to_string()));
        };
        let (frame_width, frame_height) = first.dimensions();
        Ok(Self {
            frames,
            frame_width,
            frame_height,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[must_use]
    pub fn frame_size(&self) -> (u32, u32) {
        (self.frame_width, self.frame_height)
    }

    #[must_use]
    pub fn frames(&self) -> &[Sprite] {
        &self.frames
    }
}

fn frame_duration(fps: u32) -> Result<Duration> {
    if fps == 0 {
        return Err(OverlayError::InvalidFps(fps));
    }
    Ok(Duration::from_secs_f64(1.0 / f64::from(fps)))
}

/// Animation state over a sliced sprite sheet
///
/// Always playing once constructed; there is no pause state. Each call to
/// [`current_frame`](Self::current_frame) advances by at most one frame, even
/// if several frame durations have elapsed since the last advance.
#[derive(Debug)]
pub struct FrameSequencer<C: Clock = MonotonicClock> {
    sheet: SpriteSheet,
    fps: u32,
    frame_duration: Duration,
    looping: bool,
    current: usize,
    last_advance: Instant,
    clock: C,
}

impl FrameSequencer<MonotonicClock> {
    /// Create a sequencer driven by the wall clock
    pub fn new(sheet: SpriteSheet, fps: u32, looping: bool) -> Result<Self> {
        Self::with_clock(sheet, fps, looping, MonotonicClock)
    }
}

impl<C: Clock> FrameSequencer<C> {
    /// Create a sequencer driven by `clock`
    pub fn with_clock(sheet: SpriteSheet, fps: u32, looping: bool, clock: C) -> Result<Self> {
        if sheet.is_empty() {
            return Err(OverlayError::InvalidSpriteSheet("no frames".to_string()));
        }
        let frame_duration = frame_duration(fps)?;
        let last_advance = clock.now();

        Ok(Self {
            sheet,
            fps,
            frame_duration,
            looping,
            current: 0,
            last_advance,
            clock,
        })
    }

    /// Frame to display now, advancing one step if a frame duration elapsed
    pub fn current_frame(&mut self) -> &Sprite {
        let now = self.clock.now();
        if now.saturating_duration_since(self.last_advance) >= self.frame_duration {
            self.advance();
            self.last_advance = now;
        }
        &self.sheet.frames[self.current]
    }

    fn advance(&mut self) {
        let last = self.sheet.len() - 1;
        self.current = if self.current < last {
            self.current + 1
        } else if self.looping {
            0
        } else {
            last
        };
    }

    /// Rewind to the first frame and restart timing from now
    pub fn reset(&mut self) {
        self.current = 0;
        self.last_advance = self.clock.now();
    }

    /// Change playback speed; applies from the next `current_frame` call
    pub fn set_fps(&mut self, fps: u32) -> Result<()> {
        self.frame_duration = frame_duration(fps)?;
        self.fps = fps;
        debug!(fps, "animation speed changed");
        Ok(())
    }

    #[must_use]
    pub fn fps(&self) -> u32 {
        self.fps
    }

    #[must_use]
    pub fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.sheet.len()
    }

    #[must_use]
    pub fn is_looping(&self) -> bool {
        self.looping
    }

    #[must_use]
    pub fn sheet(&self) -> &SpriteSheet {
        &self.sheet
    }
}
