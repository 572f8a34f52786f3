use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tracing::debug;

use facefx::{asset, FrameSource, ImageSequence, ManualClock};

use crate::OverlayArgs;

pub fn cmd_sequence(dir: &Path, output: &Path, capture_fps: u32, overlays: &OverlayArgs) -> Result<()> {
    if capture_fps == 0 {
        bail!("--capture-fps must be greater than zero");
    }

    let session = super::session(overlays)?;
    // Animation time follows the capture rate, not processing speed
    let clock = ManualClock::new();
    let mut pipeline = session.build_pipeline(clock.clone());
    let step = Duration::from_secs_f64(1.0 / f64::from(capture_fps));

    let mut source = ImageSequence::open(dir)
        .with_context(|| format!("failed to open frame directory {}", dir.display()))?;
    std::fs::create_dir_all(output)
        .with_context(|| format!("failed to create {}", output.display()))?;

    eprintln!(
        "🎞️  Processing {} frames from {} @ {capture_fps}fps",
        source.remaining(),
        dir.display()
    );

    let mut written = 0usize;
    while let Some(frame) = source.next_frame()? {
        let Some(name) = source.current_path().and_then(Path::file_name) else {
            continue;
        };
        let target = output.join(name);
        let frame = pipeline.apply(frame);
        asset::save_frame(&frame, &target)?;
        debug!(frame = written, path = %target.display(), "frame written");

        clock.advance(step);
        written += 1;
    }

    eprintln!("✅ Wrote {written} frames to {}", output.display());
    Ok(())
}
