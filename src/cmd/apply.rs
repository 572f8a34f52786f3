use std::path::Path;

use anyhow::{Context, Result};

use facefx::{asset, MonotonicClock};

use crate::OverlayArgs;

pub fn cmd_apply(input: &Path, output: &Path, overlays: &OverlayArgs) -> Result<()> {
    let session = super::session(overlays)?;
    let mut pipeline = session.build_pipeline(MonotonicClock);

    eprintln!("🖼️  Compositing: {}", input.display());
    let enabled: Vec<&str> = pipeline
        .effects()
        .iter()
        .filter(|e| e.is_enabled())
        .map(|e| e.name())
        .collect();
    eprintln!("   Overlays: {}", enabled.join(", "));

    let start = std::time::Instant::now();
    let frame = asset::load_frame(input)
        .with_context(|| format!("failed to read photo {}", input.display()))?;
    let frame = pipeline.apply(frame);
    asset::save_frame(&frame, output)?;

    eprintln!(
        "✅ Wrote {} ({}x{}) in {:.1}ms",
        output.display(),
        frame.width(),
        frame.height(),
        start.elapsed().as_secs_f64() * 1000.0
    );
    Ok(())
}
