use anyhow::Result;

use facefx::{derive_anchor_points, FaceRegion};

pub fn cmd_anchors(face: &FaceRegion, json: bool) -> Result<()> {
    let points = derive_anchor_points(face);

    if json {
        println!("{}", serde_json::to_string_pretty(&points)?);
        return Ok(());
    }

    println!("Face {face}");
    for point in &points {
        println!("  {:<20} {:>6} {:>6}", point.label.label(), point.x, point.y);
    }
    Ok(())
}
