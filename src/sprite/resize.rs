//! Area-averaging resize
//!
//! Each destination pixel is the coverage-weighted mean of the source pixels
//! its footprint overlaps. Shrinking therefore averages instead of skipping
//! pixels, which keeps small stickers free of aliasing. When enlarging, a
//! footprint covers at most two source pixels and the result degrades to a
//! coverage-weighted blend of neighbours.
//!
//! [`resize_area_region`] renders only a window of the resized image, so a
//! huge target that is mostly off-screen never gets allocated in full.

use std::ops::Range;

use image::{ImageBuffer, Pixel};

/// Source pixel index and normalized weight contributing to one output column/row
type AxisWeights = Vec<(u32, f32)>;

fn axis_weights(src_len: u32, dst_len: u32, window: Range<u32>) -> Vec<AxisWeights> {
    let scale = f64::from(src_len) / f64::from(dst_len);
    let src_end = f64::from(src_len);

    window
        .map(|d| {
            let start = f64::from(d) * scale;
            let end = (start + scale).min(src_end);
            let first = start.floor() as u32;
            let last = (end.ceil() as u32).min(src_len);

            let mut weights: Vec<(u32, f64)> = (first..last)
                .filter_map(|s| {
                    let lo = start.max(f64::from(s));
                    let hi = end.min(f64::from(s + 1));
                    (hi > lo).then_some((s, hi - lo))
                })
                .collect();

            if weights.is_empty() {
                // Footprint collapsed by float error; fall back to nearest
                weights.push((first.min(src_len - 1), 1.0));
            }

            let total: f64 = weights.iter().map(|(_, w)| w).sum();
            weights
                .into_iter()
                .map(|(s, w)| (s, (w / total) as f32))
                .collect()
        })
        .collect()
}

/// Resize `src` to `width`×`height` with area averaging
///
/// Returns an empty image when either target dimension or the source is empty.
#[must_use]
pub fn resize_area<P>(src: &ImageBuffer<P, Vec<u8>>, width: u32, height: u32) -> ImageBuffer<P, Vec<u8>>
where
    P: Pixel<Subpixel = u8>,
{
    if (width, height) == src.dimensions() {
        return src.clone();
    }
    resize_area_region(src, width, height, (0, 0, width, height))
}

/// Render the `(x, y, w, h)` window of `src` resized to `width`×`height`
///
/// The result equals cropping [`resize_area`]'s output to the window. The
/// window is clamped to the target; an empty window gives an empty image.
#[must_use]
pub fn resize_area_region<P>(
    src: &ImageBuffer<P, Vec<u8>>,
    width: u32,
    height: u32,
    region: (u32, u32, u32, u32),
) -> ImageBuffer<P, Vec<u8>>
where
    P: Pixel<Subpixel = u8>,
{
    let (src_w, src_h) = src.dimensions();
    if width == 0 || height == 0 || src_w == 0 || src_h == 0 {
        return ImageBuffer::new(0, 0);
    }

    let x0 = region.0.min(width);
    let y0 = region.1.min(height);
    let x1 = x0 + region.2.min(width - x0);
    let y1 = y0 + region.3.min(height - y0);
    if x1 == x0 || y1 == y0 {
        return ImageBuffer::new(0, 0);
    }

    let channels = usize::from(P::CHANNEL_COUNT);
    let x_weights = axis_weights(src_w, width, x0..x1);
    let y_weights = axis_weights(src_h, height, y0..y1);

    let mut out = ImageBuffer::<P, Vec<u8>>::new(x1 - x0, y1 - y0);
    let mut acc = [0.0f32; 4];
    let mut bytes = [0u8; 4];

    for (dy, row_weights) in y_weights.iter().enumerate() {
        for (dx, col_weights) in x_weights.iter().enumerate() {
            acc[..channels].fill(0.0);

            for &(sy, wy) in row_weights {
                for &(sx, wx) in col_weights {
                    let w = wy * wx;
                    let px = src.get_pixel(sx, sy).channels();
                    for c in 0..channels {
                        acc[c] += f32::from(px[c]) * w;
                    }
                }
            }

            for c in 0..channels {
                bytes[c] = acc[c].round().clamp(0.0, 255.0) as u8;
            }
            out.put_pixel(dx as u32, dy as u32, *P::from_slice(&bytes[..channels]));
        }
    }

    out
}
