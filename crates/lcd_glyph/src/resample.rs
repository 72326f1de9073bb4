//! Area-weighted resampling to an exact character grid.
//!
//! Every output pixel is the average of the source area it covers, with
//! partially covered source pixels weighted by the covered fraction. The
//! filter is separable, so the image is scaled horizontally first and then
//! vertically. Downscaling averages whole blocks of the source; upscaling
//! degrades to pixel replication with blended seams.

use crate::buffer::{PixelBuffer, Rgb};
use crate::grid::GridSize;
use crate::{GlyphError, Result};

/// Source pixels feeding one output pixel along one axis.
struct Span {
    start: usize,
    weights: Vec<f32>,
}

/// Scale `image` to exactly `target.width` x `target.height` pixels.
///
/// A degenerate target (zero width or height) returns the image unscaled.
/// An empty source image fails with [`GlyphError::MalformedImage`].
pub fn resample(image: PixelBuffer, target: GridSize) -> Result<PixelBuffer> {
    if image.is_empty() {
        return Err(GlyphError::MalformedImage {
            width: image.width(),
            height: image.height(),
        });
    }
    if target.is_degenerate() {
        tracing::debug!(%target, "degenerate target grid, keeping source size");
        return Ok(image);
    }
    if image.dimensions() == (target.width, target.height) {
        return Ok(image);
    }

    let (src_w, src_h) = image.dimensions();
    let columns = spans(src_w, target.width);
    let rows = spans(src_h, target.height);

    // Horizontal pass: src_h rows of target.width accumulated colors.
    let mut horizontal = vec![[0f32; 3]; src_h * target.width];
    for (y, src_row) in image.rows().enumerate() {
        let out_row = &mut horizontal[y * target.width..(y + 1) * target.width];
        for (out, span) in out_row.iter_mut().zip(&columns) {
            let mut acc = [0f32; 3];
            for (offset, &w) in span.weights.iter().enumerate() {
                let p = src_row[span.start + offset];
                acc[0] += p.r as f32 * w;
                acc[1] += p.g as f32 * w;
                acc[2] += p.b as f32 * w;
            }
            *out = acc;
        }
    }

    // Vertical pass straight into the output grid.
    let mut pixels = Vec::with_capacity(target.cells());
    for span in &rows {
        for x in 0..target.width {
            let mut acc = [0f32; 3];
            for (offset, &w) in span.weights.iter().enumerate() {
                let c = horizontal[(span.start + offset) * target.width + x];
                acc[0] += c[0] * w;
                acc[1] += c[1] * w;
                acc[2] += c[2] * w;
            }
            pixels.push(Rgb::new(to_channel(acc[0]), to_channel(acc[1]), to_channel(acc[2])));
        }
    }

    tracing::debug!(
        from_width = src_w,
        from_height = src_h,
        %target,
        "resampled image"
    );
    PixelBuffer::new(target.width, target.height, pixels)
}

/// Coverage of each of the `dst` output pixels over `src` input pixels,
/// normalized so each span's weights sum to one.
fn spans(src: usize, dst: usize) -> Vec<Span> {
    let scale = src as f64 / dst as f64;
    (0..dst)
        .map(|i| {
            let begin = i as f64 * scale;
            let end = (i + 1) as f64 * scale;
            let first = (begin.floor() as usize).min(src - 1);
            let last = (end.ceil() as usize).clamp(first + 1, src);

            let mut weights: Vec<f32> = (first..last)
                .map(|j| {
                    let covered = end.min((j + 1) as f64) - begin.max(j as f64);
                    covered.max(0.0) as f32
                })
                .collect();
            let total: f32 = weights.iter().sum();
            if total > 0.0 {
                weights.iter_mut().for_each(|w| *w /= total);
            } else {
                // Float edge case at the far border: take the last pixel.
                weights.iter_mut().for_each(|w| *w = 0.0);
                if let Some(w) = weights.last_mut() {
                    *w = 1.0;
                }
            }
            Span {
                start: first,
                weights,
            }
        })
        .collect()
}

#[inline]
fn to_channel(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, 255.0) as u8
}
