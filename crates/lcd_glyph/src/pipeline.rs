//! End-to-end conversion from decoded image to text block.

use crate::buffer::PixelBuffer;
use crate::glyph::{assemble, TextBlock};
use crate::grid::{resolve_grid, GridSize, Orientation, SurfaceProfile};
use crate::quantize::{quantize, QuantizedColor};
use crate::resample::resample;
use crate::{GlyphError, Result};

/// Font every panel must use; glyph cells only line up in a monospaced font.
pub const MONOSPACE_FONT: &str = "Monospace";

/// Grid edge length that the reference font size fills exactly.
const REFERENCE_CELLS: f32 = 178.0;
const REFERENCE_FONT_SIZE: f32 = 0.1;
const MIN_FONT_SIZE: f32 = 0.01;
const MAX_FONT_SIZE: f32 = 10.0;

/// What the surface shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ContentMode {
    /// Text drawn over the surface's image layer. Required for glyph art.
    #[default]
    TextAndImage,
    TextOnly,
}

/// Surface settings to apply before writing a [`TextBlock`].
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayConfig {
    pub content_mode: ContentMode,
    pub font: &'static str,
    pub font_size: f32,
    pub text_padding: f32,
}

impl DisplayConfig {
    /// Settings that make a block of `grid` fill the surface.
    pub fn for_grid(grid: GridSize) -> Self {
        Self {
            content_mode: ContentMode::TextAndImage,
            font: MONOSPACE_FONT,
            font_size: min_font_size(grid),
            text_padding: 0.0,
        }
    }
}

/// Smallest font size that still fits `grid` on the surface. Smaller grids
/// get larger fonts.
pub fn min_font_size(grid: GridSize) -> f32 {
    let edge = grid.width.max(grid.height).max(1) as f32;
    (REFERENCE_FONT_SIZE * REFERENCE_CELLS / edge).clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
}

/// Result of one conversion: the text and how to display it.
#[derive(Clone, Debug, PartialEq)]
pub struct Conversion {
    pub grid: GridSize,
    pub text: TextBlock,
    pub config: DisplayConfig,
}

/// Convert `image` for a panel of type `profile` rotated by `orientation`.
pub fn convert(
    image: PixelBuffer,
    profile: SurfaceProfile,
    orientation: Orientation,
) -> Result<Conversion> {
    convert_to_grid(image, resolve_grid(profile, orientation))
}

/// Convert `image` to an explicit character grid.
///
/// A degenerate grid keeps the image's own size, one cell per source pixel.
pub fn convert_to_grid(image: PixelBuffer, grid: GridSize) -> Result<Conversion> {
    if image.is_empty() {
        return Err(GlyphError::MalformedImage {
            width: image.width(),
            height: image.height(),
        });
    }

    let resampled = resample(image, grid)?;
    let (width, height) = resampled.dimensions();
    let cells: Vec<QuantizedColor> = resampled.pixels().iter().map(|&p| quantize(p)).collect();
    let text = assemble(&cells, width, height)?;

    let grid = GridSize::new(width, height);
    tracing::debug!(%grid, "converted image to glyphs");
    Ok(Conversion {
        grid,
        text,
        config: DisplayConfig::for_grid(grid),
    })
}
