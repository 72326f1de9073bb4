//! # lcd_glyph
//!
//! Turns a raster image into a block of text that a monospaced LCD panel
//! displays as a picture. Every character cell shows one pixel: the pixel is
//! reduced to 3 bits per channel and mapped onto one of 512 private-use glyph
//! codes, each of which the panel font renders as a solid colored square.
//!
//! ## Quick Start
//!
//! ```ignore
//! use lcd_glyph::{convert, Orientation, PixelBuffer, SurfaceProfile};
//!
//! // 2x1 image: red, green (packed RGB, 3 bytes per pixel)
//! let image = PixelBuffer::from_rgb8(2, 1, &[255, 0, 0, 0, 255, 0])?;
//! let conversion = convert(image, SurfaceProfile::LargeLcdPanelWide, Orientation::NONE)?;
//! assert_eq!(conversion.text.width(), 356);
//! println!("font size {}", conversion.config.font_size);
//! ```
//!
//! ## Pipeline
//!
//! - [`grid`] resolves the character grid of a panel type and rotation.
//! - [`resample`] scales the image to exactly one pixel per cell.
//! - [`quantize`] reduces each pixel to a 9-bit color index.
//! - [`glyph`] maps the index to a character and assembles the text block.
//! - [`pipeline`] ties the stages together; [`host`] drives it from a UI.

use thiserror::Error;

pub mod buffer;
pub mod glyph;
pub mod grid;
pub mod host;
pub mod pipeline;
pub mod quantize;
pub mod resample;

pub use buffer::{PixelBuffer, Rgb};
pub use glyph::{assemble, decode, encode, GlyphCode, TextBlock, GLYPH_BASE, LINE_SEPARATOR};
pub use grid::{resolve_grid, GridSize, Orientation, SurfaceProfile};
pub use host::{
    run_import, ControlRegistry, ImageDecoder, ImportJob, ImportOutcome, Notification, Notifier,
    Selection, Selector, Surface,
};
pub use pipeline::{
    convert, convert_to_grid, min_font_size, ContentMode, Conversion, DisplayConfig, MONOSPACE_FONT,
};
pub use quantize::{quantize, QuantizedColor};
pub use resample::resample;

/// Errors that can occur while converting an image or handing it to a surface.
#[derive(Debug, Error)]
pub enum GlyphError {
    /// Source bytes could not be interpreted as an image
    #[error("decode error: {0}")]
    Decode(String),

    /// Decoded image has a zero width or height
    #[error("malformed image: {width}x{height}")]
    MalformedImage { width: usize, height: usize },

    /// Buffer size doesn't match expected size for dimensions
    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Text contains a character outside the glyph range
    #[error("unknown glyph {ch:?} at line {line}, column {column}")]
    UnknownGlyph { ch: char, line: usize, column: usize },

    /// Text lines are not all the same width
    #[error("line {line} has {actual} glyphs, expected {expected}")]
    RaggedText {
        line: usize,
        expected: usize,
        actual: usize,
    },

    /// The target surface refused the text block
    #[error("write-back failed: {0}")]
    WriteBack(#[from] WriteBackError),
}

/// Reasons a surface can refuse a finished text block.
#[derive(Debug, Error)]
pub enum WriteBackError {
    /// The surface was closed, marked for close or stopped working after the
    /// image was chosen.
    #[error("surface is no longer available")]
    SurfaceDetached,

    #[error("surface rejected text: {0}")]
    Rejected(String),
}

/// Semantic error kind reported to the user, one per failed conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    DecodeError,
    MalformedImage,
    WriteBackFailure,
}

impl ErrorKind {
    /// Short, stable name shown in notifications.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::DecodeError => "DecodeError",
            ErrorKind::MalformedImage => "MalformedImage",
            ErrorKind::WriteBackFailure => "WriteBackFailure",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl GlyphError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GlyphError::Decode(_)
            | GlyphError::UnknownGlyph { .. }
            | GlyphError::RaggedText { .. } => ErrorKind::DecodeError,
            GlyphError::MalformedImage { .. } | GlyphError::BufferSizeMismatch { .. } => {
                ErrorKind::MalformedImage
            }
            GlyphError::WriteBack(_) => ErrorKind::WriteBackFailure,
        }
    }
}

/// Result type for glyph conversion.
pub type Result<T> = core::result::Result<T, GlyphError>;
