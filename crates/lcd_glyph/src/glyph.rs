//! Glyph codes and text block assembly.
//!
//! Every quantized color owns one character in a 512-entry private-use range
//! starting at [`GLYPH_BASE`]. The panel font draws each of them as a cell
//! filled with the matching color, so the font asset and this base must stay
//! in sync.

use std::fmt;

use crate::buffer::PixelBuffer;
use crate::quantize::QuantizedColor;
use crate::{GlyphError, Result};

/// First code point of the glyph range.
pub const GLYPH_BASE: u32 = 0xE100;

/// Terminates every line of a text block, including the last one.
pub const LINE_SEPARATOR: char = '\n';

// The whole range must sit in the Private Use Area (U+E000..=U+F8FF).
const _: () = assert!(
    GLYPH_BASE >= 0xE000 && GLYPH_BASE + QuantizedColor::COUNT as u32 - 1 <= 0xF8FF
);

/// A character code standing for one quantized color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GlyphCode(u32);

impl GlyphCode {
    #[inline]
    pub const fn code_point(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn to_char(self) -> char {
        // The range is checked at compile time to be valid scalar values.
        char::from_u32(self.0).unwrap_or(char::REPLACEMENT_CHARACTER)
    }

    /// The glyph behind `ch`, if it lies in the glyph range.
    pub fn from_char(ch: char) -> Option<Self> {
        Self::from_code_point(ch as u32)
    }

    pub fn from_code_point(code: u32) -> Option<Self> {
        let offset = code.checked_sub(GLYPH_BASE)?;
        if offset as usize >= QuantizedColor::COUNT {
            return None;
        }
        Some(Self(code))
    }
}

impl fmt::Display for GlyphCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U+{:04X}", self.0)
    }
}

/// `GLYPH_BASE + (r << 6) + (g << 3) + b`.
#[inline]
pub const fn encode(color: QuantizedColor) -> GlyphCode {
    GlyphCode(GLYPH_BASE + color.index() as u32)
}

/// Inverse of [`encode`].
#[inline]
pub fn decode(glyph: GlyphCode) -> QuantizedColor {
    let index = (glyph.0 - GLYPH_BASE) as u16;
    QuantizedColor::from_index(index).unwrap_or_default()
}

/// Rows of glyphs ready to be written to a text surface.
///
/// Every line holds exactly `width` glyphs followed by [`LINE_SEPARATOR`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextBlock {
    width: usize,
    height: usize,
    text: String,
}

impl TextBlock {
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// Lines without their separator.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split_terminator(LINE_SEPARATOR)
    }

    /// Glyphs of one line, left to right.
    pub fn row(&self, y: usize) -> Option<impl Iterator<Item = GlyphCode> + '_> {
        self.lines()
            .nth(y)
            .map(|line| line.chars().filter_map(GlyphCode::from_char))
    }

    /// Rebuild a block from previously written text.
    ///
    /// Accepts `\n` or `\r\n` line endings; the final line may omit its
    /// separator.
    pub fn parse(text: &str) -> Result<Self> {
        let mut out = String::with_capacity(text.len());
        let mut width = None;
        let mut height = 0;
        for (line_no, line) in text.lines().enumerate() {
            let mut count = 0;
            for (column, ch) in line.chars().enumerate() {
                let glyph = GlyphCode::from_char(ch).ok_or(GlyphError::UnknownGlyph {
                    ch,
                    line: line_no,
                    column,
                })?;
                out.push(glyph.to_char());
                count += 1;
            }
            let expected = *width.get_or_insert(count);
            if count != expected {
                return Err(GlyphError::RaggedText {
                    line: line_no,
                    expected,
                    actual: count,
                });
            }
            out.push(LINE_SEPARATOR);
            height += 1;
        }
        Ok(Self {
            width: width.unwrap_or(0),
            height,
            text: out,
        })
    }

    /// Expand every glyph to its palette color, one pixel per cell.
    ///
    /// # Panics
    ///
    /// Never for blocks built by [`assemble`] or [`TextBlock::parse`], which
    /// both guarantee `height` lines of `width` glyphs.
    pub fn to_pixels(&self) -> PixelBuffer {
        let mut image = Vec::with_capacity(self.width * self.height);
        for line in self.lines() {
            image.extend(
                line.chars()
                    .filter_map(GlyphCode::from_char)
                    .map(|g| decode(g).to_rgb()),
            );
        }
        PixelBuffer::new(self.width, self.height, image)
            .expect("every line of a TextBlock holds exactly `width` glyphs")
    }
}

impl fmt::Display for TextBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for TextBlock {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Encode a row-major grid of quantized colors into a text block.
pub fn assemble(cells: &[QuantizedColor], width: usize, height: usize) -> Result<TextBlock> {
    let expected = width
        .checked_mul(height)
        .ok_or(GlyphError::MalformedImage { width, height })?;
    if cells.len() != expected {
        return Err(GlyphError::BufferSizeMismatch {
            expected,
            actual: cells.len(),
        });
    }

    // Each glyph is 3 bytes of UTF-8.
    let mut text = String::with_capacity(height * (width * 3 + 1));
    for y in 0..height {
        for &cell in &cells[y * width..(y + 1) * width] {
            text.push(encode(cell).to_char());
        }
        text.push(LINE_SEPARATOR);
    }

    Ok(TextBlock {
        width,
        height,
        text,
    })
}
