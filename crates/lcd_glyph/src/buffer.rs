//! Decoded pixel data handed into the pipeline.

use crate::{GlyphError, Result};

/// An 8-bit-per-channel RGB color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A row-major RGB image.
///
/// Zero-sized buffers can be constructed so that a decoder is free to report
/// whatever it found; [`crate::convert`] rejects them with
/// [`GlyphError::MalformedImage`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl PixelBuffer {
    /// Wrap already unpacked pixels. `pixels.len()` must equal `width * height`.
    pub fn new(width: usize, height: usize, pixels: Vec<Rgb>) -> Result<Self> {
        let expected = width
            .checked_mul(height)
            .ok_or(GlyphError::MalformedImage { width, height })?;
        if pixels.len() != expected {
            return Err(GlyphError::BufferSizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// A buffer filled with a single color.
    ///
    /// # Panics
    ///
    /// Panics if `width * height` overflows `usize`.
    pub fn filled(width: usize, height: usize, color: Rgb) -> Self {
        let len = width
            .checked_mul(height)
            .expect("PixelBuffer::filled: width * height overflows usize");
        Self {
            width,
            height,
            pixels: vec![color; len],
        }
    }

    /// Build from packed RGB data (3 bytes per pixel).
    pub fn from_rgb8(width: usize, height: usize, rgb: &[u8]) -> Result<Self> {
        Self::from_packed::<3>(width, height, rgb)
    }

    /// Build from packed RGBA data (4 bytes per pixel). Alpha is discarded,
    /// the stored color channels are kept as they are.
    pub fn from_rgba8(width: usize, height: usize, rgba: &[u8]) -> Result<Self> {
        Self::from_packed::<4>(width, height, rgba)
    }

    fn from_packed<const N: usize>(width: usize, height: usize, data: &[u8]) -> Result<Self> {
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(N))
            .ok_or(GlyphError::MalformedImage { width, height })?;
        if data.len() != expected {
            return Err(GlyphError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        let pixels = data
            .chunks_exact(N)
            .map(|c| Rgb::new(c[0], c[1], c[2]))
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Pixel at column `x`, row `y`, if inside the image.
    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    /// Iterate over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Rgb]> {
        // chunks_exact panics on a zero chunk size
        self.pixels.chunks_exact(self.width.max(1))
    }

    /// Packed RGB bytes, 3 per pixel.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 3);
        for p in &self.pixels {
            out.extend_from_slice(&[p.r, p.g, p.b]);
        }
        out
    }

    pub fn into_pixels(self) -> Vec<Rgb> {
        self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgb8() {
        let image = PixelBuffer::from_rgb8(2, 1, &[255, 0, 0, 0, 255, 0]).unwrap();
        assert_eq!(image.dimensions(), (2, 1));
        assert_eq!(image.get(0, 0), Some(Rgb::new(255, 0, 0)));
        assert_eq!(image.get(1, 0), Some(Rgb::new(0, 255, 0)));
        assert_eq!(image.get(2, 0), None);
    }

    #[test]
    fn test_from_rgba8_drops_alpha() {
        let image = PixelBuffer::from_rgba8(1, 1, &[10, 20, 30, 0]).unwrap();
        assert_eq!(image.pixels(), &[Rgb::new(10, 20, 30)]);
    }

    #[test]
    fn test_size_mismatch() {
        let result = PixelBuffer::from_rgb8(2, 2, &[0u8; 11]);
        assert!(matches!(
            result,
            Err(GlyphError::BufferSizeMismatch {
                expected: 12,
                actual: 11
            })
        ));
        assert!(PixelBuffer::new(3, 1, vec![Rgb::BLACK; 2]).is_err());
    }

    #[test]
    fn test_zero_sized_buffer_is_constructible() {
        let image = PixelBuffer::from_rgb8(0, 0, &[]).unwrap();
        assert!(image.is_empty());
        assert_eq!(image.rows().count(), 0);
    }

    #[test]
    fn test_filled() {
        let image = PixelBuffer::filled(3, 2, Rgb::WHITE);
        assert_eq!(image.dimensions(), (3, 2));
        assert!(image.pixels().iter().all(|&p| p == Rgb::WHITE));
        assert!(PixelBuffer::filled(0, usize::MAX, Rgb::BLACK).is_empty());
    }

    #[test]
    #[should_panic(expected = "width * height overflows")]
    fn test_filled_overflow_panics() {
        let _ = PixelBuffer::filled(usize::MAX, 2, Rgb::BLACK);
    }

    #[test]
    fn test_rows() {
        let pixels = vec![Rgb::BLACK, Rgb::WHITE, Rgb::WHITE, Rgb::BLACK];
        let image = PixelBuffer::new(2, 2, pixels).unwrap();
        let rows: Vec<_> = image.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], &[Rgb::WHITE, Rgb::BLACK]);
        assert_eq!(image.to_rgb8().len(), 12);
    }
}
