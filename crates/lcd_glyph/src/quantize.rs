//! Fixed 512-color palette: 8 levels per channel.

use crate::buffer::Rgb;

/// An RGB color reduced to 3 bits per channel.
///
/// Packs into a 9-bit index `r << 6 | g << 3 | b`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuantizedColor {
    r: u8,
    g: u8,
    b: u8,
}

impl QuantizedColor {
    /// Number of distinct quantized colors.
    pub const COUNT: usize = 512;

    /// Build from 3-bit channel values. Returns `None` if any channel exceeds 7.
    pub const fn new(r: u8, g: u8, b: u8) -> Option<Self> {
        if r > 7 || g > 7 || b > 7 {
            return None;
        }
        Some(Self { r, g, b })
    }

    /// Unpack a 9-bit index. Returns `None` for indices of 512 and above.
    pub const fn from_index(index: u16) -> Option<Self> {
        if index as usize >= Self::COUNT {
            return None;
        }
        Some(Self {
            r: ((index >> 6) & 7) as u8,
            g: ((index >> 3) & 7) as u8,
            b: (index & 7) as u8,
        })
    }

    #[inline]
    pub const fn index(self) -> u16 {
        ((self.r as u16) << 6) | ((self.g as u16) << 3) | self.b as u16
    }

    #[inline]
    pub const fn channels(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Representative 8-bit color of this palette entry.
    ///
    /// The 3 bits are replicated into the low bits, so level 0 maps to 0 and
    /// level 7 maps to 255.
    pub const fn to_rgb(self) -> Rgb {
        Rgb::new(expand(self.r), expand(self.g), expand(self.b))
    }

    /// All 512 palette entries in index order.
    pub fn all() -> impl Iterator<Item = QuantizedColor> {
        (0..Self::COUNT as u16).filter_map(Self::from_index)
    }
}

#[inline]
const fn expand(v: u8) -> u8 {
    (v << 5) | (v << 2) | (v >> 1)
}

/// Keep the top 3 bits of every channel.
#[inline]
pub const fn quantize(pixel: Rgb) -> QuantizedColor {
    QuantizedColor {
        r: pixel.r >> 5,
        g: pixel.g >> 5,
        b: pixel.b >> 5,
    }
}
