#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use lcd_glyph::{convert_to_grid, GridSize, PixelBuffer, TextBlock};

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    width: u8,
    height: u8,
    grid_width: u8,
    grid_height: u8,
    pixels: Vec<u8>,
}

fuzz_target!(|input: FuzzInput| {
    let width = input.width as usize;
    let height = input.height as usize;

    // Ensure we have enough pixels (RGB = 3 bytes per pixel)
    let expected_size = width * height * 3;
    if input.pixels.len() < expected_size {
        return;
    }
    let Ok(image) = PixelBuffer::from_rgb8(width, height, &input.pixels[..expected_size]) else {
        return;
    };

    let grid = GridSize::new(input.grid_width as usize, input.grid_height as usize);
    let Ok(conversion) = convert_to_grid(image, grid) else {
        // Only empty images may fail
        assert!(width == 0 || height == 0);
        return;
    };

    let expected = if grid.is_degenerate() {
        GridSize::new(width, height)
    } else {
        grid
    };
    assert_eq!(conversion.grid, expected);
    assert_eq!(conversion.text.lines().count(), expected.height);
    assert_eq!(TextBlock::parse(conversion.text.as_str()).ok().as_ref(), Some(&conversion.text));
});
