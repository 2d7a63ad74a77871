use std::ops::Range;

/// Bytes per glyph; every glyph is 4 pixels wide and 5 rows tall.
pub const GLYPH_SIZE: usize = 5;

/// Where the font lives in interpreter memory.
pub const MEMORY_RANGE: Range<usize> = 0..FONT.len();

#[rustfmt::skip]
pub const FONT: &[u8; 16 * GLYPH_SIZE] = &[
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Memory offset of the glyph for the low nibble of `value`.
pub const fn glyph_offset(value: u8) -> u16 {
    (value & 0xF) as u16 * GLYPH_SIZE as u16
}
