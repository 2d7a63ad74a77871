use crate::error::{Fault, Target};
use log::trace;

pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

/// The 64x32 monochrome display. Each cell is 0 or 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    cells: [[u8; WIDTH]; HEIGHT],
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self {
            cells: [[0; WIDTH]; HEIGHT],
        }
    }
}

impl Framebuffer {
    pub fn clear(&mut self) {
        self.cells = [[0; WIDTH]; HEIGHT];
    }

    /// # Panics
    ///
    /// Panics if `(x, y)` is off screen.
    pub fn cell(&self, x: usize, y: usize) -> u8 {
        self.cells[y][x]
    }

    pub fn rows(&self) -> &[[u8; WIDTH]; HEIGHT] {
        &self.cells
    }

    /// XORs `sprite` onto the display with its top-left corner at `(x, y)`.
    ///
    /// Returns whether any lit cell was switched off. Every cell a set bit
    /// would touch must be on screen; otherwise nothing is drawn.
    pub fn draw(&mut self, x: usize, y: usize, sprite: &[u8]) -> Result<bool, Fault> {
        for (row, line) in sprite.iter().enumerate() {
            for column in 0..8 {
                if bits::set(7 - column as u8, *line)
                    && (x + column >= WIDTH || y + row >= HEIGHT)
                {
                    return Err(Fault::OutOfBoundsMemoryAccess {
                        target: Target::Cell {
                            x: x + column,
                            y: y + row,
                        },
                    });
                }
            }
        }

        let mut collision = false;
        for (row, line) in sprite.iter().enumerate() {
            for column in 0..8 {
                if !bits::set(7 - column as u8, *line) {
                    continue;
                }
                let cell = &mut self.cells[y + row][x + column];
                collision |= *cell == 1;
                *cell ^= 1;
                trace!("Toggled cell ({}, {}) [on: {}]", x + column, y + row, *cell == 1);
            }
        }
        Ok(collision)
    }
}

mod bits {
    pub const fn set(n: u8, bits: u8) -> bool {
        (bits & (1 << n)) != 0
    }
}
