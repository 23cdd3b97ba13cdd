//! Movable objects: two players, two missiles and the ball.
//!
//! An object's graphics are latched per copy. A graphics register write
//! lands in the first copy the beam hasn't started drawing yet; copies that
//! weren't written this line show whatever the copy before them showed.

use crate::HBLANK_CLOCKS;
use crate::playfield::WIDTH;

/// Player pixel width per NUSIZ mode.
const PLAYER_SIZE: [u8; 8] = [1, 1, 1, 1, 1, 2, 1, 4];
/// Pixels between copies per NUSIZ mode.
const COPY_SPACING: [i16; 8] = [0, 16, 32, 16, 64, 0, 32, 0];
/// Copies drawn per NUSIZ mode.
const COPIES: [usize; 8] = [1, 2, 2, 3, 2, 1, 3, 1];

/// Upper bound on copies.
pub const MAX_COPIES: usize = 3;

/// Copy count and spacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub copies: usize,
    pub spacing: i16,
}

impl Layout {
    /// The ball always has a single copy.
    pub const SINGLE: Self = Self {
        copies: 1,
        spacing: 0,
    };

    #[must_use]
    pub const fn from_nusiz(nusiz: u8) -> Self {
        let mode = (nusiz & 0x07) as usize;
        Self {
            copies: COPIES[mode],
            spacing: COPY_SPACING[mode],
        }
    }
}

/// Player pixel width multiplier from NUSIZ.
#[must_use]
pub const fn player_size(nusiz: u8) -> u8 {
    PLAYER_SIZE[(nusiz & 0x07) as usize]
}

/// Missile width in pixels from NUSIZ bits 4-5.
#[must_use]
pub const fn missile_width(nusiz: u8) -> u8 {
    1 << ((nusiz >> 4) & 0x03)
}

/// Ball width in pixels from CTRLPF bits 4-5.
#[must_use]
pub const fn ball_width(ctrlpf: u8) -> u8 {
    1 << ((ctrlpf >> 4) & 0x03)
}

/// Decode a motion register's high nibble to -8..=7.
#[must_use]
pub const fn motion(register: u8) -> i16 {
    let nibble = (register >> 4) as i16;
    if nibble < 8 { nibble } else { nibble - 16 }
}

/// Horizontal position plus per-copy graphics latches.
#[derive(Debug, Clone, Default)]
pub struct Object {
    /// Pixel position, always in `0..WIDTH`.
    position: i16,
    /// Graphics register value when the line began.
    line_start: u8,
    /// Values written during this line, per copy.
    slots: [Option<u8>; MAX_COPIES],
}

/// Wrap a pixel coordinate into the visible width.
const fn wrap(x: i16) -> i16 {
    x.rem_euclid(WIDTH as i16)
}

impl Object {
    #[must_use]
    pub fn position(&self) -> i16 {
        self.position
    }

    /// Move to `position`, wrapped into the visible width.
    pub fn set_position(&mut self, position: i16) {
        self.position = wrap(position);
    }

    /// Start a new line with the current register value.
    pub fn start_line(&mut self, graphics: u8) {
        self.line_start = graphics;
        self.slots = [None; MAX_COPIES];
    }

    /// HMOVE: positive motion values move left.
    pub fn apply_motion(&mut self, register: u8) {
        self.set_position(self.position - motion(register));
    }

    /// Latch a graphics write made at `clock`.
    ///
    /// Returns the copy that took the value, or `None` if the beam has
    /// already started every copy on this line.
    pub fn latch(&mut self, value: u8, clock: u16, layout: Layout) -> Option<usize> {
        let clock = clock as i16;
        let copy = (0..layout.copies.min(MAX_COPIES))
            .find(|&k| clock < HBLANK_CLOCKS as i16 + self.position + k as i16 * layout.spacing)?;
        self.slots[copy] = Some(value);
        Some(copy)
    }

    /// Graphics value each copy shows this line.
    #[must_use]
    pub fn copy_values(&self) -> [u8; MAX_COPIES] {
        let mut values = [0; MAX_COPIES];
        let mut current = self.line_start;
        for (value, slot) in values.iter_mut().zip(self.slots) {
            if let Some(written) = slot {
                current = written;
            }
            *value = current;
        }
        values
    }

    /// Player mask: eight pixels per copy, each `size` wide.
    #[must_use]
    pub fn player_mask(&self, nusiz: u8, reflect: bool) -> [bool; WIDTH] {
        let layout = Layout::from_nusiz(nusiz);
        let size = usize::from(player_size(nusiz));
        let values = self.copy_values();

        let mut mask = [false; WIDTH];
        for (k, &value) in values.iter().enumerate().take(layout.copies) {
            let graphics = if reflect { value.reverse_bits() } else { value };
            let start = self.position + k as i16 * layout.spacing;
            for bit in 0..8 {
                if graphics & (0x80 >> bit) != 0 {
                    fill(&mut mask, start + (bit * size) as i16, size);
                }
            }
        }
        mask
    }

    /// Missile or ball mask: a solid run of `width` per enabled copy.
    ///
    /// The enable bit is bit 1 of the latched value.
    #[must_use]
    pub fn bar_mask(&self, layout: Layout, width: u8) -> [bool; WIDTH] {
        let values = self.copy_values();
        let mut mask = [false; WIDTH];
        for (k, value) in values.iter().enumerate().take(layout.copies) {
            if value & 0x02 != 0 {
                let start = self.position + k as i16 * layout.spacing;
                fill(&mut mask, start, usize::from(width));
            }
        }
        mask
    }
}

/// Set `len` pixels from `start`, wrapping at the right edge.
fn fill(mask: &mut [bool; WIDTH], start: i16, len: usize) {
    for i in 0..len {
        mask[wrap(start + i as i16) as usize] = true;
    }
}
