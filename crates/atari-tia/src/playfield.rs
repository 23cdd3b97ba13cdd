//! Playfield latches and expansion.
//!
//! Each of PF0/PF1/PF2 is latched twice per line: once for the left half and
//! once for the right. The beam reads a register's left-half bits at a fixed
//! clock, so a write is only visible in the halves the beam hasn't reached.

use crate::registers::{PF0, PF1, PF2, ctrlpf};

/// Visible width of a scanline in pixels.
pub const WIDTH: usize = 160;

const HALF: usize = WIDTH / 2;

/// Beyond this clock the mirror bit is no longer sampled for this line.
const REFLECT_DEADLINE: u16 = 148;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Halves {
    pub left: u8,
    pub right: u8,
}

/// Per-line playfield state.
#[derive(Debug, Clone, Default)]
pub struct Playfield {
    pub pf0: Halves,
    pub pf1: Halves,
    pub pf2: Halves,
    pub reflect: bool,
}

/// Clocks before which a write reaches both halves, and the right half only.
const fn thresholds(register: u16) -> (u16, u16) {
    match register {
        PF0 => (48, 148),
        PF1 => (84, 164),
        _ => (116, 196),
    }
}

impl Playfield {
    /// Latch a PF0/PF1/PF2 write made at `clock`.
    pub fn write(&mut self, register: u16, value: u8, clock: u16) {
        let halves = match register {
            PF0 => &mut self.pf0,
            PF1 => &mut self.pf1,
            PF2 => &mut self.pf2,
            _ => return,
        };
        let (both, right_only) = thresholds(register);
        if clock < both {
            halves.left = value;
            halves.right = value;
        } else if clock < right_only {
            halves.right = value;
        }
    }

    /// CTRLPF write; the mirror bit only counts before mid-line.
    pub fn write_control(&mut self, value: u8, clock: u16) {
        if clock < REFLECT_DEADLINE {
            self.reflect = value & ctrlpf::REFLECT != 0;
        }
    }

    /// Start a new line from the persistent register values.
    pub fn relatch(&mut self, pf0: u8, pf1: u8, pf2: u8, control: u8) {
        self.pf0 = Halves {
            left: pf0,
            right: pf0,
        };
        self.pf1 = Halves {
            left: pf1,
            right: pf1,
        };
        self.pf2 = Halves {
            left: pf2,
            right: pf2,
        };
        self.reflect = control & ctrlpf::REFLECT != 0;
    }

    /// Expand to one flag per pixel.
    #[must_use]
    pub fn mask(&self) -> [bool; WIDTH] {
        let left = bits(self.pf0.left, self.pf1.left, self.pf2.left);
        let mut right = bits(self.pf0.right, self.pf1.right, self.pf2.right);
        if self.reflect {
            right.reverse();
        }

        let mut mask = [false; WIDTH];
        for (i, &on) in left.iter().chain(right.iter()).enumerate() {
            if on {
                mask[i * 4..i * 4 + 4].fill(true);
            }
        }
        mask
    }
}

/// The 20 playfield bits of one half, in beam order.
fn bits(pf0: u8, pf1: u8, pf2: u8) -> [bool; 20] {
    // PF0 bits 4-7, PF1 bits 7-0, PF2 bits 0-7.
    std::array::from_fn(|i| match i {
        0..4 => pf0 & (0x10 << i) != 0,
        4..12 => pf1 & (0x80 >> (i - 4)) != 0,
        _ => pf2 & (0x01 << (i - 12)) != 0,
    })
}
