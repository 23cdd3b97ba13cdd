//! Atari TIA (Television Interface Adapter).
//!
//! Writes during a line only update latches. Nothing is drawn until
//! [`Tia::line_update`], which rasterises the whole visible line from what
//! was latched, records collisions and then re-latches for the next line.
//!
//! The chip keeps no register file of its own: register values, collision
//! latches and the beam position live in the machine's shared memory,
//! reached through [`TiaBus`].

mod objects;
pub mod palette;
pub mod playfield;
pub mod registers;
mod tia;

pub use objects::{Layout, Object, ball_width, missile_width, motion, player_size};
pub use playfield::{Playfield, WIDTH};
pub use tia::{Tia, VideoConfig};

/// Colour clocks per scanline.
pub const LINE_CLOCKS: u16 = 228;

/// Colour clocks of horizontal blank at the start of each line.
pub const HBLANK_CLOCKS: u16 = 68;

/// Shared state the TIA works against.
///
/// `peek`/`poke` are raw accesses with no address decoding and no side
/// effects; register addresses are the canonical `$00-$3F` write side and
/// the `$0100` read side in [`registers`].
pub trait TiaBus {
    fn peek(&self, address: u16) -> u8;
    fn poke(&mut self, address: u16, value: u8);
    /// Colour clocks since the start of the current line.
    fn line_cycle(&self) -> u16;
    fn set_line_cycle(&mut self, clocks: u16);
}
