//! Atari 2600 emulator.
//!
//! A 6507 stepped one instruction at a time against an 8K flat memory that
//! the TIA and the RIOT timer share. Register writes are captured by the
//! memory and handed to the chips after each instruction; the TIA builds a
//! whole scanline from its latches once the beam reaches the end of it.

mod atari2600;
#[cfg(feature = "native")]
pub mod capture;
pub mod cartridge;
mod config;
#[cfg(feature = "native")]
pub mod controller_map;
pub mod input;
pub mod map;
pub mod memory;

pub use atari2600::Atari2600;
pub use cartridge::CartridgeError;
pub use config::{Atari2600Config, VideoConfig};
pub use input::{Control, InputEvent, InputQueue};
pub use memory::Memory;
pub use atari_tia::{Tia, palette};
pub use mos_riot_6532::Riot;
