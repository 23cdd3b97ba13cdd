//! Raw cartridge images.
//!
//! 2600 cartridges have no header. Images of up to 4K are copied into the
//! cartridge window; 2K images appear twice.

use std::fmt;

use crate::map::{CART_SIZE, CART_START};
use crate::memory::Memory;

/// Smallest image that gets mirrored to fill the window.
const HALF_CART: usize = CART_SIZE / 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartridgeError {
    /// No bytes at all.
    Empty,
    /// Bigger than the 4K window; bank switching isn't supported.
    TooLarge(usize),
}

impl fmt::Display for CartridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "cartridge image is empty"),
            Self::TooLarge(len) => write!(
                f,
                "cartridge image is {len} bytes; at most {CART_SIZE} is supported"
            ),
        }
    }
}

impl std::error::Error for CartridgeError {}

/// Copy `rom` into the cartridge window.
///
/// # Errors
///
/// Returns an error if the image is empty or larger than 4K.
pub fn load(rom: &[u8], memory: &mut Memory) -> Result<(), CartridgeError> {
    if rom.is_empty() {
        return Err(CartridgeError::Empty);
    }
    if rom.len() > CART_SIZE {
        return Err(CartridgeError::TooLarge(rom.len()));
    }

    memory.load(CART_START, rom);
    if rom.len() <= HALF_CART {
        memory.load(CART_START + HALF_CART as u16, rom);
    }
    log::info!("loaded {} byte cartridge", rom.len());
    Ok(())
}
