//! Memory map.
//!
//! Write-side TIA registers are in `atari_tia::registers`; everything else
//! the machine decodes is here.

pub use atari_tia::registers::{
    CXBLPF, CXM0FB, CXM0P, CXM1FB, CXM1P, CXP0FB, CXP1FB, CXPPMM, INPT4, INPT5,
    READ_BASE as TIA_READ_BASE,
};
pub use mos_riot_6532::{INTIM, SWCHA, SWCHB, T1024T, TIM1T, TIM8T, TIM64T, TIMINT};

/// First byte of the 128 bytes of RIOT RAM.
pub const RAM_START: u16 = 0x0080;

/// RIOT register block.
pub const RIOT_START: u16 = 0x0280;
pub const RIOT_END: u16 = 0x029F;

/// Colour TV selected, reset and select released, both difficulties B.
pub const SWCHB_DEFAULT: u8 = 0x0B;
/// Cartridge window.
pub const CART_START: u16 = 0x1000;
pub const CART_SIZE: usize = 0x1000;
