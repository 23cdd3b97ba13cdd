//! Shared memory: the 8K address space plus the beam position.
//!
//! The processor sees this through [`Bus`], which does the 2600's address
//! decoding and records register writes for the driver. The chips see it
//! through [`TiaBus`] and [`RiotBus`], whose `peek`/`poke` go straight to
//! the flat array with no decoding and no side effects.

use atari_tia::{LINE_CLOCKS, TiaBus};
use emu_core::Bus;
use mos_riot_6532::RiotBus;

use crate::map;

/// Size of the flat array (13-bit address space).
pub const MEMORY_SIZE: usize = 0x2000;

const ADDRESS_MASK: u16 = 0x1FFF;

/// A register write captured for the driver to dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterWrite {
    /// Canonical register address (TIA writes are folded to $00-$3F).
    pub address: u16,
    pub value: u8,
}

/// Flat memory shared by the processor, the TIA and the RIOT.
pub struct Memory {
    bytes: Box<[u8; MEMORY_SIZE]>,
    /// Colour clocks since the start of the current line.
    line_cycle: u16,
    pending_tia: Option<RegisterWrite>,
    pending_riot: Option<RegisterWrite>,
}

impl Memory {
    /// Power-on contents: RAM cleared, inputs released.
    #[must_use]
    pub fn new() -> Self {
        let mut memory = Self {
            bytes: Box::new([0; MEMORY_SIZE]),
            line_cycle: 0,
            pending_tia: None,
            pending_riot: None,
        };
        memory.poke(map::SWCHA, 0xFF);
        memory.poke(map::SWCHB, map::SWCHB_DEFAULT);
        memory.poke(map::INPT4, 0x80);
        memory.poke(map::INPT5, 0x80);
        memory
    }

    /// Raw read of the flat array.
    #[must_use]
    pub fn peek(&self, address: u16) -> u8 {
        self.bytes[(address & ADDRESS_MASK) as usize]
    }

    /// Raw write to the flat array. Never raises a register write.
    pub fn poke(&mut self, address: u16, value: u8) {
        self.bytes[(address & ADDRESS_MASK) as usize] = value;
    }

    /// Copy `data` into the flat array from `address`.
    pub fn load(&mut self, address: u16, data: &[u8]) {
        for (i, &byte) in data.iter().enumerate() {
            self.poke(address.wrapping_add(i as u16), byte);
        }
    }

    /// Colour clocks since the start of the current line.
    #[must_use]
    pub fn line_cycle(&self) -> u16 {
        self.line_cycle
    }

    pub fn set_line_cycle(&mut self, clocks: u16) {
        self.line_cycle = clocks;
    }

    /// Account for processor cycles; the TIA runs three clocks per cycle.
    pub fn advance(&mut self, cpu_cycles: u8) {
        self.line_cycle += u16::from(cpu_cycles) * 3;
    }

    /// Whether a full line's worth of clocks has elapsed.
    #[must_use]
    pub fn line_complete(&self) -> bool {
        self.line_cycle >= LINE_CLOCKS
    }

    /// Take the pending TIA write, if any.
    pub fn take_tia_write(&mut self) -> Option<RegisterWrite> {
        self.pending_tia.take()
    }

    /// Take the pending RIOT write, if any.
    pub fn take_riot_write(&mut self) -> Option<RegisterWrite> {
        self.pending_riot.take()
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl TiaBus for Memory {
    fn peek(&self, address: u16) -> u8 {
        Memory::peek(self, address)
    }

    fn poke(&mut self, address: u16, value: u8) {
        Memory::poke(self, address, value);
    }

    fn line_cycle(&self) -> u16 {
        Memory::line_cycle(self)
    }

    fn set_line_cycle(&mut self, clocks: u16) {
        Memory::set_line_cycle(self, clocks);
    }
}

impl RiotBus for Memory {
    fn peek(&self, address: u16) -> u8 {
        Memory::peek(self, address)
    }

    fn poke(&mut self, address: u16, value: u8) {
        Memory::poke(self, address, value);
    }
}

/// Page one is wired to the same RAM and registers as page zero.
fn fold_page_one(addr: u16) -> u16 {
    if (0x0100..0x0200).contains(&addr) {
        addr & 0x00FF
    } else {
        addr
    }
}

impl Bus for Memory {
    fn read(&mut self, address: u16) -> u8 {
        let addr = fold_page_one(address & ADDRESS_MASK);
        if addr < map::RAM_START {
            // TIA read registers live apart from the write registers.
            self.peek(map::TIA_READ_BASE | (addr & 0x0F))
        } else {
            self.peek(addr)
        }
    }

    fn write(&mut self, address: u16, value: u8) {
        let addr = fold_page_one(address & ADDRESS_MASK);
        match addr {
            0x0000..=0x007F => {
                let register = addr & 0x3F;
                self.poke(register, value);
                self.pending_tia = Some(RegisterWrite {
                    address: register,
                    value,
                });
            }
            // Port B is hardwired as input.
            map::SWCHB => {}
            map::RIOT_START..=map::RIOT_END => {
                self.poke(addr, value);
                self.pending_riot = Some(RegisterWrite {
                    address: addr,
                    value,
                });
            }
            map::CART_START.. => {}
            _ => self.poke(addr, value),
        }
    }
}
