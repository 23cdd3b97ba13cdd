//! MOS 6507 processor, the 6502 core the Atari 2600 ships with.
//!
//! Execution is instruction-stepped: [`Mos6507::step`] runs one whole
//! instruction and reports the cycles it took, including page-crossing and
//! branch penalties. Decoding goes through a static 256-entry table, so
//! undefined opcodes are rejected up front instead of silently skewing the
//! cycle count.
//!
//! Arithmetic is binary only. The decimal flag is stored and can be pushed
//! and pulled but ADC/SBC ignore it.

mod addressing;
mod cpu;
mod error;
pub mod flags;
mod opcodes;
mod registers;

pub use addressing::{AddressingMode, Operand};
pub use cpu::Mos6507;
pub use error::CpuError;
pub use flags::Status;
pub use opcodes::{OPCODES, Opcode, Operation};
pub use registers::Registers;
