//! Processor core trait.

use crate::Bus;

/// An instruction-stepped processor.
///
/// The bus is borrowed for the duration of one instruction and never held,
/// so the owner is free to hand the same memory to the video chip between
/// steps.
pub trait Cpu {
    /// Snapshot type used for register inspection.
    type Registers;

    /// Fatal execution error (e.g. an undefined opcode).
    type Error;

    /// Execute one instruction and return the processor cycles it took.
    fn step<B: Bus>(&mut self, bus: &mut B) -> Result<u8, Self::Error>;

    /// Current program counter.
    fn pc(&self) -> u16;

    /// Returns a snapshot of all registers for inspection.
    fn registers(&self) -> Self::Registers;

    /// Put the processor in its power-on state and fetch the reset vector.
    fn reset<B: Bus>(&mut self, bus: &mut B);
}
