//! Addressing modes and operand resolution.

use emu_core::Bus;

use crate::Registers;

/// How an instruction finds its operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    /// No operand.
    Implied,
    /// Operates on A (shifts and rotates).
    Accumulator,
    /// Literal byte following the opcode.
    Immediate,
    ZeroPage,
    /// Zero page plus X, wrapping within page zero.
    ZeroPageX,
    /// Zero page plus Y, wrapping within page zero.
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    /// JMP only. Carries the page-wrap defect of the original silicon.
    Indirect,
    /// `(zp,X)`: pointer table in page zero.
    IndirectX,
    /// `(zp),Y`: pointer in page zero, then indexed.
    IndirectY,
    /// Signed displacement from the following instruction.
    Relative,
}

impl AddressingMode {
    /// Operand bytes after the opcode.
    #[must_use]
    pub const fn operand_bytes(self) -> u8 {
        match self {
            Self::Implied | Self::Accumulator => 0,
            Self::Immediate
            | Self::ZeroPage
            | Self::ZeroPageX
            | Self::ZeroPageY
            | Self::IndirectX
            | Self::IndirectY
            | Self::Relative => 1,
            Self::Absolute | Self::AbsoluteX | Self::AbsoluteY | Self::Indirect => 2,
        }
    }
}

/// A resolved operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    None,
    Accumulator,
    Immediate(u8),
    /// Effective address. For branches this is the branch target.
    Address(u16),
}

/// Resolve the operand of the instruction at `regs.pc`.
///
/// Returns the operand and whether indexing crossed a page boundary.
pub fn resolve<B: Bus>(mode: AddressingMode, regs: &Registers, bus: &mut B) -> (Operand, bool) {
    let pc = regs.pc;
    let arg = |bus: &mut B, n: u16| bus.read(pc.wrapping_add(n));

    match mode {
        AddressingMode::Implied => (Operand::None, false),
        AddressingMode::Accumulator => (Operand::Accumulator, false),
        AddressingMode::Immediate => (Operand::Immediate(arg(bus, 1)), false),
        AddressingMode::ZeroPage => (Operand::Address(u16::from(arg(bus, 1))), false),
        AddressingMode::ZeroPageX => {
            let zp = arg(bus, 1).wrapping_add(regs.x);
            (Operand::Address(u16::from(zp)), false)
        }
        AddressingMode::ZeroPageY => {
            let zp = arg(bus, 1).wrapping_add(regs.y);
            (Operand::Address(u16::from(zp)), false)
        }
        AddressingMode::Absolute => {
            let addr = u16::from_le_bytes([arg(bus, 1), arg(bus, 2)]);
            (Operand::Address(addr), false)
        }
        AddressingMode::AbsoluteX => {
            let base = u16::from_le_bytes([arg(bus, 1), arg(bus, 2)]);
            indexed(base, regs.x)
        }
        AddressingMode::AbsoluteY => {
            let base = u16::from_le_bytes([arg(bus, 1), arg(bus, 2)]);
            indexed(base, regs.y)
        }
        AddressingMode::Indirect => {
            let ptr = u16::from_le_bytes([arg(bus, 1), arg(bus, 2)]);
            // The high byte never carries out of the pointer's page.
            let hi_ptr = (ptr & 0xFF00) | (ptr.wrapping_add(1) & 0x00FF);
            let addr = u16::from_le_bytes([bus.read(ptr), bus.read(hi_ptr)]);
            (Operand::Address(addr), false)
        }
        AddressingMode::IndirectX => {
            let zp = arg(bus, 1).wrapping_add(regs.x);
            (Operand::Address(zero_page_pointer(bus, zp)), false)
        }
        AddressingMode::IndirectY => {
            let zp = arg(bus, 1);
            let base = zero_page_pointer(bus, zp);
            indexed(base, regs.y)
        }
        AddressingMode::Relative => {
            let offset = arg(bus, 1);
            let next = pc.wrapping_add(2);
            let target = if offset >= 0x80 {
                next.wrapping_sub(0x100 - u16::from(offset))
            } else {
                next.wrapping_add(u16::from(offset))
            };
            (Operand::Address(target), false)
        }
    }
}

/// Read a little-endian pointer from page zero; the high byte wraps to $00.
fn zero_page_pointer<B: Bus>(bus: &mut B, zp: u8) -> u16 {
    let lo = bus.read(u16::from(zp));
    let hi = bus.read(u16::from(zp.wrapping_add(1)));
    u16::from_le_bytes([lo, hi])
}

/// Add an index to a base; a page is crossed when the low byte wraps past it.
fn indexed(base: u16, index: u8) -> (Operand, bool) {
    let addr = base.wrapping_add(u16::from(index));
    let crossed = (addr & 0x00FF) < u16::from(index);
    (Operand::Address(addr), crossed)
}
