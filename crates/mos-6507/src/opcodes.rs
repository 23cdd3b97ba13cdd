//! Static decode table.
//!
//! Every one of the 256 opcode bytes has an entry. The 151 documented
//! instructions carry their operation, addressing mode, length and base
//! cycle cost; the rest decode to [`Operation::Illegal`].

use crate::AddressingMode::{
    self, Absolute, AbsoluteX, AbsoluteY, Accumulator, Immediate, Implied, Indirect, IndirectX,
    IndirectY, Relative, ZeroPage, ZeroPageX, ZeroPageY,
};

/// Instruction semantics, independent of addressing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Adc,
    And,
    Asl,
    Bcc,
    Bcs,
    Beq,
    Bit,
    Bmi,
    Bne,
    Bpl,
    Brk,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Cli,
    Clv,
    Cmp,
    Cpx,
    Cpy,
    Dec,
    Dex,
    Dey,
    Eor,
    Inc,
    Inx,
    Iny,
    Jmp,
    Jsr,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    Nop,
    Ora,
    Pha,
    Php,
    Pla,
    Plp,
    Rol,
    Ror,
    Rti,
    Rts,
    Sbc,
    Sec,
    Sed,
    Sei,
    Sta,
    Stx,
    Sty,
    Tax,
    Tay,
    Tsx,
    Txa,
    Txs,
    Tya,
    /// No documented instruction at this opcode.
    Illegal,
}

impl Operation {
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Adc => "ADC",
            Self::And => "AND",
            Self::Asl => "ASL",
            Self::Bcc => "BCC",
            Self::Bcs => "BCS",
            Self::Beq => "BEQ",
            Self::Bit => "BIT",
            Self::Bmi => "BMI",
            Self::Bne => "BNE",
            Self::Bpl => "BPL",
            Self::Brk => "BRK",
            Self::Bvc => "BVC",
            Self::Bvs => "BVS",
            Self::Clc => "CLC",
            Self::Cld => "CLD",
            Self::Cli => "CLI",
            Self::Clv => "CLV",
            Self::Cmp => "CMP",
            Self::Cpx => "CPX",
            Self::Cpy => "CPY",
            Self::Dec => "DEC",
            Self::Dex => "DEX",
            Self::Dey => "DEY",
            Self::Eor => "EOR",
            Self::Inc => "INC",
            Self::Inx => "INX",
            Self::Iny => "INY",
            Self::Jmp => "JMP",
            Self::Jsr => "JSR",
            Self::Lda => "LDA",
            Self::Ldx => "LDX",
            Self::Ldy => "LDY",
            Self::Lsr => "LSR",
            Self::Nop => "NOP",
            Self::Ora => "ORA",
            Self::Pha => "PHA",
            Self::Php => "PHP",
            Self::Pla => "PLA",
            Self::Plp => "PLP",
            Self::Rol => "ROL",
            Self::Ror => "ROR",
            Self::Rti => "RTI",
            Self::Rts => "RTS",
            Self::Sbc => "SBC",
            Self::Sec => "SEC",
            Self::Sed => "SED",
            Self::Sei => "SEI",
            Self::Sta => "STA",
            Self::Stx => "STX",
            Self::Sty => "STY",
            Self::Tax => "TAX",
            Self::Tay => "TAY",
            Self::Tsx => "TSX",
            Self::Txa => "TXA",
            Self::Txs => "TXS",
            Self::Tya => "TYA",
            Self::Illegal => "???",
        }
    }

    /// Branches, jumps, calls and returns set PC themselves.
    #[must_use]
    pub const fn transfers_control(self) -> bool {
        matches!(
            self,
            Self::Bcc
                | Self::Bcs
                | Self::Beq
                | Self::Bmi
                | Self::Bne
                | Self::Bpl
                | Self::Bvc
                | Self::Bvs
                | Self::Brk
                | Self::Jmp
                | Self::Jsr
                | Self::Rti
                | Self::Rts
        )
    }
}

/// One decode table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub operation: Operation,
    pub mode: AddressingMode,
    /// Instruction length including the opcode byte (1-3).
    pub bytes: u8,
    /// Base cycle cost before penalties.
    pub cycles: u8,
    /// One extra cycle when indexing crosses a page.
    pub page_penalty: bool,
}

impl Opcode {
    #[must_use]
    pub const fn is_illegal(&self) -> bool {
        matches!(self.operation, Operation::Illegal)
    }
}

const fn op(operation: Operation, mode: AddressingMode, cycles: u8) -> Opcode {
    Opcode {
        operation,
        mode,
        bytes: 1 + mode.operand_bytes(),
        cycles,
        page_penalty: false,
    }
}

/// Reads through `abs,X`, `abs,Y` and `(zp),Y` pay for page crossings.
const fn read(operation: Operation, mode: AddressingMode, cycles: u8) -> Opcode {
    Opcode {
        page_penalty: true,
        ..op(operation, mode, cycles)
    }
}

const ILLEGAL: Opcode = Opcode {
    operation: Operation::Illegal,
    mode: Implied,
    bytes: 1,
    cycles: 0,
    page_penalty: false,
};

use Operation::{
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs, Clc, Cld, Cli, Clv, Cmp, Cpx,
    Cpy, Dec, Dex, Dey, Eor, Inc, Inx, Iny, Jmp, Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla,
    Plp, Rol, Ror, Rti, Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax, Tay, Tsx, Txa, Txs, Tya,
};

#[rustfmt::skip]
const DOCUMENTED: &[(u8, Opcode)] = &[
    (0x69, op(Adc, Immediate, 2)), (0x65, op(Adc, ZeroPage, 3)), (0x75, op(Adc, ZeroPageX, 4)),
    (0x6D, op(Adc, Absolute, 4)), (0x7D, read(Adc, AbsoluteX, 4)), (0x79, read(Adc, AbsoluteY, 4)),
    (0x61, op(Adc, IndirectX, 6)), (0x71, read(Adc, IndirectY, 5)),

    (0x29, op(And, Immediate, 2)), (0x25, op(And, ZeroPage, 3)), (0x35, op(And, ZeroPageX, 4)),
    (0x2D, op(And, Absolute, 4)), (0x3D, read(And, AbsoluteX, 4)), (0x39, read(And, AbsoluteY, 4)),
    (0x21, op(And, IndirectX, 6)), (0x31, read(And, IndirectY, 5)),

    (0x0A, op(Asl, Accumulator, 2)), (0x06, op(Asl, ZeroPage, 5)), (0x16, op(Asl, ZeroPageX, 6)),
    (0x0E, op(Asl, Absolute, 6)), (0x1E, op(Asl, AbsoluteX, 7)),

    (0x90, op(Bcc, Relative, 2)), (0xB0, op(Bcs, Relative, 2)), (0xF0, op(Beq, Relative, 2)),
    (0x30, op(Bmi, Relative, 2)), (0xD0, op(Bne, Relative, 2)), (0x10, op(Bpl, Relative, 2)),
    (0x50, op(Bvc, Relative, 2)), (0x70, op(Bvs, Relative, 2)),

    (0x24, op(Bit, ZeroPage, 3)), (0x2C, op(Bit, Absolute, 4)),

    (0x00, op(Brk, Implied, 7)),

    (0x18, op(Clc, Implied, 2)), (0xD8, op(Cld, Implied, 2)), (0x58, op(Cli, Implied, 2)),
    (0xB8, op(Clv, Implied, 2)),

    (0xC9, op(Cmp, Immediate, 2)), (0xC5, op(Cmp, ZeroPage, 3)), (0xD5, op(Cmp, ZeroPageX, 4)),
    (0xCD, op(Cmp, Absolute, 4)), (0xDD, read(Cmp, AbsoluteX, 4)), (0xD9, read(Cmp, AbsoluteY, 4)),
    (0xC1, op(Cmp, IndirectX, 6)), (0xD1, read(Cmp, IndirectY, 5)),

    (0xE0, op(Cpx, Immediate, 2)), (0xE4, op(Cpx, ZeroPage, 3)), (0xEC, op(Cpx, Absolute, 4)),
    (0xC0, op(Cpy, Immediate, 2)), (0xC4, op(Cpy, ZeroPage, 3)), (0xCC, op(Cpy, Absolute, 4)),

    (0xC6, op(Dec, ZeroPage, 5)), (0xD6, op(Dec, ZeroPageX, 6)), (0xCE, op(Dec, Absolute, 6)),
    (0xDE, op(Dec, AbsoluteX, 7)),
    (0xCA, op(Dex, Implied, 2)), (0x88, op(Dey, Implied, 2)),

    (0x49, op(Eor, Immediate, 2)), (0x45, op(Eor, ZeroPage, 3)), (0x55, op(Eor, ZeroPageX, 4)),
    (0x4D, op(Eor, Absolute, 4)), (0x5D, read(Eor, AbsoluteX, 4)), (0x59, read(Eor, AbsoluteY, 4)),
    (0x41, op(Eor, IndirectX, 6)), (0x51, read(Eor, IndirectY, 5)),

    (0xE6, op(Inc, ZeroPage, 5)), (0xF6, op(Inc, ZeroPageX, 6)), (0xEE, op(Inc, Absolute, 6)),
    (0xFE, op(Inc, AbsoluteX, 7)),
    (0xE8, op(Inx, Implied, 2)), (0xC8, op(Iny, Implied, 2)),

    (0x4C, op(Jmp, Absolute, 3)), (0x6C, op(Jmp, Indirect, 5)),
    (0x20, op(Jsr, Absolute, 6)),

    (0xA9, op(Lda, Immediate, 2)), (0xA5, op(Lda, ZeroPage, 3)), (0xB5, op(Lda, ZeroPageX, 4)),
    (0xAD, op(Lda, Absolute, 4)), (0xBD, read(Lda, AbsoluteX, 4)), (0xB9, read(Lda, AbsoluteY, 4)),
    (0xA1, op(Lda, IndirectX, 6)), (0xB1, read(Lda, IndirectY, 5)),

    (0xA2, op(Ldx, Immediate, 2)), (0xA6, op(Ldx, ZeroPage, 3)), (0xB6, op(Ldx, ZeroPageY, 4)),
    (0xAE, op(Ldx, Absolute, 4)), (0xBE, read(Ldx, AbsoluteY, 4)),

    (0xA0, op(Ldy, Immediate, 2)), (0xA4, op(Ldy, ZeroPage, 3)), (0xB4, op(Ldy, ZeroPageX, 4)),
    (0xAC, op(Ldy, Absolute, 4)), (0xBC, read(Ldy, AbsoluteX, 4)),

    (0x4A, op(Lsr, Accumulator, 2)), (0x46, op(Lsr, ZeroPage, 5)), (0x56, op(Lsr, ZeroPageX, 6)),
    (0x4E, op(Lsr, Absolute, 6)), (0x5E, op(Lsr, AbsoluteX, 7)),

    (0xEA, op(Nop, Implied, 2)),

    (0x09, op(Ora, Immediate, 2)), (0x05, op(Ora, ZeroPage, 3)), (0x15, op(Ora, ZeroPageX, 4)),
    (0x0D, op(Ora, Absolute, 4)), (0x1D, read(Ora, AbsoluteX, 4)), (0x19, read(Ora, AbsoluteY, 4)),
    (0x01, op(Ora, IndirectX, 6)), (0x11, read(Ora, IndirectY, 5)),

    (0x48, op(Pha, Implied, 3)), (0x08, op(Php, Implied, 3)),
    (0x68, op(Pla, Implied, 4)), (0x28, op(Plp, Implied, 4)),

    (0x2A, op(Rol, Accumulator, 2)), (0x26, op(Rol, ZeroPage, 5)), (0x36, op(Rol, ZeroPageX, 6)),
    (0x2E, op(Rol, Absolute, 6)), (0x3E, op(Rol, AbsoluteX, 7)),

    (0x6A, op(Ror, Accumulator, 2)), (0x66, op(Ror, ZeroPage, 5)), (0x76, op(Ror, ZeroPageX, 6)),
    (0x6E, op(Ror, Absolute, 6)), (0x7E, op(Ror, AbsoluteX, 7)),

    (0x40, op(Rti, Implied, 6)), (0x60, op(Rts, Implied, 6)),

    (0xE9, op(Sbc, Immediate, 2)), (0xE5, op(Sbc, ZeroPage, 3)), (0xF5, op(Sbc, ZeroPageX, 4)),
    (0xED, op(Sbc, Absolute, 4)), (0xFD, read(Sbc, AbsoluteX, 4)), (0xF9, read(Sbc, AbsoluteY, 4)),
    (0xE1, op(Sbc, IndirectX, 6)), (0xF1, read(Sbc, IndirectY, 5)),

    (0x38, op(Sec, Implied, 2)), (0xF8, op(Sed, Implied, 2)), (0x78, op(Sei, Implied, 2)),

    (0x85, op(Sta, ZeroPage, 3)), (0x95, op(Sta, ZeroPageX, 4)), (0x8D, op(Sta, Absolute, 4)),
    (0x9D, op(Sta, AbsoluteX, 5)), (0x99, op(Sta, AbsoluteY, 5)), (0x81, op(Sta, IndirectX, 6)),
    (0x91, op(Sta, IndirectY, 6)),

    (0x86, op(Stx, ZeroPage, 3)), (0x96, op(Stx, ZeroPageY, 4)), (0x8E, op(Stx, Absolute, 4)),
    (0x84, op(Sty, ZeroPage, 3)), (0x94, op(Sty, ZeroPageX, 4)), (0x8C, op(Sty, Absolute, 4)),

    (0xAA, op(Tax, Implied, 2)), (0xA8, op(Tay, Implied, 2)), (0xBA, op(Tsx, Implied, 2)),
    (0x8A, op(Txa, Implied, 2)), (0x9A, op(Txs, Implied, 2)), (0x98, op(Tya, Implied, 2)),
];

const fn build() -> [Opcode; 256] {
    let mut table = [ILLEGAL; 256];
    let mut i = 0;
    while i < DOCUMENTED.len() {
        let (code, entry) = DOCUMENTED[i];
        table[code as usize] = entry;
        i += 1;
    }
    table
}

/// Decode table indexed by opcode byte.
pub static OPCODES: [Opcode; 256] = build();
