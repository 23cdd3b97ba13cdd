//! Instruction-stepped 6507 core.

use emu_core::{Bus, Cpu, Observable, Value};

use crate::addressing::{Operand, resolve};
use crate::flags::{self, C, D, I, N, V, Z};
use crate::{CpuError, OPCODES, Operation, Registers, Status};

/// Vector fetched on power-on and reset.
const RESET_VECTOR: u16 = 0xFFFC;
/// Vector fetched by BRK.
const IRQ_VECTOR: u16 = 0xFFFE;

/// The 6507 processor.
#[derive(Debug, Clone, Default)]
pub struct Mos6507 {
    pub regs: Registers,
    /// Cycles executed since power-on.
    cycles: u64,
}

impl Mos6507 {
    #[must_use]
    pub fn new() -> Self {
        Self {
            regs: Registers::new(),
            cycles: 0,
        }
    }

    /// Total processor cycles executed.
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Execute one instruction. Returns base cycles plus branch and page penalties.
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> Result<u8, CpuError> {
        let pc = self.regs.pc;
        let opcode = bus.read(pc);
        let entry = OPCODES[opcode as usize];
        if entry.is_illegal() {
            return Err(CpuError::IllegalOpcode { opcode, pc });
        }

        let (operand, crossed) = resolve(entry.mode, &self.regs, bus);
        self.regs.pc = pc.wrapping_add(u16::from(entry.bytes));

        let extra = self.execute(entry.operation, operand, bus);
        let total = entry.cycles + extra + u8::from(entry.page_penalty && crossed);
        self.cycles += u64::from(total);

        log::trace!(
            "{pc:04X}  {opcode:02X}  {} {operand:?}  A:{:02X} X:{:02X} Y:{:02X} P:{:02X} S:{:02X}  +{total}",
            entry.operation.mnemonic(),
            self.regs.a,
            self.regs.x,
            self.regs.y,
            self.regs.p.0,
            self.regs.s,
        );
        Ok(total)
    }

    /// Load PC from the reset vector and restore power-on register state.
    pub fn reset<B: Bus>(&mut self, bus: &mut B) {
        self.regs = Registers::new();
        self.regs.pc = read_word(bus, RESET_VECTOR);
        log::debug!("6507 reset, PC=${:04X}", self.regs.pc);
    }

    /// Run one operation; returns cycles beyond the table cost.
    fn execute<B: Bus>(&mut self, operation: Operation, operand: Operand, bus: &mut B) -> u8 {
        match operation {
            Operation::Adc => {
                let m = self.load(operand, bus);
                self.add_with_carry(m);
            }
            Operation::Sbc => {
                // Binary subtract is add of the one's complement.
                let m = self.load(operand, bus);
                self.add_with_carry(!m);
            }
            Operation::And => {
                self.regs.a &= self.load(operand, bus);
                self.regs.p.update_nz(self.regs.a);
            }
            Operation::Ora => {
                self.regs.a |= self.load(operand, bus);
                self.regs.p.update_nz(self.regs.a);
            }
            Operation::Eor => {
                self.regs.a ^= self.load(operand, bus);
                self.regs.p.update_nz(self.regs.a);
            }

            Operation::Asl => self.modify(operand, bus, |p, v| {
                p.set_if(C, v & 0x80 != 0);
                v << 1
            }),
            Operation::Lsr => self.modify(operand, bus, |p, v| {
                p.set_if(C, v & 0x01 != 0);
                v >> 1
            }),
            Operation::Rol => self.modify(operand, bus, |p, v| {
                let carry_in = u8::from(p.is_set(C));
                p.set_if(C, v & 0x80 != 0);
                (v << 1) | carry_in
            }),
            Operation::Ror => self.modify(operand, bus, |p, v| {
                let carry_in = u8::from(p.is_set(C)) << 7;
                p.set_if(C, v & 0x01 != 0);
                (v >> 1) | carry_in
            }),
            Operation::Inc => self.modify(operand, bus, |_, v| v.wrapping_add(1)),
            Operation::Dec => self.modify(operand, bus, |_, v| v.wrapping_sub(1)),

            Operation::Bcc => return self.branch(!self.regs.p.is_set(C), operand),
            Operation::Bcs => return self.branch(self.regs.p.is_set(C), operand),
            Operation::Bne => return self.branch(!self.regs.p.is_set(Z), operand),
            Operation::Beq => return self.branch(self.regs.p.is_set(Z), operand),
            Operation::Bpl => return self.branch(!self.regs.p.is_set(N), operand),
            Operation::Bmi => return self.branch(self.regs.p.is_set(N), operand),
            Operation::Bvc => return self.branch(!self.regs.p.is_set(V), operand),
            Operation::Bvs => return self.branch(self.regs.p.is_set(V), operand),

            Operation::Bit => {
                let m = self.load(operand, bus);
                self.regs.p.set_if(Z, self.regs.a & m == 0);
                self.regs.p.set_if(N, m & 0x80 != 0);
                self.regs.p.set_if(V, m & 0x40 != 0);
            }

            Operation::Brk => {
                // The byte after BRK is skipped on return.
                self.push_word(bus, self.regs.pc.wrapping_add(1));
                self.push(bus, self.regs.p.to_pushed_byte());
                self.regs.p.set(I);
                self.regs.pc = read_word(bus, IRQ_VECTOR);
            }

            Operation::Clc => self.regs.p.clear(C),
            Operation::Cld => self.regs.p.clear(D),
            Operation::Cli => self.regs.p.clear(I),
            Operation::Clv => self.regs.p.clear(V),
            Operation::Sec => self.regs.p.set(C),
            Operation::Sed => self.regs.p.set(D),
            Operation::Sei => self.regs.p.set(I),

            Operation::Cmp => {
                let m = self.load(operand, bus);
                self.compare(self.regs.a, m);
            }
            Operation::Cpx => {
                let m = self.load(operand, bus);
                self.compare(self.regs.x, m);
            }
            Operation::Cpy => {
                let m = self.load(operand, bus);
                self.compare(self.regs.y, m);
            }

            Operation::Dex => {
                self.regs.x = self.regs.x.wrapping_sub(1);
                self.regs.p.update_nz(self.regs.x);
            }
            Operation::Dey => {
                self.regs.y = self.regs.y.wrapping_sub(1);
                self.regs.p.update_nz(self.regs.y);
            }
            Operation::Inx => {
                self.regs.x = self.regs.x.wrapping_add(1);
                self.regs.p.update_nz(self.regs.x);
            }
            Operation::Iny => {
                self.regs.y = self.regs.y.wrapping_add(1);
                self.regs.p.update_nz(self.regs.y);
            }

            Operation::Jmp => {
                if let Operand::Address(target) = operand {
                    self.regs.pc = target;
                }
            }
            Operation::Jsr => {
                if let Operand::Address(target) = operand {
                    // Return address minus one; RTS adds it back.
                    self.push_word(bus, self.regs.pc.wrapping_sub(1));
                    self.regs.pc = target;
                }
            }
            Operation::Rts => {
                self.regs.pc = self.pull_word(bus).wrapping_add(1);
            }
            Operation::Rti => {
                let p = self.pull(bus);
                self.regs.p = Status::from_byte(p & !flags::B);
                self.regs.pc = self.pull_word(bus);
            }

            Operation::Lda => {
                self.regs.a = self.load(operand, bus);
                self.regs.p.update_nz(self.regs.a);
            }
            Operation::Ldx => {
                self.regs.x = self.load(operand, bus);
                self.regs.p.update_nz(self.regs.x);
            }
            Operation::Ldy => {
                self.regs.y = self.load(operand, bus);
                self.regs.p.update_nz(self.regs.y);
            }
            Operation::Sta => self.store(operand, bus, self.regs.a),
            Operation::Stx => self.store(operand, bus, self.regs.x),
            Operation::Sty => self.store(operand, bus, self.regs.y),

            Operation::Nop => {}

            Operation::Pha => self.push(bus, self.regs.a),
            Operation::Php => self.push(bus, self.regs.p.to_pushed_byte()),
            Operation::Pla => {
                self.regs.a = self.pull(bus);
                self.regs.p.update_nz(self.regs.a);
            }
            Operation::Plp => {
                let p = self.pull(bus);
                self.regs.p = Status::from_byte(p & !flags::B);
            }

            Operation::Tax => {
                self.regs.x = self.regs.a;
                self.regs.p.update_nz(self.regs.x);
            }
            Operation::Tay => {
                self.regs.y = self.regs.a;
                self.regs.p.update_nz(self.regs.y);
            }
            Operation::Tsx => {
                self.regs.x = self.regs.s;
                self.regs.p.update_nz(self.regs.x);
            }
            Operation::Txa => {
                self.regs.a = self.regs.x;
                self.regs.p.update_nz(self.regs.a);
            }
            Operation::Txs => self.regs.s = self.regs.x,
            Operation::Tya => {
                self.regs.a = self.regs.y;
                self.regs.p.update_nz(self.regs.a);
            }

            // Rejected by step() before operand resolution.
            Operation::Illegal => {}
        }
        0
    }

    fn add_with_carry(&mut self, m: u8) {
        let a = self.regs.a;
        let sum = u16::from(a) + u16::from(m) + u16::from(self.regs.p.is_set(C));
        let result = sum as u8;
        self.regs.p.set_if(C, sum > 0xFF);
        self.regs.p.set_if(V, (a ^ result) & (m ^ result) & 0x80 != 0);
        self.regs.a = result;
        self.regs.p.update_nz(result);
    }

    fn compare(&mut self, register: u8, m: u8) {
        self.regs.p.set_if(C, register >= m);
        self.regs.p.update_nz(register.wrapping_sub(m));
    }

    /// Taken branches cost one cycle, two if the target is on another page.
    fn branch(&mut self, taken: bool, operand: Operand) -> u8 {
        let Operand::Address(target) = operand else {
            return 0;
        };
        if !taken {
            return 0;
        }
        let from = self.regs.pc;
        self.regs.pc = target;
        if from & 0xFF00 == target & 0xFF00 { 1 } else { 2 }
    }

    fn load<B: Bus>(&self, operand: Operand, bus: &mut B) -> u8 {
        match operand {
            Operand::None => 0,
            Operand::Accumulator => self.regs.a,
            Operand::Immediate(value) => value,
            Operand::Address(addr) => bus.read(addr),
        }
    }

    fn store<B: Bus>(&mut self, operand: Operand, bus: &mut B, value: u8) {
        match operand {
            Operand::Accumulator => self.regs.a = value,
            Operand::Address(addr) => bus.write(addr, value),
            Operand::None | Operand::Immediate(_) => {}
        }
    }

    /// Read-modify-write on A or memory; N and Z follow the result.
    fn modify<B: Bus>(
        &mut self,
        operand: Operand,
        bus: &mut B,
        f: impl FnOnce(&mut Status, u8) -> u8,
    ) {
        let value = self.load(operand, bus);
        let result = f(&mut self.regs.p, value);
        self.regs.p.update_nz(result);
        self.store(operand, bus, result);
    }

    fn push<B: Bus>(&mut self, bus: &mut B, value: u8) {
        let addr = self.regs.push();
        bus.write(addr, value);
    }

    fn pull<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let addr = self.regs.pop();
        bus.read(addr)
    }

    fn push_word<B: Bus>(&mut self, bus: &mut B, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.push(bus, hi);
        self.push(bus, lo);
    }

    fn pull_word<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.pull(bus);
        let hi = self.pull(bus);
        u16::from_le_bytes([lo, hi])
    }
}

fn read_word<B: Bus>(bus: &mut B, addr: u16) -> u16 {
    u16::from_le_bytes([bus.read(addr), bus.read(addr.wrapping_add(1))])
}

impl Cpu for Mos6507 {
    type Registers = Registers;
    type Error = CpuError;

    fn step<B: Bus>(&mut self, bus: &mut B) -> Result<u8, CpuError> {
        Mos6507::step(self, bus)
    }

    fn pc(&self) -> u16 {
        self.regs.pc
    }

    fn registers(&self) -> Registers {
        self.regs
    }

    fn reset<B: Bus>(&mut self, bus: &mut B) {
        Mos6507::reset(self, bus);
    }
}

const QUERY_PATHS: &[&str] = &[
    "pc", "a", "x", "y", "s", "p", "cycles", "flags.c", "flags.z", "flags.i", "flags.d",
    "flags.b", "flags.v", "flags.n",
];

impl Observable for Mos6507 {
    fn query(&self, path: &str) -> Option<Value> {
        let p = self.regs.p;
        match path {
            "pc" => Some(self.regs.pc.into()),
            "a" => Some(self.regs.a.into()),
            "x" => Some(self.regs.x.into()),
            "y" => Some(self.regs.y.into()),
            "s" => Some(self.regs.s.into()),
            "p" => Some(p.0.into()),
            "cycles" => Some(self.cycles.into()),
            "flags.c" => Some(p.is_set(C).into()),
            "flags.z" => Some(p.is_set(Z).into()),
            "flags.i" => Some(p.is_set(I).into()),
            "flags.d" => Some(p.is_set(D).into()),
            "flags.b" => Some(p.is_set(flags::B).into()),
            "flags.v" => Some(p.is_set(V).into()),
            "flags.n" => Some(p.is_set(N).into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        QUERY_PATHS
    }
}
