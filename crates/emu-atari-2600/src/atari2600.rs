//! Top-level Atari 2600 system.
//!
//! There is no master clock loop here: the processor runs one instruction at
//! a time and everything else is driven from the cycles it reports. The TIA
//! runs three colour clocks per CPU cycle and draws a line once 228 clocks
//! have elapsed; the RIOT timer counts CPU cycles directly.

use atari_tia::Tia;
use emu_core::{Observable, Ticks, Value, parse_address};
use mos_6507::{CpuError, Mos6507};
use mos_riot_6532::{INTIM, Riot};

use crate::cartridge::{self, CartridgeError};
use crate::config::Atari2600Config;
use crate::input::{Control, InputQueue};
use crate::memory::Memory;

/// Lines after which `run_frame` gives up waiting for vertical sync.
const MAX_LINES_PER_FRAME: u32 = 1000;

/// Atari 2600 system.
pub struct Atari2600 {
    cpu: Mos6507,
    memory: Memory,
    tia: Tia,
    riot: Riot,
    /// Colour clocks since power-on.
    ticks: Ticks,
    /// Completed frames, counted on each VSYNC falling edge.
    frame_count: u64,
    input_queue: InputQueue,
}

impl Atari2600 {
    /// Build a machine with the cartridge inserted and the CPU reset.
    ///
    /// # Errors
    ///
    /// Returns an error if the cartridge image is empty or too large.
    pub fn new(config: &Atari2600Config) -> Result<Self, CartridgeError> {
        let mut memory = Memory::new();
        cartridge::load(&config.rom_data, &mut memory)?;

        let mut cpu = Mos6507::new();
        cpu.reset(&mut memory);
        log::debug!("reset vector ${:04X}", cpu.regs.pc);

        Ok(Self {
            cpu,
            memory,
            tia: Tia::new(config.video),
            riot: Riot::new(),
            ticks: Ticks::ZERO,
            frame_count: 0,
            input_queue: InputQueue::new(),
        })
    }

    /// Run one instruction and everything it triggers.
    ///
    /// Returns the CPU cycles the instruction took.
    ///
    /// # Errors
    ///
    /// Returns an error if the processor hits an undefined opcode.
    pub fn step(&mut self) -> Result<u8, CpuError> {
        let cycles = self.cpu.step(&mut self.memory)?;
        self.memory.advance(cycles);
        self.ticks += Ticks::from_cpu_cycles(u64::from(cycles));

        if let Some(write) = self.memory.take_tia_write() {
            self.tia.write(write.address, &mut self.memory);
        }
        if let Some(write) = self.memory.take_riot_write() {
            self.riot.write(write.address, &mut self.memory);
        }
        self.riot.tick(cycles, &mut self.memory);

        if self.memory.line_complete() {
            self.tia.line_update(&mut self.memory);
        }
        if self.tia.take_frame_complete() {
            self.frame_count += 1;
        }
        Ok(cycles)
    }

    /// Run until the next vertical sync.
    ///
    /// Scripted input due this frame is applied first. A program that never
    /// syncs returns after a bounded number of lines so callers keep control.
    ///
    /// # Errors
    ///
    /// Returns an error if the processor hits an undefined opcode.
    pub fn run_frame(&mut self) -> Result<(), CpuError> {
        self.input_queue.process(self.frame_count, &mut self.memory);

        let start = self.frame_count;
        let mut lines = 0;
        while self.frame_count == start {
            let line = self.tia.line();
            self.step()?;
            if self.tia.line() != line {
                lines += 1;
                if lines >= MAX_LINES_PER_FRAME {
                    log::warn!("no vertical sync after {lines} lines");
                    break;
                }
            }
        }
        Ok(())
    }

    pub fn press(&mut self, control: Control) {
        control.apply(&mut self.memory, true);
    }

    pub fn release(&mut self, control: Control) {
        control.apply(&mut self.memory, false);
    }

    /// Scripted input, applied at the start of each frame.
    pub fn input_queue(&mut self) -> &mut InputQueue {
        &mut self.input_queue
    }

    /// Colour clocks since power-on.
    #[must_use]
    pub fn ticks(&self) -> Ticks {
        self.ticks
    }

    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// RGB24 framebuffer.
    #[must_use]
    pub fn framebuffer(&self) -> &[u8] {
        self.tia.framebuffer()
    }

    #[must_use]
    pub fn framebuffer_width(&self) -> u32 {
        self.tia.width()
    }

    #[must_use]
    pub fn framebuffer_height(&self) -> u32 {
        self.tia.height()
    }

    #[must_use]
    pub fn cpu(&self) -> &Mos6507 {
        &self.cpu
    }

    #[must_use]
    pub fn tia(&self) -> &Tia {
        &self.tia
    }

    #[must_use]
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Mutable memory, for tests and debuggers that poke state directly.
    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }
}

const QUERY_PATHS: &[&str] = &[
    "cpu.<path>",
    "tia.<path>",
    "riot.<path>",
    "riot.intim",
    "memory.<addr>",
    "line_cycle",
    "ticks",
    "frame_count",
];

impl Observable for Atari2600 {
    fn query(&self, path: &str) -> Option<Value> {
        if let Some(rest) = path.strip_prefix("cpu.") {
            return self.cpu.query(rest);
        }
        if let Some(rest) = path.strip_prefix("tia.") {
            return self.tia.query(rest);
        }
        if path == "riot.intim" {
            return Some(self.memory.peek(INTIM).into());
        }
        if let Some(rest) = path.strip_prefix("riot.") {
            return self.riot.query(rest);
        }
        if let Some(addr) = path.strip_prefix("memory.") {
            return parse_address(addr).map(|a| self.memory.peek(a).into());
        }
        match path {
            "line_cycle" => Some(self.memory.line_cycle().into()),
            "ticks" => Some(self.ticks.get().into()),
            "frame_count" => Some(self.frame_count.into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        QUERY_PATHS
    }
}
