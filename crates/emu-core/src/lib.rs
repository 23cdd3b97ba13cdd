//! Shared plumbing for the Atari 2600 crates.
//!
//! The processor core only knows about [`Bus`]; the machine crate supplies
//! the address decoding. Timing is expressed in colour clocks of the NTSC
//! crystal, three per processor cycle.

mod bus;
mod clock;
mod cpu;
mod observable;
mod ticks;

pub use bus::{Bus, SimpleBus};
pub use clock::MasterClock;
pub use cpu::Cpu;
pub use observable::{Observable, Value, parse_address};
pub use ticks::Ticks;
