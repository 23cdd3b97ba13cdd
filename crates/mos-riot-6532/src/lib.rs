//! MOS 6532 RIOT interval timer.
//!
//! Only the countdown is modelled. Port A/B are plain memory that the
//! input layer writes directly.

use emu_core::{Observable, Value};

/// Port A data (joystick directions).
pub const SWCHA: u16 = 0x0280;
/// Port B data (console switches).
pub const SWCHB: u16 = 0x0282;
/// Timer value.
pub const INTIM: u16 = 0x0284;
/// Timer interrupt flag, bit 7.
pub const TIMINT: u16 = 0x0285;
pub const TIM1T: u16 = 0x0294;
pub const TIM8T: u16 = 0x0295;
pub const TIM64T: u16 = 0x0296;
pub const T1024T: u16 = 0x0297;

/// Shared memory the timer counts in.
pub trait RiotBus {
    fn peek(&self, address: u16) -> u8;
    fn poke(&mut self, address: u16, value: u8);
}

/// TIMINT bit set once INTIM wraps past zero.
const TIMER_FLAG: u8 = 0x80;

/// Prescaler selected by a timer-start write.
const fn prescaler_for(address: u16) -> Option<u32> {
    match address {
        TIM1T => Some(1),
        TIM8T => Some(8),
        TIM64T => Some(64),
        T1024T => Some(1024),
        _ => None,
    }
}

/// Countdown state. INTIM itself lives in shared memory.
#[derive(Debug, Clone)]
pub struct Riot {
    /// CPU cycles per INTIM decrement.
    prescaler: u32,
    /// Cycles not yet worth a full decrement.
    accumulated: u32,
}

impl Riot {
    #[must_use]
    pub fn new() -> Self {
        Self {
            prescaler: 1024,
            accumulated: 0,
        }
    }

    #[must_use]
    pub fn prescaler(&self) -> u32 {
        self.prescaler
    }

    /// Handle a write into the RIOT block. Only the timer-start
    /// registers do anything.
    pub fn write<M: RiotBus>(&mut self, address: u16, memory: &mut M) {
        let Some(prescaler) = prescaler_for(address) else {
            return;
        };
        let value = memory.peek(address);
        self.prescaler = prescaler;
        self.accumulated = 0;
        memory.poke(INTIM, value);
        memory.poke(TIMINT, memory.peek(TIMINT) & !TIMER_FLAG);
        log::trace!("timer start: {value} x {prescaler}");
    }

    /// Count down for `cpu_cycles` elapsed cycles.
    pub fn tick<M: RiotBus>(&mut self, cpu_cycles: u8, memory: &mut M) {
        self.accumulated += u32::from(cpu_cycles);
        let decrements = self.accumulated / self.prescaler;
        self.accumulated %= self.prescaler;
        if decrements == 0 {
            return;
        }

        let intim = memory.peek(INTIM);
        let remaining = u32::from(intim);
        memory.poke(INTIM, intim.wrapping_sub(decrements as u8));

        if decrements > remaining {
            // Past zero the timer counts every cycle.
            self.prescaler = 1;
            memory.poke(TIMINT, memory.peek(TIMINT) | TIMER_FLAG);
        }
    }
}

impl Default for Riot {
    fn default() -> Self {
        Self::new()
    }
}

const QUERY_PATHS: &[&str] = &["prescaler", "accumulated"];

impl Observable for Riot {
    fn query(&self, path: &str) -> Option<Value> {
        match path {
            "prescaler" => Some(u64::from(self.prescaler).into()),
            "accumulated" => Some(u64::from(self.accumulated).into()),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        QUERY_PATHS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestBus([u8; 0x300]);

    impl RiotBus for TestBus {
        fn peek(&self, address: u16) -> u8 {
            self.0[usize::from(address)]
        }

        fn poke(&mut self, address: u16, value: u8) {
            self.0[usize::from(address)] = value;
        }
    }

    fn setup() -> (Riot, TestBus) {
        (Riot::new(), TestBus([0; 0x300]))
    }

    fn start(riot: &mut Riot, memory: &mut TestBus, register: u16, value: u8) {
        memory.poke(register, value);
        riot.write(register, memory);
    }

    #[test]
    fn powers_on_with_longest_interval() {
        let (riot, _) = setup();
        assert_eq!(riot.prescaler(), 1024);
        assert_eq!(riot.query("accumulated"), Some(Value::U64(0)));
    }

    #[test]
    fn timer_write_loads_intim_and_prescaler() {
        let (mut riot, mut memory) = setup();
        start(&mut riot, &mut memory, TIM64T, 0x2B);
        assert_eq!(memory.peek(INTIM), 0x2B);
        assert_eq!(riot.prescaler(), 64);
    }

    #[test]
    fn remainder_carries_between_ticks() {
        let (mut riot, mut memory) = setup();
        start(&mut riot, &mut memory, TIM8T, 10);

        riot.tick(5, &mut memory);
        assert_eq!(memory.peek(INTIM), 10);
        riot.tick(5, &mut memory);
        assert_eq!(memory.peek(INTIM), 9, "10 cycles is one decrement");
        riot.tick(6, &mut memory);
        assert_eq!(memory.peek(INTIM), 8);
    }

    #[test]
    fn underflow_sets_flag_and_counts_every_cycle() {
        let (mut riot, mut memory) = setup();
        start(&mut riot, &mut memory, TIM1T, 2);

        riot.tick(2, &mut memory);
        assert_eq!(memory.peek(INTIM), 0);
        assert_eq!(memory.peek(TIMINT) & TIMER_FLAG, 0);

        riot.tick(1, &mut memory);
        assert_eq!(memory.peek(INTIM), 0xFF);
        assert_ne!(memory.peek(TIMINT) & TIMER_FLAG, 0);
        assert_eq!(riot.prescaler(), 1);
    }

    #[test]
    fn underflow_from_long_interval_drops_to_single_cycle() {
        let (mut riot, mut memory) = setup();
        start(&mut riot, &mut memory, TIM64T, 0);
        riot.tick(64, &mut memory);
        assert_eq!(memory.peek(INTIM), 0xFF);
        assert_eq!(riot.prescaler(), 1);
        riot.tick(3, &mut memory);
        assert_eq!(memory.peek(INTIM), 0xFC);
    }

    #[test]
    fn new_timer_write_clears_flag() {
        let (mut riot, mut memory) = setup();
        start(&mut riot, &mut memory, TIM1T, 0);
        riot.tick(1, &mut memory);
        start(&mut riot, &mut memory, T1024T, 4);
        assert_eq!(memory.peek(TIMINT) & TIMER_FLAG, 0);
        assert_eq!(riot.prescaler(), 1024);
    }

    #[test]
    fn other_riot_writes_leave_timer_alone() {
        let (mut riot, mut memory) = setup();
        start(&mut riot, &mut memory, TIM8T, 7);
        start(&mut riot, &mut memory, SWCHA, 0x00);
        assert_eq!(riot.prescaler(), 8);
        assert_eq!(memory.peek(INTIM), 7);
    }
}
