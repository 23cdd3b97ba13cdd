//! Master clock configuration.

use crate::Ticks;

/// Crystal driving the whole machine.
///
/// The video chip runs at the crystal rate; the processor divides it by
/// three. Frame pacing in the front end is derived from here.
#[derive(Debug, Clone, Copy)]
pub struct MasterClock {
    /// Crystal frequency in Hz (`3_579_545` for NTSC).
    pub frequency_hz: u64,
}

impl MasterClock {
    /// NTSC colour-burst crystal.
    pub const NTSC: Self = Self::new(3_579_545);

    #[must_use]
    pub const fn new(frequency_hz: u64) -> Self {
        Self { frequency_hz }
    }

    /// Ticks per frame at the given frame rate (integer division).
    #[must_use]
    pub const fn ticks_per_frame(&self, frames_per_second: u64) -> Ticks {
        Ticks::new(self.frequency_hz / frames_per_second)
    }

    /// Wall-clock duration of `ticks` at this frequency.
    #[must_use]
    pub fn duration_of(&self, ticks: Ticks) -> std::time::Duration {
        let nanos = u128::from(ticks.get()) * 1_000_000_000 / u128::from(self.frequency_hz);
        std::time::Duration::from_nanos(nanos as u64)
    }
}
