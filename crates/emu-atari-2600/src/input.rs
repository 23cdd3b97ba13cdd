//! Joysticks and console switches.
//!
//! Two layers:
//! 1. `Control`: a logical input and the port bit it drives.
//! 2. `InputQueue`: timed press/release events for scripted runs.

use std::collections::VecDeque;

use crate::map::{INPT4, INPT5, SWCHA, SWCHB};
use crate::memory::Memory;

/// Fire buttons read on bit 7.
const FIRE_BIT: u8 = 0x80;

/// A joystick direction, fire button or console switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    P0Up,
    P0Down,
    P0Left,
    P0Right,
    P0Fire,
    P1Up,
    P1Down,
    P1Left,
    P1Right,
    P1Fire,
    Reset,
    Select,
    /// Toggles player 0 difficulty on each press.
    P0Difficulty,
    /// Toggles player 1 difficulty on each press.
    P1Difficulty,
}

/// Where a control lives and how it reads.
enum Line {
    /// Held low while pressed.
    ActiveLow { address: u16, bit: u8 },
    /// Flipped on press, ignored on release.
    Toggle { address: u16, bit: u8 },
}

impl Control {
    const fn line(self) -> Line {
        use Line::{ActiveLow, Toggle};
        match self {
            Self::P0Right => ActiveLow { address: SWCHA, bit: 0x80 },
            Self::P0Left => ActiveLow { address: SWCHA, bit: 0x40 },
            Self::P0Down => ActiveLow { address: SWCHA, bit: 0x20 },
            Self::P0Up => ActiveLow { address: SWCHA, bit: 0x10 },
            Self::P1Right => ActiveLow { address: SWCHA, bit: 0x08 },
            Self::P1Left => ActiveLow { address: SWCHA, bit: 0x04 },
            Self::P1Down => ActiveLow { address: SWCHA, bit: 0x02 },
            Self::P1Up => ActiveLow { address: SWCHA, bit: 0x01 },
            Self::P0Fire => ActiveLow { address: INPT4, bit: FIRE_BIT },
            Self::P1Fire => ActiveLow { address: INPT5, bit: FIRE_BIT },
            Self::Reset => ActiveLow { address: SWCHB, bit: 0x01 },
            Self::Select => ActiveLow { address: SWCHB, bit: 0x02 },
            Self::P0Difficulty => Toggle { address: SWCHB, bit: 0x80 },
            Self::P1Difficulty => Toggle { address: SWCHB, bit: 0x40 },
        }
    }

    /// Update the port bit for a press or release.
    pub fn apply(self, memory: &mut Memory, pressed: bool) {
        match self.line() {
            Line::ActiveLow { address, bit } => {
                let current = memory.peek(address);
                let next = if pressed { current & !bit } else { current | bit };
                memory.poke(address, next);
            }
            Line::Toggle { address, bit } => {
                if pressed {
                    memory.poke(address, memory.peek(address) ^ bit);
                }
            }
        }
    }
}

/// A timed control event.
#[derive(Debug, Clone)]
pub struct InputEvent {
    /// Frame number at which this event fires.
    pub frame: u64,
    pub control: Control,
    /// True = press, false = release.
    pub pressed: bool,
}

/// Timed input queue, kept sorted by frame.
pub struct InputQueue {
    events: VecDeque<InputEvent>,
}

impl InputQueue {
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: VecDeque::new(),
        }
    }

    /// Enqueue a raw event after any others for the same frame.
    pub fn push(&mut self, event: InputEvent) {
        let pos = self
            .events
            .iter()
            .position(|e| e.frame > event.frame)
            .unwrap_or(self.events.len());
        self.events.insert(pos, event);
    }

    /// Enqueue a press and its release `hold_frames` later.
    pub fn enqueue(&mut self, control: Control, at_frame: u64, hold_frames: u64) {
        self.push(InputEvent {
            frame: at_frame,
            control,
            pressed: true,
        });
        self.push(InputEvent {
            frame: at_frame + hold_frames,
            control,
            pressed: false,
        });
    }

    /// Apply every event due by `frame`.
    pub fn process(&mut self, frame: u64, memory: &mut Memory) {
        while let Some(event) = self.events.pop_front() {
            if event.frame > frame {
                self.events.push_front(event);
                break;
            }
            event.control.apply(memory, event.pressed);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::SWCHB_DEFAULT;

    #[test]
    fn joystick_bits_are_active_low() {
        let mut memory = Memory::new();
        Control::P0Left.apply(&mut memory, true);
        Control::P1Up.apply(&mut memory, true);
        assert_eq!(memory.peek(SWCHA), 0xBE);
        Control::P0Left.apply(&mut memory, false);
        assert_eq!(memory.peek(SWCHA), 0xFE);
    }

    #[test]
    fn fire_buttons_use_bit_seven() {
        let mut memory = Memory::new();
        Control::P1Fire.apply(&mut memory, true);
        assert_eq!(memory.peek(INPT5), 0x00);
        assert_eq!(memory.peek(INPT4), 0x80);
        Control::P1Fire.apply(&mut memory, false);
        assert_eq!(memory.peek(INPT5), 0x80);
    }

    #[test]
    fn reset_and_select_switches() {
        let mut memory = Memory::new();
        Control::Reset.apply(&mut memory, true);
        Control::Select.apply(&mut memory, true);
        assert_eq!(memory.peek(SWCHB), SWCHB_DEFAULT & !0x03);
        Control::Reset.apply(&mut memory, false);
        assert_eq!(memory.peek(SWCHB), (SWCHB_DEFAULT & !0x03) | 0x01);
    }

    #[test]
    fn difficulty_toggles_on_press_only() {
        let mut memory = Memory::new();
        Control::P0Difficulty.apply(&mut memory, true);
        Control::P0Difficulty.apply(&mut memory, false);
        assert_eq!(memory.peek(SWCHB), SWCHB_DEFAULT | 0x80);
        Control::P0Difficulty.apply(&mut memory, true);
        assert_eq!(memory.peek(SWCHB), SWCHB_DEFAULT);
    }

    #[test]
    fn queue_applies_events_in_frame_order() {
        let mut queue = InputQueue::new();
        let mut memory = Memory::new();
        queue.enqueue(Control::P0Fire, 5, 3);
        assert_eq!(queue.len(), 2);

        queue.process(4, &mut memory);
        assert_eq!(memory.peek(INPT4), 0x80);

        queue.process(5, &mut memory);
        assert_eq!(memory.peek(INPT4), 0x00);

        queue.process(8, &mut memory);
        assert_eq!(memory.peek(INPT4), 0x80);
        assert!(queue.is_empty());
    }
}
