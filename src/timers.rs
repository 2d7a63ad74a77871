use std::num::NonZeroU32;

/// Who advances the delay and sound timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerMode {
    /// `step` ticks the timers once every `steps_per_tick` instructions.
    Coupled { steps_per_tick: NonZeroU32 },
    /// `step` never ticks; the driver calls `Interpreter::tick_timers`.
    Driver,
}

impl Default for TimerMode {
    fn default() -> Self {
        Self::Coupled {
            steps_per_tick: NonZeroU32::MIN,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct Timers {
    pub delay: u8,
    pub sound: u8,
}

impl Timers {
    /// Decrements both timers, flooring at zero. Returns true when the
    /// sound timer ran out on this tick.
    pub fn tick(&mut self) -> bool {
        self.delay = self.delay.saturating_sub(1);
        let beep = self.sound == 1;
        self.sound = self.sound.saturating_sub(1);
        beep
    }
}
