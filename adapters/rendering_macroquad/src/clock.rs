//! Fixed-timestep accounting for the render loop.

use std::time::Duration;

/// Upper bound on ticks run for a single presented frame.
///
/// Frames slower than this many tick intervals drop the excess time instead of
/// replaying it, so a long stall does not fast-forward the player.
pub const MAX_TICKS_PER_FRAME: u32 = 5;

/// Converts variable frame times into a whole number of fixed ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickClock {
    interval: Duration,
    accumulated: Duration,
}

impl TickClock {
    /// Creates a clock that emits one tick per `interval`.
    ///
    /// A zero interval is treated as one millisecond.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        let interval = if interval.is_zero() {
            Duration::from_millis(1)
        } else {
            interval
        };
        Self {
            interval,
            accumulated: Duration::ZERO,
        }
    }

    /// Nominal tick period.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Time carried over towards the next tick.
    #[must_use]
    pub const fn pending(&self) -> Duration {
        self.accumulated
    }

    /// Records `frame_time` and returns how many ticks are now due.
    pub fn advance(&mut self, frame_time: Duration) -> u32 {
        self.accumulated = self.accumulated.saturating_add(frame_time);

        let mut due = 0;
        while self.accumulated >= self.interval && due < MAX_TICKS_PER_FRAME {
            self.accumulated -= self.interval;
            due += 1;
        }
        if due == MAX_TICKS_PER_FRAME && self.accumulated >= self.interval {
            self.accumulated = Duration::ZERO;
        }
        due
    }
}
