/// Monotonic millisecond tick as a wrapping 32-bit counter.
///
/// Elapsed time is always computed with wrapping subtraction, so comparisons
/// stay correct across the ~49.7 day rollover as long as the two instants are
/// less than one full period apart.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Millis(pub u32);

impl Millis {
    pub const ZERO: Self = Self(0);

    /// Truncates a 64-bit millisecond count (e.g. `embassy_time::Instant::as_millis`).
    pub const fn from_u64(ms: u64) -> Self {
        Self(ms as u32)
    }

    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Milliseconds from `earlier` to `self`.
    pub const fn since(self, earlier: Millis) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }

    pub const fn wrapping_add(self, ms: u32) -> Self {
        Self(self.0.wrapping_add(ms))
    }
}

/// One "last fired" slot of the schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntervalTimer {
    last: Millis,
}

impl IntervalTimer {
    pub const fn starting_at(now: Millis) -> Self {
        Self { last: now }
    }

    pub const fn last(self) -> Millis {
        self.last
    }

    pub const fn elapsed(self, now: Millis) -> u32 {
        now.since(self.last)
    }

    pub const fn is_due(self, now: Millis, interval_ms: u32) -> bool {
        self.elapsed(now) >= interval_ms
    }

    pub fn fire(&mut self, now: Millis) {
        self.last = now;
    }
}

/// Splits a duration into whole minutes and remaining seconds.
pub const fn minutes_seconds(ms: u32) -> (u32, u32) {
    let seconds = ms / 1_000;
    (seconds / 60, seconds % 60)
}
