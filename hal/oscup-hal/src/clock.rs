//! Monotonic clock abstraction
//!
//! Time is counted in integer ticks of a fixed rate known at compile time.
//! Oscup peers run a 10 kHz timer (0.1 ms resolution).

use core::time::Duration;

/// Tick count since an arbitrary epoch
pub type Ticks = u64;

/// Monotonic, read-only tick source
pub trait Clock {
    /// Ticks per second
    const TICK_HZ: u32;

    /// Current tick count; never decreases
    fn now(&mut self) -> Ticks;

    /// Block until `now() >= deadline`
    ///
    /// The default implementation polls [`Clock::now`]. Hosts with a real
    /// sleep primitive should override it.
    fn wait_until(&mut self, deadline: Ticks) {
        while self.now() < deadline {
            core::hint::spin_loop();
        }
    }

    /// Convert a tick count to wall-clock time at this clock's rate
    fn ticks_to_duration(ticks: Ticks) -> Duration {
        let hz = u64::from(Self::TICK_HZ.max(1));
        let secs = ticks / hz;
        let rem = ticks % hz;
        Duration::from_secs(secs) + Duration::from_nanos(rem * 1_000_000_000 / hz)
    }
}
