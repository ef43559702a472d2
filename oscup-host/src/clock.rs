//! Wall-clock tick source

use std::thread;
use std::time::Instant;

use oscup_hal::{Clock, Ticks};

/// 10 kHz clock counted from construction
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    epoch: Instant,
}

impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

impl StdClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Clock for StdClock {
    const TICK_HZ: u32 = 10_000;

    fn now(&mut self) -> Ticks {
        let nanos = self.epoch.elapsed().as_nanos();
        let ticks = nanos * u128::from(Self::TICK_HZ) / 1_000_000_000;
        ticks.min(u128::from(Ticks::MAX)) as Ticks
    }

    fn wait_until(&mut self, deadline: Ticks) {
        let now = self.now();
        if deadline > now {
            thread::sleep(Self::ticks_to_duration(deadline - now));
        }
    }
}
