//! Fixed-interval wall-clock timer.

use std::thread;
use std::time::{Duration, Instant};

/// Fires once per `interval`, measured from a fixed schedule rather than from
/// the end of the previous tick.  If the caller falls more than one interval
/// behind, the schedule restarts from now instead of bursting to catch up.
#[derive(Debug)]
pub struct Ticker {
    interval: Duration,
    next:     Instant,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self { interval, next: Instant::now() + interval }
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Block until the next deadline, then schedule the one after it.
    pub fn wait(&mut self) {
        let now = Instant::now();
        if self.next > now {
            thread::sleep(self.next - now);
        }
        self.next += self.interval;

        let now = Instant::now();
        if self.next + self.interval < now {
            log::trace!("ticker fell behind; resynchronising");
            self.next = now + self.interval;
        }
    }
}
