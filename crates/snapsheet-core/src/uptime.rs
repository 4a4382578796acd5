//! Monotonic input clock.
//!
//! Pointer samples are stamped in milliseconds since the clock was created,
//! which is what the velocity tracker consumes.

use web_time::Instant;

#[derive(Clone, Copy, Debug)]
pub struct Uptime {
    origin: Instant,
}

impl Uptime {
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Milliseconds elapsed since [`Uptime::start`].
    pub fn millis(&self) -> i64 {
        self.origin.elapsed().as_millis() as i64
    }

    /// Nanoseconds elapsed since [`Uptime::start`], suitable as a frame time.
    pub fn nanos(&self) -> u64 {
        self.origin.elapsed().as_nanos() as u64
    }
}

impl Default for Uptime {
    fn default() -> Self {
        Self::start()
    }
}
