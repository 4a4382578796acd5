//! Frame-driven animation for snapsheet.
//!
//! Provides time-based tweens with easing curves and mass/spring/damper
//! physics, both stepping on the runtime's frame clock.

mod animation;

pub use animation::*;
