//! Core runtime for snapsheet: a single-threaded frame loop with frame
//! callbacks and a deferred UI task queue.
//!
//! Everything a sheet instance does (gesture handling, spring stepping,
//! callback dispatch) runs on the thread that owns the [`Runtime`].

pub mod collections;
pub mod frame_clock;
pub mod platform;
pub mod runtime;
pub mod uptime;

pub type FrameCallbackId = u64;

pub use frame_clock::{FrameCallbackRegistration, FrameClock};
pub use platform::{DefaultScheduler, RuntimeScheduler};
pub use runtime::{Runtime, RuntimeHandle};
pub use uptime::Uptime;

/// Nanoseconds in one frame at 60 Hz.
pub const FRAME_NANOS_60HZ: u64 = 16_666_667;
