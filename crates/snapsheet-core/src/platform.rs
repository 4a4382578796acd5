//! Platform abstraction traits for the sheet runtime.
//!
//! The host (a window loop, a mobile choreographer, a test harness) decides
//! when frames actually run. The runtime only asks for one.

/// Schedules frames on behalf of the runtime.
///
/// Implementations must be safe to use from multiple threads.
pub trait RuntimeScheduler: Send + Sync {
    /// Request that the host schedule a new frame.
    fn schedule_frame(&self);
}

/// Scheduler for hosts that poll [`crate::Runtime::needs_frame`] themselves.
#[derive(Default)]
pub struct DefaultScheduler;

impl RuntimeScheduler for DefaultScheduler {
    fn schedule_frame(&self) {}
}
