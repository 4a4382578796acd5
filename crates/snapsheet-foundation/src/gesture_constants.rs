//! Shared gesture constants for touch/pointer handling.
//!
//! Values are in logical pixels (or logical pixels per second).

/// Touch slop for taps: moving further than this from the press position
/// cancels the tap.
pub const DRAG_THRESHOLD: f32 = 8.0;

/// Vertical travel before a content drag activates.
///
/// Shorter movements stay with the hosted scroll widget, so small jitter on
/// a list never moves the sheet.
pub const CONTENT_ACTIVATION_SLOP: f32 = 10.0;

/// Maximum fling velocity in logical pixels per second.
pub const MAX_FLING_VELOCITY: f32 = 8_000.0;

/// Scroll offsets at or below this count as "at the top edge".
pub const SCROLL_TOP_THRESHOLD: f32 = 1.0;
