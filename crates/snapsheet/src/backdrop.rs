//! Dimmed backdrop behind the sheet.

use snapsheet_foundation::{PointerEvent, TapGestureDetector};

use crate::snap_points::SnapPoints;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackdropAction {
    /// Backdrop is transparent or disabled; the touch belongs to whatever is
    /// underneath.
    PassThrough,
    /// Touch absorbed.
    Consumed,
    /// A completed tap that should close the sheet.
    Dismiss,
}

#[derive(Clone, Debug)]
pub struct Backdrop {
    enabled: bool,
    max_opacity: f32,
    dismiss_on_press: bool,
    tap: TapGestureDetector,
}

impl Backdrop {
    pub fn new(enabled: bool, max_opacity: f32, dismiss_on_press: bool) -> Self {
        Self {
            enabled,
            max_opacity,
            dismiss_on_press,
            tap: TapGestureDetector::new(),
        }
    }

    /// Linear from `max_opacity` at the most expanded offset down to zero at
    /// the closed offset, clamped outside that range.
    pub fn opacity(&self, offset: f32, points: &SnapPoints) -> f32 {
        if !self.enabled {
            return 0.0;
        }
        let from = points.expanded_offset();
        let to = points.closed_offset();
        let span = to - from;
        if span <= 0.0 {
            return 0.0;
        }
        let fraction = ((offset - from) / span).clamp(0.0, 1.0);
        self.max_opacity * (1.0 - fraction)
    }

    pub fn intercepts(&self, opacity: f32) -> bool {
        self.enabled && opacity > 0.0
    }

    pub fn on_pointer(&mut self, event: &PointerEvent, opacity: f32) -> BackdropAction {
        if !self.intercepts(opacity) {
            self.tap.reset();
            return BackdropAction::PassThrough;
        }
        let tapped = self.tap.on_event(event);
        event.consume();
        if tapped && self.dismiss_on_press {
            BackdropAction::Dismiss
        } else {
            BackdropAction::Consumed
        }
    }
}
