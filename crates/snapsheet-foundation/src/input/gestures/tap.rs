//! Tap recogniser used for backdrop dismissal.

use crate::gesture_constants::DRAG_THRESHOLD;
use crate::input::{PointerEvent, PointerEventKind, PointerId};

#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct TapGestureDetector {
    pressed: Option<(PointerId, f32, f32)>,
}

impl TapGestureDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.pressed = None;
    }

    /// Returns `true` when `event` completes a tap.
    pub fn on_event(&mut self, event: &PointerEvent) -> bool {
        match event.kind {
            PointerEventKind::Down => {
                if self.pressed.is_none() {
                    self.pressed = Some((event.id, event.x, event.y));
                }
                false
            }
            PointerEventKind::Move => {
                if let Some((id, x, y)) = self.pressed {
                    let distance = (event.x - x).hypot(event.y - y);
                    if id == event.id && distance > DRAG_THRESHOLD {
                        self.pressed = None;
                    }
                }
                false
            }
            PointerEventKind::Up => match self.pressed.take() {
                Some((id, ..)) if id == event.id => !event.is_consumed(),
                other => {
                    self.pressed = other;
                    false
                }
            },
            PointerEventKind::Cancel => {
                self.pressed = None;
                false
            }
        }
    }
}
