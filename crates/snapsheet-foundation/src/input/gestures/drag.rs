//! Vertical drag recogniser.
//!
//! Turns a raw pointer stream into the begin → update* → (end | cancel)
//! sequence the sheet's arbiter consumes. Translation is measured from the
//! press position, so it already includes the activation slop once the drag
//! starts.

use smallvec::{smallvec, SmallVec};

use crate::gesture_constants::MAX_FLING_VELOCITY;
use crate::input::{PointerEvent, PointerEventKind, PointerId};
use crate::velocity_tracker::VelocityTracker1D;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragPhase {
    Start,
    Update,
    End,
    Cancel,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragEvent {
    pub phase: DragPhase,
    /// Vertical distance from the press position; positive is downward.
    pub translation: f32,
    /// Release velocity in px/s. Only meaningful for [`DragPhase::End`].
    pub velocity: f32,
}

impl DragEvent {
    pub fn start(translation: f32) -> Self {
        Self {
            phase: DragPhase::Start,
            translation,
            velocity: 0.0,
        }
    }

    pub fn update(translation: f32) -> Self {
        Self {
            phase: DragPhase::Update,
            translation,
            velocity: 0.0,
        }
    }

    pub fn end(translation: f32, velocity: f32) -> Self {
        Self {
            phase: DragPhase::End,
            translation,
            velocity,
        }
    }

    pub fn cancel(translation: f32) -> Self {
        Self {
            phase: DragPhase::Cancel,
            translation,
            velocity: 0.0,
        }
    }
}

pub type DragEvents = SmallVec<[DragEvent; 2]>;

#[derive(Clone, Copy, Debug, PartialEq)]
enum DragState {
    Idle,
    Pressed { pointer: PointerId, down_y: f32 },
    Dragging { pointer: PointerId, down_y: f32, translation: f32 },
}

#[derive(Clone)]
pub struct DragGestureDetector {
    activation_slop: f32,
    max_velocity: f32,
    consume_events: bool,
    state: DragState,
    tracker: VelocityTracker1D,
}

impl DragGestureDetector {
    /// A recogniser that only starts after `activation_slop` px of travel.
    pub fn new(activation_slop: f32) -> Self {
        Self {
            activation_slop: activation_slop.max(0.0),
            max_velocity: MAX_FLING_VELOCITY,
            consume_events: true,
            state: DragState::Idle,
            tracker: VelocityTracker1D::new(),
        }
    }

    /// A recogniser that starts on touch down.
    pub fn immediate() -> Self {
        Self::new(0.0)
    }

    pub fn with_max_velocity(mut self, max_velocity: f32) -> Self {
        self.max_velocity = max_velocity;
        self
    }

    /// Leaves consumption to the caller, for touches shared with a scroll
    /// widget.
    pub fn without_consuming(mut self) -> Self {
        self.consume_events = false;
        self
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn is_pressed(&self) -> bool {
        !matches!(self.state, DragState::Idle)
    }

    pub fn reset(&mut self) {
        self.state = DragState::Idle;
        self.tracker.reset();
    }

    fn claim(&self, event: &PointerEvent) {
        if self.consume_events {
            event.consume();
        }
    }

    /// Feed one pointer event. Events for other pointers than the one that
    /// pressed first are ignored.
    pub fn on_event(&mut self, event: &PointerEvent) -> DragEvents {
        match (self.state, event.kind) {
            (DragState::Idle, PointerEventKind::Down) => {
                self.tracker.reset();
                self.tracker.add_data_point(event.uptime_ms, event.y);
                if self.activation_slop <= 0.0 {
                    self.state = DragState::Dragging {
                        pointer: event.id,
                        down_y: event.y,
                        translation: 0.0,
                    };
                    self.claim(event);
                    smallvec![DragEvent::start(0.0)]
                } else {
                    self.state = DragState::Pressed {
                        pointer: event.id,
                        down_y: event.y,
                    };
                    SmallVec::new()
                }
            }
            (DragState::Pressed { pointer, down_y }, PointerEventKind::Move) if pointer == event.id => {
                self.tracker.add_data_point(event.uptime_ms, event.y);
                let translation = event.y - down_y;
                if translation.abs() <= self.activation_slop {
                    return SmallVec::new();
                }
                self.state = DragState::Dragging {
                    pointer,
                    down_y,
                    translation,
                };
                self.claim(event);
                smallvec![DragEvent::start(translation), DragEvent::update(translation)]
            }
            (DragState::Dragging { pointer, down_y, .. }, PointerEventKind::Move) if pointer == event.id => {
                self.tracker.add_data_point(event.uptime_ms, event.y);
                let translation = event.y - down_y;
                self.state = DragState::Dragging {
                    pointer,
                    down_y,
                    translation,
                };
                self.claim(event);
                smallvec![DragEvent::update(translation)]
            }
            (DragState::Dragging { pointer, down_y, translation }, PointerEventKind::Up) if pointer == event.id => {
                let final_translation = event.y - down_y;
                if final_translation != translation {
                    self.tracker.add_data_point(event.uptime_ms, event.y);
                }
                let velocity = self.tracker.calculate_velocity_with_max(self.max_velocity);
                self.reset();
                self.claim(event);
                smallvec![DragEvent::end(final_translation, velocity)]
            }
            (DragState::Dragging { pointer, translation, .. }, PointerEventKind::Cancel) if pointer == event.id => {
                self.reset();
                smallvec![DragEvent::cancel(translation)]
            }
            (DragState::Pressed { pointer, .. }, PointerEventKind::Up | PointerEventKind::Cancel)
                if pointer == event.id =>
            {
                self.reset();
                SmallVec::new()
            }
            _ => SmallVec::new(),
        }
    }
}

impl Default for DragGestureDetector {
    fn default() -> Self {
        Self::immediate()
    }
}
