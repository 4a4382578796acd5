//! The sheet's single vertical offset and the transitions that move it.
//!
//! `offset` is the distance from the viewport top to the sheet top, so a
//! sheet resting at height `h` sits at `viewport − h` and a closed sheet at
//! `viewport`. Every mutation goes through a named transition; completion
//! side effects only run for transitions that finish uninterrupted.

use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use snapsheet_animation::{Animatable, AnimationEnd, AnimationSpec, AnimationType, SpringSpec};
use snapsheet_core::RuntimeHandle;

use crate::snap_points::SnapPoints;

/// Scale of the logarithmic resistance applied past the travel bounds.
pub const OVERDRAG_RESISTANCE: f32 = 10.0;

/// Largest share of a short overdrag that reaches the screen.
pub const OVERDRAG_SHORT_PULL_RATIO: f32 = 0.9;

/// Settled snap index, or closed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SnapIndex {
    #[default]
    Closed,
    At(usize),
}

impl SnapIndex {
    /// Raw value reported for a closed sheet.
    pub const CLOSED_SENTINEL: i32 = -1;

    pub fn to_raw(self) -> i32 {
        match self {
            SnapIndex::Closed => Self::CLOSED_SENTINEL,
            SnapIndex::At(index) => i32::try_from(index).unwrap_or(i32::MAX),
        }
    }

    pub fn index(self) -> Option<usize> {
        match self {
            SnapIndex::Closed => None,
            SnapIndex::At(index) => Some(index),
        }
    }

    pub fn is_closed(self) -> bool {
        self == SnapIndex::Closed
    }
}

impl fmt::Display for SnapIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapIndex::Closed => f.write_str("closed"),
            SnapIndex::At(index) => write!(f, "{index}"),
        }
    }
}

/// What is currently moving the offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Transition {
    Idle,
    /// Spring towards a snap index.
    Snapping(usize),
    /// Spring towards an arbitrary visible height.
    Positioning(f32),
    /// Timed transition to the closed offset.
    Closing,
    /// A gesture owns the offset.
    Dragging,
}

/// Side effects the sheet reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionEvent {
    /// A snap decision was made. Emitted once per `snap_to`.
    SnapChanged(usize),
    CloseStarted,
    /// A close transition completed.
    Closed,
}

/// Point-in-time view of the sheet's motion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionState {
    pub offset: f32,
    pub current_index: SnapIndex,
    pub is_dragging: bool,
    pub gesture_start_offset: Option<f32>,
    pub gesture_start_scroll: Option<f32>,
}

/// Compresses positions beyond `[min, max]` logarithmically, or clamps them
/// when overdrag is disabled.
///
/// The visible excess is `ln(excess + 1) × OVERDRAG_RESISTANCE`. Below about
/// 40 px that curve would outrun the finger, so it is capped at
/// `OVERDRAG_SHORT_PULL_RATIO` of the raw excess there.
pub fn resist_overdrag(raw: f32, min: f32, max: f32, enabled: bool) -> f32 {
    if raw < min {
        if enabled {
            min - compress(min - raw)
        } else {
            min
        }
    } else if raw > max {
        if enabled {
            max + compress(raw - max)
        } else {
            max
        }
    } else {
        raw
    }
}

fn compress(excess: f32) -> f32 {
    ((excess + 1.0).ln() * OVERDRAG_RESISTANCE).min(excess * OVERDRAG_SHORT_PULL_RATIO)
}

type MotionListener = Rc<dyn Fn(MotionEvent)>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionSpecs {
    pub spring: SpringSpec,
    pub close_timing: AnimationSpec,
    pub enable_over_drag: bool,
}

/// Owns the offset. Clones share state.
#[derive(Clone)]
pub struct MotionController {
    inner: Rc<MotionInner>,
}

struct MotionInner {
    offset: Animatable<f32>,
    points: RefCell<SnapPoints>,
    current_index: Cell<SnapIndex>,
    transition: Cell<Transition>,
    specs: MotionSpecs,
    listener: RefCell<Option<MotionListener>>,
}

impl MotionInner {
    fn emit(&self, event: MotionEvent) {
        let listener = self.listener.borrow().clone();
        if let Some(listener) = listener {
            listener(event);
        }
    }

    fn start_spring(this: &Rc<Self>, target: f32, transition: Transition) {
        this.transition.set(transition);
        let weak = Rc::downgrade(this);
        this.offset.animate_to(
            target,
            AnimationType::Spring(this.specs.spring),
            move |end| {
                if let Some(inner) = weak.upgrade() {
                    inner.on_spring_end(end, transition);
                }
            },
        );
    }

    fn on_spring_end(&self, end: AnimationEnd, transition: Transition) {
        if end.is_finished() && self.transition.get() == transition {
            log::trace!("settled at offset {}", self.offset.value());
            self.transition.set(Transition::Idle);
        }
    }

    fn start_close(this: &Rc<Self>) {
        this.transition.set(Transition::Closing);
        let target = this.points.borrow().closed_offset();
        let weak: Weak<Self> = Rc::downgrade(this);
        this.offset.animate_to(
            target,
            AnimationType::Tween(this.specs.close_timing),
            move |end| {
                if let Some(inner) = weak.upgrade() {
                    inner.on_close_end(end);
                }
            },
        );
    }

    fn on_close_end(&self, end: AnimationEnd) {
        if !end.is_finished() {
            log::trace!("close interrupted");
            return;
        }
        self.current_index.set(SnapIndex::Closed);
        self.transition.set(Transition::Idle);
        log::debug!("sheet closed");
        self.emit(MotionEvent::Closed);
    }
}

impl MotionController {
    /// Starts fully hidden at the closed offset.
    pub fn new(points: SnapPoints, specs: MotionSpecs, runtime: RuntimeHandle) -> Self {
        let closed = points.closed_offset();
        Self {
            inner: Rc::new(MotionInner {
                offset: Animatable::new(closed, AnimationType::Spring(specs.spring), runtime),
                points: RefCell::new(points),
                current_index: Cell::new(SnapIndex::Closed),
                transition: Cell::new(Transition::Idle),
                specs,
                listener: RefCell::new(None),
            }),
        }
    }

    pub fn set_listener(&self, listener: impl Fn(MotionEvent) + 'static) {
        *self.inner.listener.borrow_mut() = Some(Rc::new(listener));
    }

    pub fn offset(&self) -> f32 {
        self.inner.offset.value()
    }

    pub fn current_index(&self) -> SnapIndex {
        self.inner.current_index.get()
    }

    pub fn transition(&self) -> Transition {
        self.inner.transition.get()
    }

    pub fn is_animating(&self) -> bool {
        self.inner.offset.is_running()
    }

    pub fn is_dragging(&self) -> bool {
        self.transition() == Transition::Dragging
    }

    pub fn snap_points(&self) -> Ref<'_, SnapPoints> {
        self.inner.points.borrow()
    }

    pub fn specs(&self) -> MotionSpecs {
        self.inner.specs
    }

    /// Moves to snap `index`. Out-of-range indices are ignored and return
    /// `false`. The index and the change event update before this returns;
    /// the offset follows on later frames when `animated`.
    pub fn snap_to(&self, index: usize, animated: bool) -> bool {
        let Some(target) = self.snap_points().offset_for(index) else {
            log::debug!("ignoring snap to out-of-range index {index}");
            return false;
        };

        if animated {
            MotionInner::start_spring(&self.inner, target, Transition::Snapping(index));
        } else {
            self.inner.transition.set(Transition::Idle);
            self.inner.offset.snap_to(target);
        }
        self.inner.current_index.set(SnapIndex::At(index));
        log::debug!("snap to index {index} (offset {target}, animated {animated})");
        self.inner.emit(MotionEvent::SnapChanged(index));
        true
    }

    /// Runs the timed close transition. The index resets to closed only when
    /// it completes.
    pub fn close(&self) {
        log::debug!("closing from offset {}", self.offset());
        self.inner.emit(MotionEvent::CloseStarted);
        MotionInner::start_close(&self.inner);
    }

    /// Springs to an arbitrary visible height without touching the index.
    pub fn animate_to_position(&self, height: f32) {
        let (target, clamped) = {
            let points = self.snap_points();
            let viewport = points.viewport_height();
            let clamped = if height.is_nan() { 0.0 } else { height.clamp(0.0, viewport) };
            (viewport - clamped, clamped)
        };
        if clamped != height {
            log::debug!("position {height} clamped to {clamped}");
        }
        MotionInner::start_spring(&self.inner, target, Transition::Positioning(clamped));
    }

    /// Hands the offset to a gesture, freezing any transition in flight.
    /// Returns the offset the gesture starts from.
    pub fn begin_drag(&self) -> f32 {
        self.inner.offset.stop();
        self.inner.transition.set(Transition::Dragging);
        self.offset()
    }

    /// Moves the offset to `raw`, resisted past the travel bounds. Returns
    /// the visible offset.
    pub fn drag_to(&self, raw: f32) -> f32 {
        let (min, max) = {
            let points = self.snap_points();
            (points.expanded_offset(), points.closed_offset())
        };
        let visible = resist_overdrag(raw, min, max, self.inner.specs.enable_over_drag);
        self.inner.offset.snap_to(visible);
        log::trace!("drag raw {raw} -> offset {visible}");
        visible
    }

    /// Releases gesture ownership without choosing a destination.
    pub fn end_drag(&self) {
        if self.is_dragging() {
            self.inner.transition.set(Transition::Idle);
        }
    }

    /// Swaps in snap points resolved for a new viewport and re-seats the
    /// offset. No change events are emitted.
    pub fn set_snap_points(&self, points: SnapPoints) {
        *self.inner.points.borrow_mut() = points;

        match self.transition() {
            Transition::Dragging => {}
            Transition::Closing => MotionInner::start_close(&self.inner),
            Transition::Positioning(height) => self.animate_to_position(height),
            Transition::Snapping(index) => {
                let target = self.snap_points().offset_for(index);
                if let Some(target) = target {
                    MotionInner::start_spring(&self.inner, target, Transition::Snapping(index));
                }
            }
            Transition::Idle => {
                let target = {
                    let points = self.snap_points();
                    match self.current_index() {
                        SnapIndex::Closed => Some(points.closed_offset()),
                        SnapIndex::At(index) => points.offset_for(index),
                    }
                };
                if let Some(target) = target {
                    self.inner.offset.snap_to(target);
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/motion_tests.rs"]
mod tests;
