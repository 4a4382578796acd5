//! Foundation elements for snapsheet: pointer input, gesture recognisers,
//! velocity tracking and scroll state.

pub mod gesture_constants;
pub mod input;
pub mod scroll;
pub mod velocity_tracker;

pub use gesture_constants::*;
pub use input::gestures::{DragEvent, DragGestureDetector, DragPhase, TapGestureDetector};
pub use input::{PointerEvent, PointerEventKind, PointerId, PointerPhase};
pub use scroll::{ScrollListenerId, ScrollState};
pub use velocity_tracker::VelocityTracker1D;

pub mod prelude {
    pub use crate::gesture_constants::*;
    pub use crate::input::gestures::*;
    pub use crate::input::*;
    pub use crate::scroll::*;
    pub use crate::velocity_tracker::*;
}
