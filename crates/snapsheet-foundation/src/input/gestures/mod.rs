pub mod drag;
pub mod tap;

pub use drag::{DragEvent, DragEvents, DragGestureDetector, DragPhase};
pub use tap::TapGestureDetector;
