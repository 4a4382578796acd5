//! Draggable multi-snap-point bottom sheet.
//!
//! A [`BottomSheet`] owns one vertical offset and moves it between resolved
//! snap heights with spring physics. Two gesture sources compete for that
//! offset: the handle always drags the sheet, while the content area hands
//! its touches to the sheet only when the hosted scroll widget is at its
//! top (or the sheet is not fully expanded). Inner scrolling is unlocked
//! only at the most expanded snap point.
//!
//! Everything runs on one [`snapsheet_core::Runtime`]: pump frames on it to
//! advance motion and deliver callbacks.
//!
//! ```no_run
//! use snapsheet::{BottomSheet, SheetConfig, SheetContent, SnapSpec};
//! use snapsheet_core::Runtime;
//!
//! # fn main() -> Result<(), snapsheet::SheetConfigError> {
//! let runtime = Runtime::default();
//! let config = SheetConfig::builder(SnapSpec::parse_list(&["25%", "50%", "90%"])?).build()?;
//! let sheet = BottomSheet::new(config, 844.0, SheetContent::empty(), runtime.handle())?;
//! sheet.on_snap_point_change(|index| println!("snapped to {index}"));
//! sheet.handle().expand();
//! runtime.run_frame(16_666_667);
//! # Ok(())
//! # }
//! ```

mod arbiter;
mod backdrop;
mod config;
mod content;
mod error;
mod handle;
mod haptics;
mod motion;
mod scroll_lock;
mod sheet;
mod snap_points;

pub use arbiter::{
    nearest_snap_index, ArbiterContext, ArbiterState, Disposition, GestureArbiter, GestureSession,
    GestureSource, Ownership, Release, ReleasePolicy,
};
pub use backdrop::{Backdrop, BackdropAction};
pub use config::{
    SheetConfig, SheetConfigBuilder, SnapSpec, DEFAULT_BACKDROP_OPACITY, DEFAULT_BACKGROUND_COLOR,
    DEFAULT_BORDER_RADIUS, DEFAULT_CLOSE_TIMING, DEFAULT_SNAP_VELOCITY_THRESHOLD, DEFAULT_SPRING,
    HANDLE_HEIGHT,
};
pub use content::{
    ContentArrangement, ContentElement, OverScrollMode, ScrollProps, ScrollableList, SheetContent,
    SCROLL_EVENT_THROTTLE_MS,
};
pub use error::{HapticError, SheetConfigError};
pub use handle::SheetHandle;
pub use haptics::{HapticFeedback, HapticStyle, NoopHaptics, Platform};
pub use motion::{
    resist_overdrag, MotionController, MotionEvent, MotionSpecs, MotionState, SnapIndex,
    Transition, OVERDRAG_RESISTANCE, OVERDRAG_SHORT_PULL_RATIO,
};
pub use scroll_lock::ScrollLockCoordinator;
pub use sheet::{BottomSheet, SheetFrame};
pub use snap_points::{SnapHeights, SnapPointResolver, SnapPoints, CACHED_VIEWPORTS};
pub use snapsheet_foundation::{DragEvent, DragPhase, PointerEvent, ScrollState};

pub mod prelude {
    pub use crate::{
        BottomSheet, ContentElement, Disposition, GestureSource, ScrollableList, SheetConfig,
        SheetContent, SheetHandle, SnapIndex, SnapSpec,
    };
}
