//! Headless sheet harness.
//!
//! [`SheetTestRule`] mounts a sheet on its own runtime, records every
//! callback, and scripts pointer streams against the handle, content and
//! backdrop areas with a deterministic clock.
//!
//! ```
//! use snapsheet::{SheetConfig, SnapSpec};
//! use snapsheet_testing::{Release, SheetTestRule};
//!
//! let config = SheetConfig::builder([SnapSpec::px(200.0), SnapSpec::px(500.0)])
//!     .build()
//!     .unwrap();
//! let mut rule = SheetTestRule::new(config, 800.0).unwrap();
//! rule.handle().collapse();
//! rule.wait_for_idle();
//! rule.drag_handle(-250.0, Release::Slow);
//! rule.wait_for_idle();
//! assert_eq!(rule.reported_snaps(), vec![0, 1]);
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use snapsheet::{
    BackdropAction, BottomSheet, Disposition, SheetConfig, SheetConfigError, SheetContent,
    SheetFrame, SheetHandle,
};
use snapsheet_core::{Runtime, FRAME_NANOS_60HZ};
use snapsheet_foundation::PointerEvent;

/// Frames [`SheetTestRule::wait_for_idle`] runs before giving up.
pub const MAX_IDLE_FRAMES: usize = 600;

/// Pointer moves per scripted drag.
const DRAG_STEPS: i64 = 5;

/// How a scripted drag lets go.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Release {
    /// Pause before lifting so the release velocity is zero.
    Slow,
    /// Lift while moving: the release velocity is about `distance × 20` px/s.
    Fling,
}

impl Release {
    fn step_ms(self) -> i64 {
        match self {
            Release::Slow => 16,
            Release::Fling => 10,
        }
    }
}

pub struct SheetTestRule {
    runtime: Runtime,
    sheet: BottomSheet,
    snaps: Rc<RefCell<Vec<usize>>>,
    closes: Rc<Cell<usize>>,
    frame_time_nanos: u64,
    clock_ms: i64,
}

impl SheetTestRule {
    /// Mounts a sheet with the sheet's own scroll container as content.
    pub fn new(config: SheetConfig, viewport_height: f32) -> Result<Self, SheetConfigError> {
        Self::with_content(config, viewport_height, SheetContent::empty())
    }

    pub fn with_content(
        config: SheetConfig,
        viewport_height: f32,
        content: SheetContent,
    ) -> Result<Self, SheetConfigError> {
        let runtime = Runtime::default();
        let sheet = BottomSheet::new(config, viewport_height, content, runtime.handle())?;

        let snaps = Rc::new(RefCell::new(Vec::new()));
        let closes = Rc::new(Cell::new(0));
        {
            let snaps = Rc::clone(&snaps);
            sheet.on_snap_point_change(move |index| snaps.borrow_mut().push(index));
        }
        {
            let closes = Rc::clone(&closes);
            sheet.on_close(move || closes.set(closes.get() + 1));
        }

        Ok(Self {
            runtime,
            sheet,
            snaps,
            closes,
            frame_time_nanos: 0,
            clock_ms: 0,
        })
    }

    pub fn sheet(&self) -> &BottomSheet {
        &self.sheet
    }

    pub fn handle(&self) -> SheetHandle {
        self.sheet.handle()
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn frame(&self) -> SheetFrame {
        self.sheet.frame()
    }

    pub fn offset(&self) -> f32 {
        self.sheet.offset()
    }

    pub fn visible_height(&self) -> f32 {
        self.sheet.frame().visible_height
    }

    /// Runs one 60 Hz frame: animations step, then callbacks are delivered.
    pub fn advance_frame(&mut self) {
        self.frame_time_nanos += FRAME_NANOS_60HZ;
        self.runtime.run_frame(self.frame_time_nanos);
    }

    pub fn advance_frames(&mut self, frames: usize) {
        for _ in 0..frames {
            self.advance_frame();
        }
    }

    /// Runs frames until nothing is scheduled. Returns the frames run.
    ///
    /// Panics if the sheet is still moving after [`MAX_IDLE_FRAMES`].
    pub fn wait_for_idle(&mut self) -> usize {
        let mut frames = 0;
        while self.runtime.needs_frame() || self.runtime.handle().has_pending_ui() {
            if frames == MAX_IDLE_FRAMES {
                panic!(
                    "sheet still busy after {MAX_IDLE_FRAMES} frames at offset {}",
                    self.sheet.offset()
                );
            }
            self.advance_frame();
            frames += 1;
        }
        log::trace!("idle after {frames} frames at offset {}", self.sheet.offset());
        frames
    }

    /// Indices reported to `on_snap_point_change`, oldest first.
    pub fn reported_snaps(&self) -> Vec<usize> {
        self.snaps.borrow().clone()
    }

    pub fn close_count(&self) -> usize {
        self.closes.get()
    }

    pub fn clear_reports(&mut self) {
        self.snaps.borrow_mut().clear();
        self.closes.set(0);
    }

    /// Drags the handle down by `distance` (negative drags up), starting
    /// from the sheet's current top edge.
    pub fn drag_handle(&mut self, distance: f32, release: Release) -> Disposition {
        let from = self.sheet.offset();
        let sheet = &self.sheet;
        Self::script_drag(&mut self.clock_ms, from, distance, release, |event| {
            sheet.handle_pointer(event)
        })
    }

    /// Drags inside the content area starting at `from_y`. Returns the
    /// disposition of the final event.
    pub fn drag_content(&mut self, from_y: f32, distance: f32, release: Release) -> Disposition {
        let sheet = &self.sheet;
        Self::script_drag(&mut self.clock_ms, from_y, distance, release, |event| {
            sheet.content_pointer(event)
        })
    }

    /// Presses and lifts on the backdrop. Returns the action of the lift.
    pub fn tap_backdrop(&mut self, y: f32) -> BackdropAction {
        let down = self.tick(0);
        self.sheet.backdrop_pointer(&PointerEvent::down(y, down));
        let up = self.tick(50);
        self.sheet.backdrop_pointer(&PointerEvent::up(y, up))
    }

    fn tick(&mut self, ms: i64) -> i64 {
        self.clock_ms += ms;
        self.clock_ms
    }

    fn script_drag(
        clock_ms: &mut i64,
        from: f32,
        distance: f32,
        release: Release,
        mut send: impl FnMut(&PointerEvent) -> Disposition,
    ) -> Disposition {
        let to = from + distance;
        send(&PointerEvent::down(from, *clock_ms));
        for step in 1..=DRAG_STEPS {
            *clock_ms += release.step_ms();
            let y = from + distance * step as f32 / DRAG_STEPS as f32;
            send(&PointerEvent::moved(y, *clock_ms));
        }
        if release == Release::Slow {
            // Longer than the velocity tracker's stop gap.
            *clock_ms += 60;
            send(&PointerEvent::moved(to, *clock_ms));
        }
        let disposition = send(&PointerEvent::up(to, *clock_ms));
        // Keep consecutive gestures apart in time.
        *clock_ms += 100;
        disposition
    }
}
