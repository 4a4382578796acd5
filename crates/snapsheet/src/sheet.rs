//! The bottom sheet: wires configuration, motion, gesture arbitration,
//! scroll lock, backdrop and content together on one runtime.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use snapsheet_core::RuntimeHandle;
use snapsheet_foundation::{
    DragEvent, DragGestureDetector, PointerEvent, ScrollState, CONTENT_ACTIVATION_SLOP,
};

use crate::arbiter::{ArbiterContext, Disposition, GestureArbiter, GestureSource, ReleasePolicy};
use crate::backdrop::{Backdrop, BackdropAction};
use crate::config::SheetConfig;
use crate::content::{ContentArrangement, ScrollProps, SheetContent};
use crate::error::SheetConfigError;
use crate::handle::SheetHandle;
use crate::haptics::{self, HapticFeedback, NoopHaptics, Platform};
use crate::motion::{MotionController, MotionEvent, MotionSpecs, MotionState, SnapIndex};
use crate::scroll_lock::ScrollLockCoordinator;
use crate::snap_points::{SnapPointResolver, SnapPoints};

/// Layout and paint inputs for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct SheetFrame {
    /// Translation of the sheet top from the viewport top.
    pub offset: f32,
    pub visible_height: f32,
    /// Height left for content below the handle, never negative.
    pub content_height: f32,
    pub backdrop_opacity: f32,
    pub backdrop_intercepts_touches: bool,
    pub snap_index: SnapIndex,
    pub is_dragging: bool,
    pub is_animating: bool,
    pub scroll_enabled: bool,
    pub show_handle: bool,
    pub handle_height: f32,
    pub background_color: Rc<str>,
    pub border_radius: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Notification {
    /// `generation` orders snap decisions; a notification still queued when
    /// a newer decision is made is dropped.
    SnapChanged { index: usize, generation: u64 },
    Closed,
}

#[derive(Default)]
struct SheetCallbacks {
    on_snap_point_change: Option<Rc<dyn Fn(usize)>>,
    on_close: Option<Rc<dyn Fn()>>,
}

pub(crate) struct SheetInner {
    config: SheetConfig,
    runtime: RuntimeHandle,
    resolver: RefCell<SnapPointResolver>,
    motion: MotionController,
    arbiter: RefCell<GestureArbiter>,
    scroll_lock: ScrollLockCoordinator,
    backdrop: RefCell<Backdrop>,
    content: RefCell<SheetContent>,
    handle_detector: RefCell<DragGestureDetector>,
    content_detector: RefCell<DragGestureDetector>,
    haptics: RefCell<Rc<dyn HapticFeedback>>,
    platform: Cell<Platform>,
    callbacks: RefCell<SheetCallbacks>,
    snap_generation: Cell<u64>,
    background_color: Rc<str>,
}

impl SheetInner {
    pub(crate) fn snap_to_index(&self, index: usize) -> bool {
        self.motion.snap_to(index, true)
    }

    pub(crate) fn snap_to_position(&self, height: f32) {
        self.motion.animate_to_position(height);
    }

    pub(crate) fn expand(&self) -> bool {
        let last = self.motion.snap_points().max_index();
        self.motion.snap_to(last, true)
    }

    pub(crate) fn collapse(&self) -> bool {
        self.motion.snap_to(0, true)
    }

    pub(crate) fn close(&self) {
        self.motion.close();
    }

    pub(crate) fn current_index(&self) -> SnapIndex {
        self.motion.current_index()
    }

    fn sync_scroll_lock(&self, index: SnapIndex) {
        let max_index = self.motion.snap_points().max_index();
        let enabled = self.scroll_lock.apply(index, max_index);
        self.content
            .borrow_mut()
            .inject_scroll_props(ScrollProps::new(enabled));
    }

    fn on_motion_event(self: &Rc<Self>, event: MotionEvent) {
        match event {
            MotionEvent::SnapChanged(index) => {
                self.sync_scroll_lock(SnapIndex::At(index));
                let generation = self.snap_generation.get() + 1;
                self.snap_generation.set(generation);
                self.notify(Notification::SnapChanged { index, generation });
            }
            MotionEvent::CloseStarted => self.sync_scroll_lock(SnapIndex::Closed),
            MotionEvent::Closed => {
                self.sync_scroll_lock(SnapIndex::Closed);
                self.scroll_lock.reset_position();
                self.notify(Notification::Closed);
            }
        }
    }

    /// Delivers on the runtime's UI queue so callbacks may re-enter the
    /// sheet through its handle.
    fn notify(self: &Rc<Self>, notification: Notification) {
        let weak = Rc::downgrade(self);
        self.runtime.enqueue_ui_task(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.deliver(notification);
            }
        }));
    }

    fn deliver(&self, notification: Notification) {
        if let Notification::SnapChanged { index, generation } = notification {
            if generation != self.snap_generation.get() {
                log::trace!("dropping superseded snap notification for {index}");
                return;
            }
        }
        match notification {
            Notification::SnapChanged { index, .. } => {
                let callback = self.callbacks.borrow().on_snap_point_change.clone();
                if let Some(callback) = callback {
                    self.play_haptics();
                    callback(index);
                }
            }
            Notification::Closed => {
                let callback = self.callbacks.borrow().on_close.clone();
                if let Some(callback) = callback {
                    self.play_haptics();
                    callback();
                }
            }
        }
    }

    fn play_haptics(&self) {
        if self.config.enable_haptic_feedback() {
            let backend = Rc::clone(&self.haptics.borrow());
            haptics::trigger(backend.as_ref(), self.platform.get());
        }
    }

    fn backdrop_opacity(&self) -> f32 {
        let offset = self.motion.offset();
        let points = self.motion.snap_points();
        self.backdrop.borrow().opacity(offset, &points)
    }

    fn drag(&self, source: GestureSource, event: DragEvent) -> Disposition {
        let disposition = {
            let ctx = ArbiterContext {
                motion: &self.motion,
                scroll_offset: self.scroll_lock.scroll_position(),
            };
            self.arbiter.borrow_mut().on_event(source, event, &ctx)
        };

        if let Disposition::Passthrough { scroll_delta } = disposition {
            if scroll_delta != 0.0 {
                let own_scroll = self.content.borrow().own_scroll().cloned();
                if let Some(own_scroll) = own_scroll {
                    own_scroll.dispatch_raw_delta(scroll_delta);
                }
            }
        }
        disposition
    }
}

/// A mounted bottom sheet.
///
/// The sheet mounts fully hidden. Drive it with pointer events from the
/// handle, content and backdrop areas, pump frames on its runtime, and read
/// [`BottomSheet::frame`] to lay it out.
pub struct BottomSheet {
    inner: Rc<SheetInner>,
}

impl BottomSheet {
    pub fn new(
        config: SheetConfig,
        viewport_height: f32,
        content: SheetContent,
        runtime: RuntimeHandle,
    ) -> Result<Self, SheetConfigError> {
        let mut resolver = SnapPointResolver::new(config.snap_points().to_vec());
        let points = resolver.resolve(viewport_height)?;

        let motion = MotionController::new(
            points,
            MotionSpecs {
                spring: config.spring(),
                close_timing: config.close_timing(),
                enable_over_drag: config.enable_over_drag(),
            },
            runtime.clone(),
        );
        let arbiter = GestureArbiter::new(ReleasePolicy {
            dismiss_on_swipe_down: config.dismiss_on_swipe_down(),
            velocity_threshold: config.snap_velocity_threshold(),
        });
        let backdrop = Backdrop::new(
            config.enable_backdrop(),
            config.backdrop_opacity(),
            config.dismiss_on_backdrop_press(),
        );

        let mut content = content;
        let scroll_lock = ScrollLockCoordinator::new();
        for state in content.scroll_states() {
            scroll_lock.attach(&state);
        }
        content.inject_scroll_props(ScrollProps::new(scroll_lock.is_enabled()));
        log::debug!(
            "mounting sheet: {} snap points, content {:?}",
            config.snap_points().len(),
            content.arrangement()
        );

        let background_color: Rc<str> = Rc::from(config.background_color());
        let inner = Rc::new(SheetInner {
            runtime,
            resolver: RefCell::new(resolver),
            motion,
            arbiter: RefCell::new(arbiter),
            scroll_lock,
            backdrop: RefCell::new(backdrop),
            content: RefCell::new(content),
            handle_detector: RefCell::new(DragGestureDetector::immediate()),
            content_detector: RefCell::new(
                DragGestureDetector::new(CONTENT_ACTIVATION_SLOP).without_consuming(),
            ),
            haptics: RefCell::new(Rc::new(NoopHaptics)),
            platform: Cell::new(Platform::current()),
            callbacks: RefCell::new(SheetCallbacks::default()),
            snap_generation: Cell::new(0),
            background_color,
            config,
        });

        let weak = Rc::downgrade(&inner);
        inner.motion.set_listener(move |event| {
            if let Some(inner) = weak.upgrade() {
                inner.on_motion_event(event);
            }
        });

        if let Some(index) = inner.config.initial_snap_index() {
            inner.motion.snap_to(index, false);
        }

        Ok(Self { inner })
    }

    pub fn on_snap_point_change(&self, callback: impl Fn(usize) + 'static) {
        self.inner.callbacks.borrow_mut().on_snap_point_change = Some(Rc::new(callback));
    }

    pub fn on_close(&self, callback: impl Fn() + 'static) {
        self.inner.callbacks.borrow_mut().on_close = Some(Rc::new(callback));
    }

    pub fn set_haptics(&self, backend: Rc<dyn HapticFeedback>) {
        *self.inner.haptics.borrow_mut() = backend;
    }

    pub fn set_platform(&self, platform: Platform) {
        self.inner.platform.set(platform);
    }

    /// Stable imperative handle backed by this sheet.
    pub fn handle(&self) -> SheetHandle {
        SheetHandle::new(Rc::downgrade(&self.inner))
    }

    pub fn config(&self) -> &SheetConfig {
        &self.inner.config
    }

    pub fn snap_points(&self) -> SnapPoints {
        self.inner.motion.snap_points().clone()
    }

    pub fn current_index(&self) -> SnapIndex {
        self.inner.current_index()
    }

    pub fn offset(&self) -> f32 {
        self.inner.motion.offset()
    }

    pub fn scroll_enabled(&self) -> bool {
        self.inner.scroll_lock.is_enabled()
    }

    pub fn content_arrangement(&self) -> ContentArrangement {
        self.inner.content.borrow().arrangement()
    }

    /// The sheet's own scroll container, when the content has no lists.
    pub fn own_scroll(&self) -> Option<ScrollState> {
        self.inner.content.borrow().own_scroll().cloned()
    }

    /// Pointer events over the handle area. The handle drags from touch down.
    pub fn handle_pointer(&self, event: &PointerEvent) -> Disposition {
        if !self.inner.config.show_handle() {
            return Disposition::Ignored;
        }
        let drags = self.inner.handle_detector.borrow_mut().on_event(event);
        let mut disposition = Disposition::Ignored;
        for drag in drags {
            disposition = self.inner.drag(GestureSource::Handle, drag);
        }
        disposition
    }

    /// Pointer events over the content area. Events the sheet takes are
    /// consumed so the hosted scroll widget skips them.
    pub fn content_pointer(&self, event: &PointerEvent) -> Disposition {
        let drags = self.inner.content_detector.borrow_mut().on_event(event);
        let mut disposition = Disposition::Passthrough { scroll_delta: 0.0 };
        for drag in drags {
            disposition = self.inner.drag(GestureSource::Content, drag);
            if disposition == Disposition::Sheet {
                event.consume();
            }
        }
        disposition
    }

    /// Pointer events over the backdrop.
    pub fn backdrop_pointer(&self, event: &PointerEvent) -> BackdropAction {
        let opacity = self.inner.backdrop_opacity();
        let action = self.inner.backdrop.borrow_mut().on_pointer(event, opacity);
        if action == BackdropAction::Dismiss {
            log::debug!("backdrop tap: closing");
            self.inner.close();
        }
        action
    }

    /// Feeds an already recognised drag event, for hosts with their own
    /// gesture recognisers.
    pub fn drag(&self, source: GestureSource, event: DragEvent) -> Disposition {
        self.inner.drag(source, event)
    }

    /// Re-resolves snap points for a new viewport height.
    pub fn set_viewport_height(&self, viewport_height: f32) -> Result<(), SheetConfigError> {
        let points = self.inner.resolver.borrow_mut().resolve(viewport_height)?;
        self.inner.motion.set_snap_points(points);
        Ok(())
    }

    pub fn motion_state(&self) -> MotionState {
        let arbiter = self.inner.arbiter.borrow();
        let session = arbiter.session();
        MotionState {
            offset: self.inner.motion.offset(),
            current_index: self.inner.motion.current_index(),
            is_dragging: arbiter.is_dragging_sheet(),
            gesture_start_offset: session.map(|session| session.start_offset),
            gesture_start_scroll: session.map(|session| session.start_scroll),
        }
    }

    pub fn frame(&self) -> SheetFrame {
        let inner = &self.inner;
        let offset = inner.motion.offset();
        let visible_height = inner.motion.snap_points().visible_height(offset);
        let handle_height = inner.config.handle_height();
        let backdrop_opacity = inner.backdrop_opacity();
        SheetFrame {
            offset,
            visible_height,
            content_height: (visible_height - handle_height).max(0.0),
            backdrop_opacity,
            backdrop_intercepts_touches: inner.backdrop.borrow().intercepts(backdrop_opacity),
            snap_index: inner.motion.current_index(),
            is_dragging: inner.arbiter.borrow().is_dragging_sheet(),
            is_animating: inner.motion.is_animating(),
            scroll_enabled: inner.scroll_lock.is_enabled(),
            show_handle: inner.config.show_handle(),
            handle_height,
            background_color: Rc::clone(&inner.background_color),
            border_radius: inner.config.border_radius(),
        }
    }
}

#[cfg(test)]
#[path = "tests/sheet_tests.rs"]
mod tests;
