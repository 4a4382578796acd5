//! Scroll state for content hosted inside a sheet.
//!
//! `ScrollState` is a pure scroll model: position, extent, an enabled flag
//! and listeners. It does not track gestures; whoever owns the gesture feeds
//! deltas through [`ScrollState::dispatch_raw_delta`].

use indexmap::IndexMap;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SCROLL_STATE_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScrollListenerId(u64);

type ScrollListener = Rc<dyn Fn(f32)>;

#[derive(Clone)]
pub struct ScrollState {
    inner: Rc<ScrollStateInner>,
}

struct ScrollStateInner {
    id: u64,
    value: Cell<f32>,
    /// content extent − viewport extent
    max_value: Cell<f32>,
    enabled: Cell<bool>,
    /// Invoked in registration order with the new offset.
    listeners: RefCell<IndexMap<ScrollListenerId, ScrollListener>>,
}

impl ScrollState {
    pub fn new(initial: f32) -> Self {
        Self {
            inner: Rc::new(ScrollStateInner {
                id: NEXT_SCROLL_STATE_ID.fetch_add(1, Ordering::Relaxed),
                value: Cell::new(initial.max(0.0)),
                max_value: Cell::new(f32::INFINITY),
                enabled: Cell::new(true),
                listeners: RefCell::new(IndexMap::new()),
            }),
        }
    }

    pub fn id(&self) -> u64 {
        self.inner.id
    }

    pub fn value(&self) -> f32 {
        self.inner.value.get()
    }

    pub fn max_value(&self) -> f32 {
        self.inner.max_value.get()
    }

    pub fn set_max_value(&self, max: f32) {
        let max = max.max(0.0);
        self.inner.max_value.set(max);
        if self.value() > max {
            self.set_value(max);
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.enabled.get()
    }

    /// Enables or disables user scrolling. Programmatic [`Self::scroll_to`]
    /// still works while disabled.
    pub fn set_enabled(&self, enabled: bool) {
        if self.inner.enabled.replace(enabled) != enabled {
            log::trace!("scroll state {} enabled = {}", self.inner.id, enabled);
        }
    }

    /// Applies a user scroll delta, clamped to `[0, max_value]`.
    /// Returns the delta actually consumed; zero while disabled.
    pub fn dispatch_raw_delta(&self, delta: f32) -> f32 {
        if !self.is_enabled() {
            return 0.0;
        }
        let current = self.value();
        let new_value = (current + delta).clamp(0.0, self.max_value());
        let consumed = new_value - current;
        if consumed.abs() > 0.001 {
            self.set_value(new_value);
        }
        consumed
    }

    /// Scrolls to `position` immediately.
    pub fn scroll_to(&self, position: f32) {
        let clamped = position.clamp(0.0, self.max_value());
        self.set_value(clamped);
    }

    pub fn add_listener(&self, listener: impl Fn(f32) + 'static) -> ScrollListenerId {
        let id = ScrollListenerId(NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed));
        self.inner
            .listeners
            .borrow_mut()
            .insert(id, Rc::new(listener));
        id
    }

    pub fn remove_listener(&self, id: ScrollListenerId) {
        self.inner.listeners.borrow_mut().shift_remove(&id);
    }

    fn set_value(&self, value: f32) {
        if (self.inner.value.replace(value) - value).abs() <= f32::EPSILON {
            return;
        }
        // Snapshot so listeners may add or remove listeners.
        let listeners: Vec<ScrollListener> =
            self.inner.listeners.borrow().values().cloned().collect();
        for listener in listeners {
            listener(value);
        }
    }
}

impl Default for ScrollState {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl std::fmt::Debug for ScrollState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollState")
            .field("id", &self.inner.id)
            .field("value", &self.value())
            .field("max_value", &self.max_value())
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl PartialEq for ScrollState {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}
