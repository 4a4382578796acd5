//! Inner scroll enablement, driven by the settled snap index.
//!
//! The coordinator only flips [`ScrollState::set_enabled`]; the hosted scroll
//! widget is responsible for honouring it. It also records the latest scroll
//! position reported by any attached state so the arbiter can tell whether
//! content sits at its top edge.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use smallvec::SmallVec;
use snapsheet_foundation::{ScrollListenerId, ScrollState};

use crate::motion::SnapIndex;

struct Attached {
    state: ScrollState,
    listener: ScrollListenerId,
}

pub struct ScrollLockCoordinator {
    enabled: Cell<bool>,
    scroll_y: Rc<Cell<f32>>,
    attached: RefCell<SmallVec<[Attached; 2]>>,
}

impl ScrollLockCoordinator {
    /// Starts locked, matching a sheet that mounts closed.
    pub fn new() -> Self {
        Self {
            enabled: Cell::new(false),
            scroll_y: Rc::new(Cell::new(0.0)),
            attached: RefCell::new(SmallVec::new()),
        }
    }

    /// Tracks `state`: it receives the current lock and reports its position.
    pub fn attach(&self, state: &ScrollState) {
        let scroll_y = Rc::clone(&self.scroll_y);
        let listener = state.add_listener(move |value| scroll_y.set(value));
        state.set_enabled(self.enabled.get());
        self.scroll_y.set(state.value());
        self.attached.borrow_mut().push(Attached {
            state: state.clone(),
            listener,
        });
    }

    pub fn detach_all(&self) {
        for attached in self.attached.borrow_mut().drain(..) {
            attached.state.remove_listener(attached.listener);
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    /// Enables scrolling iff `index` is the most expanded index.
    pub fn apply(&self, index: SnapIndex, max_index: usize) -> bool {
        let enabled = index == SnapIndex::At(max_index);
        self.set_enabled(enabled);
        enabled
    }

    pub fn set_enabled(&self, enabled: bool) {
        if self.enabled.replace(enabled) != enabled {
            log::debug!("inner scroll {}", if enabled { "unlocked" } else { "locked" });
        }
        for attached in self.attached.borrow().iter() {
            attached.state.set_enabled(enabled);
        }
    }

    /// Scrolls every attached state back to the top.
    pub fn reset_position(&self) {
        let states: SmallVec<[ScrollState; 2]> = self
            .attached
            .borrow()
            .iter()
            .map(|attached| attached.state.clone())
            .collect();
        for state in states {
            state.scroll_to(0.0);
        }
        self.scroll_y.set(0.0);
    }

    pub fn scroll_position(&self) -> f32 {
        self.scroll_y.get()
    }
}

impl Default for ScrollLockCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ScrollLockCoordinator {
    fn drop(&mut self) {
        self.detach_all();
    }
}
