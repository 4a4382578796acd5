use std::rc::Weak;

use crate::motion::SnapIndex;
use crate::sheet::SheetInner;

/// Imperative control surface for a mounted sheet.
///
/// Handles are cheap to clone and stay valid for the sheet's lifetime; after
/// the sheet is dropped every call is a no-op and the index reads as closed.
/// Calls return immediately; settles and closes are observed through the
/// sheet's callbacks.
#[derive(Clone)]
pub struct SheetHandle {
    inner: Weak<SheetInner>,
}

impl SheetHandle {
    pub(crate) fn new(inner: Weak<SheetInner>) -> Self {
        Self { inner }
    }

    pub fn is_attached(&self) -> bool {
        self.inner.strong_count() > 0
    }

    /// Springs to `index`. Returns `false`, changing nothing, when the index
    /// is out of range.
    pub fn snap_to_index(&self, index: usize) -> bool {
        self.inner
            .upgrade()
            .is_some_and(|inner| inner.snap_to_index(index))
    }

    /// Springs to an arbitrary visible height without changing the index.
    pub fn snap_to_position(&self, height: f32) {
        if let Some(inner) = self.inner.upgrade() {
            inner.snap_to_position(height);
        }
    }

    pub fn expand(&self) -> bool {
        self.inner.upgrade().is_some_and(|inner| inner.expand())
    }

    pub fn collapse(&self) -> bool {
        self.inner.upgrade().is_some_and(|inner| inner.collapse())
    }

    pub fn close(&self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.close();
        }
    }

    /// Settled index, or [`SnapIndex::CLOSED_SENTINEL`].
    pub fn get_current_index(&self) -> i32 {
        self.current_index().to_raw()
    }

    pub fn current_index(&self) -> SnapIndex {
        self.inner
            .upgrade()
            .map(|inner| inner.current_index())
            .unwrap_or(SnapIndex::Closed)
    }
}

impl std::fmt::Debug for SheetHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetHandle")
            .field("attached", &self.is_attached())
            .field("current_index", &self.current_index())
            .finish()
    }
}
