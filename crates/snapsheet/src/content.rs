//! Hosting caller content inside the sheet.
//!
//! Content is opaque. Elements that are scrollable lists get the sheet's
//! scroll props injected and keep their own scroll state; anything else is
//! wrapped in a scroll container the sheet owns.

use smallvec::SmallVec;
use snapsheet_foundation::ScrollState;

/// Throttle for scroll position reports, in milliseconds.
pub const SCROLL_EVENT_THROTTLE_MS: u32 = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverScrollMode {
    Always,
    IfContentScrolls,
    Never,
}

/// Props the sheet pushes onto hosted lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollProps {
    pub scroll_enabled: bool,
    pub scroll_event_throttle_ms: u32,
    pub bounces: bool,
    pub over_scroll_mode: OverScrollMode,
    pub nested_scroll_enabled: bool,
    pub shows_vertical_scroll_indicator: bool,
}

impl ScrollProps {
    pub fn new(scroll_enabled: bool) -> Self {
        Self {
            scroll_enabled,
            scroll_event_throttle_ms: SCROLL_EVENT_THROTTLE_MS,
            bounces: false,
            over_scroll_mode: OverScrollMode::Never,
            nested_scroll_enabled: true,
            shows_vertical_scroll_indicator: true,
        }
    }
}

/// A list widget that scrolls on its own.
pub trait ScrollableList {
    /// State the sheet observes and locks. Listeners the caller already
    /// added stay in place.
    fn scroll_state(&self) -> ScrollState;

    fn apply_scroll_props(&mut self, props: ScrollProps);
}

/// One child of the sheet's content.
pub trait ContentElement {
    fn as_scrollable_list(&mut self) -> Option<&mut dyn ScrollableList> {
        None
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentArrangement {
    /// Exactly one child, and it is a list. Hosted directly.
    SingleList,
    /// Several children, at least one a list. Every list is injected.
    Lists,
    /// No lists. The sheet supplies its own scroll container.
    SheetScroll,
}

pub struct SheetContent {
    children: Vec<Box<dyn ContentElement>>,
    arrangement: ContentArrangement,
    own_scroll: Option<ScrollState>,
}

impl SheetContent {
    pub fn new(children: Vec<Box<dyn ContentElement>>) -> Self {
        let mut children = children;
        let lists = children
            .iter_mut()
            .filter_map(|child| child.as_scrollable_list())
            .count();
        let arrangement = match (children.len(), lists) {
            (1, 1) => ContentArrangement::SingleList,
            (_, 0) => ContentArrangement::SheetScroll,
            _ => ContentArrangement::Lists,
        };
        let own_scroll = (arrangement == ContentArrangement::SheetScroll).then(ScrollState::default);
        Self {
            children,
            arrangement,
            own_scroll,
        }
    }

    /// Content with no scrollable lists.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn single(child: impl ContentElement + 'static) -> Self {
        Self::new(vec![Box::new(child)])
    }

    pub fn arrangement(&self) -> ContentArrangement {
        self.arrangement
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// The sheet's own scroll container, present only for
    /// [`ContentArrangement::SheetScroll`].
    pub fn own_scroll(&self) -> Option<&ScrollState> {
        self.own_scroll.as_ref()
    }

    /// Every scroll state the sheet should lock and observe.
    pub fn scroll_states(&mut self) -> SmallVec<[ScrollState; 2]> {
        match &self.own_scroll {
            Some(own) => SmallVec::from_elem(own.clone(), 1),
            None => self
                .children
                .iter_mut()
                .filter_map(|child| child.as_scrollable_list().map(|list| list.scroll_state()))
                .collect(),
        }
    }

    /// Pushes props onto every hosted list.
    pub fn inject_scroll_props(&mut self, props: ScrollProps) {
        for child in self.children.iter_mut() {
            if let Some(list) = child.as_scrollable_list() {
                list.apply_scroll_props(props);
            }
        }
    }
}

impl Default for SheetContent {
    fn default() -> Self {
        Self::empty()
    }
}
