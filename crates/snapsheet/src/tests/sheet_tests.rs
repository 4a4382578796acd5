use super::*;

use crate::config::{SnapSpec, HANDLE_HEIGHT};
use crate::content::{ContentElement, ScrollableList};
use crate::error::HapticError;
use crate::haptics::HapticStyle;
use snapsheet_core::{Runtime, FRAME_NANOS_60HZ};

const VIEWPORT: f32 = 800.0;

struct Harness {
    runtime: Runtime,
    sheet: BottomSheet,
    snaps: Rc<RefCell<Vec<usize>>>,
    closes: Rc<Cell<usize>>,
    frame_time: u64,
    clock_ms: i64,
}

impl Harness {
    fn new(config: SheetConfig, content: SheetContent) -> Self {
        let runtime = Runtime::default();
        let sheet =
            BottomSheet::new(config, VIEWPORT, content, runtime.handle()).expect("valid sheet");
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
        Self {
            runtime,
            sheet,
            snaps,
            closes,
            frame_time: 0,
            clock_ms: 0,
        }
    }

    fn basic() -> Self {
        Self::new(config(), SheetContent::empty())
    }

    fn advance(&mut self, frames: usize) {
        for _ in 0..frames {
            self.frame_time += FRAME_NANOS_60HZ;
            self.runtime.run_frame(self.frame_time);
        }
    }

    fn settle(&mut self) {
        let mut frames = 0;
        while self.runtime.needs_frame() && frames < 600 {
            self.advance(1);
            frames += 1;
        }
    }

    fn tick(&mut self, ms: i64) -> i64 {
        self.clock_ms += ms;
        self.clock_ms
    }

    /// Drags the handle from `from` by `distance`, pausing before release
    /// so the release velocity is zero.
    fn drag_handle_slowly(&mut self, from: f32, distance: f32) {
        let t = self.tick(0);
        self.sheet.handle_pointer(&PointerEvent::down(from, t));
        for step in 1..=5 {
            let t = self.tick(16);
            self.sheet
                .handle_pointer(&PointerEvent::moved(from + distance * step as f32 / 5.0, t));
        }
        let t = self.tick(60);
        self.sheet.handle_pointer(&PointerEvent::moved(from + distance, t));
        let t = self.tick(10);
        self.sheet.handle_pointer(&PointerEvent::up(from + distance, t));
    }

    fn snaps(&self) -> Vec<usize> {
        self.snaps.borrow().clone()
    }
}

fn config() -> SheetConfig {
    SheetConfig::builder([SnapSpec::px(100.0), SnapSpec::px(300.0), SnapSpec::px(500.0)])
        .build()
        .expect("valid config")
}

struct List {
    state: ScrollState,
    props: Rc<RefCell<Vec<ScrollProps>>>,
}

impl ScrollableList for List {
    fn scroll_state(&self) -> ScrollState {
        self.state.clone()
    }

    fn apply_scroll_props(&mut self, props: ScrollProps) {
        self.props.borrow_mut().push(props);
    }
}

impl ContentElement for List {
    fn as_scrollable_list(&mut self) -> Option<&mut dyn ScrollableList> {
        Some(self)
    }
}

#[derive(Default)]
struct RecordingHaptics {
    played: RefCell<Vec<HapticStyle>>,
    fail: bool,
}

impl HapticFeedback for RecordingHaptics {
    fn perform(&self, style: HapticStyle) -> Result<(), HapticError> {
        self.played.borrow_mut().push(style);
        if self.fail {
            Err(HapticError::Unavailable)
        } else {
            Ok(())
        }
    }
}

#[test]
fn mounts_fully_hidden() {
    let harness = Harness::basic();
    let frame = harness.sheet.frame();
    assert_eq!(frame.offset, VIEWPORT);
    assert_eq!(frame.visible_height, 0.0);
    assert_eq!(frame.content_height, 0.0);
    assert_eq!(frame.backdrop_opacity, 0.0);
    assert!(!frame.backdrop_intercepts_touches);
    assert_eq!(frame.snap_index, SnapIndex::Closed);
    assert!(!frame.scroll_enabled);
    assert_eq!(harness.sheet.handle().get_current_index(), -1);
}

#[test]
fn initial_snap_index_is_applied_without_animation() {
    let config = SheetConfig::builder([SnapSpec::px(100.0), SnapSpec::px(300.0)])
        .initial_snap_index(1)
        .build()
        .expect("valid config");
    let mut harness = Harness::new(config, SheetContent::empty());
    assert_eq!(harness.sheet.offset(), 500.0);
    assert!(!harness.sheet.frame().is_animating);
    assert!(harness.sheet.scroll_enabled());

    // Callbacks registered after mount still hear about the initial snap.
    harness.advance(1);
    assert_eq!(harness.snaps(), vec![1]);
}

#[test]
fn snap_to_index_reports_once_and_settles() {
    let mut harness = Harness::basic();
    let handle = harness.sheet.handle();
    assert!(handle.snap_to_index(1));
    assert_eq!(handle.get_current_index(), 1);
    harness.settle();

    assert_eq!(harness.snaps(), vec![1]);
    assert_eq!(harness.sheet.offset(), 500.0);
    let frame = harness.sheet.frame();
    assert_eq!(frame.visible_height, 300.0);
    assert_eq!(frame.content_height, 300.0 - HANDLE_HEIGHT);
}

#[test]
fn out_of_range_index_is_silently_ignored() {
    let mut harness = Harness::basic();
    let handle = harness.sheet.handle();
    handle.snap_to_index(0);
    harness.settle();
    harness.snaps.borrow_mut().clear();

    assert!(!handle.snap_to_index(7));
    harness.settle();
    assert_eq!(handle.get_current_index(), 0);
    assert!(harness.snaps().is_empty());
    assert_eq!(harness.sheet.offset(), 700.0);
}

#[test]
fn second_snap_before_delivery_reports_only_the_second_index() {
    let mut harness = Harness::basic();
    let handle = harness.sheet.handle();
    handle.snap_to_index(1);
    handle.snap_to_index(2);
    harness.settle();

    assert_eq!(handle.get_current_index(), 2);
    assert_eq!(harness.sheet.offset(), 300.0);
    assert_eq!(harness.snaps(), vec![2]);
}

#[test]
fn close_fires_on_close_once_and_resets_index() {
    let mut harness = Harness::basic();
    let handle = harness.sheet.handle();
    handle.expand();
    harness.settle();

    handle.close();
    assert_eq!(handle.get_current_index(), 2);
    assert!(!harness.sheet.scroll_enabled());
    harness.settle();

    assert_eq!(harness.closes.get(), 1);
    assert_eq!(handle.get_current_index(), SnapIndex::CLOSED_SENTINEL);
    assert_eq!(harness.sheet.offset(), VIEWPORT);
    harness.advance(30);
    assert_eq!(harness.closes.get(), 1);
}

#[test]
fn superseded_close_never_reports() {
    let mut harness = Harness::basic();
    let handle = harness.sheet.handle();
    handle.expand();
    harness.settle();

    handle.close();
    harness.advance(4);
    handle.collapse();
    harness.settle();

    assert_eq!(harness.closes.get(), 0);
    assert_eq!(handle.get_current_index(), 0);
    assert_eq!(harness.sheet.offset(), 700.0);
}

#[test]
fn scroll_lock_follows_collapse_and_expand() {
    let mut harness = Harness::basic();
    let handle = harness.sheet.handle();
    handle.collapse();
    assert!(!harness.sheet.scroll_enabled());
    handle.expand();
    assert!(harness.sheet.scroll_enabled());
    handle.collapse();
    harness.settle();
    assert!(!harness.sheet.scroll_enabled());
}

#[test]
fn hosted_list_receives_lock_through_props_and_state() {
    let state = ScrollState::default();
    let props = Rc::new(RefCell::new(Vec::new()));
    let list = List {
        state: state.clone(),
        props: Rc::clone(&props),
    };
    let harness = Harness::new(config(), SheetContent::single(list));
    assert_eq!(harness.sheet.content_arrangement(), ContentArrangement::SingleList);
    assert!(!state.is_enabled());

    harness.sheet.handle().expand();
    assert!(state.is_enabled());
    assert_eq!(props.borrow().last(), Some(&ScrollProps::new(true)));

    harness.sheet.handle().collapse();
    assert!(!state.is_enabled());
    assert_eq!(props.borrow().last(), Some(&ScrollProps::new(false)));
}

#[test]
fn close_locks_list_as_soon_as_it_starts() {
    let state = ScrollState::default();
    let props = Rc::new(RefCell::new(Vec::new()));
    let list = List {
        state: state.clone(),
        props: Rc::clone(&props),
    };
    let mut harness = Harness::new(config(), SheetContent::single(list));
    harness.sheet.handle().expand();
    harness.settle();
    assert!(state.is_enabled());

    harness.sheet.handle().close();
    assert!(harness.runtime.needs_frame());
    assert!(!state.is_enabled());
    assert_eq!(props.borrow().last(), Some(&ScrollProps::new(false)));

    harness.settle();
    harness.sheet.handle().snap_to_index(1);
    assert!(!state.is_enabled());
    harness.sheet.handle().snap_to_index(2);
    assert!(state.is_enabled());
    assert_eq!(props.borrow().last(), Some(&ScrollProps::new(true)));
}

#[test]
fn closing_resets_list_scroll_position() {
    let state = ScrollState::default();
    state.set_max_value(2_000.0);
    let list = List {
        state: state.clone(),
        props: Rc::new(RefCell::new(Vec::new())),
    };
    let mut harness = Harness::new(config(), SheetContent::single(list));
    harness.sheet.handle().expand();
    harness.settle();
    state.dispatch_raw_delta(640.0);
    assert_eq!(state.value(), 640.0);

    harness.sheet.handle().close();
    harness.settle();
    assert_eq!(state.value(), 0.0);
}

#[test]
fn handle_drag_moves_sheet_and_snaps_to_closest() {
    let mut harness = Harness::basic();
    harness.sheet.handle().snap_to_index(1);
    harness.settle();
    harness.snaps.borrow_mut().clear();

    // 500 → 370: visible 430, closest to the 500 px snap.
    harness.drag_handle_slowly(500.0, -130.0);
    assert_eq!(harness.sheet.current_index(), SnapIndex::At(2));
    harness.settle();
    assert_eq!(harness.sheet.offset(), 300.0);
    assert_eq!(harness.snaps(), vec![2]);
}

#[test]
fn hidden_handle_ignores_pointer_and_gives_content_full_height() {
    let config = SheetConfig::builder([SnapSpec::px(300.0)])
        .show_handle(false)
        .build()
        .expect("valid config");
    let mut harness = Harness::new(config, SheetContent::empty());
    harness.sheet.handle().expand();
    harness.settle();

    assert_eq!(
        harness.sheet.handle_pointer(&PointerEvent::down(500.0, 0)),
        Disposition::Ignored
    );
    let frame = harness.sheet.frame();
    assert_eq!(frame.content_height, 300.0);
    assert!(!frame.show_handle);
}

#[test]
fn content_drag_on_partial_sheet_consumes_events() {
    let mut harness = Harness::basic();
    harness.sheet.handle().snap_to_index(0);
    harness.settle();

    harness.sheet.content_pointer(&PointerEvent::down(750.0, 0));
    let early = PointerEvent::moved(745.0, 16);
    assert_eq!(
        harness.sheet.content_pointer(&early),
        Disposition::Passthrough { scroll_delta: 0.0 }
    );
    assert!(!early.is_consumed());

    let past_slop = PointerEvent::moved(700.0, 32);
    assert_eq!(harness.sheet.content_pointer(&past_slop), Disposition::Sheet);
    assert!(past_slop.is_consumed());
    assert_eq!(harness.sheet.offset(), 650.0);
    assert!(harness.sheet.motion_state().is_dragging);
    assert_eq!(harness.sheet.motion_state().gesture_start_offset, Some(700.0));
}

#[test]
fn expanded_sheet_scrolls_its_own_container() {
    let mut harness = Harness::basic();
    let own = harness.sheet.own_scroll().expect("sheet scroll");
    own.set_max_value(1_000.0);
    harness.sheet.handle().expand();
    harness.settle();

    harness.sheet.content_pointer(&PointerEvent::down(600.0, 0));
    harness.sheet.content_pointer(&PointerEvent::moved(580.0, 16));
    let scroll = PointerEvent::moved(500.0, 32);
    assert!(matches!(
        harness.sheet.content_pointer(&scroll),
        Disposition::Passthrough { .. }
    ));
    assert!(!scroll.is_consumed());
    assert_eq!(own.value(), 100.0);
    assert_eq!(harness.sheet.offset(), 300.0);
    assert_eq!(harness.sheet.motion_state().gesture_start_scroll, Some(0.0));
}

#[test]
fn scrolled_container_blocks_sheet_drag_until_next_gesture() {
    let mut harness = Harness::basic();
    let own = harness.sheet.own_scroll().expect("sheet scroll");
    own.set_max_value(1_000.0);
    harness.sheet.handle().expand();
    harness.settle();
    own.scroll_to(40.0);

    // Scroll back to the top and keep pulling down in the same gesture.
    harness.sheet.content_pointer(&PointerEvent::down(300.0, 0));
    harness.sheet.content_pointer(&PointerEvent::moved(320.0, 16));
    harness.sheet.content_pointer(&PointerEvent::moved(400.0, 32));
    harness.sheet.content_pointer(&PointerEvent::up(400.0, 48));
    assert_eq!(own.value(), 0.0);
    assert_eq!(harness.sheet.offset(), 300.0);

    // A fresh gesture at the top drags the sheet.
    harness.sheet.content_pointer(&PointerEvent::down(300.0, 100));
    let pull = PointerEvent::moved(360.0, 116);
    assert_eq!(harness.sheet.content_pointer(&pull), Disposition::Sheet);
    assert_eq!(harness.sheet.offset(), 360.0);
}

#[test]
fn backdrop_tap_closes_when_visible() {
    let mut harness = Harness::basic();
    harness.sheet.handle().expand();
    harness.settle();
    assert!(harness.sheet.frame().backdrop_intercepts_touches);

    harness.sheet.backdrop_pointer(&PointerEvent::down(50.0, 0));
    assert_eq!(
        harness.sheet.backdrop_pointer(&PointerEvent::up(50.0, 80)),
        BackdropAction::Dismiss
    );
    harness.settle();
    assert_eq!(harness.closes.get(), 1);
    assert_eq!(
        harness.sheet.backdrop_pointer(&PointerEvent::down(50.0, 200)),
        BackdropAction::PassThrough
    );
}

#[test]
fn backdrop_tap_without_dismissal_only_absorbs() {
    let config = SheetConfig::builder([SnapSpec::px(300.0)])
        .dismiss_on_backdrop_press(false)
        .build()
        .expect("valid config");
    let mut harness = Harness::new(config, SheetContent::empty());
    harness.sheet.handle().expand();
    harness.settle();

    harness.sheet.backdrop_pointer(&PointerEvent::down(50.0, 0));
    assert_eq!(
        harness.sheet.backdrop_pointer(&PointerEvent::up(50.0, 80)),
        BackdropAction::Consumed
    );
    harness.settle();
    assert_eq!(harness.closes.get(), 0);
}

#[test]
fn callbacks_may_reenter_the_handle() {
    let mut harness = Harness::basic();
    let handle = harness.sheet.handle();
    {
        let handle = handle.clone();
        harness.sheet.on_close(move || {
            handle.collapse();
        });
    }
    handle.expand();
    harness.settle();
    handle.close();
    harness.settle();

    assert_eq!(handle.get_current_index(), 0);
    assert_eq!(harness.sheet.offset(), 700.0);
}

#[test]
fn haptics_play_platform_style_on_snap_and_close() {
    let mut harness = Harness::basic();
    let haptics = Rc::new(RecordingHaptics::default());
    harness.sheet.set_haptics(haptics.clone());
    harness.sheet.set_platform(Platform::Ios);

    harness.sheet.handle().expand();
    harness.settle();
    harness.sheet.handle().close();
    harness.settle();

    assert_eq!(
        haptics.played.borrow().as_slice(),
        &[HapticStyle::MediumImpact, HapticStyle::MediumImpact]
    );
}

#[test]
fn failing_haptics_do_not_disturb_motion() {
    let mut harness = Harness::basic();
    harness.sheet.set_haptics(Rc::new(RecordingHaptics {
        fail: true,
        ..Default::default()
    }));
    harness.sheet.handle().expand();
    harness.settle();
    assert_eq!(harness.snaps(), vec![2]);
    assert_eq!(harness.sheet.offset(), 300.0);
}

#[test]
fn haptics_follow_registered_callbacks() {
    let runtime = Runtime::default();
    let sheet = BottomSheet::new(config(), VIEWPORT, SheetContent::empty(), runtime.handle())
        .expect("valid sheet");
    let haptics = Rc::new(RecordingHaptics::default());
    sheet.set_haptics(haptics.clone());
    let mut frame_time = 0;
    let mut settle = || {
        for _ in 0..600 {
            if !runtime.needs_frame() {
                break;
            }
            frame_time += FRAME_NANOS_60HZ;
            runtime.run_frame(frame_time);
        }
    };

    sheet.handle().expand();
    settle();
    sheet.handle().close();
    settle();
    assert!(haptics.played.borrow().is_empty());

    sheet.on_close(|| {});
    sheet.handle().expand();
    settle();
    assert!(haptics.played.borrow().is_empty());
    sheet.handle().close();
    settle();
    assert_eq!(haptics.played.borrow().len(), 1);
}

#[test]
fn disabled_haptics_stay_silent() {
    let config = SheetConfig::builder([SnapSpec::px(300.0)])
        .enable_haptic_feedback(false)
        .build()
        .expect("valid config");
    let mut harness = Harness::new(config, SheetContent::empty());
    let haptics = Rc::new(RecordingHaptics::default());
    harness.sheet.set_haptics(haptics.clone());
    harness.sheet.handle().expand();
    harness.settle();
    assert!(haptics.played.borrow().is_empty());
}

#[test]
fn viewport_change_re_resolves_percentages() {
    let config = SheetConfig::builder([SnapSpec::percent(50.0)])
        .build()
        .expect("valid config");
    let mut harness = Harness::new(config, SheetContent::empty());
    harness.sheet.handle().expand();
    harness.settle();
    assert_eq!(harness.sheet.offset(), 400.0);

    harness.sheet.set_viewport_height(600.0).expect("valid viewport");
    assert_eq!(harness.sheet.snap_points().heights(), &[300.0]);
    assert_eq!(harness.sheet.offset(), 300.0);
    assert_eq!(harness.snaps(), vec![0]);

    assert!(harness.sheet.set_viewport_height(-1.0).is_err());
}

#[test]
fn handle_outliving_sheet_is_inert() {
    let harness = Harness::basic();
    let handle = harness.sheet.handle();
    drop(harness);
    assert!(!handle.is_attached());
    assert!(!handle.expand());
    handle.close();
    assert_eq!(handle.get_current_index(), -1);
}
