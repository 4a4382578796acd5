//! Scripted walk through a meal-details sheet: open, drag between snap
//! points, scroll the list, pull it back down and swipe it away.
//!
//! Snap points may be given as arguments (`sheet-demo 30% 60% 92%`).

use std::cell::Cell;
use std::rc::Rc;

use anyhow::{bail, Context, Result};
use snapsheet::{
    BottomSheet, ContentElement, PointerEvent, ScrollProps, ScrollState, ScrollableList,
    SheetConfig, SheetContent, SnapSpec,
};
use snapsheet_core::{Runtime, Uptime, FRAME_NANOS_60HZ};

const VIEWPORT: f32 = 844.0;
const ROW_HEIGHT: f32 = 72.0;
const DEFAULT_SNAP_POINTS: [&str; 3] = ["25%", "50%", "90%"];

struct Ingredients {
    rows: Vec<&'static str>,
    state: ScrollState,
}

impl Ingredients {
    fn new() -> Self {
        let rows = vec![
            "Rolled oats", "Greek yoghurt", "Blueberries", "Honey", "Chia seeds", "Almond milk",
            "Walnuts", "Cinnamon", "Banana", "Pumpkin seeds", "Maple syrup", "Sea salt",
            "Raspberries", "Flax seeds",
        ];
        let state = ScrollState::default();
        state.set_max_value(rows.len() as f32 * ROW_HEIGHT);
        Self { rows, state }
    }
}

impl ScrollableList for Ingredients {
    fn scroll_state(&self) -> ScrollState {
        self.state.clone()
    }

    fn apply_scroll_props(&mut self, props: ScrollProps) {
        log::debug!(
            "ingredients list ({} rows): scroll {}",
            self.rows.len(),
            if props.scroll_enabled { "on" } else { "off" }
        );
    }
}

impl ContentElement for Ingredients {
    fn as_scrollable_list(&mut self) -> Option<&mut dyn ScrollableList> {
        Some(self)
    }
}

struct Script {
    runtime: Runtime,
    sheet: BottomSheet,
    list: ScrollState,
    frame_time: u64,
    clock_ms: i64,
}

impl Script {
    fn settle(&mut self, label: &str) -> Result<()> {
        let mut frames = 0;
        while self.runtime.needs_frame() || self.runtime.handle().has_pending_ui() {
            if frames > 600 {
                bail!("sheet did not settle after `{label}`");
            }
            self.frame_time += FRAME_NANOS_60HZ;
            self.runtime.run_frame(self.frame_time);
            frames += 1;
        }
        let frame = self.sheet.frame();
        println!(
            "{label:<28} index {:>6}  visible {:>6.1}  content {:>6.1}  backdrop {:.2}  scroll {}",
            frame.snap_index.to_string(),
            frame.visible_height,
            frame.content_height,
            frame.backdrop_opacity,
            if frame.scroll_enabled { "on" } else { "off" },
        );
        log::debug!("`{label}` settled in {frames} frames");
        Ok(())
    }

    fn drag_handle(&mut self, distance: f32, step_ms: i64) {
        let from = self.sheet.offset();
        self.sheet.handle_pointer(&PointerEvent::down(from, self.clock_ms));
        for step in 1..=5 {
            self.clock_ms += step_ms;
            let y = from + distance * step as f32 / 5.0;
            self.sheet.handle_pointer(&PointerEvent::moved(y, self.clock_ms));
        }
        self.sheet
            .handle_pointer(&PointerEvent::up(from + distance, self.clock_ms));
        self.clock_ms += 200;
    }

    fn drag_content(&mut self, from: f32, distance: f32) {
        self.sheet.content_pointer(&PointerEvent::down(from, self.clock_ms));
        for step in 1..=5 {
            self.clock_ms += 16;
            let y = from + distance * step as f32 / 5.0;
            let event = PointerEvent::moved(y, self.clock_ms);
            self.sheet.content_pointer(&event);
            if !event.is_consumed() {
                // The list scrolls opposite to the finger.
                self.list.dispatch_raw_delta(-distance / 5.0);
            }
        }
        self.clock_ms += 80;
        self.sheet
            .content_pointer(&PointerEvent::moved(from + distance, self.clock_ms));
        self.sheet
            .content_pointer(&PointerEvent::up(from + distance, self.clock_ms));
        self.clock_ms += 200;
    }
}

fn snap_points_from_args() -> Result<Vec<SnapSpec>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let specs = if args.is_empty() {
        SnapSpec::parse_list(&DEFAULT_SNAP_POINTS)
    } else {
        SnapSpec::parse_list(&args)
    };
    specs.context("invalid snap points")
}

fn main() -> Result<()> {
    #[cfg(feature = "logging")]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let uptime = Uptime::start();
    let snap_points = snap_points_from_args()?;
    println!(
        "=== Meal details sheet: {} ===",
        snap_points
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" / ")
    );

    let config = SheetConfig::builder(snap_points)
        .backdrop_opacity(0.4)
        .build()
        .context("invalid sheet configuration")?;

    let ingredients = Ingredients::new();
    let list = ingredients.state.clone();
    let runtime = Runtime::default();
    let sheet = BottomSheet::new(
        config,
        VIEWPORT,
        SheetContent::single(ingredients),
        runtime.handle(),
    )
    .context("failed to mount sheet")?;

    sheet.on_snap_point_change(|index| log::info!("snapped to {index}"));
    let closes = Rc::new(Cell::new(0));
    {
        let closes = Rc::clone(&closes);
        sheet.on_close(move || {
            closes.set(closes.get() + 1);
            log::info!("sheet closed");
        });
    }

    let handle = sheet.handle();
    let mut script = Script {
        runtime,
        sheet,
        list,
        frame_time: 0,
        clock_ms: 0,
    };

    script.settle("mounted")?;
    handle.collapse();
    script.settle("collapse()")?;
    script.drag_handle(-180.0, 16);
    script.settle("slow drag up")?;
    handle.expand();
    script.settle("expand()")?;

    let top = script.sheet.offset() + 200.0;
    script.drag_content(top, -240.0);
    script.settle("scroll ingredients")?;
    println!("{:<28} list at {:.1}", "", script.list.value());
    script.drag_content(top, 240.0);
    script.settle("scroll back to top")?;
    script.drag_content(top, 160.0);
    script.settle("pull sheet down")?;

    handle.snap_to_position(120.0);
    script.settle("snap_to_position(120)")?;
    script.drag_handle(90.0, 8);
    script.settle("swipe down")?;

    if closes.get() != 1 {
        log::warn!("swipe did not dismiss the sheet");
    }
    println!("Done in {} ms, current index {}", uptime.millis(), handle.get_current_index());
    Ok(())
}
