use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use snapsheet::{
    nearest_snap_index, DragEvent, GestureSource, SheetConfig, SnapIndex, SnapPoints, SnapSpec,
};
use snapsheet_testing::SheetTestRule;

const VIEWPORT: f32 = 1920.0;
const SNAP_COUNT_SAMPLES: &[usize] = &[3, 16];
const DRAG_UPDATES: usize = 120;

fn specs(count: usize) -> Vec<SnapSpec> {
    (1..=count)
        .map(|step| SnapSpec::percent(step as f32 * 90.0 / count as f32))
        .collect()
}

fn bench_nearest_snap(c: &mut Criterion) {
    let mut group = c.benchmark_group("nearest_snap_index");
    for &count in SNAP_COUNT_SAMPLES {
        let points = SnapPoints::resolve(&specs(count), VIEWPORT).expect("valid snap points");
        group.bench_with_input(BenchmarkId::new("snap_points", count), &points, |b, points| {
            let mut offset = points.expanded_offset();
            b.iter(|| {
                offset = if offset >= VIEWPORT { points.expanded_offset() } else { offset + 7.0 };
                black_box(nearest_snap_index(
                    points,
                    SnapIndex::At(count / 2),
                    black_box(offset),
                    black_box(-650.0),
                    500.0,
                ))
            });
        });
    }
    group.finish();
}

fn bench_handle_drag(c: &mut Criterion) {
    let mut group = c.benchmark_group("handle_drag");
    for &count in SNAP_COUNT_SAMPLES {
        group.bench_with_input(BenchmarkId::new("updates", DRAG_UPDATES), &count, |b, &count| {
            let config = SheetConfig::builder(specs(count)).build().expect("valid config");
            let mut rule = SheetTestRule::new(config, VIEWPORT).expect("valid sheet");
            rule.handle().expand();
            rule.wait_for_idle();

            b.iter(|| {
                let sheet = rule.sheet();
                sheet.drag(GestureSource::Handle, DragEvent::start(0.0));
                for step in 0..DRAG_UPDATES {
                    sheet.drag(GestureSource::Handle, DragEvent::update(step as f32 * 4.0));
                }
                sheet.drag(GestureSource::Handle, DragEvent::cancel(DRAG_UPDATES as f32 * 4.0));
                black_box(sheet.offset());
            });
        });
    }
    group.finish();
}

fn bench_settle(c: &mut Criterion) {
    let mut group = c.benchmark_group("settle");
    group.bench_function("collapse_expand", |b| {
        let config = SheetConfig::builder(specs(3)).build().expect("valid config");
        let mut rule = SheetTestRule::new(config, VIEWPORT).expect("valid sheet");
        b.iter(|| {
            rule.handle().collapse();
            let frames = rule.wait_for_idle();
            rule.handle().expand();
            black_box(frames + rule.wait_for_idle())
        });
    });
    group.finish();
}

criterion_group!(gestures, bench_nearest_snap, bench_handle_drag, bench_settle);
criterion_main!(gestures);
