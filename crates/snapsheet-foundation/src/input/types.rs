use std::cell::Cell;
use std::rc::Rc;

pub type PointerId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerPhase {
    Start,
    Move,
    End,
    Cancel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    Cancel,
}

impl PointerEventKind {
    pub fn phase(self) -> PointerPhase {
        match self {
            PointerEventKind::Down => PointerPhase::Start,
            PointerEventKind::Move => PointerPhase::Move,
            PointerEventKind::Up => PointerPhase::End,
            PointerEventKind::Cancel => PointerPhase::Cancel,
        }
    }
}

/// Pointer sample in sheet-local coordinates.
///
/// Consumption is shared between copies so a recogniser that claims the
/// event (the sheet taking over a content drag) can tell the hosted scroll
/// widget to leave it alone.
#[derive(Clone, Debug)]
pub struct PointerEvent {
    pub id: PointerId,
    pub kind: PointerEventKind,
    pub x: f32,
    pub y: f32,
    /// Milliseconds on the host's monotonic input clock.
    pub uptime_ms: i64,
    consumed: Rc<Cell<bool>>,
}

impl PointerEvent {
    pub fn new(kind: PointerEventKind, x: f32, y: f32, uptime_ms: i64) -> Self {
        Self {
            id: 0,
            kind,
            x,
            y,
            uptime_ms,
            consumed: Rc::new(Cell::new(false)),
        }
    }

    pub fn down(y: f32, uptime_ms: i64) -> Self {
        Self::new(PointerEventKind::Down, 0.0, y, uptime_ms)
    }

    pub fn moved(y: f32, uptime_ms: i64) -> Self {
        Self::new(PointerEventKind::Move, 0.0, y, uptime_ms)
    }

    pub fn up(y: f32, uptime_ms: i64) -> Self {
        Self::new(PointerEventKind::Up, 0.0, y, uptime_ms)
    }

    pub fn cancel(y: f32, uptime_ms: i64) -> Self {
        Self::new(PointerEventKind::Cancel, 0.0, y, uptime_ms)
    }

    pub fn with_id(mut self, id: PointerId) -> Self {
        self.id = id;
        self
    }

    pub fn phase(&self) -> PointerPhase {
        self.kind.phase()
    }

    /// Mark this event as consumed so later handlers skip it.
    pub fn consume(&self) {
        self.consumed.set(true);
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed.get()
    }
}
