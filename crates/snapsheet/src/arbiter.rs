//! Decides which recogniser owns the sheet offset during a touch.
//!
//! The handle recogniser always drives the sheet. The content recogniser
//! shares its touches with the hosted scroll widget: it drives the sheet
//! right away when the sheet is not fully expanded, and otherwise only after
//! a downward drag starts with the content scrolled to its top.
//!
//! ```text
//! Idle ──handle start──▶ HandleDragging ──end/cancel──▶ Idle (release)
//!  │
//!  └──content start──▶ ContentDragging(NotOwningSheet) ──at top + down──▶
//!                      ContentDragging(OwningSheet) ──end/cancel──▶ Idle (release)
//! ```

use snapsheet_foundation::{DragEvent, DragPhase, SCROLL_TOP_THRESHOLD};

use crate::motion::{MotionController, SnapIndex};
use crate::snap_points::SnapPoints;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GestureSource {
    Handle,
    Content,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ownership {
    NotOwningSheet,
    OwningSheet,
}

/// Per-touch capture. Lives for one gesture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureSession {
    pub start_offset: f32,
    pub start_scroll: f32,
    pub last_translation: f32,
    pub release_velocity: Option<f32>,
}

impl GestureSession {
    fn new(start_offset: f32, start_scroll: f32) -> Self {
        Self {
            start_offset,
            start_scroll,
            last_translation: 0.0,
            release_velocity: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ArbiterState {
    Idle,
    HandleDragging(GestureSession),
    ContentDragging(GestureSession, Ownership),
}

/// What happened to an event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Disposition {
    /// The sheet used it; the scroll widget must not.
    Sheet,
    /// Left to the scroll widget. `scroll_delta` is the content scroll
    /// implied by the finger movement since the previous event.
    Passthrough { scroll_delta: f32 },
    /// Not part of any session the arbiter tracks.
    Ignored,
}

/// Where a release sent the sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Release {
    Snap(usize),
    Dismiss,
}

/// Inputs the arbiter reads but does not own.
pub struct ArbiterContext<'a> {
    pub motion: &'a MotionController,
    /// Latest content scroll position.
    pub scroll_offset: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReleasePolicy {
    pub dismiss_on_swipe_down: bool,
    /// Shared by swipe-to-dismiss and the adjacent-snap bias.
    pub velocity_threshold: f32,
}

/// Adjacent index in the direction of a fast release, otherwise the snap
/// height closest to the visible height. Downward (positive) velocity moves
/// towards smaller indices.
pub fn nearest_snap_index(
    points: &SnapPoints,
    current: SnapIndex,
    offset: f32,
    velocity: f32,
    velocity_threshold: f32,
) -> usize {
    if velocity.abs() > velocity_threshold {
        let direction: i64 = if velocity > 0.0 { -1 } else { 1 };
        let next = i64::from(current.to_raw()) + direction;
        if let Ok(next) = usize::try_from(next) {
            if next < points.len() {
                return next;
            }
        }
    }

    let visible = points.visible_height(offset);
    let mut closest = 0;
    let mut min_distance = f32::INFINITY;
    for (index, height) in points.heights().iter().enumerate() {
        let distance = (visible - height).abs();
        if distance < min_distance {
            min_distance = distance;
            closest = index;
        }
    }
    closest
}

pub struct GestureArbiter {
    state: ArbiterState,
    policy: ReleasePolicy,
    last_release: Option<(GestureSession, Release)>,
}

impl GestureArbiter {
    pub fn new(policy: ReleasePolicy) -> Self {
        Self {
            state: ArbiterState::Idle,
            policy,
            last_release: None,
        }
    }

    pub fn state(&self) -> ArbiterState {
        self.state
    }

    pub fn session(&self) -> Option<&GestureSession> {
        match &self.state {
            ArbiterState::Idle => None,
            ArbiterState::HandleDragging(session) | ArbiterState::ContentDragging(session, _) => {
                Some(session)
            }
        }
    }

    /// The most recent session that released the sheet, and where it went.
    pub fn last_release(&self) -> Option<(GestureSession, Release)> {
        self.last_release
    }

    /// True while a gesture is moving the sheet.
    pub fn is_dragging_sheet(&self) -> bool {
        matches!(
            self.state,
            ArbiterState::HandleDragging(_)
                | ArbiterState::ContentDragging(_, Ownership::OwningSheet)
        )
    }

    /// Feeds one tagged drag event.
    pub fn on_event(
        &mut self,
        source: GestureSource,
        event: DragEvent,
        ctx: &ArbiterContext<'_>,
    ) -> Disposition {
        match (self.state, source, event.phase) {
            (ArbiterState::Idle, GestureSource::Handle, DragPhase::Start) => {
                self.begin_handle(ctx)
            }
            (ArbiterState::Idle, GestureSource::Content, DragPhase::Start) => {
                self.begin_content(ctx)
            }
            (ArbiterState::HandleDragging(session), GestureSource::Handle, DragPhase::Update) => {
                self.state = ArbiterState::HandleDragging(Self::drag(session, event, ctx));
                Disposition::Sheet
            }
            (
                ArbiterState::ContentDragging(session, ownership),
                GestureSource::Content,
                DragPhase::Update,
            ) => self.update_content(session, ownership, event, ctx),
            (
                ArbiterState::HandleDragging(session),
                GestureSource::Handle,
                DragPhase::End | DragPhase::Cancel,
            ) => {
                self.state = ArbiterState::Idle;
                self.release(session, event, ctx);
                Disposition::Sheet
            }
            (
                ArbiterState::ContentDragging(session, ownership),
                GestureSource::Content,
                DragPhase::End | DragPhase::Cancel,
            ) => {
                self.state = ArbiterState::Idle;
                match ownership {
                    Ownership::OwningSheet => {
                        self.release(session, event, ctx);
                        Disposition::Sheet
                    }
                    Ownership::NotOwningSheet => Disposition::Passthrough {
                        scroll_delta: session.last_translation - event.translation,
                    },
                }
            }
            (state, source, phase) => {
                log::trace!("ignoring {source:?} {phase:?} in {state:?}");
                Disposition::Ignored
            }
        }
    }

    fn begin_handle(&mut self, ctx: &ArbiterContext<'_>) -> Disposition {
        let start_offset = ctx.motion.begin_drag();
        let session = GestureSession::new(start_offset, ctx.scroll_offset);
        log::debug!("handle drag from offset {start_offset}");
        self.state = ArbiterState::HandleDragging(session);
        Disposition::Sheet
    }

    fn begin_content(&mut self, ctx: &ArbiterContext<'_>) -> Disposition {
        let max_index = ctx.motion.snap_points().max_index();
        let expanded = ctx.motion.current_index() == SnapIndex::At(max_index);
        if expanded {
            let session = GestureSession::new(ctx.motion.offset(), ctx.scroll_offset);
            self.state = ArbiterState::ContentDragging(session, Ownership::NotOwningSheet);
            Disposition::Passthrough { scroll_delta: 0.0 }
        } else {
            let start_offset = ctx.motion.begin_drag();
            let session = GestureSession::new(start_offset, ctx.scroll_offset);
            log::debug!("content drag owns sheet from offset {start_offset}");
            self.state = ArbiterState::ContentDragging(session, Ownership::OwningSheet);
            Disposition::Sheet
        }
    }

    fn update_content(
        &mut self,
        session: GestureSession,
        ownership: Ownership,
        event: DragEvent,
        ctx: &ArbiterContext<'_>,
    ) -> Disposition {
        if ownership == Ownership::OwningSheet {
            self.state = ArbiterState::ContentDragging(
                Self::drag(session, event, ctx),
                Ownership::OwningSheet,
            );
            return Disposition::Sheet;
        }

        let at_top_now = ctx.scroll_offset <= SCROLL_TOP_THRESHOLD;
        let at_top_at_start = session.start_scroll <= SCROLL_TOP_THRESHOLD;
        let dragging_down = event.translation > 0.0;
        if at_top_now && at_top_at_start && dragging_down {
            // Sticky for the rest of the gesture.
            ctx.motion.begin_drag();
            log::debug!(
                "scroll handoff: content drag takes the sheet at translation {}",
                event.translation
            );
            self.state = ArbiterState::ContentDragging(
                Self::drag(session, event, ctx),
                Ownership::OwningSheet,
            );
            return Disposition::Sheet;
        }

        let scroll_delta = session.last_translation - event.translation;
        self.state = ArbiterState::ContentDragging(
            GestureSession {
                last_translation: event.translation,
                ..session
            },
            Ownership::NotOwningSheet,
        );
        Disposition::Passthrough { scroll_delta }
    }

    fn drag(session: GestureSession, event: DragEvent, ctx: &ArbiterContext<'_>) -> GestureSession {
        ctx.motion.drag_to(session.start_offset + event.translation);
        GestureSession {
            last_translation: event.translation,
            ..session
        }
    }

    /// Swipe-to-dismiss, else the velocity-biased nearest snap. A cancel
    /// releases with zero velocity.
    fn release(
        &mut self,
        mut session: GestureSession,
        event: DragEvent,
        ctx: &ArbiterContext<'_>,
    ) -> Release {
        let velocity = match event.phase {
            DragPhase::End => event.velocity,
            _ => 0.0,
        };
        session.release_velocity = Some(velocity);
        ctx.motion.end_drag();

        let offset = ctx.motion.offset();
        let (swipe_dismiss, target) = {
            let points = ctx.motion.snap_points();
            let swipe_dismiss = self.policy.dismiss_on_swipe_down
                && offset > points.collapsed_offset()
                && velocity > self.policy.velocity_threshold;
            let target = nearest_snap_index(
                &points,
                ctx.motion.current_index(),
                offset,
                velocity,
                self.policy.velocity_threshold,
            );
            (swipe_dismiss, target)
        };

        let release = if swipe_dismiss {
            log::debug!("release at offset {offset} with velocity {velocity}: dismiss");
            ctx.motion.close();
            Release::Dismiss
        } else {
            log::debug!("release at offset {offset} with velocity {velocity}: snap {target}");
            ctx.motion.snap_to(target, true);
            Release::Snap(target)
        };
        self.last_release = Some((session, release));
        release
    }
}

#[cfg(test)]
#[path = "tests/arbiter_tests.rs"]
mod tests;
