//! Animatable values, easing curves, tween and spring specifications.

use std::cell::RefCell;
use std::rc::Rc;

use snapsheet_core::{FrameCallbackRegistration, RuntimeHandle};

/// Trait for types that can be linearly interpolated.
pub trait Lerp {
    fn lerp(&self, target: &Self, fraction: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        self + (target - self) * fraction
    }
}

/// Trait for values that can participate in spring animations.
pub trait SpringScalar: Lerp + Clone {
    /// Convert the value to `f32` for physics calculations.
    fn to_f32(&self) -> f32;

    /// Build a value back from the physics representation.
    fn from_f32(value: f32) -> Self;

    /// Determine whether the current value is close enough to the target to
    /// consider the spring finished.
    fn is_near_target(current: &Self, target: &Self, threshold: f32) -> bool {
        (current.to_f32() - target.to_f32()).abs() < threshold
    }
}

impl SpringScalar for f32 {
    fn to_f32(&self) -> f32 {
        *self
    }

    fn from_f32(value: f32) -> Self {
        value
    }
}

/// Easing functions applied to the linear progress of a tween.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    /// Linear interpolation (no easing).
    LinearEasing,
    /// Symmetric quadratic ease in/out. Default curve for timed transitions.
    EaseInOutQuad,
}

impl Easing {
    /// Apply the easing function to a linear fraction [0, 1].
    pub fn transform(&self, fraction: f32) -> f32 {
        match self {
            Easing::LinearEasing => fraction,
            Easing::EaseInOutQuad => {
                let t = fraction.clamp(0.0, 1.0);
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

/// Animation specification combining duration and easing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSpec {
    /// Duration in milliseconds.
    pub duration_millis: u64,
    /// Easing function to apply.
    pub easing: Easing,
}

impl AnimationSpec {
    /// Create a tween animation with duration and easing.
    pub const fn tween(duration_millis: u64, easing: Easing) -> Self {
        Self {
            duration_millis,
            easing,
        }
    }

    /// Create a linear tween animation.
    pub const fn linear(duration_millis: u64) -> Self {
        Self::tween(duration_millis, Easing::LinearEasing)
    }
}

/// Damped spring: `m·a = −k·x − c·v`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringSpec {
    /// Damping coefficient `c`.
    pub damping: f32,
    /// Stiffness constant `k`. Higher values = faster animation.
    pub stiffness: f32,
    /// Mass `m` attached to the spring.
    pub mass: f32,
    /// Stop as soon as the value first reaches the target instead of
    /// oscillating around it.
    pub overshoot_clamping: bool,
    /// Distance from target below which the spring may come to rest.
    pub rest_displacement_threshold: f32,
    /// Speed (units/s) below which the spring may come to rest.
    pub rest_speed_threshold: f32,
}

const DEFAULT_REST_DISPLACEMENT: f32 = 0.01;
const DEFAULT_REST_SPEED: f32 = 2.0;

impl SpringSpec {
    pub const fn new(damping: f32, stiffness: f32, mass: f32) -> Self {
        Self {
            damping,
            stiffness,
            mass,
            overshoot_clamping: false,
            rest_displacement_threshold: DEFAULT_REST_DISPLACEMENT,
            rest_speed_threshold: DEFAULT_REST_SPEED,
        }
    }

    pub fn with_overshoot_clamping(mut self, clamp: bool) -> Self {
        self.overshoot_clamping = clamp;
        self
    }

    pub fn is_valid(&self) -> bool {
        self.damping.is_finite()
            && self.damping >= 0.0
            && self.stiffness.is_finite()
            && self.stiffness > 0.0
            && self.mass.is_finite()
            && self.mass > 0.0
    }
}

/// Animation type specification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationType {
    /// Time-based tween animation.
    Tween(AnimationSpec),
    /// Physics-based spring animation.
    Spring(SpringSpec),
}

/// How a transition ended. Reported exactly once per `animate_to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationEnd {
    /// The value reached its target.
    Finished,
    /// Another `animate_to`, `snap_to` or `stop` replaced the transition.
    Interrupted,
}

impl AnimationEnd {
    pub fn is_finished(self) -> bool {
        self == AnimationEnd::Finished
    }
}

type EndCallback = Box<dyn FnOnce(AnimationEnd) + 'static>;

/// Spring integration step. Small enough to stay stable for stiff, heavily
/// damped sheet springs.
const SPRING_TIMESTEP: f32 = 0.004;

/// Frame gaps beyond this are treated as this long.
const MAX_FRAME_DELTA_SECONDS: f32 = 0.1;

/// Generic animatable value holder.
///
/// Clones share the same underlying value.
pub struct Animatable<T: SpringScalar + 'static> {
    inner: Rc<RefCell<AnimatableInner<T>>>,
}

struct AnimatableInner<T: SpringScalar + 'static> {
    runtime: RuntimeHandle,
    current: T,
    /// Units per second.
    velocity: f32,
    start: T,
    target: T,
    animation_type: AnimationType,
    running: bool,
    start_time_nanos: Option<u64>,
    last_frame_nanos: Option<u64>,
    registration: Option<FrameCallbackRegistration>,
    on_end: Option<EndCallback>,
}

impl<T: SpringScalar + 'static> AnimatableInner<T> {
    /// Cancels any running transition and hands back its end callback so the
    /// caller can report the interruption once no borrow is held.
    fn interrupt(&mut self) -> Option<EndCallback> {
        if let Some(registration) = self.registration.take() {
            registration.cancel();
        }
        self.running = false;
        self.start_time_nanos = None;
        self.last_frame_nanos = None;
        self.on_end.take()
    }

    fn finish(&mut self) -> Option<EndCallback> {
        self.current = self.target.clone();
        self.start = self.target.clone();
        self.velocity = 0.0;
        self.running = false;
        self.start_time_nanos = None;
        self.last_frame_nanos = None;
        self.on_end.take()
    }
}

impl<T: SpringScalar + 'static> Animatable<T> {
    /// Create a new animatable resting at `initial`. `animation` is the
    /// transition recorded until the first `animate_to` replaces it.
    pub fn new(initial: T, animation: AnimationType, runtime: RuntimeHandle) -> Self {
        let inner = AnimatableInner {
            runtime,
            current: initial.clone(),
            velocity: 0.0,
            start: initial.clone(),
            target: initial,
            animation_type: animation,
            running: false,
            start_time_nanos: None,
            last_frame_nanos: None,
            registration: None,
            on_end: None,
        };
        Self {
            inner: Rc::new(RefCell::new(inner)),
        }
    }

    /// Animate to the target value using the specified animation.
    ///
    /// A transition already in flight is replaced; its end callback receives
    /// [`AnimationEnd::Interrupted`]. Spring-to-spring replacement keeps the
    /// current velocity.
    pub fn animate_to(
        &self,
        target: T,
        animation: AnimationType,
        on_end: impl FnOnce(AnimationEnd) + 'static,
    ) {
        let superseded = {
            let mut inner = self.inner.borrow_mut();
            let superseded = inner.interrupt();
            inner.start = inner.current.clone();
            inner.target = target;
            inner.animation_type = animation;
            inner.running = true;
            inner.on_end = Some(Box::new(on_end));
            superseded
        };

        if let Some(callback) = superseded {
            callback(AnimationEnd::Interrupted);
        }
        Self::schedule_frame(&self.inner);
    }

    /// Snap immediately to the target value without animating.
    pub fn snap_to(&self, target: T) {
        let superseded = {
            let mut inner = self.inner.borrow_mut();
            let superseded = inner.interrupt();
            inner.current = target.clone();
            inner.start = target.clone();
            inner.target = target;
            inner.velocity = 0.0;
            superseded
        };
        if let Some(callback) = superseded {
            callback(AnimationEnd::Interrupted);
        }
    }

    /// Freeze the value where it is.
    pub fn stop(&self) {
        let superseded = {
            let mut inner = self.inner.borrow_mut();
            let superseded = inner.interrupt();
            inner.target = inner.current.clone();
            inner.start = inner.current.clone();
            inner.velocity = 0.0;
            superseded
        };
        if let Some(callback) = superseded {
            callback(AnimationEnd::Interrupted);
        }
    }

    /// Current (possibly mid-transition) value.
    pub fn value(&self) -> T {
        self.inner.borrow().current.clone()
    }

    /// Return the current animation target.
    pub fn target(&self) -> T {
        self.inner.borrow().target.clone()
    }

    /// Current velocity in units per second.
    pub fn velocity(&self) -> f32 {
        self.inner.borrow().velocity
    }

    pub fn is_running(&self) -> bool {
        self.inner.borrow().running
    }

    fn schedule_frame(this: &Rc<RefCell<AnimatableInner<T>>>) {
        let runtime = {
            let inner = this.borrow();
            if inner.registration.is_some() || !inner.running {
                return;
            }
            inner.runtime.clone()
        };
        let weak = Rc::downgrade(this);
        let registration = runtime.frame_clock().with_frame_nanos(move |time| {
            if let Some(strong) = weak.upgrade() {
                Self::on_frame(&strong, time);
            }
        });
        this.borrow_mut().registration = Some(registration);
    }

    fn on_frame(this: &Rc<RefCell<AnimatableInner<T>>>, frame_time_nanos: u64) {
        let finished = {
            let mut inner = this.borrow_mut();
            inner.registration = None;
            if !inner.running {
                return;
            }

            let done = match inner.animation_type {
                AnimationType::Tween(spec) => Self::step_tween(&mut inner, spec, frame_time_nanos),
                AnimationType::Spring(spec) => {
                    Self::step_spring(&mut inner, spec, frame_time_nanos)
                }
            };

            if done {
                Some(inner.finish())
            } else {
                None
            }
        };

        match finished {
            Some(on_end) => {
                if let Some(callback) = on_end {
                    callback(AnimationEnd::Finished);
                }
            }
            None => Self::schedule_frame(this),
        }
    }

    fn step_tween(inner: &mut AnimatableInner<T>, spec: AnimationSpec, frame_time_nanos: u64) -> bool {
        let start_time = *inner.start_time_nanos.get_or_insert(frame_time_nanos);
        let elapsed_nanos = frame_time_nanos.saturating_sub(start_time);
        let duration_nanos = (spec.duration_millis * 1_000_000).max(1);
        let linear_progress = (elapsed_nanos as f32 / duration_nanos as f32).clamp(0.0, 1.0);
        let progress = spec.easing.transform(linear_progress);

        let previous = inner.current.to_f32();
        inner.current = inner.start.lerp(&inner.target, progress);
        if let Some(last) = inner.last_frame_nanos {
            let dt = frame_time_nanos.saturating_sub(last) as f32 / 1_000_000_000.0;
            if dt > 0.0 {
                inner.velocity = (inner.current.to_f32() - previous) / dt;
            }
        }
        inner.last_frame_nanos = Some(frame_time_nanos);

        linear_progress >= 1.0
    }

    fn step_spring(inner: &mut AnimatableInner<T>, spec: SpringSpec, frame_time_nanos: u64) -> bool {
        let Some(last) = inner.last_frame_nanos.replace(frame_time_nanos) else {
            // First frame only anchors the clock.
            return false;
        };
        let dt = (frame_time_nanos.saturating_sub(last) as f32 / 1_000_000_000.0)
            .min(MAX_FRAME_DELTA_SECONDS);
        if dt <= 0.0 {
            return false;
        }

        let target = inner.target.to_f32();
        let start_side = (inner.start.to_f32() - target).signum();
        let mut position = inner.current.to_f32();
        let mut velocity = inner.velocity;

        let mut elapsed = 0.0f32;
        while elapsed < dt {
            let step = SPRING_TIMESTEP.min(dt - elapsed);
            let displacement = position - target;
            let force = -spec.stiffness * displacement - spec.damping * velocity;
            velocity += force / spec.mass * step;
            position += velocity * step;
            elapsed += step;

            if spec.overshoot_clamping
                && start_side != 0.0
                && (position - target).signum() != start_side
            {
                inner.current = T::from_f32(target);
                inner.velocity = 0.0;
                return true;
            }
        }

        inner.current = T::from_f32(position);
        inner.velocity = velocity;

        let at_rest = velocity.abs() < spec.rest_speed_threshold;
        let near_target = <T as SpringScalar>::is_near_target(
            &inner.current,
            &inner.target,
            spec.rest_displacement_threshold,
        );
        at_rest && near_target
    }
}

impl<T: SpringScalar + 'static> Clone for Animatable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

#[cfg(test)]
#[path = "tests/animation_tests.rs"]
mod tests;
