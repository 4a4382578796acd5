//! Sheet configuration.
//!
//! Values default to what a mobile bottom sheet usually wants; a config is
//! only obtainable through [`SheetConfigBuilder::build`], which validates it.

use std::fmt;
use std::str::FromStr;

use snapsheet_animation::{AnimationSpec, Easing, SpringSpec};

use crate::error::SheetConfigError;

/// Spring used for snapping: heavily damped, no overshoot clamping.
pub const DEFAULT_SPRING: SpringSpec = SpringSpec::new(50.0, 400.0, 0.8);

/// Timed transition used by `close()`.
pub const DEFAULT_CLOSE_TIMING: AnimationSpec = AnimationSpec::tween(250, Easing::EaseInOutQuad);

/// Height of the drag handle area above the content.
pub const HANDLE_HEIGHT: f32 = 28.0;

/// Release velocity (px/s) above which a release jumps to the adjacent snap
/// point, and above which a downward release may dismiss.
pub const DEFAULT_SNAP_VELOCITY_THRESHOLD: f32 = 500.0;

pub const DEFAULT_BACKDROP_OPACITY: f32 = 0.5;
pub const DEFAULT_BACKGROUND_COLOR: &str = "#FFFFFF";
pub const DEFAULT_BORDER_RADIUS: f32 = 24.0;

/// A resting height, either absolute or relative to the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SnapSpec {
    /// Height in logical pixels.
    Absolute(f32),
    /// Percentage of the viewport height, `50.0` meaning half.
    Percent(f32),
}

impl SnapSpec {
    pub fn px(height: f32) -> Self {
        SnapSpec::Absolute(height)
    }

    pub fn percent(percent: f32) -> Self {
        SnapSpec::Percent(percent)
    }

    /// Parses every entry, failing on the first bad one.
    pub fn parse_list<S: AsRef<str>>(specs: &[S]) -> Result<Vec<SnapSpec>, SheetConfigError> {
        specs.iter().map(|spec| spec.as_ref().parse()).collect()
    }

    pub(crate) fn validate(&self) -> Result<(), SheetConfigError> {
        match *self {
            SnapSpec::Absolute(height) if !height.is_finite() || height <= 0.0 => {
                Err(SheetConfigError::InvalidHeight(height))
            }
            SnapSpec::Percent(percent) if !percent.is_finite() || percent <= 0.0 || percent > 100.0 => {
                Err(SheetConfigError::InvalidPercentage(percent))
            }
            _ => Ok(()),
        }
    }

    /// Absolute height for a viewport of `viewport_height`.
    pub fn resolve(&self, viewport_height: f32) -> f32 {
        match *self {
            SnapSpec::Absolute(height) => height,
            SnapSpec::Percent(percent) => viewport_height * percent / 100.0,
        }
    }
}

impl From<f32> for SnapSpec {
    fn from(height: f32) -> Self {
        SnapSpec::Absolute(height)
    }
}

impl FromStr for SnapSpec {
    type Err = SheetConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let unparsable = || SheetConfigError::UnparsableSnapPoint(raw.to_string());
        let spec = match trimmed.strip_suffix('%') {
            Some(number) => SnapSpec::Percent(number.trim().parse().map_err(|_| unparsable())?),
            None => SnapSpec::Absolute(trimmed.parse().map_err(|_| unparsable())?),
        };
        spec.validate()?;
        Ok(spec)
    }
}

impl fmt::Display for SnapSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapSpec::Absolute(height) => write!(f, "{height}"),
            SnapSpec::Percent(percent) => write!(f, "{percent}%"),
        }
    }
}

/// Validated sheet options.
#[derive(Clone, Debug, PartialEq)]
pub struct SheetConfig {
    pub(crate) snap_points: Vec<SnapSpec>,
    pub(crate) enable_backdrop: bool,
    pub(crate) backdrop_opacity: f32,
    pub(crate) dismiss_on_backdrop_press: bool,
    pub(crate) dismiss_on_swipe_down: bool,
    pub(crate) spring: SpringSpec,
    pub(crate) close_timing: AnimationSpec,
    pub(crate) show_handle: bool,
    pub(crate) enable_over_drag: bool,
    pub(crate) enable_haptic_feedback: bool,
    pub(crate) snap_velocity_threshold: f32,
    pub(crate) background_color: String,
    pub(crate) border_radius: f32,
    pub(crate) initial_snap_index: Option<usize>,
}

impl SheetConfig {
    pub fn builder(snap_points: impl IntoIterator<Item = SnapSpec>) -> SheetConfigBuilder {
        SheetConfigBuilder::new(snap_points)
    }

    pub fn snap_points(&self) -> &[SnapSpec] {
        &self.snap_points
    }

    pub fn enable_backdrop(&self) -> bool {
        self.enable_backdrop
    }

    pub fn backdrop_opacity(&self) -> f32 {
        self.backdrop_opacity
    }

    pub fn dismiss_on_backdrop_press(&self) -> bool {
        self.dismiss_on_backdrop_press
    }

    pub fn dismiss_on_swipe_down(&self) -> bool {
        self.dismiss_on_swipe_down
    }

    pub fn spring(&self) -> SpringSpec {
        self.spring
    }

    pub fn close_timing(&self) -> AnimationSpec {
        self.close_timing
    }

    pub fn show_handle(&self) -> bool {
        self.show_handle
    }

    pub fn enable_over_drag(&self) -> bool {
        self.enable_over_drag
    }

    pub fn enable_haptic_feedback(&self) -> bool {
        self.enable_haptic_feedback
    }

    pub fn snap_velocity_threshold(&self) -> f32 {
        self.snap_velocity_threshold
    }

    pub fn background_color(&self) -> &str {
        &self.background_color
    }

    pub fn border_radius(&self) -> f32 {
        self.border_radius
    }

    pub fn initial_snap_index(&self) -> Option<usize> {
        self.initial_snap_index
    }

    /// Height reserved for the handle above the content.
    pub fn handle_height(&self) -> f32 {
        if self.show_handle {
            HANDLE_HEIGHT
        } else {
            0.0
        }
    }
}

#[derive(Clone, Debug)]
pub struct SheetConfigBuilder {
    config: SheetConfig,
}

impl SheetConfigBuilder {
    pub fn new(snap_points: impl IntoIterator<Item = SnapSpec>) -> Self {
        Self {
            config: SheetConfig {
                snap_points: snap_points.into_iter().collect(),
                enable_backdrop: true,
                backdrop_opacity: DEFAULT_BACKDROP_OPACITY,
                dismiss_on_backdrop_press: true,
                dismiss_on_swipe_down: true,
                spring: DEFAULT_SPRING,
                close_timing: DEFAULT_CLOSE_TIMING,
                show_handle: true,
                enable_over_drag: true,
                enable_haptic_feedback: true,
                snap_velocity_threshold: DEFAULT_SNAP_VELOCITY_THRESHOLD,
                background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
                border_radius: DEFAULT_BORDER_RADIUS,
                initial_snap_index: None,
            },
        }
    }

    pub fn enable_backdrop(mut self, enable: bool) -> Self {
        self.config.enable_backdrop = enable;
        self
    }

    pub fn backdrop_opacity(mut self, opacity: f32) -> Self {
        self.config.backdrop_opacity = opacity;
        self
    }

    pub fn dismiss_on_backdrop_press(mut self, dismiss: bool) -> Self {
        self.config.dismiss_on_backdrop_press = dismiss;
        self
    }

    pub fn dismiss_on_swipe_down(mut self, dismiss: bool) -> Self {
        self.config.dismiss_on_swipe_down = dismiss;
        self
    }

    pub fn spring(mut self, spring: SpringSpec) -> Self {
        self.config.spring = spring;
        self
    }

    pub fn close_timing(mut self, timing: AnimationSpec) -> Self {
        self.config.close_timing = timing;
        self
    }

    pub fn show_handle(mut self, show: bool) -> Self {
        self.config.show_handle = show;
        self
    }

    pub fn enable_over_drag(mut self, enable: bool) -> Self {
        self.config.enable_over_drag = enable;
        self
    }

    pub fn enable_haptic_feedback(mut self, enable: bool) -> Self {
        self.config.enable_haptic_feedback = enable;
        self
    }

    pub fn snap_velocity_threshold(mut self, threshold: f32) -> Self {
        self.config.snap_velocity_threshold = threshold;
        self
    }

    pub fn background_color(mut self, color: impl Into<String>) -> Self {
        self.config.background_color = color.into();
        self
    }

    pub fn border_radius(mut self, radius: f32) -> Self {
        self.config.border_radius = radius;
        self
    }

    /// Snap to this index, without animation, when the sheet mounts.
    pub fn initial_snap_index(mut self, index: usize) -> Self {
        self.config.initial_snap_index = Some(index);
        self
    }

    pub fn build(self) -> Result<SheetConfig, SheetConfigError> {
        let mut config = self.config;

        if config.snap_points.is_empty() {
            return Err(SheetConfigError::EmptySnapPoints);
        }
        for spec in &config.snap_points {
            spec.validate()?;
        }
        if !config.spring.is_valid() {
            return Err(SheetConfigError::InvalidSpring);
        }
        let threshold = config.snap_velocity_threshold;
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(SheetConfigError::InvalidVelocityThreshold(threshold));
        }
        if let Some(index) = config.initial_snap_index {
            let count = config.snap_points.len();
            if index >= count {
                return Err(SheetConfigError::InitialIndexOutOfRange { index, count });
            }
        }

        let opacity = config.backdrop_opacity;
        if !(0.0..=1.0).contains(&opacity) {
            let clamped = if opacity.is_nan() {
                DEFAULT_BACKDROP_OPACITY
            } else {
                opacity.clamp(0.0, 1.0)
            };
            log::warn!("backdrop opacity {opacity} outside [0, 1]; using {clamped}");
            config.backdrop_opacity = clamped;
        }
        if !config.border_radius.is_finite() || config.border_radius < 0.0 {
            log::warn!(
                "border radius {} is invalid; using {}",
                config.border_radius,
                DEFAULT_BORDER_RADIUS
            );
            config.border_radius = DEFAULT_BORDER_RADIUS;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_absolute_and_percentage_specs() {
        assert_eq!("300".parse::<SnapSpec>(), Ok(SnapSpec::Absolute(300.0)));
        assert_eq!(" 50% ".parse::<SnapSpec>(), Ok(SnapSpec::Percent(50.0)));
        assert_eq!("33.5%".parse::<SnapSpec>(), Ok(SnapSpec::Percent(33.5)));
    }

    #[test]
    fn rejects_malformed_specs() {
        assert!(matches!(
            "tall".parse::<SnapSpec>(),
            Err(SheetConfigError::UnparsableSnapPoint(_))
        ));
        assert_eq!(
            "120%".parse::<SnapSpec>(),
            Err(SheetConfigError::InvalidPercentage(120.0))
        );
        assert_eq!(
            "-5".parse::<SnapSpec>(),
            Err(SheetConfigError::InvalidHeight(-5.0))
        );
    }

    #[test]
    fn display_round_trips_through_parse() {
        for raw in ["300", "50%"] {
            let spec: SnapSpec = raw.parse().expect("valid spec");
            assert_eq!(spec.to_string(), raw);
        }
    }

    #[test]
    fn builder_applies_defaults() {
        let config = SheetConfig::builder([SnapSpec::px(200.0)])
            .build()
            .expect("valid config");
        assert!(config.enable_backdrop());
        assert_eq!(config.backdrop_opacity(), 0.5);
        assert!(config.dismiss_on_backdrop_press());
        assert!(config.dismiss_on_swipe_down());
        assert_eq!(config.spring(), DEFAULT_SPRING);
        assert_eq!(config.close_timing().duration_millis, 250);
        assert!(config.show_handle());
        assert_eq!(config.handle_height(), HANDLE_HEIGHT);
        assert!(config.enable_over_drag());
        assert!(config.enable_haptic_feedback());
        assert_eq!(config.snap_velocity_threshold(), 500.0);
        assert_eq!(config.background_color(), "#FFFFFF");
        assert_eq!(config.border_radius(), 24.0);
        assert_eq!(config.initial_snap_index(), None);
    }

    #[test]
    fn empty_snap_list_is_rejected_at_build_time() {
        let result = SheetConfig::builder(Vec::<SnapSpec>::new()).build();
        assert_eq!(result, Err(SheetConfigError::EmptySnapPoints));
    }

    #[test]
    fn out_of_range_backdrop_opacity_is_clamped() {
        let config = SheetConfig::builder([SnapSpec::px(200.0)])
            .backdrop_opacity(1.7)
            .build()
            .expect("valid config");
        assert_eq!(config.backdrop_opacity(), 1.0);
    }

    #[test]
    fn invalid_spring_and_threshold_are_rejected() {
        let spring = SheetConfig::builder([SnapSpec::px(200.0)])
            .spring(SpringSpec::new(50.0, 0.0, 0.8))
            .build();
        assert_eq!(spring, Err(SheetConfigError::InvalidSpring));

        let threshold = SheetConfig::builder([SnapSpec::px(200.0)])
            .snap_velocity_threshold(0.0)
            .build();
        assert_eq!(threshold, Err(SheetConfigError::InvalidVelocityThreshold(0.0)));
    }

    #[test]
    fn initial_index_must_exist() {
        let result = SheetConfig::builder([SnapSpec::px(200.0)])
            .initial_snap_index(1)
            .build();
        assert_eq!(
            result,
            Err(SheetConfigError::InitialIndexOutOfRange { index: 1, count: 1 })
        );
    }

    #[test]
    fn hidden_handle_reserves_no_height() {
        let config = SheetConfig::builder([SnapSpec::px(200.0)])
            .show_handle(false)
            .build()
            .expect("valid config");
        assert_eq!(config.handle_height(), 0.0);
    }
}
