//! Best-effort haptic feedback on snap changes and close.

use crate::error::HapticError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HapticStyle {
    MediumImpact,
    ToggleOn,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Platform {
    Ios,
    Android,
    Other,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "ios") {
            Platform::Ios
        } else if cfg!(target_os = "android") {
            Platform::Android
        } else {
            Platform::Other
        }
    }

    /// iOS plays a medium impact; everything else uses the toggle-on effect.
    pub fn haptic_style(self) -> HapticStyle {
        match self {
            Platform::Ios => HapticStyle::MediumImpact,
            Platform::Android | Platform::Other => HapticStyle::ToggleOn,
        }
    }
}

/// Host-provided haptic engine.
pub trait HapticFeedback {
    fn perform(&self, style: HapticStyle) -> Result<(), HapticError>;
}

/// Backend for hosts without a haptic engine.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopHaptics;

impl HapticFeedback for NoopHaptics {
    fn perform(&self, _style: HapticStyle) -> Result<(), HapticError> {
        Ok(())
    }
}

/// Plays the platform's style; failures are logged and dropped.
pub(crate) fn trigger(backend: &dyn HapticFeedback, platform: Platform) {
    if let Err(err) = backend.perform(platform.haptic_style()) {
        log::debug!("haptic feedback dropped: {err}");
    }
}
