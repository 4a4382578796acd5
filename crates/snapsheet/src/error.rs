use thiserror::Error;

/// Caller contract violations, reported when the sheet is configured or its
/// snap points are resolved. Never raised from gesture handling.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SheetConfigError {
    #[error("at least one snap point is required")]
    EmptySnapPoints,
    #[error("cannot parse snap point {0:?}: expected a height like \"300\" or a percentage like \"50%\"")]
    UnparsableSnapPoint(String),
    #[error("snap point height {0} must be finite and positive")]
    InvalidHeight(f32),
    #[error("snap point percentage {0}% must be in (0, 100]")]
    InvalidPercentage(f32),
    #[error("snap point {index} resolves to {height}px, not above the previous {previous}px")]
    NotAscending {
        index: usize,
        previous: f32,
        height: f32,
    },
    #[error("snap point {index} resolves to {height}px, taller than the {viewport}px viewport")]
    ExceedsViewport {
        index: usize,
        height: f32,
        viewport: f32,
    },
    #[error("viewport height {0} must be finite and positive")]
    InvalidViewport(f32),
    #[error("spring configuration needs positive stiffness and mass and non-negative damping")]
    InvalidSpring,
    #[error("snap velocity threshold {0} must be finite and positive")]
    InvalidVelocityThreshold(f32),
    #[error("initial snap index {index} is out of range for {count} snap points")]
    InitialIndexOutOfRange { index: usize, count: usize },
}

/// Failure reported by a haptic backend. The sheet logs and drops these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HapticError {
    #[error("haptic engine unavailable")]
    Unavailable,
    #[error("haptic playback failed: {0}")]
    Failed(String),
}
