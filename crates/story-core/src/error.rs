use thiserror::Error;

/// Construction-time configuration errors. Per-frame work never fails; it
/// skips or falls back instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoryError {
    #[error("keyframe track needs at least 2 keys, got {len}")]
    TooFewKeyframes { len: usize },

    #[error("camera tracks are misaligned: {positions} position keys vs {targets} look-at keys")]
    MisalignedTracks { positions: usize, targets: usize },

    #[error("spline needs at least 4 control points, got {len}")]
    TooFewControlPoints { len: usize },

    #[error("gate window width must be positive, got {width}")]
    EmptyGateWindow { width: f32 },
}

pub type Result<T> = std::result::Result<T, StoryError>;
