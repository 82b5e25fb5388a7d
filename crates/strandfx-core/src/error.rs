use thiserror::Error;

use crate::submission::FormKind;

pub type Result<T> = std::result::Result<T, FieldError>;

#[derive(Debug, Error)]
pub enum FieldError {
    /// No drawing surface was attached (canvas not mounted, or the 2D
    /// context could not be obtained). Activation does nothing.
    #[error("drawing surface unavailable")]
    SurfaceUnavailable,

    #[error("invalid backdrop options: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    #[error("a {kind} submission is already in flight")]
    SubmissionInFlight { kind: FormKind },
}

impl FieldError {
    /// Whether the caller should treat this as "render nothing this time"
    /// rather than surface it to the page.
    #[must_use]
    pub const fn is_silent(&self) -> bool {
        matches!(self, Self::SurfaceUnavailable)
    }
}
