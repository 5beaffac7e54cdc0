//! Error types shared by every picking component.

use thiserror::Error;

/// Picking errors.
#[derive(Debug, Error)]
pub enum PickError {
    /// The configured target selector matched nothing or could not be parsed.
    #[error("'{0}' is invalid selector")]
    InvalidSelector(String),
    /// The element is not attached to the document.
    #[error("Element is not attached to the document")]
    InvalidTarget,
    /// A touch press arrived without any active touch point.
    #[error("Touch event carries no active touch points")]
    NoActiveTouch,
    /// The host could not provide a drawable surface.
    #[error("Drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Host error: {0}")]
    Host(String),
}

/// Result type for picking operations.
pub type PickResult<T> = Result<T, PickError>;
