//! Error types for the Vista3D engine
//!
//! One taxonomy serves the whole workspace: the scene core, the renderer
//! contract, and the media pipeline all report failures through [`Error`].
//! Errors are values; nothing in the engine throws or aborts.

use std::fmt;

/// Result type for Vista3D engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Vista3D engine errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A caller-supplied argument was out of range or degenerate
    /// (zero-height viewport, singular matrix, non-unit quaternion, ...)
    InvalidParameters(String),

    /// A renderer or provider resource could not be acquired
    ResourceAllocation(String),

    /// A named lookup (LOD list, ROI, variable) found nothing
    NotFound(String),

    /// A stream provider ran out of chunks; surfaced to controllers as
    /// an end-of-stream notification
    StreamExhausted,

    /// The operation was cancelled by its owning subsystem
    Cancelled,

    /// The rendering device was lost and must be recreated
    DeviceLost,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidParameters(msg) => write!(f, "Invalid parameters: {}", msg),
            Error::ResourceAllocation(msg) => write!(f, "Resource allocation failed: {}", msg),
            Error::NotFound(msg) => write!(f, "Not found: {}", msg),
            Error::StreamExhausted => write!(f, "Stream exhausted"),
            Error::Cancelled => write!(f, "Cancelled"),
            Error::DeviceLost => write!(f, "Rendering device lost"),
        }
    }
}

impl std::error::Error for Error {}

/// Build an [`Error`] and emit an ERROR log entry in one step.
///
/// The first argument is the variant name, the second the log source,
/// the rest a format string and arguments:
///
/// ```ignore
/// return Err(engine_err!(InvalidParameters, "vista3d::Frustum",
///     "front plane must be positive, got {}", front));
/// ```
///
/// `StreamExhausted`, `Cancelled` and `DeviceLost` carry no payload; the
/// formatted message only reaches the log for those variants.
#[macro_export]
macro_rules! engine_err {
    (StreamExhausted, $source:expr, $($arg:tt)*) => {{
        $crate::engine_error!($source, $($arg)*);
        $crate::error::Error::StreamExhausted
    }};
    (Cancelled, $source:expr, $($arg:tt)*) => {{
        $crate::engine_error!($source, $($arg)*);
        $crate::error::Error::Cancelled
    }};
    (DeviceLost, $source:expr, $($arg:tt)*) => {{
        $crate::engine_error!($source, $($arg)*);
        $crate::error::Error::DeviceLost
    }};
    ($variant:ident, $source:expr, $($arg:tt)*) => {{
        $crate::engine_error!($source, $($arg)*);
        $crate::error::Error::$variant(format!($($arg)*))
    }};
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
