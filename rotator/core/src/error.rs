//! Error Types
//!
//! The rotator lives entirely in memory, so the taxonomy is small. Unknown
//! ids are wiring bugs. Malformed elements are rejected one at a time at
//! registration. Render failures are logged rather than propagated.

use thiserror::Error;

use crate::element::ElementId;

/// Errors returned by the state store, drivers and launcher
#[derive(Debug, Error)]
pub enum RotateError {
    /// `read`/`update`/`attach` referenced an element that was never registered
    #[error("element {id} is not registered")]
    NotFound {
        /// The unknown element id
        id: ElementId,
    },

    /// The element was configured with no candidate strings at all
    #[error("element {id} has no candidate strings")]
    EmptyCandidates {
        /// The misconfigured element
        id: ElementId,
    },

    /// Every candidate of the element is the empty string
    #[error("element {id} has only empty candidate strings")]
    BlankCandidates {
        /// The misconfigured element
        id: ElementId,
    },

    /// The element's period is zero
    #[error("element {id} has a zero period")]
    InvalidPeriod {
        /// The misconfigured element
        id: ElementId,
    },
}

/// Error reported by a render target that could not display a frame
#[derive(Debug, Error)]
pub enum RenderError {
    /// The target no longer exists (e.g. the surface was torn down)
    #[error("render target for element {id} is gone")]
    Detached {
        /// Element whose target disappeared
        id: ElementId,
    },

    /// Writing to the underlying output failed
    #[error("failed to write frame: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for rotator operations
pub type Result<T> = std::result::Result<T, RotateError>;
