//! Error type shared by the registry, the face resolver, and the animator.
//!
//! None of these are retried. A [`CubeError::FaceResolutionFault`] means the
//! grid invariant no longer holds, so the running sequence stops instead of
//! turning a corrupted group.

use crate::resources::bodyregistry::BodyId;
use crate::resources::facetable::Face;

pub type Result<T> = std::result::Result<T, CubeError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CubeError {
    /// Registry lookup on an id that was never inserted.
    #[error("body not found: {0}")]
    NotFound(BodyId),

    /// The resolved group does not have the size the grid demands.
    #[error("face {face} resolved {found} {what}, expected {expected}")]
    FaceResolutionFault {
        face: Face,
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// A face label or axis entry that is not part of the face table.
    #[error("invalid axis: {0}")]
    InvalidAxis(String),
}
