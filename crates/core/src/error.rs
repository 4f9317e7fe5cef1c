// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::state::DroppedOption;
use sponsorlink_domain::{CollaborationId, DomainError, ErrorKind};

/// Failure reported by an external collaborator (storage, files, catalog).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollaboratorError {
    /// The stored version no longer matches the version that was read.
    #[error("version conflict: expected version {expected}")]
    VersionConflict { expected: i64 },
    /// The collaborator could not complete the operation.
    #[error("{operation} failed: {message}")]
    Unavailable {
        operation: &'static str,
        message: String,
    },
}

impl CollaboratorError {
    /// Shorthand for an `Unavailable` error.
    #[must_use]
    pub fn unavailable(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Unavailable {
            operation,
            message: message.into(),
        }
    }
}

/// Errors that can occur while running collaboration operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// A collaborator failed; the caller may retry.
    Storage(CollaboratorError),
    /// Another writer changed the collaboration since it was read.
    ConcurrentModification {
        /// The collaboration that changed.
        collaboration_id: CollaborationId,
        /// The version the write expected.
        expected_version: i64,
    },
    /// Creation inserted the collaboration but could not link any option.
    /// The collaboration has been removed again.
    NoOptionsLinked {
        /// Every submitted option, with the reason it was dropped.
        dropped: Vec<DroppedOption>,
    },
    /// An internal consistency check failed.
    Internal(String),
}

impl CoreError {
    /// Returns the error taxonomy kind for this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::DomainViolation(err) => err.kind(),
            Self::Storage(_)
            | Self::ConcurrentModification { .. }
            | Self::NoOptionsLinked { .. } => ErrorKind::StorageFailure,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::Storage(err) => write!(f, "Storage failure: {err}"),
            Self::ConcurrentModification {
                collaboration_id,
                expected_version,
            } => write!(
                f,
                "Collaboration '{collaboration_id}' was modified concurrently \
                 (expected version {expected_version}); re-read and retry"
            ),
            Self::NoOptionsLinked { dropped } => write!(
                f,
                "No option could be linked ({} dropped); the collaboration was not created",
                dropped.len()
            ),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}

impl From<CollaboratorError> for CoreError {
    fn from(err: CollaboratorError) -> Self {
        Self::Storage(err)
    }
}
