// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use sponsorlink::{CollaboratorError, CoreError};
use sponsorlink_domain::DomainError;
use sponsorlink_persistence::PersistenceError;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The caller identity is missing or unusable.
    Unauthenticated {
        /// Why the identity was rejected.
        reason: String,
    },
    /// The caller may not perform the operation.
    Forbidden {
        /// A human-readable description of the refusal.
        message: String,
    },
    /// The operation is not valid for the collaboration's current status.
    InvalidState {
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The resource changed or already exists; re-read and retry.
    Conflict {
        /// A human-readable description of the conflict.
        message: String,
    },
    /// Storage failed; the operation may be retried.
    StorageUnavailable {
        /// A description of the failure.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl ApiError {
    /// Stable machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Unauthenticated { .. } => "unauthenticated",
            Self::Forbidden { .. } => "forbidden",
            Self::InvalidState { .. } => "invalid_state",
            Self::InvalidInput { .. } => "invalid_payload",
            Self::ResourceNotFound { .. } => "not_found",
            Self::Conflict { .. } => "conflict",
            Self::StorageUnavailable { .. } => "storage_failure",
            Self::Internal { .. } => "internal",
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthenticated { reason } => write!(f, "Unauthenticated: {reason}"),
            Self::Forbidden { message } => write!(f, "Forbidden: {message}"),
            Self::InvalidState { message } => write!(f, "Invalid state: {message}"),
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Conflict { message } => write!(f, "Conflict: {message}"),
            Self::StorageUnavailable { message } => {
                write!(f, "Storage unavailable: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

fn invalid_input(field: &str, err: &DomainError) -> ApiError {
    ApiError::InvalidInput {
        field: field.to_string(),
        message: err.to_string(),
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match &err {
        DomainError::CollaborationNotFound { .. } => ApiError::ResourceNotFound {
            resource_type: String::from("Collaboration"),
            message: err.to_string(),
        },
        DomainError::CatalogOptionNotFound { .. } => ApiError::ResourceNotFound {
            resource_type: String::from("Catalog option"),
            message: err.to_string(),
        },
        DomainError::PartyNotFound { .. } => ApiError::ResourceNotFound {
            resource_type: String::from("Party"),
            message: err.to_string(),
        },
        DomainError::NotAParty { .. }
        | DomainError::ProposerMismatch { .. }
        | DomainError::ForbiddenTransition { .. } => ApiError::Forbidden {
            message: err.to_string(),
        },
        DomainError::InvalidTransition { .. }
        | DomainError::TerminalStatus { .. }
        | DomainError::OptionsLocked { .. } => ApiError::InvalidState {
            message: err.to_string(),
        },
        DomainError::InvalidStatus { .. } => invalid_input("status", &err),
        DomainError::InvalidAction { .. } => invalid_input("action", &err),
        DomainError::InvalidRole { .. } => invalid_input("role", &err),
        DomainError::MissingSettlementFile { .. } | DomainError::EmptySettlementFile => {
            invalid_input("settlement_file", &err)
        }
        DomainError::MissingOptionList
        | DomainError::EmptyOptionList
        | DomainError::BlankOptionTitle { .. }
        | DomainError::NegativeAmount { .. }
        | DomainError::AmountOverflow { .. }
        | DomainError::CatalogOptionOutsideEvents { .. } => invalid_input("options", &err),
        DomainError::NoEventIds | DomainError::DuplicateEventId { .. } => {
            invalid_input("event_ids", &err)
        }
        DomainError::BlankIdentifier { field } => invalid_input(field, &err),
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::ConcurrentModification { .. } => ApiError::Conflict {
            message: err.to_string(),
        },
        CoreError::Storage(CollaboratorError::VersionConflict { expected }) => ApiError::Conflict {
            message: format!("Stored version differs from expected version {expected}"),
        },
        CoreError::Storage(CollaboratorError::Unavailable { operation, message }) => {
            ApiError::StorageUnavailable {
                message: format!("{operation} failed: {message}"),
            }
        }
        CoreError::NoOptionsLinked { .. } => ApiError::StorageUnavailable {
            message: err.to_string(),
        },
        CoreError::Internal(msg) => ApiError::Internal {
            message: format!("Internal error: {msg}"),
        },
    }
}

/// Translates a persistence error raised by the seeding operations.
///
/// Constraint violations on seeding mean the record already exists.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::NotFound(_) => ApiError::ResourceNotFound {
            resource_type: String::from("Record"),
            message: err.to_string(),
        },
        PersistenceError::DatabaseError(_) | PersistenceError::VersionConflict { .. } => {
            ApiError::Conflict {
                message: err.to_string(),
            }
        }
        PersistenceError::ReconstructionError(_) | PersistenceError::SerializationError(_) => {
            ApiError::Internal {
                message: err.to_string(),
            }
        }
        PersistenceError::DatabaseConnectionFailed(_)
        | PersistenceError::MigrationFailed(_)
        | PersistenceError::QueryFailed(_)
        | PersistenceError::InitializationError(_)
        | PersistenceError::ForeignKeyEnforcementNotEnabled => ApiError::StorageUnavailable {
            message: err.to_string(),
        },
    }
}
