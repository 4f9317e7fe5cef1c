// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::status::CollaborationStatus;
use crate::transition::{Permitted, TransitionAction};
use crate::types::{CatalogOptionId, CollaborationId, EventId, PartyId, PartyRole};
use rust_decimal::Decimal;

/// Coarse classification shared by every layer.
///
/// Transport layers map these kinds to status codes; the engine itself
/// only ever reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Unknown collaboration, party or catalog option.
    NotFound,
    /// The caller's role may not perform the action in the current status.
    Forbidden,
    /// The action is not valid from the current status for any role.
    InvalidState,
    /// Required data is missing or malformed.
    InvalidPayload,
    /// A storage or file collaborator failed.
    StorageFailure,
    /// Creation succeeded with some options dropped.
    PartialCreationFailure,
    /// Unexpected internal failure.
    Internal,
}

impl ErrorKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Forbidden => "forbidden",
            Self::InvalidState => "invalid_state",
            Self::InvalidPayload => "invalid_payload",
            Self::StorageFailure => "storage_failure",
            Self::PartialCreationFailure => "partial_creation_failure",
            Self::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Status string is not a known status.
    InvalidStatus {
        /// The unrecognized status string.
        status: String,
    },
    /// Action string is not a known transition action.
    InvalidAction {
        /// The unrecognized action string.
        action: String,
    },
    /// Role string is neither `organization` nor `sponsor`.
    InvalidRole {
        /// The unrecognized role string.
        role: String,
    },
    /// The caller does not hold the claimed role in this collaboration.
    NotAParty {
        /// The caller's party id.
        party_id: PartyId,
        /// The role the caller claimed.
        role: PartyRole,
        /// The collaboration the caller tried to act on.
        collaboration_id: CollaborationId,
    },
    /// Only the sponsor named in a proposal may create it.
    ProposerMismatch {
        /// The caller's party id.
        party_id: PartyId,
        /// The role the caller claimed.
        role: PartyRole,
    },
    /// The caller's role is not the one the transition table names.
    ForbiddenTransition {
        /// Current status of the collaboration.
        status: CollaborationStatus,
        /// Requested action.
        action: TransitionAction,
        /// The caller's role.
        role: PartyRole,
        /// Who the table permits instead.
        permitted: Permitted,
    },
    /// No rule exists for this action from this status.
    InvalidTransition {
        /// Current status of the collaboration.
        status: CollaborationStatus,
        /// Requested action.
        action: TransitionAction,
    },
    /// The collaboration is in a terminal status.
    TerminalStatus {
        /// Current (terminal) status.
        status: CollaborationStatus,
        /// Requested action.
        action: TransitionAction,
    },
    /// Options may only be edited while pending or negotiating.
    OptionsLocked {
        /// Current status of the collaboration.
        status: CollaborationStatus,
    },
    /// A settlement action was requested without a file.
    MissingSettlementFile {
        /// The action that needed the file.
        action: TransitionAction,
    },
    /// The settlement file is empty.
    EmptySettlementFile,
    /// `edit_options` was requested without an option list.
    MissingOptionList,
    /// An option list must contain at least one option.
    EmptyOptionList,
    /// A collaboration must reference at least one event.
    NoEventIds,
    /// The same event id appears more than once.
    DuplicateEventId {
        /// The repeated event id.
        event_id: EventId,
    },
    /// An identifier field is blank.
    BlankIdentifier {
        /// Name of the blank field.
        field: &'static str,
    },
    /// A custom option has a blank title.
    BlankOptionTitle {
        /// Position of the option in the submitted list.
        index: usize,
    },
    /// An option amount is negative.
    NegativeAmount {
        /// Position of the option in the submitted list.
        index: usize,
        /// The offending amount.
        amount: Decimal,
    },
    /// The option amounts add up to more than a `Decimal` can hold.
    AmountOverflow {
        /// Position of the option whose amount overflowed the total.
        index: usize,
    },
    /// A catalog option belongs to an event the collaboration does not reference.
    CatalogOptionOutsideEvents {
        /// The catalog option.
        catalog_option_id: CatalogOptionId,
        /// The event the catalog option belongs to.
        event_id: EventId,
    },
    /// A catalog option id does not resolve.
    CatalogOptionNotFound {
        /// The unresolved id.
        catalog_option_id: CatalogOptionId,
    },
    /// A collaboration id does not resolve.
    CollaborationNotFound {
        /// The unresolved id.
        collaboration_id: CollaborationId,
    },
    /// A party id does not resolve for the expected role.
    PartyNotFound {
        /// The unresolved id.
        party_id: PartyId,
        /// The role the party was expected to hold.
        role: PartyRole,
    },
}

impl DomainError {
    /// Returns the error taxonomy kind for this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::CatalogOptionNotFound { .. }
            | Self::CollaborationNotFound { .. }
            | Self::PartyNotFound { .. } => ErrorKind::NotFound,
            Self::ForbiddenTransition { .. }
            | Self::NotAParty { .. }
            | Self::ProposerMismatch { .. } => ErrorKind::Forbidden,
            Self::InvalidTransition { .. }
            | Self::TerminalStatus { .. }
            | Self::OptionsLocked { .. } => ErrorKind::InvalidState,
            Self::InvalidStatus { .. }
            | Self::InvalidAction { .. }
            | Self::InvalidRole { .. }
            | Self::MissingSettlementFile { .. }
            | Self::EmptySettlementFile
            | Self::MissingOptionList
            | Self::EmptyOptionList
            | Self::NoEventIds
            | Self::DuplicateEventId { .. }
            | Self::BlankIdentifier { .. }
            | Self::BlankOptionTitle { .. }
            | Self::NegativeAmount { .. }
            | Self::AmountOverflow { .. }
            | Self::CatalogOptionOutsideEvents { .. } => ErrorKind::InvalidPayload,
        }
    }
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidStatus { status } => write!(f, "Invalid collaboration status: {status}"),
            Self::InvalidAction { action } => write!(f, "Invalid transition action: {action}"),
            Self::InvalidRole { role } => {
                write!(
                    f,
                    "Invalid role: {role}. Must be 'organization' or 'sponsor'"
                )
            }
            Self::ForbiddenTransition {
                status,
                action,
                role,
                permitted,
            } => {
                write!(
                    f,
                    "Only {permitted} may {} a collaboration in status '{status}'; \
                     the {} may not",
                    action.verb(),
                    role.as_str()
                )
            }
            Self::NotAParty {
                party_id,
                role,
                collaboration_id,
            } => {
                write!(
                    f,
                    "Party '{party_id}' is not the {} of collaboration '{collaboration_id}'",
                    role.as_str()
                )
            }
            Self::ProposerMismatch { party_id, role } => {
                write!(
                    f,
                    "Only the sponsor named in a proposal may create it; \
                     '{party_id}' is acting as {}",
                    role.as_str()
                )
            }
            Self::InvalidTransition { status, action } => {
                write!(
                    f,
                    "Action '{action}' is not valid for a collaboration in status '{status}'"
                )
            }
            Self::TerminalStatus { status, action } => {
                write!(
                    f,
                    "Collaboration is {status}; no further transitions are allowed (requested '{action}')"
                )
            }
            Self::OptionsLocked { status } => {
                write!(
                    f,
                    "Options can only be edited while pending or in negotiation, not while '{status}'"
                )
            }
            Self::MissingSettlementFile { action } => {
                write!(f, "Action '{action}' requires a settlement file")
            }
            Self::EmptySettlementFile => write!(f, "Settlement file must not be empty"),
            Self::MissingOptionList => {
                write!(f, "Editing options requires the replacement option list")
            }
            Self::EmptyOptionList => write!(f, "At least one option is required"),
            Self::NoEventIds => write!(f, "At least one event id is required"),
            Self::DuplicateEventId { event_id } => {
                write!(f, "Event '{event_id}' is listed more than once")
            }
            Self::BlankIdentifier { field } => write!(f, "Field '{field}' must not be blank"),
            Self::BlankOptionTitle { index } => {
                write!(f, "Option {index} must have a non-empty title")
            }
            Self::NegativeAmount { index, amount } => {
                write!(f, "Option {index} has a negative amount: {amount}")
            }
            Self::AmountOverflow { index } => {
                write!(f, "Option {index} pushes the total past the largest supported amount")
            }
            Self::CatalogOptionOutsideEvents {
                catalog_option_id,
                event_id,
            } => {
                write!(
                    f,
                    "Catalog option '{catalog_option_id}' belongs to event '{event_id}', \
                     which this collaboration does not reference"
                )
            }
            Self::CatalogOptionNotFound { catalog_option_id } => {
                write!(f, "Catalog option '{catalog_option_id}' not found")
            }
            Self::CollaborationNotFound { collaboration_id } => {
                write!(f, "Collaboration '{collaboration_id}' not found")
            }
            Self::PartyNotFound { party_id, role } => {
                write!(f, "No {} with id '{party_id}'", role.as_str())
            }
        }
    }
}

impl std::error::Error for DomainError {}
