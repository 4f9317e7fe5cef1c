// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};
use sponsorlink_audit::AuditEvent;
use sponsorlink_domain::{
    Collaboration, DomainError, FileRef, FlaggedLine, OptionDraft, PartyId, PartyRole,
    TransitionAction,
};
use std::str::FromStr;

/// The identity handed to the engine by the external identity provider.
///
/// The engine never infers the role itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub party_id: PartyId,
    pub role: PartyRole,
}

impl Caller {
    #[must_use]
    pub const fn new(party_id: PartyId, role: PartyRole) -> Self {
        Self { party_id, role }
    }
}

/// Data some transition actions need.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionPayload {
    /// Uploaded proof for `submit_settlement` and `resubmit_settlement`.
    pub settlement_file: Option<FileRef>,
    /// Replacement options for `edit_options`.
    pub options: Option<Vec<OptionDraft>>,
}

/// The sponsor's verdict on a submitted settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementDecision {
    Accept,
    Reject,
}

impl SettlementDecision {
    /// The transition action this decision drives.
    #[must_use]
    pub const fn action(self) -> TransitionAction {
        match self {
            Self::Accept => TransitionAction::AcceptSettlement,
            Self::Reject => TransitionAction::RejectSettlement,
        }
    }
}

impl FromStr for SettlementDecision {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accept" => Ok(Self::Accept),
            "reject" => Ok(Self::Reject),
            _ => Err(DomainError::InvalidAction {
                action: s.to_string(),
            }),
        }
    }
}

/// The result of applying a command.
///
/// Transitions are atomic: either the full result is persisted, or
/// nothing is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The collaboration after the command.
    pub new_collaboration: Collaboration,
    /// The audit event recording this change.
    pub audit_event: AuditEvent,
    /// True if the option list must be rewritten along with the row.
    pub options_replaced: bool,
}

/// An option the creation transaction could not link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedOption {
    /// Position in the submitted option list.
    pub index: usize,
    pub title: String,
    pub reason: String,
}

/// Result of the creation transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationOutcome {
    pub collaboration: Collaboration,
    /// Options that could not be linked. Non-empty means partial failure.
    pub dropped: Vec<DroppedOption>,
    /// Lines whose amount was missing or malformed and counted as zero.
    pub flagged: Vec<FlaggedLine>,
}

impl CreationOutcome {
    /// True if some requested options were dropped.
    #[must_use]
    pub fn partial_failure(&self) -> bool {
        !self.dropped.is_empty()
    }
}

/// Result of an option edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionEdit {
    pub collaboration: Collaboration,
    /// Lines whose amount was missing or malformed and counted as zero.
    pub flagged: Vec<FlaggedLine>,
}
