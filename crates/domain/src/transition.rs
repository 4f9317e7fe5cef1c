// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The collaboration transition table.
//!
//! The table is exhaustive: any (status, action, role) combination not
//! listed is rejected. Callers never assign a status directly; they ask
//! [`resolve_transition`] for the destination and get either the target
//! status or a role-aware error.

use crate::error::DomainError;
use crate::status::CollaborationStatus;
use crate::types::PartyRole;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// An action a party may request against a collaboration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionAction {
    Accept,
    Reject,
    Negotiate,
    Cancel,
    EditOptions,
    AcceptTerms,
    SubmitSettlement,
    AcceptSettlement,
    RejectSettlement,
    ResubmitSettlement,
}

impl TransitionAction {
    /// Every action, in table order.
    pub const ALL: [Self; 10] = [
        Self::Accept,
        Self::Reject,
        Self::Negotiate,
        Self::Cancel,
        Self::EditOptions,
        Self::AcceptTerms,
        Self::SubmitSettlement,
        Self::AcceptSettlement,
        Self::RejectSettlement,
        Self::ResubmitSettlement,
    ];

    /// Returns the string representation of the action.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Reject => "reject",
            Self::Negotiate => "negotiate",
            Self::Cancel => "cancel",
            Self::EditOptions => "edit_options",
            Self::AcceptTerms => "accept_terms",
            Self::SubmitSettlement => "submit_settlement",
            Self::AcceptSettlement => "accept_settlement",
            Self::RejectSettlement => "reject_settlement",
            Self::ResubmitSettlement => "resubmit_settlement",
        }
    }

    /// Phrase used in user-facing messages, e.g. "only the sponsor may
    /// {verb} a collaboration".
    #[must_use]
    pub const fn verb(&self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Reject => "reject",
            Self::Negotiate => "open negotiation on",
            Self::Cancel => "cancel",
            Self::EditOptions => "edit the options of",
            Self::AcceptTerms => "accept the terms of",
            Self::SubmitSettlement => "submit a settlement for",
            Self::AcceptSettlement => "accept the settlement of",
            Self::RejectSettlement => "reject the settlement of",
            Self::ResubmitSettlement => "resubmit a settlement for",
        }
    }

    /// Returns true if the action must carry a freshly uploaded settlement file.
    #[must_use]
    pub const fn requires_settlement_file(&self) -> bool {
        matches!(self, Self::SubmitSettlement | Self::ResubmitSettlement)
    }
}

impl std::fmt::Display for TransitionAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransitionAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| DomainError::InvalidAction {
                action: s.to_string(),
            })
    }
}

/// Which party a rule permits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permitted {
    Only(PartyRole),
    Either,
}

impl Permitted {
    /// Returns true if `role` satisfies this rule.
    #[must_use]
    pub fn allows(self, role: PartyRole) -> bool {
        match self {
            Self::Only(required) => required == role,
            Self::Either => true,
        }
    }
}

impl std::fmt::Display for Permitted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Only(role) => write!(f, "the {}", role.as_str()),
            Self::Either => f.write_str("either party"),
        }
    }
}

/// One edge of the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRule {
    pub from: CollaborationStatus,
    pub action: TransitionAction,
    pub by: Permitted,
    pub to: CollaborationStatus,
}

const fn rule(
    from: CollaborationStatus,
    action: TransitionAction,
    by: Permitted,
    to: CollaborationStatus,
) -> TransitionRule {
    TransitionRule {
        from,
        action,
        by,
        to,
    }
}

use CollaborationStatus as S;
use TransitionAction as A;

const ORG: Permitted = Permitted::Only(PartyRole::Organization);
const SPONSOR: Permitted = Permitted::Only(PartyRole::Sponsor);

/// Every permitted edge. Each (from, action) pair appears at most once.
pub const TRANSITIONS: [TransitionRule; 11] = [
    rule(S::Pending, A::Accept, ORG, S::Accepted),
    rule(S::Pending, A::Reject, ORG, S::Canceled),
    rule(S::Pending, A::Negotiate, ORG, S::Negotiation),
    rule(S::Pending, A::Cancel, SPONSOR, S::Canceled),
    rule(S::Negotiation, A::EditOptions, Permitted::Either, S::Negotiation),
    rule(S::Negotiation, A::AcceptTerms, Permitted::Either, S::InProgress),
    rule(S::Negotiation, A::Cancel, Permitted::Either, S::Canceled),
    rule(S::InProgress, A::SubmitSettlement, ORG, S::Settlement),
    rule(S::Settlement, A::AcceptSettlement, SPONSOR, S::Completed),
    rule(S::Settlement, A::RejectSettlement, SPONSOR, S::SettlementRejected),
    rule(
        S::SettlementRejected,
        A::ResubmitSettlement,
        ORG,
        S::Settlement,
    ),
];

/// Looks up the rule for an action from a status, ignoring role.
#[must_use]
pub fn find_rule(
    from: CollaborationStatus,
    action: TransitionAction,
) -> Option<&'static TransitionRule> {
    TRANSITIONS.iter().find(|r| r.from == from && r.action == action)
}

/// Resolves the destination status of `action` requested by `role`.
///
/// # Arguments
///
/// * `from` - The collaboration's current status
/// * `role` - The caller's relationship to the collaboration
/// * `action` - The requested action
///
/// # Errors
///
/// * `DomainError::TerminalStatus` if `from` is terminal
/// * `DomainError::InvalidTransition` if no rule exists for `action` from `from`
/// * `DomainError::ForbiddenTransition` if a rule exists but names the other party
pub fn resolve_transition(
    from: CollaborationStatus,
    role: PartyRole,
    action: TransitionAction,
) -> Result<CollaborationStatus, DomainError> {
    if from.is_terminal() {
        return Err(DomainError::TerminalStatus {
            status: from,
            action,
        });
    }

    let Some(rule) = find_rule(from, action) else {
        return Err(DomainError::InvalidTransition {
            status: from,
            action,
        });
    };

    if !rule.by.allows(role) {
        return Err(DomainError::ForbiddenTransition {
            status: from,
            action,
            role,
            permitted: rule.by,
        });
    }

    Ok(rule.to)
}

/// Lists the actions `role` may request from `status`, in table order.
#[must_use]
pub fn allowed_actions(status: CollaborationStatus, role: PartyRole) -> Vec<TransitionAction> {
    TRANSITIONS
        .iter()
        .filter(|r| r.from == status && r.by.allows(role))
        .map(|r| r.action)
        .collect()
}
