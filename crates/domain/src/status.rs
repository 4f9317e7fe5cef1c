// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Collaboration status states.
//!
//! Status is only ever changed through the transition table in
//! `transition.rs`; this module only names the states and their
//! static properties.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle status of a sponsorship collaboration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollaborationStatus {
    /// Proposal sent by the sponsor, awaiting the organization.
    Pending,
    /// Both parties are editing the option set.
    Negotiation,
    /// The organization accepted the proposal as sent.
    Accepted,
    /// Proposal declined.
    Rejected,
    /// Terms agreed; the organization is delivering.
    InProgress,
    /// Proof of delivery submitted, awaiting the sponsor.
    Settlement,
    /// The sponsor rejected the submitted proof.
    SettlementRejected,
    /// The sponsor accepted the proof; the collaboration is closed.
    Completed,
    /// Withdrawn by either party.
    Canceled,
}

impl CollaborationStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 9] = [
        Self::Pending,
        Self::Negotiation,
        Self::Accepted,
        Self::Rejected,
        Self::InProgress,
        Self::Settlement,
        Self::SettlementRejected,
        Self::Completed,
        Self::Canceled,
    ];

    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Negotiation => "negotiation",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::InProgress => "in_progress",
            Self::Settlement => "settlement",
            Self::SettlementRejected => "settlement_rejected",
            Self::Completed => "completed",
            Self::Canceled => "canceled",
        }
    }

    /// Parses a status from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatus` if the string is not a valid status.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "pending" => Ok(Self::Pending),
            "negotiation" => Ok(Self::Negotiation),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            "in_progress" => Ok(Self::InProgress),
            "settlement" => Ok(Self::Settlement),
            "settlement_rejected" => Ok(Self::SettlementRejected),
            "completed" => Ok(Self::Completed),
            "canceled" => Ok(Self::Canceled),
            _ => Err(DomainError::InvalidStatus {
                status: s.to_string(),
            }),
        }
    }

    /// Returns true if no transition leaves this status.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Completed | Self::Canceled)
    }

    /// Returns true if a collaboration in this status must carry a settlement file.
    #[must_use]
    pub const fn holds_settlement_file(&self) -> bool {
        matches!(
            self,
            Self::Settlement | Self::SettlementRejected | Self::Completed
        )
    }

    /// Returns true if the option set may still be edited.
    #[must_use]
    pub const fn allows_option_edits(&self) -> bool {
        matches!(self, Self::Pending | Self::Negotiation)
    }
}

impl std::fmt::Display for CollaborationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollaborationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_string_round_trip() {
        for status in CollaborationStatus::ALL {
            match status.as_str().parse::<CollaborationStatus>() {
                Ok(parsed) => assert_eq!(status, parsed),
                Err(e) => panic!("Failed to parse status string: {status}: {e}"),
            }
        }
    }

    #[test]
    fn test_invalid_status_string() {
        let result = CollaborationStatus::parse_str("sent");
        assert!(matches!(result, Err(DomainError::InvalidStatus { .. })));
    }

    #[test]
    fn test_terminal_states() {
        let terminal: Vec<CollaborationStatus> = CollaborationStatus::ALL
            .into_iter()
            .filter(CollaborationStatus::is_terminal)
            .collect();

        assert_eq!(
            terminal,
            vec![
                CollaborationStatus::Rejected,
                CollaborationStatus::Completed,
                CollaborationStatus::Canceled,
            ]
        );
    }

    #[test]
    fn test_settlement_file_states() {
        assert!(CollaborationStatus::Settlement.holds_settlement_file());
        assert!(CollaborationStatus::SettlementRejected.holds_settlement_file());
        assert!(CollaborationStatus::Completed.holds_settlement_file());
        assert!(!CollaborationStatus::InProgress.holds_settlement_file());
        assert!(!CollaborationStatus::Canceled.holds_settlement_file());
    }

    #[test]
    fn test_option_edit_states() {
        let editable: Vec<CollaborationStatus> = CollaborationStatus::ALL
            .into_iter()
            .filter(CollaborationStatus::allows_option_edits)
            .collect();

        assert_eq!(
            editable,
            vec![
                CollaborationStatus::Pending,
                CollaborationStatus::Negotiation
            ]
        );
    }
}
