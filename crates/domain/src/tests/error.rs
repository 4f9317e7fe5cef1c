// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    CollaborationId, CollaborationStatus, DomainError, ErrorKind, PartyId, PartyRole, Permitted,
    TransitionAction,
};
use rust_decimal::Decimal;

#[test]
fn test_forbidden_message_is_role_aware() {
    let err: DomainError = DomainError::ForbiddenTransition {
        status: CollaborationStatus::Pending,
        action: TransitionAction::Accept,
        role: PartyRole::Sponsor,
        permitted: Permitted::Only(PartyRole::Organization),
    };
    assert_eq!(
        format!("{err}"),
        "Only the organization may accept a collaboration in status 'pending'; the sponsor may not"
    );
    assert_eq!(err.kind(), ErrorKind::Forbidden);
}

#[test]
fn test_domain_error_display() {
    let err: DomainError = DomainError::InvalidTransition {
        status: CollaborationStatus::InProgress,
        action: TransitionAction::Negotiate,
    };
    assert_eq!(
        format!("{err}"),
        "Action 'negotiate' is not valid for a collaboration in status 'in_progress'"
    );

    let err: DomainError = DomainError::MissingSettlementFile {
        action: TransitionAction::SubmitSettlement,
    };
    assert_eq!(
        format!("{err}"),
        "Action 'submit_settlement' requires a settlement file"
    );

    let err: DomainError = DomainError::NegativeAmount {
        index: 2,
        amount: Decimal::from(-10),
    };
    assert_eq!(format!("{err}"), "Option 2 has a negative amount: -10");

    let err: DomainError = DomainError::CollaborationNotFound {
        collaboration_id: CollaborationId::new("abc"),
    };
    assert_eq!(format!("{err}"), "Collaboration 'abc' not found");

    let err: DomainError = DomainError::PartyNotFound {
        party_id: PartyId::new("s-9"),
        role: PartyRole::Sponsor,
    };
    assert_eq!(format!("{err}"), "No sponsor with id 's-9'");
}

#[test]
fn test_error_kinds() {
    assert_eq!(
        DomainError::TerminalStatus {
            status: CollaborationStatus::Completed,
            action: TransitionAction::Cancel,
        }
        .kind(),
        ErrorKind::InvalidState
    );
    assert_eq!(
        DomainError::OptionsLocked {
            status: CollaborationStatus::Settlement,
        }
        .kind(),
        ErrorKind::InvalidState
    );
    assert_eq!(DomainError::EmptyOptionList.kind(), ErrorKind::InvalidPayload);
    assert_eq!(
        DomainError::CollaborationNotFound {
            collaboration_id: CollaborationId::new("x"),
        }
        .kind(),
        ErrorKind::NotFound
    );
}
