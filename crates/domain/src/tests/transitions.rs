// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{pending_collaboration, test_now};
use crate::{
    Collaboration, CollaborationParts, CollaborationStatus, DomainError, ErrorKind, FileRef,
    PartyRole, TransitionAction, find_rule, resolve_transition,
};

const ROLES: [PartyRole; 2] = [PartyRole::Organization, PartyRole::Sponsor];

/// Forces a collaboration into `status` for table-driven checks.
fn collaboration_in(status: CollaborationStatus) -> Collaboration {
    let base = pending_collaboration();
    Collaboration::restore(CollaborationParts {
        id: base.id().clone(),
        sponsor_id: base.sponsor_id().clone(),
        organization_id: base.organization_id().clone(),
        event_ids: base.event_ids().to_vec(),
        status,
        message: base.message().map(str::to_string),
        total_amount: base.total_amount(),
        settlement_file_ref: status
            .holds_settlement_file()
            .then(|| FileRef::new("settlements/collab-1/proof.pdf")),
        options: base.options().to_vec(),
        version: base.version(),
        created_at: base.created_at(),
        updated_at: base.updated_at(),
    })
}

#[test]
fn test_every_combination_outside_the_table_is_rejected_without_mutation() {
    for status in CollaborationStatus::ALL {
        for role in ROLES {
            for action in TransitionAction::ALL {
                let permitted = find_rule(status, action).is_some_and(|r| r.by.allows(role));
                if permitted {
                    continue;
                }

                let before = collaboration_in(status);
                let file = Some(FileRef::new("new-proof.pdf"));
                let result = before.transition(role, action, file, test_now());

                let err = result.expect_err("combination outside the table must fail");
                assert!(
                    matches!(err.kind(), ErrorKind::Forbidden | ErrorKind::InvalidState),
                    "{status}/{role}/{action} produced {err:?}"
                );
                assert_eq!(before, collaboration_in(status));
            }
        }
    }
}

#[test]
fn test_terminal_states_accept_no_transition() {
    for status in CollaborationStatus::ALL.into_iter().filter(CollaborationStatus::is_terminal) {
        for role in ROLES {
            for action in TransitionAction::ALL {
                assert_eq!(
                    resolve_transition(status, role, action),
                    Err(DomainError::TerminalStatus { status, action })
                );
            }
        }
    }
}

#[test]
fn test_wrong_role_is_forbidden_and_wrong_status_is_invalid_state() {
    let forbidden = resolve_transition(
        CollaborationStatus::Pending,
        PartyRole::Sponsor,
        TransitionAction::Accept,
    )
    .unwrap_err();
    assert_eq!(forbidden.kind(), ErrorKind::Forbidden);

    let invalid = resolve_transition(
        CollaborationStatus::InProgress,
        PartyRole::Sponsor,
        TransitionAction::Accept,
    )
    .unwrap_err();
    assert_eq!(invalid.kind(), ErrorKind::InvalidState);
}

#[test]
fn test_pending_reject_goes_to_canceled() {
    let collaboration = pending_collaboration();
    let rejected = collaboration
        .transition(
            PartyRole::Organization,
            TransitionAction::Reject,
            None,
            test_now(),
        )
        .unwrap();
    assert_eq!(rejected.status(), CollaborationStatus::Canceled);
}

#[test]
fn test_accepted_has_no_outgoing_edges() {
    let accepted = collaboration_in(CollaborationStatus::Accepted);
    assert!(!CollaborationStatus::Accepted.is_terminal());
    for role in ROLES {
        assert!(crate::allowed_actions(CollaborationStatus::Accepted, role).is_empty());
        assert!(
            accepted
                .transition(role, TransitionAction::AcceptTerms, None, test_now())
                .is_err()
        );
    }
}
