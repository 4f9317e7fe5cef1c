// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rust_decimal::Decimal;
use serde_json::json;
use sponsorlink::{CollaboratorError, CoreError};
use sponsorlink_domain::{
    CatalogOptionId, CollaborationId, CollaborationStatus, DomainError, ErrorKind, EventId,
    LineAmount, PartyId, PartyRole, TransitionAction,
};

use crate::{
    ApiError, line_amount, parse_caller, request_cause, status_label, translate_core_error,
    translate_domain_error,
};

// ===== Caller identity =====

#[test]
fn test_parse_caller_accepts_forwarded_identity() {
    let caller = parse_caller(Some(" org-1 "), Some("organization")).unwrap();

    assert_eq!(caller.party_id, PartyId::new("org-1"));
    assert_eq!(caller.role, PartyRole::Organization);
}

#[test]
fn test_parse_caller_rejects_missing_or_unknown_identity() {
    for (id, role) in [
        (None, Some("sponsor")),
        (Some("  "), Some("sponsor")),
        (Some("sponsor-1"), None),
        (Some("sponsor-1"), Some("admin")),
    ] {
        let result = parse_caller(id, role);
        assert!(
            matches!(result, Err(ApiError::Unauthenticated { .. })),
            "{id:?}/{role:?} gave {result:?}"
        );
    }
}

#[test]
fn test_request_cause_carries_id_and_description() {
    let cause = request_cause("req-1", "POST /collaborations");

    assert_eq!(cause.id, "req-1");
    assert_eq!(cause.description, "POST /collaborations");
}

// ===== Error translation =====

fn sample_domain_errors() -> Vec<DomainError> {
    vec![
        DomainError::CollaborationNotFound {
            collaboration_id: CollaborationId::new("c-1"),
        },
        DomainError::CatalogOptionNotFound {
            catalog_option_id: CatalogOptionId::new("banner"),
        },
        DomainError::PartyNotFound {
            party_id: PartyId::new("org-9"),
            role: PartyRole::Organization,
        },
        DomainError::NotAParty {
            party_id: PartyId::new("sponsor-2"),
            role: PartyRole::Sponsor,
            collaboration_id: CollaborationId::new("c-1"),
        },
        DomainError::InvalidTransition {
            status: CollaborationStatus::InProgress,
            action: TransitionAction::Accept,
        },
        DomainError::TerminalStatus {
            status: CollaborationStatus::Completed,
            action: TransitionAction::Cancel,
        },
        DomainError::OptionsLocked {
            status: CollaborationStatus::Settlement,
        },
        DomainError::MissingSettlementFile {
            action: TransitionAction::SubmitSettlement,
        },
        DomainError::EmptyOptionList,
        DomainError::NoEventIds,
        DomainError::DuplicateEventId {
            event_id: EventId::new("event-1"),
        },
        DomainError::BlankIdentifier {
            field: "organization_id",
        },
        DomainError::NegativeAmount {
            index: 0,
            amount: Decimal::from(-5),
        },
        DomainError::AmountOverflow { index: 1 },
    ]
}

#[test]
fn test_domain_errors_translate_by_kind() {
    for err in sample_domain_errors() {
        let expected = match err.kind() {
            ErrorKind::NotFound => "not_found",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::InvalidState => "invalid_state",
            ErrorKind::InvalidPayload => "invalid_payload",
            other => panic!("unexpected kind {other} for {err}"),
        };
        let message = err.to_string();

        let api = translate_domain_error(err);

        assert_eq!(api.code(), expected, "{message}");
        assert!(api.to_string().contains(&message), "{api} lacks {message}");
    }
}

#[test]
fn test_blank_identifier_names_the_field() {
    let api = translate_domain_error(DomainError::BlankIdentifier {
        field: "organization_id",
    });

    assert!(matches!(
        api,
        ApiError::InvalidInput { ref field, .. } if field == "organization_id"
    ));
}

#[test]
fn test_storage_errors_translate_to_conflict_or_unavailable() {
    let concurrent = translate_core_error(CoreError::ConcurrentModification {
        collaboration_id: CollaborationId::new("c-1"),
        expected_version: 3,
    });
    let unavailable = translate_core_error(CoreError::Storage(CollaboratorError::unavailable(
        "upload",
        "disk full",
    )));
    let nothing_linked = translate_core_error(CoreError::NoOptionsLinked { dropped: vec![] });
    let internal = translate_core_error(CoreError::Internal(String::from("boom")));

    assert!(matches!(concurrent, ApiError::Conflict { .. }));
    assert!(
        matches!(unavailable, ApiError::StorageUnavailable { ref message } if message.contains("disk full"))
    );
    assert!(matches!(nothing_linked, ApiError::StorageUnavailable { .. }));
    assert!(matches!(internal, ApiError::Internal { .. }));
}

// ===== Presentation =====

#[test]
fn test_every_status_has_a_label_for_both_roles() {
    for status in CollaborationStatus::ALL {
        for role in [PartyRole::Organization, PartyRole::Sponsor] {
            let label = status_label(status, role);
            assert!(!label.trim().is_empty(), "{status} / {role}");
        }
    }
}

#[test]
fn test_label_depends_on_whose_turn_it_is() {
    assert_eq!(
        status_label(CollaborationStatus::Settlement, PartyRole::Sponsor),
        "Review settlement"
    );
    assert_eq!(
        status_label(CollaborationStatus::Settlement, PartyRole::Organization),
        "Awaiting sponsor review"
    );
    assert_eq!(
        status_label(CollaborationStatus::Completed, PartyRole::Sponsor),
        status_label(CollaborationStatus::Completed, PartyRole::Organization)
    );
}

#[test]
fn test_line_amount_from_json() {
    assert_eq!(
        line_amount(Some(&json!(12.5))),
        LineAmount::Value(Decimal::new(125, 1))
    );
    assert_eq!(
        line_amount(Some(&json!(" 7 "))),
        LineAmount::Value(Decimal::from(7))
    );
    assert_eq!(line_amount(Some(&json!(null))), LineAmount::Missing);
    assert_eq!(line_amount(None), LineAmount::Missing);
    assert_eq!(
        line_amount(Some(&json!(true))),
        LineAmount::Malformed(String::from("true"))
    );
}
