// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    TestEngine, create_in_progress, create_pending, create_test_cause, create_test_engine,
    organization, sponsor,
};
use crate::{CoreError, SettlementDecision, TransitionPayload};
use sponsorlink_domain::{
    Collaboration, CollaborationStatus, DomainError, ErrorKind, TransitionAction,
};

const PROOF: &[u8] = b"%PDF-1.7 proof of delivery";

fn submitted(engine: &mut TestEngine) -> Collaboration {
    let collaboration = create_in_progress(engine);
    engine
        .submit_settlement(
            collaboration.id(),
            &organization(),
            "proof.pdf",
            PROOF,
            create_test_cause(),
        )
        .unwrap()
}

#[test]
fn test_submit_stores_file_and_moves_to_settlement() {
    let mut engine = create_test_engine();
    let collaboration = submitted(&mut engine);

    assert_eq!(collaboration.status(), CollaborationStatus::Settlement);
    let file_ref = collaboration.settlement_file_ref().unwrap();
    assert_eq!(engine.backend().files.get(file_ref).unwrap(), PROOF);

    let url = engine
        .settlement_file_url(collaboration.id(), &sponsor())
        .unwrap()
        .unwrap();
    assert!(url.starts_with("https://files.test/settlements/"));
}

#[test]
fn test_no_settlement_url_before_submission() {
    let mut engine = create_test_engine();
    let collaboration = create_in_progress(&mut engine);

    let url = engine
        .settlement_file_url(collaboration.id(), &organization())
        .unwrap();

    assert!(url.is_none());
}

#[test]
fn test_empty_file_is_rejected_before_upload() {
    let mut engine = create_test_engine();
    let collaboration = create_in_progress(&mut engine);

    let err = engine
        .submit_settlement(
            collaboration.id(),
            &organization(),
            "empty.pdf",
            &[],
            create_test_cause(),
        )
        .unwrap_err();

    assert_eq!(
        err,
        CoreError::DomainViolation(DomainError::EmptySettlementFile)
    );
    assert!(engine.backend().files.is_empty());
}

#[test]
fn test_submit_requires_organization_in_progress() {
    let mut engine = create_test_engine();
    let pending = create_pending(&mut engine);

    let too_early = engine
        .submit_settlement(
            pending.id(),
            &organization(),
            "proof.pdf",
            PROOF,
            create_test_cause(),
        )
        .unwrap_err();
    assert_eq!(too_early.kind(), ErrorKind::InvalidState);

    let in_progress = create_in_progress(&mut engine);
    let wrong_party = engine
        .submit_settlement(
            in_progress.id(),
            &sponsor(),
            "proof.pdf",
            PROOF,
            create_test_cause(),
        )
        .unwrap_err();
    assert_eq!(wrong_party.kind(), ErrorKind::Forbidden);

    assert!(engine.backend().files.is_empty());
}

#[test]
fn test_upload_failure_leaves_status_unchanged() {
    let mut engine = create_test_engine();
    let collaboration = create_in_progress(&mut engine);
    engine.backend_mut().fail_uploads = true;

    let err = engine
        .submit_settlement(
            collaboration.id(),
            &organization(),
            "proof.pdf",
            PROOF,
            create_test_cause(),
        )
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::StorageFailure);
    let stored = engine
        .get_by_id(collaboration.id(), &organization())
        .unwrap();
    assert_eq!(stored.status(), CollaborationStatus::InProgress);
    assert!(stored.settlement_file_ref().is_none());
}

#[test]
fn test_failed_status_write_orphans_upload() {
    let mut engine = create_test_engine();
    let collaboration = create_in_progress(&mut engine);
    engine.backend_mut().fail_updates = true;

    let err = engine
        .submit_settlement(
            collaboration.id(),
            &organization(),
            "proof.pdf",
            PROOF,
            create_test_cause(),
        )
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::StorageFailure);
    assert_eq!(engine.backend().files.len(), 1);
    let stored = engine
        .get_by_id(collaboration.id(), &organization())
        .unwrap();
    assert_eq!(stored.status(), CollaborationStatus::InProgress);
    assert!(stored.settlement_file_ref().is_none());

    engine.backend_mut().fail_updates = false;
    let retried = engine
        .submit_settlement(
            collaboration.id(),
            &organization(),
            "proof.pdf",
            PROOF,
            create_test_cause(),
        )
        .unwrap();
    assert_eq!(retried.status(), CollaborationStatus::Settlement);
    assert_eq!(engine.backend().files.len(), 2);
}

#[test]
fn test_resolve_requires_submitted_settlement() {
    let mut engine = create_test_engine();
    let collaboration = create_in_progress(&mut engine);

    let err = engine
        .resolve_settlement(
            collaboration.id(),
            &sponsor(),
            SettlementDecision::Accept,
            create_test_cause(),
        )
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidState);
}

#[test]
fn test_only_sponsor_resolves_settlement() {
    let mut engine = create_test_engine();
    let collaboration = submitted(&mut engine);

    let err = engine
        .resolve_settlement(
            collaboration.id(),
            &organization(),
            SettlementDecision::Accept,
            create_test_cause(),
        )
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Forbidden);
}

#[test]
fn test_rejection_keeps_file_until_resubmission() {
    let mut engine = create_test_engine();
    let collaboration = submitted(&mut engine);
    let first = collaboration.settlement_file_ref().cloned().unwrap();

    let rejected = engine
        .resolve_settlement(
            collaboration.id(),
            &sponsor(),
            SettlementDecision::Reject,
            create_test_cause(),
        )
        .unwrap();
    assert_eq!(rejected.status(), CollaborationStatus::SettlementRejected);
    assert_eq!(rejected.settlement_file_ref(), Some(&first));

    let resubmitted = engine
        .submit_settlement(
            collaboration.id(),
            &organization(),
            "proof-v2.pdf",
            b"second attempt",
            create_test_cause(),
        )
        .unwrap();
    assert_eq!(resubmitted.status(), CollaborationStatus::Settlement);
    assert_ne!(resubmitted.settlement_file_ref(), Some(&first));

    let completed = engine
        .resolve_settlement(
            collaboration.id(),
            &sponsor(),
            SettlementDecision::Accept,
            create_test_cause(),
        )
        .unwrap();
    assert_eq!(completed.status(), CollaborationStatus::Completed);
    assert!(completed.settlement_file_ref().is_some());
}

#[test]
fn test_submit_transition_without_file_is_invalid_payload() {
    let mut engine = create_test_engine();
    let collaboration = create_in_progress(&mut engine);

    let err = engine
        .request_transition(
            collaboration.id(),
            &organization(),
            TransitionAction::SubmitSettlement,
            TransitionPayload::default(),
            create_test_cause(),
        )
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidPayload);
}

#[test]
fn test_file_presence_follows_status() {
    let mut engine = create_test_engine();
    let collaboration = submitted(&mut engine);
    let id = collaboration.id().clone();

    let mut seen = vec![collaboration];
    seen.push(
        engine
            .resolve_settlement(&id, &sponsor(), SettlementDecision::Reject, create_test_cause())
            .unwrap(),
    );
    seen.push(
        engine
            .submit_settlement(&id, &organization(), "again.pdf", PROOF, create_test_cause())
            .unwrap(),
    );

    for collaboration in &seen {
        assert_eq!(
            collaboration.settlement_file_ref().is_some(),
            collaboration.status().holds_settlement_file()
        );
        assert!(collaboration.check_invariants().is_ok());
    }

    let pending = create_pending(&mut engine);
    assert!(pending.settlement_file_ref().is_none());
}
