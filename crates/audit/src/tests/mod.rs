// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::unwrap_used)]

use crate::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use rust_decimal::Decimal;
use sponsorlink_domain::{
    CatalogOption, CatalogOptionId, Collaboration, CollaborationId, CollaborationOption, EventId,
    FileRef, NewCollaboration, PartyId, PartyRole, TransitionAction,
};
use time::macros::datetime;

fn collaboration() -> Collaboration {
    let catalog = CatalogOption {
        id: CatalogOptionId::new("banner"),
        event_id: EventId::new("event-1"),
        title: String::from("Banner"),
        description: None,
        price: Decimal::from(500),
    };
    Collaboration::propose(
        CollaborationId::new("collab-1"),
        NewCollaboration {
            sponsor_id: PartyId::new("sponsor-1"),
            organization_id: PartyId::new("org-1"),
            event_ids: vec![EventId::new("event-1")],
            message: None,
        },
        vec![CollaborationOption::snapshot(&catalog)],
        datetime!(2026-03-01 12:00 UTC),
    )
    .unwrap()
}

#[test]
fn test_actor_from_party() {
    let actor: Actor = Actor::party(&PartyId::new("org-1"), PartyRole::Organization);

    assert_eq!(actor.id, "org-1");
    assert_eq!(actor.actor_type, "organization");
}

#[test]
fn test_snapshot_of_pending_collaboration() {
    let snapshot: StateSnapshot = StateSnapshot::of(&collaboration());

    assert_eq!(
        snapshot.data,
        "status=pending total=500 options=1 settlement_file=- version=1"
    );
}

#[test]
fn test_snapshot_includes_settlement_file() {
    let now = datetime!(2026-03-02 09:00 UTC);
    let in_progress = collaboration()
        .transition(
            PartyRole::Organization,
            TransitionAction::Negotiate,
            None,
            now,
        )
        .unwrap()
        .transition(PartyRole::Sponsor, TransitionAction::AcceptTerms, None, now)
        .unwrap();
    let settled = in_progress
        .transition(
            PartyRole::Organization,
            TransitionAction::SubmitSettlement,
            Some(FileRef::new("settlements/collab-1/proof.pdf")),
            now,
        )
        .unwrap();

    let snapshot: StateSnapshot = StateSnapshot::of(&settled);
    assert!(snapshot.data.contains("status=settlement "));
    assert!(
        snapshot
            .data
            .contains("settlement_file=settlements/collab-1/proof.pdf")
    );
}

#[test]
fn test_audit_event_creation_requires_all_fields() {
    let actor: Actor = Actor::party(&PartyId::new("sponsor-1"), PartyRole::Sponsor);
    let cause: Cause = Cause::new(String::from("req-456"), String::from("HTTP request"));
    let action: Action = Action::new(String::from("cancel"), None);
    let before: StateSnapshot = StateSnapshot::absent();
    let after: StateSnapshot = StateSnapshot::of(&collaboration());

    let event: AuditEvent = AuditEvent::new(
        CollaborationId::new("collab-1"),
        actor.clone(),
        cause.clone(),
        action.clone(),
        before.clone(),
        after.clone(),
    );

    assert_eq!(event.collaboration_id.as_str(), "collab-1");
    assert_eq!(event.actor, actor);
    assert_eq!(event.cause, cause);
    assert_eq!(event.action, action);
    assert_eq!(event.before, before);
    assert_eq!(event.after, after);
}
