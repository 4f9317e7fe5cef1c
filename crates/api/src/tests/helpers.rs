// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use rust_decimal::Decimal;
use serde_json::json;
use sponsorlink::{Caller, CollaborationEngine, NoopNotifier};
use sponsorlink_audit::Cause;
use sponsorlink_domain::{CatalogOption, CatalogOptionId, EventId, Party, PartyId, PartyRole};
use sponsorlink_persistence::Persistence;

use crate::{CreateCollaborationRequest, Engine, create_collaboration};

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("api-req-456"), String::from("API request"))
}

pub fn sponsor() -> Caller {
    Caller::new(PartyId::new("sponsor-1"), PartyRole::Sponsor)
}

pub fn organization() -> Caller {
    Caller::new(PartyId::new("org-1"), PartyRole::Organization)
}

/// A registered sponsor with no stake in the test collaboration.
pub fn outsider() -> Caller {
    Caller::new(PartyId::new("sponsor-2"), PartyRole::Sponsor)
}

/// An engine over a fresh in-memory database with `sponsor-1`,
/// `sponsor-2` and `org-1` registered, and the catalog `banner` (500) and
/// `booth` (300) on event-1 plus `lanyard` (150) on event-2.
pub fn create_test_engine() -> Engine<NoopNotifier> {
    let mut persistence = Persistence::new_in_memory().unwrap();
    for (id, role, name) in [
        ("sponsor-1", PartyRole::Sponsor, "Acme Corp"),
        ("sponsor-2", PartyRole::Sponsor, "Globex"),
        ("org-1", PartyRole::Organization, "RustConf"),
    ] {
        persistence
            .register_party(&Party {
                party_id: PartyId::new(id),
                role,
                display_name: String::from(name),
            })
            .unwrap();
    }
    for (id, event, price) in [
        ("banner", "event-1", 500),
        ("booth", "event-1", 300),
        ("lanyard", "event-2", 150),
    ] {
        persistence
            .publish_catalog_option(&CatalogOption {
                id: CatalogOptionId::new(id),
                event_id: EventId::new(event),
                title: format!("Catalog {id}"),
                description: None,
                price: Decimal::from(price),
            })
            .unwrap();
    }
    CollaborationEngine::without_notifications(persistence)
}

/// A proposal from `sponsor-1` to `org-1` for `banner` and `booth`.
pub fn create_test_proposal() -> CreateCollaborationRequest {
    serde_json::from_value(json!({
        "sponsor_id": "sponsor-1",
        "organization_id": "org-1",
        "event_ids": ["event-1", "event-2"],
        "message": "Let's team up",
        "options": [
            { "kind": "catalog", "catalog_option_id": "banner" },
            { "kind": "catalog", "catalog_option_id": "booth" }
        ]
    }))
    .unwrap()
}

/// Stores the standard proposal and returns its id.
pub fn create_test_collaboration(engine: &mut Engine<NoopNotifier>) -> String {
    create_collaboration(engine, &sponsor(), &create_test_proposal(), create_test_cause())
        .unwrap()
        .collaboration
        .collaboration_id
}
