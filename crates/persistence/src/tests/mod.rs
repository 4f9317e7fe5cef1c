// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod initialization_tests;

use crate::Persistence;
use rust_decimal::Decimal;
use sponsorlink::{CollaborationStore, record_creation};
use sponsorlink_audit::{Actor, Cause};
use sponsorlink_domain::{
    CatalogOption, CatalogOptionId, Collaboration, CollaborationId, CollaborationOption, EventId,
    NewCollaboration, Party, PartyId, PartyRole,
};
use time::OffsetDateTime;
use time::macros::datetime;

pub fn create_test_actor() -> Actor {
    Actor::party(&PartyId::new("sponsor-1"), PartyRole::Sponsor)
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("test-cause"), String::from("Test operation"))
}

pub fn test_now() -> OffsetDateTime {
    datetime!(2026-03-01 12:00 UTC)
}

pub fn catalog_option(id: &str, event: &str, price: i64) -> CatalogOption {
    CatalogOption {
        id: CatalogOptionId::new(id),
        event_id: EventId::new(event),
        title: format!("Catalog {id}"),
        description: Some(format!("{id} placement")),
        price: Decimal::from(price),
    }
}

/// A database with `sponsor-1`, `org-1` and three published options:
/// `banner` (500) and `booth` (300) on event-1, `lanyard` (150) on event-2.
pub fn create_seeded_persistence() -> Persistence {
    let mut persistence = Persistence::new_in_memory().unwrap();
    for (id, role, name) in [
        ("sponsor-1", PartyRole::Sponsor, "Acme Corp"),
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
    for option in [
        catalog_option("banner", "event-1", 500),
        catalog_option("booth", "event-1", 300),
        catalog_option("lanyard", "event-2", 150),
    ] {
        persistence.publish_catalog_option(&option).unwrap();
    }
    persistence
}

/// A pending collaboration with `banner` and `booth`, not yet stored.
pub fn create_test_collaboration(id: &str) -> Collaboration {
    Collaboration::propose(
        CollaborationId::new(id),
        NewCollaboration {
            sponsor_id: PartyId::new("sponsor-1"),
            organization_id: PartyId::new("org-1"),
            event_ids: vec![EventId::new("event-1"), EventId::new("event-2")],
            message: Some(String::from("Let's team up")),
        },
        vec![
            CollaborationOption::snapshot(&catalog_option("banner", "event-1", 500)),
            CollaborationOption::snapshot(&catalog_option("booth", "event-1", 300)),
        ],
        test_now(),
    )
    .unwrap()
}

/// Stores a collaboration and links all of its options.
pub fn store(persistence: &mut Persistence, collaboration: &Collaboration) {
    persistence
        .insert_collaboration(
            collaboration,
            &record_creation(collaboration, create_test_actor(), create_test_cause()),
        )
        .unwrap();
    for (position, option) in collaboration.options().iter().enumerate() {
        persistence
            .link_option(collaboration.id(), position, option)
            .unwrap();
    }
}
