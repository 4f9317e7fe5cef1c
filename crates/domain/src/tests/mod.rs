// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod error;
mod transitions;

use crate::{
    CatalogOption, CatalogOptionId, Collaboration, CollaborationId, CollaborationOption, EventId,
    NewCollaboration, PartyId,
};
use rust_decimal::Decimal;
use time::OffsetDateTime;
use time::macros::datetime;

pub fn test_now() -> OffsetDateTime {
    datetime!(2026-03-01 12:00 UTC)
}

pub fn catalog_option(id: &str, price: i64) -> CatalogOption {
    CatalogOption {
        id: CatalogOptionId::new(id),
        event_id: EventId::new("event-1"),
        title: format!("Catalog {id}"),
        description: Some(String::from("Published by the organizer")),
        price: Decimal::from(price),
    }
}

pub fn new_collaboration() -> NewCollaboration {
    NewCollaboration {
        sponsor_id: PartyId::new("sponsor-1"),
        organization_id: PartyId::new("org-1"),
        event_ids: vec![EventId::new("event-1"), EventId::new("event-2")],
        message: Some(String::from("We would like to sponsor your meetup")),
    }
}

/// A pending collaboration with catalog options priced at 500 and 300.
pub fn pending_collaboration() -> Collaboration {
    Collaboration::propose(
        CollaborationId::new("collab-1"),
        new_collaboration(),
        vec![
            CollaborationOption::snapshot(&catalog_option("banner", 500)),
            CollaborationOption::snapshot(&catalog_option("booth", 300)),
        ],
        test_now(),
    )
    .unwrap()
}
