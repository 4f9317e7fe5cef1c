// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use sponsorlink_domain::{
    Collaboration, CollaborationId, CollaborationOption, CollaborationParts, CollaborationStatus,
    EventId, FileRef, PartyId, PartyRole,
};
use std::str::FromStr;

use crate::data_models::{CollaborationRow, OptionRow, parse_decimal, parse_timestamp};
use crate::diesel_schema::{collaboration_events, collaboration_options, collaborations};
use crate::error::PersistenceError;

/// Loads a collaboration with its events and options.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is invalid.
pub fn get_collaboration(
    conn: &mut SqliteConnection,
    id: &CollaborationId,
) -> Result<Option<Collaboration>, PersistenceError> {
    let row: Option<CollaborationRow> = collaborations::table
        .filter(collaborations::collaboration_id.eq(id.as_str()))
        .select(CollaborationRow::as_select())
        .first(conn)
        .optional()?;

    row.map(|row| hydrate(conn, row)).transpose()
}

/// Lists collaborations in which `party_id` holds `role`, newest first.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is invalid.
pub fn list_collaborations(
    conn: &mut SqliteConnection,
    party_id: &PartyId,
    role: PartyRole,
) -> Result<Vec<Collaboration>, PersistenceError> {
    let query = collaborations::table
        .select(CollaborationRow::as_select())
        .into_boxed();
    let query = match role {
        PartyRole::Sponsor => query.filter(collaborations::sponsor_id.eq(party_id.as_str())),
        PartyRole::Organization => {
            query.filter(collaborations::organization_id.eq(party_id.as_str()))
        }
    };
    let rows: Vec<CollaborationRow> = query.load(conn)?;

    let mut found: Vec<Collaboration> = rows
        .into_iter()
        .map(|row| hydrate(conn, row))
        .collect::<Result<_, _>>()?;
    // Stored timestamps vary in fractional precision, so sort on parsed values.
    found.sort_by(|a, b| {
        b.created_at()
            .cmp(&a.created_at())
            .then_with(|| a.id().cmp(b.id()))
    });
    Ok(found)
}

/// Returns true if a collaboration row exists.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn collaboration_exists(
    conn: &mut SqliteConnection,
    id: &CollaborationId,
) -> Result<bool, PersistenceError> {
    let count: i64 = collaborations::table
        .filter(collaborations::collaboration_id.eq(id.as_str()))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}

fn hydrate(
    conn: &mut SqliteConnection,
    row: CollaborationRow,
) -> Result<Collaboration, PersistenceError> {
    let event_ids: Vec<EventId> = collaboration_events::table
        .filter(collaboration_events::collaboration_id.eq(&row.collaboration_id))
        .order(collaboration_events::position.asc())
        .select(collaboration_events::event_id)
        .load::<String>(conn)?
        .into_iter()
        .map(EventId::new)
        .collect();

    let options: Vec<CollaborationOption> = collaboration_options::table
        .filter(collaboration_options::collaboration_id.eq(&row.collaboration_id))
        .order(collaboration_options::position.asc())
        .select(OptionRow::as_select())
        .load::<OptionRow>(conn)?
        .into_iter()
        .map(OptionRow::into_option)
        .collect::<Result<_, _>>()?;

    Ok(Collaboration::restore(CollaborationParts {
        id: CollaborationId::new(row.collaboration_id),
        sponsor_id: PartyId::new(row.sponsor_id),
        organization_id: PartyId::new(row.organization_id),
        event_ids,
        status: CollaborationStatus::from_str(&row.status)?,
        message: row.message,
        total_amount: parse_decimal(&row.total_amount)?,
        settlement_file_ref: row.settlement_file_ref.map(FileRef::new),
        options,
        version: row.version,
        created_at: parse_timestamp(&row.created_at)?,
        updated_at: parse_timestamp(&row.updated_at)?,
    }))
}
