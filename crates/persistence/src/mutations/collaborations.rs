// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use sponsorlink::TransitionResult;
use sponsorlink_audit::AuditEvent;
use sponsorlink_domain::{Collaboration, CollaborationId, CollaborationOption};
use tracing::debug;

use crate::data_models::{NewOptionRow, format_decimal, format_timestamp};
use crate::diesel_schema::{collaboration_events, collaboration_options, collaborations};
use crate::error::PersistenceError;
use crate::mutations::audit::persist_audit_event;
use crate::queries::collaborations::collaboration_exists;

/// Inserts a collaboration row, its event links and the creation audit
/// event in one transaction. Options are not written here.
///
/// # Errors
///
/// Returns an error if any insert fails; nothing is written in that case.
pub fn insert_collaboration(
    conn: &mut SqliteConnection,
    collaboration: &Collaboration,
    audit_event: &AuditEvent,
) -> Result<(), PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let id: &str = collaboration.id().as_str();
        diesel::insert_into(collaborations::table)
            .values((
                collaborations::collaboration_id.eq(id),
                collaborations::sponsor_id.eq(collaboration.sponsor_id().as_str()),
                collaborations::organization_id.eq(collaboration.organization_id().as_str()),
                collaborations::status.eq(collaboration.status().as_str()),
                collaborations::message.eq(collaboration.message()),
                collaborations::total_amount.eq(format_decimal(collaboration.total_amount())),
                collaborations::settlement_file_ref
                    .eq(collaboration.settlement_file_ref().map(|f| f.as_str())),
                collaborations::version.eq(collaboration.version()),
                collaborations::created_at.eq(format_timestamp(collaboration.created_at())?),
                collaborations::updated_at.eq(format_timestamp(collaboration.updated_at())?),
            ))
            .execute(conn)?;

        for (position, event_id) in collaboration.event_ids().iter().enumerate() {
            diesel::insert_into(collaboration_events::table)
                .values((
                    collaboration_events::collaboration_id.eq(id),
                    collaboration_events::position.eq(to_position(position)?),
                    collaboration_events::event_id.eq(event_id.as_str()),
                ))
                .execute(conn)?;
        }

        persist_audit_event(conn, audit_event)?;
        Ok(())
    })
}

/// Links one option to a collaboration at `position`.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn link_option(
    conn: &mut SqliteConnection,
    collaboration_id: &CollaborationId,
    position: usize,
    option: &CollaborationOption,
) -> Result<(), PersistenceError> {
    insert_option(conn, collaboration_id, to_position(position)?, option)
}

/// Writes the mutable columns of `result.new_collaboration` and its audit
/// event, optionally replacing the stored option list, in one transaction.
///
/// The row update is guarded by `version = expected_version`.
///
/// # Errors
///
/// * `PersistenceError::VersionConflict` if another writer got there first
/// * `PersistenceError::NotFound` if the collaboration does not exist
/// * Any database error; nothing is written in that case
pub fn update_collaboration(
    conn: &mut SqliteConnection,
    result: &TransitionResult,
    expected_version: i64,
    replace_options: bool,
) -> Result<(), PersistenceError> {
    let updated: &Collaboration = &result.new_collaboration;
    let id: &CollaborationId = updated.id();

    conn.transaction::<_, PersistenceError, _>(|conn| {
        let rows: usize = diesel::update(collaborations::table)
            .filter(collaborations::collaboration_id.eq(id.as_str()))
            .filter(collaborations::version.eq(expected_version))
            .set((
                collaborations::status.eq(updated.status().as_str()),
                collaborations::total_amount.eq(format_decimal(updated.total_amount())),
                collaborations::settlement_file_ref
                    .eq(updated.settlement_file_ref().map(|f| f.as_str())),
                collaborations::version.eq(updated.version()),
                collaborations::updated_at.eq(format_timestamp(updated.updated_at())?),
            ))
            .execute(conn)?;

        if rows == 0 {
            if collaboration_exists(conn, id)? {
                return Err(PersistenceError::VersionConflict {
                    collaboration_id: id.to_string(),
                    expected_version,
                });
            }
            return Err(PersistenceError::NotFound(format!("collaboration '{id}'")));
        }

        if replace_options {
            diesel::delete(collaboration_options::table)
                .filter(collaboration_options::collaboration_id.eq(id.as_str()))
                .execute(conn)?;
            for (position, option) in updated.options().iter().enumerate() {
                insert_option(conn, id, to_position(position)?, option)?;
            }
        }

        persist_audit_event(conn, &result.audit_event)?;
        Ok(())
    })?;

    debug!(
        collaboration_id = %id,
        status = %updated.status(),
        version = updated.version(),
        replace_options,
        "Updated collaboration"
    );
    Ok(())
}

/// Deletes a collaboration; events and options go with it.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_collaboration(
    conn: &mut SqliteConnection,
    id: &CollaborationId,
) -> Result<(), PersistenceError> {
    diesel::delete(collaborations::table)
        .filter(collaborations::collaboration_id.eq(id.as_str()))
        .execute(conn)?;
    Ok(())
}

fn insert_option(
    conn: &mut SqliteConnection,
    collaboration_id: &CollaborationId,
    position: i32,
    option: &CollaborationOption,
) -> Result<(), PersistenceError> {
    let row: NewOptionRow = NewOptionRow::from(option);
    diesel::insert_into(collaboration_options::table)
        .values((
            collaboration_options::collaboration_id.eq(collaboration_id.as_str()),
            collaboration_options::position.eq(position),
            collaboration_options::option_id.eq(&row.option_id),
            collaboration_options::title.eq(&row.title),
            collaboration_options::description.eq(row.description.as_deref()),
            collaboration_options::amount.eq(&row.amount),
            collaboration_options::source_kind.eq(row.source_kind),
            collaboration_options::catalog_option_id.eq(row.catalog_option_id.as_deref()),
        ))
        .execute(conn)?;
    Ok(())
}

fn to_position(position: usize) -> Result<i32, PersistenceError> {
    i32::try_from(position)
        .map_err(|_| PersistenceError::QueryFailed(format!("position {position} out of range")))
}
