// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit trail queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use sponsorlink_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use sponsorlink_domain::CollaborationId;

use crate::data_models::{ActionData, ActorData, CauseData, StateSnapshotData};
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = audit_events)]
struct AuditEventRow {
    actor_json: String,
    cause_json: String,
    action_json: String,
    before_snapshot_json: String,
    after_snapshot_json: String,
}

/// Returns the audit events of a collaboration in insertion order.
///
/// # Errors
///
/// Returns an error if the query fails or an event cannot be deserialized.
pub fn get_audit_trail(
    conn: &mut SqliteConnection,
    collaboration_id: &CollaborationId,
) -> Result<Vec<AuditEvent>, PersistenceError> {
    let rows: Vec<AuditEventRow> = audit_events::table
        .filter(audit_events::collaboration_id.eq(collaboration_id.as_str()))
        .order(audit_events::event_id.asc())
        .select(AuditEventRow::as_select())
        .load(conn)?;

    rows.into_iter()
        .map(|row| -> Result<AuditEvent, PersistenceError> {
            let actor: ActorData = serde_json::from_str(&row.actor_json)?;
            let cause: CauseData = serde_json::from_str(&row.cause_json)?;
            let action: ActionData = serde_json::from_str(&row.action_json)?;
            let before: StateSnapshotData = serde_json::from_str(&row.before_snapshot_json)?;
            let after: StateSnapshotData = serde_json::from_str(&row.after_snapshot_json)?;

            Ok(AuditEvent::new(
                collaboration_id.clone(),
                Actor::new(actor.id, actor.actor_type),
                Cause::new(cause.id, cause.description),
                Action::new(action.name, action.details),
                StateSnapshot::new(before.data),
                StateSnapshot::new(after.data),
            ))
        })
        .collect()
}
