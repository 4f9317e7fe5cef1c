// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use serde::{Deserialize, Serialize};
use sponsorlink_domain::{Collaboration, CollaborationId, PartyId, PartyRole};

#[cfg(test)]
mod tests;

/// The party that initiated a change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The party id as issued by the identity provider.
    pub id: String,
    /// `organization`, `sponsor` or `system`.
    pub actor_type: String,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `actor_type` - The type of actor
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self { id, actor_type }
    }

    /// An actor acting in one of the two collaboration roles.
    #[must_use]
    pub fn party(id: &PartyId, role: PartyRole) -> Self {
        Self::new(id.to_string(), role.as_str().to_string())
    }
}

/// Why a change was initiated, typically the request that triggered it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cause {
    pub id: String,
    pub description: String,
}

impl Cause {
    /// Creates a new Cause.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this cause
    /// * `description` - A description of what triggered this action
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// What was done, e.g. `accept_terms` or `set_options`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the action
    /// * `details` - Optional additional details
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// Compact, human-readable summary of a collaboration at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub data: String,
}

impl StateSnapshot {
    /// Creates a new `StateSnapshot`.
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }

    /// Summarizes the fields of `collaboration` that transitions change.
    #[must_use]
    pub fn of(collaboration: &Collaboration) -> Self {
        let file = collaboration
            .settlement_file_ref()
            .map_or("-", |file| file.as_str());
        Self::new(format!(
            "status={} total={} options={} settlement_file={} version={}",
            collaboration.status(),
            collaboration.total_amount(),
            collaboration.options().len(),
            file,
            collaboration.version(),
        ))
    }

    /// Snapshot used as `before` when a collaboration is first created.
    #[must_use]
    pub fn absent() -> Self {
        Self::new(String::from("none"))
    }
}

/// An immutable record of one successful change to a collaboration.
///
/// Every successful transition, option edit or creation produces exactly
/// one audit event, written in the same storage transaction as the change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// The collaboration this event belongs to.
    pub collaboration_id: CollaborationId,
    pub actor: Actor,
    pub cause: Cause,
    pub action: Action,
    pub before: StateSnapshot,
    pub after: StateSnapshot,
}

impl AuditEvent {
    /// Creates a new `AuditEvent`.
    ///
    /// Once created, an audit event is immutable.
    ///
    /// # Arguments
    ///
    /// * `collaboration_id` - The collaboration that changed
    /// * `actor` - The actor who initiated the change
    /// * `cause` - The reason for the change
    /// * `action` - The action that was performed
    /// * `before` - The state before the transition
    /// * `after` - The state after the transition
    #[must_use]
    pub const fn new(
        collaboration_id: CollaborationId,
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
    ) -> Self {
        Self {
            collaboration_id,
            actor,
            cause,
            action,
            before,
            after,
        }
    }
}
