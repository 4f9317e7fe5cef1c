// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::state::TransitionResult;
use sponsorlink_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use sponsorlink_domain::{Collaboration, CollaborationOption, DomainError, PartyRole};
use time::OffsetDateTime;

/// Applies a command to a collaboration, producing the new collaboration
/// and its audit event.
///
/// This function is pure: it performs no I/O and never mutates its input.
///
/// # Arguments
///
/// * `collaboration` - The current collaboration (immutable)
/// * `command` - The command to apply
/// * `role` - The caller's relationship to this collaboration
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
/// * `now` - Timestamp recorded as `updated_at`
///
/// # Errors
///
/// Returns an error if:
/// - The command violates the transition table or option rules
/// - The resulting collaboration breaks an aggregate invariant
pub fn apply(
    collaboration: &Collaboration,
    command: Command,
    role: PartyRole,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    let name = command.name();
    let options_replaced = command.replaces_options();

    let (new_collaboration, details) = match command {
        Command::Transition {
            action,
            settlement_file,
        } => {
            let details = settlement_file
                .as_ref()
                .map(|file| format!("settlement file {file}"));
            let next = collaboration.transition(role, action, settlement_file, now)?;
            (next, details)
        }
        Command::EditOptions { options } => {
            let next = collaboration.edit_options(role, options, now)?;
            let details = describe_options(&next);
            (next, details)
        }
        Command::ReplaceOptions { options } => {
            let next = collaboration.replace_options(options, now)?;
            let details = describe_options(&next);
            (next, details)
        }
        Command::ToggleCatalogOption { catalog } => {
            let next = collaboration.toggle_catalog_option(&catalog, now)?;
            let details = Some(format!("toggled catalog option {}", catalog.id));
            (next, details)
        }
    };

    new_collaboration
        .check_invariants()
        .map_err(CoreError::Internal)?;

    let audit_event = AuditEvent::new(
        collaboration.id().clone(),
        actor,
        cause,
        Action::new(name.to_string(), details),
        StateSnapshot::of(collaboration),
        StateSnapshot::of(&new_collaboration),
    );

    Ok(TransitionResult {
        new_collaboration,
        audit_event,
        options_replaced,
    })
}

/// Builds the audit event for a newly proposed collaboration.
#[must_use]
pub fn record_creation(collaboration: &Collaboration, actor: Actor, cause: Cause) -> AuditEvent {
    AuditEvent::new(
        collaboration.id().clone(),
        actor,
        cause,
        Action::new(
            String::from("create"),
            Some(format!(
                "proposed with {} option(s) across {} event(s)",
                collaboration.options().len(),
                collaboration.event_ids().len()
            )),
        ),
        StateSnapshot::absent(),
        StateSnapshot::of(collaboration),
    )
}

/// Builds the result that records which options were actually linked
/// during creation, with the total recomputed over them.
///
/// # Errors
///
/// Returns `DomainError::AmountOverflow` if the linked options cannot be
/// summed.
pub fn record_linked_options(
    collaboration: &Collaboration,
    linked: Vec<CollaborationOption>,
    dropped_count: usize,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<TransitionResult, DomainError> {
    let new_collaboration = collaboration.with_linked_options(linked, now)?;
    let audit_event = AuditEvent::new(
        collaboration.id().clone(),
        actor,
        cause,
        Action::new(
            String::from("link_options"),
            Some(format!("{dropped_count} option(s) dropped during creation")),
        ),
        StateSnapshot::of(collaboration),
        StateSnapshot::of(&new_collaboration),
    );

    Ok(TransitionResult {
        new_collaboration,
        audit_event,
        options_replaced: false,
    })
}

fn describe_options(collaboration: &Collaboration) -> Option<String> {
    Some(format!(
        "{} option(s), total {}",
        collaboration.options().len(),
        collaboration.total_amount()
    ))
}
