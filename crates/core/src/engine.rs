// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The collaboration engine.
//!
//! Each operation is a short read-validate-write sequence. Validation
//! errors are detected before any write. Writes carry the version that
//! was read, so a concurrent writer surfaces as
//! [`CoreError::ConcurrentModification`] instead of a lost update.

use crate::apply::{apply, record_creation, record_linked_options};
use crate::command::Command;
use crate::error::{CollaboratorError, CoreError};
use crate::ports::{ChangeNotifier, Collaborators, NoopNotifier};
use crate::state::{
    Caller, CreationOutcome, DroppedOption, OptionEdit, SettlementDecision, TransitionPayload,
    TransitionResult,
};
use sponsorlink_audit::{Actor, AuditEvent, Cause};
use sponsorlink_domain::{
    AmountSummary, CatalogOptionId, Collaboration, CollaborationId, CollaborationOption,
    CollaborationStatus, DomainError, EventId, LineAmount, NewCollaboration, OptionDraft,
    PartyRole, TransitionAction, compute_total, resolve_transition, validate_catalog_membership,
    validate_custom_option, validate_new_collaboration, validate_settlement_file,
};
use time::OffsetDateTime;
use tracing::{debug, error, info, warn};

/// Orchestrates the state machine, option negotiation, settlement
/// workflow and creation transaction over a set of collaborators.
#[derive(Debug)]
pub struct CollaborationEngine<B, N = NoopNotifier> {
    backend: B,
    notifier: N,
}

impl<B: Collaborators> CollaborationEngine<B> {
    /// Creates an engine that sends no change notifications.
    pub const fn without_notifications(backend: B) -> Self {
        Self {
            backend,
            notifier: NoopNotifier,
        }
    }
}

impl<B: Collaborators, N: ChangeNotifier> CollaborationEngine<B, N> {
    /// Creates an engine.
    ///
    /// # Arguments
    ///
    /// * `backend` - Storage, catalog, party and file collaborators
    /// * `notifier` - Receives `CollaborationChanged` after every successful change
    pub const fn new(backend: B, notifier: N) -> Self {
        Self { backend, notifier }
    }

    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Direct access to the backend, for seeding the read-only collaborators.
    pub const fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub const fn notifier(&self) -> &N {
        &self.notifier
    }

    // ===== Reads =====

    /// Returns a collaboration the caller is a party to.
    ///
    /// # Errors
    ///
    /// * `NotFound` if the collaboration does not exist
    /// * `Forbidden` if the caller does not hold their role in it
    pub fn get_by_id(
        &mut self,
        id: &CollaborationId,
        caller: &Caller,
    ) -> Result<Collaboration, CoreError> {
        self.load_as_party(id, caller)
    }

    /// Lists the caller's collaborations, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn list(&mut self, caller: &Caller) -> Result<Vec<Collaboration>, CoreError> {
        Ok(self
            .backend
            .list_collaborations(&caller.party_id, caller.role)?)
    }

    /// Resolves the current settlement file to a URL, if there is one.
    ///
    /// # Errors
    ///
    /// Same as [`CollaborationEngine::get_by_id`], plus file storage failures.
    pub fn settlement_file_url(
        &mut self,
        id: &CollaborationId,
        caller: &Caller,
    ) -> Result<Option<String>, CoreError> {
        let collaboration = self.load_as_party(id, caller)?;
        match collaboration.settlement_file_ref() {
            Some(file_ref) => Ok(Some(self.backend.get_url(file_ref)?)),
            None => Ok(None),
        }
    }

    /// Returns the audit events of a collaboration, oldest first.
    ///
    /// # Errors
    ///
    /// Same as [`CollaborationEngine::get_by_id`].
    pub fn audit_trail(
        &mut self,
        id: &CollaborationId,
        caller: &Caller,
    ) -> Result<Vec<AuditEvent>, CoreError> {
        self.load_as_party(id, caller)?;
        Ok(self.backend.audit_trail(id)?)
    }

    // ===== State machine =====

    /// Moves a collaboration along one edge of the transition table.
    ///
    /// # Arguments
    ///
    /// * `id` - The collaboration
    /// * `caller` - Who is asking, and in which role
    /// * `action` - The requested action
    /// * `payload` - Settlement file or replacement options, where the action needs them
    /// * `cause` - Recorded in the audit log
    ///
    /// # Errors
    ///
    /// * `NotFound` if the collaboration does not exist
    /// * `Forbidden` if the caller's role may not perform `action` now
    /// * `InvalidState` if `action` is not valid from the current status
    /// * `InvalidPayload` if the payload lacks required data
    /// * `StorageFailure` if the write failed or raced another writer
    pub fn request_transition(
        &mut self,
        id: &CollaborationId,
        caller: &Caller,
        action: TransitionAction,
        payload: TransitionPayload,
        cause: Cause,
    ) -> Result<Collaboration, CoreError> {
        let collaboration = self.load_as_party(id, caller)?;

        // Role and status are checked before the payload is looked at.
        resolve_transition(collaboration.status(), caller.role, action)?;

        let command = if action == TransitionAction::EditOptions {
            let drafts = payload.options.ok_or(DomainError::MissingOptionList)?;
            let (options, _) = self.resolve_drafts(collaboration.event_ids(), &drafts)?;
            Command::EditOptions { options }
        } else {
            Command::Transition {
                action,
                settlement_file: payload.settlement_file,
            }
        };

        self.execute(&collaboration, command, caller, cause)
    }

    // ===== Options negotiation =====

    /// Replaces the whole option list of a pending or negotiating collaboration.
    ///
    /// A pending collaboration moves to negotiation.
    ///
    /// # Errors
    ///
    /// * `InvalidState` outside pending and negotiation
    /// * `InvalidPayload` for an empty list, a negative amount or a blank title
    /// * `NotFound` for an unknown catalog option
    /// * Any error from [`CollaborationEngine::get_by_id`] or the store
    pub fn set_options(
        &mut self,
        id: &CollaborationId,
        caller: &Caller,
        drafts: &[OptionDraft],
        cause: Cause,
    ) -> Result<OptionEdit, CoreError> {
        let collaboration = self.load_as_party(id, caller)?;
        ensure_options_editable(&collaboration)?;

        let (options, summary) = self.resolve_drafts(collaboration.event_ids(), drafts)?;
        let updated = self.execute(
            &collaboration,
            Command::ReplaceOptions { options },
            caller,
            cause,
        )?;

        Ok(OptionEdit {
            collaboration: updated,
            flagged: summary.flagged,
        })
    }

    /// Adds one catalog option, or removes it if it is already linked.
    ///
    /// # Errors
    ///
    /// Same as [`CollaborationEngine::set_options`].
    pub fn toggle_catalog_option(
        &mut self,
        id: &CollaborationId,
        caller: &Caller,
        catalog_option_id: &CatalogOptionId,
        cause: Cause,
    ) -> Result<Collaboration, CoreError> {
        let collaboration = self.load_as_party(id, caller)?;
        ensure_options_editable(&collaboration)?;

        let catalog = self
            .backend
            .get_catalog_option(catalog_option_id)?
            .ok_or_else(|| DomainError::CatalogOptionNotFound {
                catalog_option_id: catalog_option_id.clone(),
            })?;

        self.execute(
            &collaboration,
            Command::ToggleCatalogOption { catalog },
            caller,
            cause,
        )
    }

    // ===== Settlement =====

    /// Uploads proof of delivery and moves the collaboration to settlement.
    ///
    /// Uses `submit_settlement` from in progress and `resubmit_settlement`
    /// after a rejection. If the upload succeeds but the status write
    /// fails, the uploaded object is left behind and a retry uploads again.
    ///
    /// # Errors
    ///
    /// * `InvalidState`/`Forbidden` if the caller may not settle now
    /// * `InvalidPayload` for an empty file
    /// * `StorageFailure` if the upload or the write failed
    pub fn submit_settlement(
        &mut self,
        id: &CollaborationId,
        caller: &Caller,
        file_name: &str,
        bytes: &[u8],
        cause: Cause,
    ) -> Result<Collaboration, CoreError> {
        let collaboration = self.load_as_party(id, caller)?;

        let action = if collaboration.status() == CollaborationStatus::SettlementRejected {
            TransitionAction::ResubmitSettlement
        } else {
            TransitionAction::SubmitSettlement
        };
        resolve_transition(collaboration.status(), caller.role, action)?;
        validate_settlement_file(bytes)?;

        let path = settlement_path(id, file_name);
        let file_ref = self.backend.upload(bytes, &path)?;
        debug!(
            collaboration_id = %id,
            file_ref = %file_ref,
            size = bytes.len(),
            "Uploaded settlement file"
        );

        let command = Command::Transition {
            action,
            settlement_file: Some(file_ref.clone()),
        };
        self.execute(&collaboration, command, caller, cause)
            .inspect_err(|err| {
                warn!(
                    collaboration_id = %id,
                    file_ref = %file_ref,
                    error = %err,
                    "Settlement file uploaded but status write failed; upload is orphaned"
                );
            })
    }

    /// Accepts or rejects the submitted settlement.
    ///
    /// Rejecting keeps the file reference until a resubmission replaces it.
    ///
    /// # Errors
    ///
    /// Same as [`CollaborationEngine::request_transition`].
    pub fn resolve_settlement(
        &mut self,
        id: &CollaborationId,
        caller: &Caller,
        decision: SettlementDecision,
        cause: Cause,
    ) -> Result<Collaboration, CoreError> {
        self.request_transition(
            id,
            caller,
            decision.action(),
            TransitionPayload::default(),
            cause,
        )
    }

    // ===== Creation transaction =====

    /// Creates a pending collaboration and links its options.
    ///
    /// Everything is validated before the first write; a validation
    /// failure creates nothing. Once the collaboration row exists, a
    /// failure to create or link an individual option is logged and
    /// reported in [`CreationOutcome::dropped`] instead of aborting. If no
    /// option at all can be linked, the collaboration is deleted again.
    ///
    /// # Errors
    ///
    /// * `Forbidden` unless the caller is the sponsor named in `new`
    /// * `InvalidPayload` for missing events or options, or a bad option
    /// * `NotFound` for an unknown party or catalog option
    /// * `StorageFailure` if the collaboration could not be inserted, or
    ///   no option could be linked
    pub fn create_collaboration(
        &mut self,
        caller: &Caller,
        new: NewCollaboration,
        drafts: &[OptionDraft],
        cause: Cause,
    ) -> Result<CreationOutcome, CoreError> {
        validate_new_collaboration(&new)?;
        if caller.role != PartyRole::Sponsor || caller.party_id != new.sponsor_id {
            return Err(DomainError::ProposerMismatch {
                party_id: caller.party_id.clone(),
                role: caller.role,
            }
            .into());
        }
        if drafts.is_empty() {
            return Err(DomainError::EmptyOptionList.into());
        }
        for (party_id, role) in [
            (&new.sponsor_id, PartyRole::Sponsor),
            (&new.organization_id, PartyRole::Organization),
        ] {
            if !self.backend.party_exists(party_id, role)? {
                return Err(DomainError::PartyNotFound {
                    party_id: party_id.clone(),
                    role,
                }
                .into());
            }
        }
        let (options, summary) = self.resolve_drafts(&new.event_ids, drafts)?;

        let now = OffsetDateTime::now_utc();
        let actor = Actor::party(&caller.party_id, caller.role);
        let collaboration = Collaboration::propose(CollaborationId::generate(), new, options, now)?;
        let id = collaboration.id().clone();
        let primary_event = collaboration
            .primary_event_id()
            .cloned()
            .ok_or(DomainError::NoEventIds)?;

        self.backend.insert_collaboration(
            &collaboration,
            &record_creation(&collaboration, actor.clone(), cause.clone()),
        )?;
        info!(
            collaboration_id = %id,
            sponsor_id = %collaboration.sponsor_id(),
            organization_id = %collaboration.organization_id(),
            options = collaboration.options().len(),
            "Inserted collaboration"
        );

        let mut linked: Vec<CollaborationOption> = Vec::new();
        let mut dropped: Vec<DroppedOption> = Vec::new();
        for (index, option) in collaboration.options().iter().enumerate() {
            match self.link_one(&id, &primary_event, linked.len(), option.clone()) {
                Ok(option) => linked.push(option),
                Err(err) => {
                    warn!(
                        collaboration_id = %id,
                        index,
                        title = option.title(),
                        error = %err,
                        "Dropping option that could not be linked"
                    );
                    dropped.push(DroppedOption {
                        index,
                        title: option.title().to_string(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        if linked.is_empty() {
            if let Err(err) = self.backend.delete_collaboration(&id) {
                error!(
                    collaboration_id = %id,
                    error = %err,
                    "Failed to remove collaboration without options"
                );
            }
            return Err(CoreError::NoOptionsLinked { dropped });
        }

        if !dropped.is_empty() {
            let result: TransitionResult =
                record_linked_options(&collaboration, linked, dropped.len(), actor, cause, now)?;
            self.backend
                .update_status(&result, collaboration.version())
                .map_err(|err| write_error(&id, collaboration.version(), err))?;
        }

        let stored = self.load(&id)?;
        self.notifier.collaboration_changed(&id);

        Ok(CreationOutcome {
            collaboration: stored,
            dropped,
            flagged: summary.flagged,
        })
    }

    // ===== Internals =====

    fn load(&mut self, id: &CollaborationId) -> Result<Collaboration, CoreError> {
        self.backend.get_collaboration(id)?.ok_or_else(|| {
            DomainError::CollaborationNotFound {
                collaboration_id: id.clone(),
            }
            .into()
        })
    }

    fn load_as_party(
        &mut self,
        id: &CollaborationId,
        caller: &Caller,
    ) -> Result<Collaboration, CoreError> {
        let collaboration = self.load(id)?;
        if collaboration.party_for(caller.role) != &caller.party_id {
            return Err(DomainError::NotAParty {
                party_id: caller.party_id.clone(),
                role: caller.role,
                collaboration_id: id.clone(),
            }
            .into());
        }
        Ok(collaboration)
    }

    /// Applies `command` and persists the result as one write.
    fn execute(
        &mut self,
        collaboration: &Collaboration,
        command: Command,
        caller: &Caller,
        cause: Cause,
    ) -> Result<Collaboration, CoreError> {
        let expected_version = collaboration.version();
        let name = command.name();
        let result = apply(
            collaboration,
            command,
            caller.role,
            Actor::party(&caller.party_id, caller.role),
            cause,
            OffsetDateTime::now_utc(),
        )?;

        let write = if result.options_replaced {
            self.backend.replace_options(&result, expected_version)
        } else {
            self.backend.update_status(&result, expected_version)
        };
        write.map_err(|err| write_error(collaboration.id(), expected_version, err))?;

        let updated = result.new_collaboration;
        info!(
            collaboration_id = %updated.id(),
            action = name,
            from = %collaboration.status(),
            to = %updated.status(),
            role = %caller.role,
            "Collaboration updated"
        );
        self.notifier.collaboration_changed(updated.id());
        Ok(updated)
    }

    /// Resolves drafts into concrete options, snapshotting catalog entries.
    fn resolve_drafts(
        &mut self,
        event_ids: &[EventId],
        drafts: &[OptionDraft],
    ) -> Result<(Vec<CollaborationOption>, AmountSummary), CoreError> {
        let mut options: Vec<CollaborationOption> = Vec::with_capacity(drafts.len());
        let mut lines: Vec<LineAmount> = Vec::with_capacity(drafts.len());

        for (index, draft) in drafts.iter().enumerate() {
            match draft {
                OptionDraft::Catalog { catalog_option_id } => {
                    let catalog = self
                        .backend
                        .get_catalog_option(catalog_option_id)?
                        .ok_or_else(|| DomainError::CatalogOptionNotFound {
                            catalog_option_id: catalog_option_id.clone(),
                        })?;
                    validate_catalog_membership(&catalog, event_ids)?;
                    lines.push(LineAmount::Value(catalog.price));
                    options.push(CollaborationOption::snapshot(&catalog));
                }
                OptionDraft::Custom {
                    title,
                    description,
                    amount,
                } => {
                    let value = validate_custom_option(index, title, amount)?;
                    lines.push(amount.clone());
                    options.push(CollaborationOption::custom(
                        title.trim(),
                        description.clone(),
                        value,
                    ));
                }
            }
        }

        let summary: AmountSummary = compute_total(&lines)?;
        Ok((options, summary))
    }

    fn link_one(
        &mut self,
        collaboration_id: &CollaborationId,
        primary_event: &EventId,
        position: usize,
        option: CollaborationOption,
    ) -> Result<CollaborationOption, CollaboratorError> {
        let option = if option.is_custom() {
            let backing = self.backend.create_custom_option(primary_event, &option)?;
            option.with_backing(backing)
        } else {
            option
        };
        self.backend.link_option(collaboration_id, position, &option)?;
        Ok(option)
    }
}

fn ensure_options_editable(collaboration: &Collaboration) -> Result<(), DomainError> {
    if collaboration.status().allows_option_edits() {
        Ok(())
    } else {
        Err(DomainError::OptionsLocked {
            status: collaboration.status(),
        })
    }
}

fn write_error(id: &CollaborationId, expected_version: i64, err: CollaboratorError) -> CoreError {
    match err {
        CollaboratorError::VersionConflict { .. } => CoreError::ConcurrentModification {
            collaboration_id: id.clone(),
            expected_version,
        },
        other @ CollaboratorError::Unavailable { .. } => CoreError::Storage(other),
    }
}

/// Storage path for a settlement upload. Each upload gets a fresh prefix
/// so a resubmission never overwrites the previous file.
fn settlement_path(id: &CollaborationId, file_name: &str) -> String {
    let cleaned: String = file_name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    let name = if cleaned.is_empty() {
        "settlement"
    } else {
        cleaned
    };
    format!("settlements/{id}/{}-{name}", uuid::Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settlement_path_is_sanitized_and_unique() {
        let id = CollaborationId::new("c-1");
        let a = settlement_path(&id, "../proof of delivery.pdf");
        let b = settlement_path(&id, "../proof of delivery.pdf");

        assert!(a.starts_with("settlements/c-1/"));
        assert!(a.ends_with("-_proof_of_delivery.pdf"));
        assert!(!a.contains(".."));
        assert_ne!(a, b);
    }

    #[test]
    fn test_settlement_path_defaults_blank_names() {
        let path = settlement_path(&CollaborationId::new("c-1"), "   ");
        assert!(path.ends_with("-settlement"));
    }
}
