// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The collaboration aggregate.
//!
//! Every mutation returns a new value with `version` bumped and
//! `updated_at` set; nothing mutates a collaboration in place. Status
//! only changes through [`Collaboration::transition`] or the option
//! editing methods, all of which consult the transition table.

use crate::amount::total_of;
use crate::error::DomainError;
use crate::status::CollaborationStatus;
use crate::transition::{TransitionAction, resolve_transition};
use crate::types::{
    CatalogOption, CollaborationId, CollaborationOption, EventId, FileRef, NewCollaboration,
    PartyId, PartyRole,
};
use crate::validation::{validate_catalog_membership, validate_event_ids, validate_option_list};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Stored fields of a collaboration, used to rebuild one from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollaborationParts {
    pub id: CollaborationId,
    pub sponsor_id: PartyId,
    pub organization_id: PartyId,
    pub event_ids: Vec<EventId>,
    pub status: CollaborationStatus,
    pub message: Option<String>,
    pub total_amount: Decimal,
    pub settlement_file_ref: Option<FileRef>,
    pub options: Vec<CollaborationOption>,
    pub version: i64,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// A sponsorship proposal between a sponsor and an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collaboration {
    id: CollaborationId,
    sponsor_id: PartyId,
    organization_id: PartyId,
    event_ids: Vec<EventId>,
    status: CollaborationStatus,
    message: Option<String>,
    total_amount: Decimal,
    settlement_file_ref: Option<FileRef>,
    options: Vec<CollaborationOption>,
    version: i64,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    updated_at: OffsetDateTime,
}

impl Collaboration {
    /// Builds a new pending collaboration.
    ///
    /// The total is the sum of `options`; an empty option list is allowed
    /// here because the creation transaction links options afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the event list is invalid, or
    /// `DomainError::AmountOverflow` if the options cannot be summed.
    pub fn propose(
        id: CollaborationId,
        new: NewCollaboration,
        options: Vec<CollaborationOption>,
        now: OffsetDateTime,
    ) -> Result<Self, DomainError> {
        validate_event_ids(&new.event_ids)?;
        let total_amount: Decimal = total_of(&options)?;

        Ok(Self {
            id,
            sponsor_id: new.sponsor_id,
            organization_id: new.organization_id,
            event_ids: new.event_ids,
            status: CollaborationStatus::Pending,
            message: new.message,
            total_amount,
            settlement_file_ref: None,
            options,
            version: 1,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuilds a collaboration read back from storage. No validation is
    /// performed; use [`Collaboration::check_invariants`] to verify.
    #[must_use]
    pub fn restore(parts: CollaborationParts) -> Self {
        Self {
            id: parts.id,
            sponsor_id: parts.sponsor_id,
            organization_id: parts.organization_id,
            event_ids: parts.event_ids,
            status: parts.status,
            message: parts.message,
            total_amount: parts.total_amount,
            settlement_file_ref: parts.settlement_file_ref,
            options: parts.options,
            version: parts.version,
            created_at: parts.created_at,
            updated_at: parts.updated_at,
        }
    }

    #[must_use]
    pub const fn id(&self) -> &CollaborationId {
        &self.id
    }

    #[must_use]
    pub const fn sponsor_id(&self) -> &PartyId {
        &self.sponsor_id
    }

    #[must_use]
    pub const fn organization_id(&self) -> &PartyId {
        &self.organization_id
    }

    /// The party id holding `role` in this collaboration.
    #[must_use]
    pub const fn party_for(&self, role: PartyRole) -> &PartyId {
        match role {
            PartyRole::Organization => &self.organization_id,
            PartyRole::Sponsor => &self.sponsor_id,
        }
    }

    #[must_use]
    pub fn event_ids(&self) -> &[EventId] {
        &self.event_ids
    }

    /// The primary event is always the first linked event.
    #[must_use]
    pub fn primary_event_id(&self) -> Option<&EventId> {
        self.event_ids.first()
    }

    #[must_use]
    pub const fn status(&self) -> CollaborationStatus {
        self.status
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    #[must_use]
    pub const fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    #[must_use]
    pub const fn settlement_file_ref(&self) -> Option<&FileRef> {
        self.settlement_file_ref.as_ref()
    }

    #[must_use]
    pub fn options(&self) -> &[CollaborationOption] {
        &self.options
    }

    #[must_use]
    pub const fn version(&self) -> i64 {
        self.version
    }

    #[must_use]
    pub const fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    #[must_use]
    pub const fn updated_at(&self) -> OffsetDateTime {
        self.updated_at
    }

    /// Applies a status transition requested by `role`.
    ///
    /// # Arguments
    ///
    /// * `role` - The caller's relationship to this collaboration
    /// * `action` - The requested action
    /// * `settlement_file` - Uploaded proof, required by submit and resubmit
    /// * `now` - Timestamp recorded as `updated_at`
    ///
    /// # Errors
    ///
    /// * Any error from [`resolve_transition`]
    /// * `DomainError::MissingOptionList` for `edit_options`, which must
    ///   go through [`Collaboration::edit_options`]
    /// * `DomainError::MissingSettlementFile` if a file is required but absent
    pub fn transition(
        &self,
        role: PartyRole,
        action: TransitionAction,
        settlement_file: Option<FileRef>,
        now: OffsetDateTime,
    ) -> Result<Self, DomainError> {
        let to = resolve_transition(self.status, role, action)?;

        if action == TransitionAction::EditOptions {
            return Err(DomainError::MissingOptionList);
        }

        let settlement_file_ref = if action.requires_settlement_file() {
            let Some(file) = settlement_file else {
                return Err(DomainError::MissingSettlementFile { action });
            };
            Some(file)
        } else {
            self.settlement_file_ref.clone()
        };

        Ok(Self {
            status: to,
            settlement_file_ref,
            ..self.bumped(now)
        })
    }

    /// Replaces the option set through the `edit_options` action.
    ///
    /// Follows the transition table strictly, so this is only valid
    /// while negotiating.
    ///
    /// # Errors
    ///
    /// Any error from [`resolve_transition`] or [`Collaboration::replace_options`].
    pub fn edit_options(
        &self,
        role: PartyRole,
        options: Vec<CollaborationOption>,
        now: OffsetDateTime,
    ) -> Result<Self, DomainError> {
        resolve_transition(self.status, role, TransitionAction::EditOptions)?;
        self.replace_options(options, now)
    }

    /// Replaces the whole option set and recomputes the total.
    ///
    /// A pending collaboration moves to negotiation; a negotiating one
    /// stays where it is.
    ///
    /// # Errors
    ///
    /// * `DomainError::OptionsLocked` outside pending and negotiation
    /// * Any error from [`validate_option_list`]
    pub fn replace_options(
        &self,
        options: Vec<CollaborationOption>,
        now: OffsetDateTime,
    ) -> Result<Self, DomainError> {
        if !self.status.allows_option_edits() {
            return Err(DomainError::OptionsLocked {
                status: self.status,
            });
        }
        validate_option_list(&options)?;

        Ok(Self {
            status: CollaborationStatus::Negotiation,
            total_amount: total_of(&options)?,
            options,
            ..self.bumped(now)
        })
    }

    /// Adds a catalog option if it is not linked yet, or removes it if it is.
    ///
    /// Existing snapshots of other options are kept as they are.
    ///
    /// # Errors
    ///
    /// * `DomainError::CatalogOptionOutsideEvents` if the option belongs to
    ///   an unrelated event
    /// * Any error from [`Collaboration::replace_options`], including an
    ///   empty list after removing the last option
    pub fn toggle_catalog_option(
        &self,
        catalog: &CatalogOption,
        now: OffsetDateTime,
    ) -> Result<Self, DomainError> {
        let linked = self
            .options
            .iter()
            .any(|o| o.catalog_option_id() == Some(&catalog.id));

        let options: Vec<CollaborationOption> = if linked {
            self.options
                .iter()
                .filter(|o| o.catalog_option_id() != Some(&catalog.id))
                .cloned()
                .collect()
        } else {
            validate_catalog_membership(catalog, &self.event_ids)?;
            let mut options = self.options.clone();
            options.push(CollaborationOption::snapshot(catalog));
            options
        };

        self.replace_options(options, now)
    }

    /// Records the options that were actually linked during creation.
    ///
    /// Status is unchanged; the total is recomputed over `options`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AmountOverflow` if the options cannot be summed.
    pub fn with_linked_options(
        &self,
        options: Vec<CollaborationOption>,
        now: OffsetDateTime,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            total_amount: total_of(&options)?,
            options,
            ..self.bumped(now)
        })
    }

    /// Checks the aggregate's structural invariants.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violated invariant.
    pub fn check_invariants(&self) -> Result<(), String> {
        let expected = total_of(&self.options).map_err(|e| e.to_string())?;
        if self.total_amount != expected {
            return Err(format!(
                "total_amount {} does not equal option sum {expected}",
                self.total_amount
            ));
        }

        let has_file = self.settlement_file_ref.is_some();
        if has_file != self.status.holds_settlement_file() {
            return Err(format!(
                "settlement file presence ({has_file}) does not match status '{}'",
                self.status
            ));
        }

        if self.event_ids.is_empty() {
            return Err(String::from("collaboration has no events"));
        }

        Ok(())
    }

    fn bumped(&self, now: OffsetDateTime) -> Self {
        Self {
            version: self.version + 1,
            updated_at: now,
            ..self.clone()
        }
    }
}
