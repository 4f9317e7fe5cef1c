// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Contracts the engine needs from the outside world.
//!
//! Methods take `&mut self` because real implementations hold a
//! database connection. Every write that changes an existing
//! collaboration carries the version the caller read; implementations
//! must reject the write with [`CollaboratorError::VersionConflict`]
//! when the stored version differs.

use crate::error::CollaboratorError;
use crate::state::TransitionResult;
use sponsorlink_audit::AuditEvent;
use sponsorlink_domain::{
    CatalogOption, CatalogOptionId, Collaboration, CollaborationId, CollaborationOption, EventId,
    FileRef, PartyId, PartyRole,
};

/// Record storage for collaborations and their options.
pub trait CollaborationStore {
    /// Loads a collaboration with its events and options.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn get_collaboration(
        &mut self,
        id: &CollaborationId,
    ) -> Result<Option<Collaboration>, CollaboratorError>;

    /// Inserts the collaboration row, its event links and the creation
    /// audit event. Options are linked separately with
    /// [`CollaborationStore::link_option`].
    ///
    /// # Errors
    ///
    /// Returns an error if nothing could be written. A failed insert
    /// leaves no trace.
    fn insert_collaboration(
        &mut self,
        collaboration: &Collaboration,
        audit_event: &AuditEvent,
    ) -> Result<(), CollaboratorError>;

    /// Links one option to an existing collaboration.
    ///
    /// # Errors
    ///
    /// Returns an error if the option could not be written.
    fn link_option(
        &mut self,
        collaboration_id: &CollaborationId,
        position: usize,
        option: &CollaborationOption,
    ) -> Result<(), CollaboratorError>;

    /// Writes status, settlement file, total, version and timestamp of
    /// `result.new_collaboration` plus the audit event, as one write.
    ///
    /// # Errors
    ///
    /// Returns `VersionConflict` if the stored version is not
    /// `expected_version`, or another error if the write failed.
    fn update_status(
        &mut self,
        result: &TransitionResult,
        expected_version: i64,
    ) -> Result<(), CollaboratorError>;

    /// Like [`CollaborationStore::update_status`], and also deletes the
    /// stored option list and inserts the new one, in the same write.
    ///
    /// # Errors
    ///
    /// Same as [`CollaborationStore::update_status`].
    fn replace_options(
        &mut self,
        result: &TransitionResult,
        expected_version: i64,
    ) -> Result<(), CollaboratorError>;

    /// Removes a collaboration and everything it owns.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete failed.
    fn delete_collaboration(&mut self, id: &CollaborationId) -> Result<(), CollaboratorError>;

    /// Lists the collaborations in which `party_id` holds `role`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn list_collaborations(
        &mut self,
        party_id: &PartyId,
        role: PartyRole,
    ) -> Result<Vec<Collaboration>, CollaboratorError>;

    /// Returns the audit events of a collaboration in the order they were written.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn audit_trail(&mut self, id: &CollaborationId)
    -> Result<Vec<AuditEvent>, CollaboratorError>;
}

/// Read access to the published option catalog.
pub trait CatalogLookup {
    /// Resolves a catalog option.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read.
    fn get_catalog_option(
        &mut self,
        id: &CatalogOptionId,
    ) -> Result<Option<CatalogOption>, CollaboratorError>;

    /// Creates a catalog-style backing record for a custom option, scoped
    /// to `event_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the record could not be written.
    fn create_custom_option(
        &mut self,
        event_id: &EventId,
        option: &CollaborationOption,
    ) -> Result<CatalogOptionId, CollaboratorError>;
}

/// Lookup of registered sponsors and organizations.
pub trait PartyDirectory {
    /// Returns true if `party_id` is registered with `role`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    fn party_exists(&mut self, party_id: &PartyId, role: PartyRole)
    -> Result<bool, CollaboratorError>;
}

/// Binary object storage.
pub trait FileStorage {
    /// Stores `bytes` under `path` and returns a reference to the object.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload failed.
    fn upload(&mut self, bytes: &[u8], path: &str) -> Result<FileRef, CollaboratorError>;

    /// Resolves a stored object to a URL a client can fetch.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference does not resolve.
    fn get_url(&mut self, file_ref: &FileRef) -> Result<String, CollaboratorError>;
}

/// Everything the engine needs from its backend.
pub trait Collaborators: CollaborationStore + CatalogLookup + PartyDirectory + FileStorage {}

impl<T> Collaborators for T where
    T: CollaborationStore + CatalogLookup + PartyDirectory + FileStorage
{
}

/// Receives a notification after every successful change.
///
/// Delivery is best effort; a notifier must not fail the operation.
pub trait ChangeNotifier {
    fn collaboration_changed(&self, id: &CollaborationId);
}

/// A notifier that drops every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl ChangeNotifier for NoopNotifier {
    fn collaboration_changed(&self, _id: &CollaborationId) {}
}
