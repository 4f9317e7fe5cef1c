// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Engine port implementations.

use sponsorlink::{
    CatalogLookup, CollaborationStore, CollaboratorError, FileStorage, PartyDirectory,
    TransitionResult,
};
use sponsorlink_audit::AuditEvent;
use sponsorlink_domain::{
    CatalogOption, CatalogOptionId, Collaboration, CollaborationId, CollaborationOption, EventId,
    FileRef, PartyId, PartyRole,
};
use tracing::warn;

use crate::error::PersistenceError;
use crate::{Persistence, mutations, queries};

/// Maps a persistence error for the engine, logging anything that is
/// not an expected version conflict.
fn port_error(operation: &'static str) -> impl Fn(PersistenceError) -> CollaboratorError {
    move |err| {
        if !matches!(err, PersistenceError::VersionConflict { .. }) {
            warn!(operation, error = %err, "Storage operation failed");
        }
        err.into_collaborator(operation)
    }
}

impl CollaborationStore for Persistence {
    fn get_collaboration(
        &mut self,
        id: &CollaborationId,
    ) -> Result<Option<Collaboration>, CollaboratorError> {
        queries::collaborations::get_collaboration(&mut self.conn, id)
            .map_err(port_error("get collaboration"))
    }

    fn insert_collaboration(
        &mut self,
        collaboration: &Collaboration,
        audit_event: &AuditEvent,
    ) -> Result<(), CollaboratorError> {
        mutations::collaborations::insert_collaboration(&mut self.conn, collaboration, audit_event)
            .map_err(port_error("insert collaboration"))
    }

    fn link_option(
        &mut self,
        collaboration_id: &CollaborationId,
        position: usize,
        option: &CollaborationOption,
    ) -> Result<(), CollaboratorError> {
        mutations::collaborations::link_option(&mut self.conn, collaboration_id, position, option)
            .map_err(port_error("link option"))
    }

    fn update_status(
        &mut self,
        result: &TransitionResult,
        expected_version: i64,
    ) -> Result<(), CollaboratorError> {
        mutations::collaborations::update_collaboration(
            &mut self.conn,
            result,
            expected_version,
            false,
        )
        .map_err(port_error("update status"))
    }

    fn replace_options(
        &mut self,
        result: &TransitionResult,
        expected_version: i64,
    ) -> Result<(), CollaboratorError> {
        mutations::collaborations::update_collaboration(
            &mut self.conn,
            result,
            expected_version,
            true,
        )
        .map_err(port_error("replace options"))
    }

    fn delete_collaboration(&mut self, id: &CollaborationId) -> Result<(), CollaboratorError> {
        mutations::collaborations::delete_collaboration(&mut self.conn, id)
            .map_err(port_error("delete collaboration"))
    }

    fn list_collaborations(
        &mut self,
        party_id: &PartyId,
        role: PartyRole,
    ) -> Result<Vec<Collaboration>, CollaboratorError> {
        queries::collaborations::list_collaborations(&mut self.conn, party_id, role)
            .map_err(port_error("list collaborations"))
    }

    fn audit_trail(&mut self, id: &CollaborationId) -> Result<Vec<AuditEvent>, CollaboratorError> {
        queries::audit::get_audit_trail(&mut self.conn, id).map_err(port_error("audit trail"))
    }
}

impl CatalogLookup for Persistence {
    fn get_catalog_option(
        &mut self,
        id: &CatalogOptionId,
    ) -> Result<Option<CatalogOption>, CollaboratorError> {
        queries::directory::get_catalog_option(&mut self.conn, id)
            .map_err(port_error("get catalog option"))
    }

    fn create_custom_option(
        &mut self,
        event_id: &EventId,
        option: &CollaborationOption,
    ) -> Result<CatalogOptionId, CollaboratorError> {
        mutations::directory::create_custom_option(&mut self.conn, event_id, option)
            .map_err(port_error("create custom option"))
    }
}

impl PartyDirectory for Persistence {
    fn party_exists(
        &mut self,
        party_id: &PartyId,
        role: PartyRole,
    ) -> Result<bool, CollaboratorError> {
        queries::directory::party_exists(&mut self.conn, party_id, role)
            .map_err(port_error("party exists"))
    }
}

impl FileStorage for Persistence {
    fn upload(&mut self, bytes: &[u8], path: &str) -> Result<FileRef, CollaboratorError> {
        mutations::directory::store_file(&mut self.conn, path, bytes).map_err(port_error("upload"))
    }

    fn get_url(&mut self, file_ref: &FileRef) -> Result<String, CollaboratorError> {
        if !queries::directory::file_exists(&mut self.conn, file_ref)
            .map_err(port_error("get url"))?
        {
            return Err(CollaboratorError::unavailable(
                "get url",
                format!("no stored file '{file_ref}'"),
            ));
        }
        Ok(format!("{}/files/{file_ref}", self.public_base_url()))
    }
}
