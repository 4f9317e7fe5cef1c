// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! In-memory collaborators with fault injection.

use crate::{
    Caller, CatalogLookup, ChangeNotifier, CollaborationEngine, CollaborationStore,
    CollaboratorError, CreationOutcome, FileStorage, PartyDirectory, TransitionResult,
};
use rust_decimal::Decimal;
use sponsorlink_audit::{Actor, AuditEvent, Cause};
use sponsorlink_domain::{
    CatalogOption, CatalogOptionId, Collaboration, CollaborationId, CollaborationOption,
    CollaborationParts, EventId, FileRef, NewCollaboration, OptionDraft, PartyId, PartyRole,
};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

pub type TestEngine = CollaborationEngine<FakeBackend, RecordingNotifier>;

#[derive(Debug, Default)]
pub struct FakeBackend {
    rows: HashMap<CollaborationId, Collaboration>,
    options: HashMap<CollaborationId, Vec<CollaborationOption>>,
    pub catalog: HashMap<CatalogOptionId, CatalogOption>,
    pub custom_records: Vec<(CatalogOptionId, EventId, String)>,
    pub parties: HashSet<(PartyId, PartyRole)>,
    pub files: HashMap<FileRef, Vec<u8>>,
    pub audit: Vec<AuditEvent>,
    custom_option_calls: usize,
    /// 1-based `create_custom_option` calls that fail.
    pub fail_custom_option_calls: HashSet<usize>,
    pub fail_links: bool,
    pub fail_inserts: bool,
    pub fail_updates: bool,
    pub fail_uploads: bool,
    /// The next update behaves as if another writer got there first.
    pub conflict_on_next_write: bool,
}

impl FakeBackend {
    pub fn stored_count(&self) -> usize {
        self.rows.len()
    }

    pub fn audit_count(&self, id: &CollaborationId) -> usize {
        self.audit
            .iter()
            .filter(|e| &e.collaboration_id == id)
            .count()
    }

    fn hydrate(&self, row: &Collaboration) -> Collaboration {
        Collaboration::restore(CollaborationParts {
            id: row.id().clone(),
            sponsor_id: row.sponsor_id().clone(),
            organization_id: row.organization_id().clone(),
            event_ids: row.event_ids().to_vec(),
            status: row.status(),
            message: row.message().map(str::to_string),
            total_amount: row.total_amount(),
            settlement_file_ref: row.settlement_file_ref().cloned(),
            options: self.options.get(row.id()).cloned().unwrap_or_default(),
            version: row.version(),
            created_at: row.created_at(),
            updated_at: row.updated_at(),
        })
    }

    fn check_update(
        &mut self,
        result: &TransitionResult,
        expected_version: i64,
    ) -> Result<(), CollaboratorError> {
        if self.fail_updates {
            return Err(CollaboratorError::unavailable("update", "disk full"));
        }
        if std::mem::take(&mut self.conflict_on_next_write) {
            return Err(CollaboratorError::VersionConflict {
                expected: expected_version,
            });
        }
        let id = result.new_collaboration.id();
        match self.rows.get(id) {
            Some(row) if row.version() == expected_version => Ok(()),
            Some(_) => Err(CollaboratorError::VersionConflict {
                expected: expected_version,
            }),
            None => Err(CollaboratorError::unavailable("update", "row missing")),
        }
    }
}

impl CollaborationStore for FakeBackend {
    fn get_collaboration(
        &mut self,
        id: &CollaborationId,
    ) -> Result<Option<Collaboration>, CollaboratorError> {
        Ok(self.rows.get(id).map(|row| self.hydrate(row)))
    }

    fn insert_collaboration(
        &mut self,
        collaboration: &Collaboration,
        audit_event: &AuditEvent,
    ) -> Result<(), CollaboratorError> {
        if self.fail_inserts {
            return Err(CollaboratorError::unavailable("insert", "connection reset"));
        }
        self.rows
            .insert(collaboration.id().clone(), collaboration.clone());
        self.options.insert(collaboration.id().clone(), Vec::new());
        self.audit.push(audit_event.clone());
        Ok(())
    }

    fn link_option(
        &mut self,
        collaboration_id: &CollaborationId,
        _position: usize,
        option: &CollaborationOption,
    ) -> Result<(), CollaboratorError> {
        if self.fail_links {
            return Err(CollaboratorError::unavailable("link option", "constraint failed"));
        }
        self.options
            .entry(collaboration_id.clone())
            .or_default()
            .push(option.clone());
        Ok(())
    }

    fn update_status(
        &mut self,
        result: &TransitionResult,
        expected_version: i64,
    ) -> Result<(), CollaboratorError> {
        self.check_update(result, expected_version)?;
        let updated = &result.new_collaboration;
        self.rows.insert(updated.id().clone(), updated.clone());
        self.audit.push(result.audit_event.clone());
        Ok(())
    }

    fn replace_options(
        &mut self,
        result: &TransitionResult,
        expected_version: i64,
    ) -> Result<(), CollaboratorError> {
        self.check_update(result, expected_version)?;
        let updated = &result.new_collaboration;
        self.rows.insert(updated.id().clone(), updated.clone());
        self.options
            .insert(updated.id().clone(), updated.options().to_vec());
        self.audit.push(result.audit_event.clone());
        Ok(())
    }

    fn delete_collaboration(&mut self, id: &CollaborationId) -> Result<(), CollaboratorError> {
        self.rows.remove(id);
        self.options.remove(id);
        Ok(())
    }

    fn list_collaborations(
        &mut self,
        party_id: &PartyId,
        role: PartyRole,
    ) -> Result<Vec<Collaboration>, CollaboratorError> {
        let mut found: Vec<Collaboration> = self
            .rows
            .values()
            .filter(|row| row.party_for(role) == party_id)
            .map(|row| self.hydrate(row))
            .collect();
        found.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(found)
    }

    fn audit_trail(&mut self, id: &CollaborationId) -> Result<Vec<AuditEvent>, CollaboratorError> {
        Ok(self
            .audit
            .iter()
            .filter(|e| &e.collaboration_id == id)
            .cloned()
            .collect())
    }
}

impl CatalogLookup for FakeBackend {
    fn get_catalog_option(
        &mut self,
        id: &CatalogOptionId,
    ) -> Result<Option<CatalogOption>, CollaboratorError> {
        Ok(self.catalog.get(id).cloned())
    }

    fn create_custom_option(
        &mut self,
        event_id: &EventId,
        option: &CollaborationOption,
    ) -> Result<CatalogOptionId, CollaboratorError> {
        self.custom_option_calls += 1;
        if self.fail_custom_option_calls.contains(&self.custom_option_calls) {
            return Err(CollaboratorError::unavailable(
                "create custom option",
                "write timed out",
            ));
        }
        let id = CatalogOptionId::generate();
        self.custom_records
            .push((id.clone(), event_id.clone(), option.title().to_string()));
        Ok(id)
    }
}

impl PartyDirectory for FakeBackend {
    fn party_exists(
        &mut self,
        party_id: &PartyId,
        role: PartyRole,
    ) -> Result<bool, CollaboratorError> {
        Ok(self.parties.contains(&(party_id.clone(), role)))
    }
}

impl FileStorage for FakeBackend {
    fn upload(&mut self, bytes: &[u8], path: &str) -> Result<FileRef, CollaboratorError> {
        if self.fail_uploads {
            return Err(CollaboratorError::unavailable("upload", "bucket unavailable"));
        }
        let file_ref = FileRef::new(path);
        self.files.insert(file_ref.clone(), bytes.to_vec());
        Ok(file_ref)
    }

    fn get_url(&mut self, file_ref: &FileRef) -> Result<String, CollaboratorError> {
        if self.files.contains_key(file_ref) {
            Ok(format!("https://files.test/{file_ref}"))
        } else {
            Err(CollaboratorError::unavailable("get url", "no such object"))
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub changed: RefCell<Vec<CollaborationId>>,
}

impl ChangeNotifier for RecordingNotifier {
    fn collaboration_changed(&self, id: &CollaborationId) {
        self.changed.borrow_mut().push(id.clone());
    }
}

pub fn create_test_actor() -> Actor {
    Actor::party(&PartyId::new("sponsor-1"), PartyRole::Sponsor)
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Test request"))
}

pub fn sponsor() -> Caller {
    Caller::new(PartyId::new("sponsor-1"), PartyRole::Sponsor)
}

pub fn organization() -> Caller {
    Caller::new(PartyId::new("org-1"), PartyRole::Organization)
}

fn catalog_entry(id: &str, event: &str, price: i64) -> CatalogOption {
    CatalogOption {
        id: CatalogOptionId::new(id),
        event_id: EventId::new(event),
        title: format!("Catalog {id}"),
        description: Some(format!("{id} placement")),
        price: Decimal::from(price),
    }
}

/// Two parties and four catalog options: `banner` (500) and `booth`
/// (300) on event-1, `lanyard` (150) on event-2, `mug` (20) on event-9.
pub fn create_test_backend() -> FakeBackend {
    let mut backend = FakeBackend::default();
    backend
        .parties
        .insert((PartyId::new("sponsor-1"), PartyRole::Sponsor));
    backend
        .parties
        .insert((PartyId::new("org-1"), PartyRole::Organization));
    for option in [
        catalog_entry("banner", "event-1", 500),
        catalog_entry("booth", "event-1", 300),
        catalog_entry("lanyard", "event-2", 150),
        catalog_entry("mug", "event-9", 20),
    ] {
        backend.catalog.insert(option.id.clone(), option);
    }
    backend
}

pub fn create_test_engine() -> TestEngine {
    CollaborationEngine::new(create_test_backend(), RecordingNotifier::default())
}

pub fn new_proposal() -> NewCollaboration {
    NewCollaboration {
        sponsor_id: PartyId::new("sponsor-1"),
        organization_id: PartyId::new("org-1"),
        event_ids: vec![EventId::new("event-1"), EventId::new("event-2")],
        message: Some(String::from("Happy to support the conference")),
    }
}

pub fn custom(title: &str, amount: i64) -> OptionDraft {
    OptionDraft::custom(title, None, Decimal::from(amount))
}

/// Creates a pending collaboration with `banner` and `booth`.
pub fn create_pending(engine: &mut TestEngine) -> Collaboration {
    let outcome: CreationOutcome = engine
        .create_collaboration(
            &sponsor(),
            new_proposal(),
            &[OptionDraft::catalog("banner"), OptionDraft::catalog("booth")],
            create_test_cause(),
        )
        .unwrap();
    assert!(!outcome.partial_failure());
    outcome.collaboration
}

/// Creates a collaboration and drives it to `in_progress`.
pub fn create_in_progress(engine: &mut TestEngine) -> Collaboration {
    use crate::TransitionPayload;
    use sponsorlink_domain::TransitionAction;

    let collaboration = create_pending(engine);
    engine
        .request_transition(
            collaboration.id(),
            &organization(),
            TransitionAction::Negotiate,
            TransitionPayload::default(),
            create_test_cause(),
        )
        .unwrap();
    engine
        .request_transition(
            collaboration.id(),
            &sponsor(),
            TransitionAction::AcceptTerms,
            TransitionPayload::default(),
            create_test_cause(),
        )
        .unwrap()
}
