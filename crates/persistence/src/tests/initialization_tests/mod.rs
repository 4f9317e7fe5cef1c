// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend initialization tests.
//!
//! Every other persistence test goes through `new_in_memory()`, so
//! migrations and foreign key enforcement are exercised there as well.

use super::{create_test_collaboration, store};
use crate::{DEFAULT_PUBLIC_BASE_URL, Persistence, PersistenceError};
use sponsorlink::CollaborationStore;
use sponsorlink_domain::{CollaborationId, PartyId, PartyRole};

#[test]
fn test_persistence_initialization() {
    let result: Result<Persistence, PersistenceError> = Persistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_foreign_keys_are_enforced() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    let mut first = Persistence::new_in_memory().unwrap();
    let mut second = Persistence::new_in_memory().unwrap();

    store(&mut first, &create_test_collaboration("collab-1"));

    assert!(
        first
            .get_collaboration(&CollaborationId::new("collab-1"))
            .unwrap()
            .is_some()
    );
    assert!(
        second
            .get_collaboration(&CollaborationId::new("collab-1"))
            .unwrap()
            .is_none()
    );
    assert!(
        second
            .list_collaborations(&PartyId::new("sponsor-1"), PartyRole::Sponsor)
            .unwrap()
            .is_empty()
    );
}

#[test]
fn test_public_base_url_is_trimmed() {
    let persistence = Persistence::new_in_memory().unwrap();
    assert_eq!(persistence.public_base_url(), DEFAULT_PUBLIC_BASE_URL);

    let persistence = persistence.with_public_base_url("https://sponsor.example/");
    assert_eq!(persistence.public_base_url(), "https://sponsor.example");
}

#[test]
fn test_file_database_survives_reopen() {
    let path = std::env::temp_dir().join(format!(
        "sponsorlink-reopen-{}.db",
        CollaborationId::generate()
    ));

    {
        let mut persistence = Persistence::new_with_file(&path).unwrap();
        store(&mut persistence, &create_test_collaboration("collab-file"));
    }

    let mut reopened = Persistence::new_with_file(&path).unwrap();
    let loaded = reopened
        .get_collaboration(&CollaborationId::new("collab-file"))
        .unwrap()
        .unwrap();
    assert_eq!(loaded.options().len(), 2);

    drop(reopened);
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
    }
}
