// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for sponsorship collaborations.
//!
//! Implements every storage-side collaborator the engine needs on top
//! of Diesel and `SQLite`: collaborations with their events and options,
//! the option catalog, registered parties, uploaded files and the audit
//! log.
//!
//! ## Storage conventions
//!
//! - Amounts are stored as canonical decimal text
//! - Timestamps are stored as RFC 3339 text
//! - Every change to an existing collaboration is written inside one
//!   transaction, guarded by `version = expected`
//!
//! ## Testing
//!
//! `Persistence::new_in_memory()` gives each caller its own shared-cache
//! in-memory database, so tests never see each other's rows.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use sponsorlink_domain::{CatalogOption, EventId, FileRef, Party};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

mod backend;
mod collaborators;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Base URL used by `get_url` when none is configured.
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://127.0.0.1:3000";

/// `SQLite`-backed implementation of the engine's collaborators.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
    public_base_url: String,
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence")
            .field("public_base_url", &self.public_base_url)
            .finish_non_exhaustive()
    }
}

impl Persistence {
    /// Creates a persistence adapter over a fresh in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url = format!("file:memdb_sponsorlink_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn,
            public_base_url: DEFAULT_PUBLIC_BASE_URL.to_string(),
        })
    }

    /// Creates a persistence adapter over a database file, in WAL mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        info!(path = path_str, "Opened collaboration database");
        Ok(Self {
            conn,
            public_base_url: DEFAULT_PUBLIC_BASE_URL.to_string(),
        })
    }

    /// Sets the prefix of URLs handed out for stored files.
    #[must_use]
    pub fn with_public_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.public_base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn public_base_url(&self) -> &str {
        &self.public_base_url
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Directory seeding
    // ========================================================================

    /// Registers a sponsor or organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn register_party(&mut self, party: &Party) -> Result<(), PersistenceError> {
        mutations::directory::register_party(&mut self.conn, party)?;
        info!(party_id = %party.party_id, role = %party.role, "Registered party");
        Ok(())
    }

    /// Publishes a catalog option for an event.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn publish_catalog_option(
        &mut self,
        option: &CatalogOption,
    ) -> Result<(), PersistenceError> {
        mutations::directory::publish_catalog_option(&mut self.conn, option)?;
        info!(
            catalog_option_id = %option.id,
            event_id = %option.event_id,
            price = %option.price,
            "Published catalog option"
        );
        Ok(())
    }

    /// Lists the published catalog options of an event.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_catalog(
        &mut self,
        event_id: &EventId,
    ) -> Result<Vec<CatalogOption>, PersistenceError> {
        queries::directory::list_catalog(&mut self.conn, event_id)
    }

    // ========================================================================
    // Files
    // ========================================================================

    /// Reads the content of a stored file.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_file(&mut self, file_ref: &FileRef) -> Result<Option<Vec<u8>>, PersistenceError> {
        queries::directory::get_file(&mut self.conn, file_ref)
    }
}
