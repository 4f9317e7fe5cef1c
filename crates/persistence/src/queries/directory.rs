// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use sponsorlink_domain::{CatalogOption, CatalogOptionId, EventId, FileRef, PartyId, PartyRole};

use crate::data_models::CatalogOptionRow;
use crate::diesel_schema::{catalog_options, parties, stored_files};
use crate::error::PersistenceError;

/// Returns true if `party_id` is registered with `role`.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn party_exists(
    conn: &mut SqliteConnection,
    party_id: &PartyId,
    role: PartyRole,
) -> Result<bool, PersistenceError> {
    let count: i64 = parties::table
        .filter(parties::party_id.eq(party_id.as_str()))
        .filter(parties::role.eq(role.as_str()))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}

/// Resolves a catalog option, including backing records of custom options.
///
/// # Errors
///
/// Returns an error if the query fails or the stored price is invalid.
pub fn get_catalog_option(
    conn: &mut SqliteConnection,
    id: &CatalogOptionId,
) -> Result<Option<CatalogOption>, PersistenceError> {
    catalog_options::table
        .filter(catalog_options::catalog_option_id.eq(id.as_str()))
        .select(CatalogOptionRow::as_select())
        .first::<CatalogOptionRow>(conn)
        .optional()?
        .map(CatalogOptionRow::into_catalog_option)
        .transpose()
}

/// Lists the published (non-custom) catalog options of an event.
///
/// # Errors
///
/// Returns an error if the query fails or a stored price is invalid.
pub fn list_catalog(
    conn: &mut SqliteConnection,
    event_id: &EventId,
) -> Result<Vec<CatalogOption>, PersistenceError> {
    catalog_options::table
        .filter(catalog_options::event_id.eq(event_id.as_str()))
        .filter(catalog_options::is_custom.eq(0))
        .order((catalog_options::created_at.asc(), catalog_options::title.asc()))
        .select(CatalogOptionRow::as_select())
        .load::<CatalogOptionRow>(conn)?
        .into_iter()
        .map(CatalogOptionRow::into_catalog_option)
        .collect()
}

/// Returns true if a stored object exists under `file_ref`.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn file_exists(
    conn: &mut SqliteConnection,
    file_ref: &FileRef,
) -> Result<bool, PersistenceError> {
    let count: i64 = stored_files::table
        .filter(stored_files::file_ref.eq(file_ref.as_str()))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}

/// Reads the content of a stored object.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_file(
    conn: &mut SqliteConnection,
    file_ref: &FileRef,
) -> Result<Option<Vec<u8>>, PersistenceError> {
    Ok(stored_files::table
        .filter(stored_files::file_ref.eq(file_ref.as_str()))
        .select(stored_files::content)
        .first::<Vec<u8>>(conn)
        .optional()?)
}
