// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use sponsorlink_domain::{
    CatalogOption, CatalogOptionId, CollaborationOption, EventId, FileRef, Party,
};

use crate::data_models::format_decimal;
use crate::diesel_schema::{catalog_options, parties, stored_files};
use crate::error::PersistenceError;

/// Registers a party, or renames it if it is already registered.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn register_party(conn: &mut SqliteConnection, party: &Party) -> Result<(), PersistenceError> {
    diesel::insert_into(parties::table)
        .values((
            parties::party_id.eq(party.party_id.as_str()),
            parties::role.eq(party.role.as_str()),
            parties::display_name.eq(&party.display_name),
        ))
        .on_conflict((parties::party_id, parties::role))
        .do_update()
        .set(parties::display_name.eq(&party.display_name))
        .execute(conn)?;
    Ok(())
}

/// Inserts a published catalog option.
///
/// # Errors
///
/// Returns an error if the insert fails, e.g. on a duplicate id.
pub fn publish_catalog_option(
    conn: &mut SqliteConnection,
    option: &CatalogOption,
) -> Result<(), PersistenceError> {
    insert_catalog_row(
        conn,
        &option.id,
        &option.event_id,
        &option.title,
        option.description.as_deref(),
        &format_decimal(option.price),
        false,
    )
}

/// Creates the catalog-style backing record of a custom option.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_custom_option(
    conn: &mut SqliteConnection,
    event_id: &EventId,
    option: &CollaborationOption,
) -> Result<CatalogOptionId, PersistenceError> {
    let id: CatalogOptionId = CatalogOptionId::generate();
    insert_catalog_row(
        conn,
        &id,
        event_id,
        option.title(),
        option.description(),
        &format_decimal(option.amount()),
        true,
    )?;
    Ok(id)
}

/// Stores an uploaded object under `path`.
///
/// # Errors
///
/// Returns an error if the insert fails, e.g. when `path` is taken.
pub fn store_file(
    conn: &mut SqliteConnection,
    path: &str,
    bytes: &[u8],
) -> Result<FileRef, PersistenceError> {
    let size: i64 = i64::try_from(bytes.len())
        .map_err(|_| PersistenceError::QueryFailed(String::from("file too large")))?;
    diesel::insert_into(stored_files::table)
        .values((
            stored_files::file_ref.eq(path),
            stored_files::content.eq(bytes),
            stored_files::size_bytes.eq(size),
        ))
        .execute(conn)?;
    Ok(FileRef::new(path))
}

fn insert_catalog_row(
    conn: &mut SqliteConnection,
    id: &CatalogOptionId,
    event_id: &EventId,
    title: &str,
    description: Option<&str>,
    price: &str,
    is_custom: bool,
) -> Result<(), PersistenceError> {
    diesel::insert_into(catalog_options::table)
        .values((
            catalog_options::catalog_option_id.eq(id.as_str()),
            catalog_options::event_id.eq(event_id.as_str()),
            catalog_options::title.eq(title),
            catalog_options::description.eq(description),
            catalog_options::price.eq(price),
            catalog_options::is_custom.eq(i32::from(is_custom)),
        ))
        .execute(conn)?;
    Ok(())
}
