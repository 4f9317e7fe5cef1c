// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sponsorlink_domain::{
    CatalogOption, CatalogOptionId, CollaborationOption, EventId, OptionId, OptionSource,
};
use std::str::FromStr;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::diesel_schema::{catalog_options, collaboration_options, collaborations};
use crate::error::PersistenceError;

/// Serializable representation of an Actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorData {
    pub id: String,
    pub actor_type: String,
}

/// Serializable representation of a Cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauseData {
    pub id: String,
    pub description: String,
}

/// Serializable representation of an Action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionData {
    pub name: String,
    pub details: Option<String>,
}

/// Serializable representation of a `StateSnapshot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshotData {
    pub data: String,
}

/// A `collaborations` row.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = collaborations)]
pub struct CollaborationRow {
    pub collaboration_id: String,
    pub sponsor_id: String,
    pub organization_id: String,
    pub status: String,
    pub message: Option<String>,
    pub total_amount: String,
    pub settlement_file_ref: Option<String>,
    pub version: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// A `collaboration_options` row.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = collaboration_options)]
pub struct OptionRow {
    pub option_id: String,
    pub title: String,
    pub description: Option<String>,
    pub amount: String,
    pub source_kind: String,
    pub catalog_option_id: Option<String>,
}

impl OptionRow {
    pub fn into_option(self) -> Result<CollaborationOption, PersistenceError> {
        let catalog_option_id = self.catalog_option_id.map(CatalogOptionId::new);
        let source = match (self.source_kind.as_str(), catalog_option_id) {
            ("catalog", Some(catalog_option_id)) => OptionSource::Catalog { catalog_option_id },
            ("custom", backing_option_id) => OptionSource::Custom { backing_option_id },
            (kind, _) => {
                return Err(PersistenceError::ReconstructionError(format!(
                    "option '{}' has invalid source '{kind}'",
                    self.option_id
                )));
            }
        };

        Ok(CollaborationOption::restore(
            OptionId::new(self.option_id),
            self.title,
            self.description,
            parse_decimal(&self.amount)?,
            source,
        ))
    }
}

/// Column values of one option about to be linked.
pub struct NewOptionRow {
    pub option_id: String,
    pub title: String,
    pub description: Option<String>,
    pub amount: String,
    pub source_kind: &'static str,
    pub catalog_option_id: Option<String>,
}

impl From<&CollaborationOption> for NewOptionRow {
    fn from(option: &CollaborationOption) -> Self {
        let (source_kind, catalog_option_id) = match option.source() {
            OptionSource::Catalog { catalog_option_id } => {
                ("catalog", Some(catalog_option_id.to_string()))
            }
            OptionSource::Custom { backing_option_id } => {
                ("custom", backing_option_id.as_ref().map(ToString::to_string))
            }
        };
        Self {
            option_id: option.option_id().to_string(),
            title: option.title().to_string(),
            description: option.description().map(str::to_string),
            amount: format_decimal(option.amount()),
            source_kind,
            catalog_option_id,
        }
    }
}

/// A `catalog_options` row.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = catalog_options)]
pub struct CatalogOptionRow {
    pub catalog_option_id: String,
    pub event_id: String,
    pub title: String,
    pub description: Option<String>,
    pub price: String,
}

impl CatalogOptionRow {
    pub fn into_catalog_option(self) -> Result<CatalogOption, PersistenceError> {
        Ok(CatalogOption {
            id: CatalogOptionId::new(self.catalog_option_id),
            event_id: EventId::new(self.event_id),
            title: self.title,
            description: self.description,
            price: parse_decimal(&self.price)?,
        })
    }
}

/// Amounts are stored as canonical decimal text so no precision is lost.
pub fn format_decimal(value: Decimal) -> String {
    value.normalize().to_string()
}

pub fn parse_decimal(raw: &str) -> Result<Decimal, PersistenceError> {
    Ok(Decimal::from_str(raw)?)
}

pub fn format_timestamp(value: OffsetDateTime) -> Result<String, PersistenceError> {
    Ok(value.format(&Rfc3339)?)
}

pub fn parse_timestamp(raw: &str) -> Result<OffsetDateTime, PersistenceError> {
    Ok(OffsetDateTime::parse(raw, &Rfc3339)?)
}
