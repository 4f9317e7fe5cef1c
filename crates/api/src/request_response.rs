// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response data transfer objects.

use crate::status_label::status_label;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sponsorlink::DroppedOption;
use sponsorlink_audit::AuditEvent;
use sponsorlink_domain::{
    CatalogOption, Collaboration, CollaborationOption, FlaggedLine, LineAmount, OptionDraft,
    OptionSource, PartyRole, allowed_actions,
};
use time::format_description::well_known::Rfc3339;

// ============================================================================
// Requests
// ============================================================================

/// One option as submitted by a client.
///
/// Custom amounts are accepted as JSON numbers or strings; anything that
/// does not parse is kept and flagged rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OptionInput {
    Catalog {
        catalog_option_id: String,
    },
    Custom {
        title: String,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        amount: Option<Value>,
    },
}

impl OptionInput {
    /// Converts the input into the draft the engine resolves.
    #[must_use]
    pub fn to_draft(&self) -> OptionDraft {
        match self {
            Self::Catalog { catalog_option_id } => OptionDraft::catalog(catalog_option_id.as_str()),
            Self::Custom {
                title,
                description,
                amount,
            } => OptionDraft::Custom {
                title: title.clone(),
                description: description.clone(),
                amount: line_amount(amount.as_ref()),
            },
        }
    }
}

/// Converts a raw JSON amount into a line amount.
#[must_use]
pub fn line_amount(raw: Option<&Value>) -> LineAmount {
    match raw {
        None | Some(Value::Null) => LineAmount::Missing,
        Some(Value::String(s)) => LineAmount::parse(Some(s.as_str())),
        Some(Value::Number(n)) => LineAmount::parse(Some(n.to_string().as_str())),
        Some(other) => LineAmount::Malformed(other.to_string()),
    }
}

fn drafts_of(inputs: &[OptionInput]) -> Vec<OptionDraft> {
    inputs.iter().map(OptionInput::to_draft).collect()
}

/// API request to propose a new collaboration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCollaborationRequest {
    /// The proposing sponsor. Must match the caller.
    pub sponsor_id: String,
    /// The organization receiving the proposal.
    pub organization_id: String,
    /// Events the proposal covers. The first one is the primary event.
    pub event_ids: Vec<String>,
    /// Optional note to the organization.
    #[serde(default)]
    pub message: Option<String>,
    /// Requested options.
    pub options: Vec<OptionInput>,
}

impl CreateCollaborationRequest {
    #[must_use]
    pub fn drafts(&self) -> Vec<OptionDraft> {
        drafts_of(&self.options)
    }
}

/// API request to replace the whole option set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetOptionsRequest {
    pub options: Vec<OptionInput>,
}

impl SetOptionsRequest {
    #[must_use]
    pub fn drafts(&self) -> Vec<OptionDraft> {
        drafts_of(&self.options)
    }
}

/// API request to add or remove one catalog option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleOptionRequest {
    pub catalog_option_id: String,
}

/// Optional body of a transition request.
///
/// Only `edit_options` reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRequest {
    #[serde(default)]
    pub options: Option<Vec<OptionInput>>,
}

impl TransitionRequest {
    #[must_use]
    pub fn drafts(&self) -> Option<Vec<OptionDraft>> {
        self.options.as_deref().map(drafts_of)
    }
}

/// API request to register a sponsor or organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterPartyRequest {
    pub party_id: String,
    pub role: String,
    pub display_name: String,
}

/// API request to publish a catalog option for an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishCatalogOptionRequest {
    pub event_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
}

// ============================================================================
// Responses
// ============================================================================

/// One option linked to a collaboration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionInfo {
    pub option_id: String,
    pub title: String,
    pub description: Option<String>,
    pub amount: Decimal,
    /// `catalog` or `custom`.
    pub source: String,
    /// The catalog entry, or the backing record of a custom option.
    pub catalog_option_id: Option<String>,
}

impl From<&CollaborationOption> for OptionInfo {
    fn from(option: &CollaborationOption) -> Self {
        let (source, catalog_option_id) = match option.source() {
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
            amount: option.amount(),
            source: source.to_string(),
            catalog_option_id,
        }
    }
}

/// A collaboration as seen by one of its parties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollaborationInfo {
    pub collaboration_id: String,
    pub sponsor_id: String,
    pub organization_id: String,
    pub event_ids: Vec<String>,
    pub status: String,
    /// Label for the viewing party.
    pub status_label: String,
    /// Actions the viewing party may request now.
    pub allowed_actions: Vec<String>,
    pub message: Option<String>,
    pub total_amount: Decimal,
    pub options: Vec<OptionInfo>,
    pub has_settlement_file: bool,
    pub version: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl CollaborationInfo {
    /// Builds the view of `collaboration` for a viewer in `role`.
    #[must_use]
    pub fn for_viewer(collaboration: &Collaboration, role: PartyRole) -> Self {
        let status = collaboration.status();
        Self {
            collaboration_id: collaboration.id().to_string(),
            sponsor_id: collaboration.sponsor_id().to_string(),
            organization_id: collaboration.organization_id().to_string(),
            event_ids: collaboration
                .event_ids()
                .iter()
                .map(ToString::to_string)
                .collect(),
            status: status.as_str().to_string(),
            status_label: status_label(status, role).to_string(),
            allowed_actions: allowed_actions(status, role)
                .iter()
                .map(|a| a.as_str().to_string())
                .collect(),
            message: collaboration.message().map(str::to_string),
            total_amount: collaboration.total_amount(),
            options: collaboration.options().iter().map(OptionInfo::from).collect(),
            has_settlement_file: collaboration.settlement_file_ref().is_some(),
            version: collaboration.version(),
            created_at: rfc3339(collaboration.created_at()),
            updated_at: rfc3339(collaboration.updated_at()),
        }
    }
}

fn rfc3339(at: time::OffsetDateTime) -> String {
    at.format(&Rfc3339).unwrap_or_else(|_| at.to_string())
}

/// API response for a successful creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCollaborationResponse {
    pub collaboration: CollaborationInfo,
    /// True if some requested options could not be linked.
    pub partial_failure: bool,
    pub dropped_options: Vec<DroppedOption>,
    /// Lines whose amount was missing or malformed and counted as zero.
    pub flagged_amounts: Vec<FlaggedLine>,
}

/// API response for an option edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetOptionsResponse {
    pub collaboration: CollaborationInfo,
    pub flagged_amounts: Vec<FlaggedLine>,
}

/// API response for listing collaborations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListCollaborationsResponse {
    pub party_id: String,
    pub role: String,
    pub collaborations: Vec<CollaborationInfo>,
}

/// API response for the settlement file URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementUrlResponse {
    pub collaboration_id: String,
    /// `None` until a settlement has been submitted.
    pub url: Option<String>,
}

/// One entry of an audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntryInfo {
    pub action: String,
    pub details: Option<String>,
    pub actor_id: String,
    pub actor_type: String,
    pub cause_id: String,
    pub cause_description: String,
    pub before: String,
    pub after: String,
}

impl From<AuditEvent> for AuditEntryInfo {
    fn from(event: AuditEvent) -> Self {
        Self {
            action: event.action.name,
            details: event.action.details,
            actor_id: event.actor.id,
            actor_type: event.actor.actor_type,
            cause_id: event.cause.id,
            cause_description: event.cause.description,
            before: event.before.data,
            after: event.after.data,
        }
    }
}

/// API response for an audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrailResponse {
    pub collaboration_id: String,
    pub events: Vec<AuditEntryInfo>,
}

/// API response for party registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterPartyResponse {
    pub party_id: String,
    pub role: String,
    pub display_name: String,
}

/// A published catalog option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogOptionInfo {
    pub catalog_option_id: String,
    pub event_id: String,
    pub title: String,
    pub description: Option<String>,
    pub price: Decimal,
}

impl From<&CatalogOption> for CatalogOptionInfo {
    fn from(option: &CatalogOption) -> Self {
        Self {
            catalog_option_id: option.id.to_string(),
            event_id: option.event_id.to_string(),
            title: option.title.clone(),
            description: option.description.clone(),
            price: option.price,
        }
    }
}

/// API response for an event's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListCatalogResponse {
    pub event_id: String,
    pub options: Vec<CatalogOptionInfo>,
}
