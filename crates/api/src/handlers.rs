// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! One handler per operation.
//!
//! Handlers translate requests into engine calls and engine results into
//! response DTOs. They hold no business rules of their own apart from
//! transport limits such as the maximum upload size.

use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::request_response::{
    AuditEntryInfo, AuditTrailResponse, CatalogOptionInfo, CollaborationInfo,
    CreateCollaborationRequest, CreateCollaborationResponse, ListCatalogResponse,
    ListCollaborationsResponse, PublishCatalogOptionRequest, RegisterPartyRequest,
    RegisterPartyResponse, SetOptionsRequest, SetOptionsResponse, SettlementUrlResponse,
    ToggleOptionRequest, TransitionRequest,
};
use sponsorlink::{
    Caller, ChangeNotifier, CollaborationEngine, CreationOutcome, OptionEdit, SettlementDecision,
    TransitionPayload,
};
use sponsorlink_audit::Cause;
use sponsorlink_domain::{
    CatalogOption, CatalogOptionId, Collaboration, CollaborationId, EventId, FileRef,
    NewCollaboration, OptionDraft, Party, PartyId, PartyRole, TransitionAction,
    validate_catalog_option, validate_identifier,
};
use sponsorlink_persistence::Persistence;
use std::str::FromStr;
use tracing::{info, warn};

/// The engine as wired by the server: SQLite behind every port.
pub type Engine<N> = CollaborationEngine<Persistence, N>;

// ============================================================================
// Creation
// ============================================================================

/// Proposes a new collaboration on behalf of a sponsor.
///
/// # Arguments
///
/// * `engine` - The collaboration engine
/// * `caller` - The authenticated caller; must be the named sponsor
/// * `request` - The proposal
/// * `cause` - The cause recorded in the audit trail
///
/// # Errors
///
/// Returns an error if:
/// - The caller is not the sponsor named in the request
/// - Either party is unknown, or an option fails validation
/// - Storage fails or no option could be linked
pub fn create_collaboration<N: ChangeNotifier>(
    engine: &mut Engine<N>,
    caller: &Caller,
    request: &CreateCollaborationRequest,
    cause: Cause,
) -> Result<CreateCollaborationResponse, ApiError> {
    let new: NewCollaboration = NewCollaboration {
        sponsor_id: PartyId::new(request.sponsor_id.as_str()),
        organization_id: PartyId::new(request.organization_id.as_str()),
        event_ids: request
            .event_ids
            .iter()
            .map(|id| EventId::new(id.as_str()))
            .collect(),
        message: request
            .message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string),
    };
    let drafts: Vec<OptionDraft> = request.drafts();

    let outcome: CreationOutcome = engine
        .create_collaboration(caller, new, &drafts, cause)
        .map_err(translate_core_error)?;

    if outcome.partial_failure() {
        warn!(
            collaboration_id = %outcome.collaboration.id(),
            dropped = outcome.dropped.len(),
            "Collaboration created with dropped options"
        );
    } else {
        info!(collaboration_id = %outcome.collaboration.id(), "Collaboration created");
    }

    Ok(CreateCollaborationResponse {
        collaboration: CollaborationInfo::for_viewer(&outcome.collaboration, caller.role),
        partial_failure: outcome.partial_failure(),
        dropped_options: outcome.dropped,
        flagged_amounts: outcome.flagged,
    })
}

// ============================================================================
// Queries
// ============================================================================

/// Lists the caller's collaborations, newest first.
///
/// `party_id` and `role` are optional filters from the query string; when
/// given they must name the caller, since nobody may list another
/// party's collaborations.
///
/// # Errors
///
/// Returns an error if the filters name someone other than the caller, or
/// storage fails.
pub fn list_collaborations<N: ChangeNotifier>(
    engine: &mut Engine<N>,
    caller: &Caller,
    party_id: Option<&str>,
    role: Option<&str>,
) -> Result<ListCollaborationsResponse, ApiError> {
    if let Some(party_id) = party_id.filter(|p| *p != caller.party_id.as_str()) {
        return Err(ApiError::Forbidden {
            message: format!(
                "Party '{}' may not list the collaborations of '{party_id}'",
                caller.party_id
            ),
        });
    }
    if let Some(role) = role {
        let role: PartyRole = PartyRole::from_str(role).map_err(translate_domain_error)?;
        if role != caller.role {
            return Err(ApiError::Forbidden {
                message: format!(
                    "Caller is acting as {}, not {}",
                    caller.role.as_str(),
                    role.as_str()
                ),
            });
        }
    }

    let collaborations: Vec<Collaboration> = engine.list(caller).map_err(translate_core_error)?;

    Ok(ListCollaborationsResponse {
        party_id: caller.party_id.to_string(),
        role: caller.role.as_str().to_string(),
        collaborations: collaborations
            .iter()
            .map(|c| CollaborationInfo::for_viewer(c, caller.role))
            .collect(),
    })
}

/// Returns one collaboration as the caller sees it.
///
/// # Errors
///
/// Returns an error if the collaboration does not exist or the caller is
/// not a party to it.
pub fn get_collaboration<N: ChangeNotifier>(
    engine: &mut Engine<N>,
    caller: &Caller,
    collaboration_id: &str,
) -> Result<CollaborationInfo, ApiError> {
    let collaboration: Collaboration = engine
        .get_by_id(&CollaborationId::new(collaboration_id), caller)
        .map_err(translate_core_error)?;
    Ok(CollaborationInfo::for_viewer(&collaboration, caller.role))
}

/// Resolves the current settlement file to a URL.
///
/// # Errors
///
/// Same as [`get_collaboration`], plus file storage failures.
pub fn settlement_file_url<N: ChangeNotifier>(
    engine: &mut Engine<N>,
    caller: &Caller,
    collaboration_id: &str,
) -> Result<SettlementUrlResponse, ApiError> {
    let url: Option<String> = engine
        .settlement_file_url(&CollaborationId::new(collaboration_id), caller)
        .map_err(translate_core_error)?;
    Ok(SettlementUrlResponse {
        collaboration_id: collaboration_id.to_string(),
        url,
    })
}

/// Returns the audit trail of a collaboration, oldest first.
///
/// # Errors
///
/// Same as [`get_collaboration`].
pub fn get_audit_trail<N: ChangeNotifier>(
    engine: &mut Engine<N>,
    caller: &Caller,
    collaboration_id: &str,
) -> Result<AuditTrailResponse, ApiError> {
    let events = engine
        .audit_trail(&CollaborationId::new(collaboration_id), caller)
        .map_err(translate_core_error)?;
    Ok(AuditTrailResponse {
        collaboration_id: collaboration_id.to_string(),
        events: events.into_iter().map(AuditEntryInfo::from).collect(),
    })
}

// ============================================================================
// State machine
// ============================================================================

/// Requests one transition by action name.
///
/// # Arguments
///
/// * `engine` - The collaboration engine
/// * `caller` - The authenticated caller
/// * `collaboration_id` - The collaboration to move
/// * `action` - Action name from the path, e.g. `accept` or `accept_terms`
/// * `request` - Replacement options, read only by `edit_options`
/// * `cause` - The cause recorded in the audit trail
///
/// # Errors
///
/// Returns an error if the action is unknown, the caller may not perform
/// it now, or the write fails. Settlement submission needs a file and
/// goes through [`submit_settlement`] instead.
pub fn request_transition<N: ChangeNotifier>(
    engine: &mut Engine<N>,
    caller: &Caller,
    collaboration_id: &str,
    action: &str,
    request: &TransitionRequest,
    cause: Cause,
) -> Result<CollaborationInfo, ApiError> {
    let action: TransitionAction =
        TransitionAction::from_str(action).map_err(translate_domain_error)?;
    let payload: TransitionPayload = TransitionPayload {
        settlement_file: None,
        options: request.drafts(),
    };

    let collaboration: Collaboration = engine
        .request_transition(
            &CollaborationId::new(collaboration_id),
            caller,
            action,
            payload,
            cause,
        )
        .map_err(translate_core_error)?;
    Ok(CollaborationInfo::for_viewer(&collaboration, caller.role))
}

// ============================================================================
// Options negotiation
// ============================================================================

/// Replaces the whole option set.
///
/// # Errors
///
/// Returns an error if options are locked in the current status, an
/// option fails validation, or the write fails.
pub fn set_options<N: ChangeNotifier>(
    engine: &mut Engine<N>,
    caller: &Caller,
    collaboration_id: &str,
    request: &SetOptionsRequest,
    cause: Cause,
) -> Result<SetOptionsResponse, ApiError> {
    let drafts: Vec<OptionDraft> = request.drafts();
    let edit: OptionEdit = engine
        .set_options(&CollaborationId::new(collaboration_id), caller, &drafts, cause)
        .map_err(translate_core_error)?;
    Ok(SetOptionsResponse {
        collaboration: CollaborationInfo::for_viewer(&edit.collaboration, caller.role),
        flagged_amounts: edit.flagged,
    })
}

/// Adds a catalog option if it is not linked yet, or removes it.
///
/// # Errors
///
/// Same as [`set_options`], plus `ResourceNotFound` for an unknown
/// catalog option.
pub fn toggle_catalog_option<N: ChangeNotifier>(
    engine: &mut Engine<N>,
    caller: &Caller,
    collaboration_id: &str,
    request: &ToggleOptionRequest,
    cause: Cause,
) -> Result<CollaborationInfo, ApiError> {
    let collaboration: Collaboration = engine
        .toggle_catalog_option(
            &CollaborationId::new(collaboration_id),
            caller,
            &CatalogOptionId::new(request.catalog_option_id.as_str()),
            cause,
        )
        .map_err(translate_core_error)?;
    Ok(CollaborationInfo::for_viewer(&collaboration, caller.role))
}

// ============================================================================
// Settlement
// ============================================================================

/// Uploads proof of delivery and moves the collaboration to settlement.
///
/// # Arguments
///
/// * `engine` - The collaboration engine
/// * `caller` - The authenticated caller; must be the organization
/// * `collaboration_id` - The collaboration being settled
/// * `file_name` - Client-side name of the uploaded file
/// * `bytes` - File content
/// * `max_upload_bytes` - Largest accepted upload
/// * `cause` - The cause recorded in the audit trail
///
/// # Errors
///
/// Returns an error if the file is empty or too large, the caller may not
/// settle now, or the upload or write fails.
pub fn submit_settlement<N: ChangeNotifier>(
    engine: &mut Engine<N>,
    caller: &Caller,
    collaboration_id: &str,
    file_name: &str,
    bytes: &[u8],
    max_upload_bytes: usize,
    cause: Cause,
) -> Result<CollaborationInfo, ApiError> {
    if bytes.len() > max_upload_bytes {
        return Err(ApiError::InvalidInput {
            field: String::from("settlement_file"),
            message: format!(
                "Settlement file is {} bytes; the limit is {max_upload_bytes}",
                bytes.len()
            ),
        });
    }

    let collaboration: Collaboration = engine
        .submit_settlement(
            &CollaborationId::new(collaboration_id),
            caller,
            file_name,
            bytes,
            cause,
        )
        .map_err(translate_core_error)?;
    Ok(CollaborationInfo::for_viewer(&collaboration, caller.role))
}

/// Accepts or rejects the submitted settlement.
///
/// # Errors
///
/// Returns an error if `decision` is neither `accept` nor `reject`, the
/// caller is not the sponsor, or no settlement is awaiting review.
pub fn resolve_settlement<N: ChangeNotifier>(
    engine: &mut Engine<N>,
    caller: &Caller,
    collaboration_id: &str,
    decision: &str,
    cause: Cause,
) -> Result<CollaborationInfo, ApiError> {
    let decision: SettlementDecision =
        SettlementDecision::from_str(decision).map_err(translate_domain_error)?;
    let collaboration: Collaboration = engine
        .resolve_settlement(
            &CollaborationId::new(collaboration_id),
            caller,
            decision,
            cause,
        )
        .map_err(translate_core_error)?;
    Ok(CollaborationInfo::for_viewer(&collaboration, caller.role))
}

/// Returns the content of a stored file.
///
/// # Errors
///
/// Returns `ResourceNotFound` if nothing is stored under `file_ref`.
pub fn download_file<N: ChangeNotifier>(
    engine: &mut Engine<N>,
    file_ref: &str,
) -> Result<Vec<u8>, ApiError> {
    engine
        .backend_mut()
        .get_file(&FileRef::new(file_ref))
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("File"),
            message: format!("No file stored under '{file_ref}'"),
        })
}

// ============================================================================
// Directory and catalog
// ============================================================================

/// Registers a sponsor or organization, or renames an existing one.
///
/// # Errors
///
/// Returns an error if a field is blank or the role is unknown.
pub fn register_party<N: ChangeNotifier>(
    engine: &mut Engine<N>,
    request: &RegisterPartyRequest,
) -> Result<RegisterPartyResponse, ApiError> {
    validate_identifier("party_id", &request.party_id).map_err(translate_domain_error)?;
    validate_identifier("display_name", &request.display_name).map_err(translate_domain_error)?;
    let role: PartyRole = PartyRole::from_str(&request.role).map_err(translate_domain_error)?;

    let party: Party = Party {
        party_id: PartyId::new(request.party_id.trim()),
        role,
        display_name: request.display_name.trim().to_string(),
    };
    engine
        .backend_mut()
        .register_party(&party)
        .map_err(translate_persistence_error)?;

    Ok(RegisterPartyResponse {
        party_id: party.party_id.into_inner(),
        role: role.as_str().to_string(),
        display_name: party.display_name,
    })
}

/// Publishes a priced option for an event.
///
/// Only organizations publish catalog entries.
///
/// # Errors
///
/// Returns an error if the caller is not an organization or the option
/// fails validation.
pub fn publish_catalog_option<N: ChangeNotifier>(
    engine: &mut Engine<N>,
    caller: &Caller,
    request: &PublishCatalogOptionRequest,
) -> Result<CatalogOptionInfo, ApiError> {
    if caller.role != PartyRole::Organization {
        return Err(ApiError::Forbidden {
            message: String::from("Only an organization may publish catalog options"),
        });
    }

    let option: CatalogOption = CatalogOption {
        id: CatalogOptionId::generate(),
        event_id: EventId::new(request.event_id.trim()),
        title: request.title.trim().to_string(),
        description: request
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string),
        price: request.price,
    };
    validate_catalog_option(&option).map_err(translate_domain_error)?;

    engine
        .backend_mut()
        .publish_catalog_option(&option)
        .map_err(translate_persistence_error)?;

    Ok(CatalogOptionInfo::from(&option))
}

/// Lists the published catalog of an event.
///
/// # Errors
///
/// Returns an error if the catalog cannot be read.
pub fn list_catalog<N: ChangeNotifier>(
    engine: &mut Engine<N>,
    event_id: &str,
) -> Result<ListCatalogResponse, ApiError> {
    let options: Vec<CatalogOption> = engine
        .backend_mut()
        .list_catalog(&EventId::new(event_id))
        .map_err(translate_persistence_error)?;
    Ok(ListCatalogResponse {
        event_id: event_id.to_string(),
        options: options.iter().map(CatalogOptionInfo::from).collect(),
    })
}
