// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the collaboration engine.
//!
//! Transport-neutral: the server crate maps these handlers onto HTTP
//! routes, but nothing here knows about HTTP beyond the names of the
//! identity headers.

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

mod caller;
mod error;
mod handlers;
mod request_response;
mod status_label;

#[cfg(test)]
mod tests;

pub use caller::{CALLER_ID_HEADER, CALLER_ROLE_HEADER, parse_caller, request_cause};
pub use error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
pub use handlers::{
    Engine, create_collaboration, download_file, get_audit_trail, get_collaboration,
    list_catalog, list_collaborations, publish_catalog_option, register_party,
    request_transition, resolve_settlement, set_options, settlement_file_url, submit_settlement,
    toggle_catalog_option,
};
pub use request_response::{
    AuditEntryInfo, AuditTrailResponse, CatalogOptionInfo, CollaborationInfo,
    CreateCollaborationRequest, CreateCollaborationResponse, ListCatalogResponse,
    ListCollaborationsResponse, OptionInfo, OptionInput, PublishCatalogOptionRequest,
    RegisterPartyRequest, RegisterPartyResponse, SetOptionsRequest, SetOptionsResponse,
    SettlementUrlResponse, ToggleOptionRequest, TransitionRequest, line_amount,
};
pub use status_label::status_label;
