// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Caller identity handoff.
//!
//! The identity provider sits in front of this service and forwards the
//! authenticated party id and role. This module only checks that both
//! are present and well-formed; whether the party belongs to a given
//! collaboration is decided by the engine.

use crate::error::ApiError;
use sponsorlink::Caller;
use sponsorlink_audit::Cause;
use sponsorlink_domain::{PartyId, PartyRole};
use std::str::FromStr;

/// Header carrying the caller's party id.
pub const CALLER_ID_HEADER: &str = "x-caller-id";

/// Header carrying the caller's role.
pub const CALLER_ROLE_HEADER: &str = "x-caller-role";

/// Builds a [`Caller`] from the forwarded identity values.
///
/// # Errors
///
/// Returns `ApiError::Unauthenticated` if either value is absent, blank,
/// or names an unknown role.
pub fn parse_caller(party_id: Option<&str>, role: Option<&str>) -> Result<Caller, ApiError> {
    let party_id = party_id
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::Unauthenticated {
            reason: format!("missing {CALLER_ID_HEADER} header"),
        })?;

    let role = role
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::Unauthenticated {
            reason: format!("missing {CALLER_ROLE_HEADER} header"),
        })?;

    let role = PartyRole::from_str(role).map_err(|_| ApiError::Unauthenticated {
        reason: format!("unknown role '{role}'"),
    })?;

    Ok(Caller::new(PartyId::new(party_id), role))
}

/// Builds the audit cause for a request.
///
/// # Arguments
///
/// * `request_id` - Identifier correlating the request across log lines
/// * `description` - Human-readable summary, usually method and path
#[must_use]
pub fn request_cause(request_id: impl Into<String>, description: impl Into<String>) -> Cause {
    Cause::new(request_id.into(), description.into())
}
