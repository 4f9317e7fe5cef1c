// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Caller identity extraction for the server.
//!
//! The identity provider in front of this server authenticates the
//! request and forwards the result in two headers. This extractor reads
//! them and rejects the request with 401 when they are unusable.

use axum::{extract::FromRequestParts, http::request::Parts};
use sponsorlink::Caller;
use sponsorlink_api::{ApiError, CALLER_ID_HEADER, CALLER_ROLE_HEADER, parse_caller};
use tracing::{debug, warn};

use crate::HttpError;

/// Extractor for the forwarded caller identity.
///
/// # Usage
///
/// ```ignore
/// async fn my_handler(
///     CallerIdentity(caller): CallerIdentity,
/// ) -> Result<Json<Response>, HttpError> {
///     // caller: Caller
/// }
/// ```
///
/// # Errors
///
/// Rejects with HTTP 401 Unauthorized if:
/// - Either header is missing or blank
/// - A header is not valid visible ASCII
/// - The role is neither `organization` nor `sponsor`
pub struct CallerIdentity(pub Caller);

impl<S: Send + Sync> FromRequestParts<S> for CallerIdentity {
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let party_id: Option<&str> = header_value(parts, CALLER_ID_HEADER)?;
        let role: Option<&str> = header_value(parts, CALLER_ROLE_HEADER)?;

        let caller: Caller = parse_caller(party_id, role).map_err(|e| {
            debug!(error = %e, "Rejected caller identity");
            HttpError::from(e)
        })?;

        debug!(party_id = %caller.party_id, role = %caller.role, "Caller identified");
        Ok(Self(caller))
    }
}

fn header_value<'a>(parts: &'a Parts, name: &'static str) -> Result<Option<&'a str>, HttpError> {
    parts
        .headers
        .get(name)
        .map(|value| {
            value.to_str().map_err(|_| {
                warn!(header = name, "Caller header is not valid ASCII");
                HttpError::from(ApiError::Unauthenticated {
                    reason: format!("invalid {name} header"),
                })
            })
        })
        .transpose()
}
