//! Authenticated-user extraction.
//!
//! Authenticated routes carry `Authorization: Bearer <api_token>`; the token
//! resolves to a user row or the request is rejected with 401. Session
//! issuance beyond this lookup (expiry, refresh, revocation) is out of scope -
//! the extractor is the capability that yields the authenticated identity.

use crate::{core::user::find_by_token, entities::user, errors::Error, http::AppState};
use axum::{extract::FromRequestParts, http::header, http::request::Parts};

/// The user a valid bearer token resolved to.
pub struct CurrentUser(pub user::Model);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(Error::Unauthorized)?;

        let user = find_by_token(&state.db, token)
            .await?
            .ok_or(Error::Unauthorized)?;

        Ok(Self(user))
    }
}
