// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor guarding handlers behind a permission.
//!
//! Add a `RequirePermission` argument to a handler to require a verified
//! token carrying the permission; the claims are handed to the handler:
//!
//! ```rust,ignore
//! async fn drinks_detail(
//!     RequirePermission(claims, _): RequirePermission<GetDrinksDetail>,
//!     State(state): State<AppState>,
//! ) -> Result<Json<DrinkDetailResponse>, ApiError> {
//!     // claims is the verified ClaimSet
//! }
//! ```

use std::marker::PhantomData;

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{
    header::bearer_token, permissions::check_permission, AuthError, ClaimSet, RequiredPermission,
    TokenVerifier,
};
use crate::state::AppState;

/// Extractor requiring a token that grants `P`.
pub struct RequirePermission<P: RequiredPermission>(pub ClaimSet, pub PhantomData<fn() -> P>);

impl<P: RequiredPermission> FromRequestParts<AppState> for RequirePermission<P> {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let claims = authorize(&state.verifier, token, P::NAME).await?;
        Ok(RequirePermission(claims, PhantomData))
    }
}

/// Verify `token` and check it grants `permission`.
///
/// Every failure of the decode step is reported as
/// [`AuthError::InvalidToken`]; the specific cause only reaches the logs.
/// Permission failures keep their own codes.
pub async fn authorize(
    verifier: &TokenVerifier,
    token: &str,
    permission: &str,
) -> Result<ClaimSet, AuthError> {
    let claims = match verifier.verify_decode(token).await {
        Ok(claims) => claims,
        Err(cause) => {
            tracing::debug!(%cause, permission, "Token rejected");
            return Err(AuthError::InvalidToken);
        }
    };

    if let Err(e) = check_permission(permission, &claims) {
        tracing::debug!(
            subject = claims.subject().unwrap_or("<none>"),
            permission,
            error = %e,
            "Permission check failed"
        );
        return Err(e);
    }

    Ok(claims)
}
