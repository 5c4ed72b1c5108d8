// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT verification against the issuer's JWKS.

use std::sync::Arc;

use jsonwebtoken::{decode, decode_header, errors::ErrorKind, Algorithm, Validation};

use super::{header::parse_authorization, AuthError, ClaimSet, JwksManager};
use crate::config::AuthSettings;

/// Verifies bearer tokens and returns their claims.
pub struct TokenVerifier {
    jwks: Arc<JwksManager>,
    validation: Validation,
}

impl TokenVerifier {
    /// Build a verifier checking `aud`, `iss`, `exp` and `nbf` as configured.
    pub fn new(jwks: Arc<JwksManager>, settings: &AuthSettings) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.algorithms = settings.algorithms.clone();
        validation.leeway = settings.leeway.as_secs();
        validation.validate_nbf = true;
        validation.set_audience(&[&settings.audience]);
        validation.set_issuer(&[&settings.issuer]);
        validation.set_required_spec_claims(&["exp", "aud", "iss"]);

        Self { jwks, validation }
    }

    /// The key resolver backing this verifier.
    pub fn jwks(&self) -> &JwksManager {
        &self.jwks
    }

    /// Verify a raw `Authorization` header value end to end.
    pub async fn verify(&self, authorization: Option<&str>) -> Result<ClaimSet, AuthError> {
        let token = parse_authorization(authorization)?;
        self.verify_decode(token).await
    }

    /// Verify a compact JWT and decode its claims.
    ///
    /// Errors are specific to the failing step; the route guard collapses
    /// them, callers using this directly see them as-is.
    pub async fn verify_decode(&self, token: &str) -> Result<ClaimSet, AuthError> {
        // Only the unsigned header segment is read here.
        let header = decode_header(token).map_err(|_| AuthError::UnparseableToken)?;
        let kid = header.kid.ok_or(AuthError::MissingKeyId)?;

        let signing_key = self.jwks.resolve(&kid).await.ok_or(AuthError::KeyNotFound)?;
        let decoding_key = signing_key
            .decoding_key()
            .map_err(|_| AuthError::UnparseableToken)?;

        let token_data = decode::<ClaimSet>(token, &decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                ErrorKind::InvalidAudience
                | ErrorKind::InvalidIssuer
                | ErrorKind::ImmatureSignature => AuthError::InvalidClaims,
                ErrorKind::MissingRequiredClaim(claim) if claim == "aud" || claim == "iss" => {
                    AuthError::InvalidClaims
                }
                _ => AuthError::UnparseableToken,
            })?;

        Ok(token_data.claims)
    }
}
