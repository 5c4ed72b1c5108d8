// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Authentication and authorization failure.
///
/// Several variants share one wire code (`invalid_header`, `invalid_claims`);
/// they stay separate here so logs and tests can tell the causes apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No (or an empty) `Authorization` header
    HeaderMissing,
    /// Header does not start with the `Bearer` scheme
    NotBearerScheme,
    /// `Bearer` scheme with nothing after it
    TokenNotFound,
    /// More than a scheme and a token in the header
    NotBearerToken,
    /// Token header carries no `kid`
    MissingKeyId,
    /// No key in the JWKS matches the token's `kid`
    KeyNotFound,
    /// Signature, algorithm or payload could not be verified
    UnparseableToken,
    /// Token `exp` is in the past
    TokenExpired,
    /// Audience or issuer mismatch
    InvalidClaims,
    /// Verified token without a `permissions` claim
    PermissionsMissing,
    /// `permissions` claim lacks the required permission
    PermissionNotFound,
    /// Any verification failure, as reported by the route guard
    InvalidToken,
}

#[derive(Serialize)]
struct AuthErrorBody {
    success: bool,
    error: u16,
    message: String,
}

impl AuthError {
    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::HeaderMissing => "authorization_header_missing",
            AuthError::NotBearerScheme
            | AuthError::TokenNotFound
            | AuthError::NotBearerToken
            | AuthError::MissingKeyId
            | AuthError::KeyNotFound
            | AuthError::UnparseableToken => "invalid_header",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidClaims | AuthError::PermissionsMissing => "invalid_claims",
            AuthError::PermissionNotFound => "unauthorized",
            AuthError::InvalidToken => "invalid_token",
        }
    }

    /// Human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            AuthError::HeaderMissing => "Authorization header is expected.",
            AuthError::NotBearerScheme => "Authorization header must start with \"Bearer\".",
            AuthError::TokenNotFound => "Token not found.",
            AuthError::NotBearerToken => "Authorization header must be bearer token.",
            AuthError::MissingKeyId => "Authorization malformed.",
            AuthError::KeyNotFound => "Unable to find the appropriate key.",
            AuthError::UnparseableToken => "Unable to parse authentication token.",
            AuthError::TokenExpired => "Token expired.",
            AuthError::InvalidClaims => {
                "Incorrect claims. Please, check the audience and issuer."
            }
            AuthError::PermissionsMissing => "Permissions not included in JWT.",
            AuthError::PermissionNotFound => "Permission not found.",
            AuthError::InvalidToken => "Access denied due to invalid token",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::HeaderMissing
            | AuthError::NotBearerScheme
            | AuthError::TokenNotFound
            | AuthError::NotBearerToken
            | AuthError::MissingKeyId
            | AuthError::TokenExpired
            | AuthError::InvalidClaims
            | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::KeyNotFound
            | AuthError::UnparseableToken
            | AuthError::PermissionsMissing => StatusCode::BAD_REQUEST,
            AuthError::PermissionNotFound => StatusCode::FORBIDDEN,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            success: false,
            error: status.as_u16(),
            message: self.description().to_string(),
        });
        (status, body).into_response()
    }
}
