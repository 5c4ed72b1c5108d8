// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token extraction from the `Authorization` header.

use axum::http::{header::AUTHORIZATION, HeaderMap};

use super::AuthError;

/// Extract the bearer token from a request's headers.
///
/// A header value that is not valid visible ASCII cannot carry a `Bearer`
/// scheme and is rejected as such.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    match headers.get(AUTHORIZATION) {
        None => Err(AuthError::HeaderMissing),
        Some(value) => {
            let value = value.to_str().map_err(|_| AuthError::NotBearerScheme)?;
            parse_authorization(Some(value))
        }
    }
}

/// Parse a raw `Authorization` header value into its token.
///
/// The value is split on whitespace and must be exactly `Bearer <token>`,
/// with the scheme matched case-insensitively.
pub fn parse_authorization(header: Option<&str>) -> Result<&str, AuthError> {
    let header = match header {
        Some(value) if !value.is_empty() => value,
        _ => return Err(AuthError::HeaderMissing),
    };

    let parts: Vec<&str> = header.split_whitespace().collect();

    match parts.as_slice() {
        [scheme, ..] if !scheme.eq_ignore_ascii_case("bearer") => Err(AuthError::NotBearerScheme),
        [] => Err(AuthError::NotBearerScheme),
        [_] => Err(AuthError::TokenNotFound),
        [_, token] => Ok(*token),
        _ => Err(AuthError::NotBearerToken),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn missing_or_empty_header_is_reported_as_missing() {
        assert_eq!(parse_authorization(None), Err(AuthError::HeaderMissing));
        assert_eq!(parse_authorization(Some("")), Err(AuthError::HeaderMissing));
    }

    #[test]
    fn whitespace_only_header_has_no_scheme() {
        assert_eq!(parse_authorization(Some("   ")), Err(AuthError::NotBearerScheme));
    }

    #[test]
    fn wrong_scheme_is_rejected() {
        assert_eq!(
            parse_authorization(Some("Basic dXNlcjpwYXNz")),
            Err(AuthError::NotBearerScheme)
        );
        assert_eq!(parse_authorization(Some("Token")), Err(AuthError::NotBearerScheme));
    }

    #[test]
    fn scheme_without_token_is_rejected() {
        assert_eq!(parse_authorization(Some("Bearer")), Err(AuthError::TokenNotFound));
        assert_eq!(parse_authorization(Some("Bearer   ")), Err(AuthError::TokenNotFound));
    }

    #[test]
    fn extra_parts_are_rejected() {
        assert_eq!(
            parse_authorization(Some("Bearer abc def")),
            Err(AuthError::NotBearerToken)
        );
    }

    #[test]
    fn scheme_is_case_insensitive() {
        assert_eq!(parse_authorization(Some("bearer abc.def.ghi")), Ok("abc.def.ghi"));
        assert_eq!(parse_authorization(Some("BEARER abc.def.ghi")), Ok("abc.def.ghi"));
        assert_eq!(parse_authorization(Some("  Bearer\tabc.def.ghi ")), Ok("abc.def.ghi"));
    }

    #[test]
    fn header_map_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), Err(AuthError::HeaderMissing));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer token-123"));
        assert_eq!(bearer_token(&headers), Ok("token-123"));

        headers.insert(AUTHORIZATION, HeaderValue::from_bytes(b"Bearer \xfftoken").unwrap());
        assert_eq!(bearer_token(&headers), Err(AuthError::NotBearerScheme));
    }
}
