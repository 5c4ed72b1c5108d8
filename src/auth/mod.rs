// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer JWT verification and permission checks for the drinks API.
//!
//! ## Auth Flow
//!
//! 1. Client authenticates with the identity provider (Auth0 tenant)
//! 2. Client sends `Authorization: Bearer <JWT>`
//! 3. Server:
//!    - Reads the `kid` from the unverified token header
//!    - Resolves the key from the tenant JWKS (cached)
//!    - Verifies signature, expiry, issuer, audience
//!    - Checks the route's permission against the `permissions` claim
//!
//! ## Error layers
//!
//! `TokenVerifier::verify_decode` reports the precise reason a token was
//! rejected. The route guard (`RequirePermission`) reports every such
//! failure as `invalid_token`; header and permission failures pass through
//! unchanged.

pub mod claims;
pub mod error;
pub mod extractor;
pub mod header;
pub mod jwks;
pub mod permissions;
pub mod verifier;

#[cfg(test)]
pub(crate) mod test_support;

pub use claims::ClaimSet;
pub use error::AuthError;
pub use extractor::RequirePermission;
pub use jwks::JwksManager;
pub use permissions::{check_permission, RequiredPermission};
pub use verifier::TokenVerifier;
