// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Permission checks against the `permissions` claim.
//!
//! ## Catalog permissions
//!
//! - `get:drinks-detail` - Read drinks with full recipes
//! - `post:drinks` - Create drinks
//! - `patch:drinks` - Update drinks
//! - `delete:drinks` - Delete drinks

use serde_json::Value;

use super::{AuthError, ClaimSet};

/// A permission a route requires, named at the type level so a guard can be
/// written as a handler argument.
pub trait RequiredPermission: Send + Sync + 'static {
    /// Exact permission string expected in the `permissions` claim.
    const NAME: &'static str;
}

/// `get:drinks-detail`
pub struct GetDrinksDetail;

impl RequiredPermission for GetDrinksDetail {
    const NAME: &'static str = "get:drinks-detail";
}

/// `post:drinks`
pub struct PostDrinks;

impl RequiredPermission for PostDrinks {
    const NAME: &'static str = "post:drinks";
}

/// `patch:drinks`
pub struct PatchDrinks;

impl RequiredPermission for PatchDrinks {
    const NAME: &'static str = "patch:drinks";
}

/// `delete:drinks`
pub struct DeleteDrinks;

impl RequiredPermission for DeleteDrinks {
    const NAME: &'static str = "delete:drinks";
}

/// Check that `claims` grant `permission`.
///
/// Membership is an exact, case-sensitive string match. A `permissions`
/// claim that is not a list of strings counts as not included.
pub fn check_permission(permission: &str, claims: &ClaimSet) -> Result<bool, AuthError> {
    let granted = match claims.get("permissions") {
        Some(Value::Array(granted)) => granted,
        _ => return Err(AuthError::PermissionsMissing),
    };

    if granted.iter().any(|p| p.as_str() == Some(permission)) {
        Ok(true)
    } else {
        Err(AuthError::PermissionNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims(value: serde_json::Value) -> ClaimSet {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn granted_permission_passes() {
        let claims = claims(json!({"permissions": ["get:drinks-detail"]}));
        assert_eq!(check_permission("get:drinks-detail", &claims), Ok(true));
    }

    #[test]
    fn other_permission_is_forbidden() {
        let claims = claims(json!({"permissions": ["post:drinks"]}));
        let err = check_permission("get:drinks-detail", &claims).unwrap_err();
        assert_eq!(err, AuthError::PermissionNotFound);
        assert_eq!(err.code(), "unauthorized");
        assert_eq!(err.status_code().as_u16(), 403);
    }

    #[test]
    fn missing_claim_is_invalid_claims() {
        let claims = claims(json!({"sub": "auth0|guest"}));
        let err = check_permission("post:drinks", &claims).unwrap_err();
        assert_eq!(err, AuthError::PermissionsMissing);
        assert_eq!(err.code(), "invalid_claims");
        assert_eq!(err.status_code().as_u16(), 400);
    }

    #[test]
    fn non_list_claim_is_invalid_claims() {
        let claims = claims(json!({"permissions": "post:drinks patch:drinks"}));
        assert_eq!(
            check_permission("post:drinks", &claims),
            Err(AuthError::PermissionsMissing)
        );
    }

    #[test]
    fn empty_list_is_forbidden() {
        let claims = claims(json!({"permissions": []}));
        assert_eq!(
            check_permission("post:drinks", &claims),
            Err(AuthError::PermissionNotFound)
        );
    }

    #[test]
    fn match_is_exact_and_case_sensitive() {
        let claims = claims(json!({"permissions": ["POST:drinks", "post:*", "post:drinks-all"]}));
        assert_eq!(
            check_permission("post:drinks", &claims),
            Err(AuthError::PermissionNotFound)
        );
    }

    #[test]
    fn marker_names() {
        assert_eq!(GetDrinksDetail::NAME, "get:drinks-detail");
        assert_eq!(PostDrinks::NAME, "post:drinks");
        assert_eq!(PatchDrinks::NAME, "patch:drinks");
        assert_eq!(DeleteDrinks::NAME, "delete:drinks");
    }
}
