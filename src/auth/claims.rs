// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Decoded JWT claim set.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Claims of a verified token, kept exactly as signed.
///
/// The identity provider is free to add custom claims, so the payload is held
/// as a JSON object rather than a fixed struct. Standard claims (`aud`, `iss`,
/// `exp`) are validated by the verifier before a `ClaimSet` is ever built.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimSet(Map<String, Value>);

impl ClaimSet {
    /// Look up a claim by name.
    pub fn get(&self, claim: &str) -> Option<&Value> {
        self.0.get(claim)
    }

    /// Subject (`sub`), used for logging.
    pub fn subject(&self) -> Option<&str> {
        self.get("sub").and_then(Value::as_str)
    }
}
