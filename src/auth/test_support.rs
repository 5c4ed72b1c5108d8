// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared fixtures for auth and API tests: RSA test keys, token minting and
//! an in-memory key set source.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use rand::rngs::OsRng;
use rsa::pkcs1::EncodeRsaPrivateKey;
use rsa::traits::PublicKeyParts;
use rsa::RsaPrivateKey;
use serde_json::{json, Value};

use super::jwks::{KeySetError, KeySetSource, SigningKey};
use super::{JwksManager, TokenVerifier};
use crate::config::AuthSettings;
use crate::state::AppState;
use crate::store::InMemoryStore;

pub const TEST_DOMAIN: &str = "drinks-test.auth.example.com";
pub const TEST_ISSUER: &str = "https://drinks-test.auth.example.com/";
pub const TEST_JWKS_URL: &str = "https://drinks-test.auth.example.com/.well-known/jwks.json";
pub const TEST_AUDIENCE: &str = "drinks";
pub const TEST_KID: &str = "test-key-1";

/// RSA key pair usable for both signing and publishing.
pub struct TestKey {
    encoding_key: EncodingKey,
    pub public: SigningKey,
}

impl TestKey {
    fn generate(kid: &str) -> Self {
        let private_key = RsaPrivateKey::new(&mut OsRng, 2048).unwrap();
        let public_key = private_key.to_public_key();

        let pem = private_key
            .to_pkcs1_pem(rsa::pkcs1::LineEnding::LF)
            .unwrap();
        let encoding_key = EncodingKey::from_rsa_pem(pem.as_bytes()).unwrap();

        Self {
            encoding_key,
            public: SigningKey {
                kty: "RSA".to_string(),
                kid: kid.to_string(),
                usage: "sig".to_string(),
                n: URL_SAFE_NO_PAD.encode(public_key.n().to_bytes_be()),
                e: URL_SAFE_NO_PAD.encode(public_key.e().to_bytes_be()),
            },
        }
    }
}

static TEST_KEY: LazyLock<TestKey> = LazyLock::new(|| TestKey::generate(TEST_KID));
static ROGUE_KEY: LazyLock<TestKey> = LazyLock::new(|| TestKey::generate("rogue-key"));

/// Key published in the test key set.
pub fn test_key() -> &'static TestKey {
    &TEST_KEY
}

/// Key unknown to the test key set.
pub fn rogue_key() -> &'static TestKey {
    &ROGUE_KEY
}

pub fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

/// Claims accepted by the test verifier, granting `permissions`.
pub fn valid_claims(permissions: &[&str]) -> Value {
    json!({
        "sub": "auth0|barista-1",
        "iss": TEST_ISSUER,
        "aud": TEST_AUDIENCE,
        "iat": now(),
        "exp": now() + 3600,
        "permissions": permissions,
    })
}

/// Sign `claims` as an RS256 JWT.
pub fn sign(key: &TestKey, kid: Option<&str>, claims: &Value) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = kid.map(str::to_string);
    encode(&header, claims, &key.encoding_key).unwrap()
}

/// Key set source serving a fixed (replaceable) list and counting fetches.
pub struct StaticKeySet {
    keys: Mutex<Option<Vec<SigningKey>>>,
    fetches: AtomicUsize,
    delay: Duration,
}

impl StaticKeySet {
    pub fn new(keys: Vec<SigningKey>) -> Self {
        Self {
            keys: Mutex::new(Some(keys)),
            fetches: AtomicUsize::new(0),
            delay: Duration::ZERO,
        }
    }

    /// A source whose endpoint always answers 502.
    pub fn failing() -> Self {
        Self {
            keys: Mutex::new(None),
            fetches: AtomicUsize::new(0),
            delay: Duration::ZERO,
        }
    }

    /// Make every fetch take `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn replace(&self, keys: Vec<SigningKey>) {
        *self.keys.lock().unwrap() = Some(keys);
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeySetSource for StaticKeySet {
    async fn fetch(&self, _jwks_url: &str) -> Result<Vec<SigningKey>, KeySetError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.keys
            .lock()
            .unwrap()
            .clone()
            .ok_or(KeySetError::Status(reqwest::StatusCode::BAD_GATEWAY))
    }
}

pub fn test_settings() -> AuthSettings {
    AuthSettings::for_domain(TEST_DOMAIN, TEST_AUDIENCE).unwrap()
}

/// Verifier trusting only [`test_key`].
pub fn test_verifier() -> TokenVerifier {
    let source = Arc::new(StaticKeySet::new(vec![test_key().public.clone()]));
    let jwks = Arc::new(JwksManager::with_source(TEST_JWKS_URL, source));
    TokenVerifier::new(jwks, &test_settings())
}

pub fn test_state() -> AppState {
    AppState::new(InMemoryStore::new(), test_verifier())
}

/// `Authorization` header value for a fresh token granting `permissions`.
pub fn bearer(permissions: &[&str]) -> String {
    let token = sign(test_key(), Some(TEST_KID), &valid_claims(permissions));
    format!("Bearer {token}")
}
