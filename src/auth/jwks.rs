// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWKS (JSON Web Key Set) fetching and caching.
//!
//! ## Refresh policy
//!
//! - The key set is process-wide and cached as an immutable snapshot
//! - A snapshot older than the cache TTL is refetched before use
//! - An unknown `kid` triggers a refetch (key rotation), at most once per
//!   minimum refresh interval
//! - Fetch failures are never served from a stale snapshot; the lookup
//!   simply finds no key
//! - After a failed fetch, no new fetch starts until the minimum refresh
//!   interval has passed
//! - Lookups that queue behind an in-flight fetch share its outcome instead
//!   of fetching again
//!
//! Readers only hold the lock long enough to clone an `Arc`, and fetches run
//! outside it, so a refresh never stalls requests with a valid snapshot.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::DecodingKey;
use serde::Deserialize;
use tokio::sync::{Mutex, RwLock};

/// Default JWKS cache TTL (5 minutes).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Default minimum interval between refreshes caused by unknown key IDs.
pub const DEFAULT_MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Default timeout for the outbound JWKS request.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors raised while fetching or parsing the key set.
#[derive(Debug, thiserror::Error)]
pub enum KeySetError {
    #[error("JWKS request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {0} from JWKS endpoint")]
    Status(reqwest::StatusCode),

    #[error("Malformed JWKS document: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("JWKS fetch failed recently, not retrying yet")]
    Throttled,
}

/// RSA public key descriptor taken from the issuer's key set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningKey {
    pub kty: String,
    pub kid: String,
    pub usage: String,
    /// Base64url modulus
    pub n: String,
    /// Base64url exponent
    pub e: String,
}

impl SigningKey {
    /// Build the verification key from the RSA components.
    pub fn decoding_key(&self) -> Result<DecodingKey, jsonwebtoken::errors::Error> {
        DecodingKey::from_rsa_components(&self.n, &self.e)
    }
}

#[derive(Deserialize)]
struct KeySetDocument {
    keys: Vec<KeyDescriptor>,
}

/// One entry of the `keys` array. Every field is optional so that a single
/// foreign key (EC, symmetric) does not invalidate the whole document.
#[derive(Deserialize)]
struct KeyDescriptor {
    kid: Option<String>,
    kty: Option<String>,
    #[serde(rename = "use")]
    usage: Option<String>,
    n: Option<String>,
    e: Option<String>,
}

impl KeyDescriptor {
    fn into_signing_key(self) -> Option<SigningKey> {
        if self.kty.as_deref() != Some("RSA") {
            return None;
        }
        Some(SigningKey {
            kty: self.kty?,
            kid: self.kid?,
            usage: self.usage?,
            n: self.n?,
            e: self.e?,
        })
    }
}

/// Parse a JWKS document, keeping the complete RSA descriptors in order.
pub fn parse_key_set(document: &[u8]) -> Result<Vec<SigningKey>, KeySetError> {
    let document: KeySetDocument = serde_json::from_slice(document)?;
    Ok(document
        .keys
        .into_iter()
        .filter_map(KeyDescriptor::into_signing_key)
        .collect())
}

/// Where the key set comes from.
#[async_trait]
pub trait KeySetSource: Send + Sync {
    async fn fetch(&self, jwks_url: &str) -> Result<Vec<SigningKey>, KeySetError>;
}

/// Fetches the key set over HTTPS.
pub struct HttpKeySetSource {
    client: reqwest::Client,
}

impl HttpKeySetSource {
    /// Create a source whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, KeySetError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl KeySetSource for HttpKeySetSource {
    async fn fetch(&self, jwks_url: &str) -> Result<Vec<SigningKey>, KeySetError> {
        let response = self.client.get(jwks_url).send().await?;

        if !response.status().is_success() {
            return Err(KeySetError::Status(response.status()));
        }

        let body = response.bytes().await?;
        parse_key_set(&body)
    }
}

/// Immutable cached key set.
struct Snapshot {
    keys: Vec<SigningKey>,
    fetched_at: Instant,
}

impl Snapshot {
    fn find(&self, kid: &str) -> Option<&SigningKey> {
        self.keys.iter().find(|key| key.kid == kid)
    }
}

/// Outcome of the most recent fetch.
#[derive(Clone, Copy)]
struct FetchAttempt {
    finished_at: Instant,
    failed: bool,
}

/// JWKS manager with caching.
///
/// Resolves key IDs to RSA public keys for JWT verification.
pub struct JwksManager {
    /// JWKS URL (`https://<domain>/.well-known/jwks.json`)
    jwks_url: String,
    /// Cache TTL
    cache_ttl: Duration,
    /// Minimum age of a snapshot before an unknown `kid` may refetch it
    min_refresh_interval: Duration,
    /// Current snapshot
    snapshot: RwLock<Option<Arc<Snapshot>>>,
    /// Serializes refreshes and records the last attempt, so concurrent
    /// misses trigger one fetch and failures are not retried in a loop
    last_attempt: Mutex<Option<FetchAttempt>>,
    source: Arc<dyn KeySetSource>,
}

impl JwksManager {
    /// Create a JWKS manager fetching over HTTPS.
    pub fn new(jwks_url: impl Into<String>, timeout: Duration) -> Result<Self, KeySetError> {
        let source = HttpKeySetSource::new(timeout)?;
        Ok(Self::with_source(jwks_url, Arc::new(source)))
    }

    /// Create a JWKS manager backed by a custom source.
    pub fn with_source(jwks_url: impl Into<String>, source: Arc<dyn KeySetSource>) -> Self {
        Self {
            jwks_url: jwks_url.into(),
            cache_ttl: DEFAULT_CACHE_TTL,
            min_refresh_interval: DEFAULT_MIN_REFRESH_INTERVAL,
            snapshot: RwLock::new(None),
            last_attempt: Mutex::new(None),
            source,
        }
    }

    /// Create with custom cache TTL. A zero TTL fetches on every lookup.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_min_refresh_interval(mut self, interval: Duration) -> Self {
        self.min_refresh_interval = interval;
        self
    }

    /// Get the JWKS URL.
    pub fn jwks_url(&self) -> &str {
        &self.jwks_url
    }

    /// Resolve a key ID to its signing key.
    ///
    /// Returns `None` when no descriptor matches, the document is malformed,
    /// or the endpoint cannot be reached.
    pub async fn resolve(&self, kid: &str) -> Option<SigningKey> {
        let requested_at = Instant::now();
        let current = self.current().await;

        if let Some(snapshot) = &current {
            let age = snapshot.fetched_at.elapsed();
            if age < self.cache_ttl {
                if let Some(key) = snapshot.find(kid) {
                    return Some(key.clone());
                }
                if age < self.min_refresh_interval {
                    tracing::debug!(kid, "Unknown key ID, JWKS refreshed too recently to refetch");
                    return None;
                }
            }
        }

        match self.refresh_since(requested_at).await {
            Ok(snapshot) => {
                let key = snapshot.find(kid).cloned();
                if key.is_none() {
                    tracing::debug!(kid, "No matching key in JWKS");
                }
                key
            }
            Err(KeySetError::Throttled) => {
                tracing::debug!(kid, "JWKS unavailable, skipping fetch");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, url = %self.jwks_url, "Failed to fetch JWKS");
                None
            }
        }
    }

    /// Refresh the JWKS cache now.
    ///
    /// Subject to the same limits as lookups: joins a fetch already in
    /// flight, and fails with [`KeySetError::Throttled`] while a recent
    /// failure is cooling down.
    pub async fn refresh(&self) -> Result<(), KeySetError> {
        self.refresh_since(Instant::now()).await.map(|_| ())
    }

    /// Check if JWKS is currently cached and valid.
    pub async fn is_cached(&self) -> bool {
        self.current()
            .await
            .is_some_and(|snapshot| snapshot.fetched_at.elapsed() < self.cache_ttl)
    }

    async fn current(&self) -> Option<Arc<Snapshot>> {
        self.snapshot.read().await.clone()
    }

    /// Fetch on behalf of a lookup made at `requested_at`.
    ///
    /// A fetch that finished after `requested_at` already answers the
    /// lookup, whether it succeeded or not.
    async fn refresh_since(&self, requested_at: Instant) -> Result<Arc<Snapshot>, KeySetError> {
        let mut last_attempt = self.last_attempt.lock().await;

        if let Some(attempt) = *last_attempt {
            if attempt.finished_at > requested_at {
                if attempt.failed {
                    return Err(KeySetError::Throttled);
                }
                if let Some(snapshot) = self.current().await {
                    return Ok(snapshot);
                }
            }
            if attempt.failed && attempt.finished_at.elapsed() < self.min_refresh_interval {
                return Err(KeySetError::Throttled);
            }
        }

        let result = self.fetch_and_swap().await;
        *last_attempt = Some(FetchAttempt {
            finished_at: Instant::now(),
            failed: result.is_err(),
        });
        result
    }

    async fn fetch_and_swap(&self) -> Result<Arc<Snapshot>, KeySetError> {
        let keys = self.source.fetch(&self.jwks_url).await?;
        tracing::info!(url = %self.jwks_url, keys = keys.len(), "Fetched JWKS");

        let snapshot = Arc::new(Snapshot {
            keys,
            fetched_at: Instant::now(),
        });
        *self.snapshot.write().await = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }
}
