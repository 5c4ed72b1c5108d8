// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `AUTH0_DOMAIN` | Identity provider domain (JWKS URL and expected issuer) | Required |
//! | `API_AUDIENCE` | Expected JWT audience claim | Required |
//! | `AUTH_ALGORITHMS` | Comma-separated accepted signing algorithms | `RS256` |
//! | `JWKS_CACHE_TTL_SECS` | JWKS cache TTL | `300` |
//! | `JWKS_MIN_REFRESH_SECS` | Minimum interval between refreshes on unknown `kid` | `30` |
//! | `JWKS_FETCH_TIMEOUT_SECS` | Timeout for the JWKS request | `5` |
//! | `JWT_LEEWAY_SECS` | Clock skew tolerance for `exp` | `0` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `SEED_DRINKS` | Insert a sample drink at startup | `false` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;
use std::time::Duration;

use jsonwebtoken::Algorithm;
use url::Url;

use crate::auth::jwks::{DEFAULT_CACHE_TTL, DEFAULT_FETCH_TIMEOUT, DEFAULT_MIN_REFRESH_INTERVAL};

pub const AUTH0_DOMAIN_ENV: &str = "AUTH0_DOMAIN";
pub const API_AUDIENCE_ENV: &str = "API_AUDIENCE";
pub const AUTH_ALGORITHMS_ENV: &str = "AUTH_ALGORITHMS";
pub const JWKS_CACHE_TTL_ENV: &str = "JWKS_CACHE_TTL_SECS";
pub const JWKS_MIN_REFRESH_ENV: &str = "JWKS_MIN_REFRESH_SECS";
pub const JWKS_FETCH_TIMEOUT_ENV: &str = "JWKS_FETCH_TIMEOUT_SECS";
pub const JWT_LEEWAY_ENV: &str = "JWT_LEEWAY_SECS";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const SEED_DRINKS_ENV: &str = "SEED_DRINKS";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Default `RUST_LOG` filter.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Configuration errors. Any of these aborts startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

/// Token verification settings.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// Identity provider domain, e.g. `tenant.us.auth0.com`
    pub domain: String,
    /// `https://<domain>/.well-known/jwks.json`
    pub jwks_url: String,
    /// Expected `iss`: `https://<domain>/`
    pub issuer: String,
    /// Expected `aud`
    pub audience: String,
    /// Accepted signing algorithms (RSA family, never empty)
    pub algorithms: Vec<Algorithm>,
    pub cache_ttl: Duration,
    pub min_refresh_interval: Duration,
    pub fetch_timeout: Duration,
    pub leeway: Duration,
}

impl AuthSettings {
    /// Settings for `domain` and `audience` with default algorithm and timings.
    pub fn for_domain(domain: &str, audience: &str) -> Result<Self, ConfigError> {
        let domain = domain.trim().trim_end_matches('/');
        let issuer = Url::parse(&format!("https://{domain}/"))
            .ok()
            .filter(|url| url.host_str().is_some() && url.path() == "/")
            .ok_or_else(|| ConfigError::Invalid {
                name: AUTH0_DOMAIN_ENV,
                reason: format!("'{domain}' is not a bare host name"),
            })?;
        let jwks_url = issuer
            .join(".well-known/jwks.json")
            .map_err(|e| ConfigError::Invalid {
                name: AUTH0_DOMAIN_ENV,
                reason: e.to_string(),
            })?;

        if audience.is_empty() {
            return Err(ConfigError::Missing(API_AUDIENCE_ENV));
        }

        Ok(Self {
            domain: domain.to_string(),
            jwks_url: jwks_url.to_string(),
            issuer: issuer.to_string(),
            audience: audience.to_string(),
            algorithms: vec![Algorithm::RS256],
            cache_ttl: DEFAULT_CACHE_TTL,
            min_refresh_interval: DEFAULT_MIN_REFRESH_INTERVAL,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            leeway: Duration::ZERO,
        })
    }
}

/// Full application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub auth: AuthSettings,
    pub bind_addr: SocketAddr,
    pub seed_drinks: bool,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, which maps variable names to
    /// values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &'static str| lookup(name).filter(|value| !value.trim().is_empty());

        let domain = get(AUTH0_DOMAIN_ENV).ok_or(ConfigError::Missing(AUTH0_DOMAIN_ENV))?;
        let audience = get(API_AUDIENCE_ENV).ok_or(ConfigError::Missing(API_AUDIENCE_ENV))?;
        let mut auth = AuthSettings::for_domain(&domain, &audience)?;

        if let Some(raw) = get(AUTH_ALGORITHMS_ENV) {
            auth.algorithms = parse_algorithms(&raw)?;
        }
        if let Some(raw) = get(JWKS_CACHE_TTL_ENV) {
            auth.cache_ttl = parse_secs(JWKS_CACHE_TTL_ENV, &raw)?;
        }
        if let Some(raw) = get(JWKS_MIN_REFRESH_ENV) {
            auth.min_refresh_interval = parse_secs(JWKS_MIN_REFRESH_ENV, &raw)?;
        }
        if let Some(raw) = get(JWKS_FETCH_TIMEOUT_ENV) {
            auth.fetch_timeout = parse_secs(JWKS_FETCH_TIMEOUT_ENV, &raw)?;
            if auth.fetch_timeout.is_zero() {
                return Err(invalid(JWKS_FETCH_TIMEOUT_ENV, "must be at least 1 second"));
            }
        }
        if let Some(raw) = get(JWT_LEEWAY_ENV) {
            auth.leeway = parse_secs(JWT_LEEWAY_ENV, &raw)?;
        }

        let host = get(HOST_ENV).unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = match get(PORT_ENV) {
            Some(raw) => raw.trim().parse().map_err(|_| invalid(PORT_ENV, &raw))?,
            None => 8080,
        };
        let bind_addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .map_err(|_| invalid(HOST_ENV, &host))?;

        let seed_drinks = match get(SEED_DRINKS_ENV) {
            Some(raw) => parse_bool(SEED_DRINKS_ENV, &raw)?,
            None => false,
        };

        let log_format = match get(LOG_FORMAT_ENV).as_deref().map(str::trim) {
            None => LogFormat::default(),
            Some(raw) if raw.eq_ignore_ascii_case("json") => LogFormat::Json,
            Some(raw) if raw.eq_ignore_ascii_case("pretty") => LogFormat::Pretty,
            Some(raw) => return Err(invalid(LOG_FORMAT_ENV, raw)),
        };

        Ok(Self {
            auth,
            bind_addr,
            seed_drinks,
            log_format,
        })
    }
}

fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        name,
        reason: reason.into(),
    }
}

/// Parse the accepted algorithm list. Only RSA signatures can be checked
/// against the JWKS, so anything else is a configuration error.
fn parse_algorithms(raw: &str) -> Result<Vec<Algorithm>, ConfigError> {
    let mut algorithms = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|name| !name.is_empty()) {
        let algorithm = match name {
            "RS256" => Algorithm::RS256,
            "RS384" => Algorithm::RS384,
            "RS512" => Algorithm::RS512,
            other => {
                return Err(invalid(
                    AUTH_ALGORITHMS_ENV,
                    format!("unsupported algorithm '{other}'"),
                ))
            }
        };
        if !algorithms.contains(&algorithm) {
            algorithms.push(algorithm);
        }
    }

    if algorithms.is_empty() {
        return Err(invalid(AUTH_ALGORITHMS_ENV, "no algorithms listed"));
    }
    Ok(algorithms)
}

fn parse_secs(name: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| invalid(name, format!("'{raw}' is not a number of seconds")))
}

fn parse_bool(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(invalid(name, raw)),
    }
}
