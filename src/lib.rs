// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Drinks Server - Permission-Gated Drinks Catalog API
//!
//! A small CRUD API over a drinks catalog. Reads of the short catalog are
//! public; everything else requires a bearer JWT from the configured identity
//! provider carrying the route's permission.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - JWKS key resolution, token verification, permission checks
//! - `config` - Environment configuration
//! - `store` - In-memory drinks store

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod store;
