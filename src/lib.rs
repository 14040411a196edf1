// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer Identity - JWT issuance and request authentication
//!
//! Issues signed JWTs naming a persisted identity in `jti`, and authenticates
//! `Authorization: Bearer <token>` requests back to that identity.
//!
//! ## Modules
//!
//! - `auth` - Signing context, issuer, verifier, identity resolution, request gate
//! - `api` - HTTP API handlers (Axum)
//! - `config` - Environment configuration
//! - `store` - In-memory user store

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod store;
