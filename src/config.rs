// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, defaults, and the loader that turns them into
//! a [`SigningContext`]. Configuration is read once at startup; any error
//! here aborts the process.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_SECRET` | HMAC signing secret | Required for HS* |
//! | `JWT_ALGORITHM` | Signing algorithm | `HS256` |
//! | `JWT_PRIVATE_KEY_PATH` | RSA private key (PEM) | Required for RS*/PS* |
//! | `JWT_PUBLIC_KEY_PATH` | RSA public key (PEM) | Required for RS*/PS* |
//! | `JWT_ISSUER` | `iss` claim, required and checked on verify | Unset |
//! | `JWT_AUDIENCE` | `aud` claim, required and checked on verify | Unset |
//! | `JWT_TTL_SECS` | Token lifetime; stamps `iat`/`nbf`/`exp` | Unset |
//! | `JWT_LEEWAY_SECS` | Clock skew tolerance | `60` |
//! | `AUTH_HEADER` | Header carrying the bearer token | `Authorization` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `SEED_USERS` | Comma list of `id:name` to preload; a live bearer token for each is printed to stdout at startup (development only) | Unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::path::{Path, PathBuf};
use std::time::Duration;

use axum::http::{header::AUTHORIZATION, HeaderName};
use jsonwebtoken::Algorithm;

use crate::auth::context::{parse_algorithm, DEFAULT_ALGORITHM, DEFAULT_LEEWAY_SECS};
use crate::auth::SigningContext;
use crate::error::ConfigError;
use crate::models::User;

pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const JWT_ALGORITHM_ENV: &str = "JWT_ALGORITHM";
pub const JWT_PRIVATE_KEY_PATH_ENV: &str = "JWT_PRIVATE_KEY_PATH";
pub const JWT_PUBLIC_KEY_PATH_ENV: &str = "JWT_PUBLIC_KEY_PATH";
pub const JWT_ISSUER_ENV: &str = "JWT_ISSUER";
pub const JWT_AUDIENCE_ENV: &str = "JWT_AUDIENCE";
pub const JWT_TTL_SECS_ENV: &str = "JWT_TTL_SECS";
pub const JWT_LEEWAY_SECS_ENV: &str = "JWT_LEEWAY_SECS";
pub const AUTH_HEADER_ENV: &str = "AUTH_HEADER";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const SEED_USERS_ENV: &str = "SEED_USERS";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Signing settings for one identity type, before validation.
#[derive(Debug, Clone, Default)]
pub struct SigningConfig {
    pub algorithm: Option<String>,
    pub secret: Option<String>,
    pub private_key_path: Option<PathBuf>,
    pub public_key_path: Option<PathBuf>,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub ttl: Option<Duration>,
    pub leeway: Option<u64>,
}

impl SigningConfig {
    /// Read signing settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read signing settings through `lookup`; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Ok(Self {
            algorithm: get(JWT_ALGORITHM_ENV),
            secret: lookup(JWT_SECRET_ENV),
            private_key_path: get(JWT_PRIVATE_KEY_PATH_ENV).map(PathBuf::from),
            public_key_path: get(JWT_PUBLIC_KEY_PATH_ENV).map(PathBuf::from),
            issuer: get(JWT_ISSUER_ENV),
            audience: get(JWT_AUDIENCE_ENV),
            ttl: get(JWT_TTL_SECS_ENV)
                .map(|v| parse_u64(JWT_TTL_SECS_ENV, &v))
                .transpose()?
                .map(Duration::from_secs),
            leeway: get(JWT_LEEWAY_SECS_ENV)
                .map(|v| parse_u64(JWT_LEEWAY_SECS_ENV, &v))
                .transpose()?,
        })
    }

    /// Validate the settings and build the signing context.
    ///
    /// # Errors
    ///
    /// Missing or empty key material, unreadable key files, and anything
    /// [`SigningContextBuilder::build`](crate::auth::SigningContextBuilder::build)
    /// rejects.
    pub fn build_context(&self) -> Result<SigningContext, ConfigError> {
        let algorithm = self.algorithm.as_deref().unwrap_or(DEFAULT_ALGORITHM);

        let mut builder = if matches!(
            parse_algorithm(algorithm)?,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            let secret = self
                .secret
                .as_ref()
                .ok_or(ConfigError::MissingVar(JWT_SECRET_ENV))?;
            SigningContext::hmac(secret.as_bytes())
        } else {
            let private_path = self
                .private_key_path
                .as_ref()
                .ok_or(ConfigError::MissingVar(JWT_PRIVATE_KEY_PATH_ENV))?;
            let public_path = self
                .public_key_path
                .as_ref()
                .ok_or(ConfigError::MissingVar(JWT_PUBLIC_KEY_PATH_ENV))?;
            SigningContext::rsa_pem(read_key(private_path)?, read_key(public_path)?)
        };

        builder = builder
            .algorithm(algorithm)
            .leeway(self.leeway.unwrap_or(DEFAULT_LEEWAY_SECS));
        if let Some(ref issuer) = self.issuer {
            builder = builder.issuer(issuer);
        }
        if let Some(ref audience) = self.audience {
            builder = builder.audience(audience);
        }
        if let Some(ttl) = self.ttl {
            builder = builder.lifetime(ttl);
        }

        builder.build()
    }
}

/// Header the gate reads credentials from.
pub fn auth_header_from_lookup(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<HeaderName, ConfigError> {
    match lookup(AUTH_HEADER_ENV).filter(|v| !v.trim().is_empty()) {
        Some(name) => HeaderName::try_from(name.trim()).map_err(|e| ConfigError::InvalidVar {
            name: AUTH_HEADER_ENV,
            reason: e.to_string(),
        }),
        None => Ok(AUTHORIZATION),
    }
}

/// Parse `SEED_USERS` (`1:alice,2:bob`).
pub fn parse_seed_users(raw: &str) -> Result<Vec<User>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (id, name) = entry.split_once(':').ok_or_else(|| ConfigError::InvalidVar {
                name: SEED_USERS_ENV,
                reason: format!("expected id:name, got {entry:?}"),
            })?;
            let id = id.trim().parse().map_err(|_| ConfigError::InvalidVar {
                name: SEED_USERS_ENV,
                reason: format!("user id {id:?} is not an integer"),
            })?;
            Ok(User::new(id, name.trim()))
        })
        .collect()
}

fn parse_u64(name: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidVar {
        name,
        reason: format!("{value:?} is not a non-negative integer"),
    })
}

fn read_key(path: &Path) -> Result<Vec<u8>, ConfigError> {
    std::fs::read(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })
}
