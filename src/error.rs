// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Setup-time errors.
//!
//! These are raised while building a [`SigningContext`](crate::auth::SigningContext)
//! or reading the environment. They are never produced while serving a
//! request; the binary aborts on them.

/// Invalid or incomplete signing configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("signing secret must not be empty")]
    EmptySecret,

    #[error("unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("invalid key material: {0}")]
    InvalidKey(String),

    #[error("algorithm {algorithm} cannot be used with {key_kind} key material")]
    KeyTypeMismatch {
        algorithm: String,
        key_kind: &'static str,
    },

    #[error("environment variable {0} is required")]
    MissingVar(&'static str),

    #[error("environment variable {name} is invalid: {reason}")]
    InvalidVar { name: &'static str, reason: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
