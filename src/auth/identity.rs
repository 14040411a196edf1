// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity capability and subject resolution.
//!
//! The core never owns identities. An embedding application implements
//! [`Identity`] for its user type and [`IdentityStore`] for its persistence
//! layer; [`StoreResolver`] connects the two. Applications whose `jti` is not
//! the raw primary key (composite keys, external ids) implement
//! [`IdentityResolver`] directly.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque lookup key carried in the `jti` claim.
///
/// Serialized as a bare JSON string or integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdentityKey {
    Int(i64),
    Str(String),
}

impl IdentityKey {
    /// Read a key from a decoded claim value.
    ///
    /// Only strings and integers are keys; anything else yields `None`.
    pub fn from_claim(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(IdentityKey::Str(s.clone())),
            Value::Number(n) => n.as_i64().map(IdentityKey::Int),
            _ => None,
        }
    }

    /// Encode the key as a claim value.
    pub fn to_claim(&self) -> Value {
        match self {
            IdentityKey::Int(id) => Value::from(*id),
            IdentityKey::Str(id) => Value::from(id.as_str()),
        }
    }
}

impl From<i64> for IdentityKey {
    fn from(id: i64) -> Self {
        IdentityKey::Int(id)
    }
}

impl From<&str> for IdentityKey {
    fn from(id: &str) -> Self {
        IdentityKey::Str(id.to_string())
    }
}

impl From<String> for IdentityKey {
    fn from(id: String) -> Self {
        IdentityKey::Str(id)
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityKey::Int(id) => write!(f, "{id}"),
            IdentityKey::Str(id) => f.write_str(id),
        }
    }
}

/// A persisted identity that can be named in a token.
pub trait Identity: Clone + Send + Sync + 'static {
    /// Primary key of the persisted record.
    fn primary_key(&self) -> IdentityKey;

    /// Key written into `jti` at issuance.
    ///
    /// Defaults to the primary key. Override together with the resolver so
    /// that whatever is written here can be looked up again.
    fn stable_identifier(&self) -> IdentityKey {
        self.primary_key()
    }
}

/// Keyed, read-only lookup into the persistence layer.
///
/// Implementations provide their own concurrency safety.
pub trait IdentityStore: Send + Sync + 'static {
    type Identity: Identity;

    fn find_one(&self, key: &IdentityKey) -> Option<Self::Identity>;
}

/// Maps a verified `jti` to an identity.
///
/// A miss is a value, not an error; the gate decides what a miss means.
pub trait IdentityResolver: Send + Sync + 'static {
    type Identity: Identity;

    fn resolve(&self, key: &IdentityKey) -> Option<Self::Identity>;
}

/// Resolves `jti` by primary key against an [`IdentityStore`].
#[derive(Debug, Clone)]
pub struct StoreResolver<S> {
    store: S,
}

impl<S: IdentityStore> StoreResolver<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: IdentityStore> IdentityResolver for StoreResolver<S> {
    type Identity = S::Identity;

    fn resolve(&self, key: &IdentityKey) -> Option<Self::Identity> {
        let identity = self.store.find_one(key);
        if identity.is_none() {
            tracing::debug!(jti = %key, "no identity for token subject");
        }
        identity
    }
}

impl<S: IdentityStore> IdentityStore for std::sync::Arc<S> {
    type Identity = S::Identity;

    fn find_one(&self, key: &IdentityKey) -> Option<Self::Identity> {
        (**self).find_one(key)
    }
}
