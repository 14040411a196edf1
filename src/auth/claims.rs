// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Claim sets: building outgoing claims and reading verified ones.

use serde_json::{Map, Value};

use super::context::SigningContext;
use super::identity::{Identity, IdentityKey};

/// Ordered claim name → value mapping.
pub type Claims = Map<String, Value>;

/// The claim that names the identity.
pub const JTI: &str = "jti";

/// Assembles the claim set for an issuance.
///
/// Order of precedence, lowest first: caller payload, time claims, header
/// template, `jti`. The template is never overridden by the caller, and
/// `jti` always comes from the identity.
pub struct ClaimsBuilder<'a> {
    context: &'a SigningContext,
}

impl<'a> ClaimsBuilder<'a> {
    pub fn new(context: &'a SigningContext) -> Self {
        Self { context }
    }

    /// Build claims stamped with the current time.
    pub fn build<I: Identity>(&self, identity: &I, payload: Option<Claims>) -> Claims {
        self.build_at(identity, payload, chrono::Utc::now().timestamp())
    }

    /// Build claims as of `now` (epoch seconds).
    pub fn build_at<I: Identity>(&self, identity: &I, payload: Option<Claims>, now: i64) -> Claims {
        let mut claims = self.context.header_claims().clone();

        for (name, value) in payload.into_iter().flatten() {
            if !claims.contains_key(&name) {
                claims.insert(name, value);
            }
        }

        if let Some(lifetime) = self.context.lifetime() {
            let exp = now.saturating_add(i64::try_from(lifetime.as_secs()).unwrap_or(i64::MAX));
            for (name, value) in [("iat", now), ("nbf", now), ("exp", exp)] {
                if !self.context.header_claims().contains_key(name) {
                    claims.insert(name.to_string(), Value::from(value));
                }
            }
        }

        claims.insert(JTI.to_string(), identity.stable_identifier().to_claim());
        claims
    }
}

/// Claims that passed verification, with the subject already extracted.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedClaims {
    jti: IdentityKey,
    claims: Claims,
}

impl VerifiedClaims {
    pub(crate) fn new(jti: IdentityKey, claims: Claims) -> Self {
        Self { jti, claims }
    }

    /// The identity lookup key.
    pub fn jti(&self) -> &IdentityKey {
        &self.jti
    }

    /// A single payload entry.
    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.claims.get(name)
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    pub fn into_claims(self) -> Claims {
        self.claims
    }
}
