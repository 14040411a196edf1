// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token issuance.

use std::sync::Arc;

use super::claims::{Claims, ClaimsBuilder};
use super::codec::{self, Token};
use super::context::SigningContext;
use super::identity::Identity;

/// Signing failed.
///
/// Only reachable through misconfiguration; callers should treat it as fatal
/// rather than retry.
#[derive(Debug, thiserror::Error)]
#[error("failed to sign token: {0}")]
pub struct IssueError(#[from] jsonwebtoken::errors::Error);

/// Produces signed tokens for identities of one type.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    context: Arc<SigningContext>,
}

impl TokenIssuer {
    pub fn new(context: Arc<SigningContext>) -> Self {
        Self { context }
    }

    /// Sign a token whose `jti` names `identity`.
    ///
    /// `payload` entries are added unless the header-claim template already
    /// defines them; a caller-supplied `jti` is always discarded.
    ///
    /// # Errors
    ///
    /// Returns [`IssueError`] if the underlying signer fails.
    pub fn issue<I: Identity>(&self, identity: &I, payload: Option<Claims>) -> Result<Token, IssueError> {
        let claims = ClaimsBuilder::new(&self.context).build(identity, payload);
        let token = codec::sign(&claims, self.context.encoding_key(), self.context.algorithm())?;

        tracing::debug!(
            jti = %identity.stable_identifier(),
            algorithm = ?self.context.algorithm(),
            "issued token"
        );
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::identity::IdentityKey;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use serde_json::{json, Value};

    #[derive(Clone)]
    struct User(&'static str);

    impl Identity for User {
        fn primary_key(&self) -> IdentityKey {
            IdentityKey::from(self.0)
        }
    }

    fn decode_payload(token: &Token) -> Value {
        let payload = token.as_str().split('.').nth(1).unwrap();
        serde_json::from_slice(&URL_SAFE_NO_PAD.decode(payload).unwrap()).unwrap()
    }

    #[test]
    fn issued_token_carries_template_payload_and_jti() {
        let context = SigningContext::hmac("issuer-secret")
            .issuer("https://auth.example.com")
            .build()
            .unwrap();
        let issuer = TokenIssuer::new(Arc::new(context));

        let payload = match json!({"jti": "attacker-id", "scope": "read"}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let token = issuer.issue(&User("user_1"), Some(payload)).unwrap();

        assert_eq!(
            decode_payload(&token),
            json!({"iss": "https://auth.example.com", "scope": "read", "jti": "user_1"})
        );
    }

    #[test]
    fn rsa_context_signs_rs256() {
        let context = SigningContext::rsa_pem(
            include_str!("../../tests/fixtures/rsa_private.pem"),
            include_str!("../../tests/fixtures/rsa_public.pem"),
        )
        .algorithm("RS256")
        .build()
        .unwrap();
        let token = TokenIssuer::new(Arc::new(context)).issue(&User("u"), None).unwrap();

        let header = token.as_str().split('.').next().unwrap();
        let header: Value = serde_json::from_slice(&URL_SAFE_NO_PAD.decode(header).unwrap()).unwrap();
        assert_eq!(header["alg"], "RS256");
    }
}
