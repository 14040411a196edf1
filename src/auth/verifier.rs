// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token verification.
//!
//! A token moves through structural parsing, signature checking and claim
//! validation. Failing any stage rejects it outright; there is no partial
//! result. Nothing is cached, so every call re-verifies from scratch.

use std::sync::Arc;

use super::claims::{VerifiedClaims, JTI};
use super::codec;
use super::context::SigningContext;
use super::error::AuthError;
use super::identity::IdentityKey;

/// Verifies tokens for identities of one type.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    context: Arc<SigningContext>,
}

impl TokenVerifier {
    pub fn new(context: Arc<SigningContext>) -> Self {
        Self { context }
    }

    /// Decode and validate `token`.
    ///
    /// The header algorithm must equal the context's algorithm exactly.
    ///
    /// # Errors
    ///
    /// Returns the [`AuthError`] for the first stage that failed. Callers
    /// outside this crate should not surface the distinction.
    pub fn verify(&self, token: &str) -> Result<VerifiedClaims, AuthError> {
        let result = self.verify_inner(token);
        if let Err(ref err) = result {
            tracing::debug!(error_code = err.error_code(), "token verification failed");
        }
        result
    }

    fn verify_inner(&self, token: &str) -> Result<VerifiedClaims, AuthError> {
        let claims = codec::verify(token, self.context.decoding_key(), &self.context.validation())?;

        let jti = claims
            .get(JTI)
            .and_then(IdentityKey::from_claim)
            .ok_or(AuthError::MissingClaim(JTI))?;

        Ok(VerifiedClaims::new(jti, claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::Claims;
    use crate::auth::issuer::TokenIssuer;
    use crate::auth::identity::Identity;
    use jsonwebtoken::{Algorithm, EncodingKey};
    use serde_json::{json, Value};
    use std::time::Duration;

    const SECRET: &str = "verifier-secret";

    #[derive(Clone)]
    struct User(i64);

    impl Identity for User {
        fn primary_key(&self) -> IdentityKey {
            IdentityKey::Int(self.0)
        }
    }

    fn object(value: Value) -> Claims {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn context(secret: &str) -> Arc<SigningContext> {
        Arc::new(SigningContext::hmac(secret).build().unwrap())
    }

    fn raw_token(claims: Value, algorithm: Algorithm, secret: &str) -> String {
        codec::sign(&object(claims), &EncodingKey::from_secret(secret.as_bytes()), algorithm)
            .unwrap()
            .into_string()
    }

    #[test]
    fn accepts_issued_token() {
        let context = context(SECRET);
        let token = TokenIssuer::new(context.clone())
            .issue(&User(12), Some(object(json!({"scope": "read"}))))
            .unwrap();

        let verified = TokenVerifier::new(context).verify(token.as_str()).unwrap();
        assert_eq!(verified.jti(), &IdentityKey::Int(12));
        assert_eq!(verified.claim("scope"), Some(&json!("read")));
    }

    #[test]
    fn verification_is_idempotent() {
        let context = context(SECRET);
        let token = TokenIssuer::new(context.clone()).issue(&User(1), None).unwrap();
        let verifier = TokenVerifier::new(context);

        let first = verifier.verify(token.as_str()).unwrap();
        let second = verifier.verify(token.as_str()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn algorithm_is_pinned_exactly() {
        // Same secret, valid HS512 signature, but the verifier expects HS256.
        let token = raw_token(json!({"jti": 1}), Algorithm::HS512, SECRET);
        let result = TokenVerifier::new(context(SECRET)).verify(&token);
        assert_eq!(result, Err(AuthError::InvalidSignature));
    }

    #[test]
    fn rotated_secret_rejects_old_tokens() {
        let token = TokenIssuer::new(context("old-secret")).issue(&User(1), None).unwrap();
        let verifier = TokenVerifier::new(context("new-secret"));

        for _ in 0..2 {
            assert_eq!(verifier.verify(token.as_str()), Err(AuthError::InvalidSignature));
        }
    }

    #[test]
    fn missing_or_unusable_jti_is_rejected() {
        let verifier = TokenVerifier::new(context(SECRET));

        for claims in [
            json!({"iss": "test"}),
            json!({"jti": null}),
            json!({"jti": true}),
            json!({"jti": {"id": 1}}),
        ] {
            let token = raw_token(claims, Algorithm::HS256, SECRET);
            assert_eq!(verifier.verify(&token), Err(AuthError::MissingClaim(JTI)));
        }
    }

    #[test]
    fn malformed_input_is_rejected() {
        let verifier = TokenVerifier::new(context(SECRET));
        for token in ["", "garbage", "abc.def.ghi"] {
            assert_eq!(verifier.verify(token), Err(AuthError::MalformedToken), "{token:?}");
        }
    }

    #[test]
    fn expired_and_premature_tokens_are_rejected() {
        let now = chrono::Utc::now().timestamp();
        let verifier = TokenVerifier::new(context(SECRET));

        let expired = raw_token(json!({"jti": 1, "exp": now - 3600}), Algorithm::HS256, SECRET);
        assert_eq!(verifier.verify(&expired), Err(AuthError::InvalidClaims));

        let premature = raw_token(json!({"jti": 1, "nbf": now + 3600}), Algorithm::HS256, SECRET);
        assert_eq!(verifier.verify(&premature), Err(AuthError::InvalidClaims));

        let within_leeway = raw_token(json!({"jti": 1, "exp": now - 5}), Algorithm::HS256, SECRET);
        assert!(verifier.verify(&within_leeway).is_ok());
    }

    #[test]
    fn lifetime_tokens_verify_until_expiry() {
        let context = Arc::new(
            SigningContext::hmac(SECRET)
                .lifetime(Duration::from_secs(300))
                .build()
                .unwrap(),
        );
        let token = TokenIssuer::new(context.clone()).issue(&User(4), None).unwrap();

        let verified = TokenVerifier::new(context).verify(token.as_str()).unwrap();
        assert!(verified.claim("exp").is_some());
    }

    #[test]
    fn configured_issuer_and_audience_are_enforced() {
        let strict = Arc::new(
            SigningContext::hmac(SECRET)
                .issuer("https://auth.example.com")
                .audience("wallet")
                .build()
                .unwrap(),
        );
        let verifier = TokenVerifier::new(strict.clone());

        let good = TokenIssuer::new(strict).issue(&User(1), None).unwrap();
        assert!(verifier.verify(good.as_str()).is_ok());

        let wrong_issuer = raw_token(
            json!({"iss": "https://evil.example.com", "aud": "wallet", "jti": 1}),
            Algorithm::HS256,
            SECRET,
        );
        assert_eq!(verifier.verify(&wrong_issuer), Err(AuthError::InvalidClaims));

        let wrong_audience = raw_token(
            json!({"iss": "https://auth.example.com", "aud": "other", "jti": 1}),
            Algorithm::HS256,
            SECRET,
        );
        assert_eq!(verifier.verify(&wrong_audience), Err(AuthError::InvalidClaims));
    }

    #[test]
    fn configured_issuer_and_audience_must_be_present() {
        let strict = Arc::new(
            SigningContext::hmac(SECRET)
                .issuer("https://auth.example.com")
                .audience("wallet")
                .build()
                .unwrap(),
        );
        let verifier = TokenVerifier::new(strict);

        let bare = raw_token(json!({"jti": 1}), Algorithm::HS256, SECRET);
        assert!(matches!(verifier.verify(&bare), Err(AuthError::MissingClaim(_))));

        let no_issuer = raw_token(json!({"aud": "wallet", "jti": 1}), Algorithm::HS256, SECRET);
        assert_eq!(verifier.verify(&no_issuer), Err(AuthError::MissingClaim("iss")));

        let no_audience = raw_token(
            json!({"iss": "https://auth.example.com", "jti": 1}),
            Algorithm::HS256,
            SECRET,
        );
        assert_eq!(verifier.verify(&no_audience), Err(AuthError::MissingClaim("aud")));
    }

    #[test]
    fn unconfigured_audience_is_not_checked() {
        let token = raw_token(json!({"aud": "anything", "jti": 1}), Algorithm::HS256, SECRET);
        assert!(TokenVerifier::new(context(SECRET)).verify(&token).is_ok());
    }
}
