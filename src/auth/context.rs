// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-identity-type signing configuration.
//!
//! One [`SigningContext`] exists per identity type. It is built once at
//! startup, validated eagerly, and shared by handle (`Arc`) with the issuer
//! and verifier. Nothing in it changes after construction.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Validation};
use serde_json::Value;

use super::claims::Claims;
use crate::error::ConfigError;

/// Algorithm used when none is configured.
pub const DEFAULT_ALGORITHM: &str = "HS256";

/// Clock skew tolerance for `exp` / `nbf` (60 seconds).
pub const DEFAULT_LEEWAY_SECS: u64 = 60;

/// Raw key material as supplied by configuration.
enum KeyMaterial {
    Hmac(Vec<u8>),
    Rsa { private_pem: Vec<u8>, public_pem: Vec<u8> },
}

impl KeyMaterial {
    fn kind(&self) -> &'static str {
        match self {
            KeyMaterial::Hmac(_) => "HMAC",
            KeyMaterial::Rsa { .. } => "RSA",
        }
    }
}

/// Secret, algorithm and header-claim template for one identity type.
#[derive(Clone)]
pub struct SigningContext {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    header_claims: Claims,
    issuer: Option<String>,
    audience: Option<String>,
    lifetime: Option<Duration>,
    leeway: u64,
}

impl SigningContext {
    /// Start a context signed with an HMAC secret (HS256 unless overridden).
    pub fn hmac(secret: impl Into<Vec<u8>>) -> SigningContextBuilder {
        SigningContextBuilder::new(KeyMaterial::Hmac(secret.into()))
    }

    /// Start a context signed with an RSA key pair in PEM form.
    ///
    /// The algorithm must be set to one of the RS* / PS* family.
    pub fn rsa_pem(
        private_pem: impl Into<Vec<u8>>,
        public_pem: impl Into<Vec<u8>>,
    ) -> SigningContextBuilder {
        SigningContextBuilder::new(KeyMaterial::Rsa {
            private_pem: private_pem.into(),
            public_pem: public_pem.into(),
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Claims every issued token starts from.
    pub fn header_claims(&self) -> &Claims {
        &self.header_claims
    }

    pub fn lifetime(&self) -> Option<Duration> {
        self.lifetime
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }

    /// Validation rules pinned to this context's algorithm.
    ///
    /// `exp` and `nbf` are checked only when present. A configured issuer or
    /// audience must be present in the token and match.
    pub(crate) fn validation(&self) -> Validation {
        let mut validation = Validation::new(self.algorithm);
        validation.required_spec_claims.clear();
        validation.validate_nbf = true;
        validation.leeway = self.leeway;

        if let Some(ref issuer) = self.issuer {
            validation.set_issuer(&[issuer]);
            validation.required_spec_claims.insert("iss".to_string());
        }

        if let Some(ref audience) = self.audience {
            validation.set_audience(&[audience]);
            validation.required_spec_claims.insert("aud".to_string());
        } else {
            validation.validate_aud = false;
        }

        validation
    }
}

impl fmt::Debug for SigningContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningContext")
            .field("algorithm", &self.algorithm)
            .field("header_claims", &self.header_claims)
            .field("lifetime", &self.lifetime)
            .field("leeway", &self.leeway)
            .finish_non_exhaustive()
    }
}

/// Builder for [`SigningContext`]; all validation happens in [`build`](Self::build).
pub struct SigningContextBuilder {
    key: KeyMaterial,
    algorithm: String,
    header_claims: Claims,
    issuer: Option<String>,
    audience: Option<String>,
    lifetime: Option<Duration>,
    leeway: u64,
}

impl SigningContextBuilder {
    fn new(key: KeyMaterial) -> Self {
        Self {
            key,
            algorithm: DEFAULT_ALGORITHM.to_string(),
            header_claims: Claims::new(),
            issuer: None,
            audience: None,
            lifetime: None,
            leeway: DEFAULT_LEEWAY_SECS,
        }
    }

    pub fn algorithm(mut self, name: impl Into<String>) -> Self {
        self.algorithm = name.into();
        self
    }

    /// Replace the header-claim template.
    pub fn header_claims(mut self, claims: Claims) -> Self {
        self.header_claims = claims;
        self
    }

    /// Add one entry to the header-claim template.
    pub fn header_claim(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.header_claims.insert(name.into(), value.into());
        self
    }

    /// Put `iss` in the template and require it on verification.
    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Put `aud` in the template and require it on verification.
    pub fn audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    /// Stamp `iat`, `nbf` and `exp` on issued tokens.
    pub fn lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = Some(lifetime);
        self
    }

    pub fn leeway(mut self, secs: u64) -> Self {
        self.leeway = secs;
        self
    }

    /// Validate the configuration and derive the signing keys.
    ///
    /// # Errors
    ///
    /// Fails on an empty secret, an unknown or unsupported algorithm, key
    /// material of the wrong family for the algorithm, or unparseable PEM.
    pub fn build(self) -> Result<SigningContext, ConfigError> {
        let algorithm = parse_algorithm(&self.algorithm)?;

        let (encoding_key, decoding_key) = match (&self.key, algorithm) {
            (KeyMaterial::Hmac(secret), Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) => {
                if secret.is_empty() {
                    return Err(ConfigError::EmptySecret);
                }
                (
                    EncodingKey::from_secret(secret),
                    DecodingKey::from_secret(secret),
                )
            }
            (
                KeyMaterial::Rsa {
                    private_pem,
                    public_pem,
                },
                Algorithm::RS256
                | Algorithm::RS384
                | Algorithm::RS512
                | Algorithm::PS256
                | Algorithm::PS384
                | Algorithm::PS512,
            ) => {
                let encoding = EncodingKey::from_rsa_pem(private_pem)
                    .map_err(|e| ConfigError::InvalidKey(format!("RSA private key: {e}")))?;
                let decoding = DecodingKey::from_rsa_pem(public_pem)
                    .map_err(|e| ConfigError::InvalidKey(format!("RSA public key: {e}")))?;
                (encoding, decoding)
            }
            (key, _) => {
                return Err(ConfigError::KeyTypeMismatch {
                    algorithm: self.algorithm.clone(),
                    key_kind: key.kind(),
                })
            }
        };

        let mut header_claims = self.header_claims;
        if let Some(ref issuer) = self.issuer {
            header_claims.insert("iss".to_string(), Value::from(issuer.as_str()));
        }
        if let Some(ref audience) = self.audience {
            header_claims.insert("aud".to_string(), Value::from(audience.as_str()));
        }

        Ok(SigningContext {
            algorithm,
            encoding_key,
            decoding_key,
            header_claims,
            issuer: self.issuer,
            audience: self.audience,
            lifetime: self.lifetime,
            leeway: self.leeway,
        })
    }
}

/// Parse an algorithm name, accepting only the HMAC and RSA families.
pub fn parse_algorithm(name: &str) -> Result<Algorithm, ConfigError> {
    let algorithm = Algorithm::from_str(name)
        .map_err(|_| ConfigError::UnsupportedAlgorithm(name.to_string()))?;

    match algorithm {
        Algorithm::HS256
        | Algorithm::HS384
        | Algorithm::HS512
        | Algorithm::RS256
        | Algorithm::RS384
        | Algorithm::RS512
        | Algorithm::PS256
        | Algorithm::PS384
        | Algorithm::PS512 => Ok(algorithm),
        _ => Err(ConfigError::UnsupportedAlgorithm(name.to_string())),
    }
}
