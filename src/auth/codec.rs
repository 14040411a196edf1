// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Compact JWT signing and decoding.
//!
//! Thin wrapper over `jsonwebtoken`. Pure functions of their inputs.

use std::fmt;

use base64ct::{Base64UrlUnpadded, Encoding};
use jsonwebtoken::{
    decode, decode_header, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};

use super::claims::Claims;
use super::error::AuthError;

/// A signed compact JWT (`header.payload.signature`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Sign `claims` with a `{"alg": <algorithm>, "typ": "JWT"}` header.
pub fn sign(
    claims: &Claims,
    key: &EncodingKey,
    algorithm: Algorithm,
) -> Result<Token, jsonwebtoken::errors::Error> {
    encode(&Header::new(algorithm), claims, key).map(Token)
}

/// Decode `token` and check its signature and time claims.
///
/// The structure is checked before the signature, so a token that is both
/// malformed and unsigned reports as malformed. The header algorithm must be
/// one of `validation.algorithms`.
pub fn verify(token: &str, key: &DecodingKey, validation: &Validation) -> Result<Claims, AuthError> {
    check_structure(token)?;
    let data = decode::<Claims>(token, key, validation)?;
    Ok(data.claims)
}

/// Exactly three segments, a parseable header, and a JSON object payload.
fn check_structure(token: &str) -> Result<(), AuthError> {
    let mut segments = token.split('.');
    let (Some(_), Some(payload), Some(_), None) =
        (segments.next(), segments.next(), segments.next(), segments.next())
    else {
        return Err(AuthError::MalformedToken);
    };

    decode_header(token).map_err(|_| AuthError::MalformedToken)?;

    let payload =
        Base64UrlUnpadded::decode_vec(payload).map_err(|_| AuthError::MalformedToken)?;
    serde_json::from_slice::<Claims>(&payload).map_err(|_| AuthError::MalformedToken)?;

    Ok(())
}
