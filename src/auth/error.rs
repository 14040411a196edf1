// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::{header::WWW_AUTHENTICATE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Why a presented credential was refused.
///
/// The variants are for logging and tests only. Every variant renders the
/// same opaque 401 response so callers cannot tell a bad signature from an
/// unknown user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Wrong segment count, bad base64url, or a payload that is not JSON
    MalformedToken,
    /// Signature does not validate, or the header algorithm is not the pinned one
    InvalidSignature,
    /// Expired, not yet valid, or issuer/audience mismatch
    InvalidClaims,
    /// Decoded fine but a required claim is absent or unusable
    MissingClaim(&'static str),
    /// `jti` is well formed but no identity matches it
    IdentityNotFound,
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: &'static str,
    error_code: &'static str,
}

impl AuthError {
    /// Get the internal error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MalformedToken => "malformed_token",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::InvalidClaims => "invalid_claims",
            AuthError::MissingClaim(_) => "missing_claim",
            AuthError::IdentityNotFound => "identity_not_found",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidSignature
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName
            | ErrorKind::InvalidKeyFormat => AuthError::InvalidSignature,
            ErrorKind::ExpiredSignature
            | ErrorKind::ImmatureSignature
            | ErrorKind::InvalidIssuer
            | ErrorKind::InvalidAudience => AuthError::InvalidClaims,
            ErrorKind::MissingRequiredClaim(name) => AuthError::MissingClaim(match name.as_str() {
                "iss" => "iss",
                "aud" => "aud",
                "exp" => "exp",
                "nbf" => "nbf",
                "sub" => "sub",
                _ => "required",
            }),
            _ => AuthError::MalformedToken,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MalformedToken => write!(f, "Token is malformed"),
            AuthError::InvalidSignature => write!(f, "Token signature is invalid"),
            AuthError::InvalidClaims => write!(f, "Token claims are not acceptable"),
            AuthError::MissingClaim(name) => write!(f, "Token is missing the `{name}` claim"),
            AuthError::IdentityNotFound => write!(f, "Token subject does not match any identity"),
        }
    }
}

impl std::error::Error for AuthError {}

/// The single externally visible rejection.
pub(crate) fn unauthorized_response() -> Response {
    let body = Json(AuthErrorBody {
        error: "Unauthorized",
        error_code: "unauthorized",
    });
    let mut response = (StatusCode::UNAUTHORIZED, body).into_response();
    response
        .headers_mut()
        .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    response
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::debug!(error_code = self.error_code(), "rejecting request");
        unauthorized_response()
    }
}
