// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request-level authentication.
//!
//! The gate distinguishes three cases:
//!
//! - no credential header: anonymous, the request passes through untouched
//! - a header that verifies and resolves: the identity
//! - a header that does not: the failure handler rejects the request
//!
//! Every rejection looks the same from outside; the granular reason is only
//! logged.

use std::fmt;
use std::sync::Arc;

use axum::{
    http::{header::AUTHORIZATION, HeaderMap, HeaderName},
    response::Response,
};

use super::claims::VerifiedClaims;
use super::error::{unauthorized_response, AuthError};
use super::identity::IdentityResolver;
use super::verifier::TokenVerifier;

/// Literal scheme prefix removed from the header value.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Remove a leading `"Bearer "` (case-sensitive, one space).
///
/// Anything else is returned unchanged and left for the verifier to reject.
pub fn strip_bearer(header_value: &str) -> &str {
    header_value.strip_prefix(BEARER_PREFIX).unwrap_or(header_value)
}

/// Result of running the gate over one request.
#[derive(Debug, PartialEq)]
pub enum GateOutcome<I> {
    Authenticated(I),
    /// No credential was supplied.
    Anonymous,
    /// A credential was supplied and refused.
    Rejected(AuthError),
}

/// Turns an attempted-but-failed authentication into a transport rejection.
pub trait FailureHandler: Send + Sync + 'static {
    fn handle_failure(&self, response: &mut Response);
}

/// Default handler: opaque 401 with `WWW-Authenticate: Bearer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnauthorizedHandler;

impl FailureHandler for UnauthorizedHandler {
    fn handle_failure(&self, response: &mut Response) {
        *response = unauthorized_response();
    }
}

/// Extracts, verifies and resolves bearer credentials.
pub struct AuthenticationGate<R> {
    verifier: TokenVerifier,
    resolver: R,
    header_name: HeaderName,
    failure_handler: Arc<dyn FailureHandler>,
}

impl<R: IdentityResolver> AuthenticationGate<R> {
    pub fn new(verifier: TokenVerifier, resolver: R) -> Self {
        Self {
            verifier,
            resolver,
            header_name: AUTHORIZATION,
            failure_handler: Arc::new(UnauthorizedHandler),
        }
    }

    /// Read credentials from `header_name` instead of `Authorization`.
    pub fn with_header_name(mut self, header_name: HeaderName) -> Self {
        self.header_name = header_name;
        self
    }

    pub fn with_failure_handler(mut self, handler: impl FailureHandler) -> Self {
        self.failure_handler = Arc::new(handler);
        self
    }

    pub fn header_name(&self) -> &HeaderName {
        &self.header_name
    }

    /// Authenticate a request, invoking the failure handler on `response`
    /// when a credential was supplied but refused.
    ///
    /// Returns `None` both for anonymous and refused requests; only in the
    /// latter case has `response` been touched.
    pub fn authenticate(&self, headers: &HeaderMap, response: &mut Response) -> Option<R::Identity> {
        match self.outcome(headers) {
            GateOutcome::Authenticated(identity) => Some(identity),
            GateOutcome::Anonymous => None,
            GateOutcome::Rejected(_) => {
                self.reject(response);
                None
            }
        }
    }

    /// Classify a request by its credential header.
    pub fn outcome(&self, headers: &HeaderMap) -> GateOutcome<R::Identity> {
        let Some(value) = headers.get(&self.header_name) else {
            return GateOutcome::Anonymous;
        };

        match value.to_str() {
            Ok(value) => self.attempt(Some(value)),
            Err(_) => self.rejected(AuthError::MalformedToken),
        }
    }

    /// Classify a raw header value; `None` means the header was absent.
    pub fn attempt(&self, header_value: Option<&str>) -> GateOutcome<R::Identity> {
        let Some(header_value) = header_value else {
            return GateOutcome::Anonymous;
        };

        let result = self.verifier.verify(strip_bearer(header_value)).and_then(|claims| {
            self.resolver
                .resolve(claims.jti())
                .ok_or(AuthError::IdentityNotFound)
        });

        match result {
            Ok(identity) => GateOutcome::Authenticated(identity),
            Err(err) => self.rejected(err),
        }
    }

    /// Verified payload of a header value, without resolving the identity.
    ///
    /// # Errors
    ///
    /// Fails exactly when [`TokenVerifier::verify`] does.
    pub fn payload(&self, header_value: &str) -> Result<VerifiedClaims, AuthError> {
        self.verifier.verify(strip_bearer(header_value))
    }

    /// Apply the failure handler to `response`.
    pub fn reject(&self, response: &mut Response) {
        self.failure_handler.handle_failure(response);
    }

    fn rejected(&self, err: AuthError) -> GateOutcome<R::Identity> {
        tracing::info!(
            header = %self.header_name,
            error_code = err.error_code(),
            "authentication attempt rejected"
        );
        GateOutcome::Rejected(err)
    }
}

impl<R> fmt::Debug for AuthenticationGate<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticationGate")
            .field("verifier", &self.verifier)
            .field("header_name", &self.header_name)
            .finish_non_exhaustive()
    }
}
