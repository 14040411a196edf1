// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for identities set by the authentication middleware.
//!
//! ```rust,ignore
//! async fn me(Authenticated(user): Authenticated<User>) -> impl IntoResponse {
//!     // user was resolved from the bearer token's `jti`
//! }
//! ```

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};

use super::error::unauthorized_response;
use super::identity::Identity;

/// Requires an identity; anonymous requests get the opaque 401.
pub struct Authenticated<I>(pub I);

/// Rejection for [`Authenticated`] on an anonymous request.
#[derive(Debug)]
pub struct MissingIdentity;

impl IntoResponse for MissingIdentity {
    fn into_response(self) -> Response {
        unauthorized_response()
    }
}

impl<I: Identity, S: Send + Sync> FromRequestParts<S> for Authenticated<I> {
    type Rejection = MissingIdentity;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<I>()
            .cloned()
            .map(Authenticated)
            .ok_or(MissingIdentity)
    }
}

/// Optional identity for endpoints that also serve anonymous callers.
pub struct MaybeAuthenticated<I>(pub Option<I>);

impl<I: Identity, S: Send + Sync> FromRequestParts<S> for MaybeAuthenticated<I> {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuthenticated(parts.extensions.get::<I>().cloned()))
    }
}
