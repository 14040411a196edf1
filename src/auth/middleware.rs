// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum middleware running the [`AuthenticationGate`] on every request.
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/v1/users/me", get(me))
//!     .layer(axum::middleware::from_fn_with_state(
//!         gate.clone(),
//!         authenticate_request::<UserResolver>,
//!     ));
//! ```
//!
//! An authenticated identity is stored in the request extensions, where the
//! [`Authenticated`](super::Authenticated) extractor picks it up.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use super::gate::{AuthenticationGate, GateOutcome};
use super::identity::IdentityResolver;

/// Authenticate the request, then pass it on or reject it.
///
/// - identity: inserted into extensions, request continues
/// - no credential header: request continues anonymously
/// - refused credential: the gate's failure handler builds the response and
///   the inner service is never called
pub async fn authenticate_request<R: IdentityResolver>(
    State(gate): State<Arc<AuthenticationGate<R>>>,
    mut request: Request,
    next: Next,
) -> Response {
    match gate.outcome(request.headers()) {
        GateOutcome::Authenticated(identity) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        GateOutcome::Anonymous => next.run(request).await,
        GateOutcome::Rejected(_) => {
            let mut response = Response::default();
            gate.reject(&mut response);
            response
        }
    }
}
