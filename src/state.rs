// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use axum::http::HeaderName;

use crate::auth::{AuthenticationGate, SigningContext, StoreResolver, TokenIssuer, TokenVerifier};
use crate::store::InMemoryStore;

/// Resolver used for [`User`](crate::models::User) tokens.
pub type UserResolver = StoreResolver<Arc<InMemoryStore>>;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<InMemoryStore>,
    pub issuer: TokenIssuer,
    pub gate: Arc<AuthenticationGate<UserResolver>>,
}

impl AppState {
    /// Wire issuer, verifier and gate around one signing context.
    pub fn new(store: Arc<InMemoryStore>, context: SigningContext, header_name: HeaderName) -> Self {
        let context = Arc::new(context);
        let gate = AuthenticationGate::new(
            TokenVerifier::new(context.clone()),
            StoreResolver::new(store.clone()),
        )
        .with_header_name(header_name);

        Self {
            store,
            issuer: TokenIssuer::new(context),
            gate: Arc::new(gate),
        }
    }
}
