// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! JWT issuance and bearer authentication against an identity store.
//!
//! ## Issuance
//!
//! identity → [`ClaimsBuilder`] (header-claim template, caller payload,
//! `jti` = stable identifier) → [`TokenIssuer`] → signed compact token.
//!
//! ## Authentication
//!
//! 1. Client sends `Authorization: Bearer <token>`
//! 2. [`AuthenticationGate`] strips the `Bearer ` prefix
//! 3. [`TokenVerifier`] checks structure, signature (algorithm pinned),
//!    `exp`/`nbf`, and the presence of `jti`
//! 4. [`IdentityResolver`] maps `jti` to a stored identity
//!
//! ## Security
//!
//! - `jti` is always written by the issuer, never taken from the caller
//! - The verifier accepts exactly one algorithm per identity type
//! - All refusals produce the same 401; the reason is only logged
//! - Nothing is cached; every request re-verifies and re-resolves

pub mod claims;
pub mod codec;
pub mod context;
pub mod error;
pub mod extractor;
pub mod gate;
pub mod identity;
pub mod issuer;
pub mod middleware;
pub mod verifier;

pub use claims::{Claims, ClaimsBuilder, VerifiedClaims};
pub use codec::Token;
pub use context::{SigningContext, SigningContextBuilder};
pub use error::AuthError;
pub use extractor::{Authenticated, MaybeAuthenticated};
pub use gate::{AuthenticationGate, FailureHandler, GateOutcome, UnauthorizedHandler};
pub use identity::{Identity, IdentityKey, IdentityResolver, IdentityStore, StoreResolver};
pub use issuer::{IssueError, TokenIssuer};
pub use middleware::authenticate_request;
pub use verifier::TokenVerifier;
