// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token refresh.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::{Authenticated, Claims};
use crate::models::User;
use crate::state::AppState;

/// Request body for POST /v1/tokens
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct IssueTokenRequest {
    /// Extra claims; entries fixed by the server's template and `jti` are ignored
    #[serde(default)]
    #[schema(value_type = Object)]
    pub claims: Option<Claims>,
}

/// Response for POST /v1/tokens
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IssueTokenResponse {
    pub token: String,
    pub token_type: String,
}

/// Issue a fresh token for the authenticated user.
#[utoipa::path(
    post,
    path = "/v1/tokens",
    tag = "Tokens",
    security(("bearer" = [])),
    request_body = IssueTokenRequest,
    responses(
        (status = 200, description = "Signed token", body = IssueTokenResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn issue_token(
    State(state): State<AppState>,
    Authenticated(user): Authenticated<User>,
    Json(request): Json<IssueTokenRequest>,
) -> Result<Json<IssueTokenResponse>, StatusCode> {
    let token = state.issuer.issue(&user, request.claims).map_err(|e| {
        tracing::error!(error = %e, user_id = user.id, "token signing failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(IssueTokenResponse {
        token: token.into_string(),
        token_type: "Bearer".to_string(),
    }))
}
