// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::{
    auth::authenticate_request,
    state::{AppState, UserResolver},
};

pub mod health;
pub mod tokens;
pub mod users;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/users/me", get(users::get_current_user))
        .route("/tokens", post(tokens::issue_token))
        .layer(middleware::from_fn_with_state(
            state.gate.clone(),
            authenticate_request::<UserResolver>,
        ))
        .with_state(state);

    Router::new()
        .route("/health", get(health::health))
        .route("/api-doc/openapi.json", get(openapi_json))
        .nest("/v1", v1_routes)
        .layer(TraceLayer::new_for_http())
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        users::get_current_user,
        tokens::issue_token
    ),
    components(
        schemas(
            health::HealthResponse,
            users::UserMeResponse,
            tokens::IssueTokenRequest,
            tokens::IssueTokenResponse
        )
    ),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Users", description = "Authenticated user"),
        (name = "Tokens", description = "Token issuance")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header::AUTHORIZATION, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::auth::{SigningContext, TokenIssuer, TokenVerifier};
    use crate::models::User;
    use crate::store::InMemoryStore;

    fn context() -> SigningContext {
        SigningContext::hmac("router-test-secret")
            .issuer("https://auth.example.com")
            .build()
            .unwrap()
    }

    fn test_state() -> AppState {
        let store = Arc::new(InMemoryStore::new());
        store.insert_user(User::new(1, "alice"));
        AppState::new(store, context(), AUTHORIZATION)
    }

    fn token_for(state: &AppState, user: &User) -> String {
        state.issuer.issue(user, None).unwrap().into_string()
    }

    async fn send(state: &AppState, request: Request<Body>) -> Response {
        router(state.clone()).oneshot(request).await.unwrap()
    }

    fn get_request(uri: &str, authorization: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_needs_no_auth() {
        let state = test_state();
        let response = send(&state, get_request("/health", None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn me_returns_token_subject() {
        let state = test_state();
        let token = token_for(&state, &User::new(1, "alice"));

        let response = send(&state, get_request("/v1/users/me", Some(&format!("Bearer {token}")))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({"user_id": 1, "name": "alice"}));
    }

    #[tokio::test]
    async fn anonymous_request_reaches_handler_and_is_refused_there() {
        let state = test_state();
        let response = send(&state, get_request("/v1/users/me", None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn every_refusal_looks_the_same() {
        let state = test_state();
        let unknown = token_for(&state, &User::new(99, "ghost"));
        let foreign = TokenIssuer::new(Arc::new(SigningContext::hmac("other").build().unwrap()))
            .issue(&User::new(1, "alice"), None)
            .unwrap();

        let mut bodies = Vec::new();
        for value in [
            "Bearer garbage".to_string(),
            format!("Bearer {unknown}"),
            format!("Bearer {foreign}"),
        ] {
            let response = send(&state, get_request("/v1/users/me", Some(&value))).await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{value}");
            assert_eq!(response.headers()["www-authenticate"], "Bearer");
            bodies.push(json_body(response).await);
        }

        assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
        assert_eq!(bodies[0]["error_code"], "unauthorized");
    }

    #[tokio::test]
    async fn removed_user_is_refused_on_next_request() {
        let state = test_state();
        let token = token_for(&state, &User::new(1, "alice"));
        let header = format!("Bearer {token}");

        let response = send(&state, get_request("/v1/users/me", Some(&header))).await;
        assert_eq!(response.status(), StatusCode::OK);

        state.store.remove_user(1);
        let response = send(&state, get_request("/v1/users/me", Some(&header))).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn refreshed_token_keeps_server_controlled_claims() {
        let state = test_state();
        let token = token_for(&state, &User::new(1, "alice"));

        let request = Request::builder()
            .method("POST")
            .uri("/v1/tokens")
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .header("content-type", "application/json")
            .body(Body::from(
                json!({"claims": {"jti": "attacker-id", "iss": "evil", "role": "reader"}})
                    .to_string(),
            ))
            .unwrap();

        let response = send(&state, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["token_type"], "Bearer");

        let verified = TokenVerifier::new(Arc::new(context()))
            .verify(body["token"].as_str().unwrap())
            .unwrap();
        assert_eq!(verified.claim("jti"), Some(&json!(1)));
        assert_eq!(verified.claim("iss"), Some(&json!("https://auth.example.com")));
        assert_eq!(verified.claim("role"), Some(&json!("reader")));
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let state = test_state();
        let response = send(&state, get_request("/api-doc/openapi.json", None)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let doc = json_body(response).await;
        assert!(doc["paths"]["/v1/users/me"].is_object());
        assert!(doc["paths"]["/v1/tokens"].is_object());
    }
}
