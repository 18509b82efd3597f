mod common;

use axum::http::{StatusCode, header};
use common::{body_json, spawn_app};
use serde_json::json;
use studio_cms::auth::{TokenKind, UserRole};

#[tokio::test]
async fn login_issues_two_distinct_tokens() {
    let app = spawn_app();
    app.repo
        .seed_user("owner@studio.test", "correct-horse", UserRole::Admin);

    let response = app
        .post_json(
            "/auth/login",
            json!({ "email": "owner@studio.test", "password": "correct-horse" }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["token_type"], "bearer");

    let access = body["access_token"].as_str().unwrap();
    let refresh = body["refresh_token"].as_str().unwrap();
    assert!(!access.is_empty());
    assert!(!refresh.is_empty());
    assert_ne!(access, refresh);

    // The two tokens carry their respective kinds.
    let access_claims = app.codec.decode(access, true).unwrap();
    let refresh_claims = app.codec.decode(refresh, true).unwrap();
    assert_eq!(access_claims.kind, TokenKind::Access);
    assert_eq!(refresh_claims.kind, TokenKind::Refresh);
}

#[tokio::test]
async fn wrong_password_and_unknown_email_fail_identically() {
    let app = spawn_app();
    app.repo
        .seed_user("owner@studio.test", "correct-horse", UserRole::Admin);

    let wrong_password = app
        .post_json(
            "/auth/login",
            json!({ "email": "owner@studio.test", "password": "battery-staple" }),
        )
        .await;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    let wrong_password = body_json(wrong_password).await;

    let unknown_email = app
        .post_json(
            "/auth/login",
            json!({ "email": "nobody@studio.test", "password": "battery-staple" }),
        )
        .await;
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
    let unknown_email = body_json(unknown_email).await;

    // Same kind and same detail: account existence does not leak.
    assert_eq!(wrong_password, unknown_email);
    assert_eq!(wrong_password["error"], "authentication_failure");
    assert!(wrong_password.get("access_token").is_none());
}

#[tokio::test]
async fn refresh_exchanges_refresh_token_for_access_token() {
    let app = spawn_app();
    let admin = app
        .repo
        .seed_user("owner@studio.test", "pw", UserRole::Admin);
    let refresh_token = app
        .codec
        .issue(admin.id, &admin.email, admin.role, TokenKind::Refresh)
        .unwrap();

    let response = app.post_bearer("/auth/refresh", &refresh_token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let access = body["access_token"].as_str().unwrap();
    let claims = app.codec.decode(access, true).unwrap();
    assert_eq!(claims.kind, TokenKind::Access);
    assert_eq!(claims.sub, admin.id);
    assert_eq!(claims.role, UserRole::Admin);
}

#[tokio::test]
async fn refresh_rejects_access_tokens() {
    let app = spawn_app();
    let access_token = app.admin_token();

    let response = app.post_bearer("/auth/refresh", &access_token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["detail"], "Not a refresh token");
}

#[tokio::test]
async fn access_gate_rejects_refresh_tokens() {
    let app = spawn_app();
    let admin = app
        .repo
        .seed_user("owner@studio.test", "pw", UserRole::Admin);
    let refresh_token = app
        .codec
        .issue(admin.id, &admin.email, admin.role, TokenKind::Refresh)
        .unwrap();

    // A refresh token is not a valid credential for a mutating endpoint.
    let response = app
        .send_form("POST", "/portfolios", &refresh_token, &[], &[])
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn missing_and_malformed_credentials_are_rejected_with_challenge() {
    let app = spawn_app();

    // No Authorization header at all.
    let response = app
        .dispatch(
            axum::http::Request::builder()
                .method("POST")
                .uri("/portfolios")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "Bearer"
    );

    // A garbage token fails decode, same status.
    let response = app
        .send_form("POST", "/portfolios", "not.a.token", &[], &[])
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
