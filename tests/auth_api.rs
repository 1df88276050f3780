mod common;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use rstest::rstest;
use serde_json::json;

use bizconnect::auth::TokenKind;
use common::{bearer, call, harness, register, test_app, DownMailer, StubImageHost, PASSWORD};

#[actix_web::test]
async fn register_returns_token_and_rejects_duplicate_email() {
    let h = harness().await;
    let app = test::init_service(test_app(h.state.clone())).await;

    let req = || {
        TestRequest::post().uri("/api/v1/auth/register").set_json(json!({
            "name": "Nimal Perera",
            "email": "Nimal@Example.com",
            "password": PASSWORD
        }))
    };

    let (status, body) = call(&app, req()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["user"]["email"], "nimal@example.com");
    assert_eq!(body["user"]["userType"], "user");
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));

    let (status, body) = call(&app, req()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "User with this email already exists");
}

#[actix_web::test]
async fn register_reports_shape_errors_per_field() {
    let h = harness().await;
    let app = test::init_service(test_app(h.state.clone())).await;

    let (status, body) = call(
        &app,
        TestRequest::post().uri("/api/v1/auth/register").set_json(json!({
            "name": "",
            "email": "not-an-email",
            "password": PASSWORD,
            "userType": "admin"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation failed");
    let fields: Vec<_> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, ["name", "email", "userType"]);
}

#[rstest]
#[case("Sh0rt!", "Password must be at least 8 characters long")]
#[case("lowercase!only", "Password must contain at least one uppercase letter")]
#[case("NoSpecialChars1", "Password must contain at least one special character")]
#[actix_web::test]
async fn weak_passwords_are_rejected_with_their_rule(#[case] password: &str, #[case] message: &str) {
    let h = harness().await;
    let app = test::init_service(test_app(h.state.clone())).await;

    let (status, body) = call(
        &app,
        TestRequest::post().uri("/api/v1/auth/register").set_json(json!({
            "name": "Weak",
            "email": "weak@example.com",
            "password": password
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], message);
}

#[actix_web::test]
async fn login_and_me() {
    let h = harness().await;
    let app = test::init_service(test_app(h.state.clone())).await;
    register(&app, "Kamala", "kamala@example.com", "business").await;

    let (status, body) = call(
        &app,
        TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({ "email": "kamala@example.com", "password": "Wrong!Pass1" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password");

    let (status, body) = call(
        &app,
        TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({ "email": "nobody@example.com", "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password");

    let (status, body) = call(
        &app,
        TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({ "email": "kamala@example.com", "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["userType"], "business");
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = call(
        &app,
        TestRequest::get().uri("/api/v1/auth/me").insert_header(bearer(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["name"], "Kamala");
    assert_eq!(body["user"]["isVerified"], false);
    assert!(body["user"].get("password").is_none());
}

#[actix_web::test]
async fn protected_routes_explain_missing_and_bad_tokens() {
    let h = harness().await;
    let app = test::init_service(test_app(h.state.clone())).await;

    let (status, body) = call(&app, TestRequest::get().uri("/api/v1/auth/me")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Not authorized to access this route. Please login.");

    let (status, body) = call(
        &app,
        TestRequest::get().uri("/api/v1/auth/me").insert_header(bearer("garbage")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid or expired token");
}

#[actix_web::test]
async fn token_for_deleted_user_is_not_found() {
    let h = harness().await;
    let app = test::init_service(test_app(h.state.clone())).await;
    let (token, id) = register(&app, "Gone", "gone@example.com", "user").await;

    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(&id)
        .execute(&h.state.pool)
        .await
        .unwrap();

    let (status, body) = call(
        &app,
        TestRequest::get().uri("/api/v1/auth/me").insert_header(bearer(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");
}

#[actix_web::test]
async fn forgot_password_mails_a_link_and_reset_consumes_it() {
    let h = harness().await;
    let app = test::init_service(test_app(h.state.clone())).await;
    register(&app, "Ruwan", "ruwan@example.com", "user").await;

    let (status, body) = call(
        &app,
        TestRequest::post()
            .uri("/api/v1/auth/forgot-password")
            .set_json(json!({ "email": "unknown@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No account found with this email");

    let (status, body) = call(
        &app,
        TestRequest::post()
            .uri("/api/v1/auth/forgot-password")
            .set_json(json!({ "email": "ruwan@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Password reset link has been sent to your email");
    assert!(body.get("resetToken").is_none());

    let token = {
        let sent = h.mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "ruwan@example.com");
        let marker = "https://bizconnect.test/reset-password?token=";
        let start = sent[0].text.find(marker).unwrap() + marker.len();
        sent[0].text[start..].split_whitespace().next().unwrap().to_string()
    };

    let reset = |token: &str, password: &str| {
        TestRequest::post()
            .uri("/api/v1/auth/reset-password")
            .set_json(json!({ "resetToken": token, "newPassword": password }))
    };

    let (status, body) = call(&app, reset(&token, "weak")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Password must be at least 8 characters long");

    let (status, body) = call(&app, reset(&token, "Brand!New99")).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Password has been reset successfully");

    let (status, body) = call(&app, reset(&token, "Another!New1")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid or expired reset token");

    let (status, _) = call(
        &app,
        TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({ "email": "ruwan@example.com", "password": "Brand!New99" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn mail_outage_echoes_the_reset_token() {
    let state = common::state_with(
        common::test_config(&[]),
        Arc::new(DownMailer),
        Arc::new(StubImageHost::default()),
    )
    .await;
    let app = test::init_service(test_app(state)).await;
    register(&app, "Sunil", "sunil@example.com", "user").await;

    let (status, body) = call(
        &app,
        TestRequest::post()
            .uri("/api/v1/auth/forgot-password")
            .set_json(json!({ "email": "sunil@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        "Password reset token generated. Email service temporarily unavailable."
    );
    assert!(body["resetToken"].as_str().is_some());
}

#[actix_web::test]
async fn mail_outage_hides_the_token_when_fallback_is_off() {
    let state = common::state_with(
        common::test_config(&[("RESET_TOKEN_FALLBACK", "false")]),
        Arc::new(DownMailer),
        Arc::new(StubImageHost::default()),
    )
    .await;
    let app = test::init_service(test_app(state)).await;
    register(&app, "Sunil", "sunil@example.com", "user").await;

    let (status, body) = call(
        &app,
        TestRequest::post()
            .uri("/api/v1/auth/forgot-password")
            .set_json(json!({ "email": "sunil@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("resetToken").is_none());
}

#[actix_web::test]
async fn reset_rejects_expired_mismatched_and_access_tokens() {
    let state = common::state_with(
        common::test_config(&[]),
        Arc::new(DownMailer),
        Arc::new(StubImageHost::default()),
    )
    .await;
    let app = test::init_service(test_app(state.clone())).await;
    let (access_token, user_id) = register(&app, "Priya", "priya@example.com", "user").await;

    let forgot = || {
        TestRequest::post()
            .uri("/api/v1/auth/forgot-password")
            .set_json(json!({ "email": "priya@example.com" }))
    };
    let reset = |token: &str| {
        TestRequest::post()
            .uri("/api/v1/auth/reset-password")
            .set_json(json!({ "resetToken": token, "newPassword": "Fresh!Pass1" }))
    };

    // an access token is never a reset token
    let (status, _) = call(&app, reset(&access_token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = call(&app, forgot()).await;
    let first = body["resetToken"].as_str().unwrap().to_string();
    let (_, body) = call(&app, forgot()).await;
    let second = body["resetToken"].as_str().unwrap().to_string();
    assert_ne!(first, second);

    // only the latest stored token matches
    let (status, body) = call(&app, reset(&first)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid or expired reset token");

    sqlx::query("UPDATE users SET reset_password_expires = ? WHERE id = ?")
        .bind("2000-01-01T00:00:00.000000Z")
        .bind(&user_id)
        .execute(&state.pool)
        .await
        .unwrap();
    let (status, body) = call(&app, reset(&second)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid or expired reset token");

    // a reset token is never a bearer token
    let (_, body) = call(&app, forgot()).await;
    let third = body["resetToken"].as_str().unwrap().to_string();
    assert!(state.tokens.verify(&third, TokenKind::Reset).is_ok());
    let (status, _) = call(
        &app,
        TestRequest::get().uri("/api/v1/auth/me").insert_header(bearer(&third)),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = call(
        &app,
        TestRequest::post()
            .uri("/api/v1/auth/reset-password")
            .set_json(json!({ "resetToken": "", "newPassword": "Fresh!Pass1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "resetToken");
}

#[actix_web::test]
async fn malformed_json_is_a_uniform_bad_request() {
    let h = harness().await;
    let app = test::init_service(test_app(h.state.clone())).await;

    let (status, body) = call(
        &app,
        TestRequest::post()
            .uri("/api/v1/auth/login")
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{not json"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn health_reports_ok() {
    let h = harness().await;
    let app = test::init_service(test_app(h.state.clone())).await;

    let (status, body) = call(&app, TestRequest::get().uri("/api/v1/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["status"], "OK");
    assert!(body["timestamp"].is_string());
}
