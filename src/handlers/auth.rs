use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde_json::json;

use crate::auth::{password, AuthUser, TokenKind};
use crate::db::is_unique_violation;
use crate::error::{AppError, FieldError};
use crate::models::user::is_valid_email;
use crate::models::{
    ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest, User,
};
use crate::services::{mailer, notifications};
use crate::state::AppState;

const DUPLICATE_EMAIL: &str = "User with this email already exists";
const BAD_RESET_TOKEN: &str = "Invalid or expired reset token";

/// Validate, hash and store a new account. Shared by registration and the
/// account administration endpoint.
pub(crate) async fn create_account(state: &AppState, req: &RegisterRequest) -> Result<User, AppError> {
    let user_type = req.validate().map_err(AppError::Validation)?;

    if User::email_taken(&state.pool, &req.email).await? {
        return Err(AppError::bad_request(DUPLICATE_EMAIL));
    }
    password::ensure_strong(&req.password)?;

    let hashed = password::hash(&req.password, state.config.bcrypt_cost).await?;
    let user = User::new(&req.name, &req.email, hashed, user_type);
    match user.insert(&state.pool).await {
        Ok(()) => Ok(user),
        // lost a race with a concurrent registration
        Err(err) if is_unique_violation(&err) => Err(AppError::bad_request(DUPLICATE_EMAIL)),
        Err(err) => Err(err.into()),
    }
}

fn access_token(state: &AppState, user: &User) -> Result<String, AppError> {
    state
        .tokens
        .issue(&user.id, TokenKind::Access, Utc::now(), state.config.token_ttl)
        .map_err(|err| AppError::internal("Server error", err))
}

pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let user = create_account(&state, &body).await?;
    let token = access_token(&state, &user)?;

    notifications::notify_quietly(&state.pool, notifications::welcome(&user)).await;
    tracing::info!(user_id = %user.id, user_type = %user.user_type, "user registered");

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "User registered successfully",
        "token": token,
        "user": user.public()
    })))
}

pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let req = body.into_inner();
    AppError::check(req.validate())?;

    let invalid = || AppError::unauthorized("Invalid email or password");
    let user = User::find_by_email(&state.pool, &req.email)
        .await?
        .ok_or_else(invalid)?;
    if !password::verify(&req.password, &user.password).await? {
        tracing::debug!(user_id = %user.id, "login rejected: wrong password");
        return Err(invalid());
    }

    let token = access_token(&state, &user)?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Login successful",
        "token": token,
        "user": user.public()
    })))
}

pub async fn me(caller: AuthUser) -> Result<HttpResponse, AppError> {
    let user = caller.into_inner();
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "user": {
            "id": user.id,
            "name": user.name,
            "email": user.email,
            "userType": user.user_type,
            "isVerified": user.is_verified,
            "createdAt": user.created_at
        }
    })))
}

pub async fn forgot_password(
    state: web::Data<AppState>,
    body: web::Json<ForgotPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    let req = body.into_inner();
    if !is_valid_email(&req.email) {
        return Err(AppError::Validation(vec![FieldError::new(
            "email",
            "Please provide a valid email",
        )]));
    }

    let mut user = User::find_by_email(&state.pool, &req.email)
        .await?
        .ok_or_else(|| AppError::not_found("No account found with this email"))?;

    let now = Utc::now();
    let ttl = state.config.reset_token_ttl;
    let token = state
        .tokens
        .issue(&user.id, TokenKind::Reset, now, ttl)
        .map_err(|err| AppError::internal("Server error", err))?;
    user.set_reset_token(&state.pool, token.clone(), now + ttl).await?;

    let link = mailer::reset_link(&state.config.frontend_url, &token);
    let email = mailer::password_reset_email(state.mailer.sender(), &user.email, &link);

    match state.mailer.send(&email).await {
        Ok(()) => {
            tracing::info!(user_id = %user.id, "password reset email sent");
            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "message": "Password reset link has been sent to your email"
            })))
        }
        Err(err) => {
            tracing::warn!(user_id = %user.id, error = %err, "password reset email not sent");
            let mut body = json!({
                "success": true,
                "message": "Password reset token generated. Email service temporarily unavailable."
            });
            if state.config.reset_token_fallback {
                body["resetToken"] = json!(token);
            }
            Ok(HttpResponse::Ok().json(body))
        }
    }
}

pub async fn reset_password(
    state: web::Data<AppState>,
    body: web::Json<ResetPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    let req = body.into_inner();
    if req.reset_token.trim().is_empty() {
        return Err(AppError::Validation(vec![FieldError::new(
            "resetToken",
            "Reset token is required",
        )]));
    }
    password::ensure_strong(&req.new_password)?;

    let claims = state
        .tokens
        .verify(&req.reset_token, TokenKind::Reset)
        .map_err(|err| {
            tracing::debug!(error = %err, "reset token rejected");
            AppError::bad_request(BAD_RESET_TOKEN)
        })?;

    let mut user = User::find_by_id(&state.pool, &claims.id)
        .await?
        .filter(|user| {
            user.reset_password_token.as_deref() == Some(req.reset_token.as_str())
                && user.reset_password_expires.is_some_and(|at| at > Utc::now())
        })
        .ok_or_else(|| AppError::bad_request(BAD_RESET_TOKEN))?;

    let hash = password::hash(&req.new_password, state.config.bcrypt_cost).await?;
    user.set_password(&state.pool, hash).await?;
    tracing::info!(user_id = %user.id, "password reset");

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Password has been reset successfully"
    })))
}
