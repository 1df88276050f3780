use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;

use crate::auth::token::TokenKind;
use crate::error::AppError;
use crate::models::{User, UserType};
use crate::state::AppState;

/// The caller, resolved from `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

/// The caller if a valid bearer token was sent, otherwise anonymous.
#[derive(Debug, Clone)]
pub struct OptionalAuthUser(pub Option<User>);

impl AuthUser {
    pub fn id(&self) -> &str {
        &self.0.id
    }

    pub fn into_inner(self) -> User {
        self.0
    }

    /// Reject callers whose role is not in `allowed`.
    pub fn authorize(&self, allowed: &[UserType]) -> Result<(), AppError> {
        if allowed.contains(&self.0.user_type) {
            Ok(())
        } else {
            Err(AppError::forbidden(format!(
                "User type '{}' is not authorized to access this route",
                self.0.user_type
            )))
        }
    }
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    let header = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

async fn resolve(state: Option<web::Data<AppState>>, token: Option<String>) -> Result<User, AppError> {
    let state = state.ok_or_else(|| AppError::internal("Server error", "application state missing"))?;
    let token = token.ok_or_else(|| {
        AppError::unauthorized("Not authorized to access this route. Please login.")
    })?;

    let claims = state.tokens.verify(&token, TokenKind::Access).map_err(|err| {
        tracing::debug!(error = %err, "bearer token rejected");
        AppError::unauthorized("Invalid or expired token")
    })?;

    User::find_by_id(&state.pool, &claims.id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let token = bearer_token(req);
        Box::pin(async move { resolve(state, token).await.map(AuthUser) })
    }
}

impl FromRequest for OptionalAuthUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let token = bearer_token(req);
        Box::pin(async move {
            if token.is_none() {
                return Ok(OptionalAuthUser(None));
            }
            Ok(OptionalAuthUser(resolve(state, token).await.ok()))
        })
    }
}
