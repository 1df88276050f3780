use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::auth::AuthUser;
use crate::db::is_unique_violation;
use crate::error::AppError;
use crate::handlers::auth::create_account;
use crate::models::user::normalize_email;
use crate::models::{Business, RegisterRequest, UpdateUserRequest, User};
use crate::services::notifications;
use crate::state::AppState;

pub async fn get_profile(caller: AuthUser) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "user": caller.0.profile()
    })))
}

/// Apply a name/email change to `user`, then tell them about it. The
/// notification is written after the profile, so its failure surfaces as
/// a 500 even though the change itself is kept.
async fn update_account(
    state: &AppState,
    mut user: User,
    req: UpdateUserRequest,
) -> Result<HttpResponse, AppError> {
    AppError::check(req.validate())?;

    if let Some(email) = req.email {
        let email = normalize_email(&email);
        if email != user.email && User::email_taken(&state.pool, &email).await? {
            return Err(AppError::bad_request("Email already in use"));
        }
        user.email = email;
    }
    if let Some(name) = req.name {
        user.name = name.trim().to_string();
    }

    match user.update_profile(&state.pool).await {
        Ok(()) => {}
        Err(err) if is_unique_violation(&err) => {
            return Err(AppError::bad_request("Email already in use"))
        }
        Err(err) => return Err(err.into()),
    }
    notifications::notify(&state.pool, notifications::profile_updated(&user)).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "User updated successfully",
        "user": user.profile()
    })))
}

pub async fn update_profile(
    state: web::Data<AppState>,
    caller: AuthUser,
    body: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, AppError> {
    update_account(&state, caller.into_inner(), body.into_inner()).await
}

pub async fn add_bookmark(
    state: web::Data<AppState>,
    caller: AuthUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let business_id = path.into_inner();
    let business = Business::find_by_id(&state.pool, &business_id)
        .await?
        .ok_or_else(|| AppError::not_found("Business not found"))?;

    let mut user = caller.into_inner();
    if !user.add_bookmark(&business.id) {
        return Err(AppError::bad_request("Business already bookmarked"));
    }
    user.set_bookmarks(&state.pool).await?;

    notifications::notify_quietly(
        &state.pool,
        notifications::bookmarked_for_owner(&business, &user),
    )
    .await;
    notifications::notify_quietly(
        &state.pool,
        notifications::bookmark_confirmation(&business, &user),
    )
    .await;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Business bookmarked successfully",
        "bookmarks": user.bookmarks
    })))
}

pub async fn remove_bookmark(
    state: web::Data<AppState>,
    caller: AuthUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let mut user = caller.into_inner();
    user.remove_bookmark(&path);
    user.set_bookmarks(&state.pool).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Bookmark removed successfully",
        "bookmarks": user.bookmarks
    })))
}

pub async fn get_bookmarks(
    state: web::Data<AppState>,
    caller: AuthUser,
) -> Result<HttpResponse, AppError> {
    let businesses = Business::find_many(&state.pool, &caller.0.bookmarks).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "count": businesses.len(),
        "bookmarks": businesses
    })))
}

pub async fn check_bookmark(
    caller: AuthUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "isBookmarked": caller.0.has_bookmark(&path)
    })))
}

pub async fn create_user(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let user = create_account(&state, &body).await?;
    tracing::info!(user_id = %user.id, "user created");
    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "User created successfully",
        "user": user.profile()
    })))
}

pub async fn list_users(
    state: web::Data<AppState>,
    _caller: AuthUser,
) -> Result<HttpResponse, AppError> {
    let users: Vec<_> = User::list(&state.pool)
        .await?
        .iter()
        .map(User::profile)
        .collect();
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "count": users.len(),
        "users": users
    })))
}

pub async fn get_user(
    state: web::Data<AppState>,
    _caller: AuthUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let user = User::find_by_id(&state.pool, &path)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "user": user.profile()
    })))
}

fn ensure_self(caller: &AuthUser, id: &str) -> Result<(), AppError> {
    if caller.id() == id {
        Ok(())
    } else {
        Err(AppError::forbidden("Not authorized to modify this user"))
    }
}

pub async fn update_user(
    state: web::Data<AppState>,
    caller: AuthUser,
    path: web::Path<String>,
    body: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, AppError> {
    ensure_self(&caller, &path)?;
    update_account(&state, caller.into_inner(), body.into_inner()).await
}

pub async fn delete_user(
    state: web::Data<AppState>,
    caller: AuthUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    ensure_self(&caller, &path)?;
    if !User::delete(&state.pool, caller.id()).await? {
        return Err(AppError::not_found("User not found"));
    }
    tracing::info!(user_id = %caller.id(), "user deleted");
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "User deleted successfully"
    })))
}
