use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::handlers::Page;
use crate::models::Notification;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub unread_only: Option<String>,
}

/// Fetch a notification addressed to the caller.
async fn own_notification(
    state: &AppState,
    caller: &AuthUser,
    id: &str,
) -> Result<Notification, AppError> {
    let notification = Notification::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Notification not found"))?;
    if notification.recipient != caller.id() {
        return Err(AppError::forbidden("Not authorized"));
    }
    Ok(notification)
}

pub async fn get_notifications(
    state: web::Data<AppState>,
    caller: AuthUser,
    query: web::Query<NotificationQuery>,
) -> Result<HttpResponse, AppError> {
    let page = Page::parse(query.page.as_deref(), query.limit.as_deref(), 20);
    let unread_only = query.unread_only.as_deref() == Some("true");

    let (notifications, total) =
        Notification::list_for(&state.pool, caller.id(), unread_only, page.offset(), page.limit)
            .await?;
    let unread_count = Notification::unread_count(&state.pool, caller.id()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "notifications": notifications,
        "unreadCount": unread_count,
        "totalPages": page.total_pages(total),
        "currentPage": page.page,
        "total": total
    })))
}

pub async fn get_unread_count(
    state: web::Data<AppState>,
    caller: AuthUser,
) -> Result<HttpResponse, AppError> {
    let count = Notification::unread_count(&state.pool, caller.id()).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "count": count })))
}

pub async fn mark_as_read(
    state: web::Data<AppState>,
    caller: AuthUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let mut notification = own_notification(&state, &caller, &path).await?;
    Notification::mark_read(&state.pool, &notification.id).await?;
    notification.is_read = true;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Notification marked as read",
        "notification": notification
    })))
}

pub async fn mark_all_as_read(
    state: web::Data<AppState>,
    caller: AuthUser,
) -> Result<HttpResponse, AppError> {
    let updated = Notification::mark_all_read(&state.pool, caller.id()).await?;
    tracing::debug!(user_id = %caller.id(), updated, "notifications marked read");
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "All notifications marked as read"
    })))
}

pub async fn delete_notification(
    state: web::Data<AppState>,
    caller: AuthUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let notification = own_notification(&state, &caller, &path).await?;
    Notification::delete(&state.pool, &notification.id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Notification deleted"
    })))
}
