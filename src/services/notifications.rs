use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::{Business, NewNotification, Notification, NotificationType, User};

/// Write one notification. Nothing retries or links it to the caller's
/// own write; callers decide whether a failure matters.
pub async fn notify(pool: &SqlitePool, new: NewNotification) -> Result<Notification, AppError> {
    let notification = Notification::insert(pool, &new).await?;
    tracing::debug!(
        recipient = %notification.recipient,
        kind = notification.kind.as_str(),
        "notification created"
    );
    Ok(notification)
}

/// Like [`notify`], but a failure is only logged.
pub async fn notify_quietly(pool: &SqlitePool, new: NewNotification) {
    let recipient = new.recipient.clone();
    let kind = new.kind;
    if let Err(err) = notify(pool, new).await {
        tracing::warn!(%recipient, kind = kind.as_str(), error = %err, "notification dropped");
    }
}

pub fn welcome(user: &User) -> NewNotification {
    NewNotification::new(
        &user.id,
        NotificationType::System,
        "Welcome to BizConnect!",
        format!(
            "Hi {}, welcome to BizConnect! Start exploring businesses or create your own business profile.",
            user.name
        ),
    )
    .link(user.user_type.dashboard_link())
}

pub fn profile_updated(user: &User) -> NewNotification {
    NewNotification::new(
        &user.id,
        NotificationType::ProfileUpdated,
        "Profile Updated",
        "Your profile has been successfully updated.",
    )
    .link(user.user_type.dashboard_link())
}

/// Tells the owner someone saved their business.
pub fn bookmarked_for_owner(business: &Business, by: &User) -> NewNotification {
    NewNotification::new(
        &business.owner_id,
        NotificationType::BusinessBookmarked,
        "New Bookmark",
        format!(
            "{} bookmarked your business \"{}\"",
            by.name, business.business_name
        ),
    )
    .from_sender(&by.id)
    .about(&business.id)
    .link(format!("/business/detail/{}", business.id))
}

pub fn bookmark_confirmation(business: &Business, by: &User) -> NewNotification {
    NewNotification::new(
        &by.id,
        NotificationType::System,
        "Bookmark Added",
        format!(
            "You bookmarked \"{}\". View your bookmarks anytime from your dashboard.",
            business.business_name
        ),
    )
    .about(&business.id)
    .link("/user/bookmarks")
}
