use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::db::{decode_err, now_rfc3339};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    BusinessCreated,
    BusinessUpdated,
    BusinessBookmarked,
    BusinessViewed,
    ProfileUpdated,
    System,
}

impl NotificationType {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationType::BusinessCreated => "business_created",
            NotificationType::BusinessUpdated => "business_updated",
            NotificationType::BusinessBookmarked => "business_bookmarked",
            NotificationType::BusinessViewed => "business_viewed",
            NotificationType::ProfileUpdated => "profile_updated",
            NotificationType::System => "system",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "business_created" => Some(NotificationType::BusinessCreated),
            "business_updated" => Some(NotificationType::BusinessUpdated),
            "business_bookmarked" => Some(NotificationType::BusinessBookmarked),
            "business_viewed" => Some(NotificationType::BusinessViewed),
            "profile_updated" => Some(NotificationType::ProfileUpdated),
            "system" => Some(NotificationType::System),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SenderSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub business_name: String,
    pub logo: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(rename = "_id")]
    pub id: String,
    pub recipient: String,
    pub sender: Option<SenderSummary>,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    pub related_business: Option<BusinessSummary>,
    pub is_read: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub created_at: String,
}

/// A notification about to be written.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub recipient: String,
    pub sender: Option<String>,
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    pub related_business: Option<String>,
    pub link: Option<String>,
}

impl NewNotification {
    pub fn new(
        recipient: impl Into<String>,
        kind: NotificationType,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            recipient: recipient.into(),
            sender: None,
            kind,
            title: title.into(),
            message: message.into(),
            related_business: None,
            link: None,
        }
    }

    pub fn from_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    pub fn about(mut self, business_id: impl Into<String>) -> Self {
        self.related_business = Some(business_id.into());
        self
    }

    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

const NOTIFICATION_SELECT: &str = "SELECT n.id, n.recipient_id, n.sender_id, n.kind, n.title, \
    n.message, n.related_business_id, n.is_read, n.link, n.created_at, \
    s.name AS sender_name, s.email AS sender_email, \
    b.business_name AS business_name, b.logo AS business_logo \
    FROM notifications n \
    LEFT JOIN users s ON s.id = n.sender_id \
    LEFT JOIN businesses b ON b.id = n.related_business_id";

impl Notification {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let kind: String = row.try_get("kind")?;
        let sender_id: Option<String> = row.try_get("sender_id")?;
        let sender_name: Option<String> = row.try_get("sender_name")?;
        let sender_email: Option<String> = row.try_get("sender_email")?;
        let business_id: Option<String> = row.try_get("related_business_id")?;
        let business_name: Option<String> = row.try_get("business_name")?;
        let business_logo: Option<String> = row.try_get("business_logo")?;

        Ok(Self {
            id: row.try_get("id")?,
            recipient: row.try_get("recipient_id")?,
            sender: match (sender_id, sender_name, sender_email) {
                (Some(id), Some(name), Some(email)) => Some(SenderSummary { id, name, email }),
                _ => None,
            },
            kind: NotificationType::parse(&kind)
                .ok_or_else(|| decode_err("kind", format!("unknown notification type {kind}")))?,
            title: row.try_get("title")?,
            message: row.try_get("message")?,
            related_business: match (business_id, business_name) {
                (Some(id), Some(business_name)) => Some(BusinessSummary {
                    id,
                    business_name,
                    logo: business_logo.unwrap_or_default(),
                }),
                _ => None,
            },
            is_read: row.try_get("is_read")?,
            link: row.try_get("link")?,
            created_at: row.try_get("created_at")?,
        })
    }

    pub async fn insert(pool: &SqlitePool, new: &NewNotification) -> Result<Self, sqlx::Error> {
        let id = uuid::Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO notifications (id, recipient_id, sender_id, kind, title, message, \
             related_business_id, is_read, link, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, 0, ?, ?)",
        )
        .bind(&id)
        .bind(&new.recipient)
        .bind(&new.sender)
        .bind(new.kind.as_str())
        .bind(new.title.trim())
        .bind(new.message.trim())
        .bind(&new.related_business)
        .bind(&new.link)
        .bind(now_rfc3339())
        .execute(pool)
        .await?;

        Self::find_by_id(pool, &id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("{NOTIFICATION_SELECT} WHERE n.id = ? LIMIT 1");
        sqlx::query(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .as_ref()
            .map(Self::from_row)
            .transpose()
    }

    /// Newest first, plus the total matching count.
    pub async fn list_for(
        pool: &SqlitePool,
        recipient: &str,
        unread_only: bool,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Self>, i64), sqlx::Error> {
        let unread_clause = if unread_only { " AND n.is_read = 0" } else { "" };

        let sql = format!(
            "{NOTIFICATION_SELECT} WHERE n.recipient_id = ?{unread_clause} \
             ORDER BY n.created_at DESC, n.rowid DESC LIMIT ? OFFSET ?"
        );
        let notifications = sqlx::query(&sql)
            .bind(recipient)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?
            .iter()
            .map(Self::from_row)
            .collect::<Result<Vec<_>, _>>()?;

        let count_sql =
            format!("SELECT COUNT(1) FROM notifications n WHERE n.recipient_id = ?{unread_clause}");
        let total = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(recipient)
            .fetch_one(pool)
            .await?;

        Ok((notifications, total))
    }

    pub async fn unread_count(pool: &SqlitePool, recipient: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(1) FROM notifications WHERE recipient_id = ? AND is_read = 0",
        )
        .bind(recipient)
        .fetch_one(pool)
        .await
    }

    pub async fn mark_read(pool: &SqlitePool, id: &str) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE notifications SET is_read = 1 WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn mark_all_read(pool: &SqlitePool, recipient: &str) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("UPDATE notifications SET is_read = 1 WHERE recipient_id = ? AND is_read = 0")
                .bind(recipient)
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete(pool: &SqlitePool, id: &str) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM notifications WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
