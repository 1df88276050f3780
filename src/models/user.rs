use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::db::{decode_err, now_rfc3339, timestamp};
use crate::error::FieldError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[default]
    User,
    Business,
}

impl UserType {
    pub fn as_str(self) -> &'static str {
        match self {
            UserType::User => "user",
            UserType::Business => "business",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "user" => Some(UserType::User),
            "business" => Some(UserType::Business),
            _ => None,
        }
    }

    pub fn dashboard_link(self) -> &'static str {
        match self {
            UserType::User => "/user/dashboard",
            UserType::Business => "/business/dashboard",
        }
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored account. Holds the password hash, so it is never serialized
/// directly; use [`PublicUser`] or [`UserProfile`].
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub user_type: UserType,
    pub is_verified: bool,
    pub reset_password_token: Option<String>,
    pub reset_password_expires: Option<DateTime<Utc>>,
    pub bookmarks: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Compact user object returned by the auth endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub user_type: UserType,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub user_type: UserType,
    pub is_verified: bool,
    pub bookmarks: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub user_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub reset_token: String,
    #[serde(default)]
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl RegisterRequest {
    /// Shape checks only; password strength is judged separately so each
    /// weakness gets its own message.
    pub fn validate(&self) -> Result<UserType, Vec<FieldError>> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "Name is required"));
        }
        if !is_valid_email(&self.email) {
            errors.push(FieldError::new("email", "Please provide a valid email"));
        }
        let user_type = match self.user_type.as_deref() {
            None => Some(UserType::User),
            Some(raw) => UserType::parse(raw),
        };
        if user_type.is_none() {
            errors.push(FieldError::new(
                "userType",
                "User type must be either user or business",
            ));
        }
        match user_type {
            Some(user_type) if errors.is_empty() => Ok(user_type),
            _ => Err(errors),
        }
    }
}

impl LoginRequest {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if !is_valid_email(&self.email) {
            errors.push(FieldError::new("email", "Please provide a valid email"));
        }
        if self.password.is_empty() {
            errors.push(FieldError::new("password", "Password is required"));
        }
        errors
    }
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if matches!(&self.name, Some(name) if name.trim().is_empty()) {
            errors.push(FieldError::new("name", "Name cannot be empty"));
        }
        if matches!(&self.email, Some(email) if !is_valid_email(email)) {
            errors.push(FieldError::new("email", "Please provide a valid email"));
        }
        errors
    }
}

/// Loose `local@domain.tld` check, the same strength as a form validator.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, _)| !host.is_empty())
        && !domain.ends_with('.')
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

const USER_COLUMNS: &str = "id, name, email, password, user_type, is_verified, \
    reset_password_token, reset_password_expires, bookmarks, created_at, updated_at";

impl User {
    pub fn new(name: &str, email: &str, password_hash: String, user_type: UserType) -> Self {
        let now = now_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            email: normalize_email(email),
            password: password_hash,
            user_type,
            is_verified: false,
            reset_password_token: None,
            reset_password_expires: None,
            bookmarks: Vec::new(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            user_type: self.user_type,
        }
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            user_type: self.user_type,
            is_verified: self.is_verified,
            bookmarks: self.bookmarks.clone(),
            created_at: self.created_at.clone(),
            updated_at: self.updated_at.clone(),
        }
    }

    pub fn has_bookmark(&self, business_id: &str) -> bool {
        self.bookmarks.iter().any(|id| id == business_id)
    }

    /// Returns false when the business was already bookmarked.
    pub fn add_bookmark(&mut self, business_id: &str) -> bool {
        if self.has_bookmark(business_id) {
            return false;
        }
        self.bookmarks.push(business_id.to_string());
        true
    }

    pub fn remove_bookmark(&mut self, business_id: &str) {
        self.bookmarks.retain(|id| id != business_id);
    }

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let user_type: String = row.try_get("user_type")?;
        let bookmarks: String = row.try_get("bookmarks")?;
        let expires: Option<String> = row.try_get("reset_password_expires")?;
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            password: row.try_get("password")?,
            user_type: UserType::parse(&user_type)
                .ok_or_else(|| decode_err("user_type", format!("unknown user type {user_type}")))?,
            is_verified: row.try_get("is_verified")?,
            reset_password_token: row.try_get("reset_password_token")?,
            reset_password_expires: expires
                .map(|raw| {
                    DateTime::parse_from_rfc3339(&raw)
                        .map(|at| at.with_timezone(&Utc))
                        .map_err(|e| decode_err("reset_password_expires", e))
                })
                .transpose()?,
            bookmarks: serde_json::from_str(&bookmarks).map_err(|e| decode_err("bookmarks", e))?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ? LIMIT 1");
        sqlx::query(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .as_ref()
            .map(Self::from_row)
            .transpose()
    }

    pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ? LIMIT 1");
        sqlx::query(&sql)
            .bind(normalize_email(email))
            .fetch_optional(pool)
            .await?
            .as_ref()
            .map(Self::from_row)
            .transpose()
    }

    pub async fn email_taken(pool: &SqlitePool, email: &str) -> Result<bool, sqlx::Error> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(1) FROM users WHERE email = ?")
            .bind(normalize_email(email))
            .fetch_one(pool)
            .await?;
        Ok(count > 0)
    }

    pub async fn list(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC, rowid DESC");
        sqlx::query(&sql)
            .fetch_all(pool)
            .await?
            .iter()
            .map(Self::from_row)
            .collect()
    }

    pub async fn insert(&self, pool: &SqlitePool) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO users (id, name, email, password, user_type, is_verified, \
             reset_password_token, reset_password_expires, bookmarks, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&self.id)
        .bind(&self.name)
        .bind(&self.email)
        .bind(&self.password)
        .bind(self.user_type.as_str())
        .bind(self.is_verified)
        .bind(&self.reset_password_token)
        .bind(self.reset_password_expires.map(timestamp))
        .bind(encode_bookmarks(&self.bookmarks))
        .bind(&self.created_at)
        .bind(&self.updated_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Write the name and email only.
    pub async fn update_profile(&mut self, pool: &SqlitePool) -> Result<(), sqlx::Error> {
        self.updated_at = now_rfc3339();
        sqlx::query("UPDATE users SET name = ?, email = ?, updated_at = ? WHERE id = ?")
            .bind(&self.name)
            .bind(&self.email)
            .bind(&self.updated_at)
            .bind(&self.id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn set_bookmarks(&mut self, pool: &SqlitePool) -> Result<(), sqlx::Error> {
        self.updated_at = now_rfc3339();
        sqlx::query("UPDATE users SET bookmarks = ?, updated_at = ? WHERE id = ?")
            .bind(encode_bookmarks(&self.bookmarks))
            .bind(&self.updated_at)
            .bind(&self.id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn set_reset_token(
        &mut self,
        pool: &SqlitePool,
        token: String,
        expires: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        self.updated_at = now_rfc3339();
        sqlx::query(
            "UPDATE users SET reset_password_token = ?, reset_password_expires = ?, updated_at = ? \
             WHERE id = ?",
        )
        .bind(&token)
        .bind(timestamp(expires))
        .bind(&self.updated_at)
        .bind(&self.id)
        .execute(pool)
        .await?;
        self.reset_password_token = Some(token);
        self.reset_password_expires = Some(expires);
        Ok(())
    }

    /// Store a new password hash and consume any outstanding reset token.
    pub async fn set_password(&mut self, pool: &SqlitePool, hash: String) -> Result<(), sqlx::Error> {
        self.updated_at = now_rfc3339();
        sqlx::query(
            "UPDATE users SET password = ?, reset_password_token = NULL, \
             reset_password_expires = NULL, updated_at = ? WHERE id = ?",
        )
        .bind(&hash)
        .bind(&self.updated_at)
        .bind(&self.id)
        .execute(pool)
        .await?;
        self.password = hash;
        self.reset_password_token = None;
        self.reset_password_expires = None;
        Ok(())
    }

    pub async fn delete(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn encode_bookmarks(bookmarks: &[String]) -> String {
    serde_json::to_string(bookmarks).unwrap_or_else(|_| "[]".to_string())
}
