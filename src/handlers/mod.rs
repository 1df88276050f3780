pub mod auth;
pub mod business;
pub mod meta;
pub mod notification;
pub mod user;

use actix_web::HttpResponse;
use serde_json::json;

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "success": true,
        "status": "OK",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub const MAX_PAGE_SIZE: i64 = 100;

/// `page`/`limit` query values. Anything unparseable or below 1 falls back
/// to the default instead of failing the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub limit: i64,
}

impl Page {
    pub fn parse(page: Option<&str>, limit: Option<&str>, default_limit: i64) -> Self {
        let positive = |raw: Option<&str>| {
            raw.and_then(|v| v.trim().parse::<i64>().ok())
                .filter(|v| *v >= 1)
        };
        Self {
            page: positive(page).unwrap_or(1),
            limit: positive(limit).unwrap_or(default_limit).min(MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn total_pages(&self, total: i64) -> i64 {
        (total + self.limit - 1) / self.limit
    }
}
