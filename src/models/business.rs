use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::db::{decode_err, like_pattern, now_rfc3339};
use crate::error::FieldError;
use crate::models::user::is_valid_email;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BusinessCategory {
    Restaurant,
    Retail,
    Services,
    Healthcare,
    Education,
    Technology,
    Construction,
    Entertainment,
    Other,
}

impl BusinessCategory {
    pub const ALL: [BusinessCategory; 9] = [
        BusinessCategory::Restaurant,
        BusinessCategory::Retail,
        BusinessCategory::Services,
        BusinessCategory::Healthcare,
        BusinessCategory::Education,
        BusinessCategory::Technology,
        BusinessCategory::Construction,
        BusinessCategory::Entertainment,
        BusinessCategory::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BusinessCategory::Restaurant => "Restaurant",
            BusinessCategory::Retail => "Retail",
            BusinessCategory::Services => "Services",
            BusinessCategory::Healthcare => "Healthcare",
            BusinessCategory::Education => "Education",
            BusinessCategory::Technology => "Technology",
            BusinessCategory::Construction => "Construction",
            BusinessCategory::Entertainment => "Entertainment",
            BusinessCategory::Other => "Other",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == raw)
    }
}

fn default_country() -> String {
    "Sri Lanka".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    #[serde(default = "default_country")]
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "price_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<String>,
}

/// Prices are stored as text, but clients often send them as JSON numbers.
fn price_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(text)) => Ok(Some(text)),
        Some(serde_json::Value::Number(number)) => Ok(Some(number_text(&number))),
        Some(other) => Err(D::Error::custom(format!(
            "invalid price {other}, expected a string or a number"
        ))),
    }
}

fn number_text(number: &serde_json::Number) -> String {
    if let Some(whole) = number.as_i64() {
        return whole.to_string();
    }
    match number.as_f64() {
        Some(value) if value.fract() == 0.0 && value.abs() < 1e15 => (value as i64).to_string(),
        Some(value) => value.to_string(),
        None => number.to_string(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialMedia {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayHours {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperatingHours {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monday: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tuesday: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wednesday: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thursday: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friday: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturday: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunday: Option<DayHours>,
}

/// Populated owner reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnerSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(skip)]
    pub owner_id: String,
    /// `None` once the owning account has been deleted.
    pub owner: Option<OwnerSummary>,
    pub business_name: String,
    pub description: String,
    pub category: BusinessCategory,
    pub logo: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub address: Address,
    pub services: Vec<Service>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub social_media: SocialMedia,
    pub operating_hours: OperatingHours,
    pub is_active: bool,
    pub views: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressInput {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
}

/// Body of `POST /business`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBusinessRequest {
    pub business_name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub logo: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub address: AddressInput,
    #[serde(default)]
    pub services: Vec<Service>,
    pub website: Option<String>,
    #[serde(default)]
    pub social_media: SocialMedia,
    #[serde(default)]
    pub operating_hours: OperatingHours,
}

/// Body of `PUT /business/{id}`: only the fields present are changed.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBusinessRequest {
    pub business_name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub logo: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub address: Option<AddressInput>,
    pub services: Option<Vec<Service>>,
    pub website: Option<String>,
    pub social_media: Option<SocialMedia>,
    pub operating_hours: Option<OperatingHours>,
    pub is_active: Option<bool>,
}

fn required(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn require(
    errors: &mut Vec<FieldError>,
    field: &str,
    value: Option<&str>,
    message: &str,
) -> String {
    match required(value) {
        Some(v) => v,
        None => {
            errors.push(FieldError::new(field, message));
            String::new()
        }
    }
}

fn category_error() -> String {
    let names: Vec<&str> = BusinessCategory::ALL.iter().map(|c| c.as_str()).collect();
    format!("Category must be one of: {}", names.join(", "))
}

fn validate_services(errors: &mut Vec<FieldError>, services: &[Service]) {
    for (i, service) in services.iter().enumerate() {
        if service.name.trim().is_empty() {
            errors.push(FieldError::new(
                format!("services[{i}].name"),
                "Service name is required",
            ));
        }
    }
}

impl CreateBusinessRequest {
    /// Check every field and build the new record for `owner_id`.
    pub fn into_business(self, owner_id: &str) -> Result<Business, Vec<FieldError>> {
        let mut errors = Vec::new();

        let business_name = require(
            &mut errors,
            "businessName",
            self.business_name.as_deref(),
            "Business name is required",
        );
        let description = require(
            &mut errors,
            "description",
            self.description.as_deref(),
            "Description is required",
        );
        let category = match required(self.category.as_deref()) {
            None => {
                errors.push(FieldError::new("category", "Category is required"));
                None
            }
            Some(raw) => {
                let parsed = BusinessCategory::parse(&raw);
                if parsed.is_none() {
                    errors.push(FieldError::new("category", category_error()));
                }
                parsed
            }
        };
        let contact_email = match self.contact_email.as_deref() {
            Some(email) if is_valid_email(email) => email.trim().to_lowercase(),
            _ => {
                errors.push(FieldError::new("contactEmail", "Valid email is required"));
                String::new()
            }
        };
        let contact_phone = require(
            &mut errors,
            "contactPhone",
            self.contact_phone.as_deref(),
            "Contact phone is required",
        );
        let address = Address {
            street: require(
                &mut errors,
                "address.street",
                self.address.street.as_deref(),
                "Street address is required",
            ),
            city: require(
                &mut errors,
                "address.city",
                self.address.city.as_deref(),
                "City is required",
            ),
            state: require(
                &mut errors,
                "address.state",
                self.address.state.as_deref(),
                "State is required",
            ),
            zip_code: require(
                &mut errors,
                "address.zipCode",
                self.address.zip_code.as_deref(),
                "Zip code is required",
            ),
            country: required(self.address.country.as_deref()).unwrap_or_else(default_country),
        };
        validate_services(&mut errors, &self.services);

        let Some(category) = category.filter(|_| errors.is_empty()) else {
            return Err(errors);
        };

        let now = now_rfc3339();
        Ok(Business {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            owner: None,
            business_name,
            description,
            category,
            logo: self.logo.unwrap_or_default(),
            contact_email,
            contact_phone,
            address,
            services: self.services,
            website: required(self.website.as_deref()),
            social_media: self.social_media,
            operating_hours: self.operating_hours,
            is_active: true,
            views: 0,
            created_at: now.clone(),
            updated_at: now,
        })
    }
}

impl UpdateBusinessRequest {
    /// Apply the present fields onto `business`, re-checking each one.
    /// The address is merged field by field.
    pub fn apply(self, business: &mut Business) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        let mut set_text = |field: &str, value: Option<String>, target: &mut String, message: &str| {
            if let Some(value) = value {
                match required(Some(value.as_str())) {
                    Some(v) => *target = v,
                    None => errors.push(FieldError::new(field, message)),
                }
            }
        };

        set_text(
            "businessName",
            self.business_name,
            &mut business.business_name,
            "Business name is required",
        );
        set_text(
            "description",
            self.description,
            &mut business.description,
            "Description is required",
        );
        set_text(
            "contactPhone",
            self.contact_phone,
            &mut business.contact_phone,
            "Contact phone is required",
        );
        if let Some(address) = self.address {
            set_text(
                "address.street",
                address.street,
                &mut business.address.street,
                "Street address is required",
            );
            set_text("address.city", address.city, &mut business.address.city, "City is required");
            set_text(
                "address.state",
                address.state,
                &mut business.address.state,
                "State is required",
            );
            set_text(
                "address.zipCode",
                address.zip_code,
                &mut business.address.zip_code,
                "Zip code is required",
            );
            set_text(
                "address.country",
                address.country,
                &mut business.address.country,
                "Country cannot be empty",
            );
        }

        if let Some(raw) = self.category {
            match BusinessCategory::parse(raw.trim()) {
                Some(category) => business.category = category,
                None => errors.push(FieldError::new("category", category_error())),
            }
        }
        if let Some(email) = self.contact_email {
            if is_valid_email(&email) {
                business.contact_email = email.trim().to_lowercase();
            } else {
                errors.push(FieldError::new("contactEmail", "Valid email is required"));
            }
        }
        if let Some(services) = self.services {
            validate_services(&mut errors, &services);
            business.services = services;
        }
        if let Some(logo) = self.logo {
            business.logo = logo;
        }
        if let Some(website) = self.website {
            business.website = required(Some(website.as_str()));
        }
        if let Some(social_media) = self.social_media {
            business.social_media = social_media;
        }
        if let Some(operating_hours) = self.operating_hours {
            business.operating_hours = operating_hours;
        }
        if let Some(is_active) = self.is_active {
            business.is_active = is_active;
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedAt,
    Views,
    BusinessName,
}

impl SortField {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("views") => SortField::Views,
            Some("businessName") => SortField::BusinessName,
            _ => SortField::CreatedAt,
        }
    }

    fn column(self) -> &'static str {
        match self {
            SortField::CreatedAt => "b.created_at",
            SortField::Views => "b.views",
            SortField::BusinessName => "b.business_name COLLATE NOCASE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// How the category filter compares: the plain listing matches exactly,
/// the search endpoint by substring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryMatch {
    #[default]
    Exact,
    Contains,
}

/// Filters for the public listing and search endpoints. Only active
/// businesses are ever returned.
#[derive(Debug, Clone, Default)]
pub struct BusinessFilter {
    pub keyword: Option<String>,
    pub category: Option<String>,
    pub category_match: CategoryMatch,
    pub city: Option<String>,
    pub state: Option<String>,
    pub service: Option<String>,
    pub sort: SortField,
    pub order: SortOrder,
}

impl BusinessFilter {
    fn where_clause(&self) -> (String, Vec<String>) {
        let mut clauses = vec!["b.is_active = 1".to_string()];
        let mut binds = Vec::new();

        let present = |v: &Option<String>| v.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_string);

        if let Some(keyword) = present(&self.keyword) {
            clauses.push(
                "(b.business_name LIKE ? ESCAPE '\\' OR b.description LIKE ? ESCAPE '\\')".to_string(),
            );
            binds.push(like_pattern(&keyword));
            binds.push(like_pattern(&keyword));
        }
        if let Some(category) = present(&self.category) {
            match self.category_match {
                CategoryMatch::Exact => {
                    clauses.push("b.category = ?".to_string());
                    binds.push(category);
                }
                CategoryMatch::Contains => {
                    clauses.push("b.category LIKE ? ESCAPE '\\'".to_string());
                    binds.push(like_pattern(&category));
                }
            }
        }
        if let Some(city) = present(&self.city) {
            clauses.push("b.city LIKE ? ESCAPE '\\'".to_string());
            binds.push(like_pattern(&city));
        }
        if let Some(state) = present(&self.state) {
            clauses.push("b.state LIKE ? ESCAPE '\\'".to_string());
            binds.push(like_pattern(&state));
        }
        if let Some(service) = present(&self.service) {
            clauses.push(
                "EXISTS (SELECT 1 FROM json_each(b.services) s \
                 WHERE json_extract(s.value, '$.name') LIKE ? ESCAPE '\\')"
                    .to_string(),
            );
            binds.push(like_pattern(&service));
        }

        (clauses.join(" AND "), binds)
    }
}

const BUSINESS_SELECT: &str = "SELECT b.id, b.owner_id, b.business_name, b.description, b.category, \
    b.logo, b.contact_email, b.contact_phone, b.street, b.city, b.state, b.zip_code, b.country, \
    b.services, b.website, b.social_media, b.operating_hours, b.is_active, b.views, \
    b.created_at, b.updated_at, u.name AS owner_name, u.email AS owner_email \
    FROM businesses b LEFT JOIN users u ON u.id = b.owner_id";

impl Business {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let category: String = row.try_get("category")?;
        let services: String = row.try_get("services")?;
        let social_media: String = row.try_get("social_media")?;
        let operating_hours: String = row.try_get("operating_hours")?;
        let owner_id: String = row.try_get("owner_id")?;
        let owner_name: Option<String> = row.try_get("owner_name")?;
        let owner_email: Option<String> = row.try_get("owner_email")?;

        Ok(Self {
            id: row.try_get("id")?,
            owner: owner_name.zip(owner_email).map(|(name, email)| OwnerSummary {
                id: owner_id.clone(),
                name,
                email,
            }),
            owner_id,
            business_name: row.try_get("business_name")?,
            description: row.try_get("description")?,
            category: BusinessCategory::parse(&category)
                .ok_or_else(|| decode_err("category", format!("unknown category {category}")))?,
            logo: row.try_get("logo")?,
            contact_email: row.try_get("contact_email")?,
            contact_phone: row.try_get("contact_phone")?,
            address: Address {
                street: row.try_get("street")?,
                city: row.try_get("city")?,
                state: row.try_get("state")?,
                zip_code: row.try_get("zip_code")?,
                country: row.try_get("country")?,
            },
            services: serde_json::from_str(&services).map_err(|e| decode_err("services", e))?,
            website: row.try_get("website")?,
            social_media: serde_json::from_str(&social_media)
                .map_err(|e| decode_err("social_media", e))?,
            operating_hours: serde_json::from_str(&operating_hours)
                .map_err(|e| decode_err("operating_hours", e))?,
            is_active: row.try_get("is_active")?,
            views: row.try_get("views")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id == user_id
    }

    pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("{BUSINESS_SELECT} WHERE b.id = ? LIMIT 1");
        sqlx::query(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .as_ref()
            .map(Self::from_row)
            .transpose()
    }

    pub async fn find_by_owner(pool: &SqlitePool, owner_id: &str) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!("{BUSINESS_SELECT} WHERE b.owner_id = ? ORDER BY b.created_at DESC, b.rowid DESC");
        sqlx::query(&sql)
            .bind(owner_id)
            .fetch_all(pool)
            .await?
            .iter()
            .map(Self::from_row)
            .collect()
    }

    /// Load the given ids, keeping their order and skipping ids that no
    /// longer exist.
    pub async fn find_many(pool: &SqlitePool, ids: &[String]) -> Result<Vec<Self>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!("{BUSINESS_SELECT} WHERE b.id IN ({placeholders})");
        let mut query = sqlx::query(&sql);
        for id in ids {
            query = query.bind(id);
        }
        let mut found: Vec<Self> = query
            .fetch_all(pool)
            .await?
            .iter()
            .map(Self::from_row)
            .collect::<Result<_, _>>()?;
        found.sort_by_key(|b| ids.iter().position(|id| *id == b.id));
        Ok(found)
    }

    /// One page of matches plus the total match count.
    pub async fn search(
        pool: &SqlitePool,
        filter: &BusinessFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Self>, i64), sqlx::Error> {
        let (where_sql, binds) = filter.where_clause();

        let sql = format!(
            "{BUSINESS_SELECT} WHERE {where_sql} ORDER BY {} {}, b.rowid {} LIMIT ? OFFSET ?",
            filter.sort.column(),
            filter.order.keyword(),
            filter.order.keyword(),
        );
        let mut query = sqlx::query(&sql);
        for bind in &binds {
            query = query.bind(bind);
        }
        let businesses = query
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?
            .iter()
            .map(Self::from_row)
            .collect::<Result<Vec<_>, _>>()?;

        let count_sql = format!("SELECT COUNT(1) FROM businesses b WHERE {where_sql}");
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for bind in &binds {
            count_query = count_query.bind(bind);
        }
        let total = count_query.fetch_one(pool).await?;

        Ok((businesses, total))
    }

    pub async fn insert(&self, pool: &SqlitePool) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO businesses (id, owner_id, business_name, description, category, logo, \
             contact_email, contact_phone, street, city, state, zip_code, country, services, website, \
             social_media, operating_hours, is_active, views, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&self.id)
        .bind(&self.owner_id)
        .bind(&self.business_name)
        .bind(&self.description)
        .bind(self.category.as_str())
        .bind(&self.logo)
        .bind(&self.contact_email)
        .bind(&self.contact_phone)
        .bind(&self.address.street)
        .bind(&self.address.city)
        .bind(&self.address.state)
        .bind(&self.address.zip_code)
        .bind(&self.address.country)
        .bind(to_json(&self.services, "[]"))
        .bind(&self.website)
        .bind(to_json(&self.social_media, "{}"))
        .bind(to_json(&self.operating_hours, "{}"))
        .bind(self.is_active)
        .bind(self.views)
        .bind(&self.created_at)
        .bind(&self.updated_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Write back the owner-editable fields. `views` is left alone so a
    /// concurrent detail fetch is not lost.
    pub async fn save(&mut self, pool: &SqlitePool) -> Result<(), sqlx::Error> {
        self.updated_at = now_rfc3339();
        sqlx::query(
            "UPDATE businesses SET business_name = ?, description = ?, category = ?, logo = ?, \
             contact_email = ?, contact_phone = ?, street = ?, city = ?, state = ?, zip_code = ?, \
             country = ?, services = ?, website = ?, social_media = ?, operating_hours = ?, \
             is_active = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&self.business_name)
        .bind(&self.description)
        .bind(self.category.as_str())
        .bind(&self.logo)
        .bind(&self.contact_email)
        .bind(&self.contact_phone)
        .bind(&self.address.street)
        .bind(&self.address.city)
        .bind(&self.address.state)
        .bind(&self.address.zip_code)
        .bind(&self.address.country)
        .bind(to_json(&self.services, "[]"))
        .bind(&self.website)
        .bind(to_json(&self.social_media, "{}"))
        .bind(to_json(&self.operating_hours, "{}"))
        .bind(self.is_active)
        .bind(&self.updated_at)
        .bind(&self.id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Bump the view counter; false if the business does not exist.
    pub async fn record_view(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE businesses SET views = views + 1 WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM businesses WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn to_json<T: Serialize>(value: &T, empty: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| empty.to_string())
}
