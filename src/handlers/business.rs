use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures_util::TryStreamExt;
use serde::Deserialize;
use serde_json::json;

use crate::auth::{AuthUser, OptionalAuthUser};
use crate::error::AppError;
use crate::handlers::Page;
use crate::models::{
    Business, BusinessFilter, CategoryMatch, CreateBusinessRequest, SortField, SortOrder,
    UpdateBusinessRequest, UserType,
};
use crate::services::image_host::{self, ImageUpload};
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 10;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub city: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub keyword: Option<String>,
    pub category: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub services: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Load a business the caller is about to change, checking ownership.
async fn owned_business(
    state: &AppState,
    caller: &AuthUser,
    id: &str,
    denied: &str,
) -> Result<Business, AppError> {
    let business = Business::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Business not found"))?;
    if !business.is_owned_by(caller.id()) {
        return Err(AppError::forbidden(denied));
    }
    Ok(business)
}

async fn page_of(
    state: &AppState,
    filter: &BusinessFilter,
    page: Page,
) -> Result<HttpResponse, AppError> {
    let (businesses, total) =
        Business::search(&state.pool, filter, page.offset(), page.limit).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "businesses": businesses,
        "totalPages": page.total_pages(total),
        "currentPage": page.page,
        "total": total
    })))
}

pub async fn create_business(
    state: web::Data<AppState>,
    caller: AuthUser,
    body: web::Json<CreateBusinessRequest>,
) -> Result<HttpResponse, AppError> {
    if caller.0.user_type != UserType::Business {
        return Err(AppError::forbidden(
            "Only business owners can create business profiles",
        ));
    }

    let business = body
        .into_inner()
        .into_business(caller.id())
        .map_err(AppError::Validation)?;
    business.insert(&state.pool).await?;
    tracing::info!(business_id = %business.id, owner_id = %caller.id(), "business created");

    let business = Business::find_by_id(&state.pool, &business.id)
        .await?
        .unwrap_or(business);
    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Business profile created successfully",
        "business": business
    })))
}

pub async fn my_businesses(
    state: web::Data<AppState>,
    caller: AuthUser,
) -> Result<HttpResponse, AppError> {
    caller.authorize(&[UserType::Business])?;
    let businesses = Business::find_by_owner(&state.pool, caller.id()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "count": businesses.len(),
        "businesses": businesses
    })))
}

pub async fn update_business(
    state: web::Data<AppState>,
    caller: AuthUser,
    path: web::Path<String>,
    body: web::Json<UpdateBusinessRequest>,
) -> Result<HttpResponse, AppError> {
    caller.authorize(&[UserType::Business])?;
    let mut business =
        owned_business(&state, &caller, &path, "Not authorized to update this business").await?;

    body.into_inner()
        .apply(&mut business)
        .map_err(AppError::Validation)?;
    business.save(&state.pool).await?;
    tracing::info!(business_id = %business.id, "business updated");

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Business updated successfully",
        "business": business
    })))
}

pub async fn delete_business(
    state: web::Data<AppState>,
    caller: AuthUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    caller.authorize(&[UserType::Business])?;
    let business =
        owned_business(&state, &caller, &path, "Not authorized to delete this business").await?;

    Business::delete(&state.pool, &business.id).await?;
    tracing::info!(business_id = %business.id, "business deleted");

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Business deleted successfully"
    })))
}

pub async fn list_businesses(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let page = Page::parse(query.page.as_deref(), query.limit.as_deref(), DEFAULT_PAGE_SIZE);
    let filter = BusinessFilter {
        keyword: query.search,
        category: query.category,
        category_match: CategoryMatch::Exact,
        city: query.city,
        ..BusinessFilter::default()
    };
    page_of(&state, &filter, page).await
}

pub async fn search_businesses(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let page = Page::parse(query.page.as_deref(), query.limit.as_deref(), DEFAULT_PAGE_SIZE);
    let filter = BusinessFilter {
        keyword: query.keyword,
        category: query.category,
        category_match: CategoryMatch::Contains,
        city: query.city,
        state: query.state,
        service: query.services,
        sort: SortField::parse(query.sort_by.as_deref()),
        order: SortOrder::parse(query.order.as_deref()),
    };
    page_of(&state, &filter, page).await
}

pub async fn get_business(
    state: web::Data<AppState>,
    viewer: OptionalAuthUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    if !Business::record_view(&state.pool, &id).await? {
        return Err(AppError::not_found("Business not found"));
    }
    let business = Business::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Business not found"))?;

    tracing::debug!(
        business_id = %id,
        viewer = viewer.0.as_ref().map(|u| u.id.as_str()).unwrap_or("anonymous"),
        views = business.views,
        "business viewed"
    );
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "business": business
    })))
}

/// Pull the `file` part out of the form, enforcing type and size while
/// streaming.
async fn read_image(mut payload: Multipart) -> Result<ImageUpload, AppError> {
    let malformed = |err: actix_multipart::MultipartError| AppError::bad_request(err.to_string());

    while let Some(mut field) = payload.try_next().await.map_err(malformed)? {
        if field.content_disposition().get_name() != Some("file") {
            while field.try_next().await.map_err(malformed)?.is_some() {}
            continue;
        }

        let content_type = field
            .content_type()
            .map(|mime| mime.essence_str().to_string())
            .unwrap_or_default();
        if !image_host::is_allowed_type(&content_type) {
            return Err(AppError::bad_request(
                "Invalid file type. Please upload a valid image (JPEG, PNG, GIF, or WebP).",
            ));
        }
        let filename = field
            .content_disposition()
            .get_filename()
            .unwrap_or("logo")
            .to_string();

        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(malformed)? {
            if bytes.len() + chunk.len() > image_host::MAX_IMAGE_BYTES {
                return Err(AppError::bad_request(
                    "File size exceeds 5MB. Please upload a smaller image.",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        return Ok(ImageUpload {
            filename,
            content_type,
            bytes,
        });
    }

    Err(AppError::bad_request("Please upload an image file"))
}

pub async fn upload_logo(
    state: web::Data<AppState>,
    caller: AuthUser,
    path: web::Path<String>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    caller.authorize(&[UserType::Business])?;
    let mut business =
        owned_business(&state, &caller, &path, "Not authorized to update this business").await?;

    let image = read_image(payload).await?;
    let url = state
        .images
        .upload(image, image_host::LOGO_FOLDER)
        .await
        .map_err(|err| AppError::BadGateway {
            message: "Image upload failed".to_string(),
            detail: err.to_string(),
        })?;

    business.logo = url;
    business.save(&state.pool).await?;
    tracing::info!(business_id = %business.id, logo = %business.logo, "business logo updated");

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Logo uploaded successfully",
        "logo": business.logo,
        "business": business
    })))
}
