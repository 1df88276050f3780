use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::error::AppError;
use crate::models::{Category, Country};
use crate::state::AppState;

pub const DEFAULT_CATEGORIES: [(&str, &str); 13] = [
    ("Restaurant", "Food and dining services"),
    ("Retail", "Retail stores and shops"),
    ("Services", "General services"),
    ("Healthcare", "Medical and health services"),
    ("Education", "Educational institutions"),
    ("Technology", "IT and tech services"),
    ("Construction", "Construction and building"),
    ("Entertainment", "Entertainment and events"),
    ("Consulting", "Consulting services"),
    ("Fitness", "Fitness and wellness"),
    ("Beauty & Spa", "Beauty and spa services"),
    ("Legal Services", "Legal and law services"),
    ("Other", "Other business types"),
];

const SRI_LANKA: &[(&str, &str)] = &[
    ("Western Province", "WP"),
    ("Central Province", "CP"),
    ("Southern Province", "SP"),
    ("Northern Province", "NP"),
    ("Eastern Province", "EP"),
    ("North Western Province", "NWP"),
    ("North Central Province", "NCP"),
    ("Uva Province", "UP"),
    ("Sabaragamuwa Province", "SG"),
];

const UNITED_STATES: &[(&str, &str)] = &[
    ("Alabama", "AL"),
    ("Alaska", "AK"),
    ("Arizona", "AZ"),
    ("California", "CA"),
    ("Florida", "FL"),
    ("Georgia", "GA"),
    ("New York", "NY"),
    ("Texas", "TX"),
];

const UNITED_KINGDOM: &[(&str, &str)] = &[
    ("England", "ENG"),
    ("Scotland", "SCT"),
    ("Wales", "WLS"),
    ("Northern Ireland", "NIR"),
];

pub const DEFAULT_COUNTRIES: [(&str, &str, &[(&str, &str)]); 3] = [
    ("Sri Lanka", "LK", SRI_LANKA),
    ("United States", "US", UNITED_STATES),
    ("United Kingdom", "GB", UNITED_KINGDOM),
];

pub async fn get_categories(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let categories = Category::list_active(&state.pool).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "categories": categories
    })))
}

pub async fn get_countries(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let countries = Country::list_active(&state.pool).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "countries": countries
    })))
}

pub async fn get_states(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let country = Country::find_active_by_code(&state.pool, &path)
        .await?
        .ok_or_else(|| AppError::not_found("Country not found"))?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "states": country.states
    })))
}

pub async fn seed_categories(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let outcome = Category::seed(&state.pool, &DEFAULT_CATEGORIES).await?;
    tracing::info!(inserted = outcome.inserted, existing = outcome.already_present, "categories seeded");
    let message = if outcome.already_present > 0 {
        "Categories already exist"
    } else {
        "Categories seeded successfully"
    };
    Ok(HttpResponse::Ok().json(json!({ "success": true, "message": message })))
}

pub async fn seed_countries(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let outcome = Country::seed(&state.pool, &DEFAULT_COUNTRIES).await?;
    tracing::info!(inserted = outcome.inserted, existing = outcome.already_present, "countries seeded");
    let message = if outcome.already_present > 0 {
        "Countries already exist"
    } else {
        "Countries seeded successfully"
    };
    Ok(HttpResponse::Ok().json(json!({ "success": true, "message": message })))
}
