use actix_web::web;

use crate::error::AppError;

const SPECIAL_CHARACTERS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Each rule is checked on its own, in order, so the caller learns exactly
/// which one failed.
pub fn check_strength(password: &str) -> Result<(), &'static str> {
    if password.chars().count() < 8 {
        return Err("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
        return Err("Password must contain at least one special character");
    }
    Ok(())
}

pub fn ensure_strong(password: &str) -> Result<(), AppError> {
    check_strength(password).map_err(AppError::bad_request)
}

/// bcrypt is CPU bound; run it on the blocking pool.
pub async fn hash(password: &str, cost: u32) -> Result<String, AppError> {
    let password = password.to_string();
    let hashed = web::block(move || bcrypt::hash(password, cost)).await??;
    Ok(hashed)
}

/// A malformed stored hash counts as a mismatch.
pub async fn verify(password: &str, hashed: &str) -> Result<bool, AppError> {
    let password = password.to_string();
    let hashed = hashed.to_string();
    let valid = web::block(move || bcrypt::verify(password, &hashed).unwrap_or(false)).await?;
    Ok(valid)
}
