pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;

use actix_web::web;

use crate::error::extractor_error;

/// Every route of the API, mounted under `/api/v1`.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _| extractor_error(err)))
        .app_data(web::QueryConfig::default().error_handler(|err, _| extractor_error(err)))
        .app_data(web::PathConfig::default().error_handler(|err, _| extractor_error(err)))
        .service(
            web::scope("/api/v1")
                .route("/health", web::get().to(handlers::health_check))
                .service(
                    web::scope("/auth")
                        .route("/register", web::post().to(handlers::auth::register))
                        .route("/login", web::post().to(handlers::auth::login))
                        .route("/me", web::get().to(handlers::auth::me))
                        .route("/forgot-password", web::post().to(handlers::auth::forgot_password))
                        .route("/reset-password", web::post().to(handlers::auth::reset_password)),
                )
                .service(
                    web::scope("/business")
                        .route("", web::post().to(handlers::business::create_business))
                        .route("", web::get().to(handlers::business::list_businesses))
                        .route("/my-business", web::get().to(handlers::business::my_businesses))
                        .route("/search/filter", web::get().to(handlers::business::search_businesses))
                        .route("/{id}", web::get().to(handlers::business::get_business))
                        .route("/{id}", web::put().to(handlers::business::update_business))
                        .route("/{id}", web::delete().to(handlers::business::delete_business))
                        .route("/{id}/logo", web::post().to(handlers::business::upload_logo)),
                )
                .service(
                    web::scope("/user")
                        .route("/profile", web::get().to(handlers::user::get_profile))
                        .route("/profile", web::put().to(handlers::user::update_profile))
                        .route("/bookmarks", web::get().to(handlers::user::get_bookmarks))
                        .route("/bookmarks/check/{business_id}", web::get().to(handlers::user::check_bookmark))
                        .route("/bookmarks/{business_id}", web::post().to(handlers::user::add_bookmark))
                        .route("/bookmarks/{business_id}", web::delete().to(handlers::user::remove_bookmark))
                        .route("/users", web::post().to(handlers::user::create_user))
                        .route("/users", web::get().to(handlers::user::list_users))
                        .route("/users/{id}", web::get().to(handlers::user::get_user))
                        .route("/users/{id}", web::put().to(handlers::user::update_user))
                        .route("/users/{id}", web::delete().to(handlers::user::delete_user)),
                )
                .service(
                    web::scope("/meta")
                        .route("/categories", web::get().to(handlers::meta::get_categories))
                        .route("/countries", web::get().to(handlers::meta::get_countries))
                        .route("/countries/{code}/states", web::get().to(handlers::meta::get_states))
                        .route("/seed/categories", web::post().to(handlers::meta::seed_categories))
                        .route("/seed/countries", web::post().to(handlers::meta::seed_countries)),
                )
                .service(
                    web::scope("/notifications")
                        .route("", web::get().to(handlers::notification::get_notifications))
                        .route("/count", web::get().to(handlers::notification::get_unread_count))
                        .route("/read-all", web::put().to(handlers::notification::mark_all_as_read))
                        .route("/{id}/read", web::put().to(handlers::notification::mark_as_read))
                        .route("/{id}", web::delete().to(handlers::notification::delete_notification)),
                ),
        );
}
