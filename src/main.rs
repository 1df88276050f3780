use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::{Logger, NormalizePath};
use actix_web::{web, App, HttpServer};
use tracing_subscriber::EnvFilter;

use bizconnect::config::Config;
use bizconnect::services::{CloudinaryHost, SmtpMailer};
use bizconnect::state::AppState;
use bizconnect::{db, routes};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env().map_err(|err| {
        tracing::error!(error = %err, "invalid configuration");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, err)
    })?;

    let pool = db::init_pool(&config.database_url, config.database_max_connections)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, url = %config.database_url, "failed to open database");
            std::io::Error::new(std::io::ErrorKind::Other, err)
        })?;

    let mailer = SmtpMailer::new(&config.mail).map_err(|err| {
        tracing::error!(error = %err, host = %config.mail.smtp_host, "failed to set up mail transport");
        std::io::Error::new(std::io::ErrorKind::Other, err)
    })?;
    if !mailer.is_configured() {
        tracing::warn!("mail credentials not configured; password reset emails will not be sent");
    }
    let images = CloudinaryHost::new(&config.images);

    let port = config.port;
    let app_state = web::Data::new(AppState::new(pool, config, Arc::new(mailer), Arc::new(images)));

    tracing::info!(port, "BizConnect API listening");
    HttpServer::new(move || {
        App::new()
            .wrap(NormalizePath::trim())
            .wrap(Cors::permissive())
            .wrap(Logger::default())
            .app_data(app_state.clone())
            .configure(routes)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
