use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::TokenSigner;
use crate::config::Config;
use crate::services::{ImageHost, Mailer};

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<Config>,
    pub tokens: TokenSigner,
    pub mailer: Arc<dyn Mailer>,
    pub images: Arc<dyn ImageHost>,
}

impl AppState {
    pub fn new(
        pool: SqlitePool,
        config: Config,
        mailer: Arc<dyn Mailer>,
        images: Arc<dyn ImageHost>,
    ) -> Self {
        Self {
            pool,
            tokens: TokenSigner::new(&config.jwt_secret),
            config: Arc::new(config),
            mailer,
            images,
        }
    }
}
