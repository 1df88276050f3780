#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use async_trait::async_trait;
use serde_json::{json, Value};

use bizconnect::config::Config;
use bizconnect::db;
use bizconnect::services::{Email, ImageHost, ImageHostError, ImageUpload, MailError, Mailer};
use bizconnect::state::AppState;

pub const PASSWORD: &str = "Secret!23";

/// Keeps every message instead of sending it.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<Email>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &Email) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }

    fn sender(&self) -> String {
        "support@bizconnect.test".to_string()
    }
}

pub struct DownMailer;

#[async_trait]
impl Mailer for DownMailer {
    async fn send(&self, _email: &Email) -> Result<(), MailError> {
        Err(MailError::NotConfigured)
    }

    fn sender(&self) -> String {
        "support@bizconnect.test".to_string()
    }
}

/// Pretends to host images at a predictable URL.
#[derive(Default)]
pub struct StubImageHost {
    pub uploads: Mutex<Vec<ImageUpload>>,
}

#[async_trait]
impl ImageHost for StubImageHost {
    async fn upload(&self, image: ImageUpload, folder: &str) -> Result<String, ImageHostError> {
        let url = format!("https://images.test/{folder}/{}", image.filename);
        self.uploads.lock().unwrap().push(image);
        Ok(url)
    }
}

pub struct DownImageHost;

#[async_trait]
impl ImageHost for DownImageHost {
    async fn upload(&self, _image: ImageUpload, _folder: &str) -> Result<String, ImageHostError> {
        Err(ImageHostError::NotConfigured)
    }
}

pub fn test_config(overrides: &[(&str, &str)]) -> Config {
    let mut vars = HashMap::from([
        ("JWT_SECRET", "integration-test-secret"),
        ("BCRYPT_COST", "4"),
        ("DATABASE_URL", "sqlite::memory:"),
        ("FRONTEND_URL", "https://bizconnect.test"),
    ]);
    vars.extend(overrides.iter().copied());
    Config::from_map(&vars).unwrap()
}

pub async fn state_with(
    config: Config,
    mailer: Arc<dyn Mailer>,
    images: Arc<dyn ImageHost>,
) -> web::Data<AppState> {
    let pool = db::init_pool(&config.database_url, 1).await.unwrap();
    web::Data::new(AppState::new(pool, config, mailer, images))
}

pub struct Harness {
    pub state: web::Data<AppState>,
    pub mailer: Arc<RecordingMailer>,
    pub images: Arc<StubImageHost>,
}

pub async fn harness() -> Harness {
    let mailer = Arc::new(RecordingMailer::default());
    let images = Arc::new(StubImageHost::default());
    let state = state_with(test_config(&[]), mailer.clone(), images.clone()).await;
    Harness {
        state,
        mailer,
        images,
    }
}

pub fn test_app(
    state: web::Data<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().app_data(state).configure(bizconnect::routes)
}

pub async fn call(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    req: test::TestRequest,
) -> (StatusCode, Value) {
    let resp = test::call_service(app, req.to_request()).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, value)
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

/// Register an account and return `(token, user id)`.
pub async fn register(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    name: &str,
    email: &str,
    user_type: &str,
) -> (String, String) {
    let (status, body) = call(
        app,
        test::TestRequest::post().uri("/api/v1/auth/register").set_json(json!({
            "name": name,
            "email": email,
            "password": PASSWORD,
            "userType": user_type
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    (
        body["token"].as_str().unwrap().to_string(),
        body["user"]["id"].as_str().unwrap().to_string(),
    )
}

pub fn business_body(name: &str, category: &str, city: &str) -> Value {
    json!({
        "businessName": name,
        "description": format!("{name} serves the people of {city}"),
        "category": category,
        "contactEmail": "hello@shop.lk",
        "contactPhone": "+94 77 123 4567",
        "address": {
            "street": "12 Main Street",
            "city": city,
            "state": "Western Province",
            "zipCode": "00100"
        },
        "services": [{ "name": "Delivery", "price": 250.0 }]
    })
}

/// Create a business for the owner behind `token` and return its id.
pub async fn create_business(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    token: &str,
    body: Value,
) -> String {
    let (status, body) = call(
        app,
        test::TestRequest::post()
            .uri("/api/v1/business")
            .insert_header(bearer(token))
            .set_json(body),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["business"]["_id"].as_str().unwrap().to_string()
}
