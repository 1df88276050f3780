use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::config::ImageHostConfig;

pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
pub const ALLOWED_IMAGE_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];
pub const LOGO_FOLDER: &str = "bizconnect/logos";

/// An image received from a client, already checked for type and size.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum ImageHostError {
    #[error("image host is not configured")]
    NotConfigured,
    #[error("image host request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("image host rejected the upload ({status}): {message}")]
    Rejected { status: u16, message: String },
}

#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Store the image under `folder` and return its public URL.
    async fn upload(&self, image: ImageUpload, folder: &str) -> Result<String, ImageHostError>;
}

pub fn is_allowed_type(content_type: &str) -> bool {
    ALLOWED_IMAGE_TYPES.contains(&content_type.to_ascii_lowercase().as_str())
}

/// Unsigned uploads to Cloudinary using an upload preset.
pub struct CloudinaryHost {
    client: Client,
    cloud_name: Option<String>,
    upload_preset: Option<String>,
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    url: Option<String>,
    error: Option<UploadErrorBody>,
}

#[derive(Deserialize)]
struct UploadErrorBody {
    message: String,
}

impl CloudinaryHost {
    pub fn new(config: &ImageHostConfig) -> Self {
        Self {
            client: Client::new(),
            cloud_name: config.cloud_name.clone(),
            upload_preset: config.upload_preset.clone(),
        }
    }
}

#[async_trait]
impl ImageHost for CloudinaryHost {
    async fn upload(&self, image: ImageUpload, folder: &str) -> Result<String, ImageHostError> {
        let (Some(cloud_name), Some(preset)) = (&self.cloud_name, &self.upload_preset) else {
            return Err(ImageHostError::NotConfigured);
        };

        let url = format!("https://api.cloudinary.com/v1_1/{cloud_name}/image/upload");
        let size = image.bytes.len();
        let part = Part::bytes(image.bytes)
            .file_name(image.filename)
            .mime_str(&image.content_type)?;
        let form = Form::new()
            .part("file", part)
            .text("upload_preset", preset.clone())
            .text("folder", folder.to_string());

        tracing::info!(size, folder, "uploading image");
        let response = self.client.post(&url).multipart(form).send().await?;
        let status = response.status();
        let body: UploadResponse = response.json().await?;

        if !status.is_success() {
            return Err(ImageHostError::Rejected {
                status: status.as_u16(),
                message: body
                    .error
                    .map(|e| e.message)
                    .unwrap_or_else(|| "Failed to upload image".to_string()),
            });
        }

        body.secure_url.or(body.url).ok_or(ImageHostError::Rejected {
            status: status.as_u16(),
            message: "response carried no image URL".to_string(),
        })
    }
}
