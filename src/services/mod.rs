pub mod image_host;
pub mod mailer;
pub mod notifications;

pub use image_host::{CloudinaryHost, ImageHost, ImageHostError, ImageUpload};
pub use mailer::{Email, MailError, Mailer, SmtpMailer};
