use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

use crate::config::MailConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail transport is not configured")]
    NotConfigured,
    #[error("invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("could not build message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("smtp delivery failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &Email) -> Result<(), MailError>;

    /// Address mail is sent from.
    fn sender(&self) -> String;
}

/// Delivers over SMTP with implicit TLS, logging in with the account's user
/// name and app password.
pub struct SmtpMailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    user: Option<String>,
}

impl SmtpMailer {
    /// Without both credentials the mailer is built unconfigured and every
    /// send fails with [`MailError::NotConfigured`].
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let transport = match (&config.user, &config.password) {
            (Some(user), Some(password)) => Some(
                AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
                    .credentials(Credentials::new(user.clone(), password.clone()))
                    .build(),
            ),
            _ => None,
        };
        Ok(Self {
            transport,
            user: config.user.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.transport.is_some()
    }
}

fn build_message(email: &Email) -> Result<Message, MailError> {
    let message = Message::builder()
        .from(email.from.parse::<Mailbox>()?)
        .to(email.to.parse::<Mailbox>()?)
        .subject(email.subject.as_str())
        .multipart(MultiPart::alternative_plain_html(
            email.text.clone(),
            email.html.clone(),
        ))?;
    Ok(message)
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &Email) -> Result<(), MailError> {
        let Some(transport) = &self.transport else {
            return Err(MailError::NotConfigured);
        };
        let message = build_message(email)?;

        tracing::info!(to = %email.to, subject = %email.subject, "sending email");
        transport.send(message).await?;
        Ok(())
    }

    fn sender(&self) -> String {
        format!(
            "\"BizConnect Support\" <{}>",
            self.user.as_deref().unwrap_or("no-reply@bizconnect.local")
        )
    }
}

pub fn reset_link(frontend_url: &str, token: &str) -> String {
    format!("{frontend_url}/reset-password?token={token}")
}

pub fn password_reset_email(from: String, to: &str, reset_link: &str) -> Email {
    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<body style="font-family: Arial, sans-serif; color: #333; background: #f4f4f4; padding: 20px;">
  <div style="max-width: 600px; margin: 0 auto; background: #fff; border-radius: 12px; padding: 32px;">
    <h1 style="color: #d97706;">BizConnect</h1>
    <p>Hello!</p>
    <p>We received a request to reset the password for your BizConnect account.
       If you made this request, use the button below to choose a new password.</p>
    <p style="text-align: center; margin: 32px 0;">
      <a href="{reset_link}" style="background: #f59e0b; color: #fff; padding: 14px 32px; border-radius: 8px; text-decoration: none;">Reset My Password</a>
    </p>
    <p><strong>This link will expire in 24 hours.</strong></p>
    <p>If the button doesn't work, paste this link into your browser:<br>
       <code>{reset_link}</code></p>
    <p>If you didn't request a password reset, ignore this email. Your password will stay unchanged.</p>
    <p style="color: #9ca3af; font-size: 12px;">This is an automated message, please do not reply.</p>
  </div>
</body>
</html>"#
    );

    let text = format!(
        "BizConnect - Password Reset Request\n\n\
         Hello!\n\n\
         We received a request to reset the password for your BizConnect account.\n\n\
         To reset your password, open this link:\n{reset_link}\n\n\
         This link will expire in 24 hours.\n\n\
         If you didn't request a password reset, ignore this email. Your password will stay unchanged.\n"
    );

    Email {
        from,
        to: to.to_string(),
        subject: "Password Reset Request - BizConnect".to_string(),
        html,
        text,
    }
}
