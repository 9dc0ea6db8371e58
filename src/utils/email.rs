//! Email notifier.
//!
//! [`Notifier`] is the boundary the lifecycle services talk to; the SMTP
//! implementation lives behind it so tests can record or fail deliveries.
//! Whether a delivery failure aborts the calling operation is decided per
//! call site through [`NotifyPolicy`], making the asymmetry between
//! account-creation mails (best effort) and admin-initiated reset mails
//! (load-bearing) an explicit contract.

use async_trait::async_trait;
use lettre::message::{MultiPart, SinglePart, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::config::email::EmailConfig;
use crate::utils::errors::AppError;

/// What a notifier failure means to the operation that triggered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyPolicy {
    /// Log and carry on; the primary mutation already committed.
    BestEffort,
    /// Escalate: without the email the flow cannot complete.
    Required,
}

/// Applies the per-operation policy to a notifier outcome.
pub fn apply_notify_policy(
    result: Result<(), AppError>,
    policy: NotifyPolicy,
) -> Result<(), AppError> {
    match result {
        Ok(()) => Ok(()),
        Err(err) => match policy {
            NotifyPolicy::BestEffort => {
                tracing::warn!(error = %err, "notification failed; continuing");
                Ok(())
            }
            NotifyPolicy::Required => {
                tracing::error!(error = %err, "notification failed on a required path");
                Err(AppError::internal(anyhow::anyhow!(
                    "Failed to send notification email"
                )))
            }
        },
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Invite a freshly created pending account to set its password.
    async fn send_activation_email(
        &self,
        to_email: &str,
        to_name: &str,
        token: &str,
    ) -> Result<(), AppError>;

    async fn send_password_reset_email(
        &self,
        to_email: &str,
        to_name: &str,
        token: &str,
    ) -> Result<(), AppError>;
}

pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), AppError> {
        if !self.config.enabled {
            tracing::info!(to = to_email, subject, "SMTP disabled; skipping email");
            return Ok(());
        }

        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        let email = Message::builder()
            .from(
                from.parse()
                    .map_err(|e| AppError::internal(anyhow::anyhow!("Invalid from email: {e}")))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| AppError::internal(anyhow::anyhow!("Invalid to email: {e}")))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )
            .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to build email: {e}")))?;

        let mailer = if self.config.smtp_username.is_empty() {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
                .port(self.config.smtp_port)
                .build()
        } else {
            let creds = Credentials::new(
                self.config.smtp_username.clone(),
                self.config.smtp_password.clone(),
            );

            SmtpTransport::relay(&self.config.smtp_host)
                .map_err(|e| {
                    AppError::internal(anyhow::anyhow!("Failed to create SMTP relay: {e}"))
                })?
                .port(self.config.smtp_port)
                .credentials(creds)
                .build()
        };

        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::internal(anyhow::anyhow!("Send task failed: {e}")))?
            .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to send email: {e}")))?;

        Ok(())
    }
}

#[async_trait]
impl Notifier for EmailService {
    async fn send_activation_email(
        &self,
        to_email: &str,
        to_name: &str,
        token: &str,
    ) -> Result<(), AppError> {
        let link = format!("{}/set-password?token={}", self.config.frontend_url, token);

        let text_body = format!(
            "Hi {to_name},\n\n\
             An account has been created for you.\n\n\
             Set your password to activate it:\n{link}\n\n\
             This link will expire in 24 hours.\n\n\
             Classroom Manager",
        );
        let html_body = format!(
            "<p>Hi <strong>{to_name}</strong>,</p>\
             <p>An account has been created for you. \
             <a href=\"{link}\">Set your password</a> to activate it.</p>\
             <p>This link will expire in 24 hours.</p>",
        );

        self.send_email(to_email, "Activate your account", &text_body, &html_body)
            .await
    }

    async fn send_password_reset_email(
        &self,
        to_email: &str,
        to_name: &str,
        token: &str,
    ) -> Result<(), AppError> {
        let link = format!(
            "{}/reset-password?token={}",
            self.config.frontend_url, token
        );

        let text_body = format!(
            "Hi {to_name},\n\n\
             We received a request to reset your password.\n\n\
             Reset it here:\n{link}\n\n\
             This link will expire in 1 hour. If you didn't request this,\n\
             you can ignore this email.\n\n\
             Classroom Manager",
        );
        let html_body = format!(
            "<p>Hi <strong>{to_name}</strong>,</p>\
             <p>We received a request to reset your password. \
             <a href=\"{link}\">Reset it here</a>.</p>\
             <p>This link will expire in 1 hour. If you didn't request this, \
             you can ignore this email.</p>",
        );

        self.send_email(to_email, "Password reset request", &text_body, &html_body)
            .await
    }
}
