// ABOUTME: Outgoing email: Mailer trait, SMTP and log-only mailers, verification messages
// ABOUTME: Verification tokens are random 32-byte hex strings stored only as SHA-256 hashes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use rand::RngCore;
use sha2::{Digest, Sha256};
use tracing::{info, warn};
use url::Url;

use crate::config::{EmailConfig, SmtpConfig, SmtpEncryption};
use crate::errors::{AppError, AppResult};
use crate::models::User;

/// A plain-text email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// Sender
    pub from: String,
    /// Recipient
    pub to: String,
    /// Subject line
    pub subject: String,
    /// Plain-text body
    pub body: String,
}

/// Delivery backend
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one message
    async fn send(&self, message: EmailMessage) -> AppResult<()>;
}

/// Mailer that logs recipient and subject instead of delivering
///
/// Bodies carry verification tokens and are never logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: EmailMessage) -> AppResult<()> {
        info!(
            to = %message.to,
            subject = %message.subject,
            "Email not delivered (no SMTP relay configured)"
        );
        Ok(())
    }
}

/// Mailer delivering through an SMTP relay
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Build the transport; no connection is opened until the first send
    ///
    /// # Errors
    ///
    /// Returns a config error if the relay host is unusable for TLS
    pub fn new(config: &SmtpConfig) -> AppResult<Self> {
        let builder = match config.encryption {
            SmtpEncryption::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            }
            SmtpEncryption::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host),
            SmtpEncryption::None => Ok(AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(
                config.host.as_str(),
            )),
        }
        .map_err(|e| AppError::config(format!("Invalid SMTP relay {}: {e}", config.host)))?;

        let mut builder = builder.port(config.port);
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: EmailMessage) -> AppResult<()> {
        let email = build_message(&message)?;
        self.transport
            .send(email)
            .await
            .map_err(|e| AppError::internal(format!("SMTP delivery to {} failed: {e}", message.to)))?;
        info!(to = %message.to, subject = %message.subject, "Email sent");
        Ok(())
    }
}

fn build_message(message: &EmailMessage) -> AppResult<Message> {
    let from: Mailbox = message
        .from
        .parse()
        .map_err(|e| AppError::config(format!("Invalid sender address: {e}")))?;
    let to: Mailbox = message
        .to
        .parse()
        .map_err(|e| AppError::invalid_input(format!("Invalid recipient address: {e}")))?;
    Message::builder()
        .from(from)
        .to(to)
        .subject(message.subject.clone())
        .header(ContentType::TEXT_PLAIN)
        .body(message.body.clone())
        .map_err(|e| AppError::internal(format!("Failed to build email: {e}")))
}

/// SMTP mailer when a relay is configured, otherwise [`LogMailer`]
///
/// # Errors
///
/// Returns a config error if the SMTP transport cannot be built
pub fn create_mailer(config: &EmailConfig) -> AppResult<Arc<dyn Mailer>> {
    match &config.smtp {
        Some(smtp) => {
            info!(host = %smtp.host, port = smtp.port, "Using SMTP mailer");
            Ok(Arc::new(SmtpMailer::new(smtp)?))
        }
        None => {
            warn!("No SMTP relay configured, using log-only mailer");
            Ok(Arc::new(LogMailer))
        }
    }
}

/// Generate a verification token, returning `(raw, sha256_hex)`
#[must_use]
pub fn generate_verification_token() -> (String, String) {
    let mut bytes = [0_u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    let raw = hex::encode(bytes);
    let hash = hash_token(&raw);
    (raw, hash)
}

/// SHA-256 of a raw token, hex encoded
#[must_use]
pub fn hash_token(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}

/// Composes account emails and hands them to the configured [`Mailer`]
#[derive(Clone)]
pub struct EmailService {
    mailer: Arc<dyn Mailer>,
    config: EmailConfig,
}

impl EmailService {
    /// Create the service
    #[must_use]
    pub fn new(mailer: Arc<dyn Mailer>, config: EmailConfig) -> Self {
        Self { mailer, config }
    }

    /// Verification token lifetime in hours
    #[must_use]
    pub const fn verification_ttl_hours(&self) -> i64 {
        self.config.verification_ttl_hours
    }

    /// Link the user follows to verify their address
    ///
    /// # Errors
    ///
    /// Returns a config error if `FRONTEND_URL` is not a valid URL
    pub fn verification_link(&self, email: &str, token: &str) -> AppResult<String> {
        let mut url = Url::parse(&self.config.frontend_url)
            .and_then(|base| base.join("verify-email"))
            .map_err(|e| AppError::config(format!("Invalid FRONTEND_URL: {e}")))?;
        url.query_pairs_mut()
            .append_pair("token", token)
            .append_pair("email", email);
        Ok(url.into())
    }

    /// Send the verification link
    ///
    /// # Errors
    ///
    /// Returns an error if the link cannot be built or delivery fails
    pub async fn send_verification(&self, user: &User, token: &str) -> AppResult<()> {
        let link = self.verification_link(&user.email, token)?;
        let body = format!(
            "Hi {},\n\nPlease verify your email address by opening the link below:\n\n{link}\n\n\
             The link expires in {} hours.",
            user.first_name, self.config.verification_ttl_hours
        );
        self.mailer
            .send(EmailMessage {
                from: self.config.from_address.clone(),
                to: user.email.clone(),
                subject: "Verify your email address".to_owned(),
                body,
            })
            .await
    }

    /// Confirm a completed verification
    ///
    /// # Errors
    ///
    /// Returns an error if delivery fails
    pub async fn send_verified_confirmation(&self, user: &User) -> AppResult<()> {
        self.mailer
            .send(EmailMessage {
                from: self.config.from_address.clone(),
                to: user.email.clone(),
                subject: "Your email address is verified".to_owned(),
                body: format!(
                    "Hi {},\n\nYour email address has been verified. Welcome aboard!",
                    user.first_name
                ),
            })
            .await
    }
}
