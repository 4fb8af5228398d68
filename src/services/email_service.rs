//! Outgoing email for `POST /design/send_email`.
//!
//! [`SmtpMailer`] wraps lettre's async SMTP transport. When the `email`
//! section is absent from the settings a [`DisabledMailer`] is installed and
//! every send fails with [`EmailError::NotConfigured`].

use crate::config::EmailSettings;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("email delivery is not configured")]
    NotConfigured,

    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Email build error: {0}")]
    Build(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<(), EmailError>;
}

pub struct SmtpMailer {
    from_address: String,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(settings: &EmailSettings) -> Result<Self, EmailError> {
        // Fail at startup rather than on the first send
        settings.from_address.parse::<lettre::Address>()?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.smtp_host)?
            .port(settings.smtp_port);

        if let (Some(user), Some(pass)) = (&settings.username, &settings.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            from_address: settings.from_address.clone(),
            transport: builder.build(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), EmailError> {
        let message = Message::builder()
            .from(self.from_address.parse()?)
            .to(email.to.parse()?)
            .subject(email.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(email.body)
            .map_err(|e| EmailError::Build(e.to_string()))?;

        self.transport.send(message).await?;

        tracing::info!(to = %email.to, "Design email sent");
        Ok(())
    }
}

pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), EmailError> {
        tracing::warn!(to = %email.to, "Email requested but SMTP is not configured");
        Err(EmailError::NotConfigured)
    }
}

pub fn mailer_from_settings(settings: Option<&EmailSettings>) -> Result<Arc<dyn Mailer>, EmailError> {
    match settings {
        Some(settings) => {
            tracing::info!("SMTP mailer configured for {}", settings.smtp_host);
            Ok(Arc::new(SmtpMailer::new(settings)?))
        }
        None => {
            tracing::info!("No email settings, send_email is disabled");
            Ok(Arc::new(DisabledMailer))
        }
    }
}
