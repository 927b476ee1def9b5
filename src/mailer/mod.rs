use std::fmt;

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::Mailbox,
    transport::smtp::authentication::Credentials,
};

use crate::config::Config;

#[derive(Debug)]
pub enum MailError {
    Address(lettre::address::AddressError),
    Build(lettre::error::Error),
    Smtp(lettre::transport::smtp::Error),
}

impl fmt::Display for MailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MailError::Address(e) => write!(f, "invalid address: {}", e),
            MailError::Build(e) => write!(f, "failed to build message: {}", e),
            MailError::Smtp(e) => write!(f, "smtp error: {}", e),
        }
    }
}

impl std::error::Error for MailError {}

impl From<lettre::address::AddressError> for MailError {
    fn from(e: lettre::address::AddressError) -> Self {
        MailError::Address(e)
    }
}

impl From<lettre::error::Error> for MailError {
    fn from(e: lettre::error::Error) -> Self {
        MailError::Build(e)
    }
}

impl From<lettre::transport::smtp::Error> for MailError {
    fn from(e: lettre::transport::smtp::Error) -> Self {
        MailError::Smtp(e)
    }
}

/// SMTP transport for the signup verification code.
#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl Mailer {
    /// Returns `None` when the SMTP credentials are not configured; the
    /// caller falls back to logging the code instead of mailing it.
    pub fn from_config(config: &Config) -> Option<Self> {
        let host = config.smtp_host.as_deref()?;
        let user = config.smtp_user.as_deref()?;
        let pass = config.smtp_pass.as_deref()?;
        let from = config
            .smtp_from
            .as_deref()
            .unwrap_or(user)
            .parse::<Mailbox>()
            .ok()?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .ok()?
            .credentials(Credentials::new(user.to_string(), pass.to_string()))
            .build();

        Some(Self { transport, from })
    }

    pub async fn send_verification_code(&self, to: &str, code: &str) -> Result<(), MailError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to.parse::<Mailbox>()?)
            .subject("رمز التحقق - راوي")
            .body(format!(
                "مرحباً بك في راوي!\n\nرمز التحقق الخاص بك هو: {}\n\nأدخل هذا الرمز لإكمال إنشاء حسابك.",
                code
            ))?;

        self.transport.send(message).await?;
        Ok(())
    }
}
