use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials as SmtpCredentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;
use tracing::info;

use super::{Notification, Notifier};
use crate::config::{Credentials, SmtpSettings};
use crate::error::NotifyError;

/// Sends notifications through an SMTP relay with STARTTLS.
///
/// Mail goes from the configured sender to the same address.
pub struct SmtpNotifier {
    settings: SmtpSettings,
    sender: Option<String>,
    password: Option<String>,
    timeout: Duration,
}

impl SmtpNotifier {
    pub fn new(settings: SmtpSettings, credentials: &Credentials, timeout: Duration) -> Self {
        Self {
            settings,
            sender: credentials.sender_email.clone(),
            password: credentials.sender_password.clone(),
            timeout,
        }
    }

    /// Build the message without sending it.
    pub fn build_message(&self, notification: &Notification) -> Result<Message, NotifyError> {
        let sender = self.sender.as_deref().ok_or(NotifyError::NotConfigured)?;
        let mailbox: Mailbox = sender
            .parse()
            .map_err(|e| NotifyError::Address(format!("{}: {}", sender, e)))?;

        Message::builder()
            .from(mailbox.clone())
            .to(mailbox)
            .subject(notification.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(notification.body.clone())
            .map_err(|e| NotifyError::Message(e.to_string()))
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let message = self.build_message(notification)?;
        let (Some(user), Some(password)) = (self.sender.clone(), self.password.clone()) else {
            return Err(NotifyError::NotConfigured);
        };

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.settings.host)
            .map_err(|e| NotifyError::Smtp(e.to_string()))?
            .port(self.settings.port)
            .credentials(SmtpCredentials::new(user, password))
            .timeout(Some(self.timeout))
            .build();

        transport
            .send(message)
            .await
            .map_err(|e| NotifyError::Smtp(e.to_string()))?;
        info!("Sent \"{}\" via {}", notification.subject, self.settings.host);
        Ok(())
    }
}
