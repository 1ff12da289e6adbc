//! Email service for sending transactional emails.
//!
//! Uses `lettre` for SMTP transport. Each [`EmailAction`] owns its subject and
//! plain-text template; the payload carries the fields those templates need.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor, message::header::ContentType,
    transport::smtp::authentication::Credentials,
};
use serde::Serialize;
use thiserror::Error;

use crate::config::EmailConfig;

/// Email service errors.
#[derive(Debug, Error)]
pub enum EmailError {
    /// Failed to build email message.
    #[error("Failed to build email: {0}")]
    BuildError(String),
    /// Failed to send email.
    #[error("Failed to send email: {0}")]
    SendError(String),
    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// Kinds of user notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmailAction {
    /// Sent after registration.
    Welcome,
    /// Sent after an account has been removed.
    UserDelete,
    /// Sent after account details changed.
    UserUpdate,
}

impl EmailAction {
    /// Subject line for this action.
    #[must_use]
    pub const fn subject(self) -> &'static str {
        match self {
            Self::Welcome => "Welcome to Atrium",
            Self::UserDelete => "Your Atrium account was deleted",
            Self::UserUpdate => "Your Atrium account was updated",
        }
    }

    /// Renders the plain-text body for this action.
    #[must_use]
    pub fn render(self, payload: &EmailPayload) -> String {
        let name = &payload.name;
        let email = &payload.email;

        match self {
            Self::Welcome => format!(
                r"Hi {name},

Your account {email} is ready. Welcome aboard!

Best regards,
The Atrium Team"
            ),
            Self::UserDelete => format!(
                r"Hi {name},

The account registered with {email} has been deleted.

If you didn't request this, please contact support.

Best regards,
The Atrium Team"
            ),
            Self::UserUpdate => {
                let age = payload
                    .age
                    .map_or_else(|| "not set".to_string(), |age| age.to_string());
                format!(
                    r"Hi {name},

Your account details were changed. Current details:

Name:  {name}
Email: {email}
Age:   {age}

Best regards,
The Atrium Team"
                )
            }
        }
    }
}

/// Template fields for a user notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailPayload {
    /// Recipient display name.
    pub name: String,
    /// Account email.
    pub email: String,
    /// Age, when the template shows it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    /// Creates a new email service.
    #[must_use]
    pub const fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Creates an SMTP transport.
    fn create_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, EmailError> {
        let builder = if self.config.tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_host)
                .map_err(|e| EmailError::SendError(e.to_string()))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.config.smtp_host)
        }
        .port(self.config.smtp_port);

        let builder = if self.config.smtp_username.is_empty() {
            builder
        } else {
            builder.credentials(Credentials::new(
                self.config.smtp_username.clone(),
                self.config.smtp_password.clone(),
            ))
        };

        Ok(builder.build())
    }

    /// Builds the message for a notification without sending it.
    ///
    /// # Errors
    ///
    /// Returns an error if an address is invalid or the message cannot be built.
    pub fn build_message(
        &self,
        to_email: &str,
        action: EmailAction,
        payload: &EmailPayload,
    ) -> Result<Message, EmailError> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        Message::builder()
            .from(
                from.parse()
                    .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?)
            .subject(action.subject())
            .header(ContentType::TEXT_PLAIN)
            .body(action.render(payload))
            .map_err(|e| EmailError::BuildError(e.to_string()))
    }

    /// Sends the notification for `action` to `to_email`.
    ///
    /// # Errors
    ///
    /// Returns an error if the email cannot be built or sent.
    pub async fn send_action(
        &self,
        to_email: &str,
        action: EmailAction,
        payload: &EmailPayload,
    ) -> Result<(), EmailError> {
        let email = self.build_message(to_email, action, payload)?;

        let transport = self.create_transport()?;
        transport
            .send(email)
            .await
            .map_err(|e| EmailError::SendError(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> EmailPayload {
        EmailPayload {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            age: Some(31),
        }
    }

    #[test]
    fn test_update_template_shows_age() {
        let body = EmailAction::UserUpdate.render(&payload());
        assert!(body.contains("Hi Ada"));
        assert!(body.contains("Age:   31"));
    }

    #[test]
    fn test_update_template_without_age() {
        let body = EmailAction::UserUpdate.render(&EmailPayload {
            age: None,
            ..payload()
        });
        assert!(body.contains("Age:   not set"));
    }

    #[test]
    fn test_delete_template_mentions_email() {
        let body = EmailAction::UserDelete.render(&payload());
        assert!(body.contains("ada@example.com"));
    }

    #[test]
    fn test_build_message() {
        let service = EmailService::new(EmailConfig::default());
        let message = service
            .build_message("ada@example.com", EmailAction::Welcome, &payload())
            .expect("message should build");

        let headers = message.headers().to_string();
        assert!(headers.contains("Subject: Welcome to Atrium"));
        assert!(headers.contains("ada@example.com"));
    }

    #[test]
    fn test_build_message_invalid_recipient() {
        let service = EmailService::new(EmailConfig::default());
        let result = service.build_message("not-an-address", EmailAction::UserDelete, &payload());
        assert!(matches!(result, Err(EmailError::InvalidAddress(_))));
    }

    #[test]
    fn test_create_transport() {
        let service = EmailService::new(EmailConfig::default());
        assert!(service.create_transport().is_ok());
    }

    #[test]
    fn test_action_serializes_like_enum_constant() {
        assert_eq!(
            serde_json::to_string(&EmailAction::UserDelete).unwrap(),
            "\"USER_DELETE\""
        );
    }
}
