//! Outbound user notifications.

use async_trait::async_trait;
use atrium_shared::{EmailAction, EmailError, EmailPayload, EmailService};
use thiserror::Error;

/// Notification delivery failure.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// The message could not be composed (bad address, bad template input).
    #[error("notification could not be built: {0}")]
    Build(String),
    /// The transport rejected or failed to deliver the message.
    #[error("notification delivery failed: {0}")]
    Delivery(String),
}

impl From<EmailError> for NotificationError {
    fn from(err: EmailError) -> Self {
        match err {
            EmailError::SendError(msg) => Self::Delivery(msg),
            EmailError::BuildError(msg) | EmailError::InvalidAddress(msg) => Self::Build(msg),
        }
    }
}

/// Sends a templated notification for an action to one recipient.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver `action` rendered with `payload` to `recipient`.
    async fn send(
        &self,
        recipient: &str,
        action: EmailAction,
        payload: EmailPayload,
    ) -> Result<(), NotificationError>;
}

#[async_trait]
impl Mailer for EmailService {
    async fn send(
        &self,
        recipient: &str,
        action: EmailAction,
        payload: EmailPayload,
    ) -> Result<(), NotificationError> {
        self.send_action(recipient, action, &payload)
            .await
            .map_err(NotificationError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atrium_shared::EmailConfig;

    #[test]
    fn test_email_error_mapping() {
        assert!(matches!(
            NotificationError::from(EmailError::SendError("refused".into())),
            NotificationError::Delivery(_)
        ));
        assert!(matches!(
            NotificationError::from(EmailError::InvalidAddress("x".into())),
            NotificationError::Build(_)
        ));
    }

    #[tokio::test]
    async fn test_invalid_recipient_fails_before_transport() {
        let mailer: &dyn Mailer = &EmailService::new(EmailConfig::default());
        let result = mailer
            .send(
                "not an address",
                EmailAction::UserDelete,
                EmailPayload {
                    name: "Ada".into(),
                    email: "not an address".into(),
                    age: None,
                },
            )
            .await;

        assert!(matches!(result, Err(NotificationError::Build(_))));
    }
}
