//! Notification service client
//!
//! One operation: create a notification for a user. The service returns no
//! payload the core relies on; only the HTTP status is checked.

use serde::Serialize;

use crate::effects::{Notification, NotificationPriority};
use crate::types::Result;

/// Client for the notification service
#[derive(Debug, Clone)]
pub struct NotificationClient {
    http: reqwest::Client,
    base_url: String,
}

/// Wire body for the create-notification operation
#[derive(Debug, Serialize)]
struct CreateNotificationBody<'a> {
    user_id: &'a str,
    #[serde(rename = "type")]
    notification_type: &'a str,
    priority: NotificationPriority,
    title: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    link: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<&'a serde_json::Value>,
}

impl NotificationClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Create a notification for a single recipient.
    ///
    /// Fan-out over [`Notification::recipients`] happens in the dispatcher so
    /// one recipient's failure cannot block the others.
    pub async fn create_for(&self, user_id: &str, notification: &Notification) -> Result<()> {
        let body = CreateNotificationBody {
            user_id,
            notification_type: &notification.notification_type,
            priority: notification.priority,
            title: &notification.title,
            message: &notification.message,
            link: notification.link.as_deref(),
            metadata: notification.metadata.as_ref(),
        };

        self.http
            .post(format!("{}/notifications", self.base_url))
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_serialization() {
        let notification = Notification {
            recipients: vec!["u1".to_string(), "u2".to_string()],
            notification_type: "application_status".to_string(),
            priority: NotificationPriority::Normal,
            title: "Status changed".to_string(),
            message: "under_review".to_string(),
            link: Some("/applications/a1".to_string()),
            metadata: None,
        };
        let body = CreateNotificationBody {
            user_id: "u1",
            notification_type: &notification.notification_type,
            priority: notification.priority,
            title: &notification.title,
            message: &notification.message,
            link: notification.link.as_deref(),
            metadata: None,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["user_id"], "u1");
        assert_eq!(json["type"], "application_status");
        assert_eq!(json["priority"], "normal");
        assert_eq!(json["link"], "/applications/a1");
        assert!(json.get("metadata").is_none());
    }
}
