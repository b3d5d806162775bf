//! Side effects produced by state transitions
//!
//! A transition returns zero or more [`Effect`] values instead of calling
//! downstream services itself. Effects are transient - they carry no
//! identity and are never persisted - and are executed strictly after the
//! transition's write has committed, by the [`dispatcher`].

pub mod dispatcher;

use serde::{Deserialize, Serialize};

use crate::auth::Role;

pub use dispatcher::{spawn_dispatcher, DispatcherConfig, DispatcherHandle};

/// A unit of downstream work produced by a state transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Effect {
    /// Create a notification for one or more users
    Notify(Notification),
    /// Award XP for a completion event
    AwardXp(XpAward),
    /// Add a role to a user's role set
    ElevateRole(RoleGrant),
}

/// Notification priorities understood by the notification service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPriority {
    Low,
    Normal,
    High,
}

/// Payload for the notification service's create-notification operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Recipient user ids; each is delivered as an independent call
    pub recipients: Vec<String>,
    /// Notification type tag (e.g. "application_status", "achievement")
    #[serde(rename = "type")]
    pub notification_type: String,
    pub priority: NotificationPriority,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// XP event kinds, keyed the way the XP service's webhooks are
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XpEvent {
    MilestoneComplete,
    ProjectComplete,
    LessonComplete,
    CourseComplete,
    AchievementUnlock,
}

impl XpEvent {
    /// Webhook path segment for this event kind
    pub fn webhook_path(&self) -> &'static str {
        match self {
            XpEvent::MilestoneComplete => "milestone/complete",
            XpEvent::ProjectComplete => "project/complete",
            XpEvent::LessonComplete => "lesson/complete",
            XpEvent::CourseComplete => "course/complete",
            XpEvent::AchievementUnlock => "achievement/unlock",
        }
    }
}

/// Payload for an XP-award webhook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XpAward {
    pub event: XpEvent,
    pub user_id: String,
    /// Id of the completed entity (milestone, project, course, achievement)
    pub entity_id: String,
}

/// Payload for an identity-service role grant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleGrant {
    pub user_id: String,
    pub role: Role,
}

impl Effect {
    /// Short label for logging
    pub fn label(&self) -> &'static str {
        match self {
            Effect::Notify(_) => "notify",
            Effect::AwardXp(_) => "award_xp",
            Effect::ElevateRole(_) => "elevate_role",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_serialization_is_tagged() {
        let effect = Effect::AwardXp(XpAward {
            event: XpEvent::MilestoneComplete,
            user_id: "u1".to_string(),
            entity_id: "m1".to_string(),
        });
        let json = serde_json::to_value(&effect).unwrap();
        assert_eq!(json["kind"], "award_xp");
        assert_eq!(json["event"], "milestone_complete");
    }

    #[test]
    fn test_notification_type_field_name() {
        let effect = Effect::Notify(Notification {
            recipients: vec!["u1".to_string()],
            notification_type: "application_status".to_string(),
            priority: NotificationPriority::High,
            title: "Application approved".to_string(),
            message: "approved".to_string(),
            link: None,
            metadata: None,
        });
        let json = serde_json::to_value(&effect).unwrap();
        assert_eq!(json["type"], "application_status");
        assert!(json.get("link").is_none());
    }

    #[test]
    fn test_webhook_paths() {
        assert_eq!(XpEvent::ProjectComplete.webhook_path(), "project/complete");
        assert_eq!(
            XpEvent::AchievementUnlock.webhook_path(),
            "achievement/unlock"
        );
    }
}
