//! Application document schema
//!
//! One person's request to join the program. At most one non-withdrawn
//! application exists per user, enforced by a partial unique index.
//! Applications are never hard-deleted; withdrawal is a status transition.

use bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;
use crate::status::ApplicationStatus;

/// Collection name for applications
pub const APPLICATION_COLLECTION: &str = "applications";

/// One audit-trail entry from a review action
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ReviewNote {
    /// Reviewer (or director) who performed the action
    pub author_id: String,
    /// Status the application moved to
    pub status: ApplicationStatus,
    /// Free-text note; required for audited statuses
    pub note: String,
    /// When the action was taken
    pub at: DateTime,
}

/// Application document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ApplicationDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at, is_deleted)
    #[serde(default)]
    pub metadata: Metadata,

    /// Owning user
    pub user_id: String,

    /// Current lifecycle status
    #[serde(default)]
    pub status: ApplicationStatus,

    /// Append-only audit trail of review actions
    #[serde(default)]
    pub review_notes: Vec<ReviewNote>,

    /// Actor of the most recent review action
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,

    /// Set iff status has left `submitted`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime>,

    /// Flipped exactly once, when the club-membership grant is emitted
    #[serde(default)]
    pub club_member_granted: bool,

    /// Monotonic version for compare-and-swap updates
    #[serde(default)]
    pub version: i64,
}

impl ApplicationDoc {
    /// Create a new application at the initial `submitted` status
    pub fn new(user_id: String) -> Self {
        Self {
            _id: None,
            metadata: Metadata::new(),
            user_id,
            status: ApplicationStatus::Submitted,
            review_notes: Vec::new(),
            reviewed_by: None,
            reviewed_at: None,
            club_member_granted: false,
            version: 0,
        }
    }
}

impl IntoIndexes for ApplicationDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            // One live (non-withdrawn) application per user
            (
                doc! { "user_id": 1 },
                Some(
                    IndexOptions::builder()
                        .unique(true)
                        .partial_filter_expression(doc! {
                            "status": { "$ne": ApplicationStatus::Withdrawn.as_str() }
                        })
                        .name("user_live_application_unique".to_string())
                        .build(),
                ),
            ),
            // Status index for reviewer queues
            (
                doc! { "status": 1 },
                Some(
                    IndexOptions::builder()
                        .name("status_index".to_string())
                        .build(),
                ),
            ),
        ]
    }
}

impl MutMetadata for ApplicationDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_application_shape() {
        let app = ApplicationDoc::new("u1".to_string());
        assert_eq!(app.status, ApplicationStatus::Submitted);
        assert!(app.reviewed_at.is_none());
        assert!(app.review_notes.is_empty());
        assert!(!app.club_member_granted);
        assert_eq!(app.version, 0);
    }

    #[test]
    fn test_status_round_trips_through_bson() {
        let app = ApplicationDoc {
            status: ApplicationStatus::InterviewScheduled,
            ..ApplicationDoc::new("u1".to_string())
        };
        let doc = bson::to_document(&app).unwrap();
        assert_eq!(
            doc.get_str("status").unwrap(),
            "interview_scheduled"
        );
        let back: ApplicationDoc = bson::from_document(doc).unwrap();
        assert_eq!(back.status, ApplicationStatus::InterviewScheduled);
    }
}
