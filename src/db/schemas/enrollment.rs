//! Course enrollment document schema
//!
//! Per-user, per-course record. `completed_lessons` is a set of lesson
//! indices; completing an already-completed lesson is a no-op. `progress`
//! is derived from the set, never edited independently.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;
use crate::status::EnrollmentStatus;

/// Collection name for course enrollments
pub const ENROLLMENT_COLLECTION: &str = "enrollments";

/// Enrollment document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct EnrollmentDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at, is_deleted)
    #[serde(default)]
    pub metadata: Metadata,

    pub user_id: String,

    pub course_id: String,

    #[serde(default)]
    pub status: EnrollmentStatus,

    /// Lesson count for the course at enrollment time
    pub total_lessons: u32,

    /// Indices of completed lessons, kept sorted
    #[serde(default)]
    pub completed_lessons: Vec<u32>,

    /// Derived completion percentage, 0-100
    #[serde(default)]
    pub progress: i32,

    /// Monotonic version for compare-and-swap updates
    #[serde(default)]
    pub version: i64,
}

impl EnrollmentDoc {
    /// Create an active enrollment with no completed lessons
    pub fn new(user_id: String, course_id: String, total_lessons: u32) -> Self {
        Self {
            _id: None,
            metadata: Metadata::new(),
            user_id,
            course_id,
            status: EnrollmentStatus::Active,
            total_lessons,
            completed_lessons: Vec::new(),
            progress: 0,
            version: 0,
        }
    }
}

impl IntoIndexes for EnrollmentDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "user_id": 1, "course_id": 1 },
            Some(
                IndexOptions::builder()
                    .unique(true)
                    .name("user_course_unique".to_string())
                    .build(),
            ),
        )]
    }
}

impl MutMetadata for EnrollmentDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_enrollment_shape() {
        let enrollment = EnrollmentDoc::new("u1".to_string(), "c1".to_string(), 12);
        assert_eq!(enrollment.status, EnrollmentStatus::Active);
        assert_eq!(enrollment.total_lessons, 12);
        assert!(enrollment.completed_lessons.is_empty());
        assert_eq!(enrollment.progress, 0);
    }
}
