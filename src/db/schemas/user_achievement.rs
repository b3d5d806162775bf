//! User achievement document schema
//!
//! Per-user, per-achievement progress record. Once `is_completed` flips it
//! never reverts, and `unlocked_at` is written exactly once, in the same
//! update as the flip.

use bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for user achievements
pub const USER_ACHIEVEMENT_COLLECTION: &str = "user_achievements";

/// User achievement document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct UserAchievementDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at, is_deleted)
    #[serde(default)]
    pub metadata: Metadata,

    pub user_id: String,

    pub achievement_id: String,

    /// Reported progress, 0-100
    #[serde(default)]
    pub progress: i32,

    /// Never reverts once true
    #[serde(default)]
    pub is_completed: bool,

    /// Set exactly once, on the transition to completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unlocked_at: Option<DateTime>,

    /// Monotonic version for compare-and-swap updates
    #[serde(default)]
    pub version: i64,
}

impl UserAchievementDoc {
    /// Create a fresh record at zero progress
    pub fn new(user_id: String, achievement_id: String) -> Self {
        Self {
            _id: None,
            metadata: Metadata::new(),
            user_id,
            achievement_id,
            progress: 0,
            is_completed: false,
            unlocked_at: None,
            version: 0,
        }
    }
}

impl IntoIndexes for UserAchievementDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "user_id": 1, "achievement_id": 1 },
            Some(
                IndexOptions::builder()
                    .unique(true)
                    .name("user_achievement_unique".to_string())
                    .build(),
            ),
        )]
    }
}

impl MutMetadata for UserAchievementDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
