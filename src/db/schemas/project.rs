//! Project document schema
//!
//! A project owns an ordered list of milestones, embedded in the project
//! document so a milestone change and the progress recompute land in one
//! atomic single-document write. `progress` is always derived from the
//! milestones; it is never edited independently.

use bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;
use crate::status::MilestoneStatus;

/// Collection name for projects
pub const PROJECT_COLLECTION: &str = "projects";

/// A milestone embedded in its owning project
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Milestone {
    /// Stable id within the project
    pub id: Uuid,

    pub title: String,

    #[serde(default)]
    pub status: MilestoneStatus,

    /// Set on the first transition to completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime>,

    /// Flipped exactly once, when the completion XP effect is emitted
    #[serde(default)]
    pub xp_awarded: bool,
}

impl Milestone {
    /// Create a pending milestone
    pub fn new(title: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            status: MilestoneStatus::Pending,
            completed_at: None,
            xp_awarded: false,
        }
    }
}

/// Project document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ProjectDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at, is_deleted)
    #[serde(default)]
    pub metadata: Metadata,

    /// Team member who owns the project
    pub owner_id: String,

    pub name: String,

    /// Ordered milestones
    #[serde(default)]
    pub milestones: Vec<Milestone>,

    /// Derived completion percentage, 0-100
    #[serde(default)]
    pub progress: i32,

    /// Flipped exactly once, when progress first reaches 100
    #[serde(default)]
    pub completion_xp_awarded: bool,

    /// Monotonic version for compare-and-swap updates
    #[serde(default)]
    pub version: i64,
}

impl ProjectDoc {
    /// Create a project with pending milestones from the given titles
    pub fn new(owner_id: String, name: String, milestone_titles: Vec<String>) -> Self {
        Self {
            _id: None,
            metadata: Metadata::new(),
            owner_id,
            name,
            milestones: milestone_titles.into_iter().map(Milestone::new).collect(),
            progress: 0,
            completion_xp_awarded: false,
            version: 0,
        }
    }

    /// Find a milestone by id
    pub fn milestone(&self, milestone_id: Uuid) -> Option<&Milestone> {
        self.milestones.iter().find(|m| m.id == milestone_id)
    }
}

impl IntoIndexes for ProjectDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "owner_id": 1 },
            Some(
                IndexOptions::builder()
                    .name("owner_index".to_string())
                    .build(),
            ),
        )]
    }
}

impl MutMetadata for ProjectDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_project_starts_at_zero() {
        let project = ProjectDoc::new(
            "u1".to_string(),
            "Market validation".to_string(),
            vec!["Interviews".to_string(), "Survey".to_string()],
        );
        assert_eq!(project.progress, 0);
        assert_eq!(project.milestones.len(), 2);
        assert!(project
            .milestones
            .iter()
            .all(|m| m.status == MilestoneStatus::Pending && !m.xp_awarded));
    }

    #[test]
    fn test_milestone_lookup() {
        let project = ProjectDoc::new(
            "u1".to_string(),
            "P".to_string(),
            vec!["A".to_string()],
        );
        let id = project.milestones[0].id;
        assert_eq!(project.milestone(id).unwrap().title, "A");
        assert!(project.milestone(Uuid::new_v4()).is_none());
    }
}
