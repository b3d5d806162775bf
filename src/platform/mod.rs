//! Operation surface of the engine
//!
//! [`Platform`] binds the pure domain processors to their MongoDB
//! collections and the side-effect dispatcher. Every mutation follows the
//! same shape: load the document, apply the pure processor, commit with a
//! compare-and-swap on the document's version, and only then hand the
//! transition's effects to the dispatcher - so a dispatched notification
//! never describes state that was not actually committed, and a stale
//! write surfaces `Conflict` instead of silently overwriting a newer one.

use bson::{doc, oid::ObjectId, DateTime};
use tracing::{debug, info};
use uuid::Uuid;

use crate::achievements;
use crate::auth::Actor;
use crate::config::Args;
use crate::db::schemas::{
    ApplicationDoc, EnrollmentDoc, ProjectDoc, UserAchievementDoc, APPLICATION_COLLECTION,
    ENROLLMENT_COLLECTION, PROJECT_COLLECTION, USER_ACHIEVEMENT_COLLECTION,
};
use crate::db::{MongoClient, MongoCollection};
use crate::effects::DispatcherHandle;
use crate::progress;
use crate::review;
use crate::status::{ApplicationStatus, MilestoneStatus};
use crate::types::{LaunchpadError, Result};

/// The engine's operation surface, shared behind an `Arc` by the layer
/// that mounts it
pub struct Platform {
    applications: MongoCollection<ApplicationDoc>,
    projects: MongoCollection<ProjectDoc>,
    enrollments: MongoCollection<EnrollmentDoc>,
    achievements: MongoCollection<UserAchievementDoc>,
    dispatcher: DispatcherHandle,
}

impl Platform {
    /// Connect to MongoDB and initialize all collections
    pub async fn connect(args: &Args, dispatcher: DispatcherHandle) -> Result<Self> {
        let mongo = MongoClient::new(&args.mongodb_uri, &args.mongodb_db).await?;
        Self::with_client(&mongo, dispatcher).await
    }

    /// Build the platform on an existing client (shared across services)
    pub async fn with_client(mongo: &MongoClient, dispatcher: DispatcherHandle) -> Result<Self> {
        Ok(Self {
            applications: mongo.collection(APPLICATION_COLLECTION).await?,
            projects: mongo.collection(PROJECT_COLLECTION).await?,
            enrollments: mongo.collection(ENROLLMENT_COLLECTION).await?,
            achievements: mongo.collection(USER_ACHIEVEMENT_COLLECTION).await?,
            dispatcher,
        })
    }

    // =========================================================================
    // Applications
    // =========================================================================

    /// Create an application for a user at the `submitted` status.
    ///
    /// A user has at most one live (non-withdrawn) application; the partial
    /// unique index backstops the pre-check under concurrency.
    pub async fn submit_application(&self, user_id: &str) -> Result<ApplicationDoc> {
        let existing = self
            .applications
            .find_one(doc! {
                "user_id": user_id,
                "status": { "$ne": ApplicationStatus::Withdrawn.as_str() },
            })
            .await?;
        if existing.is_some() {
            return Err(LaunchpadError::Conflict(format!(
                "user {} already has a live application",
                user_id
            )));
        }

        let mut application = ApplicationDoc::new(user_id.to_string());
        let id = self.applications.insert_one(application.clone()).await?;
        application._id = Some(id);

        info!(user_id = %user_id, application_id = %id.to_hex(), "Application submitted");
        Ok(application)
    }

    /// Change an application's status through the review state machine.
    ///
    /// Errors: `NotFound` (unknown id), `InvalidTransition` (illegal edge),
    /// `Validation` (missing required notes), `Forbidden` (actor role cannot
    /// take the edge), `Conflict` (concurrent modification). A request equal
    /// to the current status is a no-op that writes and dispatches nothing.
    pub async fn change_status(
        &self,
        application_id: &str,
        requested: ApplicationStatus,
        actor: &Actor,
        notes: &str,
    ) -> Result<ApplicationDoc> {
        let id = ObjectId::parse_str(application_id)?;
        let application = self
            .applications
            .find_one(doc! { "_id": id })
            .await?
            .ok_or_else(|| LaunchpadError::NotFound(format!("application {}", application_id)))?;

        let outcome =
            review::apply_review(&application, requested, actor, notes, DateTime::now())?;

        if !outcome.transition.is_change() {
            debug!(
                application_id = %application_id,
                status = %requested,
                "Status unchanged; nothing to do"
            );
            return Ok(application);
        }

        let updated = &outcome.application;
        let mut set = doc! {
            "status": updated.status.as_str(),
            "review_notes": bson::to_bson(&updated.review_notes)?,
            "club_member_granted": updated.club_member_granted,
        };
        let mut update = doc! {};
        match (&updated.reviewed_by, &updated.reviewed_at) {
            (Some(by), Some(at)) => {
                set.insert("reviewed_by", by.clone());
                set.insert("reviewed_at", *at);
            }
            _ => {
                update.insert("$unset", doc! { "reviewed_by": "", "reviewed_at": "" });
            }
        }
        update.insert("$set", set);

        let committed = self
            .applications
            .update_versioned(doc! { "_id": id }, update, application.version)
            .await?
            .ok_or_else(|| {
                LaunchpadError::Conflict(format!(
                    "application {} was modified concurrently",
                    application_id
                ))
            })?;

        info!(
            application_id = %application_id,
            from = %application.status,
            to = %requested,
            actor = %actor.user_id,
            "Application status changed"
        );
        self.dispatcher.enqueue_all(outcome.effects);

        Ok(committed)
    }

    // =========================================================================
    // Projects
    // =========================================================================

    /// Create a project with pending milestones
    pub async fn create_project(
        &self,
        owner_id: &str,
        name: &str,
        milestone_titles: Vec<String>,
    ) -> Result<ProjectDoc> {
        let mut project =
            ProjectDoc::new(owner_id.to_string(), name.to_string(), milestone_titles);
        let id = self.projects.insert_one(project.clone()).await?;
        project._id = Some(id);

        info!(owner_id = %owner_id, project_id = %id.to_hex(), "Project created");
        Ok(project)
    }

    /// Change a milestone's status and recompute the owning project's
    /// progress in the same atomic write. Returns the new percentage.
    pub async fn set_milestone_status(
        &self,
        project_id: &str,
        milestone_id: Uuid,
        requested: MilestoneStatus,
    ) -> Result<i32> {
        let id = ObjectId::parse_str(project_id)?;
        let project = self
            .projects
            .find_one(doc! { "_id": id })
            .await?
            .ok_or_else(|| LaunchpadError::NotFound(format!("project {}", project_id)))?;

        let outcome =
            progress::apply_milestone_status(&project, milestone_id, requested, DateTime::now())?;

        if !outcome.transition.is_change() {
            return Ok(project.progress);
        }

        let update = doc! {
            "$set": {
                "milestones": bson::to_bson(&outcome.project.milestones)?,
                "progress": outcome.progress,
                "completion_xp_awarded": outcome.project.completion_xp_awarded,
            }
        };
        self.projects
            .update_versioned(doc! { "_id": id }, update, project.version)
            .await?
            .ok_or_else(|| {
                LaunchpadError::Conflict(format!(
                    "project {} was modified concurrently",
                    project_id
                ))
            })?;

        info!(
            project_id = %project_id,
            milestone_id = %milestone_id,
            status = %requested,
            progress = outcome.progress,
            "Milestone updated"
        );
        self.dispatcher.enqueue_all(outcome.effects);

        Ok(outcome.progress)
    }

    /// Recompute a project's stored progress from its milestones.
    ///
    /// Safe to call redundantly: same milestones, same percentage, and no
    /// effects are ever produced here.
    pub async fn recompute_progress(&self, project_id: &str) -> Result<i32> {
        let id = ObjectId::parse_str(project_id)?;
        let project = self
            .projects
            .find_one(doc! { "_id": id })
            .await?
            .ok_or_else(|| LaunchpadError::NotFound(format!("project {}", project_id)))?;

        let completed = project
            .milestones
            .iter()
            .filter(|m| m.status == MilestoneStatus::Completed)
            .count();
        let percentage = progress::recalculate(completed, project.milestones.len());

        if percentage != project.progress {
            self.projects
                .update_versioned(
                    doc! { "_id": id },
                    doc! { "$set": { "progress": percentage } },
                    project.version,
                )
                .await?
                .ok_or_else(|| {
                    LaunchpadError::Conflict(format!(
                        "project {} was modified concurrently",
                        project_id
                    ))
                })?;
        }

        Ok(percentage)
    }

    // =========================================================================
    // Enrollments
    // =========================================================================

    /// Enroll a user in a course
    pub async fn enroll(
        &self,
        user_id: &str,
        course_id: &str,
        total_lessons: u32,
    ) -> Result<EnrollmentDoc> {
        let existing = self
            .enrollments
            .find_one(doc! { "user_id": user_id, "course_id": course_id })
            .await?;
        if existing.is_some() {
            return Err(LaunchpadError::Conflict(format!(
                "user {} is already enrolled in {}",
                user_id, course_id
            )));
        }

        let mut enrollment =
            EnrollmentDoc::new(user_id.to_string(), course_id.to_string(), total_lessons);
        let id = self.enrollments.insert_one(enrollment.clone()).await?;
        enrollment._id = Some(id);

        info!(user_id = %user_id, course_id = %course_id, "Enrolled in course");
        Ok(enrollment)
    }

    /// Record a completed lesson; completing an already-completed lesson is
    /// an idempotent no-op.
    pub async fn complete_lesson(
        &self,
        user_id: &str,
        course_id: &str,
        lesson: u32,
    ) -> Result<EnrollmentDoc> {
        let enrollment = self
            .enrollments
            .find_one(doc! { "user_id": user_id, "course_id": course_id })
            .await?
            .ok_or_else(|| {
                LaunchpadError::NotFound(format!(
                    "enrollment of {} in {}",
                    user_id, course_id
                ))
            })?;

        let outcome = progress::enrollment::complete_lesson(&enrollment, lesson)?;

        if !outcome.changed {
            return Ok(enrollment);
        }

        let update = doc! {
            "$set": {
                "completed_lessons": bson::to_bson(&outcome.enrollment.completed_lessons)?,
                "progress": outcome.enrollment.progress,
                "status": outcome.enrollment.status.as_str(),
            }
        };
        let committed = self
            .enrollments
            .update_versioned(
                doc! { "user_id": user_id, "course_id": course_id },
                update,
                enrollment.version,
            )
            .await?
            .ok_or_else(|| {
                LaunchpadError::Conflict(format!(
                    "enrollment of {} in {} was modified concurrently",
                    user_id, course_id
                ))
            })?;

        debug!(
            user_id = %user_id,
            course_id = %course_id,
            lesson = lesson,
            progress = committed.progress,
            "Lesson completed"
        );
        self.dispatcher.enqueue_all(outcome.effects);

        Ok(committed)
    }

    // =========================================================================
    // Achievements
    // =========================================================================

    /// Report achievement progress, find-or-creating the per-user record.
    ///
    /// A record that is already completed is returned unchanged no matter
    /// what is reported; the unlock timestamp is written exactly once.
    pub async fn report_achievement_progress(
        &self,
        user_id: &str,
        achievement_id: &str,
        progress: i32,
    ) -> Result<UserAchievementDoc> {
        let filter = doc! { "user_id": user_id, "achievement_id": achievement_id };

        let record = match self.achievements.find_one(filter.clone()).await? {
            Some(record) => record,
            None => {
                let mut record =
                    UserAchievementDoc::new(user_id.to_string(), achievement_id.to_string());
                let id = self.achievements.insert_one(record.clone()).await?;
                record._id = Some(id);
                record
            }
        };

        let outcome = achievements::apply_progress(&record, progress, DateTime::now())?;

        if !outcome.changed {
            return Ok(record);
        }

        let mut set = doc! {
            "progress": outcome.record.progress,
            "is_completed": outcome.record.is_completed,
        };
        if let Some(unlocked_at) = outcome.record.unlocked_at {
            set.insert("unlocked_at", unlocked_at);
        }
        let committed = self
            .achievements
            .update_versioned(filter, doc! { "$set": set }, record.version)
            .await?
            .ok_or_else(|| {
                LaunchpadError::Conflict(format!(
                    "achievement {} for {} was modified concurrently",
                    achievement_id, user_id
                ))
            })?;

        if committed.is_completed {
            info!(
                user_id = %user_id,
                achievement_id = %achievement_id,
                "Achievement unlocked"
            );
        }
        self.dispatcher.enqueue_all(outcome.effects);

        Ok(committed)
    }
}

#[cfg(test)]
mod tests {
    // Platform methods compose the pure processors (tested in their own
    // modules) with MongoDB writes; they are exercised against a running
    // MongoDB instance in the deployment's integration environment.
}
