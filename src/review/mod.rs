//! Review action processor
//!
//! Applies a validated status transition to an application, stamping the
//! audit fields and emitting the transition's effects. Pure - the store
//! read and the compare-and-swap write wrap around this in
//! [`crate::platform::Platform::change_status`].

use bson::DateTime;

use crate::auth::{Actor, Role};
use crate::db::schemas::{ApplicationDoc, ReviewNote};
use crate::effects::{Effect, Notification, NotificationPriority, RoleGrant};
use crate::status::{application_transition, ApplicationStatus, Transition};
use crate::types::{LaunchpadError, Result};

/// Result of applying a review action
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    /// The application with the transition applied (unchanged for a no-op)
    pub application: ApplicationDoc,
    /// What kind of transition this was
    pub transition: Transition,
    /// Effects to dispatch after the write commits; empty for a no-op
    pub effects: Vec<Effect>,
}

/// Apply a review action to an application.
///
/// Validates the edge for the actor's role, enforces the notes rule for
/// audited statuses, stamps `reviewed_by`/`reviewed_at`, appends the audit
/// note, and computes the effects the transition owes: one notification
/// describing the new status, plus - exactly once per application - the
/// club-membership elevation when a membership-granting status is reached.
///
/// A request equal to the current status is a legal no-op: the returned
/// application is untouched and no effects are produced.
pub fn apply_review(
    application: &ApplicationDoc,
    requested: ApplicationStatus,
    actor: &Actor,
    notes: &str,
    now: DateTime,
) -> Result<ReviewOutcome> {
    let transition = application_transition(application.status, requested, actor.level())?;

    if transition == Transition::Noop {
        return Ok(ReviewOutcome {
            application: application.clone(),
            transition,
            effects: Vec::new(),
        });
    }

    if requested.requires_notes() && notes.trim().is_empty() {
        return Err(LaunchpadError::Validation(format!(
            "review notes are required when moving to {}",
            requested
        )));
    }

    let previous = application.status;
    let mut updated = application.clone();
    updated.status = requested;
    updated.review_notes.push(ReviewNote {
        author_id: actor.user_id.clone(),
        status: requested,
        note: notes.to_string(),
        at: now,
    });

    // reviewed_at is set iff the application has left its initial state;
    // a forced reset back to submitted clears the stamps again
    if requested == ApplicationStatus::Submitted {
        updated.reviewed_by = None;
        updated.reviewed_at = None;
    } else {
        updated.reviewed_by = Some(actor.user_id.clone());
        updated.reviewed_at = Some(now);
    }

    let mut effects = Vec::new();

    if requested.grants_membership() && !updated.club_member_granted {
        updated.club_member_granted = true;
        effects.push(Effect::ElevateRole(RoleGrant {
            user_id: updated.user_id.clone(),
            role: Role::ClubMember,
        }));
    }

    effects.push(Effect::Notify(status_notification(
        &updated, previous, requested,
    )));

    Ok(ReviewOutcome {
        application: updated,
        transition,
        effects,
    })
}

/// Notification describing a status change, addressed to the applicant
fn status_notification(
    application: &ApplicationDoc,
    previous: ApplicationStatus,
    current: ApplicationStatus,
) -> Notification {
    let priority = if current.is_terminal() || current.grants_membership() {
        NotificationPriority::High
    } else {
        NotificationPriority::Normal
    };

    Notification {
        recipients: vec![application.user_id.clone()],
        notification_type: "application_status".to_string(),
        priority,
        title: "Application status updated".to_string(),
        message: current.to_string(),
        link: application
            ._id
            .map(|id| format!("/applications/{}", id.to_hex())),
        metadata: Some(serde_json::json!({
            "previous": previous,
            "status": current,
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reviewer() -> Actor {
        Actor::new("rev-1", Role::Reviewer)
    }

    fn director() -> Actor {
        Actor::new("dir-1", Role::Director)
    }

    fn submitted_app() -> ApplicationDoc {
        ApplicationDoc::new("u1".to_string())
    }

    fn elevation_count(effects: &[Effect]) -> usize {
        effects
            .iter()
            .filter(|e| matches!(e, Effect::ElevateRole(_)))
            .count()
    }

    #[test]
    fn test_full_review_path_to_approved() {
        let now = DateTime::now();
        let app = submitted_app();

        let step1 = apply_review(
            &app,
            ApplicationStatus::UnderReview,
            &reviewer(),
            "قابل قبول",
            now,
        )
        .unwrap();
        assert_eq!(step1.application.status, ApplicationStatus::UnderReview);
        assert_eq!(step1.application.reviewed_by.as_deref(), Some("rev-1"));
        assert!(step1.application.reviewed_at.is_some());
        assert_eq!(elevation_count(&step1.effects), 0);

        let step2 = apply_review(
            &step1.application,
            ApplicationStatus::Approved,
            &reviewer(),
            "قابل قبول",
            now,
        )
        .unwrap();
        assert_eq!(step2.application.status, ApplicationStatus::Approved);
        assert!(step2.application.reviewed_at.is_some());
        assert_eq!(step2.application.review_notes.len(), 2);
        // Exactly one elevation, fired on the approved transition
        assert_eq!(elevation_count(&step2.effects), 1);
        assert!(step2.application.club_member_granted);
    }

    #[test]
    fn test_every_change_notifies_the_applicant() {
        let outcome = apply_review(
            &submitted_app(),
            ApplicationStatus::UnderReview,
            &reviewer(),
            "",
            DateTime::now(),
        )
        .unwrap();
        let notified = outcome.effects.iter().any(|e| match e {
            Effect::Notify(n) => {
                n.recipients == vec!["u1".to_string()] && n.message == "under_review"
            }
            _ => false,
        });
        assert!(notified);
    }

    #[test]
    fn test_empty_notes_rejected_for_audited_statuses() {
        let mut app = submitted_app();
        app.status = ApplicationStatus::UnderReview;

        let err = apply_review(&app, ApplicationStatus::Rejected, &reviewer(), "", DateTime::now())
            .unwrap_err();
        assert!(matches!(err, LaunchpadError::Validation(_)));
        // Whitespace does not count as notes
        let err = apply_review(
            &app,
            ApplicationStatus::Approved,
            &reviewer(),
            "   ",
            DateTime::now(),
        )
        .unwrap_err();
        assert!(matches!(err, LaunchpadError::Validation(_)));
        // The source application was not touched
        assert_eq!(app.status, ApplicationStatus::UnderReview);
        assert!(app.review_notes.is_empty());
    }

    #[test]
    fn test_noop_replay_fires_no_effects() {
        let mut app = submitted_app();
        app.status = ApplicationStatus::Approved;
        app.club_member_granted = true;

        let outcome = apply_review(
            &app,
            ApplicationStatus::Approved,
            &reviewer(),
            "again",
            DateTime::now(),
        )
        .unwrap();
        assert_eq!(outcome.transition, Transition::Noop);
        assert!(outcome.effects.is_empty());
        assert_eq!(outcome.application.review_notes.len(), 0);
    }

    #[test]
    fn test_membership_granted_at_most_once() {
        let now = DateTime::now();
        let mut app = submitted_app();
        app.status = ApplicationStatus::Approved;
        app.club_member_granted = true;

        // approved -> interview_scheduled -> accepted: accepted would grant,
        // but the application already did
        let step1 = apply_review(
            &app,
            ApplicationStatus::InterviewScheduled,
            &reviewer(),
            "",
            now,
        )
        .unwrap();
        let step2 = apply_review(
            &step1.application,
            ApplicationStatus::Accepted,
            &reviewer(),
            "welcome",
            now,
        )
        .unwrap();
        assert_eq!(elevation_count(&step2.effects), 0);
        assert!(step2.application.club_member_granted);
    }

    #[test]
    fn test_direct_accept_by_director_grants_membership() {
        let outcome = apply_review(
            &submitted_app(),
            ApplicationStatus::Accepted,
            &director(),
            "fast-tracked",
            DateTime::now(),
        )
        .unwrap();
        assert_eq!(outcome.transition, Transition::Forced);
        assert_eq!(elevation_count(&outcome.effects), 1);
    }

    #[test]
    fn test_forced_reset_clears_review_stamps() {
        let mut app = submitted_app();
        app.status = ApplicationStatus::Rejected;
        app.reviewed_by = Some("rev-1".to_string());
        app.reviewed_at = Some(DateTime::now());

        let outcome = apply_review(
            &app,
            ApplicationStatus::Submitted,
            &director(),
            "re-opening",
            DateTime::now(),
        )
        .unwrap();
        assert_eq!(outcome.application.status, ApplicationStatus::Submitted);
        assert!(outcome.application.reviewed_at.is_none());
        assert!(outcome.application.reviewed_by.is_none());
    }

    #[test]
    fn test_club_member_cannot_review() {
        let err = apply_review(
            &submitted_app(),
            ApplicationStatus::UnderReview,
            &Actor::new("u2", Role::ClubMember),
            "",
            DateTime::now(),
        )
        .unwrap_err();
        assert!(matches!(err, LaunchpadError::Forbidden(_)));
    }
}
