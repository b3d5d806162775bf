//! Achievement unlock evaluation
//!
//! Compares reported progress against the stored per-user record and flips
//! to completed at the 100% threshold. The completed flag never reverts
//! and `unlocked_at` is written exactly once, in the same update as the
//! flip - an already-completed record short-circuits before anything else.

use bson::DateTime;

use crate::db::schemas::UserAchievementDoc;
use crate::effects::{Effect, Notification, NotificationPriority, XpAward, XpEvent};
use crate::types::{LaunchpadError, Result};

/// Result of reporting achievement progress
#[derive(Debug, Clone)]
pub struct AchievementOutcome {
    /// The record with the report applied (unchanged when already completed)
    pub record: UserAchievementDoc,
    /// False when the record was already completed
    pub changed: bool,
    /// Effects to dispatch after the write commits; non-empty only on unlock
    pub effects: Vec<Effect>,
}

/// Apply a progress report to an achievement record.
///
/// Progress outside 0-100 is a validation error. A completed record is
/// returned untouched regardless of the reported value; otherwise the
/// progress is stored and, at 100, the unlock happens as a single state
/// transition: completed flag, `unlocked_at`, XP award, and notification
/// all belong to the same update.
pub fn apply_progress(
    record: &UserAchievementDoc,
    progress: i32,
    now: DateTime,
) -> Result<AchievementOutcome> {
    if !(0..=100).contains(&progress) {
        return Err(LaunchpadError::Validation(format!(
            "achievement progress must be between 0 and 100, got {}",
            progress
        )));
    }

    if record.is_completed {
        return Ok(AchievementOutcome {
            record: record.clone(),
            changed: false,
            effects: Vec::new(),
        });
    }

    let mut updated = record.clone();
    updated.progress = progress;

    let mut effects = Vec::new();

    if progress >= 100 {
        updated.is_completed = true;
        updated.unlocked_at = Some(now);
        effects.push(Effect::AwardXp(XpAward {
            event: XpEvent::AchievementUnlock,
            user_id: updated.user_id.clone(),
            entity_id: updated.achievement_id.clone(),
        }));
        effects.push(Effect::Notify(Notification {
            recipients: vec![updated.user_id.clone()],
            notification_type: "achievement".to_string(),
            priority: NotificationPriority::High,
            title: "Achievement unlocked".to_string(),
            message: updated.achievement_id.clone(),
            link: Some(format!("/achievements/{}", updated.achievement_id)),
            metadata: None,
        }));
    }

    Ok(AchievementOutcome {
        record: updated,
        changed: true,
        effects,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> UserAchievementDoc {
        UserAchievementDoc::new("u1".to_string(), "first_pitch".to_string())
    }

    #[test]
    fn test_partial_progress_stores_without_unlock() {
        let outcome = apply_progress(&record(), 50, DateTime::now()).unwrap();
        assert!(outcome.changed);
        assert_eq!(outcome.record.progress, 50);
        assert!(!outcome.record.is_completed);
        assert!(outcome.record.unlocked_at.is_none());
        assert!(outcome.effects.is_empty());
    }

    #[test]
    fn test_unlock_at_threshold_is_one_transition() {
        let now = DateTime::now();
        let halfway = apply_progress(&record(), 50, now).unwrap().record;

        let outcome = apply_progress(&halfway, 100, now).unwrap();
        assert!(outcome.record.is_completed);
        assert_eq!(outcome.record.unlocked_at, Some(now));
        assert_eq!(outcome.effects.len(), 2);
    }

    #[test]
    fn test_reports_after_unlock_are_noops() {
        let now = DateTime::now();
        let unlocked = apply_progress(&record(), 100, now).unwrap().record;
        let first_unlock = unlocked.unlocked_at;

        // A second 100 does not restamp the unlock
        let replay = apply_progress(&unlocked, 100, DateTime::now()).unwrap();
        assert!(!replay.changed);
        assert!(replay.effects.is_empty());
        assert_eq!(replay.record.unlocked_at, first_unlock);

        // A lower value does not revert completion or progress
        let lower = apply_progress(&unlocked, 80, DateTime::now()).unwrap();
        assert!(!lower.changed);
        assert!(lower.record.is_completed);
        assert_eq!(lower.record.progress, 100);
    }

    #[test]
    fn test_out_of_range_progress_rejected() {
        assert!(matches!(
            apply_progress(&record(), -1, DateTime::now()),
            Err(LaunchpadError::Validation(_))
        ));
        assert!(matches!(
            apply_progress(&record(), 101, DateTime::now()),
            Err(LaunchpadError::Validation(_))
        ));
    }
}
