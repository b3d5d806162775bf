//! Lesson completion for course enrollments
//!
//! The completed-lesson set is idempotent: adding a lesson index that is
//! already present changes nothing and emits nothing. Reaching 100%
//! completes the enrollment and fires the course-complete award in the
//! same update.

use crate::db::schemas::EnrollmentDoc;
use crate::effects::{Effect, XpAward, XpEvent};
use crate::status::EnrollmentStatus;
use crate::types::{LaunchpadError, Result};

use super::recalculate;

/// Result of reporting a completed lesson
#[derive(Debug, Clone)]
pub struct LessonOutcome {
    /// The enrollment with the lesson recorded and progress recomputed
    pub enrollment: EnrollmentDoc,
    /// False when the lesson was already completed (idempotent no-op)
    pub changed: bool,
    /// Effects to dispatch after the write commits
    pub effects: Vec<Effect>,
}

/// Record a completed lesson on an enrollment.
///
/// The lesson index must be within the course's lesson range and the
/// enrollment must not be dropped. The first completion of a lesson emits
/// one lesson XP award; completing the final lesson also flips the
/// enrollment to completed with one course XP award.
pub fn complete_lesson(enrollment: &EnrollmentDoc, lesson: u32) -> Result<LessonOutcome> {
    if enrollment.status == EnrollmentStatus::Dropped {
        return Err(LaunchpadError::Validation(
            "enrollment has been dropped".to_string(),
        ));
    }

    if lesson >= enrollment.total_lessons {
        return Err(LaunchpadError::Validation(format!(
            "lesson {} out of range for a course with {} lessons",
            lesson, enrollment.total_lessons
        )));
    }

    if enrollment.completed_lessons.contains(&lesson) {
        return Ok(LessonOutcome {
            enrollment: enrollment.clone(),
            changed: false,
            effects: Vec::new(),
        });
    }

    let mut updated = enrollment.clone();
    let position = updated
        .completed_lessons
        .binary_search(&lesson)
        .unwrap_err();
    updated.completed_lessons.insert(position, lesson);
    updated.progress = recalculate(
        updated.completed_lessons.len(),
        updated.total_lessons as usize,
    );

    let mut effects = vec![Effect::AwardXp(XpAward {
        event: XpEvent::LessonComplete,
        user_id: updated.user_id.clone(),
        entity_id: format!("{}/{}", updated.course_id, lesson),
    })];

    if updated.progress == 100 && updated.status == EnrollmentStatus::Active {
        updated.status = EnrollmentStatus::Completed;
        effects.push(Effect::AwardXp(XpAward {
            event: XpEvent::CourseComplete,
            user_id: updated.user_id.clone(),
            entity_id: updated.course_id.clone(),
        }));
    }

    Ok(LessonOutcome {
        enrollment: updated,
        changed: true,
        effects,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enrollment(total: u32, completed: &[u32]) -> EnrollmentDoc {
        let mut e = EnrollmentDoc::new("u1".to_string(), "c1".to_string(), total);
        e.completed_lessons = completed.to_vec();
        e.progress = recalculate(completed.len(), total as usize);
        e
    }

    fn xp_events(effects: &[Effect]) -> Vec<XpEvent> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::AwardXp(a) => Some(a.event),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_first_completion_updates_progress() {
        let outcome = complete_lesson(&enrollment(4, &[0]), 1).unwrap();
        assert!(outcome.changed);
        assert_eq!(outcome.enrollment.completed_lessons, vec![0, 1]);
        assert_eq!(outcome.enrollment.progress, 50);
        assert_eq!(xp_events(&outcome.effects), vec![XpEvent::LessonComplete]);
    }

    #[test]
    fn test_repeat_completion_is_noop() {
        let e = enrollment(4, &[0, 1]);
        let outcome = complete_lesson(&e, 1).unwrap();
        assert!(!outcome.changed);
        assert!(outcome.effects.is_empty());
        assert_eq!(outcome.enrollment.completed_lessons, vec![0, 1]);
        assert_eq!(outcome.enrollment.progress, e.progress);
    }

    #[test]
    fn test_final_lesson_completes_the_course() {
        let outcome = complete_lesson(&enrollment(3, &[0, 2]), 1).unwrap();
        assert_eq!(outcome.enrollment.progress, 100);
        assert_eq!(outcome.enrollment.status, EnrollmentStatus::Completed);
        assert_eq!(
            xp_events(&outcome.effects),
            vec![XpEvent::LessonComplete, XpEvent::CourseComplete]
        );
        assert_eq!(outcome.enrollment.completed_lessons, vec![0, 1, 2]);
    }

    #[test]
    fn test_out_of_range_lesson_rejected() {
        let err = complete_lesson(&enrollment(3, &[]), 3).unwrap_err();
        assert!(matches!(err, LaunchpadError::Validation(_)));
    }

    #[test]
    fn test_dropped_enrollment_rejects_completions() {
        let mut e = enrollment(3, &[]);
        e.status = EnrollmentStatus::Dropped;
        let err = complete_lesson(&e, 0).unwrap_err();
        assert!(matches!(err, LaunchpadError::Validation(_)));
    }
}
