//! Progress recalculation
//!
//! A parent's completion percentage is a pure function of its children:
//! recomputing it any number of times over the same children yields the
//! same value and does nothing else. Effects (XP awards) belong to the
//! transition that completed a child, guarded so they fire once per child,
//! never to the recalculation.

pub mod enrollment;

use bson::DateTime;
use uuid::Uuid;

use crate::db::schemas::ProjectDoc;
use crate::effects::{Effect, XpAward, XpEvent};
use crate::status::{milestone_transition, MilestoneStatus, Transition};
use crate::types::{LaunchpadError, Result};

/// Completion percentage for `completed` children out of `total`.
///
/// An empty set of children is 0% complete, not an error.
pub fn recalculate(completed: usize, total: usize) -> i32 {
    if total == 0 {
        return 0;
    }
    (100.0 * completed as f64 / total as f64).round() as i32
}

/// Result of a milestone status change
#[derive(Debug, Clone)]
pub struct MilestoneOutcome {
    /// The project with the milestone updated and progress recomputed
    pub project: ProjectDoc,
    pub transition: Transition,
    /// The recomputed project progress
    pub progress: i32,
    /// Effects to dispatch after the write commits
    pub effects: Vec<Effect>,
}

/// Apply a status change to one milestone and recompute the project.
///
/// The first arrival at `completed` emits one milestone XP award for the
/// project owner; re-entering `completed` is a no-op and re-awards
/// nothing. When the recompute first reaches 100 the project-complete
/// award fires, also exactly once.
pub fn apply_milestone_status(
    project: &ProjectDoc,
    milestone_id: Uuid,
    requested: MilestoneStatus,
    now: DateTime,
) -> Result<MilestoneOutcome> {
    let index = project
        .milestones
        .iter()
        .position(|m| m.id == milestone_id)
        .ok_or_else(|| LaunchpadError::NotFound(format!("milestone {}", milestone_id)))?;

    let transition = milestone_transition(project.milestones[index].status, requested)?;

    if transition == Transition::Noop {
        return Ok(MilestoneOutcome {
            project: project.clone(),
            transition,
            progress: project.progress,
            effects: Vec::new(),
        });
    }

    let mut updated = project.clone();
    let mut effects = Vec::new();

    {
        let milestone = &mut updated.milestones[index];
        milestone.status = requested;

        if requested == MilestoneStatus::Completed {
            if milestone.completed_at.is_none() {
                milestone.completed_at = Some(now);
            }
            if !milestone.xp_awarded {
                milestone.xp_awarded = true;
                effects.push(Effect::AwardXp(XpAward {
                    event: XpEvent::MilestoneComplete,
                    user_id: updated.owner_id.clone(),
                    entity_id: milestone_id.to_string(),
                }));
            }
        }
    }

    let completed = updated
        .milestones
        .iter()
        .filter(|m| m.status == MilestoneStatus::Completed)
        .count();
    updated.progress = recalculate(completed, updated.milestones.len());

    if updated.progress == 100 && !updated.completion_xp_awarded {
        updated.completion_xp_awarded = true;
        effects.push(Effect::AwardXp(XpAward {
            event: XpEvent::ProjectComplete,
            user_id: updated.owner_id.clone(),
            entity_id: project_entity_id(&updated),
        }));
    }

    Ok(MilestoneOutcome {
        progress: updated.progress,
        project: updated,
        transition,
        effects,
    })
}

/// Stable id string for a project in effect payloads
fn project_entity_id(project: &ProjectDoc) -> String {
    project
        ._id
        .map(|id| id.to_hex())
        .unwrap_or_else(|| project.name.clone())
}
