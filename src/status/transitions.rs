//! Legal transition graphs and the transition validator
//!
//! Pure functions: given the current status, the requested status, and the
//! actor's role level, decide whether the edge is legal and of what kind.
//! Every edge not listed here is rejected.

use crate::auth::Role;
use crate::types::{LaunchpadError, Result};

use super::vocabulary::{
    ApplicationStatus, EnrollmentStatus, EntityKind, MilestoneStatus, TicketStatus,
};

/// Outcome of validating a requested transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Requested status equals the current one. Legal, but the caller must
    /// not mutate anything or fire effects.
    Noop,
    /// A normal edge of the documented graph
    Step,
    /// A director-level privileged edge that bypasses the graph. Same audit
    /// and effect obligations as a normal step.
    Forced,
}

impl Transition {
    /// Whether this transition actually changes state
    pub fn is_change(&self) -> bool {
        !matches!(self, Transition::Noop)
    }
}

/// Whether `from -> to` is an edge of the normal application review graph.
///
/// Withdrawal is handled separately: any non-terminal state may withdraw.
fn application_step(from: ApplicationStatus, to: ApplicationStatus) -> bool {
    use ApplicationStatus::*;
    matches!(
        (from, to),
        (Submitted, UnderReview)
            | (UnderReview, Approved)
            | (UnderReview, Rejected)
            | (Approved, InterviewScheduled)
            | (InterviewScheduled, Accepted)
            | (InterviewScheduled, Rejected)
    )
}

/// Validate an application transition for the given actor level.
///
/// Order of checks: no-op short-circuit, then withdrawal (open to any
/// authenticated role), then the review graph (reviewer and above), then the
/// director-only forced edge set. Role failures surface as `Forbidden`
/// before the graph is consulted for privilege, and illegal edges as
/// `InvalidTransition`; neither performs any mutation.
pub fn application_transition(
    from: ApplicationStatus,
    to: ApplicationStatus,
    actor_level: Role,
) -> Result<Transition> {
    if from == to {
        return Ok(Transition::Noop);
    }

    if to == ApplicationStatus::Withdrawn && !from.is_terminal() {
        return Ok(Transition::Step);
    }

    if application_step(from, to) {
        if actor_level < Role::Reviewer {
            return Err(LaunchpadError::Forbidden(format!(
                "role {} cannot review applications",
                actor_level
            )));
        }
        return Ok(Transition::Step);
    }

    // Off-graph edge: only the director's explicit change-status action
    if actor_level >= Role::Director {
        return Ok(Transition::Forced);
    }

    Err(LaunchpadError::invalid_transition(from, to))
}

/// Validate a milestone (or lesson/task) transition
pub fn milestone_transition(from: MilestoneStatus, to: MilestoneStatus) -> Result<Transition> {
    use MilestoneStatus::*;

    if from == to {
        return Ok(Transition::Noop);
    }

    let legal = match (from, to) {
        (Pending, InProgress) | (InProgress, Completed) => true,
        (_, Cancelled) => !from.is_terminal(),
        _ => false,
    };

    if legal {
        Ok(Transition::Step)
    } else {
        Err(LaunchpadError::invalid_transition(from, to))
    }
}

/// Validate a course-enrollment transition
pub fn enrollment_transition(from: EnrollmentStatus, to: EnrollmentStatus) -> Result<Transition> {
    use EnrollmentStatus::*;

    if from == to {
        return Ok(Transition::Noop);
    }

    match (from, to) {
        (Active, Completed) | (Active, Dropped) => Ok(Transition::Step),
        _ => Err(LaunchpadError::invalid_transition(from, to)),
    }
}

/// Validate a support-ticket transition
pub fn ticket_transition(from: TicketStatus, to: TicketStatus) -> Result<Transition> {
    use TicketStatus::*;

    if from == to {
        return Ok(Transition::Noop);
    }

    let legal = match (from, to) {
        (Open, InProgress) | (InProgress, Resolved) => true,
        (_, Closed) => !from.is_terminal(),
        _ => false,
    };

    if legal {
        Ok(Transition::Step)
    } else {
        Err(LaunchpadError::invalid_transition(from, to))
    }
}

/// String-keyed convenience for callers sitting at a legacy boundary.
///
/// Parses both statuses through the legacy folding and consults the typed
/// validator for the kind. Unknown statuses and illegal edges are both
/// `false`; a no-op counts as legal.
pub fn is_legal_transition(kind: EntityKind, from: &str, to: &str, actor_level: Role) -> bool {
    let result = match kind {
        EntityKind::Application => {
            match (
                ApplicationStatus::from_legacy(from),
                ApplicationStatus::from_legacy(to),
            ) {
                (Ok(f), Ok(t)) => application_transition(f, t, actor_level).map(|_| ()),
                _ => return false,
            }
        }
        EntityKind::Milestone => {
            match (
                MilestoneStatus::from_legacy(from),
                MilestoneStatus::from_legacy(to),
            ) {
                (Ok(f), Ok(t)) => milestone_transition(f, t).map(|_| ()),
                _ => return false,
            }
        }
        EntityKind::Enrollment => {
            match (
                EnrollmentStatus::from_legacy(from),
                EnrollmentStatus::from_legacy(to),
            ) {
                (Ok(f), Ok(t)) => enrollment_transition(f, t).map(|_| ()),
                _ => return false,
            }
        }
        EntityKind::Ticket => {
            match (
                TicketStatus::from_legacy(from),
                TicketStatus::from_legacy(to),
            ) {
                (Ok(f), Ok(t)) => ticket_transition(f, t).map(|_| ()),
                _ => return false,
            }
        }
    };

    result.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ApplicationStatus::*;

    /// The complete normal application graph (excluding withdrawal)
    const APPLICATION_EDGES: &[(ApplicationStatus, ApplicationStatus)] = &[
        (Submitted, UnderReview),
        (UnderReview, Approved),
        (UnderReview, Rejected),
        (Approved, InterviewScheduled),
        (InterviewScheduled, Accepted),
        (InterviewScheduled, Rejected),
    ];

    #[test]
    fn test_every_listed_application_edge_is_legal() {
        for &(from, to) in APPLICATION_EDGES {
            assert_eq!(
                application_transition(from, to, Role::Reviewer).unwrap(),
                Transition::Step,
                "{from} -> {to} should be a legal step"
            );
        }
    }

    #[test]
    fn test_every_unlisted_application_edge_is_rejected() {
        for &from in ApplicationStatus::ALL {
            for &to in ApplicationStatus::ALL {
                let listed = from == to
                    || APPLICATION_EDGES.contains(&(from, to))
                    || (to == Withdrawn && !from.is_terminal());
                let result = application_transition(from, to, Role::Reviewer);
                assert_eq!(
                    result.is_ok(),
                    listed,
                    "{from} -> {to} legality mismatch: {result:?}"
                );
            }
        }
    }

    #[test]
    fn test_no_skipping_straight_to_accepted() {
        assert!(matches!(
            application_transition(Submitted, Accepted, Role::Reviewer),
            Err(LaunchpadError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_same_status_is_noop() {
        assert_eq!(
            application_transition(Approved, Approved, Role::Reviewer).unwrap(),
            Transition::Noop
        );
        assert!(!Transition::Noop.is_change());
    }

    #[test]
    fn test_withdraw_from_any_non_terminal_state() {
        for &from in ApplicationStatus::ALL {
            let result = application_transition(from, Withdrawn, Role::Applicant);
            if from == Withdrawn {
                assert_eq!(result.unwrap(), Transition::Noop);
            } else if from.is_terminal() {
                assert!(result.is_err(), "{from} is terminal, cannot withdraw");
            } else {
                assert_eq!(result.unwrap(), Transition::Step);
            }
        }
    }

    #[test]
    fn test_review_edges_need_reviewer_role() {
        for role in [Role::Applicant, Role::ClubMember] {
            assert!(matches!(
                application_transition(Submitted, UnderReview, role),
                Err(LaunchpadError::Forbidden(_))
            ));
        }
        assert!(application_transition(Submitted, UnderReview, Role::Director).is_ok());
    }

    #[test]
    fn test_director_can_force_off_graph_edges() {
        assert_eq!(
            application_transition(Submitted, Accepted, Role::Director).unwrap(),
            Transition::Forced
        );
        // Even backwards out of a terminal state
        assert_eq!(
            application_transition(Rejected, UnderReview, Role::Director).unwrap(),
            Transition::Forced
        );
        assert_eq!(
            application_transition(Accepted, Withdrawn, Role::Director).unwrap(),
            Transition::Forced
        );
        // A reviewer cannot
        assert!(application_transition(Rejected, UnderReview, Role::Reviewer).is_err());
    }

    #[test]
    fn test_milestone_graph() {
        use MilestoneStatus::*;
        assert_eq!(
            milestone_transition(Pending, InProgress).unwrap(),
            Transition::Step
        );
        assert_eq!(
            milestone_transition(InProgress, Completed).unwrap(),
            Transition::Step
        );
        assert_eq!(
            milestone_transition(Pending, Cancelled).unwrap(),
            Transition::Step
        );
        assert_eq!(
            milestone_transition(InProgress, Cancelled).unwrap(),
            Transition::Step
        );
        // No skipping, no reviving
        assert!(milestone_transition(Pending, Completed).is_err());
        assert!(milestone_transition(Completed, Cancelled).is_err());
        assert!(milestone_transition(Completed, InProgress).is_err());
        assert!(milestone_transition(Cancelled, InProgress).is_err());
        assert_eq!(
            milestone_transition(Completed, Completed).unwrap(),
            Transition::Noop
        );
    }

    #[test]
    fn test_enrollment_graph() {
        use EnrollmentStatus::*;
        assert!(enrollment_transition(Active, Completed).is_ok());
        assert!(enrollment_transition(Active, Dropped).is_ok());
        assert!(enrollment_transition(Completed, Active).is_err());
        assert!(enrollment_transition(Dropped, Completed).is_err());
    }

    #[test]
    fn test_ticket_graph() {
        use TicketStatus::*;
        assert!(ticket_transition(Open, InProgress).is_ok());
        assert!(ticket_transition(InProgress, Resolved).is_ok());
        assert!(ticket_transition(Resolved, Closed).is_ok());
        assert!(ticket_transition(Open, Closed).is_ok());
        assert!(ticket_transition(Open, Resolved).is_err());
        assert!(ticket_transition(Closed, Open).is_err());
    }

    #[test]
    fn test_string_boundary_helper() {
        assert!(is_legal_transition(
            EntityKind::Application,
            "under-review",
            "approved",
            Role::Reviewer
        ));
        assert!(!is_legal_transition(
            EntityKind::Application,
            "submitted",
            "accepted",
            Role::Reviewer
        ));
        assert!(!is_legal_transition(
            EntityKind::Application,
            "submitted",
            "not_a_status",
            Role::Director
        ));
        assert!(is_legal_transition(
            EntityKind::Milestone,
            "in-progress",
            "completed",
            Role::Applicant
        ));
    }
}
