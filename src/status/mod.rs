//! Status vocabularies and transition validation
//!
//! One canonical enum per entity kind plus the directed graph of legal
//! transitions. Everything here is pure; nothing touches storage or the
//! network.

pub mod transitions;
pub mod vocabulary;

pub use transitions::{
    application_transition, enrollment_transition, is_legal_transition, milestone_transition,
    ticket_transition, Transition,
};
pub use vocabulary::{
    ApplicationStatus, EnrollmentStatus, EntityKind, MilestoneStatus, TicketStatus,
};
