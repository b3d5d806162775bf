//! Roles for program participants and staff
//!
//! Roles are ordered: every staff level can do what the levels below it can.
//! The identity service supplies the verified role set; nothing here checks
//! credentials.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role levels within the venture program
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
#[derive(Default)]
pub enum Role {
    /// Submitted an application; no club access yet
    #[default]
    Applicant = 0,
    /// Accepted into the club - can enroll in courses and join projects
    ClubMember = 1,
    /// Reviews applications and moves them along the status graph
    Reviewer = 2,
    /// Program director - may force any status via the privileged edge set
    Director = 3,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Applicant => write!(f, "APPLICANT"),
            Role::ClubMember => write!(f, "CLUB_MEMBER"),
            Role::Reviewer => write!(f, "REVIEWER"),
            Role::Director => write!(f, "DIRECTOR"),
        }
    }
}

/// Verified caller identity, as supplied by the identity service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    /// Stable user identifier
    pub user_id: String,
    /// Verified role set
    pub roles: Vec<Role>,
}

impl Actor {
    /// Create an actor with a single role
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            roles: vec![role],
        }
    }

    /// Highest role held by this actor
    pub fn level(&self) -> Role {
        self.roles.iter().copied().max().unwrap_or_default()
    }

    /// Whether the actor holds `role` or anything above it
    pub fn has_at_least(&self, role: Role) -> bool {
        self.level() >= role
    }
}
