//! Canonical status vocabularies
//!
//! Historically each service spelled these its own way (`under-review`,
//! `underReview`, `Under Review`). The enums below are the single source of
//! truth; [`from_legacy`] folds the historical spellings at the boundary and
//! anything unrecognized is an error, never a silent default.
//!
//! [`from_legacy`]: ApplicationStatus::from_legacy

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::LaunchpadError;

/// Entity kinds that carry a status lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Application,
    Milestone,
    Enrollment,
    Ticket,
}

/// Normalize a raw status string for legacy matching:
/// lowercase, with separators (`-`, space) folded to underscores and
/// camelCase humps split on the way down.
fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 4);
    let mut prev_lower = false;
    for c in raw.chars() {
        if c == '-' || c == ' ' || c == '_' {
            if !out.ends_with('_') {
                out.push('_');
            }
            prev_lower = false;
        } else if c.is_uppercase() {
            if prev_lower && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_lowercase();
        }
    }
    out.trim_matches('_').to_string()
}

macro_rules! status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
        initial: $initial:ident
        terminal: [$($terminal:ident),+ $(,)?]
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl $name {
            /// All variants, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// Canonical snake_case spelling
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }

            /// Whether this status admits no further normal transitions
            pub fn is_terminal(&self) -> bool {
                matches!(self, $($name::$terminal)|+)
            }

            /// Parse a status from any historical spelling.
            ///
            /// Unknown values are a validation error; there is no fallback
            /// status.
            pub fn from_legacy(raw: &str) -> Result<Self, LaunchpadError> {
                let normalized = normalize(raw);
                normalized.parse().map_err(|_| {
                    LaunchpadError::Validation(format!(
                        "unknown {} status '{}'",
                        stringify!($name),
                        raw
                    ))
                })
            }
        }

        impl Default for $name {
            /// The initial lifecycle state for a newly stored entity
            fn default() -> Self {
                $name::$initial
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = LaunchpadError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(LaunchpadError::Validation(format!(
                        "unknown {} status '{}'",
                        stringify!($name),
                        other
                    ))),
                }
            }
        }
    };
}

status_enum! {
    /// Lifecycle of a program application.
    ///
    /// Draft states live client-side; a stored application starts at
    /// `submitted`. Withdrawn is a soft end state - applications are never
    /// hard-deleted.
    ApplicationStatus {
        Submitted => "submitted",
        UnderReview => "under_review",
        Approved => "approved",
        InterviewScheduled => "interview_scheduled",
        Accepted => "accepted",
        Rejected => "rejected",
        Withdrawn => "withdrawn",
    }
    initial: Submitted
    terminal: [Accepted, Rejected, Withdrawn]
}

status_enum! {
    /// Lifecycle of a project milestone (also used for lessons and tasks)
    MilestoneStatus {
        Pending => "pending",
        InProgress => "in_progress",
        Completed => "completed",
        Cancelled => "cancelled",
    }
    initial: Pending
    terminal: [Completed, Cancelled]
}

status_enum! {
    /// Lifecycle of a course enrollment
    EnrollmentStatus {
        Active => "active",
        Completed => "completed",
        Dropped => "dropped",
    }
    initial: Active
    terminal: [Completed, Dropped]
}

status_enum! {
    /// Lifecycle of a support ticket
    TicketStatus {
        Open => "open",
        InProgress => "in_progress",
        Resolved => "resolved",
        Closed => "closed",
    }
    initial: Open
    terminal: [Closed]
}

impl ApplicationStatus {
    /// Statuses whose transition requires non-empty review notes
    pub fn requires_notes(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected | Self::Accepted)
    }

    /// Statuses that elevate the applicant into the club
    pub fn grants_membership(&self) -> bool {
        matches!(self, Self::Approved | Self::Accepted)
    }
}
