//! Launchpad - membership lifecycle and progress engine
//!
//! Launchpad is the domain core of the venture-program admin platform:
//! applications move through a reviewed status graph, approvals elevate the
//! applicant into the club, project milestones and course lessons drive
//! derived progress percentages, and completions unlock achievements and
//! award XP through downstream services.
//!
//! ## Modules
//!
//! - **Status**: canonical status vocabularies and legal transition graphs
//! - **Review**: applies validated transitions to applications with audit stamps
//! - **Progress**: idempotent recomputation of project/course completion
//! - **Achievements**: per-user unlock evaluation with exactly-once timestamps
//! - **Effects**: transition side effects and their fire-and-forget dispatcher
//! - **Platform**: the operation surface wired to MongoDB and the dispatcher
//!
//! The HTTP layer that mounts these operations lives in a separate service;
//! this crate only trusts a verified [`auth::Actor`] handed in by it.

pub mod achievements;
pub mod auth;
pub mod config;
pub mod db;
pub mod effects;
pub mod logging;
pub mod platform;
pub mod progress;
pub mod review;
pub mod services;
pub mod status;
pub mod types;

pub use config::Args;
pub use platform::Platform;
pub use types::{LaunchpadError, Result};
