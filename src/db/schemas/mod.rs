//! Document schemas for the launchpad database

pub mod application;
pub mod enrollment;
pub mod metadata;
pub mod project;
pub mod user_achievement;

pub use application::{ApplicationDoc, ReviewNote, APPLICATION_COLLECTION};
pub use enrollment::{EnrollmentDoc, ENROLLMENT_COLLECTION};
pub use metadata::Metadata;
pub use project::{Milestone, ProjectDoc, PROJECT_COLLECTION};
pub use user_achievement::{UserAchievementDoc, USER_ACHIEVEMENT_COLLECTION};
