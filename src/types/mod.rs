//! Shared types for Launchpad

pub mod error;

pub use error::{LaunchpadError, Result};
