//! Clients for downstream services
//!
//! The dispatcher delivers effects through these. Each call carries the
//! shared bounded-timeout HTTP client; none of them is invoked from a
//! request path directly.
//!
//! ## Clients
//!
//! - **Notification**: create-notification calls, one per recipient
//! - **Xp**: award-XP webhooks keyed by event kind
//! - **Identity**: role grants (club membership elevation)

pub mod identity;
pub mod notification;
pub mod xp;

pub use identity::IdentityClient;
pub use notification::NotificationClient;
pub use xp::XpClient;
