//! Actor identity and role gating
//!
//! Authentication itself is an upstream concern; operations receive an
//! already-verified [`Actor`] and only decide whether its roles permit the
//! requested transition edge.

pub mod roles;

pub use roles::{Actor, Role};
