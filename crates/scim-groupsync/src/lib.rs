//! Group membership diff engine for SCIM identity resources.
//!
//! Given the state of a group before and after a change, [`compare`]
//! reports which member ids joined, stayed, or left, and whether the
//! group's `displayName` changed.
//!
//! # Key Types
//!
//! - [`Diff`] -- Joined/stayed/left member sets plus the property flag
//! - [`GroupChange`] -- Created, modified, or deleted snapshot pair

pub mod compare;
pub mod diff;

pub use compare::{compare, GroupChange};
pub use diff::Diff;
