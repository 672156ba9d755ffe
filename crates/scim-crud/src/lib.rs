//! Mutation dispatch for SCIM identity resources.
//!
//! [`add`], [`replace`] and [`delete`] compile a path string, normalize away
//! a leading main-schema namespace, and apply the matching navigator
//! operation at every node the path selects. [`apply_patch`] runs a list of
//! SCIM PATCH operations through the same entry points.
//!
//! # Modules
//!
//! - [`dispatch`] -- Path-addressed add, replace, and delete
//! - [`delete_value`] -- Filter payloads accepted by delete
//! - [`normalize`] -- Schema-namespace normalization
//! - [`patch`] -- PATCH operations and request messages

pub mod delete_value;
pub mod dispatch;
pub mod normalize;
pub mod patch;

pub use delete_value::DeleteValue;
pub use dispatch::{add, delete, delete_matching, replace};
pub use normalize::skip_main_schema_namespace;
pub use patch::{apply_patch, PatchOp, PatchOperation, PatchRequest, PATCH_OP_SCHEMA};
