//! Schema model for SCIM identity resources.
//!
//! This crate describes the typed shape of user and group records and the
//! error type shared by every other crate in the workspace.
//!
//! # Key Types
//!
//! - [`Attribute`] / [`AttributeType`] -- Typed attribute definitions
//! - [`Schema`] -- A URN-identified set of attributes
//! - [`ResourceType`] -- Main schema plus extensions, with the derived root attribute
//! - [`SchemaRegistry`] -- Loads and resolves definitions from JSON documents
//! - [`ScimError`] -- Operational error carrying a SCIM `scimType`

pub mod attribute;
pub mod error;
pub mod registry;
pub mod schema;

pub use attribute::{Attribute, AttributeType};
pub use error::{Result, SchemaError, ScimError};
pub use registry::{RegistryConfig, SchemaRegistry};
pub use schema::{
    common_attributes, ExtensionReference, ResourceType, ResourceTypeDocument, Schema,
    SchemaExtension, ENTERPRISE_USER_SCHEMA, GROUP_SCHEMA, USER_SCHEMA,
};
