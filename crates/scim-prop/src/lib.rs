//! Typed property trees for SCIM resources.
//!
//! A [`Resource`] pairs a [`scim_schema::ResourceType`] with a tree of
//! [`Property`] nodes shaped by the resource type's attributes. Nodes are
//! edited through the navigator operations [`Property::add`],
//! [`Property::replace`] and [`Property::delete`], and reached through
//! [`traverse`], which follows a compiled [`scim_expr::Expression`].

pub mod eval;
mod navigator;
pub mod property;
pub mod resource;
pub mod traverse;

pub use eval::filter_matches;
pub use property::{Index, Property};
pub use resource::Resource;
pub use traverse::traverse;
