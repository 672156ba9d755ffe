//! Path and filter compiler for SCIM identity resources.
//!
//! Turns path strings such as `emails[type eq "work"].value` into immutable
//! [`Expression`]s, and raw delete payloads into filter expressions that can
//! be chained onto a path with [`Expression::append`].
//!
//! # Key Types
//!
//! - [`Expression`] / [`Step`] -- Compiled path, head first
//! - [`Filter`] / [`CompareOp`] / [`AttrPath`] -- Filter syntax tree
//!
//! # Entry Points
//!
//! - [`compile_path`] / [`compile_path_in`] -- Path strings
//! - [`compile_filter`] -- Filter strings
//! - [`from_value`] / [`from_value_list`] -- Delete payloads

pub mod expression;
pub mod filter;
mod lexer;
pub mod parser;
pub mod path;
pub mod value;

pub use expression::{Expression, Step};
pub use filter::{AttrPath, CompareOp, Filter};
pub use parser::compile_filter;
pub use path::{compile_path, compile_path_in};
pub use value::{from_value, from_value_list};
