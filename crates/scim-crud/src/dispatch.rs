//! Add, replace, and delete addressed by path.
//!
//! Paths are compiled against the resource type's schema namespaces, and a
//! leading main-schema token is dropped before the tree is walked. All
//! compile and payload errors are raised before anything is mutated.
//! Errors from the navigator pass through unchanged.

use scim_expr::{compile_path_in, Expression};
use scim_prop::{traverse, Property, Resource};
use scim_schema::{Result, ScimError};
use serde_json::Value;
use tracing::debug;

use crate::delete_value::DeleteValue;
use crate::normalize::skip_main_schema_namespace;

/// Add `value` at `path`. An empty path adds to the resource root.
pub fn add(resource: &mut Resource, path: &str, value: Value) -> Result<()> {
    debug!(op = "add", path, "dispatching");
    if path.is_empty() {
        return resource.navigator().add(value);
    }
    let expr = compile(resource, path)?;
    apply(resource, Some(expr), |node| node.add(value.clone()))
}

/// Replace the value at `path`. An empty path replaces the resource root.
pub fn replace(resource: &mut Resource, path: &str, value: Value) -> Result<()> {
    debug!(op = "replace", path, "dispatching");
    if path.is_empty() {
        return resource.navigator().replace(value);
    }
    let expr = compile(resource, path)?;
    apply(resource, Some(expr), |node| node.replace(value.clone()))
}

/// Delete what `path` addresses.
///
/// `value`, when given, must be a filter mapping or a list of them and
/// narrows the delete to matching elements. Anything else fails with
/// [`ScimError::InvalidValue`]. A filter matching nothing is not an error.
///
/// A path that names only the main schema addresses the whole resource and
/// fails with [`ScimError::InvalidPath`], like an empty path.
pub fn delete(resource: &mut Resource, path: &str, value: Option<Value>) -> Result<()> {
    if path.is_empty() {
        return Err(ScimError::invalid_path(
            "path must be specified for delete operation",
        ));
    }
    let expr = compile(resource, path)?;
    let filter = value.map(DeleteValue::try_from).transpose()?;
    delete_compiled(resource, path, expr, filter.as_ref())
}

/// [`delete`] with an already validated payload.
pub fn delete_matching(
    resource: &mut Resource,
    path: &str,
    filter: Option<&DeleteValue>,
) -> Result<()> {
    if path.is_empty() {
        return Err(ScimError::invalid_path(
            "path must be specified for delete operation",
        ));
    }
    let expr = compile(resource, path)?;
    delete_compiled(resource, path, expr, filter)
}

fn delete_compiled(
    resource: &mut Resource,
    path: &str,
    expr: Expression,
    filter: Option<&DeleteValue>,
) -> Result<()> {
    debug!(op = "delete", path, filtered = filter.is_some(), "dispatching");
    let query = filter.map(DeleteValue::to_filter).transpose()?;
    let expr = skip_main_schema_namespace(resource.schema_id(), Some(expr.append(query.as_ref())));
    match expr {
        Some(expr) if expr.is_path() => {
            traverse(resource.root_property_mut(), Some(&expr), &mut |node: &mut Property| {
                node.delete();
                Ok(())
            })
        }
        _ => Err(ScimError::invalid_path(format!(
            "'{path}' addresses the whole resource"
        ))),
    }
}

fn compile(resource: &Resource, path: &str) -> Result<Expression> {
    compile_path_in(path, &resource.resource_type().namespaces())
}

fn apply<F>(resource: &mut Resource, expr: Option<Expression>, mut op: F) -> Result<()>
where
    F: FnMut(&mut Property) -> Result<()>,
{
    let expr = skip_main_schema_namespace(resource.schema_id(), expr);
    traverse(resource.root_property_mut(), expr.as_ref(), &mut op)
}
