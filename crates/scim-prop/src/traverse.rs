//! Expression-guided traversal of a property tree.

use scim_expr::{Expression, Step};
use scim_schema::{Result, ScimError};
use tracing::trace;

use crate::eval::filter_matches;
use crate::property::Property;

/// Walk `expr` from `node` and call `visit` on every node it selects.
///
/// Multi-valued nodes fan out: the remaining expression is applied to each
/// element in turn, and elements left unassigned afterwards are dropped.
/// A path step naming an unknown attribute fails with
/// [`ScimError::NoTarget`]. A filter step that does not match prunes the
/// branch without error, so an expression selecting nothing succeeds
/// without calling `visit`.
///
/// The first error returned by `visit` or by filter evaluation stops the
/// walk.
pub fn traverse<F>(node: &mut Property, expr: Option<&Expression>, visit: &mut F) -> Result<()>
where
    F: FnMut(&mut Property) -> Result<()>,
{
    let Some(expr) = expr else {
        return visit(node);
    };

    if node.is_multi_valued() {
        let result = node
            .children_mut()
            .iter_mut()
            .try_for_each(|element| traverse(element, Some(expr), visit));
        node.compact();
        return result;
    }

    let next = expr.next();
    match expr.head() {
        Step::Path(name) => {
            trace!(attribute = %name, "descending");
            let parent = node.name().to_string();
            let child = node.child_mut(name).ok_or_else(|| {
                ScimError::no_target(format!("'{parent}' has no attribute '{name}'"))
            })?;
            traverse(child, next.as_ref(), visit)
        }
        Step::Filter(filter) => {
            if filter_matches(filter, node)? {
                traverse(node, next.as_ref(), visit)
            } else {
                Ok(())
            }
        }
    }
}
