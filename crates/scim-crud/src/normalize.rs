//! Schema-namespace normalization of compiled paths.

use scim_expr::Expression;
use tracing::debug;

/// Drop a leading path token equal to `schema_id`.
///
/// `urn:ietf:params:scim:schemas:core:2.0:User:userName` and `userName`
/// address the same attribute of a User. Returns `None` when the token was
/// the whole expression, which addresses the resource root.
pub fn skip_main_schema_namespace(schema_id: &str, expr: Option<Expression>) -> Option<Expression> {
    let expr = expr?;
    if expr.token() == Some(schema_id) {
        debug!(schema = schema_id, "stripped main schema namespace");
        return expr.next();
    }
    Some(expr)
}
