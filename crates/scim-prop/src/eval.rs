//! Filter evaluation against a property node.
//!
//! Operand paths are resolved relative to the node under test. On a simple
//! node, the operand `value` refers to the node itself, which lets filters
//! such as `value eq "admin"` select elements of a multi-valued string.
//! Operands crossing a multi-valued attribute match if any element does.

use std::cmp::Ordering;

use chrono::{DateTime, FixedOffset};
use scim_expr::{AttrPath, CompareOp, Filter};
use scim_schema::{Attribute, AttributeType, Result, ScimError};
use serde_json::Value;

use crate::property::Property;

/// Returns `true` if `node` satisfies `filter`.
pub fn filter_matches(filter: &Filter, node: &Property) -> Result<bool> {
    match filter {
        Filter::And(l, r) => Ok(filter_matches(l, node)? && filter_matches(r, node)?),
        Filter::Or(l, r) => Ok(filter_matches(l, node)? || filter_matches(r, node)?),
        Filter::Not(inner) => Ok(!filter_matches(inner, node)?),
        Filter::Present(path) => Ok(!assigned(node, path).is_empty()),
        Filter::Compare { path, op, value } => {
            let candidates = assigned(node, path);
            if value.is_null() {
                return match op {
                    CompareOp::Eq => Ok(candidates.is_empty()),
                    CompareOp::Ne => Ok(!candidates.is_empty()),
                    _ => Err(ScimError::invalid_filter(format!(
                        "'{op}' cannot compare with null"
                    ))),
                };
            }
            if candidates.is_empty() {
                return Ok(*op == CompareOp::Ne);
            }
            for candidate in candidates {
                if compare(candidate, *op, value)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
    }
}

/// Assigned simple nodes reached by `path`, with multi-valued nodes
/// flattened into their elements.
fn assigned<'a>(node: &'a Property, path: &AttrPath) -> Vec<&'a Property> {
    let mut current = vec![node];
    for segment in path.segments() {
        let mut next = Vec::new();
        for candidate in flatten(current) {
            if candidate.is_complex() {
                if let Some(child) = candidate.child(segment) {
                    next.push(child);
                }
            } else if segment.eq_ignore_ascii_case("value") {
                next.push(candidate);
            }
        }
        current = next;
    }
    flatten(current)
        .into_iter()
        .filter(|p| !p.is_unassigned())
        .collect()
}

fn flatten(nodes: Vec<&Property>) -> Vec<&Property> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        if node.is_multi_valued() {
            out.extend(node.children());
        } else {
            out.push(node);
        }
    }
    out
}

fn compare(node: &Property, op: CompareOp, expected: &Value) -> Result<bool> {
    let attr = node.attribute();
    let actual = node.raw();
    match attr.attr_type {
        AttributeType::Complex => Err(ScimError::invalid_filter(format!(
            "complex attribute '{}' cannot be compared",
            attr.name
        ))),
        AttributeType::Boolean => match (op, actual.as_bool(), expected.as_bool()) {
            (CompareOp::Eq, Some(a), Some(e)) => Ok(a == e),
            (CompareOp::Ne, Some(a), Some(e)) => Ok(a != e),
            (CompareOp::Eq | CompareOp::Ne, _, _) => Ok(false),
            _ => Err(unsupported(op, attr)),
        },
        AttributeType::Integer | AttributeType::Decimal => {
            match (actual.as_f64(), expected.as_f64()) {
                (Some(a), Some(e)) => order_matches(op, a.partial_cmp(&e), attr),
                _ => Ok(false),
            }
        }
        AttributeType::DateTime => {
            let (Some(a), Some(e)) = (actual.as_str(), expected.as_str()) else {
                return Ok(false);
            };
            let textual = matches!(op, CompareOp::Co | CompareOp::Sw | CompareOp::Ew);
            match (parse_instant(a), parse_instant(e)) {
                (Some(a), Some(e)) if !textual => order_matches(op, Some(a.cmp(&e)), attr),
                _ => Ok(compare_strings(op, a, e, attr.case_exact)),
            }
        }
        AttributeType::String | AttributeType::Reference | AttributeType::Binary => {
            match (actual.as_str(), expected.as_str()) {
                (Some(a), Some(e)) => Ok(compare_strings(op, a, e, attr.case_exact)),
                _ => Ok(false),
            }
        }
    }
}

fn order_matches(op: CompareOp, ordering: Option<Ordering>, attr: &Attribute) -> Result<bool> {
    let Some(ordering) = ordering else {
        return Ok(false);
    };
    Ok(match op {
        CompareOp::Eq => ordering == Ordering::Equal,
        CompareOp::Ne => ordering != Ordering::Equal,
        CompareOp::Gt => ordering == Ordering::Greater,
        CompareOp::Ge => ordering != Ordering::Less,
        CompareOp::Lt => ordering == Ordering::Less,
        CompareOp::Le => ordering != Ordering::Greater,
        CompareOp::Co | CompareOp::Sw | CompareOp::Ew => return Err(unsupported(op, attr)),
    })
}

fn compare_strings(op: CompareOp, actual: &str, expected: &str, case_exact: bool) -> bool {
    let (a, e) = if case_exact {
        (actual.to_string(), expected.to_string())
    } else {
        (actual.to_lowercase(), expected.to_lowercase())
    };
    match op {
        CompareOp::Eq => a == e,
        CompareOp::Ne => a != e,
        CompareOp::Co => a.contains(&e),
        CompareOp::Sw => a.starts_with(&e),
        CompareOp::Ew => a.ends_with(&e),
        CompareOp::Gt => a > e,
        CompareOp::Ge => a >= e,
        CompareOp::Lt => a < e,
        CompareOp::Le => a <= e,
    }
}

fn parse_instant(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s).ok()
}

fn unsupported(op: CompareOp, attr: &Attribute) -> ScimError {
    ScimError::invalid_filter(format!(
        "'{op}' is not supported for {} attribute '{}'",
        attr.attr_type, attr.name
    ))
}
