//! Filters built from raw delete payloads.
//!
//! A mapping such as `{"type": "work", "value": "a@example.com"}` selects the
//! elements whose fields equal every entry. A list of mappings selects the
//! elements matching any of them.

use scim_schema::{Result, ScimError};
use serde_json::{Map, Value};

use crate::expression::Expression;
use crate::filter::{AttrPath, CompareOp, Filter};

/// Equality filter over every entry of `map`, joined with `and`.
///
/// An array value matches any of its elements; `null` matches an absent
/// field. Nested objects are rejected.
pub fn from_value(map: &Map<String, Value>) -> Result<Expression> {
    mapping_filter(map).map(Expression::filter)
}

/// Disjunction of [`from_value`] over every mapping in `list`.
pub fn from_value_list(list: &[Value]) -> Result<Expression> {
    let mut filters = Vec::with_capacity(list.len());
    for (i, item) in list.iter().enumerate() {
        match item {
            Value::Object(map) => filters.push(mapping_filter(map)?),
            other => {
                return Err(ScimError::invalid_filter(format!(
                    "element {i} of filter list is not a mapping: {other}"
                )))
            }
        }
    }
    Filter::any(filters)
        .map(Expression::filter)
        .ok_or_else(|| ScimError::invalid_filter("filter list is empty"))
}

fn mapping_filter(map: &Map<String, Value>) -> Result<Filter> {
    let mut clauses = Vec::with_capacity(map.len());
    for (key, value) in map {
        if key.is_empty() {
            return Err(ScimError::invalid_filter("filter field name is empty"));
        }
        clauses.push(field_filter(key, value)?);
    }
    Filter::all(clauses).ok_or_else(|| ScimError::invalid_filter("filter mapping is empty"))
}

fn field_filter(key: &str, value: &Value) -> Result<Filter> {
    let path = AttrPath::single(key);
    match value {
        Value::Null => Ok(Filter::Present(path).negate()),
        Value::Object(_) => Err(ScimError::invalid_filter(format!(
            "field '{key}' has a nested object value"
        ))),
        Value::Array(items) => {
            let mut alternatives = Vec::with_capacity(items.len());
            for item in items {
                if matches!(item, Value::Object(_) | Value::Array(_)) {
                    return Err(ScimError::invalid_filter(format!(
                        "field '{key}' has a non-scalar array element"
                    )));
                }
                alternatives.push(Filter::compare(path.clone(), CompareOp::Eq, item.clone()));
            }
            Filter::any(alternatives)
                .ok_or_else(|| ScimError::invalid_filter(format!("field '{key}' has an empty array")))
        }
        scalar => Ok(Filter::compare(path, CompareOp::Eq, scalar.clone())),
    }
}
