//! Navigator operations: add, replace, and delete on a single node.
//!
//! Values are plain JSON and are type-checked against the node's attribute
//! before anything is written. Complex and multi-valued replacements are
//! staged aside and swapped in, so a rejected value leaves the node as it
//! was.

use std::sync::Arc;

use chrono::DateTime;
use scim_schema::{Attribute, AttributeType, Result, ScimError};
use serde_json::Value;

use crate::property::{Node, Property};

impl Property {
    /// Add `value` to this node.
    ///
    /// - simple: sets the value.
    /// - complex: merges each key of an object into the matching child.
    /// - multi-valued: appends the value, or every element of an array,
    ///   skipping elements equal to one already present.
    ///
    /// `null` is a no-op.
    pub fn add(&mut self, value: Value) -> Result<()> {
        if value.is_null() {
            return Ok(());
        }
        match &mut self.node {
            Node::Simple(slot) => {
                check_scalar(&self.attr, &value)?;
                *slot = Some(value);
                Ok(())
            }
            Node::Complex(_) => {
                let mut staged = self.clone();
                if let Node::Complex(children) = &mut staged.node {
                    merge_object(&staged.attr, children, value)?;
                }
                *self = staged;
                Ok(())
            }
            Node::Multi { element, items } => {
                let incoming = build_elements(element, value)?;
                for candidate in incoming {
                    let raw = candidate.raw();
                    if !items.iter().any(|existing| existing.raw() == raw) {
                        items.push(candidate);
                    }
                }
                Ok(())
            }
        }
    }

    /// Replace this node's value. `null` unassigns the node.
    ///
    /// - simple: sets the value.
    /// - complex: replaces each child named by a key of the object; children
    ///   not named are left unchanged.
    /// - multi-valued: drops every element, then adds.
    pub fn replace(&mut self, value: Value) -> Result<()> {
        if value.is_null() {
            self.delete();
            return Ok(());
        }
        if self.is_multi_valued() {
            let mut fresh = Property::new(Arc::clone(&self.attr));
            fresh.add(value)?;
            self.node = fresh.node;
            return Ok(());
        }
        if !self.is_complex() {
            return self.add(value);
        }
        let Value::Object(map) = value else {
            return Err(mismatch(&self.attr, &value));
        };
        let mut staged = self.clone();
        for (key, v) in map {
            let parent = &staged.attr.name;
            let missing = ScimError::no_target(format!("'{parent}' has no attribute '{key}'"));
            staged.child_mut(&key).ok_or(missing)?.replace(v)?;
        }
        *self = staged;
        Ok(())
    }

    /// Unassign this node and everything below it.
    pub fn delete(&mut self) {
        match &mut self.node {
            Node::Simple(slot) => *slot = None,
            Node::Complex(children) => children.iter_mut().for_each(Property::delete),
            Node::Multi { items, .. } => items.clear(),
        }
    }
}

fn merge_object(attr: &Attribute, children: &mut [Property], value: Value) -> Result<()> {
    let Value::Object(map) = value else {
        return Err(mismatch(attr, &value));
    };
    for (key, v) in map {
        let child = children
            .iter_mut()
            .find(|c| c.attribute().matches_name(&key))
            .ok_or_else(|| {
                ScimError::no_target(format!("'{}' has no attribute '{key}'", attr.name))
            })?;
        child.add(v)?;
    }
    Ok(())
}

fn build_elements(element: &Arc<Attribute>, value: Value) -> Result<Vec<Property>> {
    let values = match value {
        Value::Array(values) => values,
        single => vec![single],
    };
    let mut built = Vec::with_capacity(values.len());
    for v in values {
        let mut prop = Property::new(Arc::clone(element));
        prop.add(v)?;
        if !prop.is_unassigned() {
            built.push(prop);
        }
    }
    Ok(built)
}

fn check_scalar(attr: &Attribute, value: &Value) -> Result<()> {
    let ok = match attr.attr_type {
        AttributeType::String | AttributeType::Reference | AttributeType::Binary => {
            value.is_string()
        }
        AttributeType::DateTime => value
            .as_str()
            .is_some_and(|s| DateTime::parse_from_rfc3339(s).is_ok()),
        AttributeType::Boolean => value.is_boolean(),
        AttributeType::Integer => value.is_i64() || value.is_u64(),
        AttributeType::Decimal => value.is_number(),
        AttributeType::Complex => false,
    };
    if ok {
        Ok(())
    } else {
        Err(mismatch(attr, value))
    }
}

fn mismatch(attr: &Attribute, value: &Value) -> ScimError {
    ScimError::invalid_value(format!(
        "'{}' expects {}, got {}",
        attr.name,
        attr.attr_type,
        kind_of(value)
    ))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "decimal",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attr(name: &str, t: AttributeType) -> Arc<Attribute> {
        Arc::new(Attribute::new(name, t))
    }

    fn profile() -> Property {
        Property::new(Arc::new(Attribute::complex(
            "profile",
            vec![
                Attribute::new("nickName", AttributeType::String),
                Attribute::new("active", AttributeType::Boolean),
                Attribute::new("loginCount", AttributeType::Integer),
                Attribute::new("roles", AttributeType::String).multi_valued(),
            ],
        )))
    }

    #[test]
    fn scalar_type_checks() {
        let cases = [
            (AttributeType::String, json!("x"), true),
            (AttributeType::String, json!(1), false),
            (AttributeType::Boolean, json!(true), true),
            (AttributeType::Boolean, json!("true"), false),
            (AttributeType::Integer, json!(3), true),
            (AttributeType::Integer, json!(3.5), false),
            (AttributeType::Decimal, json!(3.5), true),
            (AttributeType::Decimal, json!(3), true),
            (AttributeType::DateTime, json!("2020-01-01T00:00:00Z"), true),
            (AttributeType::DateTime, json!("yesterday"), false),
            (AttributeType::Reference, json!("https://x.org/Users/1"), true),
        ];
        for (t, value, ok) in cases {
            let mut p = Property::new(attr("field", t));
            assert_eq!(p.add(value.clone()).is_ok(), ok, "{t} <- {value}");
        }
    }

    #[test]
    fn type_mismatch_is_invalid_value() {
        let mut p = Property::new(attr("active", AttributeType::Boolean));
        let err = p.add(json!("yes")).unwrap_err();
        assert!(matches!(err, ScimError::InvalidValue(_)));
        assert!(p.is_unassigned());
    }

    #[test]
    fn add_null_is_noop() {
        let mut p = Property::new(attr("nickName", AttributeType::String));
        p.add(json!("Babs")).unwrap();
        p.add(Value::Null).unwrap();
        assert_eq!(p.raw(), json!("Babs"));
    }

    #[test]
    fn complex_add_merges() {
        let mut p = profile();
        p.add(json!({"nickName": "Babs"})).unwrap();
        p.add(json!({"active": true})).unwrap();
        assert_eq!(p.raw(), json!({"nickName": "Babs", "active": true}));
    }

    #[test]
    fn complex_add_unknown_key_is_no_target() {
        let mut p = profile();
        let err = p.add(json!({"shoeSize": 42})).unwrap_err();
        assert!(matches!(err, ScimError::NoTarget(_)));
    }

    #[test]
    fn rejected_complex_add_leaves_node_unchanged() {
        let mut p = profile();
        p.add(json!({"nickName": "Babs"})).unwrap();
        let err = p.add(json!({"active": true, "nickName": 5})).unwrap_err();
        assert!(matches!(err, ScimError::InvalidValue(_)));
        assert_eq!(p.raw(), json!({"nickName": "Babs"}));

        assert!(p.add(json!({"loginCount": 2, "shoeSize": 9})).is_err());
        assert_eq!(p.raw(), json!({"nickName": "Babs"}));
    }

    #[test]
    fn complex_add_rejects_scalar() {
        let mut p = profile();
        assert!(matches!(p.add(json!("x")), Err(ScimError::InvalidValue(_))));
    }

    #[test]
    fn multi_add_appends_and_dedupes() {
        let mut p = profile();
        let roles = p.child_mut("roles").unwrap();
        roles.add(json!("admin")).unwrap();
        roles.add(json!(["admin", "auditor"])).unwrap();
        assert_eq!(roles.raw(), json!(["admin", "auditor"]));
    }

    #[test]
    fn multi_add_is_all_or_nothing() {
        let mut p = profile();
        let roles = p.child_mut("roles").unwrap();
        roles.add(json!("admin")).unwrap();
        assert!(roles.add(json!(["auditor", 7])).is_err());
        assert_eq!(roles.raw(), json!(["admin"]));
    }

    #[test]
    fn replace_complex_touches_named_children_only() {
        let mut p = profile();
        p.add(json!({"nickName": "Babs", "active": true, "roles": ["admin"]}))
            .unwrap();
        p.replace(json!({"loginCount": 3, "active": false, "roles": ["auditor"]}))
            .unwrap();
        assert_eq!(
            p.raw(),
            json!({"nickName": "Babs", "active": false, "loginCount": 3, "roles": ["auditor"]})
        );
    }

    #[test]
    fn replace_complex_rejects_scalar_and_unknown_keys() {
        let mut p = profile();
        assert!(matches!(p.replace(json!(1)), Err(ScimError::InvalidValue(_))));
        assert!(matches!(
            p.replace(json!({"shoeSize": 9})),
            Err(ScimError::NoTarget(_))
        ));
    }

    #[test]
    fn failed_replace_keeps_old_value() {
        let mut p = profile();
        p.add(json!({"nickName": "Babs"})).unwrap();
        assert!(p.replace(json!({"active": "no"})).is_err());
        assert_eq!(p.raw(), json!({"nickName": "Babs"}));
    }

    #[test]
    fn replace_null_deletes() {
        let mut p = profile();
        p.add(json!({"nickName": "Babs"})).unwrap();
        p.child_mut("nickName").unwrap().replace(Value::Null).unwrap();
        assert!(p.is_unassigned());
    }

    #[test]
    fn delete_unassigns_subtree() {
        let mut p = profile();
        p.add(json!({"nickName": "Babs", "roles": ["admin"]})).unwrap();
        p.delete();
        assert!(p.is_unassigned());
        assert_eq!(p.len(), 4);
    }
}
