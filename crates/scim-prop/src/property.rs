//! Property tree nodes.
//!
//! Every node carries the [`Attribute`] that describes it. Complex nodes
//! always hold one child per sub-attribute, so lookups by name never depend
//! on whether a value was ever assigned.

use std::sync::Arc;

use scim_schema::{Attribute, Result, ScimError};
use serde_json::{Map, Value};

/// Addresses a child of a node: a sub-attribute name for complex nodes, or
/// an element position for multi-valued nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Index<'a> {
    Name(&'a str),
    Position(usize),
}

impl<'a> From<&'a str> for Index<'a> {
    fn from(name: &'a str) -> Self {
        Index::Name(name)
    }
}

impl From<usize> for Index<'_> {
    fn from(position: usize) -> Self {
        Index::Position(position)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Node {
    Simple(Option<Value>),
    Complex(Vec<Property>),
    Multi {
        element: Arc<Attribute>,
        items: Vec<Property>,
    },
}

/// A node in a resource's property tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Property {
    pub(crate) attr: Arc<Attribute>,
    pub(crate) node: Node,
}

impl Property {
    /// Create an unassigned property for `attr`.
    pub fn new(attr: Arc<Attribute>) -> Self {
        let node = if attr.multi_valued {
            Node::Multi {
                element: Arc::new(attr.element()),
                items: Vec::new(),
            }
        } else if attr.is_complex() {
            Node::Complex(
                attr.sub_attributes
                    .iter()
                    .map(|sub| Property::new(Arc::new(sub.clone())))
                    .collect(),
            )
        } else {
            Node::Simple(None)
        };
        Self { attr, node }
    }

    pub fn attribute(&self) -> &Attribute {
        &self.attr
    }

    pub fn name(&self) -> &str {
        &self.attr.name
    }

    pub fn is_multi_valued(&self) -> bool {
        matches!(self.node, Node::Multi { .. })
    }

    pub fn is_complex(&self) -> bool {
        matches!(self.node, Node::Complex(_))
    }

    /// Returns `true` when the node holds no value.
    ///
    /// A complex node is unassigned when all of its children are; a
    /// multi-valued node when it has no assigned element.
    pub fn is_unassigned(&self) -> bool {
        match &self.node {
            Node::Simple(v) => v.is_none(),
            Node::Complex(children) => children.iter().all(Property::is_unassigned),
            Node::Multi { items, .. } => items.iter().all(Property::is_unassigned),
        }
    }

    /// The node's value as plain JSON. Unassigned nodes yield `null`, and
    /// unassigned children are left out of objects and arrays.
    pub fn raw(&self) -> Value {
        match &self.node {
            Node::Simple(v) => v.clone().unwrap_or(Value::Null),
            Node::Complex(children) => {
                let map: Map<String, Value> = children
                    .iter()
                    .filter(|c| !c.is_unassigned())
                    .map(|c| (c.attr.name.clone(), c.raw()))
                    .collect();
                if map.is_empty() {
                    Value::Null
                } else {
                    Value::Object(map)
                }
            }
            Node::Multi { items, .. } => {
                let values: Vec<Value> = items
                    .iter()
                    .filter(|c| !c.is_unassigned())
                    .map(Property::raw)
                    .collect();
                if values.is_empty() {
                    Value::Null
                } else {
                    Value::Array(values)
                }
            }
        }
    }

    /// The assigned string value of a simple node.
    pub fn as_str(&self) -> Option<&str> {
        match &self.node {
            Node::Simple(Some(Value::String(s))) => Some(s),
            _ => None,
        }
    }

    /// Number of children: sub-attributes or elements.
    pub fn len(&self) -> usize {
        match &self.node {
            Node::Simple(_) => 0,
            Node::Complex(children) => children.len(),
            Node::Multi { items, .. } => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a child by name (complex) or position (multi-valued).
    pub fn child_at_index<'a>(&self, index: impl Into<Index<'a>>) -> Result<&Property> {
        let index = index.into();
        let found = match (&self.node, index) {
            (Node::Complex(_), Index::Name(name)) => self.child(name),
            (Node::Multi { items, .. }, Index::Position(i)) => items.get(i),
            _ => None,
        };
        found.ok_or_else(|| self.missing(index))
    }

    /// Mutable counterpart of [`Property::child_at_index`].
    pub fn child_at_index_mut<'a>(&mut self, index: impl Into<Index<'a>>) -> Result<&mut Property> {
        let index = index.into();
        let err = self.missing(index);
        let found = match (&mut self.node, index) {
            (Node::Complex(children), Index::Name(name)) => {
                children.iter_mut().find(|c| c.attr.matches_name(name))
            }
            (Node::Multi { items, .. }, Index::Position(i)) => items.get_mut(i),
            _ => None,
        };
        found.ok_or(err)
    }

    /// Sub-attribute child by case-insensitive name.
    pub fn child(&self, name: &str) -> Option<&Property> {
        match &self.node {
            Node::Complex(children) => children.iter().find(|c| c.attr.matches_name(name)),
            _ => None,
        }
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Property> {
        match &mut self.node {
            Node::Complex(children) => children.iter_mut().find(|c| c.attr.matches_name(name)),
            _ => None,
        }
    }

    /// Children in order: sub-attributes of a complex node, elements of a
    /// multi-valued node, nothing for a simple node.
    pub fn children(&self) -> &[Property] {
        match &self.node {
            Node::Simple(_) => &[],
            Node::Complex(children) => children,
            Node::Multi { items, .. } => items,
        }
    }

    pub(crate) fn children_mut(&mut self) -> &mut [Property] {
        match &mut self.node {
            Node::Simple(_) => &mut [],
            Node::Complex(children) => children,
            Node::Multi { items, .. } => items,
        }
    }

    /// Visit each child with its index. Stops at the first error and
    /// returns it.
    pub fn for_each_child<E, F>(&self, mut visit: F) -> std::result::Result<(), E>
    where
        F: FnMut(usize, &Property) -> std::result::Result<(), E>,
    {
        for (i, child) in self.children().iter().enumerate() {
            visit(i, child)?;
        }
        Ok(())
    }

    /// Drop unassigned elements of a multi-valued node.
    pub fn compact(&mut self) {
        if let Node::Multi { items, .. } = &mut self.node {
            items.retain(|item| !item.is_unassigned());
        }
    }

    fn missing(&self, index: Index<'_>) -> ScimError {
        match index {
            Index::Name(name) => {
                ScimError::no_target(format!("'{}' has no attribute '{name}'", self.attr.name))
            }
            Index::Position(i) => {
                ScimError::no_target(format!("'{}' has no element at {i}", self.attr.name))
            }
        }
    }
}
