//! Resources: a resource type plus the property tree holding its data.

use std::sync::Arc;

use scim_schema::{ResourceType, Result};
use serde_json::{Map, Value};

use crate::property::Property;

/// A single identity resource such as a User or Group.
#[derive(Clone, Debug)]
pub struct Resource {
    resource_type: Arc<ResourceType>,
    root: Property,
}

impl Resource {
    /// An empty resource of `resource_type`.
    pub fn new(resource_type: Arc<ResourceType>) -> Self {
        let root = Property::new(Arc::clone(resource_type.root_attribute()));
        Self {
            resource_type,
            root,
        }
    }

    /// Build a resource from its JSON representation.
    ///
    /// Keys are matched to attributes case-insensitively. Extension data is
    /// nested under the extension's schema URN.
    pub fn from_json(resource_type: Arc<ResourceType>, value: Value) -> Result<Self> {
        let mut resource = Self::new(resource_type);
        resource.root.add(value)?;
        Ok(resource)
    }

    /// The resource as JSON. Unassigned attributes are omitted; an empty
    /// resource renders as `{}`.
    pub fn to_json(&self) -> Value {
        match self.root.raw() {
            Value::Null => Value::Object(Map::new()),
            v => v,
        }
    }

    pub fn resource_type(&self) -> &Arc<ResourceType> {
        &self.resource_type
    }

    /// Id of the resource type's main schema.
    pub fn schema_id(&self) -> &str {
        self.resource_type.schema().id()
    }

    pub fn root_property(&self) -> &Property {
        &self.root
    }

    pub fn root_property_mut(&mut self) -> &mut Property {
        &mut self.root
    }

    /// The root node, for navigator operations on the whole resource.
    pub fn navigator(&mut self) -> &mut Property {
        &mut self.root
    }
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        self.resource_type.id() == other.resource_type.id() && self.root == other.root
    }
}
