//! Schemas and resource types.
//!
//! A [`Schema`] is a named set of attribute definitions identified by a URN.
//! A [`ResourceType`] binds one main schema and any number of extension
//! schemas into the root attribute that describes a whole resource.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::attribute::{Attribute, AttributeType};

/// Core schema URN of the User resource.
pub const USER_SCHEMA: &str = "urn:ietf:params:scim:schemas:core:2.0:User";
/// Core schema URN of the Group resource.
pub const GROUP_SCHEMA: &str = "urn:ietf:params:scim:schemas:core:2.0:Group";
/// Enterprise User extension URN.
pub const ENTERPRISE_USER_SCHEMA: &str =
    "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User";

/// A schema definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// Stable identifier, usually a URN.
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl Schema {
    pub fn new(id: impl Into<String>, name: impl Into<String>, attributes: Vec<Attribute>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            attributes,
        }
    }

    /// The schema identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.matches_name(name))
    }
}

/// An extension schema attached to a resource type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchemaExtension {
    pub schema: Arc<Schema>,
    pub required: bool,
}

/// Reference to an extension schema inside a resource type document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionReference {
    pub schema: String,
    #[serde(default)]
    pub required: bool,
}

/// A resource type as it appears on the wire, with schemas referenced by id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTypeDocument {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub endpoint: String,
    pub schema: String,
    #[serde(default)]
    pub schema_extensions: Vec<ExtensionReference>,
}

/// A resolved resource type: the main schema, its extensions, and the
/// derived root attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceType {
    id: String,
    name: String,
    endpoint: String,
    schema: Arc<Schema>,
    extensions: Vec<SchemaExtension>,
    root: Arc<Attribute>,
}

impl ResourceType {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        endpoint: impl Into<String>,
        schema: Arc<Schema>,
        extensions: Vec<SchemaExtension>,
    ) -> Self {
        let root = Arc::new(build_root_attribute(&schema, &extensions));
        Self {
            id: id.into(),
            name: name.into(),
            endpoint: endpoint.into(),
            schema,
            extensions,
            root,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The owning (main) schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn extensions(&self) -> &[SchemaExtension] {
        &self.extensions
    }

    /// The complex attribute describing a whole resource of this type.
    pub fn root_attribute(&self) -> &Arc<Attribute> {
        &self.root
    }

    /// Schema namespaces a path may be prefixed with: the main schema
    /// first, then every extension.
    pub fn namespaces(&self) -> Vec<&str> {
        std::iter::once(self.schema.id())
            .chain(self.extensions.iter().map(|e| e.schema.id()))
            .collect()
    }
}

/// Attributes every resource carries regardless of its schema.
pub fn common_attributes() -> Vec<Attribute> {
    vec![
        Attribute::new("schemas", AttributeType::Reference)
            .multi_valued()
            .case_exact()
            .required(),
        Attribute::new("id", AttributeType::String).case_exact(),
        Attribute::new("externalId", AttributeType::String).case_exact(),
        Attribute::complex(
            "meta",
            vec![
                Attribute::new("resourceType", AttributeType::String).case_exact(),
                Attribute::new("created", AttributeType::DateTime),
                Attribute::new("lastModified", AttributeType::DateTime),
                Attribute::new("location", AttributeType::Reference).case_exact(),
                Attribute::new("version", AttributeType::String).case_exact(),
            ],
        ),
    ]
}

fn build_root_attribute(schema: &Schema, extensions: &[SchemaExtension]) -> Attribute {
    let mut attributes = common_attributes();
    attributes.extend(schema.attributes.iter().cloned());
    for ext in extensions {
        let mut container = Attribute::complex(ext.schema.id(), ext.schema.attributes.clone());
        container.required = ext.required;
        attributes.push(container);
    }
    let mut root = Attribute::complex(schema.id(), attributes);
    root.required = true;
    root
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group_schema() -> Arc<Schema> {
        Arc::new(Schema::new(
            GROUP_SCHEMA,
            "Group",
            vec![Attribute::new("displayName", AttributeType::String)],
        ))
    }

    #[test]
    fn root_attribute_merges_common_and_schema() {
        let rt = ResourceType::new("Group", "Group", "/Groups", group_schema(), Vec::new());
        let root = rt.root_attribute();
        assert!(root.is_complex());
        assert!(root.sub_attribute("id").is_some());
        assert!(root.sub_attribute("meta").is_some());
        assert!(root.sub_attribute("displayName").is_some());
    }

    #[test]
    fn extension_becomes_named_container() {
        let ext = Arc::new(Schema::new(
            ENTERPRISE_USER_SCHEMA,
            "EnterpriseUser",
            vec![Attribute::new("employeeNumber", AttributeType::String)],
        ));
        let rt = ResourceType::new(
            "User",
            "User",
            "/Users",
            Arc::new(Schema::new(USER_SCHEMA, "User", Vec::new())),
            vec![SchemaExtension {
                schema: ext,
                required: false,
            }],
        );

        let container = rt.root_attribute().sub_attribute(ENTERPRISE_USER_SCHEMA).unwrap();
        assert!(container.sub_attribute("employeeNumber").is_some());
        assert_eq!(rt.namespaces(), vec![USER_SCHEMA, ENTERPRISE_USER_SCHEMA]);
    }

    #[test]
    fn resource_type_document_wire_format() {
        let doc: ResourceTypeDocument = serde_json::from_str(
            r#"{
                "id": "User",
                "name": "User",
                "endpoint": "/Users",
                "schema": "urn:ietf:params:scim:schemas:core:2.0:User",
                "schemaExtensions": [
                    {"schema": "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User", "required": true}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(doc.schema, USER_SCHEMA);
        assert!(doc.schema_extensions[0].required);
    }
}
