//! Schema and resource type registry.
//!
//! Definitions are SCIM JSON documents. The registry can be seeded with the
//! built-in User/Group definitions or loaded from a directory laid out as:
//!
//! ```text
//! <root>/schemas/*.json
//! <root>/resource_types/*.json
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::SchemaError;
use crate::schema::{ResourceType, ResourceTypeDocument, Schema, SchemaExtension};

const BUILTIN_SCHEMAS: &[(&str, &str)] = &[
    ("user.json", include_str!("../definitions/schemas/user.json")),
    ("group.json", include_str!("../definitions/schemas/group.json")),
    (
        "enterprise_user.json",
        include_str!("../definitions/schemas/enterprise_user.json"),
    ),
];

const BUILTIN_RESOURCE_TYPES: &[(&str, &str)] = &[
    ("user.json", include_str!("../definitions/resource_types/user.json")),
    ("group.json", include_str!("../definitions/resource_types/group.json")),
];

/// Registry behavior settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// When `true`, a resource type referencing an unregistered optional
    /// extension is rejected instead of registered without it.
    #[serde(default)]
    pub strict_extensions: bool,
}

/// Registered schemas and resource types, keyed case-insensitively.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    config: RegistryConfig,
    schemas: HashMap<String, Arc<Schema>>,
    resource_types: HashMap<String, Arc<ResourceType>>,
}

impl SchemaRegistry {
    /// Create an empty registry with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Registry holding the built-in User, Group and Enterprise User
    /// definitions.
    pub fn builtin() -> Result<Self, SchemaError> {
        let mut registry = Self::new();
        for (name, doc) in BUILTIN_SCHEMAS {
            registry.register_schema(parse(name, doc)?)?;
        }
        for (name, doc) in BUILTIN_RESOURCE_TYPES {
            registry.register_resource_type(parse(name, doc)?)?;
        }
        Ok(registry)
    }

    /// Load every definition below `root` with default settings.
    pub fn from_dir(root: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let mut registry = Self::new();
        registry.load_dir(root)?;
        Ok(registry)
    }

    /// Load every definition below `root` into this registry.
    ///
    /// Schemas are loaded before resource types so that references resolve
    /// regardless of file order.
    pub fn load_dir(&mut self, root: impl AsRef<Path>) -> Result<(), SchemaError> {
        let root = root.as_ref();
        for (name, doc) in read_json_files(&root.join("schemas"))? {
            self.register_schema(parse(&name, &doc)?)?;
        }
        for (name, doc) in read_json_files(&root.join("resource_types"))? {
            self.register_resource_type(parse(&name, &doc)?)?;
        }
        Ok(())
    }

    /// Register a schema. Fails if a schema with the same id exists.
    pub fn register_schema(&mut self, schema: Schema) -> Result<Arc<Schema>, SchemaError> {
        let key = schema.id.to_ascii_lowercase();
        if self.schemas.contains_key(&key) {
            return Err(SchemaError::Duplicate(schema.id));
        }
        debug!(schema = %schema.id, attributes = schema.attributes.len(), "registered schema");
        let schema = Arc::new(schema);
        self.schemas.insert(key, Arc::clone(&schema));
        Ok(schema)
    }

    /// Resolve and register a resource type document.
    ///
    /// The main schema and every required extension must already be
    /// registered.
    pub fn register_resource_type(
        &mut self,
        doc: ResourceTypeDocument,
    ) -> Result<Arc<ResourceType>, SchemaError> {
        let key = doc.name.to_ascii_lowercase();
        if self.resource_types.contains_key(&key) {
            return Err(SchemaError::Duplicate(doc.name));
        }

        let schema = self
            .schema(&doc.schema)
            .ok_or_else(|| SchemaError::UnknownSchema {
                resource_type: doc.name.clone(),
                schema: doc.schema.clone(),
            })?;

        let mut extensions = Vec::with_capacity(doc.schema_extensions.len());
        for reference in &doc.schema_extensions {
            match self.schema(&reference.schema) {
                Some(ext) => extensions.push(SchemaExtension {
                    schema: ext,
                    required: reference.required,
                }),
                None if !reference.required && !self.config.strict_extensions => {
                    warn!(
                        resource_type = %doc.name,
                        extension = %reference.schema,
                        "optional extension not registered; skipping"
                    );
                }
                None => {
                    return Err(SchemaError::UnknownSchema {
                        resource_type: doc.name.clone(),
                        schema: reference.schema.clone(),
                    })
                }
            }
        }

        let resource_type = Arc::new(ResourceType::new(
            doc.id,
            doc.name,
            doc.endpoint,
            schema,
            extensions,
        ));
        debug!(
            resource_type = %resource_type.name(),
            extensions = resource_type.extensions().len(),
            "registered resource type"
        );
        self.resource_types.insert(key, Arc::clone(&resource_type));
        Ok(resource_type)
    }

    pub fn schema(&self, id: &str) -> Option<Arc<Schema>> {
        self.schemas.get(&id.to_ascii_lowercase()).cloned()
    }

    pub fn resource_type(&self, name: &str) -> Option<Arc<ResourceType>> {
        self.resource_types.get(&name.to_ascii_lowercase()).cloned()
    }

    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }

    pub fn resource_type_count(&self) -> usize {
        self.resource_types.len()
    }
}

fn parse<T: serde::de::DeserializeOwned>(name: &str, doc: &str) -> Result<T, SchemaError> {
    serde_json::from_str(doc).map_err(|source| SchemaError::Malformed {
        source_name: name.to_string(),
        source,
    })
}

/// Read `*.json` files in `dir`, sorted by file name. A missing directory
/// yields nothing.
fn read_json_files(dir: &Path) -> Result<Vec<(String, String)>, SchemaError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let name = path.display().to_string();
        files.push((name, fs::read_to_string(&path)?));
    }
    files.sort_by(|(a, _), (b, _)| a.cmp(b));
    Ok(files)
}
