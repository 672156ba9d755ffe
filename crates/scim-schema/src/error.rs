use thiserror::Error;

/// Errors produced while resolving, filtering, or mutating a resource.
///
/// Each variant maps onto one SCIM `scimType` so callers at the protocol
/// edge can render it without re-classifying.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ScimError {
    /// The path is malformed or empty where one is required.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// A filter could not be compiled or evaluated.
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// The value is not acceptable for the target or the operation.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// The path does not resolve to an addressable location.
    #[error("no target: {0}")]
    NoTarget(String),

    /// A request document could not be parsed.
    #[error("invalid syntax: {0}")]
    InvalidSyntax(String),

    /// The schema model itself is inconsistent.
    #[error("schema error: {0}")]
    Schema(String),
}

impl ScimError {
    pub fn invalid_path(message: impl Into<String>) -> Self {
        Self::InvalidPath(message.into())
    }

    pub fn invalid_filter(message: impl Into<String>) -> Self {
        Self::InvalidFilter(message.into())
    }

    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::InvalidValue(message.into())
    }

    pub fn no_target(message: impl Into<String>) -> Self {
        Self::NoTarget(message.into())
    }

    /// The SCIM `scimType` keyword for this error, if it has one.
    pub fn scim_type(&self) -> Option<&'static str> {
        match self {
            Self::InvalidPath(_) => Some("invalidPath"),
            Self::InvalidFilter(_) => Some("invalidFilter"),
            Self::InvalidValue(_) => Some("invalidValue"),
            Self::NoTarget(_) => Some("noTarget"),
            Self::InvalidSyntax(_) => Some("invalidSyntax"),
            Self::Schema(_) => None,
        }
    }

    /// HTTP status a protocol layer should answer with.
    pub fn status(&self) -> u16 {
        match self {
            Self::Schema(_) => 500,
            _ => 400,
        }
    }
}

/// Errors raised while loading schema and resource type definitions.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A resource type references a schema that was never registered.
    #[error("resource type {resource_type}: unknown schema {schema}")]
    UnknownSchema {
        resource_type: String,
        schema: String,
    },

    /// Two definitions share the same identifier.
    #[error("duplicate definition: {0}")]
    Duplicate(String),

    /// A definition document was malformed.
    #[error("malformed definition in {source_name}: {source}")]
    Malformed {
        source_name: String,
        #[source]
        source: serde_json::Error,
    },

    /// I/O error while reading definitions from disk.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SchemaError> for ScimError {
    fn from(err: SchemaError) -> Self {
        Self::Schema(err.to_string())
    }
}

/// Convenience alias for operations on resources.
pub type Result<T> = std::result::Result<T, ScimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scim_type_keywords() {
        assert_eq!(ScimError::invalid_path("x").scim_type(), Some("invalidPath"));
        assert_eq!(ScimError::invalid_filter("x").scim_type(), Some("invalidFilter"));
        assert_eq!(ScimError::invalid_value("x").scim_type(), Some("invalidValue"));
        assert_eq!(ScimError::no_target("x").scim_type(), Some("noTarget"));
        assert_eq!(ScimError::Schema("x".into()).scim_type(), None);
    }

    #[test]
    fn status_codes() {
        assert_eq!(ScimError::invalid_value("bad").status(), 400);
        assert_eq!(ScimError::Schema("broken".into()).status(), 500);
    }

    #[test]
    fn schema_errors_become_server_errors() {
        let err: ScimError = SchemaError::Duplicate("urn:test".into()).into();
        assert_eq!(err, ScimError::Schema("duplicate definition: urn:test".into()));
        assert_eq!(err.status(), 500);
    }

    #[test]
    fn display_carries_message() {
        let err = ScimError::invalid_path("path must be specified");
        assert_eq!(err.to_string(), "invalid path: path must be specified");
    }
}
