//! Attribute definitions: the typed shape of every node in a resource tree.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Data type of an attribute, using the SCIM type keywords.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttributeType {
    String,
    Boolean,
    Decimal,
    Integer,
    DateTime,
    Binary,
    Reference,
    Complex,
}

impl AttributeType {
    /// Returns `true` for types whose raw value is a JSON string.
    pub fn is_string_like(&self) -> bool {
        matches!(
            self,
            Self::String | Self::DateTime | Self::Binary | Self::Reference
        )
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Decimal => "decimal",
            Self::Integer => "integer",
            Self::DateTime => "dateTime",
            Self::Binary => "binary",
            Self::Reference => "reference",
            Self::Complex => "complex",
        };
        f.write_str(s)
    }
}

/// Definition of a single attribute.
///
/// Attribute names are matched case-insensitively, as SCIM requires.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    pub name: String,
    #[serde(rename = "type")]
    pub attr_type: AttributeType,
    #[serde(default)]
    pub multi_valued: bool,
    #[serde(default)]
    pub case_exact: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_attributes: Vec<Attribute>,
}

impl Attribute {
    /// Create a single-valued, case-insensitive, optional attribute.
    pub fn new(name: impl Into<String>, attr_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            attr_type,
            multi_valued: false,
            case_exact: false,
            required: false,
            description: None,
            sub_attributes: Vec::new(),
        }
    }

    /// Create a complex attribute with the given sub-attributes.
    pub fn complex(name: impl Into<String>, sub_attributes: Vec<Attribute>) -> Self {
        Self {
            sub_attributes,
            ..Self::new(name, AttributeType::Complex)
        }
    }

    pub fn multi_valued(mut self) -> Self {
        self.multi_valued = true;
        self
    }

    pub fn case_exact(mut self) -> Self {
        self.case_exact = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn is_complex(&self) -> bool {
        self.attr_type == AttributeType::Complex
    }

    /// Returns `true` if `name` refers to this attribute.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Look up a sub-attribute by name.
    pub fn sub_attribute(&self, name: &str) -> Option<&Attribute> {
        self.sub_attributes.iter().find(|a| a.matches_name(name))
    }

    /// The single-valued shape of each element of a multi-valued attribute.
    ///
    /// For a single-valued attribute this is a plain clone.
    pub fn element(&self) -> Attribute {
        Attribute {
            multi_valued: false,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_scim_definition() {
        let attr: Attribute = serde_json::from_value(json!({
            "name": "emails",
            "type": "complex",
            "multiValued": true,
            "subAttributes": [
                {"name": "value", "type": "string"},
                {"name": "primary", "type": "boolean"}
            ]
        }))
        .unwrap();

        assert!(attr.multi_valued);
        assert!(attr.is_complex());
        assert!(!attr.case_exact);
        assert_eq!(attr.sub_attributes.len(), 2);
        assert_eq!(
            attr.sub_attribute("PRIMARY").unwrap().attr_type,
            AttributeType::Boolean
        );
    }

    #[test]
    fn date_time_keyword() {
        let t: AttributeType = serde_json::from_value(json!("dateTime")).unwrap();
        assert_eq!(t, AttributeType::DateTime);
        assert_eq!(t.to_string(), "dateTime");
        assert!(t.is_string_like());
    }

    #[test]
    fn element_drops_multi_valued() {
        let attr = Attribute::new("tags", AttributeType::String).multi_valued();
        let element = attr.element();
        assert!(!element.multi_valued);
        assert_eq!(element.name, "tags");
    }

    #[test]
    fn name_matching_ignores_case() {
        let attr = Attribute::new("displayName", AttributeType::String);
        assert!(attr.matches_name("displayname"));
        assert!(!attr.matches_name("display"));
    }
}
