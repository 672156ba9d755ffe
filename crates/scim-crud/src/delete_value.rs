//! Payloads accepted by delete.

use scim_expr::{from_value, from_value_list, Expression};
use scim_schema::{Result, ScimError};
use serde_json::{Map, Value};

/// Selects which elements of a multi-valued attribute a delete removes.
#[derive(Clone, Debug, PartialEq)]
pub enum DeleteValue {
    /// Elements whose fields equal every entry of the mapping.
    SingleFilter(Map<String, Value>),
    /// Elements matching any of the mappings.
    FilterList(Vec<Map<String, Value>>),
}

impl DeleteValue {
    /// Compile the payload into a filter expression.
    ///
    /// A payload that is well shaped but cannot become a filter, such as a
    /// mapping with a nested object, fails with [`ScimError::InvalidValue`].
    pub fn to_filter(&self) -> Result<Expression> {
        let compiled = match self {
            Self::SingleFilter(map) => from_value(map),
            Self::FilterList(maps) => {
                let list: Vec<Value> = maps.iter().cloned().map(Value::Object).collect();
                from_value_list(&list)
            }
        };
        compiled.map_err(|e| ScimError::invalid_value(e.to_string()))
    }
}

impl TryFrom<Value> for DeleteValue {
    type Error = ScimError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self::SingleFilter(map)),
            Value::Array(items) => {
                let mut maps = Vec::with_capacity(items.len());
                for (i, item) in items.into_iter().enumerate() {
                    match item {
                        Value::Object(map) => maps.push(map),
                        other => {
                            return Err(ScimError::invalid_value(format!(
                                "delete filter list element {i} is not a mapping: {other}"
                            )))
                        }
                    }
                }
                Ok(Self::FilterList(maps))
            }
            other => Err(ScimError::invalid_value(format!(
                "unsupported delete value: {other}"
            ))),
        }
    }
}

impl From<Map<String, Value>> for DeleteValue {
    fn from(map: Map<String, Value>) -> Self {
        Self::SingleFilter(map)
    }
}

impl From<Vec<Map<String, Value>>> for DeleteValue {
    fn from(maps: Vec<Map<String, Value>>) -> Self {
        Self::FilterList(maps)
    }
}
