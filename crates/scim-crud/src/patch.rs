//! SCIM PATCH operations (RFC 7644 §3.5.2) on top of the dispatcher.

use std::fmt;
use std::str::FromStr;

use scim_prop::Resource;
use scim_schema::{Result, ScimError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::dispatch;

/// Schema URN of a PATCH request message.
pub const PATCH_OP_SCHEMA: &str = "urn:ietf:params:scim:api:messages:2.0:PatchOp";

/// Kind of a PATCH operation. Parsing ignores case.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum PatchOp {
    Add,
    Replace,
    Remove,
}

impl FromStr for PatchOp {
    type Err = ScimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "add" => Ok(Self::Add),
            "replace" => Ok(Self::Replace),
            "remove" => Ok(Self::Remove),
            _ => Err(ScimError::InvalidSyntax(format!("unknown patch op '{s}'"))),
        }
    }
}

impl TryFrom<String> for PatchOp {
    type Error = ScimError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl fmt::Display for PatchOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "add",
            Self::Replace => "replace",
            Self::Remove => "remove",
        })
    }
}

/// One entry of a PATCH request's `Operations` list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatchOperation {
    pub op: PatchOp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl PatchOperation {
    /// Operation with an optional target path and value.
    pub fn new(op: PatchOp, path: Option<&str>, value: Option<Value>) -> Self {
        Self {
            op,
            path: path.map(str::to_string),
            value,
        }
    }

    /// Apply this operation to `resource`.
    ///
    /// `add` and `replace` require a value. For `remove`, a value narrows
    /// the delete to matching elements, as for [`dispatch::delete`].
    pub fn apply(&self, resource: &mut Resource) -> Result<()> {
        let path = self.path.as_deref().unwrap_or("");
        match self.op {
            PatchOp::Add => dispatch::add(resource, path, self.required_value()?),
            PatchOp::Replace => dispatch::replace(resource, path, self.required_value()?),
            PatchOp::Remove => dispatch::delete(resource, path, self.value.clone()),
        }
    }

    fn required_value(&self) -> Result<Value> {
        self.value
            .clone()
            .ok_or_else(|| ScimError::invalid_value(format!("'{}' operation requires a value", self.op)))
    }
}

/// A PATCH request message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatchRequest {
    pub schemas: Vec<String>,
    #[serde(rename = "Operations", alias = "operations")]
    pub operations: Vec<PatchOperation>,
}

impl PatchRequest {
    /// Request carrying the PatchOp message schema.
    pub fn new(operations: Vec<PatchOperation>) -> Self {
        Self {
            schemas: vec![PATCH_OP_SCHEMA.to_string()],
            operations,
        }
    }

    /// Parse and validate a request body.
    pub fn from_json(body: &str) -> Result<Self> {
        let request: Self = serde_json::from_str(body)
            .map_err(|e| ScimError::InvalidSyntax(e.to_string()))?;
        if !request.schemas.iter().any(|s| s == PATCH_OP_SCHEMA) {
            return Err(ScimError::InvalidSyntax(format!(
                "patch request must declare schema {PATCH_OP_SCHEMA}"
            )));
        }
        Ok(request)
    }

    /// Apply every operation in order, see [`apply_patch`].
    pub fn apply(&self, resource: &mut Resource) -> Result<()> {
        apply_patch(resource, &self.operations)
    }
}

/// Apply `operations` in order, stopping at the first failure.
///
/// Operations before the failing one stay applied.
pub fn apply_patch(resource: &mut Resource, operations: &[PatchOperation]) -> Result<()> {
    for (i, operation) in operations.iter().enumerate() {
        debug!(index = i, op = %operation.op, path = ?operation.path, "applying patch operation");
        operation.apply(resource)?;
    }
    Ok(())
}
