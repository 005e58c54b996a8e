use crate::kind::ErrorKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ulid::Ulid;

/// Unique operation identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OperationId(pub Ulid);

impl OperationId {
    /// Generate new operation ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for OperationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OperationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The sole record of one operation's outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResult {
    pub operation_id: OperationId,
    pub operation: String,
    pub timestamp: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl OperationResult {
    /// Successful outcome carrying `data`
    #[must_use]
    pub fn success(operation: impl Into<String>, data: Value) -> Self {
        Self {
            operation_id: OperationId::new(),
            operation: operation.into(),
            timestamp: crate::timestamp(),
            success: true,
            data: Some(data),
            error: None,
            error_kind: None,
        }
    }

    /// Failed outcome
    #[must_use]
    pub fn failure(operation: impl Into<String>, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            operation_id: OperationId::new(),
            operation: operation.into(),
            timestamp: crate::timestamp(),
            success: false,
            data: None,
            error: Some(message.into()),
            error_kind: Some(kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn failure_omits_data() {
        let result = OperationResult::failure("frobnicate", ErrorKind::UnknownCommand, "unknown command: frobnicate");
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["success"], json!(false));
        assert_eq!(value["errorKind"], json!("UnknownCommand"));
        assert_eq!(value["error"], json!("unknown command: frobnicate"));
        assert!(value.get("data").is_none());
        assert_eq!(value["operationId"].as_str().map(str::len), Some(26));
    }

    #[test]
    fn ids_are_unique() {
        let a = OperationResult::success("scan", json!({}));
        let b = OperationResult::success("scan", json!({}));
        assert_ne!(a.operation_id, b.operation_id);
    }
}
