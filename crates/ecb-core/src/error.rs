//! Error types for the bridge
//!
//! Handlers return [`BridgeError`]; the dispatcher performs the single
//! conversion into the client-facing [`ErrorKind`].

use ecb_channel::{ChannelError, ErrorKind};
use ecb_reflect::ReflectError;
use ecb_scene::SceneError;
use std::time::Duration;

/// Main bridge error type
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// No handler registered under the name
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// Scene graph failure
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// Type resolution or property access failure
    #[error(transparent)]
    Reflect(#[from] ReflectError),

    /// The node exists but has no such component
    #[error("component {type_name} not found on '{path}'")]
    ComponentNotFound { path: String, type_name: String },

    /// Missing or malformed command argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A delegated job exceeded its time budget
    #[error("operation timed out after {after:?}")]
    Timeout { after: Duration },

    /// A delegated job observed cancellation
    #[error("operation cancelled")]
    Cancelled,

    /// External build/test collaborator failed
    #[error("{collaborator} failed: {message}")]
    Collaborator { collaborator: String, message: String },

    /// Result channel failure
    #[error(transparent)]
    Channel(#[from] ChannelError),

    /// Configuration failure
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Handler panicked or an invariant broke
    #[error("internal error: {0}")]
    Internal(String),
}

impl BridgeError {
    #[inline]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    #[inline]
    pub fn collaborator(collaborator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Collaborator {
            collaborator: collaborator.into(),
            message: message.into(),
        }
    }

    /// Client-facing classification
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            BridgeError::UnknownCommand(_) => ErrorKind::UnknownCommand,
            BridgeError::Scene(e) => match e {
                SceneError::NodeNotFound(_) => ErrorKind::ObjectNotFound,
                SceneError::DepthLimitExceeded { .. } => ErrorKind::DepthLimitExceeded,
                SceneError::Document(_) => ErrorKind::IOFailure,
                SceneError::InvalidPath { .. }
                | SceneError::CycleRejected { .. }
                | SceneError::ComponentIndex { .. } => ErrorKind::InvalidArgument,
            },
            BridgeError::Reflect(e) => match e {
                ReflectError::TypeNotFound(_) => ErrorKind::TypeNotFound,
                ReflectError::PropertyNotFound { .. } | ReflectError::Unreadable { .. } => {
                    ErrorKind::PropertyNotFound
                }
                ReflectError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
                ReflectError::DuplicateType(_) | ReflectError::InvalidDeclaration { .. } => {
                    ErrorKind::InvalidArgument
                }
            },
            BridgeError::ComponentNotFound { .. } => ErrorKind::ObjectNotFound,
            BridgeError::InvalidArgument(_) | BridgeError::Config(_) => ErrorKind::InvalidArgument,
            BridgeError::Timeout { .. } => ErrorKind::Timeout,
            BridgeError::Cancelled => ErrorKind::Cancelled,
            BridgeError::Collaborator { .. } => ErrorKind::CollaboratorFailure,
            BridgeError::Channel(_) => ErrorKind::IOFailure,
            BridgeError::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {message}")]
    Io { path: String, message: String },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot encode config: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("unknown setting '{0}'")]
    UnknownKey(String),

    #[error("invalid value '{value}' for '{key}': {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_and_reflect_errors_classify() {
        let cases: Vec<(BridgeError, ErrorKind)> = vec![
            (SceneError::not_found("root/x").into(), ErrorKind::ObjectNotFound),
            (
                SceneError::DepthLimitExceeded { max_depth: 4 }.into(),
                ErrorKind::DepthLimitExceeded,
            ),
            (ReflectError::TypeNotFound("Foo".into()).into(), ErrorKind::TypeNotFound),
            (
                ReflectError::TypeMismatch {
                    property: "mass".into(),
                    expected: "float".into(),
                    value: "heavy".into(),
                }
                .into(),
                ErrorKind::TypeMismatch,
            ),
            (BridgeError::Timeout { after: Duration::from_secs(1) }, ErrorKind::Timeout),
        ];
        for (error, kind) in cases {
            assert_eq!(error.kind(), kind, "{error}");
        }
    }

    #[test]
    fn messages_are_preserved() {
        let error: BridgeError = SceneError::not_found("root/missing").into();
        assert_eq!(error.to_string(), "object not found: root/missing");
    }
}
