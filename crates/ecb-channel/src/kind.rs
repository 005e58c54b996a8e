use serde::{Deserialize, Serialize};
use std::fmt;

/// Client-facing error taxonomy, serialized by variant name
///
/// An invalid validation report is data inside a successful result, so
/// there is no validation variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    UnknownCommand,
    TypeNotFound,
    ObjectNotFound,
    PropertyNotFound,
    TypeMismatch,
    InvalidArgument,
    DepthLimitExceeded,
    Timeout,
    Cancelled,
    CollaboratorFailure,
    IOFailure,
    Internal,
}

impl ErrorKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::UnknownCommand => "UnknownCommand",
            ErrorKind::TypeNotFound => "TypeNotFound",
            ErrorKind::ObjectNotFound => "ObjectNotFound",
            ErrorKind::PropertyNotFound => "PropertyNotFound",
            ErrorKind::TypeMismatch => "TypeMismatch",
            ErrorKind::InvalidArgument => "InvalidArgument",
            ErrorKind::DepthLimitExceeded => "DepthLimitExceeded",
            ErrorKind::Timeout => "Timeout",
            ErrorKind::Cancelled => "Cancelled",
            ErrorKind::CollaboratorFailure => "CollaboratorFailure",
            ErrorKind::IOFailure => "IOFailure",
            ErrorKind::Internal => "Internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
