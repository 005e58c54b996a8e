//! ECB Result Channel
//!
//! Every operation is answered by exactly one JSON artifact in the output
//! directory, `<operation>_result.json` or `<operation>_error.json`, plus
//! lines in an append-only log.
//!
//! # Write exclusivity
//!
//! All artifact writes go through one mutex-guarded writer. Each artifact is
//! written to a uniquely named temporary file in the same directory, synced,
//! then renamed over the final name, so a reader never sees a partial or
//! interleaved file. Every artifact carries a fresh [`OperationId`] so two
//! outcomes of the same operation can be told apart.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod channel;
mod error;
mod kind;
mod log;
mod result;

pub use channel::{sanitize_operation, ArtifactKind, ResultChannel};
pub use error::ChannelError;
pub use kind::ErrorKind;
pub use log::OperationLog;
pub use result::{OperationId, OperationResult};

/// Timestamp format used in artifacts and log lines
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local time as `yyyy-mm-dd hh:mm:ss`
#[must_use]
pub fn timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}
