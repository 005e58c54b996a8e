//! ECB Validation
//!
//! Checks evaluated once per node during a depth-first traversal, collected
//! into a [`ValidationReport`]. Only [`Severity::Issue`] findings make a
//! report invalid; warnings and info are advisory.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod checks;
mod engine;
mod issue;

pub use engine::ValidationEngine;
pub use issue::{Category, Severity, ValidationIssue, ValidationReport};
