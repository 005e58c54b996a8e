//! ECB Core - the command-dispatch bridge
//!
//! Ties the scene model, the type registry, the validation engine and the
//! result channel together behind named operations:
//! - [`Command`]: one request, parsed from argv, a text line or JSON
//! - [`Session`]: configuration, registry, channel and collaborators
//! - [`Dispatcher`]: name → [`Handler`], exactly one artifact per dispatch
//! - [`jobs`]: cancellable, time-bounded build/test jobs
//!
//! # Example
//!
//! ```rust,ignore
//! use ecb_core::{BridgeConfig, Command, Dispatcher, Session};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), ecb_core::BridgeError> {
//! let session = Arc::new(Session::new(BridgeConfig::load(None)?)?);
//! let dispatcher = Dispatcher::new(session);
//!
//! let mut graph = ecb_scene::SceneGraph::new();
//! let result = dispatcher.dispatch(&mut graph, &Command::new("scan")).await;
//! assert!(result.success);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod collaborators;
pub mod command;
pub mod config;
pub mod dispatcher;
pub mod error;
mod handlers;
pub mod jobs;
pub mod session;

pub use collaborators::{
    BuildReport, BuildRequest, BuildResult, BuildSystem, ProcessToolchain, TestMode, TestReport, TestRequest,
    TestRunner, Unavailable,
};
pub use command::Command;
pub use config::{BridgeConfig, ToolchainConfig, DEFAULT_CONFIG_FILE, SETTING_KEYS};
pub use dispatcher::{Dispatcher, FnHandler, Handler, HandlerContext, REQUEST_OPERATION};
pub use error::{BridgeError, ConfigError};
pub use jobs::{CancelToken, Progress};
pub use session::Session;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
