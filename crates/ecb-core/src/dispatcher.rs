//! Command dispatcher
//!
//! Routes a [`Command`] to the handler registered under its name and turns
//! whatever happens into exactly one [`OperationResult`], which is written
//! to the result channel before it is returned.

use crate::command::Command;
use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::handlers;
use crate::session::Session;
use async_trait::async_trait;
use ecb_channel::OperationResult;
use ecb_reflect::TypeRegistry;
use ecb_scene::SceneGraph;
use futures::FutureExt;
use serde_json::Value;
use std::any::Any;
use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// Operation name used when a request cannot be parsed
pub const REQUEST_OPERATION: &str = "request";

/// A named operation
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, ctx: &mut HandlerContext<'_>, command: &Command) -> Result<Value, BridgeError>;
}

/// Adapts a synchronous function into a [`Handler`]
pub struct FnHandler<F>(F);

impl<F> FnHandler<F>
where
    F: Fn(&mut HandlerContext<'_>, &Command) -> Result<Value, BridgeError> + Send + Sync,
{
    #[inline]
    #[must_use]
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> Handler for FnHandler<F>
where
    F: Fn(&mut HandlerContext<'_>, &Command) -> Result<Value, BridgeError> + Send + Sync,
{
    async fn handle(&self, ctx: &mut HandlerContext<'_>, command: &Command) -> Result<Value, BridgeError> {
        (self.0)(ctx, command)
    }
}

/// What a handler gets to work with for one invocation
pub struct HandlerContext<'a> {
    graph: &'a mut SceneGraph,
    dispatcher: &'a Dispatcher,
}

impl<'a> HandlerContext<'a> {
    #[inline]
    pub fn graph(&self) -> &SceneGraph {
        self.graph
    }

    #[inline]
    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        self.graph
    }

    #[inline]
    pub fn dispatcher(&self) -> &'a Dispatcher {
        self.dispatcher
    }

    #[inline]
    pub fn session(&self) -> &'a Session {
        &self.dispatcher.session
    }

    #[inline]
    pub fn registry(&self) -> &'a TypeRegistry {
        self.session().registry()
    }

    #[inline]
    pub fn config(&self) -> &'a BridgeConfig {
        self.session().config()
    }
}

/// Name → handler registry
pub struct Dispatcher {
    session: Arc<Session>,
    handlers: BTreeMap<String, Arc<dyn Handler>>,
}

impl Dispatcher {
    /// Dispatcher with every built-in command registered
    #[must_use]
    pub fn new(session: Arc<Session>) -> Self {
        let mut dispatcher = Self::empty(session);
        for (name, handler) in handlers::builtin() {
            dispatcher.register(name, handler);
        }
        dispatcher
    }

    /// Dispatcher with no commands
    #[must_use]
    pub fn empty(session: Arc<Session>) -> Self {
        Self {
            session,
            handlers: BTreeMap::new(),
        }
    }

    /// Register or replace a handler
    pub fn register(&mut self, name: impl Into<String>, handler: Arc<dyn Handler>) {
        let name = name.into();
        if self.handlers.insert(name.clone(), handler).is_some() {
            tracing::debug!(command = %name, "handler replaced");
        }
    }

    #[inline]
    #[must_use]
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Registered names, sorted
    pub fn command_names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Run one command against `graph`
    ///
    /// Never fails: unknown names, handler errors and handler panics all
    /// come back as failure results. The result is written to the channel
    /// first; a channel failure is logged and does not change the result.
    pub async fn dispatch(&self, graph: &mut SceneGraph, command: &Command) -> OperationResult {
        let _in_flight = self.session.gate().lock().await;
        let name = command.name();
        self.session
            .channel()
            .log()
            .append_or_warn(&format!("dispatch {command}"));
        tracing::info!(command = name, args = command.args().len(), "dispatch");

        let outcome = match self.handlers.get(name) {
            None => Err(BridgeError::UnknownCommand(name.to_string())),
            Some(handler) => {
                let handler = Arc::clone(handler);
                let mut ctx = HandlerContext { graph, dispatcher: self };
                AssertUnwindSafe(handler.handle(&mut ctx, command))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|panic| {
                        tracing::error!(command = name, "handler panicked");
                        Err(BridgeError::Internal(format!(
                            "{name} panicked: {}",
                            panic_message(&*panic)
                        )))
                    })
            }
        };
        self.finish(name, outcome)
    }

    /// Parse one request line and dispatch it
    ///
    /// A line that does not parse is answered under the `request` operation
    /// with `InvalidArgument`.
    pub async fn dispatch_line(&self, graph: &mut SceneGraph, line: &str) -> OperationResult {
        match Command::parse_line(line) {
            Ok(command) => self.dispatch(graph, &command).await,
            Err(e) => {
                let _in_flight = self.session.gate().lock().await;
                self.session
                    .channel()
                    .log()
                    .append_or_warn(&format!("dispatch {REQUEST_OPERATION}"));
                self.finish(REQUEST_OPERATION, Err(e))
            }
        }
    }

    fn finish(&self, operation: &str, outcome: Result<Value, BridgeError>) -> OperationResult {
        let log = self.session.channel().log();
        let result = match outcome {
            Ok(data) => {
                log.append_or_warn(&format!("{operation} completed"));
                tracing::info!(command = operation, "completed");
                OperationResult::success(operation, data)
            }
            Err(e) => {
                let kind = e.kind();
                log.append_or_warn(&format!("{operation} failed ({kind}): {e}"));
                tracing::warn!(command = operation, kind = %kind, error = %e, "failed");
                OperationResult::failure(operation, kind, e.to_string())
            }
        };
        if let Err(e) = self.session.channel().write(&result) {
            tracing::warn!(command = operation, error = %e, "result not delivered to channel");
        }
        result
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("session", &self.session)
            .field("commands", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
