//! Session state
//!
//! One [`Session`] is created at startup and handed to the dispatcher. It
//! owns everything that outlives a single command: configuration, the type
//! registry, the result channel, the in-flight gate and the collaborators.
//! The scene graph is not part of it; the host owns the graph and lends it
//! to each dispatch.

use crate::collaborators::{BuildSystem, ProcessToolchain, TestRunner, Unavailable};
use crate::config::BridgeConfig;
use crate::error::BridgeError;
use ecb_channel::ResultChannel;
use ecb_reflect::TypeRegistry;
use ecb_scene::Traversal;
use std::sync::Arc;

pub struct Session {
    config: BridgeConfig,
    registry: TypeRegistry,
    channel: Arc<ResultChannel>,
    gate: tokio::sync::Mutex<()>,
    build: Arc<dyn BuildSystem>,
    tests: Arc<dyn TestRunner>,
}

impl Session {
    /// Validate `config`, register built-in and declared types, open the channel
    pub fn new(config: BridgeConfig) -> Result<Self, BridgeError> {
        config.validate()?;

        let mut registry = TypeRegistry::with_builtins();
        let declared = registry.register_declarations(&config.types)?;

        let channel = Arc::new(ResultChannel::new(&config.output_dir, &config.log_file));
        let (build, tests): (Arc<dyn BuildSystem>, Arc<dyn TestRunner>) =
            match ProcessToolchain::from_config(&config.toolchain) {
                Some(toolchain) => {
                    let toolchain = Arc::new(toolchain);
                    let build: Arc<dyn BuildSystem> = toolchain.clone();
                    (build, toolchain)
                }
                None => (Arc::new(Unavailable), Arc::new(Unavailable)),
            };

        tracing::info!(
            output_dir = %config.output_dir.display(),
            types = registry.len(),
            declared,
            "session started"
        );
        channel.log().append_or_warn("session started");

        Ok(Self {
            config,
            registry,
            channel,
            gate: tokio::sync::Mutex::new(()),
            build,
            tests,
        })
    }

    /// Replace the build collaborator
    #[must_use]
    pub fn with_build_system(mut self, build: Arc<dyn BuildSystem>) -> Self {
        self.build = build;
        self
    }

    /// Replace the test collaborator
    #[must_use]
    pub fn with_test_runner(mut self, tests: Arc<dyn TestRunner>) -> Self {
        self.tests = tests;
        self
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    #[inline]
    #[must_use]
    pub fn channel(&self) -> &Arc<ResultChannel> {
        &self.channel
    }

    #[inline]
    #[must_use]
    pub fn build_system(&self) -> Arc<dyn BuildSystem> {
        Arc::clone(&self.build)
    }

    #[inline]
    #[must_use]
    pub fn test_runner(&self) -> Arc<dyn TestRunner> {
        Arc::clone(&self.tests)
    }

    /// Walker bounded by the configured depth
    #[inline]
    #[must_use]
    pub fn traversal(&self) -> Traversal {
        Traversal::new(self.config.max_traversal_depth)
    }

    #[inline]
    pub(crate) fn gate(&self) -> &tokio::sync::Mutex<()> {
        &self.gate
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("types", &self.registry.len())
            .finish_non_exhaustive()
    }
}
