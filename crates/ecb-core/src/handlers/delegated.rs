//! Build and test, delegated to the session's collaborators

use super::to_json;
use crate::collaborators::{BuildRequest, TestMode, TestRequest};
use crate::command::Command;
use crate::dispatcher::{Handler, HandlerContext};
use crate::error::BridgeError;
use crate::jobs::{parse_timeout, run_job, Progress};
use crate::session::Session;
use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use std::time::Duration;

/// Options consumed by the bridge itself rather than passed through
const RESERVED: &[&str] = &["development", "timeout"];

fn job_timeout(session: &Session, command: &Command) -> Result<Duration, BridgeError> {
    command
        .get_option("timeout")
        .map_or_else(|| Ok(session.config().operation_timeout()), parse_timeout)
}

fn passthrough(command: &Command) -> IndexMap<String, String> {
    command
        .options()
        .iter()
        .filter(|(key, _)| !RESERVED.contains(&key.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

pub(super) struct BuildHandler;

#[async_trait]
impl Handler for BuildHandler {
    async fn handle(&self, ctx: &mut HandlerContext<'_>, command: &Command) -> Result<Value, BridgeError> {
        let session = ctx.session();
        let request = BuildRequest {
            target: command.require(0, "target")?.to_string(),
            output_path: command.require(1, "outputPath")?.to_string(),
            development: command.flag("development")?,
            options: passthrough(command),
        };
        let timeout = job_timeout(session, command)?;
        tracing::debug!(build_target = %request.target, ?timeout, "build requested");

        let build = session.build_system();
        let progress = Progress::new(command.name(), session.channel().clone());
        let report = run_job(timeout, progress, move |cancel, progress| async move {
            build.build(request, cancel, progress).await
        })
        .await?;
        to_json(&report)
    }
}

pub(super) struct RunTestsHandler;

#[async_trait]
impl Handler for RunTestsHandler {
    async fn handle(&self, ctx: &mut HandlerContext<'_>, command: &Command) -> Result<Value, BridgeError> {
        let session = ctx.session();
        let mode: TestMode = command.require(0, "mode")?.parse()?;
        let request = TestRequest {
            mode,
            filters: command.args().iter().skip(1).cloned().collect(),
        };
        let timeout = job_timeout(session, command)?;
        tracing::debug!(%mode, filters = request.filters.len(), ?timeout, "tests requested");

        let tests = session.test_runner();
        let progress = Progress::new(command.name(), session.channel().clone());
        let report = run_job(timeout, progress, move |cancel, progress| async move {
            tests.run_tests(request, cancel, progress).await
        })
        .await?;
        to_json(&report)
    }
}
