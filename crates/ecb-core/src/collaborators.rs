//! Build and test collaborators
//!
//! The bridge never builds or tests anything itself. It hands a request to a
//! [`BuildSystem`] or [`TestRunner`] and reports what comes back. The stock
//! implementation, [`ProcessToolchain`], drives an external program over a
//! one-line JSON protocol:
//!
//! ```text
//! stdin  <- {"action":"build.run","parameters":{...}}
//! stdout -> progress line
//! stdout -> progress line
//! stdout -> {"result":"Succeeded","totalTimeSeconds":12.5,...}   (last line = report)
//! ```

use crate::config::ToolchainConfig;
use crate::error::BridgeError;
use crate::jobs::{CancelToken, Progress};
use async_trait::async_trait;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::process::Stdio;
use std::str::FromStr;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};

/// What to build and where
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRequest {
    pub target: String,
    pub output_path: String,
    pub development: bool,
    /// Extra `--key=value` options passed through untouched
    pub options: IndexMap<String, String>,
}

/// Final state of a build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BuildResult {
    Succeeded,
    Failed,
    Cancelled,
    #[default]
    Unknown,
}

/// Outcome of a build; a failed build is data, not an error
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildReport {
    pub result: BuildResult,
    pub total_time_seconds: f64,
    pub total_size_bytes: u64,
    pub output_path: String,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestMode {
    EditMode,
    PlayMode,
}

impl TestMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TestMode::EditMode => "editmode",
            TestMode::PlayMode => "playmode",
        }
    }
}

impl FromStr for TestMode {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "editmode" => Ok(TestMode::EditMode),
            "playmode" => Ok(TestMode::PlayMode),
            _ => Err(BridgeError::invalid_argument(format!(
                "unknown test mode '{s}', expected editmode or playmode"
            ))),
        }
    }
}

impl std::fmt::Display for TestMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRequest {
    pub mode: TestMode,
    pub filters: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestReport {
    pub passed: u32,
    pub failed: u32,
    pub skipped: u32,
    pub report_path: Option<String>,
}

/// Build subsystem
#[async_trait]
pub trait BuildSystem: Send + Sync {
    async fn build(
        &self,
        request: BuildRequest,
        cancel: CancelToken,
        progress: Progress,
    ) -> Result<BuildReport, BridgeError>;
}

/// Test subsystem
#[async_trait]
pub trait TestRunner: Send + Sync {
    async fn run_tests(
        &self,
        request: TestRequest,
        cancel: CancelToken,
        progress: Progress,
    ) -> Result<TestReport, BridgeError>;
}

/// Stand-in used when no toolchain is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

const UNAVAILABLE: &str = "no toolchain configured (set toolchain.program)";

#[async_trait]
impl BuildSystem for Unavailable {
    async fn build(&self, _: BuildRequest, _: CancelToken, _: Progress) -> Result<BuildReport, BridgeError> {
        Err(BridgeError::collaborator("build system", UNAVAILABLE))
    }
}

#[async_trait]
impl TestRunner for Unavailable {
    async fn run_tests(&self, _: TestRequest, _: CancelToken, _: Progress) -> Result<TestReport, BridgeError> {
        Err(BridgeError::collaborator("test runner", UNAVAILABLE))
    }
}

/// Build/test collaborator backed by an external program
#[derive(Debug, Clone)]
pub struct ProcessToolchain {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl ProcessToolchain {
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
        }
    }

    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// `None` when the configuration names no program
    #[must_use]
    pub fn from_config(config: &ToolchainConfig) -> Option<Self> {
        let program = config.program.as_ref()?;
        let mut toolchain = Self::new(program.clone()).with_args(config.args.iter().cloned());
        toolchain.working_dir = config.working_dir.clone();
        Some(toolchain)
    }

    async fn invoke<R: DeserializeOwned>(
        &self,
        collaborator: &str,
        action: &str,
        parameters: Value,
        cancel: &CancelToken,
        progress: &Progress,
    ) -> Result<R, BridgeError> {
        let fail = |message: String| BridgeError::collaborator(collaborator, message);

        let mut command = tokio::process::Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }
        let mut child = command
            .spawn()
            .map_err(|e| fail(format!("cannot start '{}': {e}", self.program)))?;
        tracing::debug!(program = %self.program, action, "toolchain started");

        if let Some(mut stdin) = child.stdin.take() {
            let request = json!({ "action": action, "parameters": parameters });
            // a program that exits without reading is judged by its exit status
            if let Err(e) = stdin.write_all(format!("{request}\n").as_bytes()).await {
                tracing::debug!(program = %self.program, error = %e, "request not delivered");
            }
        }

        let stderr = child.stderr.take();
        let stderr_task = tokio::spawn(async move {
            let mut text = String::new();
            if let Some(mut stderr) = stderr {
                let _ = stderr.read_to_string(&mut text).await;
            }
            text
        });

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| BridgeError::Internal("toolchain stdout not captured".to_string()))?;
        let mut lines = BufReader::new(stdout).lines();
        let mut last: Option<String> = None;
        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| fail(format!("cannot read output: {e}")))?
        {
            if cancel.is_cancelled() {
                let _ = child.kill().await;
                return Err(BridgeError::Cancelled);
            }
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(previous) = last.replace(line.to_string()) {
                progress.report(&previous);
            }
        }

        let status = child
            .wait()
            .await
            .map_err(|e| fail(format!("cannot wait for '{}': {e}", self.program)))?;
        let stderr = stderr_task.await.unwrap_or_default();
        if !status.success() {
            let detail = stderr.trim();
            return Err(fail(if detail.is_empty() {
                format!("'{}' exited with {status}", self.program)
            } else {
                format!("'{}' exited with {status}: {detail}", self.program)
            }));
        }

        let report = last.ok_or_else(|| fail("no report on stdout".to_string()))?;
        serde_json::from_str(&report).map_err(|e| fail(format!("malformed report '{report}': {e}")))
    }
}

#[async_trait]
impl BuildSystem for ProcessToolchain {
    async fn build(
        &self,
        request: BuildRequest,
        cancel: CancelToken,
        progress: Progress,
    ) -> Result<BuildReport, BridgeError> {
        let parameters = serde_json::to_value(&request).map_err(|e| BridgeError::Internal(e.to_string()))?;
        self.invoke("build system", "build.run", parameters, &cancel, &progress)
            .await
    }
}

#[async_trait]
impl TestRunner for ProcessToolchain {
    async fn run_tests(
        &self,
        request: TestRequest,
        cancel: CancelToken,
        progress: Progress,
    ) -> Result<TestReport, BridgeError> {
        let parameters = serde_json::to_value(&request).map_err(|e| BridgeError::Internal(e.to_string()))?;
        self.invoke("test runner", "test.run", parameters, &cancel, &progress)
            .await
    }
}
