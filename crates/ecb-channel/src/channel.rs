//! Artifact writer

use crate::error::ChannelError;
use crate::kind::ErrorKind;
use crate::log::OperationLog;
use crate::result::OperationResult;
use parking_lot::Mutex;
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use ulid::Ulid;

/// Which artifact an outcome is written to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Result,
    Error,
}

impl ArtifactKind {
    #[inline]
    #[must_use]
    pub fn of(result: &OperationResult) -> Self {
        if result.success {
            ArtifactKind::Result
        } else {
            ArtifactKind::Error
        }
    }

    #[inline]
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            ArtifactKind::Result => "result",
            ArtifactKind::Error => "error",
        }
    }

    #[inline]
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            ArtifactKind::Result => ArtifactKind::Error,
            ArtifactKind::Error => ArtifactKind::Result,
        }
    }
}

/// Map an operation name onto `[A-Za-z0-9._-]` for use in file names
#[must_use]
pub fn sanitize_operation(operation: &str) -> String {
    let cleaned: String = operation
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "operation".to_string()
    } else {
        cleaned
    }
}

/// Serialized single writer for result artifacts
#[derive(Debug)]
pub struct ResultChannel {
    output_dir: PathBuf,
    log: OperationLog,
    writer: Mutex<()>,
}

impl ResultChannel {
    /// Create a channel writing artifacts into `output_dir` and lines into `log_path`
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>, log_path: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            log: OperationLog::new(log_path),
            writer: Mutex::new(()),
        }
    }

    #[inline]
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    #[inline]
    #[must_use]
    pub fn log(&self) -> &OperationLog {
        &self.log
    }

    /// Final artifact path for an operation
    #[must_use]
    pub fn artifact_path(&self, operation: &str, kind: ArtifactKind) -> PathBuf {
        self.output_dir
            .join(format!("{}_{}.json", sanitize_operation(operation), kind.suffix()))
    }

    /// Write a success artifact
    pub fn write_result(&self, operation: &str, data: Value) -> Result<OperationResult, ChannelError> {
        let result = OperationResult::success(operation, data);
        self.write(&result)?;
        Ok(result)
    }

    /// Write a failure artifact
    pub fn write_error(
        &self,
        operation: &str,
        kind: ErrorKind,
        message: &str,
    ) -> Result<OperationResult, ChannelError> {
        let result = OperationResult::failure(operation, kind, message);
        self.write(&result)?;
        Ok(result)
    }

    /// Write one outcome
    ///
    /// On failure a single fallback diagnostic is emitted and the error is
    /// returned; the channel stays usable for later writes.
    pub fn write(&self, result: &OperationResult) -> Result<PathBuf, ChannelError> {
        match self.write_artifact(result) {
            Ok(path) => {
                self.log.append_or_warn(&format!(
                    "{} {} -> {}",
                    result.operation,
                    result.operation_id,
                    path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default()
                ));
                Ok(path)
            }
            Err(e) => {
                tracing::error!(operation = %result.operation, error = %e, "result artifact write failed");
                self.log
                    .append_or_warn(&format!("{} failed to write result artifact: {e}", result.operation));
                Err(e)
            }
        }
    }

    fn write_artifact(&self, result: &OperationResult) -> Result<PathBuf, ChannelError> {
        let body = serde_json::to_vec_pretty(result)?;
        let kind = ArtifactKind::of(result);
        let final_path = self.artifact_path(&result.operation, kind);

        let _guard = self.writer.lock();
        fs::create_dir_all(&self.output_dir).map_err(|e| ChannelError::io(&self.output_dir, e))?;

        let tmp_path = self.output_dir.join(format!(
            ".{}.{}.tmp",
            sanitize_operation(&result.operation),
            Ulid::new()
        ));
        if let Err(e) = write_synced(&tmp_path, &body).and_then(|()| fs::rename(&tmp_path, &final_path)) {
            let _ = fs::remove_file(&tmp_path);
            return Err(ChannelError::io(&final_path, e));
        }

        // the surviving artifact must be the latest outcome
        let stale = self.artifact_path(&result.operation, kind.opposite());
        match fs::remove_file(&stale) {
            Ok(()) => tracing::debug!(path = %stale.display(), "removed stale artifact"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %stale.display(), error = %e, "could not remove stale artifact"),
        }

        tracing::debug!(path = %final_path.display(), operation_id = %result.operation_id, "artifact written");
        Ok(final_path)
    }

    /// Read back the current artifact of an operation
    pub fn read(&self, operation: &str, kind: ArtifactKind) -> Result<OperationResult, ChannelError> {
        let path = self.artifact_path(operation, kind);
        let text = fs::read_to_string(&path).map_err(|e| ChannelError::io(&path, e))?;
        Ok(serde_json::from_str(&text)?)
    }
}

fn write_synced(path: &Path, body: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(body)?;
    file.write_all(b"\n")?;
    file.sync_all()
}
