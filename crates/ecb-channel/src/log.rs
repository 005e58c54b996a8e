use crate::error::ChannelError;
use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only operation log, one `[yyyy-mm-dd hh:mm:ss] message` line per event
#[derive(Debug)]
pub struct OperationLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl OperationLog {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Format one log line without the trailing newline
    #[must_use]
    pub fn format_line(message: &str) -> String {
        // embedded newlines would split one event over several lines
        let flat = message.replace(['\r', '\n'], " ");
        format!("[{}] {flat}", crate::timestamp())
    }

    /// Append one line
    pub fn append(&self, message: &str) -> Result<(), ChannelError> {
        let line = Self::format_line(message);
        let _guard = self.lock.lock();

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ChannelError::io(parent, e))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| ChannelError::io(&self.path, e))?;
        writeln!(file, "{line}").map_err(|e| ChannelError::io(&self.path, e))
    }

    /// Append, downgrading failure to a tracing warning
    pub fn append_or_warn(&self, message: &str) {
        if let Err(e) = self.append(message) {
            tracing::warn!(error = %e, "operation log write failed");
        }
    }
}
