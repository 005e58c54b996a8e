//! Cancellable background jobs
//!
//! Delegated operations (build, test) run on the tokio runtime under a time
//! budget. Cancellation is cooperative: a job polls its [`CancelToken`] at
//! safe points and returns [`BridgeError::Cancelled`] once it is set.

use crate::error::BridgeError;
use ecb_channel::ResultChannel;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Shared cancellation flag
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// `Err(Cancelled)` once cancellation was requested
    #[inline]
    pub fn check(&self) -> Result<(), BridgeError> {
        if self.is_cancelled() {
            Err(BridgeError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Progress sink of one job, reported as operation log lines
#[derive(Debug, Clone)]
pub struct Progress {
    operation: String,
    channel: Arc<ResultChannel>,
}

impl Progress {
    #[must_use]
    pub fn new(operation: impl Into<String>, channel: Arc<ResultChannel>) -> Self {
        Self {
            operation: operation.into(),
            channel,
        }
    }

    #[inline]
    #[must_use]
    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn report(&self, message: &str) {
        tracing::info!(operation = %self.operation, "{message}");
        self.channel
            .log()
            .append_or_warn(&format!("{} progress: {message}", self.operation));
    }
}

/// Parse a `--timeout` value in seconds; fractions are allowed
pub fn parse_timeout(raw: &str) -> Result<Duration, BridgeError> {
    let secs: f64 = raw
        .trim()
        .parse()
        .map_err(|_| BridgeError::invalid_argument(format!("timeout '{raw}' is not a number of seconds")))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(BridgeError::invalid_argument(format!("timeout '{raw}' must be positive")));
    }
    Ok(Duration::from_secs_f64(secs))
}

/// Run `job` on the runtime, bounded by `timeout`
///
/// On expiry the token is cancelled, the task is aborted and
/// [`BridgeError::Timeout`] is returned. A panic inside the job becomes
/// [`BridgeError::Internal`].
pub async fn run_job<F, Fut, T>(timeout: Duration, progress: Progress, job: F) -> Result<T, BridgeError>
where
    F: FnOnce(CancelToken, Progress) -> Fut,
    Fut: Future<Output = Result<T, BridgeError>> + Send + 'static,
    T: Send + 'static,
{
    let token = CancelToken::new();
    let operation = progress.operation().to_string();
    progress.report("started");

    let mut handle = tokio::spawn(job(token.clone(), progress.clone()));
    match tokio::time::timeout(timeout, &mut handle).await {
        Ok(Ok(result)) => {
            progress.report(if result.is_ok() { "finished" } else { "failed" });
            result
        }
        Ok(Err(join)) if join.is_panic() => {
            tracing::error!(operation = %operation, "job panicked");
            Err(BridgeError::Internal(format!("{operation} job panicked")))
        }
        Ok(Err(_)) => Err(BridgeError::Cancelled),
        Err(_) => {
            token.cancel();
            handle.abort();
            tracing::warn!(operation = %operation, ?timeout, "job timed out");
            progress.report(&format!("timed out after {timeout:?}"));
            Err(BridgeError::Timeout { after: timeout })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(dir: &std::path::Path) -> Progress {
        let channel = Arc::new(ResultChannel::new(dir, dir.join("ecb.log")));
        Progress::new("build", channel)
    }

    #[tokio::test]
    async fn finished_job_returns_its_value() {
        let dir = tempfile::tempdir().unwrap();
        let value = run_job(Duration::from_secs(5), progress(dir.path()), |_, p| async move {
            p.report("halfway");
            Ok(7)
        })
        .await
        .unwrap();
        assert_eq!(value, 7);

        let log = std::fs::read_to_string(dir.path().join("ecb.log")).unwrap();
        assert!(log.contains("build progress: halfway"));
        assert!(log.contains("build progress: finished"));
    }

    #[tokio::test]
    async fn expired_job_is_cancelled() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_job::<_, _, ()>(Duration::from_millis(20), progress(dir.path()), |token, _| async move {
            loop {
                token.check()?;
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap_err();
        assert!(matches!(err, BridgeError::Timeout { .. }));

        let log = std::fs::read_to_string(dir.path().join("ecb.log")).unwrap();
        assert!(log.contains("build progress: timed out after"));
    }

    #[tokio::test]
    async fn panicking_job_is_internal() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_job(Duration::from_secs(5), progress(dir.path()), |_, _| async move {
            if true {
                panic!("toolchain exploded");
            }
            Ok(())
        })
        .await
        .unwrap_err();
        assert!(matches!(err, BridgeError::Internal(_)));
    }

    #[test]
    fn timeouts_parse_as_seconds() {
        assert_eq!(parse_timeout("1.5").unwrap(), Duration::from_millis(1500));
        assert!(parse_timeout("0").is_err());
        assert!(parse_timeout("soon").is_err());
    }
}
