//! Deadline guard for outbound calls

use std::future::Future;
use std::time::Duration;

use crate::domain::DomainError;

/// Default bound for catalog listing calls
pub const CATALOG_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Default bound for generic external fetches
pub const EXTERNAL_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Bounds a future by a fixed duration. When the deadline passes the future is
/// dropped (cancelled) and `DomainError::Timeout` is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutGuard {
    duration: Duration,
}

impl TimeoutGuard {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    pub fn catalog() -> Self {
        Self::new(CATALOG_FETCH_TIMEOUT)
    }

    pub fn external_fetch() -> Self {
        Self::new(EXTERNAL_FETCH_TIMEOUT)
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub async fn run<F, T>(&self, operation: &str, future: F) -> Result<T, DomainError>
    where
        F: Future<Output = Result<T, DomainError>>,
    {
        match tokio::time::timeout(self.duration, future).await {
            Ok(result) => result,
            Err(_) => Err(DomainError::timeout(
                operation,
                self.duration.as_millis() as u64,
            )),
        }
    }
}

impl Default for TimeoutGuard {
    fn default() -> Self {
        Self::catalog()
    }
}
