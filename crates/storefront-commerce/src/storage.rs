//! Timeout policy for storage calls.
//!
//! SQLite work is blocking, so services run it on the blocking pool and
//! bound how long the request waits for it.

use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use storefront_db::Db;

use crate::error::{CommerceError, CommerceResult};

/// Timeout configuration for storage operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoragePolicy {
    /// Upper bound for a single storage call, including lock waits.
    pub timeout: Duration,
}

impl StoragePolicy {
    /// Create a policy with the given bound.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Create from a millisecond count (config files carry milliseconds).
    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    /// Apply the bound to a database handle's lock and busy waits.
    pub fn apply(&self, db: Db) -> CommerceResult<Db> {
        Ok(db.with_timeout(self.timeout)?)
    }
}

impl Default for StoragePolicy {
    fn default() -> Self {
        Self {
            timeout: storefront_db::DEFAULT_TIMEOUT,
        }
    }
}

/// Run `op` on the blocking pool and wait at most `policy.timeout`.
///
/// On expiry the caller gets `StorageUnavailable`; the blocking task is left
/// to finish on its own, so only use this for reads and idempotent writes.
pub(crate) async fn bounded<T, F>(db: &Db, policy: StoragePolicy, op: &'static str, f: F) -> CommerceResult<T>
where
    F: FnOnce(&Db) -> CommerceResult<T> + Send + 'static,
    T: Send + 'static,
{
    let handle = spawn(db, op, f);
    match tokio::time::timeout(policy.timeout, handle).await {
        Ok(joined) => joined,
        Err(_) => Err(CommerceError::StorageUnavailable(format!(
            "{op} timed out after {:?}",
            policy.timeout
        ))),
    }
}

/// Run `op` on the blocking pool and wait for its outcome.
///
/// Used where the caller must learn whether a write committed; the wait is
/// still bounded by the database lock and busy timeouts.
pub(crate) async fn run_to_completion<T, F>(db: &Db, op: &'static str, f: F) -> CommerceResult<T>
where
    F: FnOnce(&Db) -> CommerceResult<T> + Send + 'static,
    T: Send + 'static,
{
    spawn(db, op, f).await
}

fn spawn<T, F>(db: &Db, op: &'static str, f: F) -> impl std::future::Future<Output = CommerceResult<T>>
where
    F: FnOnce(&Db) -> CommerceResult<T> + Send + 'static,
    T: Send + 'static,
{
    let db = db.clone();
    let handle = tokio::task::spawn_blocking(move || f(&db));
    async move {
        handle.await.unwrap_or_else(|e| {
            Err(CommerceError::StorageUnavailable(format!("{op} worker failed: {e}")))
        })
    }
}

/// Current UTC time as fixed-width RFC 3339 text with millisecond precision.
///
/// Fixed width keeps lexical order equal to chronological order in SQL.
pub(crate) fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_default_matches_db_default() {
        assert_eq!(StoragePolicy::default().timeout, storefront_db::DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_policy_from_millis() {
        assert_eq!(
            StoragePolicy::from_millis(250).timeout,
            Duration::from_millis(250)
        );
    }

    #[test]
    fn test_timestamp_is_fixed_width_utc() {
        let ts = timestamp_now();
        assert_eq!(ts.len(), "2026-01-01T00:00:00.000Z".len());
        assert!(ts.ends_with('Z'));
    }

    #[tokio::test]
    async fn test_bounded_returns_value() {
        let db = Db::open_in_memory().unwrap();
        let value = bounded(&db, StoragePolicy::default(), "ping", |db| {
            db.ping()?;
            Ok(7)
        })
        .await
        .unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_bounded_times_out() {
        let db = Db::open_in_memory().unwrap();
        let policy = StoragePolicy::from_millis(20);
        let result: CommerceResult<()> = bounded(&db, policy, "slow", |_| {
            std::thread::sleep(Duration::from_millis(200));
            Ok(())
        })
        .await;

        match result {
            Err(CommerceError::StorageUnavailable(detail)) => assert!(detail.contains("slow")),
            other => panic!("expected timeout, got {other:?}"),
        }
    }
}
