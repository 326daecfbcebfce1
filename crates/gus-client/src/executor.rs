//! Query execution boundary
//!
//! The query layer produces strings; something else runs them. That
//! something implements [`QueryExecutor`]. The [`Reconnecting`] wrapper
//! adds the conventional expiry handling: reconnect once, retransmit, and
//! only then give up.

use std::sync::Mutex;

use async_trait::async_trait;
use tracing::{debug, warn};

use gus_core::error::{ClientError, ClientResult};

use crate::records::Record;

/// Anything that can take a finished query string and return rows
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Submit a query and return its rows.
    async fn execute_query(&self, soql: &str) -> ClientResult<Vec<Record>>;

    /// Re-establish the authenticated session after an expiry.
    ///
    /// The default refuses, for executors with nothing to reconnect.
    async fn reconnect(&self) -> ClientResult<()> {
        Err(ClientError::SessionExpired)
    }
}

/// Canned-row executor for tests and offline use
///
/// Returns the same rows for every query and records each query string it
/// was handed.
#[derive(Debug, Default)]
pub struct StaticExecutor {
    rows: Vec<Record>,
    seen: Mutex<Vec<String>>,
}

impl StaticExecutor {
    /// Create an executor that answers every query with `rows`.
    pub fn new(rows: Vec<Record>) -> Self {
        Self {
            rows,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// The query strings handed to this executor, in order.
    pub fn queries(&self) -> Vec<String> {
        self.seen.lock().map(|seen| seen.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl QueryExecutor for StaticExecutor {
    async fn execute_query(&self, soql: &str) -> ClientResult<Vec<Record>> {
        debug!(soql, "executing canned query");
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(soql.to_string());
        }
        Ok(self.rows.clone())
    }
}

/// Retry-once wrapper around an executor
///
/// On a session expiry the wrapper reconnects and retransmits the query a
/// single time; a second expiry propagates to the caller.
#[derive(Debug)]
pub struct Reconnecting<E> {
    inner: E,
}

impl<E: QueryExecutor> Reconnecting<E> {
    /// Wrap an executor.
    pub fn new(inner: E) -> Self {
        Self { inner }
    }

    /// Unwrap the inner executor.
    pub fn into_inner(self) -> E {
        self.inner
    }
}

#[async_trait]
impl<E: QueryExecutor> QueryExecutor for Reconnecting<E> {
    async fn execute_query(&self, soql: &str) -> ClientResult<Vec<Record>> {
        match self.inner.execute_query(soql).await {
            Err(ClientError::SessionExpired) => {
                warn!("session expired, reconnecting and retransmitting");
                self.inner.reconnect().await?;
                self.inner.execute_query(soql).await
            }
            other => other,
        }
    }

    async fn reconnect(&self) -> ClientResult<()> {
        self.inner.reconnect().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    fn row() -> Record {
        Record::from_value(json!({"Id": "500xx1"})).unwrap()
    }

    /// Expires every query until `reconnect` is called.
    #[derive(Default)]
    struct ExpiringExecutor {
        reconnected: AtomicBool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl QueryExecutor for ExpiringExecutor {
        async fn execute_query(&self, _soql: &str) -> ClientResult<Vec<Record>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.reconnected.load(Ordering::SeqCst) {
                Ok(vec![row()])
            } else {
                Err(ClientError::SessionExpired)
            }
        }

        async fn reconnect(&self) -> ClientResult<()> {
            self.reconnected.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Expires every query, reconnect or not.
    struct AlwaysExpired;

    #[async_trait]
    impl QueryExecutor for AlwaysExpired {
        async fn execute_query(&self, _soql: &str) -> ClientResult<Vec<Record>> {
            Err(ClientError::SessionExpired)
        }

        async fn reconnect(&self) -> ClientResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_static_executor_returns_rows_and_records_queries() {
        let executor = StaticExecutor::new(vec![row()]);
        let rows = executor.execute_query("SELECT Id FROM Case").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(executor.queries(), vec!["SELECT Id FROM Case".to_string()]);
    }

    #[tokio::test]
    async fn test_reconnecting_retries_once_after_expiry() {
        let executor = Reconnecting::new(ExpiringExecutor::default());
        let rows = executor.execute_query("SELECT Id FROM Case").await.unwrap();
        assert_eq!(rows, vec![row()]);
        assert_eq!(executor.into_inner().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_second_expiry_propagates() {
        let executor = Reconnecting::new(AlwaysExpired);
        let result = executor.execute_query("SELECT Id FROM Case").await;
        assert!(matches!(result, Err(ClientError::SessionExpired)));
    }

    #[tokio::test]
    async fn test_default_reconnect_refuses() {
        let executor = StaticExecutor::new(vec![]);
        assert!(matches!(
            executor.reconnect().await,
            Err(ClientError::SessionExpired)
        ));
    }
}
