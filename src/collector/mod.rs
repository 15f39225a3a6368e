/// Collector module
///
/// This module groups:
/// - The `Collector` abstraction (one backend, one polling pass)
/// - The error type every collector reports
/// - The per-pass aggregator (`runner`)
///
/// Design notes:
/// - Backend-specific logic MUST NOT live here, it belongs to `backends`
/// - The runner only knows collectors by identity and trait object
pub mod runner;

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::kpis::Kpi;
use crate::transport::RpcError;

/// Name of a backend type, e.g. `onos-topo`.
///
/// Unique within the registry; used for configuration lookup,
/// dispatch and failure reporting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackendId(String);

impl BackendId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BackendId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for BackendId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CollectError {
    /// Missing or invalid settings; no connection was attempted.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("cannot connect to {address}: {source}")]
    Connection {
        address: String,
        #[source]
        source: RpcError,
    },

    #[error("{call} failed: {source}")]
    BackendCall {
        call: &'static str,
        #[source]
        source: RpcError,
    },

    #[error("unknown backend type {0}")]
    UnknownBackend(BackendId),

    /// The pass deadline expired before the collector finished.
    #[error("collector still running after {0:?}, cancelled")]
    DeadlineExceeded(Duration),

    /// The collector task ended without producing a result (panic).
    #[error("collector task aborted: {0}")]
    Aborted(String),
}

impl CollectError {
    /// Wraps a failed read call.
    pub fn call(call: &'static str) -> impl FnOnce(RpcError) -> Self {
        move |source| CollectError::BackendCall { call, source }
    }
}

/// Polls one backend and turns its state into KPIs.
///
/// CONTRACT:
/// - An empty service address fails with `CollectError::Configuration`
///   before any network activity
/// - The connection is released on every exit path
/// - Streams are drained to end-of-stream before returning
/// - No retries; the next scrape is the retry
/// - No shared state is mutated; the only output is the returned KPIs
///
/// THREADING:
/// - Must be Send + Sync, instances are shared with spawned tasks
#[async_trait::async_trait]
pub trait Collector: Send + Sync {
    fn id(&self) -> &BackendId;

    async fn collect(&self) -> Result<Vec<Kpi>, CollectError>;
}

/// Output of one pass over all collectors.
#[derive(Debug, Default)]
pub struct CollectionResult {
    /// KPIs of every collector that succeeded, in no particular order
    pub kpis: Vec<Kpi>,

    /// Collectors whose KPIs are in `kpis`
    pub succeeded: Vec<BackendId>,

    /// One entry per collector that failed
    pub failures: Vec<(BackendId, CollectError)>,
}

impl CollectionResult {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failed(&self, id: &BackendId) -> Option<&CollectError> {
        self.failures.iter().find(|(f, _)| f == id).map(|(_, e)| e)
    }
}
