//! RPC seam between the collectors and the backend services.
//!
//! Connection establishment, TLS material loading and wire decoding all
//! live behind [`Transport`] and [`RpcChannel`]; the collectors only see
//! typed read calls that can fail, time out, or yield an item stream.

use std::collections::HashMap;
use std::future::Future;
use std::path::Path;
use std::time::Duration;

use futures_util::stream::BoxStream;
use thiserror::Error;

use crate::schema::{
    E2NodeConnection, KpmAttribute, ObjectType, PciCell, ResolvedCell, Subscription, TopoObject,
    UeRecord,
};

/// Item stream returned by server-streaming calls. `None` is end-of-stream.
pub type RpcStream<T> = BoxStream<'static, Result<T, RpcError>>;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RpcError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),

    #[error("call {0} is not served by this backend")]
    Unimplemented(&'static str),

    #[error("rpc status {code}: {message}")]
    Status { code: i32, message: String },
}

/// Endpoint parameters handed to the transport when dialing.
#[derive(Debug, Clone, Copy)]
pub struct Endpoint<'a> {
    pub address: &'a str,
    pub cert_path: Option<&'a Path>,
    pub key_path: Option<&'a Path>,
    pub use_tls: bool,
}

/// Opens RPC channels to backends.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn open(&self, endpoint: Endpoint<'_>) -> Result<Box<dyn RpcChannel>, RpcError>;
}

/// An open connection to one backend.
///
/// One method per backend read contract. A backend only serves its own
/// calls; everything else answers [`RpcError::Unimplemented`].
#[async_trait::async_trait]
pub trait RpcChannel: Send + Sync {
    /// E2T admin: `ListE2NodeConnections` (server streaming).
    async fn list_e2_node_connections(&self) -> Result<RpcStream<E2NodeConnection>, RpcError> {
        Err(RpcError::Unimplemented("ListE2NodeConnections"))
    }

    /// E2 subscription service: `ListSubscriptions`.
    async fn list_subscriptions(&self) -> Result<Vec<Subscription>, RpcError> {
        Err(RpcError::Unimplemented("ListSubscriptions"))
    }

    /// Topology: `List` filtered by object type.
    async fn list_topo_objects(&self, _filter: ObjectType) -> Result<Vec<TopoObject>, RpcError> {
        Err(RpcError::Unimplemented("List"))
    }

    /// UE-NIB: `ListUEs` restricted to the given aspect types (server streaming).
    async fn list_ues(&self, _aspect_types: &[String]) -> Result<RpcStream<UeRecord>, RpcError> {
        Err(RpcError::Unimplemented("ListUEs"))
    }

    /// PCI xApp: `GetConflicts`.
    async fn get_conflicts(&self) -> Result<Vec<PciCell>, RpcError> {
        Err(RpcError::Unimplemented("GetConflicts"))
    }

    /// PCI xApp: `GetResolvedConflicts`.
    async fn get_resolved_conflicts(&self) -> Result<Vec<ResolvedCell>, RpcError> {
        Err(RpcError::Unimplemented("GetResolvedConflicts"))
    }

    /// KPIMON xApp: `GetMetrics`, attributes keyed by `cell:plmn:egnb:type[:ts]`.
    async fn get_kpm_metrics(&self, _id: &str) -> Result<HashMap<String, KpmAttribute>, RpcError> {
        Err(RpcError::Unimplemented("GetMetrics"))
    }

    /// Releases the underlying connection.
    fn close(&self);
}

// ------------------------------------------------------------
// Scoped channel
// ------------------------------------------------------------
//
// Owns an open channel for the duration of one collect call and
// closes it on drop, so every exit path (success, `?` on a call
// error, parse error, task abort) releases the connection.
//
pub struct ScopedChannel {
    inner: Box<dyn RpcChannel>,
    address: String,
}

impl ScopedChannel {
    pub async fn open(
        transport: &dyn Transport,
        endpoint: Endpoint<'_>,
    ) -> Result<Self, RpcError> {
        let inner = transport.open(endpoint).await?;
        log::debug!("opened channel to {}", endpoint.address);
        Ok(Self {
            inner,
            address: endpoint.address.to_string(),
        })
    }

    pub fn channel(&self) -> &dyn RpcChannel {
        self.inner.as_ref()
    }
}

impl Drop for ScopedChannel {
    fn drop(&mut self) {
        self.inner.close();
        log::debug!("closed channel to {}", self.address);
    }
}

/// Bounds a backend call by `limit`.
pub async fn with_deadline<T, F>(limit: Duration, call: F) -> Result<T, RpcError>
where
    F: Future<Output = Result<T, RpcError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(RpcError::DeadlineExceeded(limit)),
    }
}
