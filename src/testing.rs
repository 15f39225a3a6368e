//! Scripted transport for unit tests.
//!
//! `StubChannel` serves canned responses and counts calls and closes;
//! clones share their counters, so a test can keep one handle while the
//! transport hands out others.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::stream::{self, StreamExt};

use crate::schema::{
    E2NodeConnection, KpmAttribute, ObjectType, PciCell, ResolvedCell, Subscription, TopoObject,
    UeRecord,
};
use crate::transport::{Endpoint, RpcChannel, RpcError, RpcStream, Transport};

#[derive(Clone, Default)]
struct Script {
    e2_connections: Option<Vec<Result<E2NodeConnection, RpcError>>>,
    subscriptions: Option<Vec<Subscription>>,
    topo: HashMap<ObjectType, Result<Vec<TopoObject>, RpcError>>,
    ues: Option<Vec<Result<UeRecord, RpcError>>>,
    pci_cells: Option<Vec<PciCell>>,
    resolved_cells: Option<Vec<ResolvedCell>>,
    kpm: Option<HashMap<String, KpmAttribute>>,
    delay: Duration,
}

#[derive(Default)]
struct Counters {
    calls: AtomicUsize,
    closes: AtomicUsize,
    aspects: Mutex<Vec<String>>,
}

#[derive(Clone, Default)]
pub struct StubChannel {
    script: Script,
    counters: Arc<Counters>,
}

impl StubChannel {
    pub fn e2_connections(mut self, items: Vec<Result<E2NodeConnection, RpcError>>) -> Self {
        self.script.e2_connections = Some(items);
        self
    }

    pub fn subscriptions(mut self, subs: Vec<Subscription>) -> Self {
        self.script.subscriptions = Some(subs);
        self
    }

    pub fn topo(mut self, filter: ObjectType, reply: Result<Vec<TopoObject>, RpcError>) -> Self {
        self.script.topo.insert(filter, reply);
        self
    }

    pub fn ues(mut self, items: Vec<Result<UeRecord, RpcError>>) -> Self {
        self.script.ues = Some(items);
        self
    }

    pub fn pci_cells(mut self, cells: Vec<PciCell>) -> Self {
        self.script.pci_cells = Some(cells);
        self
    }

    pub fn resolved_cells(mut self, cells: Vec<ResolvedCell>) -> Self {
        self.script.resolved_cells = Some(cells);
        self
    }

    pub fn kpm(mut self, attributes: HashMap<String, KpmAttribute>) -> Self {
        self.script.kpm = Some(attributes);
        self
    }

    /// Every call sleeps this long before answering.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.script.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.counters.calls.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.counters.closes.load(Ordering::SeqCst)
    }

    pub fn requested_aspects(&self) -> Vec<String> {
        self.counters.aspects.lock().unwrap().clone()
    }

    async fn hit(&self) {
        self.counters.calls.fetch_add(1, Ordering::SeqCst);
        if !self.script.delay.is_zero() {
            tokio::time::sleep(self.script.delay).await;
        }
    }
}

fn served<T>(reply: &Option<T>, call: &'static str) -> Result<T, RpcError>
where
    T: Clone,
{
    reply.clone().ok_or(RpcError::Unimplemented(call))
}

fn into_stream<T: Send + 'static>(items: Vec<Result<T, RpcError>>) -> RpcStream<T> {
    stream::iter(items).boxed()
}

#[async_trait::async_trait]
impl RpcChannel for StubChannel {
    async fn list_e2_node_connections(&self) -> Result<RpcStream<E2NodeConnection>, RpcError> {
        self.hit().await;
        served(&self.script.e2_connections, "ListE2NodeConnections").map(into_stream)
    }

    async fn list_subscriptions(&self) -> Result<Vec<Subscription>, RpcError> {
        self.hit().await;
        served(&self.script.subscriptions, "ListSubscriptions")
    }

    async fn list_topo_objects(&self, filter: ObjectType) -> Result<Vec<TopoObject>, RpcError> {
        self.hit().await;
        self.script
            .topo
            .get(&filter)
            .cloned()
            .unwrap_or(Err(RpcError::Unimplemented("List")))
    }

    async fn list_ues(&self, aspect_types: &[String]) -> Result<RpcStream<UeRecord>, RpcError> {
        self.hit().await;
        *self.counters.aspects.lock().unwrap() = aspect_types.to_vec();
        served(&self.script.ues, "ListUEs").map(into_stream)
    }

    async fn get_conflicts(&self) -> Result<Vec<PciCell>, RpcError> {
        self.hit().await;
        served(&self.script.pci_cells, "GetConflicts")
    }

    async fn get_resolved_conflicts(&self) -> Result<Vec<ResolvedCell>, RpcError> {
        self.hit().await;
        served(&self.script.resolved_cells, "GetResolvedConflicts")
    }

    async fn get_kpm_metrics(&self, _id: &str) -> Result<HashMap<String, KpmAttribute>, RpcError> {
        self.hit().await;
        served(&self.script.kpm, "GetMetrics")
    }

    fn close(&self) {
        self.counters.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Hands out stub channels by address; unknown addresses are unreachable.
#[derive(Default)]
pub struct StubTransport {
    backends: HashMap<String, StubChannel>,
    opens: AtomicUsize,
}

impl StubTransport {
    pub fn serve(mut self, address: &str, channel: StubChannel) -> Self {
        self.backends.insert(address.to_string(), channel);
        self
    }

    pub fn unreachable(mut self, address: &str) -> Self {
        self.backends.remove(address);
        self
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Transport for StubTransport {
    async fn open(&self, endpoint: Endpoint<'_>) -> Result<Box<dyn RpcChannel>, RpcError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        match self.backends.get(endpoint.address) {
            Some(channel) => Ok(Box::new(channel.clone())),
            None => Err(RpcError::Unavailable(format!(
                "connection refused: {}",
                endpoint.address
            ))),
        }
    }
}
