//! Backend collectors and the collector registry.
//!
//! This module provides:
//! - One collector per supported backend type
//! - The registry mapping backend identities to collector constructors
//! - The compiled default address of each backend
//!
//! All backend-specific logic lives in the dedicated submodules; the rest
//! of the crate only sees `Arc<dyn Collector>`.

mod base;
pub mod e2sub;
pub mod e2t;
pub mod topo;
pub mod uenib;
pub mod xappkpimon;
pub mod xapppci;

use std::collections::HashMap;
use std::sync::Arc;

use crate::collector::{BackendId, CollectError, Collector};
use crate::config::{CollectorConfig, ConfigResolver};
use crate::transport::Transport;

pub const ONOS_E2T: &str = "onos-e2t";
pub const ONOS_E2SUB: &str = "onos-e2sub";
pub const ONOS_TOPO: &str = "onos-topo";
pub const ONOS_UENIB: &str = "onos-uenib";
pub const ONOS_XAPPPCI: &str = "onos-xapppci";
pub const ONOS_XAPPKPIMON: &str = "onos-xappkpimon";

/// Every backend type the registry knows by default, with its
/// compiled default service address.
const KNOWN_BACKENDS: [(&str, &str); 6] = [
    (ONOS_E2T, "onos-e2t:5150"),
    (ONOS_E2SUB, "onos-e2sub:5150"),
    (ONOS_TOPO, "onos-topo:5150"),
    (ONOS_UENIB, "onos-uenib:5150"),
    (ONOS_XAPPPCI, "onos-pci:5150"),
    (ONOS_XAPPKPIMON, "onos-kpimon:5150"),
];

/// Compiled default address of a backend type.
pub fn default_address(id: &BackendId) -> Option<&'static str> {
    KNOWN_BACKENDS
        .iter()
        .find(|(name, _)| *name == id.as_str())
        .map(|(_, address)| *address)
}

/// Identities of all built-in backend types.
pub fn known_backends() -> Vec<BackendId> {
    KNOWN_BACKENDS.iter().map(|(name, _)| BackendId::from(*name)).collect()
}

/// Builds a collector bound to its identity, configuration and transport.
pub type Constructor = fn(BackendId, CollectorConfig, Arc<dyn Transport>) -> Arc<dyn Collector>;

/// Central factory for collectors.
///
/// DESIGN:
/// - Identity -> constructor map, populated once at startup
/// - Adding a backend is one `register` call plus its KPI type;
///   the aggregator and exporter never change
///
/// THREADING:
/// - Collectors come out as `Arc`, ready to be shared with pass tasks
pub struct CollectorRegistry {
    transport: Arc<dyn Transport>,
    constructors: HashMap<BackendId, Constructor>,
}

impl CollectorRegistry {
    /// Empty registry; nothing can be created until backends are registered.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            constructors: HashMap::new(),
        }
    }

    /// Registry populated with every built-in backend type.
    pub fn with_default_backends(transport: Arc<dyn Transport>) -> Self {
        Self::new(transport)
            .register(ONOS_E2T, |id, cfg, t| Arc::new(e2t::E2tCollector::new(id, cfg, t)))
            .register(ONOS_E2SUB, |id, cfg, t| Arc::new(e2sub::E2subCollector::new(id, cfg, t)))
            .register(ONOS_TOPO, |id, cfg, t| Arc::new(topo::TopoCollector::new(id, cfg, t)))
            .register(ONOS_UENIB, |id, cfg, t| Arc::new(uenib::UenibCollector::new(id, cfg, t)))
            .register(ONOS_XAPPPCI, |id, cfg, t| {
                Arc::new(xapppci::XappPciCollector::new(id, cfg, t))
            })
            .register(ONOS_XAPPKPIMON, |id, cfg, t| {
                Arc::new(xappkpimon::XappKpimonCollector::new(id, cfg, t))
            })
    }

    /// Registers (or replaces) the constructor of a backend type.
    pub fn register(mut self, id: impl Into<BackendId>, constructor: Constructor) -> Self {
        self.constructors.insert(id.into(), constructor);
        self
    }

    pub fn is_known(&self, id: &BackendId) -> bool {
        self.constructors.contains_key(id)
    }

    /// Creates the collector for `id`, bound to `config`.
    pub fn create(
        &self,
        id: &BackendId,
        config: CollectorConfig,
    ) -> Result<Arc<dyn Collector>, CollectError> {
        let constructor = self
            .constructors
            .get(id)
            .ok_or_else(|| CollectError::UnknownBackend(id.clone()))?;
        Ok(constructor(id.clone(), config, self.transport.clone()))
    }

    /// Creates one collector per identity, resolving each configuration
    /// once. Identities that cannot be created are logged and skipped.
    pub fn build(
        &self,
        resolver: &dyn ConfigResolver,
        ids: &[BackendId],
    ) -> Vec<Arc<dyn Collector>> {
        ids.iter()
            .filter_map(|id| match self.create(id, resolver.resolve(id)) {
                Ok(collector) => {
                    log::info!("collector {} added", id);
                    Some(collector)
                }
                Err(e) => {
                    log::error!("collector {} not added: {}", id, e);
                    None
                }
            })
            .collect()
    }
}
