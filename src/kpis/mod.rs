//! KPI model.
//!
//! A KPI is a snapshot of one kind of backend state, keyed by the natural
//! identifier of its entries (connection id, cell id, UE id, ...). KPIs are
//! built fresh by a collector on every pass and dropped once rendered.
//!
//! Adding a backend means adding its KPI type here, a variant to [`Kpi`],
//! and a collector in `backends`; nothing else dispatches on KPI kinds.

pub mod e2sub;
pub mod e2t;
pub mod topo;
pub mod uenib;
pub mod xappkpimon;
pub mod xapppci;

use crate::export::AbsentValuePolicy;
use crate::sample::{MetricSample, TranslationError};

pub use e2sub::{E2Subscription, E2Subscriptions};
pub use e2t::{E2tConnection, E2tConnections};
pub use topo::{TopoEntities, TopoEntity, TopoRelation, TopoRelations};
pub use uenib::{Ue, UeAspects};
pub use xappkpimon::{KpmMetrics, KpmRecord};
pub use xapppci::{CellConflict, CellInfo, PciCellInfo, PciResolvedConflicts};

/// Outcome of rendering one KPI: one entry per attempted sample.
pub type Rendered = Vec<Result<MetricSample, TranslationError>>;

/// Rendering capability shared by all KPI types.
///
/// Rendering is pure: calling it twice on an unchanged KPI yields the
/// same samples.
pub trait RenderKpi {
    fn render(&self, absent: AbsentValuePolicy) -> Rendered;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Kpi {
    E2tConnections(E2tConnections),
    E2Subscriptions(E2Subscriptions),
    TopoEntities(TopoEntities),
    TopoRelations(TopoRelations),
    UeAspects(UeAspects),
    PciCellInfo(PciCellInfo),
    PciResolvedConflicts(PciResolvedConflicts),
    KpmMetrics(KpmMetrics),
}

impl Kpi {
    /// Short KPI name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Kpi::E2tConnections(_) => e2t::NAME,
            Kpi::E2Subscriptions(_) => e2sub::NAME,
            Kpi::TopoEntities(_) => topo::ENTITIES_NAME,
            Kpi::TopoRelations(_) => topo::RELATIONS_NAME,
            Kpi::UeAspects(_) => uenib::NAME,
            Kpi::PciCellInfo(_) => xapppci::INFO_NAME,
            Kpi::PciResolvedConflicts(_) => xapppci::CONFLICTS_NAME,
            Kpi::KpmMetrics(_) => xappkpimon::NAME,
        }
    }

    /// Number of entries held by this KPI.
    pub fn len(&self) -> usize {
        match self {
            Kpi::E2tConnections(k) => k.connections.len(),
            Kpi::E2Subscriptions(k) => k.subscriptions.len(),
            Kpi::TopoEntities(k) => k.entities.len(),
            Kpi::TopoRelations(k) => k.relations.len(),
            Kpi::UeAspects(k) => k.ues.len(),
            Kpi::PciCellInfo(k) => k.cells.len(),
            Kpi::PciResolvedConflicts(k) => k.cells.len(),
            Kpi::KpmMetrics(k) => k.data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn render(&self, absent: AbsentValuePolicy) -> Rendered {
        match self {
            Kpi::E2tConnections(k) => k.render(absent),
            Kpi::E2Subscriptions(k) => k.render(absent),
            Kpi::TopoEntities(k) => k.render(absent),
            Kpi::TopoRelations(k) => k.render(absent),
            Kpi::UeAspects(k) => k.render(absent),
            Kpi::PciCellInfo(k) => k.render(absent),
            Kpi::PciResolvedConflicts(k) => k.render(absent),
            Kpi::KpmMetrics(k) => k.render(absent),
        }
    }
}

/// Turns a fixed label list into owned label names.
pub(crate) fn label_names(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}
