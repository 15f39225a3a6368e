use std::sync::Arc;

use crate::collector::{BackendId, CollectError, Collector};
use crate::config::CollectorConfig;
use crate::kpis::{CellConflict, CellInfo, Kpi, PciCellInfo, PciResolvedConflicts};
use crate::schema::{PciCell, ResolvedCell};
use crate::transport::Transport;
use crate::util;

use super::base::CollectorBase;

/// PCI xApp collector: cell info and resolved PCI conflicts.
pub struct XappPciCollector {
    base: CollectorBase,
}

impl XappPciCollector {
    pub fn new(id: BackendId, config: CollectorConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            base: CollectorBase::new(id, config, transport),
        }
    }
}

#[async_trait::async_trait]
impl Collector for XappPciCollector {
    fn id(&self) -> &BackendId {
        &self.base.id
    }

    async fn collect(&self) -> Result<Vec<Kpi>, CollectError> {
        let conn = self.base.connect().await?;
        let channel = conn.channel();

        let cells = self.base.call("GetConflicts", channel.get_conflicts()).await?;
        let mut info = PciCellInfo::default();
        for cell in cells {
            let cell = parse_cell(cell);
            info.cells.insert(cell.cell_id.clone(), cell);
        }

        let resolved = self
            .base
            .call("GetResolvedConflicts", channel.get_resolved_conflicts())
            .await?;
        let mut conflicts = PciResolvedConflicts::default();
        for cell in resolved {
            let cell = parse_conflict(cell);
            conflicts.cells.insert(cell.cell_id.clone(), cell);
        }

        Ok(vec![Kpi::PciCellInfo(info), Kpi::PciResolvedConflicts(conflicts)])
    }
}

fn parse_cell(cell: PciCell) -> CellInfo {
    CellInfo {
        cell_id: util::hex_id(cell.id),
        node_id: cell.node_id,
        cell_type: cell.cell_type,
        pci: cell.pci.to_string(),
        dlearfcn: f64::from(cell.dlearfcn),
        neighbors: util::sorted_csv(cell.neighbor_ids.into_iter().map(util::hex_id)),
    }
}

fn parse_conflict(cell: ResolvedCell) -> CellConflict {
    CellConflict {
        cell_id: util::hex_id(cell.id),
        original_pci: cell.original_pci.to_string(),
        resolved_pci: cell.resolved_pci.to_string(),
        resolved_conflicts: f64::from(cell.resolved_conflicts),
    }
}
