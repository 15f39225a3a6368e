use std::collections::HashMap;

use crate::export::AbsentValuePolicy;
use crate::sample::MetricBuilder;

use super::{label_names, RenderKpi, Rendered};

pub const INFO_NAME: &str = "info";
pub const INFO_DESCRIPTION: &str = "The xapp pci cell info";
pub const CONFLICTS_NAME: &str = "conflicts";
pub const CONFLICTS_DESCRIPTION: &str = "The xapp pci resolved cell conflicts";

const BUILDER: MetricBuilder = MetricBuilder::new("onos", "xapppci", &[("sdran", "xapppci")]);
const INFO_LABELS: [&str; 5] = ["cellid", "nodeid", "cell_type", "pci", "neighbors"];
const CONFLICT_LABELS: [&str; 3] = ["cellid", "original_pci", "resolved_pci"];

/// Static cell information; the sample value is the DL EARFCN.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellInfo {
    pub cell_id: String,
    pub node_id: String,
    pub cell_type: String,
    pub pci: String,
    pub dlearfcn: f64,
    pub neighbors: String,
}

/// PCI reassignment of a cell; the sample value is the number of
/// conflicts the reassignment resolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellConflict {
    pub cell_id: String,
    pub original_pci: String,
    pub resolved_pci: String,
    pub resolved_conflicts: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PciCellInfo {
    pub cells: HashMap<String, CellInfo>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PciResolvedConflicts {
    pub cells: HashMap<String, CellConflict>,
}

impl RenderKpi for PciCellInfo {
    fn render(&self, _absent: AbsentValuePolicy) -> Rendered {
        let desc = BUILDER.desc(INFO_NAME, INFO_DESCRIPTION, label_names(&INFO_LABELS));

        self.cells
            .values()
            .map(|c| {
                desc.gauge(
                    c.dlearfcn,
                    vec![
                        c.cell_id.clone(),
                        c.node_id.clone(),
                        c.cell_type.clone(),
                        c.pci.clone(),
                        c.neighbors.clone(),
                    ],
                )
            })
            .collect()
    }
}

impl RenderKpi for PciResolvedConflicts {
    fn render(&self, _absent: AbsentValuePolicy) -> Rendered {
        let desc = BUILDER.desc(CONFLICTS_NAME, CONFLICTS_DESCRIPTION, label_names(&CONFLICT_LABELS));

        self.cells
            .values()
            .map(|c| {
                desc.gauge(
                    c.resolved_conflicts,
                    vec![c.cell_id.clone(), c.original_pci.clone(), c.resolved_pci.clone()],
                )
            })
            .collect()
    }
}
