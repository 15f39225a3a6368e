use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------
// Backend-native messages
// ------------------------------------------------------------
//
// These mirror the response messages of the backend services
// after wire decoding. They are produced by the transport and
// consumed only by the collectors, which map them into KPIs.
//

/// One E2 node connection as reported by the E2T admin service.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct E2NodeConnection {
    pub id: String,
    pub plmn_id: String,
    pub node_id: String,
    pub remote_ip: Vec<String>,
    pub remote_port: u32,
    /// e.g. "G_NB", "E_NB"
    pub connection_type: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ServiceModel {
    pub name: String,
    pub version: String,
}

/// An E2 subscription held by the subscription service.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Subscription {
    pub id: String,
    pub revision: u64,
    pub app_id: String,
    pub service_model: ServiceModel,
    pub e2_node_id: String,
    pub lifecycle_status: String,
}

/// Object type filter of the topology `List` call.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ObjectType {
    Entity,
    Relation,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TopoObjectKind {
    Entity {
        kind_id: String,
    },
    Relation {
        kind_id: String,
        src_entity_id: String,
        tgt_entity_id: String,
    },
}

/// A topology object (entity or relation).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TopoObject {
    pub id: String,
    pub obj: TopoObjectKind,
    #[serde(default)]
    pub labels: HashMap<String, String>,
    /// Aspect type name -> encoded aspect value
    #[serde(default)]
    pub aspects: HashMap<String, Vec<u8>>,
}

/// A UE record from the UE-NIB, carrying whichever aspects were asked for.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct UeRecord {
    pub id: String,
    #[serde(default)]
    pub aspects: HashMap<String, Vec<u8>>,
}

/// A cell known to the PCI xApp.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct PciCell {
    pub id: u64,
    pub node_id: String,
    pub cell_type: String,
    pub pci: u32,
    pub dlearfcn: u32,
    #[serde(default)]
    pub neighbor_ids: Vec<u64>,
}

/// A cell whose PCI conflicts were resolved by the PCI xApp.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ResolvedCell {
    pub id: u64,
    pub original_pci: u32,
    pub resolved_pci: u32,
    pub resolved_conflicts: u32,
}

/// Value of a KPIMON attribute.
///
/// The backend reports measurements as a typed union; older builds
/// still send everything as text.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum KpmAttribute {
    Integer(i64),
    Real(f64),
    Text(String),
    Absent,
}
