use std::collections::HashMap;

use crate::export::AbsentValuePolicy;
use crate::sample::MetricBuilder;

use super::{label_names, RenderKpi, Rendered};

pub const NAME: &str = "connections";
pub const DESCRIPTION: &str = "The e2t connections";

const BUILDER: MetricBuilder = MetricBuilder::new("onos", "e2t", &[("sdran", "e2t")]);
const LABELS: [&str; 5] = ["id", "plmnid", "nodeid", "remote_endpoint", "connection_type"];

/// One E2 node connection terminated by E2T.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct E2tConnection {
    pub id: String,
    pub plmn_id: String,
    pub node_id: String,
    /// `ip[,ip...]:port`
    pub remote_endpoint: String,
    pub connection_type: String,
}

/// Active E2 connections, keyed by connection id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct E2tConnections {
    pub connections: HashMap<String, E2tConnection>,
}

impl RenderKpi for E2tConnections {
    fn render(&self, _absent: AbsentValuePolicy) -> Rendered {
        let desc = BUILDER.desc(NAME, DESCRIPTION, label_names(&LABELS));

        self.connections
            .values()
            .map(|c| {
                desc.gauge(
                    1.0,
                    vec![
                        c.id.clone(),
                        c.plmn_id.clone(),
                        c.node_id.clone(),
                        c.remote_endpoint.clone(),
                        c.connection_type.clone(),
                    ],
                )
            })
            .collect()
    }
}
