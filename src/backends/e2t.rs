use std::sync::Arc;

use crate::collector::{BackendId, CollectError, Collector};
use crate::config::CollectorConfig;
use crate::kpis::{E2tConnection, E2tConnections, Kpi};
use crate::schema::E2NodeConnection;
use crate::transport::Transport;

use super::base::CollectorBase;

/// E2T collector.
///
/// Streams the E2 node connections terminated by E2T and exports one
/// `connections` KPI.
pub struct E2tCollector {
    base: CollectorBase,
}

impl E2tCollector {
    pub fn new(id: BackendId, config: CollectorConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            base: CollectorBase::new(id, config, transport),
        }
    }
}

#[async_trait::async_trait]
impl Collector for E2tCollector {
    fn id(&self) -> &BackendId {
        &self.base.id
    }

    async fn collect(&self) -> Result<Vec<Kpi>, CollectError> {
        let conn = self.base.connect().await?;

        let items = self
            .base
            .drain("ListE2NodeConnections", conn.channel().list_e2_node_connections())
            .await?;

        let mut kpi = E2tConnections::default();
        for item in items {
            let connection = parse_connection(item);
            kpi.connections.insert(connection.id.clone(), connection);
        }

        Ok(vec![Kpi::E2tConnections(kpi)])
    }
}

fn parse_connection(msg: E2NodeConnection) -> E2tConnection {
    E2tConnection {
        remote_endpoint: format!("{}:{}", msg.remote_ip.join(","), msg.remote_port),
        id: msg.id,
        plmn_id: msg.plmn_id,
        node_id: msg.node_id,
        connection_type: msg.connection_type,
    }
}
