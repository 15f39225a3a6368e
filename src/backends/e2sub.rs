use std::sync::Arc;

use crate::collector::{BackendId, CollectError, Collector};
use crate::config::CollectorConfig;
use crate::kpis::{E2Subscription, E2Subscriptions, Kpi};
use crate::schema::Subscription;
use crate::transport::Transport;

use super::base::CollectorBase;

/// E2 subscription collector: one `subscriptions` KPI per pass.
pub struct E2subCollector {
    base: CollectorBase,
}

impl E2subCollector {
    pub fn new(id: BackendId, config: CollectorConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            base: CollectorBase::new(id, config, transport),
        }
    }
}

#[async_trait::async_trait]
impl Collector for E2subCollector {
    fn id(&self) -> &BackendId {
        &self.base.id
    }

    async fn collect(&self) -> Result<Vec<Kpi>, CollectError> {
        let conn = self.base.connect().await?;

        let subscriptions = self
            .base
            .call("ListSubscriptions", conn.channel().list_subscriptions())
            .await?;

        let mut kpi = E2Subscriptions::default();
        for sub in subscriptions {
            let sub = parse_subscription(sub);
            kpi.subscriptions.insert(sub.id.clone(), sub);
        }

        Ok(vec![Kpi::E2Subscriptions(kpi)])
    }
}

fn parse_subscription(msg: Subscription) -> E2Subscription {
    E2Subscription {
        id: msg.id,
        revision: msg.revision.to_string(),
        app_id: msg.app_id,
        service_model_name: msg.service_model.name,
        service_model_version: msg.service_model.version,
        e2_node_id: msg.e2_node_id,
        lifecycle_status: msg.lifecycle_status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ServiceModel;
    use crate::testing::{StubChannel, StubTransport};

    #[tokio::test]
    async fn subscriptions_are_keyed_by_id() {
        let sub = Subscription {
            id: "s1".into(),
            revision: 4,
            app_id: "pci".into(),
            service_model: ServiceModel {
                name: "oran-e2sm-rc-pre".into(),
                version: "v2".into(),
            },
            e2_node_id: "e2:1".into(),
            lifecycle_status: "ACTIVE".into(),
        };
        let stub = StubChannel::default().subscriptions(vec![sub.clone(), sub]);
        let transport = StubTransport::default().serve("e2sub:5150", stub.clone());
        let collector = E2subCollector::new(
            BackendId::from("onos-e2sub"),
            CollectorConfig::with_address("e2sub:5150"),
            Arc::new(transport),
        );

        let kpis = collector.collect().await.unwrap();

        let [Kpi::E2Subscriptions(kpi)] = kpis.as_slice() else {
            panic!("unexpected kpis: {:?}", kpis);
        };
        assert_eq!(kpi.subscriptions.len(), 1);
        assert_eq!(kpi.subscriptions["s1"].revision, "4");
        assert_eq!(kpi.subscriptions["s1"].service_model_name, "oran-e2sm-rc-pre");
    }
}
