use std::sync::Arc;

use crate::collector::{BackendId, CollectError, Collector};
use crate::config::CollectorConfig;
use crate::kpis::{Kpi, Ue, UeAspects};
use crate::schema::UeRecord;
use crate::transport::Transport;
use crate::util;

use super::base::CollectorBase;

/// Aspects requested from the UE-NIB for every UE.
pub const ASPECT_TYPES: [&str; 2] = ["neighbors", "RRC.Conn.Avg"];

/// UE-NIB collector: streams UEs with their aspects.
pub struct UenibCollector {
    base: CollectorBase,
    aspect_types: Vec<String>,
}

impl UenibCollector {
    pub fn new(id: BackendId, config: CollectorConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            base: CollectorBase::new(id, config, transport),
            aspect_types: ASPECT_TYPES.iter().map(|a| a.to_string()).collect(),
        }
    }
}

#[async_trait::async_trait]
impl Collector for UenibCollector {
    fn id(&self) -> &BackendId {
        &self.base.id
    }

    async fn collect(&self) -> Result<Vec<Kpi>, CollectError> {
        let conn = self.base.connect().await?;

        let records = self
            .base
            .drain("ListUEs", conn.channel().list_ues(&self.aspect_types))
            .await?;

        let mut kpi = UeAspects::default();
        for record in records {
            let ue = parse_ue(record);
            kpi.ues.insert(ue.id.clone(), ue);
        }

        Ok(vec![Kpi::UeAspects(kpi)])
    }
}

fn parse_ue(record: UeRecord) -> Ue {
    let mut aspects: Vec<(String, String)> = record
        .aspects
        .iter()
        .map(|(name, value)| {
            // a nameless aspect keeps an empty label name and is
            // rejected when its UE is rendered
            (
                util::normalize_name(name).unwrap_or_default(),
                String::from_utf8_lossy(value).into_owned(),
            )
        })
        .collect();
    aspects.sort();

    Ue {
        id: record.id,
        aspects,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{StubChannel, StubTransport};
    use std::collections::HashMap;

    #[tokio::test]
    async fn aspects_become_normalized_sorted_pairs() {
        let record = UeRecord {
            id: "ue-7".into(),
            aspects: HashMap::from([
                ("RRC.Conn.Avg".to_string(), b"12".to_vec()),
                ("neighbors".to_string(), b"1a,1b".to_vec()),
            ]),
        };
        let stub = StubChannel::default().ues(vec![Ok(record)]);
        let transport = StubTransport::default().serve("uenib:5150", stub.clone());
        let collector = UenibCollector::new(
            BackendId::from("onos-uenib"),
            CollectorConfig::with_address("uenib:5150"),
            Arc::new(transport),
        );

        let kpis = collector.collect().await.unwrap();

        let [Kpi::UeAspects(kpi)] = kpis.as_slice() else {
            panic!("unexpected kpis: {:?}", kpis);
        };
        assert_eq!(
            kpi.ues["ue-7"].aspects,
            vec![
                ("neighbors".to_string(), "1a,1b".to_string()),
                ("rrc_conn_avg".to_string(), "12".to_string()),
            ]
        );
        assert_eq!(stub.requested_aspects(), vec!["neighbors", "RRC.Conn.Avg"]);
    }
}
