use std::sync::Arc;

use crate::collector::{BackendId, CollectError, Collector};
use crate::config::CollectorConfig;
use crate::kpis::{Kpi, TopoEntities, TopoEntity, TopoRelation, TopoRelations};
use crate::schema::{ObjectType, TopoObject, TopoObjectKind};
use crate::transport::Transport;
use crate::util;

use super::base::CollectorBase;

/// Topology collector.
///
/// Lists entities, then relations, over the same connection and
/// exports both as separate KPIs. Either call failing fails the pass
/// for this backend.
pub struct TopoCollector {
    base: CollectorBase,
}

impl TopoCollector {
    pub fn new(id: BackendId, config: CollectorConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            base: CollectorBase::new(id, config, transport),
        }
    }
}

#[async_trait::async_trait]
impl Collector for TopoCollector {
    fn id(&self) -> &BackendId {
        &self.base.id
    }

    async fn collect(&self) -> Result<Vec<Kpi>, CollectError> {
        let conn = self.base.connect().await?;
        let channel = conn.channel();

        let objects = self
            .base
            .call("List", channel.list_topo_objects(ObjectType::Entity))
            .await?;
        let mut entities = TopoEntities::default();
        for entity in objects.iter().filter_map(parse_entity) {
            entities.entities.insert(entity.id.clone(), entity);
        }

        let objects = self
            .base
            .call("List", channel.list_topo_objects(ObjectType::Relation))
            .await?;
        let mut relations = TopoRelations::default();
        for relation in objects.iter().filter_map(parse_relation) {
            relations.relations.insert(relation.id.clone(), relation);
        }

        Ok(vec![Kpi::TopoEntities(entities), Kpi::TopoRelations(relations)])
    }
}

// Objects of the other type are skipped; the filter should already
// have excluded them.

fn parse_entity(obj: &TopoObject) -> Option<TopoEntity> {
    let TopoObjectKind::Entity { kind_id } = &obj.obj else {
        return None;
    };
    Some(TopoEntity {
        id: obj.id.clone(),
        kind: kind_id.clone(),
        labels: util::labels_csv(&obj.labels),
        aspects: util::aspect_names_csv(&obj.aspects),
    })
}

fn parse_relation(obj: &TopoObject) -> Option<TopoRelation> {
    let TopoObjectKind::Relation {
        kind_id,
        src_entity_id,
        tgt_entity_id,
    } = &obj.obj
    else {
        return None;
    };
    Some(TopoRelation {
        id: obj.id.clone(),
        kind: kind_id.clone(),
        source: src_entity_id.clone(),
        target: tgt_entity_id.clone(),
        labels: util::labels_csv(&obj.labels),
        aspects: util::aspect_names_csv(&obj.aspects),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{StubChannel, StubTransport};
    use crate::transport::RpcError;
    use std::collections::HashMap;

    fn entity(id: &str) -> TopoObject {
        TopoObject {
            id: id.into(),
            obj: TopoObjectKind::Entity {
                kind_id: "e2cell".into(),
            },
            labels: HashMap::from([("env".to_string(), "lab".to_string())]),
            aspects: HashMap::from([
                ("onos.topo.E2Cell".to_string(), b"{}".to_vec()),
                ("onos.topo.Location".to_string(), b"{}".to_vec()),
            ]),
        }
    }

    fn relation(id: &str) -> TopoObject {
        TopoObject {
            id: id.into(),
            obj: TopoObjectKind::Relation {
                kind_id: "contains".into(),
                src_entity_id: "e2:1".into(),
                tgt_entity_id: "e2:1/cell".into(),
            },
            labels: HashMap::new(),
            aspects: HashMap::new(),
        }
    }

    fn collector(stub: &StubChannel) -> TopoCollector {
        let transport = StubTransport::default().serve("topo:5150", stub.clone());
        TopoCollector::new(
            BackendId::from("onos-topo"),
            CollectorConfig::with_address("topo:5150"),
            Arc::new(transport),
        )
    }

    #[tokio::test]
    async fn one_collector_emits_entities_and_relations() {
        let stub = StubChannel::default()
            .topo(ObjectType::Entity, Ok(vec![entity("cell-1")]))
            .topo(ObjectType::Relation, Ok(vec![relation("r-1")]));

        let kpis = collector(&stub).collect().await.unwrap();

        let [Kpi::TopoEntities(entities), Kpi::TopoRelations(relations)] = kpis.as_slice() else {
            panic!("unexpected kpis: {:?}", kpis);
        };
        let cell = &entities.entities["cell-1"];
        assert_eq!(cell.kind, "e2cell");
        assert_eq!(cell.labels, "env=lab");
        assert_eq!(cell.aspects, "onos.topo.E2Cell,onos.topo.Location");
        assert_eq!(relations.relations["r-1"].target, "e2:1/cell");
        assert_eq!(stub.calls(), 2);
    }

    #[tokio::test]
    async fn second_call_failing_fails_the_collector() {
        let stub = StubChannel::default()
            .topo(ObjectType::Entity, Ok(vec![entity("cell-1")]))
            .topo(ObjectType::Relation, Err(RpcError::Unavailable("draining".into())));

        let err = collector(&stub).collect().await.unwrap_err();

        assert!(matches!(err, CollectError::BackendCall { call: "List", .. }));
        assert_eq!(stub.closes(), 1);
    }
}
