use std::collections::HashMap;

use crate::export::AbsentValuePolicy;
use crate::sample::MetricBuilder;

use super::{label_names, RenderKpi, Rendered};

pub const ENTITIES_NAME: &str = "entities";
pub const ENTITIES_DESCRIPTION: &str = "The onos topo entities";
pub const RELATIONS_NAME: &str = "relations";
pub const RELATIONS_DESCRIPTION: &str = "The onos topo relations";

const BUILDER: MetricBuilder = MetricBuilder::new("onos", "topo", &[("sdran", "topo")]);
const ENTITY_LABELS: [&str; 4] = ["entityid", "kind", "labels", "aspects"];
const RELATION_LABELS: [&str; 6] = ["relationid", "kind", "source", "target", "labels", "aspects"];

/// `labels` is rendered as `k=v,...`, `aspects` as the aspect type names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopoEntity {
    pub id: String,
    pub kind: String,
    pub labels: String,
    pub aspects: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopoRelation {
    pub id: String,
    pub kind: String,
    pub source: String,
    pub target: String,
    pub labels: String,
    pub aspects: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopoEntities {
    pub entities: HashMap<String, TopoEntity>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopoRelations {
    pub relations: HashMap<String, TopoRelation>,
}

impl RenderKpi for TopoEntities {
    fn render(&self, _absent: AbsentValuePolicy) -> Rendered {
        let desc = BUILDER.desc(ENTITIES_NAME, ENTITIES_DESCRIPTION, label_names(&ENTITY_LABELS));

        self.entities
            .values()
            .map(|e| {
                desc.gauge(
                    1.0,
                    vec![e.id.clone(), e.kind.clone(), e.labels.clone(), e.aspects.clone()],
                )
            })
            .collect()
    }
}

impl RenderKpi for TopoRelations {
    fn render(&self, _absent: AbsentValuePolicy) -> Rendered {
        let desc = BUILDER.desc(RELATIONS_NAME, RELATIONS_DESCRIPTION, label_names(&RELATION_LABELS));

        self.relations
            .values()
            .map(|r| {
                desc.gauge(
                    1.0,
                    vec![
                        r.id.clone(),
                        r.kind.clone(),
                        r.source.clone(),
                        r.target.clone(),
                        r.labels.clone(),
                        r.aspects.clone(),
                    ],
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entities_and_relations_use_their_own_schema() {
        let mut entities = TopoEntities::default();
        entities.entities.insert(
            "e2:1".into(),
            TopoEntity {
                id: "e2:1".into(),
                kind: "e2node".into(),
                labels: "env=lab".into(),
                aspects: "onos.topo.E2Node".into(),
            },
        );
        let mut relations = TopoRelations::default();
        relations.relations.insert(
            "r1".into(),
            TopoRelation {
                id: "r1".into(),
                kind: "controls".into(),
                source: "e2t:1".into(),
                target: "e2:1".into(),
                ..Default::default()
            },
        );

        let entity = entities.render(AbsentValuePolicy::Error).remove(0).unwrap();
        assert_eq!(entity.name, "onos_topo_entities");
        assert_eq!(entity.label("entityid"), Some("e2:1"));
        assert_eq!(entity.label("labels"), Some("env=lab"));

        let relation = relations.render(AbsentValuePolicy::Error).remove(0).unwrap();
        assert_eq!(relation.name, "onos_topo_relations");
        assert_eq!(relation.label("source"), Some("e2t:1"));
        assert_eq!(relation.label("target"), Some("e2:1"));
        assert_eq!(relation.label("aspects"), Some(""));
    }
}
