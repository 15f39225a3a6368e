use std::collections::HashMap;

use crate::export::AbsentValuePolicy;
use crate::sample::MetricBuilder;

use super::{label_names, RenderKpi, Rendered};

pub const NAME: &str = "subscriptions";
pub const DESCRIPTION: &str = "The e2 subscriptions";

const BUILDER: MetricBuilder = MetricBuilder::new("onos", "e2sub", &[("sdran", "e2sub")]);
const LABELS: [&str; 7] = [
    "id",
    "revision",
    "appid",
    "service_model_name",
    "service_model_version",
    "e2nodeid",
    "lifecycle_status",
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct E2Subscription {
    pub id: String,
    pub revision: String,
    pub app_id: String,
    pub service_model_name: String,
    pub service_model_version: String,
    pub e2_node_id: String,
    pub lifecycle_status: String,
}

/// E2 subscriptions keyed by subscription id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct E2Subscriptions {
    pub subscriptions: HashMap<String, E2Subscription>,
}

impl RenderKpi for E2Subscriptions {
    fn render(&self, _absent: AbsentValuePolicy) -> Rendered {
        let desc = BUILDER.desc(NAME, DESCRIPTION, label_names(&LABELS));

        self.subscriptions
            .values()
            .map(|s| {
                desc.gauge(
                    1.0,
                    vec![
                        s.id.clone(),
                        s.revision.clone(),
                        s.app_id.clone(),
                        s.service_model_name.clone(),
                        s.service_model_version.clone(),
                        s.e2_node_id.clone(),
                        s.lifecycle_status.clone(),
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
    fn subscription_renders_all_declared_labels() {
        let mut kpi = E2Subscriptions::default();
        kpi.subscriptions.insert(
            "s1".into(),
            E2Subscription {
                id: "s1".into(),
                revision: "3".into(),
                app_id: "kpimon".into(),
                service_model_name: "oran-e2sm-kpm".into(),
                service_model_version: "v2".into(),
                e2_node_id: "e2:1/5153".into(),
                lifecycle_status: "ACTIVE".into(),
            },
        );

        let samples = kpi.render(AbsentValuePolicy::Error);
        assert_eq!(samples.len(), 1);

        let sample = samples[0].as_ref().unwrap();
        assert_eq!(sample.name, "onos_e2sub_subscriptions");
        assert_eq!(sample.label_names().len(), LABELS.len());
        assert_eq!(sample.label("appid"), Some("kpimon"));
        assert_eq!(sample.label("lifecycle_status"), Some("ACTIVE"));
    }
}
