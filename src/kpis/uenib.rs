use std::collections::HashMap;

use crate::export::AbsentValuePolicy;
use crate::sample::MetricBuilder;

use super::{RenderKpi, Rendered};

pub const NAME: &str = "aspects";
pub const DESCRIPTION: &str = "The uenib aspects";

const BUILDER: MetricBuilder = MetricBuilder::new("onos", "uenib", &[("sdran", "uenib")]);

/// A UE and the aspects the UE-NIB holds for it.
///
/// `aspects` pairs a normalized aspect name with its value, sorted by
/// name. The pairs become labels, so the label schema depends on which
/// aspects this particular UE carries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ue {
    pub id: String,
    pub aspects: Vec<(String, String)>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UeAspects {
    pub ues: HashMap<String, Ue>,
}

impl RenderKpi for UeAspects {
    fn render(&self, _absent: AbsentValuePolicy) -> Rendered {
        self.ues
            .values()
            .map(|ue| {
                let mut names = Vec::with_capacity(ue.aspects.len() + 1);
                let mut values = Vec::with_capacity(ue.aspects.len() + 1);
                names.push("ueid".to_string());
                values.push(ue.id.clone());
                for (name, value) in &ue.aspects {
                    names.push(name.clone());
                    values.push(value.clone());
                }

                BUILDER.desc(NAME, DESCRIPTION, names).gauge(1.0, values)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::TranslationError;

    fn ue(id: &str, aspects: &[(&str, &str)]) -> Ue {
        Ue {
            id: id.into(),
            aspects: aspects.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        }
    }

    #[test]
    fn label_schema_follows_each_ues_aspects() {
        let mut kpi = UeAspects::default();
        kpi.ues.insert("1".into(), ue("1", &[("neighbors", "a,b"), ("rrc_conn_avg", "7")]));
        kpi.ues.insert("2".into(), ue("2", &[("rrc_conn_avg", "3")]));

        let mut samples: Vec<_> = kpi
            .render(AbsentValuePolicy::Error)
            .into_iter()
            .map(Result::unwrap)
            .collect();
        samples.sort_by(|a, b| a.label("ueid").cmp(&b.label("ueid")));

        assert_eq!(samples[0].label_names(), ["ueid", "neighbors", "rrc_conn_avg"]);
        assert_eq!(samples[0].label("neighbors"), Some("a,b"));
        assert_eq!(samples[1].label_names(), ["ueid", "rrc_conn_avg"]);
        assert_eq!(samples[1].label("rrc_conn_avg"), Some("3"));

        for sample in &samples {
            assert_eq!(sample.name, "onos_uenib_aspects");
            assert_eq!(sample.label_names().len(), sample.label_values().len());
        }
    }

    #[test]
    fn colliding_aspect_names_drop_only_that_ue() {
        let mut kpi = UeAspects::default();
        kpi.ues.insert("1".into(), ue("1", &[("rrc_conn", "1"), ("rrc_conn", "2")]));
        kpi.ues.insert("2".into(), ue("2", &[("rrc_conn", "5")]));

        let rendered = kpi.render(AbsentValuePolicy::Error);
        let failed: Vec<_> = rendered.iter().filter_map(|r| r.as_ref().err()).collect();
        let ok: Vec<_> = rendered.iter().filter_map(|r| r.as_ref().ok()).collect();

        assert_eq!(ok.len(), 1);
        assert_eq!(ok[0].label("ueid"), Some("2"));
        assert!(matches!(failed[0], TranslationError::DuplicateLabel { label, .. } if label == "rrc_conn"));
    }

    #[test]
    fn aspect_named_like_a_static_label_is_dropped() {
        let mut kpi = UeAspects::default();
        kpi.ues.insert("1".into(), ue("1", &[("sdran", "x")]));

        let rendered = kpi.render(AbsentValuePolicy::Error);

        assert_eq!(
            rendered,
            vec![Err(TranslationError::DuplicateLabel {
                metric: "onos_uenib_aspects".into(),
                label: "sdran".into(),
            })]
        );
    }

    #[test]
    fn nameless_aspect_is_dropped() {
        let mut kpi = UeAspects::default();
        kpi.ues.insert("1".into(), ue("1", &[("", "x")]));

        assert!(matches!(
            kpi.render(AbsentValuePolicy::Error)[0],
            Err(TranslationError::InvalidName { .. })
        ));
    }
}
