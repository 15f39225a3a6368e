use std::collections::HashMap;

use crate::export::AbsentValuePolicy;
use crate::sample::{MetricBuilder, TranslationError};
use crate::schema::KpmAttribute;
use crate::util;

use super::{label_names, RenderKpi, Rendered};

pub const NAME: &str = "kpm";
pub const DESCRIPTION: &str = "The KPM related metrics";

const BUILDER: MetricBuilder = MetricBuilder::new("onos", "xappkpimon", &[("sdran", "xappkpimon")]);
const LABELS: [&str; 3] = ["cellid", "plmnid", "egnbid"];

/// One KPM measurement of one cell.
///
/// The metric name is derived from `metric_type`, so a single KPI
/// renders into as many metrics as there are measurement types.
#[derive(Debug, Clone, PartialEq)]
pub struct KpmRecord {
    pub cell_id: String,
    pub plmn_id: String,
    pub egnb_id: String,
    pub metric_type: String,
    pub value: KpmAttribute,
}

impl KpmRecord {
    /// `cellid:plmnid:egnbid:metrictype`, one entry per exported series.
    pub fn series_key(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            self.cell_id, self.plmn_id, self.egnb_id, self.metric_type
        )
    }
}

/// KPM measurements keyed by series (see `KpmRecord::series_key`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KpmMetrics {
    pub data: HashMap<String, KpmRecord>,
}

impl RenderKpi for KpmMetrics {
    fn render(&self, absent: AbsentValuePolicy) -> Rendered {
        self.data
            .values()
            .map(|record| {
                let name = util::normalize_name(&record.metric_type).ok_or_else(|| {
                    TranslationError::InvalidName {
                        metric: BUILDER.qualified(NAME),
                        name: record.metric_type.clone(),
                    }
                })?;
                let desc = BUILDER.desc(&name, DESCRIPTION, label_names(&LABELS));
                let value = absent.coerce(desc.name(), &record.value)?;
                desc.gauge(
                    value,
                    vec![
                        record.cell_id.clone(),
                        record.plmn_id.clone(),
                        record.egnb_id.clone(),
                    ],
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(metric_type: &str, value: KpmAttribute) -> KpmRecord {
        KpmRecord {
            cell_id: "1a".into(),
            plmn_id: "138426".into(),
            egnb_id: "5153".into(),
            metric_type: metric_type.into(),
            value,
        }
    }

    fn kpi(records: Vec<(&str, KpmRecord)>) -> KpmMetrics {
        KpmMetrics {
            data: records.into_iter().map(|(k, r)| (k.to_string(), r)).collect(),
        }
    }

    #[test]
    fn metric_name_comes_from_the_measurement_type() {
        let kpi = kpi(vec![("k1", record("RRC.Conn.Avg", KpmAttribute::Text("0x10".into())))]);

        let sample = kpi.render(AbsentValuePolicy::Error).remove(0).unwrap();
        assert_eq!(sample.name, "onos_xappkpimon_rrc_conn_avg");
        assert_eq!(sample.value, 16.0);
        assert_eq!(sample.label("cellid"), Some("1a"));
        assert_eq!(sample.label("egnbid"), Some("5153"));
    }

    #[test]
    fn unparsable_value_drops_only_that_sample() {
        let kpi = kpi(vec![
            ("k1", record("RRC.Conn.Max", KpmAttribute::Text("lots".into()))),
            ("k2", record("RRC.Conn.Avg", KpmAttribute::Real(3.5))),
            ("k3", record("DRB.UEThpDl", KpmAttribute::Integer(9))),
        ]);

        let rendered = kpi.render(AbsentValuePolicy::Error);
        let ok = rendered.iter().filter(|r| r.is_ok()).count();
        let errors: Vec<_> = rendered.iter().filter_map(|r| r.as_ref().err()).collect();

        assert_eq!(ok, 2);
        assert_eq!(
            errors,
            vec![&TranslationError::InvalidValue {
                metric: "onos_xappkpimon_rrc_conn_max".into(),
                raw: "lots".into(),
            }]
        );
    }

    #[test]
    fn absent_value_follows_the_policy() {
        let kpi = kpi(vec![("k1", record("RRC.Conn.Avg", KpmAttribute::Absent))]);

        assert!(matches!(
            kpi.render(AbsentValuePolicy::Error)[0],
            Err(TranslationError::AbsentValue { .. })
        ));

        let sample = kpi.render(AbsentValuePolicy::Default(-1.0)).remove(0).unwrap();
        assert_eq!(sample.value, -1.0);
    }

    #[test]
    fn blank_measurement_type_is_a_translation_error() {
        let kpi = kpi(vec![("k1", record(" ", KpmAttribute::Integer(1)))]);

        assert!(matches!(
            kpi.render(AbsentValuePolicy::Error)[0],
            Err(TranslationError::InvalidName { .. })
        ));
    }
}
