use std::collections::HashMap;
use std::sync::Arc;

use crate::collector::{BackendId, CollectError, Collector};
use crate::config::CollectorConfig;
use crate::kpis::{Kpi, KpmMetrics, KpmRecord};
use crate::schema::KpmAttribute;
use crate::transport::Transport;

use super::base::CollectorBase;

/// Object id the KPIMON xApp stores its measurements under.
const KPIMON_OBJECT_ID: &str = "kpimon";

/// KPIMON xApp collector: one KPM measurement per attribute.
pub struct XappKpimonCollector {
    base: CollectorBase,
}

impl XappKpimonCollector {
    pub fn new(id: BackendId, config: CollectorConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            base: CollectorBase::new(id, config, transport),
        }
    }
}

#[async_trait::async_trait]
impl Collector for XappKpimonCollector {
    fn id(&self) -> &BackendId {
        &self.base.id
    }

    async fn collect(&self) -> Result<Vec<Kpi>, CollectError> {
        let conn = self.base.connect().await?;

        let attributes = self
            .base
            .call("GetMetrics", conn.channel().get_kpm_metrics(KPIMON_OBJECT_ID))
            .await?;

        // series key -> (timestamp, record); only the newest report of a
        // series is exported
        let mut latest: HashMap<String, (u64, KpmRecord)> = HashMap::new();
        for (key, value) in attributes {
            let Some((timestamp, record)) = parse_record(&key, value) else {
                log::warn!("{}: skipping malformed kpm key {:?}", self.base.id, key);
                continue;
            };

            let series = record.series_key();
            let newer = latest
                .get(&series)
                .is_none_or(|(seen, _)| timestamp > *seen);
            if newer {
                latest.insert(series, (timestamp, record));
            } else {
                log::debug!("{}: {} superseded by a newer report", self.base.id, key);
            }
        }

        let kpi = KpmMetrics {
            data: latest
                .into_iter()
                .map(|(series, (_, record))| (series, record))
                .collect(),
        };

        Ok(vec![Kpi::KpmMetrics(kpi)])
    }
}

/// Keys look like `cellid:plmnid:egnbid:metrictype[:timestamp]`.
///
/// A missing timestamp counts as the oldest possible report; one that
/// is not a number makes the key malformed.
fn parse_record(key: &str, value: KpmAttribute) -> Option<(u64, KpmRecord)> {
    let mut parts = key.split(':');
    let cell_id = parts.next().filter(|p| !p.is_empty())?;
    let plmn_id = parts.next()?;
    let egnb_id = parts.next()?;
    let metric_type = parts.next().filter(|p| !p.is_empty())?;
    let timestamp = match parts.next() {
        Some(raw) => raw.parse::<u64>().ok()?,
        None => 0,
    };
    if parts.next().is_some() {
        return None;
    }

    let record = KpmRecord {
        cell_id: cell_id.to_string(),
        plmn_id: plmn_id.to_string(),
        egnb_id: egnb_id.to_string(),
        metric_type: metric_type.to_string(),
        value,
    };
    Some((timestamp, record))
}
