//! KPI -> metric translation and the scrape entry point.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::collector::runner::run_pass;
use crate::collector::{CollectionResult, Collector};
use crate::config::ExporterSettings;
use crate::metrics::RuntimeMetrics;
use crate::sample::{MetricSample, TranslationError};
use crate::schema::KpmAttribute;
use crate::util;

/// What a KPI value the backend left empty turns into.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AbsentValuePolicy {
    /// Drop the sample and report a translation error
    #[default]
    Error,

    /// Export the given value, with a warning
    Default(f64),
}

impl AbsentValuePolicy {
    /// Coerces a backend-native value into a sample value.
    pub fn coerce(self, metric: &str, value: &KpmAttribute) -> Result<f64, TranslationError> {
        match value {
            KpmAttribute::Integer(v) => Ok(*v as f64),
            KpmAttribute::Real(v) if v.is_finite() => Ok(*v),
            KpmAttribute::Real(v) => Err(TranslationError::InvalidValue {
                metric: metric.to_string(),
                raw: v.to_string(),
            }),
            KpmAttribute::Text(raw) => {
                util::parse_number(raw).ok_or_else(|| TranslationError::InvalidValue {
                    metric: metric.to_string(),
                    raw: raw.clone(),
                })
            }
            KpmAttribute::Absent => match self {
                AbsentValuePolicy::Error => Err(TranslationError::AbsentValue {
                    metric: metric.to_string(),
                }),
                AbsentValuePolicy::Default(default) => {
                    log::warn!("{}: no value reported, exporting {}", metric, default);
                    Ok(default)
                }
            },
        }
    }
}

/// Renders the KPIs of a pass into samples.
#[derive(Debug, Clone, Copy, Default)]
pub struct Translator {
    absent: AbsentValuePolicy,
}

/// Samples of one render plus how many were dropped.
#[derive(Debug, Default)]
pub struct Translation {
    pub samples: Vec<MetricSample>,
    pub dropped: usize,
}

impl Translator {
    pub fn new(absent: AbsentValuePolicy) -> Self {
        Self { absent }
    }

    /// Renders every KPI. A sample that fails to render is logged and
    /// dropped; its siblings still make it out.
    pub fn translate(&self, result: &CollectionResult) -> Translation {
        let mut out = Translation::default();

        for kpi in &result.kpis {
            for rendered in kpi.render(self.absent) {
                match rendered {
                    Ok(sample) => out.samples.push(sample),
                    Err(e) => {
                        log::error!("kpi {} sample dropped: {}", kpi.name(), e);
                        out.dropped += 1;
                    }
                }
            }
        }

        out
    }
}

// ------------------------------------------------------------
// Exporter
// ------------------------------------------------------------
//
// Glue between the scrape endpoint and the pipeline. Each call to
// `collect_now` is one independent pass; nothing is carried over
// between scrapes except the runtime counters.
//
pub struct KpiExporter {
    collectors: Vec<Arc<dyn Collector>>,
    translator: Translator,
    pass_timeout: Option<Duration>,
    metrics: Arc<RuntimeMetrics>,
}

impl KpiExporter {
    pub fn new(collectors: Vec<Arc<dyn Collector>>, settings: &ExporterSettings) -> Self {
        Self {
            collectors,
            translator: Translator::new(settings.absent_value),
            pass_timeout: settings.pass_timeout(),
            metrics: Arc::new(RuntimeMetrics::default()),
        }
    }

    pub fn metrics(&self) -> Arc<RuntimeMetrics> {
        self.metrics.clone()
    }

    /// Runs one pass and returns the samples to serve for this scrape.
    ///
    /// Never fails: backends that could not be collected are logged and
    /// simply missing from the output.
    pub async fn collect_now(&self) -> Vec<MetricSample> {
        let result = run_pass(&self.collectors, self.pass_timeout).await;
        let translation = self.translator.translate(&result);

        self.metrics.record_pass(&result, &translation);
        log::info!("{}", self.metrics.summary());

        translation.samples
    }
}
