//! Generic metric samples, the hand-off format towards the scrape endpoint.
//!
//! Every sample carries its complete label set. Nothing is registered up
//! front, so two samples of the same metric may have different label names
//! (see the UE aspects KPI).

use serde::Serialize;
use thiserror::Error;

/// Why a single sample could not be rendered.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TranslationError {
    #[error("metric {metric}: {names} label names but {values} label values")]
    LabelMismatch {
        metric: String,
        names: usize,
        values: usize,
    },

    #[error("metric {metric}: label {label} declared twice")]
    DuplicateLabel { metric: String, label: String },

    #[error("metric {metric}: {name:?} is not a valid metric or label name")]
    InvalidName { metric: String, name: String },

    #[error("metric {metric}: cannot parse value {raw:?}")]
    InvalidValue { metric: String, raw: String },

    #[error("metric {metric}: backend reported no value")]
    AbsentValue { metric: String },
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Gauge,
}

/// One fully labeled observation.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct MetricSample {
    pub name: String,
    pub description: String,
    pub static_labels: Vec<(String, String)>,
    label_names: Vec<String>,
    label_values: Vec<String>,
    pub value: f64,
    pub kind: ValueKind,
}

impl MetricSample {
    pub fn label_names(&self) -> &[String] {
        &self.label_names
    }

    pub fn label_values(&self) -> &[String] {
        &self.label_values
    }

    /// Value of a dynamic label, if this sample declares it.
    pub fn label(&self, name: &str) -> Option<&str> {
        self.label_names
            .iter()
            .position(|n| n == name)
            .map(|i| self.label_values[i].as_str())
    }
}

// ------------------------------------------------------------
// Descriptor builder
// ------------------------------------------------------------
//
// One builder per backend subsystem. Metric names come out as
// `<namespace>_<subsystem>_<name>` and every sample gets the
// subsystem's constant labels.
//
#[derive(Debug, Clone)]
pub struct MetricBuilder {
    namespace: &'static str,
    subsystem: &'static str,
    static_labels: &'static [(&'static str, &'static str)],
}

impl MetricBuilder {
    pub const fn new(
        namespace: &'static str,
        subsystem: &'static str,
        static_labels: &'static [(&'static str, &'static str)],
    ) -> Self {
        Self {
            namespace,
            subsystem,
            static_labels,
        }
    }

    /// Fully qualified metric name for `name`.
    pub fn qualified(&self, name: &str) -> String {
        format!("{}_{}_{}", self.namespace, self.subsystem, name)
    }

    pub fn desc(&self, name: &str, description: &str, label_names: Vec<String>) -> MetricDesc {
        MetricDesc {
            name: self.qualified(name),
            description: description.to_string(),
            static_labels: self
                .static_labels
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            label_names,
        }
    }
}

/// A metric name plus its label schema for one render call.
#[derive(Debug, Clone)]
pub struct MetricDesc {
    name: String,
    description: String,
    static_labels: Vec<(String, String)>,
    label_names: Vec<String>,
}

impl MetricDesc {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Builds a gauge sample. Label values must line up one-to-one with
    /// the descriptor's label names, and every label name (static ones
    /// included) must be non-empty and unique.
    pub fn gauge(&self, value: f64, label_values: Vec<String>) -> Result<MetricSample, TranslationError> {
        if self.label_names.len() != label_values.len() {
            return Err(TranslationError::LabelMismatch {
                metric: self.name.clone(),
                names: self.label_names.len(),
                values: label_values.len(),
            });
        }
        for (i, label) in self.label_names.iter().enumerate() {
            if label.is_empty() {
                return Err(TranslationError::InvalidName {
                    metric: self.name.clone(),
                    name: label.clone(),
                });
            }
            let is_static = self.static_labels.iter().any(|(name, _)| name == label);
            if is_static || self.label_names[..i].contains(label) {
                return Err(TranslationError::DuplicateLabel {
                    metric: self.name.clone(),
                    label: label.clone(),
                });
            }
        }

        Ok(MetricSample {
            name: self.name.clone(),
            description: self.description.clone(),
            static_labels: self.static_labels.clone(),
            label_names: self.label_names.clone(),
            label_values,
            value,
            kind: ValueKind::Gauge,
        })
    }
}
