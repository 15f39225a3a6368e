use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::backends;
use crate::collector::BackendId;
use crate::export::AbsentValuePolicy;

/// Default bound for a single backend call (including a full stream drain).
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(5);

// ------------------------------------------------------------
// Collector configuration
// ------------------------------------------------------------
//
// The fully resolved connection settings of one collector.
//
// Resolved once when the collector is built and never touched
// again afterwards; collectors only ever read it.
//
#[derive(Debug, Clone, PartialEq)]
pub struct CollectorConfig {
    /// gRPC endpoint of the backend (`host:port`)
    pub service_address: String,

    /// Client certificate, `None` means the transport's built-in one
    pub cert_path: Option<PathBuf>,

    /// Client private key, paired with `cert_path`
    pub key_path: Option<PathBuf>,

    /// Plaintext connection when `false`
    pub use_tls: bool,

    /// Deadline applied to every backend call
    pub call_timeout: Duration,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            service_address: String::new(),
            cert_path: None,
            key_path: None,
            use_tls: true,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }
}

impl CollectorConfig {
    pub fn with_address(address: impl Into<String>) -> Self {
        Self {
            service_address: address.into(),
            ..Self::default()
        }
    }

    /// Compiled default for a backend type.
    ///
    /// Unknown identities get an empty address, which the collector
    /// later reports as a configuration error.
    pub fn default_for(id: &BackendId) -> Self {
        let address = backends::default_address(id).unwrap_or_default();
        Self::with_address(address)
    }

    /// Applies one configuration layer on top of `self`.
    ///
    /// Only fields that are set (and non-empty) in `layer` win.
    fn overlay(mut self, layer: &CollectorOverrides) -> Self {
        if let Some(address) = non_empty(&layer.service_address) {
            self.service_address = address.to_string();
        }
        if let Some(cert) = non_empty(&layer.cert_path) {
            self.cert_path = Some(PathBuf::from(cert));
        }
        if let Some(key) = non_empty(&layer.key_path) {
            self.key_path = Some(PathBuf::from(key));
        }
        if let Some(no_tls) = layer.no_tls {
            self.use_tls = !no_tls;
        }
        if let Some(ms) = layer.call_timeout_ms {
            self.call_timeout = Duration::from_millis(ms);
        }
        self
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

// ------------------------------------------------------------
// Partial configuration layer
// ------------------------------------------------------------
//
// Used both for explicit pass-in values (flags, embedding code)
// and for persisted per-backend entries. Every field is optional;
// empty strings are treated as unset.
//
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct CollectorOverrides {
    pub service_address: Option<String>,
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
    pub no_tls: Option<bool>,
    pub call_timeout_ms: Option<u64>,
}

impl CollectorOverrides {
    pub fn address(address: impl Into<String>) -> Self {
        Self {
            service_address: Some(address.into()),
            ..Self::default()
        }
    }
}

// ------------------------------------------------------------
// Persisted exporter settings
// ------------------------------------------------------------
//
// Deserialized from a JSON document, for example:
//
//   {
//     "pass-timeout-ms": 10000,
//     "absent-value": { "default": 0.0 },
//     "collectors": {
//       "onos-topo": { "service-address": "topo.ran:5150", "no-tls": true }
//     }
//   }
//
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "kebab-case")]
pub struct ExporterSettings {
    /// Per-backend persisted entries
    #[serde(default)]
    pub collectors: HashMap<BackendId, CollectorOverrides>,

    /// Pass-wide deadline; unset means wait for every collector
    pub pass_timeout_ms: Option<u64>,

    /// What to do with KPI values the backend left empty
    #[serde(default)]
    pub absent_value: AbsentValuePolicy,
}

impl ExporterSettings {
    pub fn from_json_str(data: &str) -> anyhow::Result<Self> {
        let settings = serde_json::from_str(data)?;
        Ok(settings)
    }

    pub fn pass_timeout(&self) -> Option<Duration> {
        self.pass_timeout_ms.map(Duration::from_millis)
    }
}

/// Reads the persisted settings document from disk.
pub fn load_settings(path: impl AsRef<Path>) -> anyhow::Result<ExporterSettings> {
    let data = fs::read_to_string(path)?;
    ExporterSettings::from_json_str(&data)
}

// ------------------------------------------------------------
// Configuration lookup
// ------------------------------------------------------------

/// Read-only lookup of a backend's connection settings.
pub trait ConfigResolver: Send + Sync {
    fn resolve(&self, id: &BackendId) -> CollectorConfig;
}

/// Resolves `explicit > persisted > compiled default`, field by field.
#[derive(Debug, Clone, Default)]
pub struct LayeredConfig {
    explicit: HashMap<BackendId, CollectorOverrides>,
    persisted: HashMap<BackendId, CollectorOverrides>,
}

impl LayeredConfig {
    pub fn new(
        explicit: HashMap<BackendId, CollectorOverrides>,
        settings: &ExporterSettings,
    ) -> Self {
        Self {
            explicit,
            persisted: settings.collectors.clone(),
        }
    }

    pub fn with_explicit(mut self, id: BackendId, overrides: CollectorOverrides) -> Self {
        self.explicit.insert(id, overrides);
        self
    }
}

impl ConfigResolver for LayeredConfig {
    fn resolve(&self, id: &BackendId) -> CollectorConfig {
        let mut config = CollectorConfig::default_for(id);
        if let Some(persisted) = self.persisted.get(id) {
            config = config.overlay(persisted);
        }
        if let Some(explicit) = self.explicit.get(id) {
            config = config.overlay(explicit);
        }
        config
    }
}
