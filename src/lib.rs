// ------------------------------------------------------------
// Module declarations
// ------------------------------------------------------------
//
// Each module represents a well-defined responsibility:
//
// - config:     Per-backend connection settings and layered resolution
// - transport:  RPC channel seam towards the backend services
// - schema:     Backend-native response messages
// - sample:     Generic metric samples handed to the scrape endpoint
// - kpis:       KPI model, one variant per kind of backend state
// - collector:  Collector abstraction and the per-pass aggregator
// - backends:   Concrete collectors and the collector registry
// - export:     KPI -> sample translation and the scrape entry point
// - metrics:    Runtime counters of the exporter itself
// - util:       Shared name / format helpers
//
pub mod config;
pub mod transport;
pub mod schema;
pub mod sample;
pub mod kpis;
pub mod collector;
pub mod backends;
pub mod export;
pub mod metrics;
mod util;

#[cfg(test)]
pub(crate) mod testing;

pub use backends::CollectorRegistry;
pub use collector::{BackendId, CollectError, CollectionResult, Collector};
pub use config::{CollectorConfig, ConfigResolver, ExporterSettings, LayeredConfig};
pub use export::{AbsentValuePolicy, KpiExporter, Translator};
pub use kpis::Kpi;
pub use sample::{MetricSample, TranslationError};
pub use transport::{RpcChannel, RpcError, Transport};

/// Installs `env_logger` as the `log` backend.
///
/// Honors `RUST_LOG`; falls back to `info` when it is unset.
/// Calling it more than once is harmless.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .try_init();
}
