// Adapters layer: concrete resource listers behind the `ResourceLister` port.

pub mod fixture;
pub mod http;

use crate::config::toml_config::{ExporterConfig, ListerSource};
use crate::core::lister::ListerSet;
use crate::core::registry::Registry;
use crate::utils::error::Result;

/// Build the lister set selected by the configuration.
pub fn build_listers(config: &ExporterConfig, registry: &Registry) -> Result<ListerSet> {
    match config.lister_source()? {
        ListerSource::Fixtures(dir) => {
            tracing::info!("📂 Using recorded responses from {}", dir.display());
            Ok(fixture::fixture_listers(registry, dir))
        }
        ListerSource::Http(endpoint) => {
            tracing::info!("📡 Using lister endpoint {}", endpoint);
            http::http_listers(
                registry,
                endpoint,
                config.lister.headers.clone().unwrap_or_default(),
                config.listing_timeout_duration(),
            )
        }
    }
}
