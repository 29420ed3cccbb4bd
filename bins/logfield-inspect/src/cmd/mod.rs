pub mod catalog;
pub mod check;

use std::sync::Arc;

use logfield_engine::{DispatchConfig, Registry};

use crate::error::InspectError;

/// Build the reference catalog under the configured duplicate policy.
fn build_registry(config: &DispatchConfig) -> Result<Arc<Registry>, InspectError> {
    let registry = Registry::builder()
        .extend(logfield_catalog::catalog())
        .duplicates(config.duplicate_types)
        .build()?;
    tracing::info!(
        direct = registry.direct_len(),
        chain = registry.chain_len(),
        "registry ready"
    );
    Ok(Arc::new(registry))
}
