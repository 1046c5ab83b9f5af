use std::path::Path;

use log::{info, warn};

use crate::config::DashboardConfig;
use crate::error::Result;

/// Read the dashboard configuration (JSON) from disk.
/// A missing file gives the default configuration.
pub fn load_config(path: impl AsRef<Path>) -> Result<DashboardConfig> {
    let path = path.as_ref();
    if !path.exists() {
        warn!("no dashboard config at {}, using defaults", path.display());
        return Ok(DashboardConfig::default());
    }

    let contents = std::fs::read_to_string(path)?;
    let de = &mut serde_json::Deserializer::from_str(&contents);
    let config: DashboardConfig = serde_path_to_error::deserialize(de)?;
    info!(
        "dashboard config loaded from {} ({} metric overrides)",
        path.display(),
        config.metrics.len()
    );
    Ok(config)
}

/// Write the dashboard configuration to disk as pretty-printed JSON.
pub fn save_config(config: &DashboardConfig, path: impl AsRef<Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path.as_ref(), json)?;
    info!("dashboard config saved to {}", path.as_ref().display());
    Ok(())
}
