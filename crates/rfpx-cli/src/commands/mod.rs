//! Subcommands of the `rfpx` binary.

pub mod batch;
pub mod config;
pub mod fields;
pub mod output;
pub mod process;

use std::path::{Path, PathBuf};

use rfpx_core::RfpxConfig;
use tracing::debug;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rfpx")
        .join("config.json")
}

/// The `--config` path if given, otherwise the default location.
pub fn resolve_config_path(config_path: Option<&str>) -> PathBuf {
    config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path)
}

/// Load the configuration for a run.
///
/// An explicit `--config` file must exist; the default file is optional.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<RfpxConfig> {
    if let Some(path) = config_path {
        return read_config(Path::new(path));
    }

    let path = default_config_path();
    if path.exists() {
        read_config(&path)
    } else {
        debug!("No config file at {}, using defaults", path.display());
        Ok(RfpxConfig::default())
    }
}

fn read_config(path: &Path) -> anyhow::Result<RfpxConfig> {
    RfpxConfig::from_file(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))
}
