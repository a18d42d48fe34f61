//! `load_config` module: loads the static YAML build configuration into a [`BuildConfig`].
//!
//! This is the only place where user-supplied YAML is parsed. Artifact kinds are
//! tagged (`type: folder_archive | file_copy`) and upload options are a closed set, so
//! typos fail here rather than halfway through a release.
//!
//! # Errors
//! Errors use `anyhow::Error` and are surfaced at the CLI boundary.
//!
//! Example:
//!
//! ```yaml
//! staging_dir: build
//! artifacts:
//!   - type: folder_archive
//!     input_path: artifacts/
//!     output_name: release.zip
//!     upload:
//!       content_type: application/zip
//!   - type: file_copy
//!     input_path: README.md
//!     output_name: README.md
//! ```

use anyhow::Result;
use artifact_bucket_core::config::BuildConfig;
use std::fs;
use std::path::Path;
use tracing::{error, info};

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<BuildConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let config: BuildConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    config.trace_loaded();
    Ok(config)
}
