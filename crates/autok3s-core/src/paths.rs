// crates/autok3s-core/src/paths.rs - Canonical filesystem locations
//
// Every location the CLI touches on disk hangs off a single config directory.
// This module only computes paths; creating them is the job of env.rs.
//
// LAYOUT:
// ```
// <config-dir>/
// ├── config.yaml      (settings, created empty when missing)
// ├── logs/            (per-cluster operation logs)
// ├── state/           (cluster lifecycle state)
// └── .kube/config     (managed kubeconfig, referenced only)
// ```

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the config directory created under the user's home
pub const CONFIG_DIR_NAME: &str = ".autok3s";

/// Settings file name inside the config directory
pub const CONFIG_FILE: &str = "config.yaml";

/// Log directory name inside the config directory
pub const LOG_DIR: &str = "logs";

/// Cluster-state directory name inside the config directory
pub const STATE_DIR: &str = "state";

/// Kubeconfig location relative to the config directory
pub const KUBE_CFG_FILE: &str = ".kube/config";

/// Environment variable read by Kubernetes clients to locate their kubeconfig
pub const KUBECONFIG_ENV: &str = "KUBECONFIG";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("config directory path must not be empty")]
    EmptyConfigDir,
}

pub type LayoutResult<T> = Result<T, LayoutError>;

/// Platform default for the config directory: `$HOME/.autok3s`
///
/// Falls back to a relative `.autok3s` when no home directory can be
/// determined (e.g. stripped-down containers without `HOME`).
pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(CONFIG_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(CONFIG_DIR_NAME))
}

/// All paths derived from one config directory root
///
/// Construction is pure: nothing is checked or created on disk here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilesystemLayout {
    root: PathBuf,
}

impl FilesystemLayout {
    /// Build the layout for `root`, rejecting an empty path
    pub fn new(root: impl Into<PathBuf>) -> LayoutResult<Self> {
        let root = root.into();
        if root.as_os_str().is_empty() {
            return Err(LayoutError::EmptyConfigDir);
        }
        Ok(Self { root })
    }

    pub fn config_dir(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.root.join(LOG_DIR)
    }

    pub fn state_dir(&self) -> PathBuf {
        self.root.join(STATE_DIR)
    }

    /// Kubeconfig the CLI manages; never created by the bootstrap itself
    pub fn kubeconfig(&self) -> PathBuf {
        self.root.join(KUBE_CFG_FILE)
    }
}
