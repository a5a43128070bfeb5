// crates/autok3s-core/src/env.rs - Environment preparation before any command runs
//
// Makes the disk and the process environment match what every subcommand
// assumes, then loads configuration. Runs once, synchronously, on the main
// thread.
//
// SEQUENCE:
// 1. Declare <config-dir>/config.yaml as the YAML source
// 2. Enable environment overlay for configuration keys
// 3. Ensure config dir and config file           (fatal on failure)
// 4. Ensure log dir                               (fatal on failure)
// 5. Ensure cluster-state dir                     (fatal on failure)
// 6. Export KUBECONFIG=<config-dir>/.kube/config  (logged, never fatal)
// 7. Read the configuration                       (fatal on failure)
//
// Nothing here deletes, truncates or rewrites existing files, so running the
// sequence again on a prepared directory changes nothing.

use std::ffi::OsStr;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error};

use crate::config::{Config, ConfigError, ConfigLoader};
use crate::paths::{FilesystemLayout, KUBECONFIG_ENV};

/// Fatal failures: the process must stop before dispatching anything
#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("failed to create directory {}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create file {}", .path.display())]
    CreateFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} exists but is not a {expected}", .path.display())]
    WrongKind {
        path: PathBuf,
        expected: &'static str,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type BootstrapResult<T> = Result<T, BootstrapError>;

/// Non-fatal failure exporting an environment variable
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnvError {
    #[error("[kubectl] failed to set {name}={value}: {reason}")]
    SetVar {
        name: String,
        value: String,
        reason: String,
    },
}

/// Create `dir` and any missing parents; a no-op when it already exists
pub fn ensure_folder_exist(dir: &Path) -> BootstrapResult<()> {
    if dir.is_dir() {
        return Ok(());
    }
    if dir.exists() {
        return Err(BootstrapError::WrongKind {
            path: dir.to_path_buf(),
            expected: "directory",
        });
    }
    fs::create_dir_all(dir).map_err(|source| BootstrapError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;
    debug!(path = %dir.display(), "created directory");
    Ok(())
}

/// Ensure `dir/file` exists, creating the directory and an empty file if needed
///
/// An existing file is opened without truncation and left untouched.
pub fn ensure_file_exist(dir: &Path, file: &str) -> BootstrapResult<PathBuf> {
    ensure_folder_exist(dir)?;

    let path = dir.join(file);
    if path.is_file() {
        return Ok(path);
    }
    if path.exists() {
        return Err(BootstrapError::WrongKind {
            path,
            expected: "file",
        });
    }

    // create_new refuses to clobber a file that appeared since the check
    match OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(_) => debug!(path = %path.display(), "created empty file"),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
        Err(source) => return Err(BootstrapError::CreateFile { path, source }),
    }
    Ok(path)
}

/// Export `name=value` for the rest of the process lifetime
///
/// Rejects values the platform cannot store instead of panicking.
pub fn export_env(name: &str, value: &OsStr) -> Result<(), EnvError> {
    let reject = |reason: &str| EnvError::SetVar {
        name: name.to_string(),
        value: value.to_string_lossy().into_owned(),
        reason: reason.to_string(),
    };

    if name.is_empty() || name.contains(['=', '\0']) {
        return Err(reject("invalid variable name"));
    }
    if value.as_encoded_bytes().contains(&0) {
        return Err(reject("value contains a NUL byte"));
    }

    // SAFETY: only called from the single-threaded bootstrap, before any
    // other thread exists that could read the environment concurrently.
    unsafe { std::env::set_var(name, value) };
    Ok(())
}

/// Proof that the bootstrap completed
///
/// Only `Bootstrap` produces this, so holding one means the layout is
/// on disk and the configuration was readable.
#[derive(Debug, Clone)]
pub struct Ready {
    layout: FilesystemLayout,
    config: Config,
    kubeconfig: PathBuf,
    kubeconfig_exported: bool,
}

impl Ready {
    pub fn layout(&self) -> &FilesystemLayout {
        &self.layout
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn kubeconfig(&self) -> &Path {
        &self.kubeconfig
    }

    /// False when exporting KUBECONFIG failed; kube-facing code must then
    /// pass the path explicitly
    pub fn kubeconfig_exported(&self) -> bool {
        self.kubeconfig_exported
    }
}

/// The environment guarantor and configuration loader wired together
pub struct Bootstrap {
    layout: FilesystemLayout,
    loader: ConfigLoader,
}

impl Bootstrap {
    /// Steps 1 and 2: declare the YAML source and the environment overlay
    pub fn new(layout: FilesystemLayout) -> Self {
        let loader = ConfigLoader::yaml(layout.config_file()).automatic_env();
        Self { layout, loader }
    }

    /// Ensure steps 3 to 5 only; safe to call repeatedly
    pub fn ensure_layout(&self) -> BootstrapResult<()> {
        ensure_file_exist(self.layout.config_dir(), crate::paths::CONFIG_FILE)?;
        ensure_folder_exist(&self.layout.log_dir())?;
        ensure_folder_exist(&self.layout.state_dir())?;
        Ok(())
    }

    /// Run the full sequence against the live process environment
    pub fn run(self) -> BootstrapResult<Ready> {
        self.ensure_layout()?;
        let (kubeconfig, kubeconfig_exported) = self.export_kubeconfig();
        let config = self.loader.load()?;
        Ok(self.ready(config, kubeconfig, kubeconfig_exported))
    }

    /// Run the full sequence with an explicit environment snapshot for the
    /// overlay; KUBECONFIG is still exported to the process
    pub fn run_with_env<I>(self, env: I) -> BootstrapResult<Ready>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.ensure_layout()?;
        let (kubeconfig, kubeconfig_exported) = self.export_kubeconfig();
        let config = self.loader.load_with_env(env)?;
        Ok(self.ready(config, kubeconfig, kubeconfig_exported))
    }

    fn export_kubeconfig(&self) -> (PathBuf, bool) {
        let kubeconfig = self.layout.kubeconfig();
        match export_env(KUBECONFIG_ENV, kubeconfig.as_os_str()) {
            Ok(()) => {
                debug!(var = KUBECONFIG_ENV, path = %kubeconfig.display(), "exported kubeconfig");
                (kubeconfig, true)
            }
            Err(e) => {
                error!("{e}");
                (kubeconfig, false)
            }
        }
    }

    fn ready(self, config: Config, kubeconfig: PathBuf, kubeconfig_exported: bool) -> Ready {
        Ready {
            layout: self.layout,
            config,
            kubeconfig,
            kubeconfig_exported,
        }
    }
}
