// crates/autok3s-core/src/config.rs - YAML configuration with environment overlay
//
// The config file's schema belongs to the subcommands that read it, so this
// loader keeps values untyped and hands out typed views on demand.
//
// LOOKUP ORDER (highest to lowest priority):
// 1. Environment variable whose name matches the key (case-insensitive)
// 2. Value from <config-dir>/config.yaml
//
// Command-line flags sit above both; that merge happens in settings.rs.
//
// KEY RULES:
// - Keys are case-insensitive and stored lower-case
// - Nested mappings flatten to dot-separated keys: `cluster: {name: x}` -> `cluster.name`
// - The matching environment name swaps dots for underscores: `cluster.name` -> CLUSTER_NAME
// - No prefix is required, so `retry` is overridden by RETRY

use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during configuration loading and lookup
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error reading config {file}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML in {file}: {error}")]
    Parse { file: String, error: String },

    #[error("Invalid configuration value for '{key}': {error}")]
    Validation { key: String, error: String },
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Describes where configuration comes from
///
/// Mirrors the two declarations the bootstrap makes before anything touches
/// the disk: the YAML source path, and whether the environment overlays it.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    path: PathBuf,
    automatic_env: bool,
}

impl ConfigLoader {
    /// Declare a YAML config source at `path`
    pub fn yaml(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            automatic_env: false,
        }
    }

    /// Let environment variables override file values by key name
    pub fn automatic_env(mut self) -> Self {
        self.automatic_env = true;
        self
    }

    /// Load using a snapshot of the current process environment
    ///
    /// Variables with non-UTF-8 names or values can never match a key and
    /// are skipped.
    pub fn load(&self) -> ConfigResult<Config> {
        let env = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)));
        self.load_with_env(env)
    }

    /// Load using an explicit environment snapshot
    pub fn load_with_env<I>(&self, env: I) -> ConfigResult<Config>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let file = self.path.display().to_string();
        let content = fs::read_to_string(&self.path).map_err(|source| ConfigError::Io {
            file: file.clone(),
            source,
        })?;

        let values = parse_yaml(&content, &file)?;
        debug!(file = %file, keys = values.len(), "loaded configuration");

        let env = if self.automatic_env {
            env.into_iter().collect()
        } else {
            Vec::new()
        };

        Ok(Config {
            path: self.path.clone(),
            values,
            env,
        })
    }
}

/// Loaded configuration: file values plus the environment overlay
#[derive(Debug, Clone, Default)]
pub struct Config {
    path: PathBuf,
    values: BTreeMap<String, Value>,
    env: Vec<(String, String)>,
}

impl Config {
    /// File the values were read from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when the file held no keys (the environment may still answer lookups)
    pub fn is_file_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw value for `key`, environment first
    pub fn get_value(&self, key: &str) -> Option<Value> {
        let key = key.to_ascii_lowercase();
        if let Some(raw) = self.env_override(&key) {
            return Some(env_scalar(raw));
        }
        self.values.get(&key).cloned()
    }

    /// Deserialize the value for `key` into `T`
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> ConfigResult<Option<T>> {
        let Some(value) = self.get_value(key) else {
            return Ok(None);
        };
        serde_yaml::from_value(value)
            .map(Some)
            .map_err(|e| ConfigError::Validation {
                key: key.to_string(),
                error: e.to_string(),
            })
    }

    /// String view of a scalar value
    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.get_value(key)? {
            Value::String(s) => Some(s),
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Boolean value, accepting yes/no and 1/0 spellings as well
    pub fn get_bool(&self, key: &str) -> ConfigResult<Option<bool>> {
        let Some(value) = self.get_value(key) else {
            return Ok(None);
        };
        let parsed = match &value {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => match n.as_u64() {
                Some(0) => Some(false),
                Some(1) => Some(true),
                _ => None,
            },
            Value::String(s) => match s.to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Some(true),
                "false" | "no" | "off" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        };
        parsed.map(Some).ok_or_else(|| ConfigError::Validation {
            key: key.to_string(),
            error: format!("expected a boolean, found {value:?}"),
        })
    }

    /// Non-negative integer value
    pub fn get_u32(&self, key: &str) -> ConfigResult<Option<u32>> {
        self.get::<u32>(key)
    }

    fn env_override(&self, key: &str) -> Option<&str> {
        let candidate = key.replace('.', "_");
        let upper = candidate.to_ascii_uppercase();
        // Prefer the conventional upper-case spelling when several casings exist
        self.env
            .iter()
            .find(|(name, _)| *name == upper)
            .or_else(|| {
                self.env
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(&candidate))
            })
            .map(|(_, value)| value.as_str())
    }
}

/// Parse file content into flattened, lower-cased keys
///
/// Empty and `null` documents are an empty configuration, not an error.
fn parse_yaml(content: &str, file: &str) -> ConfigResult<BTreeMap<String, Value>> {
    let mut values = BTreeMap::new();
    if content.trim().is_empty() {
        return Ok(values);
    }

    let doc: Value = serde_yaml::from_str(content).map_err(|e| ConfigError::Parse {
        file: file.to_string(),
        error: e.to_string(),
    })?;

    match doc {
        Value::Null => {}
        Value::Mapping(map) => flatten_into(&mut values, None, map),
        other => {
            return Err(ConfigError::Parse {
                file: file.to_string(),
                error: format!("top-level document must be a mapping, found {other:?}"),
            });
        }
    }
    Ok(values)
}

fn flatten_into(out: &mut BTreeMap<String, Value>, prefix: Option<&str>, map: Mapping) {
    for (key, value) in map {
        let Some(key) = key_string(&key) else {
            continue;
        };
        let key = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key,
        };
        match value {
            Value::Mapping(nested) => flatten_into(out, Some(&key), nested),
            value => {
                out.insert(key, value);
            }
        }
    }
}

fn key_string(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.to_ascii_lowercase()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Interpret an environment value the way a YAML scalar would be read
fn env_scalar(raw: &str) -> Value {
    match serde_yaml::from_str::<Value>(raw) {
        Ok(v @ (Value::Bool(_) | Value::Number(_) | Value::String(_))) => v,
        _ => Value::String(raw.to_string()),
    }
}
