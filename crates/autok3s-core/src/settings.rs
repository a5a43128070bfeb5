// crates/autok3s-core/src/settings.rs - Process-wide settings resolved once at startup
//
// PRECEDENCE (highest to lowest):
// 1. Explicit command-line flag (--debug, --retry)
// 2. Configuration value (config.yaml, overlaid by DEBUG / RETRY env vars)
// 3. Built-in default
//
// A bad `retry` is fatal; a bad `debug` is logged and treated as unset.
//
// The resolved value is built once during bootstrap and then only borrowed;
// nothing mutates it after resolve() returns.

use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

use crate::config::{Config, ConfigResult};
use crate::paths::default_config_dir;

/// Config key consulted for the debug toggle
pub const DEBUG_KEY: &str = "debug";

/// Config key consulted for the retry step count
pub const RETRY_KEY: &str = "retry";

/// Default number of attempts when waiting for a cluster to reach a state
pub const DEFAULT_RETRY_STEPS: u32 = 5;

/// Default wait between attempts
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(30);

/// Wait schedule used by cluster operations polling for a desired state
///
/// The bootstrap itself never retries; it only carries this value to the
/// commands that do.
#[derive(Debug, Clone, PartialEq)]
pub struct Backoff {
    /// Wait before the first retry
    pub duration: Duration,
    /// Multiplier applied to the wait after every step
    pub factor: f64,
    /// Number of attempts
    pub steps: u32,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            duration: DEFAULT_RETRY_INTERVAL,
            factor: 1.0,
            steps: DEFAULT_RETRY_STEPS,
        }
    }
}

impl Backoff {
    /// Same schedule with a different step count
    pub fn with_steps(self, steps: u32) -> Self {
        Self { steps, ..self }
    }

    /// The successive waits, one per step
    ///
    /// A factor below 1.0 is treated as 1.0 so waits never shrink.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        let factor = self.factor.max(1.0);
        (0..self.steps).scan(self.duration, move |wait, _| {
            let current = *wait;
            *wait = Duration::try_from_secs_f64(wait.as_secs_f64() * factor)
                .unwrap_or(Duration::MAX);
            Some(current)
        })
    }
}

/// Values supplied on the command line, `None` when the flag was absent
#[derive(Debug, Clone, Default)]
pub struct FlagOverrides {
    pub debug: bool,
    pub cfg_path: Option<PathBuf>,
    pub retry: Option<u32>,
}

impl FlagOverrides {
    /// Config directory to bootstrap: the `--cfg` value unless absent or empty
    pub fn config_dir(&self) -> PathBuf {
        self.cfg_path
            .clone()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(default_config_dir)
    }
}

/// Parsed flags and configuration shared with every command
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalSettings {
    pub debug: bool,
    cfg_path: PathBuf,
    pub backoff: Backoff,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            debug: false,
            cfg_path: default_config_dir(),
            backoff: Backoff::default(),
        }
    }
}

impl GlobalSettings {
    /// Merge flags over configuration over defaults
    ///
    /// `cfg_path` is taken from flags only: it decides which config file is
    /// read, so the file cannot redirect itself.
    pub fn resolve(flags: &FlagOverrides, config: &Config) -> ConfigResult<Self> {
        let defaults = Self::default();

        // An unreadable debug value counts as unset
        let debug = if flags.debug {
            true
        } else {
            match config.get_bool(DEBUG_KEY) {
                Ok(value) => value.unwrap_or(defaults.debug),
                Err(e) => {
                    warn!("ignoring {e}");
                    defaults.debug
                }
            }
        };

        let steps = match flags.retry {
            Some(steps) => steps,
            None => config
                .get_u32(RETRY_KEY)?
                .unwrap_or(defaults.backoff.steps),
        };

        Ok(Self {
            debug,
            cfg_path: flags.config_dir(),
            backoff: defaults.backoff.with_steps(steps),
        })
    }

    /// Config directory root; never empty
    pub fn cfg_path(&self) -> &Path {
        &self.cfg_path
    }

    pub fn retry_steps(&self) -> u32 {
        self.backoff.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use std::fs;
    use tempfile::TempDir;

    fn config_from(yaml: &str, env: &[(&str, &str)]) -> (TempDir, Config) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, yaml).unwrap();
        let env = env.iter().map(|(k, v)| (k.to_string(), v.to_string()));
        let config = ConfigLoader::yaml(&path)
            .automatic_env()
            .load_with_env(env)
            .unwrap();
        (dir, config)
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let (_dir, config) = config_from("", &[]);
        let settings = GlobalSettings::resolve(&FlagOverrides::default(), &config).unwrap();
        assert!(!settings.debug);
        assert_eq!(settings.retry_steps(), DEFAULT_RETRY_STEPS);
        assert_eq!(settings.cfg_path(), default_config_dir());
    }

    #[test]
    fn test_retry_flag_overrides_file() {
        let (_dir, config) = config_from("retry: 3\n", &[]);
        let flags = FlagOverrides {
            retry: Some(10),
            ..Default::default()
        };
        let settings = GlobalSettings::resolve(&flags, &config).unwrap();
        assert_eq!(settings.retry_steps(), 10);
    }

    #[test]
    fn test_retry_from_file_then_env() {
        let (_dir, config) = config_from("retry: 3\n", &[]);
        let settings = GlobalSettings::resolve(&FlagOverrides::default(), &config).unwrap();
        assert_eq!(settings.retry_steps(), 3);

        let (_dir, config) = config_from("retry: 3\n", &[("RETRY", "8")]);
        let settings = GlobalSettings::resolve(&FlagOverrides::default(), &config).unwrap();
        assert_eq!(settings.retry_steps(), 8);
    }

    #[test]
    fn test_zero_retry_is_allowed() {
        let (_dir, config) = config_from("retry: 0\n", &[]);
        let settings = GlobalSettings::resolve(&FlagOverrides::default(), &config).unwrap();
        assert_eq!(settings.retry_steps(), 0);
        assert_eq!(settings.backoff.delays().count(), 0);
    }

    #[test]
    fn test_negative_retry_in_file_is_rejected() {
        let (_dir, config) = config_from("retry: -1\n", &[]);
        assert!(GlobalSettings::resolve(&FlagOverrides::default(), &config).is_err());
    }

    #[test]
    fn test_debug_from_env_and_flag() {
        let (_dir, config) = config_from("debug: false\n", &[("DEBUG", "true")]);
        let settings = GlobalSettings::resolve(&FlagOverrides::default(), &config).unwrap();
        assert!(settings.debug);

        let (_dir, config) = config_from("debug: false\n", &[]);
        let flags = FlagOverrides {
            debug: true,
            ..Default::default()
        };
        assert!(GlobalSettings::resolve(&flags, &config).unwrap().debug);
    }

    #[test]
    fn test_unparsable_debug_falls_back_to_default() {
        let (_dir, config) = config_from("", &[("DEBUG", "app:*")]);
        let settings = GlobalSettings::resolve(&FlagOverrides::default(), &config).unwrap();
        assert!(!settings.debug);

        let (_dir, config) = config_from("debug: sometimes\n", &[]);
        let settings = GlobalSettings::resolve(&FlagOverrides::default(), &config).unwrap();
        assert!(!settings.debug);
    }

    #[test]
    fn test_debug_flag_wins_over_unparsable_env() {
        let (_dir, config) = config_from("", &[("DEBUG", "app:*")]);
        let flags = FlagOverrides {
            debug: true,
            ..Default::default()
        };
        assert!(GlobalSettings::resolve(&flags, &config).unwrap().debug);
    }

    #[test]
    fn test_cfg_flag_is_kept_and_empty_falls_back() {
        let (_dir, config) = config_from("", &[]);
        let flags = FlagOverrides {
            cfg_path: Some(PathBuf::from("/srv/autok3s")),
            ..Default::default()
        };
        let settings = GlobalSettings::resolve(&flags, &config).unwrap();
        assert_eq!(settings.cfg_path(), Path::new("/srv/autok3s"));

        let flags = FlagOverrides {
            cfg_path: Some(PathBuf::new()),
            ..Default::default()
        };
        let settings = GlobalSettings::resolve(&flags, &config).unwrap();
        assert!(!settings.cfg_path().as_os_str().is_empty());
    }

    #[test]
    fn test_backoff_delays_grow_by_factor() {
        let backoff = Backoff {
            duration: Duration::from_secs(1),
            factor: 2.0,
            steps: 4,
        };
        let delays: Vec<_> = backoff.delays().collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(4),
                Duration::from_secs(8),
            ]
        );
    }

    #[test]
    fn test_default_backoff_is_flat() {
        let delays: Vec<_> = Backoff::default().delays().collect();
        assert_eq!(delays.len(), DEFAULT_RETRY_STEPS as usize);
        assert!(delays.iter().all(|d| *d == DEFAULT_RETRY_INTERVAL));
    }
}
