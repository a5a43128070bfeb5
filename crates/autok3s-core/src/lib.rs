// crates/autok3s-core/src/lib.rs - Bootstrap core for the autok3s CLI
//
// MODULES:
// - paths: where the config file, logs, state and kubeconfig live
// - env: creates that layout, exports KUBECONFIG, loads configuration
// - config: YAML settings with environment variable overlay
// - settings: flags merged over configuration, plus the retry backoff
// - provider: registry of cloud providers by name
//
// The library never prints; it reports through `tracing` and typed errors
// and leaves presentation to the CLI crate.

pub mod config;
pub mod env;
pub mod paths;
pub mod provider;
pub mod settings;

pub use config::{Config, ConfigError, ConfigLoader};
pub use env::{Bootstrap, BootstrapError, EnvError, Ready};
pub use paths::FilesystemLayout;
pub use provider::{Provider, ProviderRegistry, RegistryError};
pub use settings::{Backoff, FlagOverrides, GlobalSettings};
