// crates/autok3s-core/src/provider.rs - Named cloud provider registry
//
// Providers are looked up by identifier ("aws", "native", ...) by commands
// that create or tear down clusters. Registration is explicit: main builds
// the registry once with `ProviderRegistry::builtin()` and hands it to every
// command through the context. Nothing registers itself on load.
//
// Only identity lives here. What a provider can do is defined by the
// commands that use it.

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("provider '{0}' is already registered")]
    Duplicate(String),

    #[error("unknown provider '{0}'")]
    UnknownProvider(String),
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// A cloud platform able to host K3s nodes
pub trait Provider: Send + Sync {
    /// Registry key
    fn name(&self) -> &'static str;

    /// Human-readable platform name
    fn description(&self) -> &'static str;
}

impl fmt::Debug for dyn Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider").field("name", &self.name()).finish()
    }
}

/// Constructor stored in the registry
pub type ProviderFactory = fn() -> Box<dyn Provider>;

/// Provider identifier to factory
#[derive(Default)]
pub struct ProviderRegistry {
    factories: BTreeMap<String, ProviderFactory>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every provider compiled into the binary
    pub fn builtin() -> RegistryResult<Self> {
        let mut registry = Self::new();
        registry.register(builtin::ALIBABA, builtin::alibaba)?;
        registry.register(builtin::AWS, builtin::aws)?;
        registry.register(builtin::TENCENT, builtin::tencent)?;
        registry.register(builtin::NATIVE, builtin::native)?;
        Ok(registry)
    }

    /// Add a provider; each name may be registered once
    pub fn register(&mut self, name: &str, factory: ProviderFactory) -> RegistryResult<()> {
        if self.factories.contains_key(name) {
            return Err(RegistryError::Duplicate(name.to_string()));
        }
        self.factories.insert(name.to_string(), factory);
        debug!(provider = name, "registered provider");
        Ok(())
    }

    pub fn get(&self, name: &str) -> RegistryResult<ProviderFactory> {
        self.factories
            .get(name)
            .copied()
            .ok_or_else(|| RegistryError::UnknownProvider(name.to_string()))
    }

    /// Instantiate the provider registered under `name`
    pub fn create(&self, name: &str) -> RegistryResult<Box<dyn Provider>> {
        self.get(name).map(|factory| factory())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered identifiers in sorted order
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.factories.keys()).finish()
    }
}

/// Providers shipped with the CLI
pub mod builtin {
    use super::Provider;

    pub const ALIBABA: &str = "alibaba";
    pub const AWS: &str = "aws";
    pub const TENCENT: &str = "tencent";
    pub const NATIVE: &str = "native";

    macro_rules! provider {
        ($ty:ident, $ctor:ident, $name:expr, $desc:expr) => {
            #[derive(Debug, Default)]
            pub struct $ty;

            impl Provider for $ty {
                fn name(&self) -> &'static str {
                    $name
                }

                fn description(&self) -> &'static str {
                    $desc
                }
            }

            pub fn $ctor() -> Box<dyn Provider> {
                Box::new($ty)
            }
        };
    }

    provider!(Alibaba, alibaba, ALIBABA, "Alibaba Cloud ECS");
    provider!(Aws, aws, AWS, "Amazon EC2");
    provider!(Tencent, tencent, TENCENT, "Tencent Cloud CVM");
    // Existing hosts reached over SSH
    provider!(Native, native, NATIVE, "Native VMs or bare metal");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registers_all_providers() {
        let registry = ProviderRegistry::builtin().unwrap();
        assert_eq!(registry.names(), vec!["alibaba", "aws", "native", "tencent"]);
        for name in registry.names() {
            assert_eq!(registry.create(name).unwrap().name(), name);
        }
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = ProviderRegistry::new();
        registry.register("aws", builtin::aws).unwrap();
        assert_eq!(
            registry.register("aws", builtin::aws),
            Err(RegistryError::Duplicate("aws".to_string()))
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unknown_provider() {
        let registry = ProviderRegistry::builtin().unwrap();
        assert!(!registry.contains("gcp"));
        assert_eq!(
            registry.create("gcp").unwrap_err(),
            RegistryError::UnknownProvider("gcp".to_string())
        );
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let registry = ProviderRegistry::builtin().unwrap();
        assert!(registry.get("AWS").is_err());
    }
}
