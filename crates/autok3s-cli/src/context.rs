use autok3s_core::{GlobalSettings, ProviderRegistry, Ready};

/// Everything a command handler may read
///
/// Built once in main after the bootstrap succeeded and passed by reference
/// to the handler. Handlers get no way to replace the settings; they can only
/// read them.
pub struct Context {
    settings: GlobalSettings,
    ready: Ready,
    providers: ProviderRegistry,
}

impl Context {
    pub fn new(settings: GlobalSettings, ready: Ready, providers: ProviderRegistry) -> Self {
        Self {
            settings,
            ready,
            providers,
        }
    }

    /// Resolved flags and configuration
    pub fn settings(&self) -> &GlobalSettings {
        &self.settings
    }

    /// Prepared layout, loaded config and kubeconfig location
    pub fn ready(&self) -> &Ready {
        &self.ready
    }

    pub fn providers(&self) -> &ProviderRegistry {
        &self.providers
    }
}
