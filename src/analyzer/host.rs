use std::collections::HashMap;

/// What the adapter needs from the host platform: read access to its global settings.
pub trait HostApi: Send + Sync {
    fn get_global_setting(&self, key: &str) -> Option<String>;
}

/// Global settings held in memory, e.g. the `[global_settings]` table of the config file
#[derive(Debug, Clone, Default)]
pub struct GlobalSettings {
    settings: HashMap<String, String>,
}

impl GlobalSettings {
    pub fn new(settings: HashMap<String, String>) -> Self {
        Self { settings }
    }
}

impl HostApi for GlobalSettings {
    fn get_global_setting(&self, key: &str) -> Option<String> {
        self.settings.get(key).cloned()
    }
}
