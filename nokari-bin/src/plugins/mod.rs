pub mod config;
pub mod meta;

use nokari_core::module::PluginEntry;

/// Returns all plugins known to the bot.
pub fn catalog() -> Vec<PluginEntry> {
    vec![
        PluginEntry::new("meta", meta::load, meta::unload),
        PluginEntry::new("config", config::load, config::unload),
    ]
}
