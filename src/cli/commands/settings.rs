//! Configuration command.

use std::path::Path;

use crate::config::{self, Config, ConfigError};
use crate::error::{self, ResultExt};

/// Print the effective configuration; with `save`, write it to `path`
/// (or the default config location)
pub fn cmd_config(config: &Config, save: bool, path: Option<&Path>) -> error::Result<()> {
    let rendered = toml::to_string_pretty(config)
        .map_err(ConfigError::Serialize)
        .with_context("Failed to render configuration")?;
    print!("{}", rendered);

    if save {
        let saved = match path {
            Some(path) => config::save_to(path, config),
            None => config::save(config),
        };
        saved.with_context("Failed to save configuration")?;
        println!("✓ Configuration saved");
    }
    Ok(())
}
