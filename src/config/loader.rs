use std::{fs, fs::File, io::Write, path::Path};

use anyhow::{Context, Result};
use config::{Config, Environment};
use log::{debug, info};

use super::ClientConfig;

/// Prefix for environment overrides, e.g. `ECHOFETCH_BASE_URL`.
const ENV_PREFIX: &str = "ECHOFETCH";

pub fn get_default_config() -> &'static str {
    include_str!("../../resources/config.toml")
}

/// Loads the client configuration from `path`, writing the embedded default
/// there first if the file does not exist. Environment variables prefixed
/// with `ECHOFETCH_` take precedence over the file.
pub fn load_configuration(path: &Path) -> Result<ClientConfig> {
    if !path.exists() {
        write_config_to(path, get_default_config()).context("Could not create default config")?;
        info!(path:% = path.display(); "Created new configuration file");
    }

    let filename = path.to_str().context("Invalid config file path")?;

    let cfg = Config::builder()
        .add_source(config::File::with_name(filename))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Could not build config")?;

    let client_config: ClientConfig = cfg.try_deserialize().context("Could not parse client configuration")?;
    debug!(
        base_url = &*client_config.base_url,
        timeout_secs = client_config.timeout_secs;
        "Configuration loaded"
    );
    Ok(client_config)
}

pub fn write_config_to(path: &Path, source: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create parent directories")?;
    };

    let mut file = File::create(path).context("Failed to create config file")?;
    file.write_all(source.as_bytes())
        .context("Failed to write config content")?;
    file.write_all(b"\n").context("Failed to write newline")?;
    Ok(())
}
