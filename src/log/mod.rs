pub mod kv_console_encoder;

use std::{path::Path, sync::OnceLock};

use anyhow::{Context, Result, bail};
use log::{debug, info};
use log4rs::{
    Config,
    config::{Deserializers, RawConfig},
};

use crate::log::kv_console_encoder::KvConsoleEncoderDeserializer;

const EXTERNAL_CONFIG: &str = "log4rs.yml";

/// Headers whose values never appear in logs unless `REVEAL_PII` is set.
const SENSITIVE_HEADERS: &[&str] = &["authorization", "proxy-authorization", "cookie", "set-cookie", "x-api-key"];

/// Installs the global logger.
///
/// A `log4rs.yml` in the working directory wins; otherwise the embedded
/// defaults are used. A broken external file is an error rather than a
/// silent fallback.
pub fn init_logging() -> Result<()> {
    let mut deserializers = Deserializers::default();
    deserializers.insert("kv_console", KvConsoleEncoderDeserializer);

    let path = Path::new(EXTERNAL_CONFIG);
    if path.exists() {
        log4rs::init_file(path, deserializers)
            .with_context(|| format!("Failed to load external logging configuration {EXTERNAL_CONFIG}"))?;
        info!(path = EXTERNAL_CONFIG; "Logging initialized from external configuration");
        return Ok(());
    }

    let config = embedded_config(&deserializers)?;
    log4rs::init_config(config).context("Logger already installed")?;
    debug!("Logging initialized from embedded defaults");
    Ok(())
}

fn embedded_config(deserializers: &Deserializers) -> Result<Config> {
    let raw: RawConfig = serde_yaml::from_str(include_str!("../../resources/default_log4rs.yml"))
        .context("Embedded logging configuration is not valid YAML")?;

    let (appenders, errors) = raw.appenders_lossy(deserializers);
    if !errors.is_empty() {
        bail!("Embedded logging appenders are invalid: {errors:?}");
    }

    Config::builder()
        .appenders(appenders)
        .loggers(raw.loggers())
        .build(raw.root())
        .context("Embedded logging configuration is inconsistent")
}

fn reveal_pii() -> bool {
    static REVEAL_PII_CACHE: OnceLock<bool> = OnceLock::new();

    *REVEAL_PII_CACHE.get_or_init(|| {
        std::env::var("REVEAL_PII")
            .map(|v| {
                let val = v.to_lowercase();
                val == "true" || val == "1"
            })
            .unwrap_or(false)
    })
}

/// Returns the header value to log: credentials are replaced by a
/// placeholder unless `REVEAL_PII` is true.
pub fn mask_header(name: &str, value: &str) -> String {
    mask_header_with(reveal_pii(), name, value)
}

fn mask_header_with(reveal: bool, name: &str, value: &str) -> String {
    if reveal || !is_sensitive_header(name) {
        return value.to_string();
    }

    "<REDACTED>".to_string()
}

fn is_sensitive_header(name: &str) -> bool {
    SENSITIVE_HEADERS.iter().any(|h| h.eq_ignore_ascii_case(name))
}
