mod loader;

pub use loader::{get_default_config, load_configuration, write_config_to};

use serde::{Deserialize, Serialize};

use crate::cli::ConnectionArgs;

/// Settings for the HTTP session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://httpbin.org".to_string(),
            timeout_secs: 30,
            user_agent: crate::http::default_user_agent(),
        }
    }
}

/// Command line flags take precedence over the file and the environment.
pub trait ApplyArgs {
    fn apply_connection(&mut self, args: &ConnectionArgs);
}

impl ApplyArgs for ClientConfig {
    fn apply_connection(&mut self, args: &ConnectionArgs) {
        if let Some(base_url) = &args.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(timeout_secs) = args.timeout_secs {
            self.timeout_secs = timeout_secs;
        }
    }
}
