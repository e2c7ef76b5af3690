/*
[INPUT]:  YAML configuration file and command-line overrides
[OUTPUT]: Parsed CLI configuration and the SDK client configuration
[POS]:    Configuration layer - connection setup
[UPDATE]: When adding new configuration options
*/

use std::path::{Path, PathBuf};
use std::time::Duration;

use keymaster_sdk::{ClientConfig, WaitUntilReadyOptions};
use serde::{Deserialize, Serialize};

/// Connection settings for the `keymaster` command
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CliConfig {
    /// Keymaster service base URL
    #[serde(default)]
    pub url: Option<String>,
    /// Whole-request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
    /// Block until the service reports ready before running the command
    #[serde(default)]
    pub wait_until_ready: bool,
    /// Readiness retries before giving up; unset or 0 waits forever
    #[serde(default)]
    pub max_retries: Option<u32>,
    /// Seconds between readiness checks
    #[serde(default)]
    pub wait_interval_secs: Option<u64>,
}

impl CliConfig {
    /// Load configuration from YAML file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// `<config dir>/keymaster/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("keymaster").join("config.yaml"))
    }

    /// Command-line values win over file values
    pub fn with_overrides(
        mut self,
        url: Option<String>,
        timeout_secs: Option<u64>,
        wait_until_ready: bool,
        max_retries: Option<u32>,
    ) -> Self {
        if url.is_some() {
            self.url = url;
        }
        if timeout_secs.is_some() {
            self.timeout_secs = timeout_secs;
        }
        if max_retries.is_some() {
            self.max_retries = max_retries;
        }
        self.wait_until_ready |= wait_until_ready;
        self
    }

    pub fn wait_options(&self) -> WaitUntilReadyOptions {
        let mut options = WaitUntilReadyOptions {
            chatty: true,
            max_retries: self.max_retries.unwrap_or(0),
            ..Default::default()
        };
        if let Some(secs) = self.wait_interval_secs {
            options.interval = Duration::from_secs(secs);
        }
        options
    }

    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::default();
        if let Some(url) = &self.url {
            config.base_url = url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = self.connect_timeout_secs {
            config.connect_timeout = Duration::from_secs(secs);
        }
        config
    }
}
