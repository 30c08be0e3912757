//! profilectl configuration
//!
//! Read from `~/.config/profilectl/config.toml` unless another file is given
//! with `--config` or `PROFILECTL_CONFIG`. Every field is optional; a missing
//! default file means all defaults. A few settings can be overridden from
//! the environment:
//!
//! - `AWS_REGION` - service region
//! - `PROFILECTL_ENDPOINT` - full endpoint URL, wins over the region
//! - `AWS_BEARER_TOKEN_BEDROCK` - bearer token for requests (never stored)

use anyhow::{Context, Result, bail};
use reconciler::HandlerConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming the config file
pub const ENV_CONFIG: &str = "PROFILECTL_CONFIG";

/// Environment variable overriding the region
pub const ENV_REGION: &str = "AWS_REGION";

/// Environment variable overriding the endpoint
pub const ENV_ENDPOINT: &str = "PROFILECTL_ENDPOINT";

/// Environment variable carrying the bearer token
pub const ENV_BEARER_TOKEN: &str = "AWS_BEARER_TOKEN_BEDROCK";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub region: String,
    /// Explicit endpoint; derived from the region when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    pub timeout_secs: u64,
    pub handler: HandlerConfig,
    pub orchestrator: OrchestratorConfig,
    #[serde(skip)]
    pub bearer_token: Option<String>,
}

/// Settings for the `--wait` loop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Invocations before `--wait` gives up on a chain
    pub max_attempts: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            endpoint: None,
            timeout_secs: 30,
            handler: HandlerConfig::default(),
            orchestrator: OrchestratorConfig::default(),
            bearer_token: None,
        }
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self { max_attempts: 60 }
    }
}

/// Default config file location
pub fn default_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("profilectl").join("config.toml"))
}

impl Config {
    /// Load the config and apply environment overrides.
    ///
    /// An explicit `path` must exist; the default location may be absent.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(&expand_path(path))?,
            None => {
                let path = default_path()?;
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    log::debug!("No config at {}, using defaults", path.display());
                    Self::default()
                }
            }
        };

        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read config file: {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply overrides from `lookup`. Empty values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(region) = get(ENV_REGION) {
            log::debug!("Using region from {ENV_REGION}: {region}");
            self.region = region;
        }
        if let Some(endpoint) = get(ENV_ENDPOINT) {
            log::debug!("Using endpoint from {ENV_ENDPOINT}: {endpoint}");
            self.endpoint = Some(endpoint);
        }
        if let Some(token) = get(ENV_BEARER_TOKEN) {
            self.bearer_token = Some(token);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.region.trim().is_empty() {
            bail!("region must not be empty");
        }
        if self.timeout_secs == 0 {
            bail!("timeout_secs must be greater than zero");
        }
        if self.orchestrator.max_attempts == 0 {
            bail!("orchestrator.max_attempts must be greater than zero");
        }
        Ok(())
    }

    /// Service endpoint, derived from the region unless set explicitly
    pub fn endpoint(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| format!("https://bedrock.{}.amazonaws.com", self.region))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

/// Expand `~` in a user-supplied path
fn expand_path(path: &Path) -> PathBuf {
    let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
    PathBuf::from(expanded)
}
