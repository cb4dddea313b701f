use crate::error::ObfError;
use serde::Deserialize;
use std::path::Path;

/// Run-wide knobs that can come from a TOML file. Command-line flags take
/// precedence over anything set here.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ObfuscatorConfig {
    /// HTTP client binary. `None` selects the host default.
    pub client: Option<String>,
    pub connect_timeout_secs: u64,
    /// Upper bound of the random start delay of each randomized trial.
    pub max_jitter_ms: u64,
    pub threads: usize,
}

impl ObfuscatorConfig {
    pub const MAX_THREADS: usize = 100;

    pub fn from_toml_str(raw: &str) -> Result<Self, ObfError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ObfError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ObfError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ObfError> {
        if !(1..=Self::MAX_THREADS).contains(&self.threads) {
            return Err(ObfError::Config(format!(
                "threads must be within 1..={}, got {}",
                Self::MAX_THREADS,
                self.threads
            )));
        }
        if self.connect_timeout_secs == 0 {
            return Err(ObfError::Config("connect_timeout_secs must be positive".into()));
        }
        if matches!(self.client.as_deref(), Some("")) {
            return Err(ObfError::Config("client must not be empty".into()));
        }
        Ok(())
    }

    /// Detected CPU count, clamped into the accepted thread range.
    pub fn default_threads() -> usize {
        num_cpus::get().clamp(1, Self::MAX_THREADS)
    }
}

impl Default for ObfuscatorConfig {
    fn default() -> Self {
        Self {
            client: None,
            connect_timeout_secs: 1,
            max_jitter_ms: 1000,
            threads: Self::default_threads(),
        }
    }
}
