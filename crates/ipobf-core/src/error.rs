use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObfError {
    #[error("invalid obfuscation method: {0}")]
    InvalidMethod(String),
    #[error("invalid octet: {0:?}")]
    InvalidOctet(String),
    #[error("mixed switch index {0} outside 1..=4")]
    InvalidSwitch(u8),
    #[error("dword value out of range")]
    DwordOutOfRange,
    /// The HTTP client could not be started. Fatal for the whole run.
    #[error("failed to launch oracle client `{client}`: {source}")]
    OracleLaunch {
        client: String,
        #[source]
        source: std::io::Error,
    },
    #[error("configuration error: {0}")]
    Config(String),
    #[error("trial worker failed: {0}")]
    Worker(String),
}

impl ObfError {
    /// Whether the error means no further trial can succeed.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ObfError::OracleLaunch { .. })
    }
}

impl From<toml::de::Error> for ObfError {
    fn from(e: toml::de::Error) -> Self {
        ObfError::Config(e.to_string())
    }
}
