use crate::extract::extract_ipv4;
use crate::host::HostOs;
use crate::Oracle;
use ipobf_core::{ObfError, ObfuscatorConfig};
use std::process::Stdio;
use tokio::process::Command;

/// Oracle backed by an external curl-compatible client.
///
/// The client is pointed at `https://<candidate>` with a short connect
/// timeout. Whatever it prints (usually a connection error naming the
/// resolved address) is scraped for an IPv4 literal.
#[derive(Debug, Clone)]
pub struct CurlOracle {
    client: String,
    connect_timeout_secs: u64,
}

impl CurlOracle {
    pub fn new(client: impl Into<String>, connect_timeout_secs: u64) -> Self {
        Self {
            client: client.into(),
            connect_timeout_secs,
        }
    }

    pub fn from_config(config: &ObfuscatorConfig) -> Self {
        let client = config
            .client
            .clone()
            .unwrap_or_else(|| HostOs::detect().default_client().to_string());
        Self::new(client, config.connect_timeout_secs)
    }

    pub fn client(&self) -> &str {
        &self.client
    }

    /// Arguments passed to the client for one candidate.
    pub fn args(&self, candidate: &str) -> Vec<String> {
        vec![
            "--connect-timeout".to_string(),
            self.connect_timeout_secs.to_string(),
            format!("https://{}", candidate),
        ]
    }
}

impl Oracle for CurlOracle {
    async fn probe(&self, candidate: &str) -> Result<Option<String>, ObfError> {
        tracing::debug!("Probing https://{} via {}", candidate, self.client);

        let output = Command::new(&self.client)
            .args(self.args(candidate))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ObfError::OracleLaunch {
                client: self.client.clone(),
                source,
            })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push('\n');
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        let interpreted = extract_ipv4(&combined);
        if interpreted.is_none() {
            tracing::debug!(
                "Oracle gave no address for {} (exit status: {})",
                candidate,
                output.status
            );
        }
        Ok(interpreted)
    }
}
