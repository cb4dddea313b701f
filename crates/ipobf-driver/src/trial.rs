use ipobf_core::{ObfError, ObfuscationSpec};
use ipobf_oracle::Oracle;

/// Outcome of probing one obfuscated address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialResult {
    pub input: String,
    pub spec: ObfuscationSpec,
    pub obfuscated: String,
    /// Address the oracle reported back, if it named one.
    pub interpreted: Option<String>,
    pub success: bool,
}

impl TrialResult {
    pub fn tag(&self) -> &'static str {
        if self.success {
            "[SUCCESS]"
        } else {
            "[FAIL]"
        }
    }
}

/// Obfuscates `octets` per `spec`, asks the oracle how it reads the result
/// and compares that verbatim with `input`.
pub async fn run_trial<O: Oracle>(
    oracle: &O,
    input: &str,
    octets: &[String],
    spec: ObfuscationSpec,
) -> Result<TrialResult, ObfError> {
    let obfuscated = spec.obfuscate(octets)?;
    tracing::debug!("Trial {} -> {}", spec, obfuscated);

    let interpreted = oracle.probe(&obfuscated).await?;
    // Byte-for-byte: "010.0.0.1" reported back for "10.0.0.1" is a failure.
    let success = interpreted.as_deref() == Some(input);

    Ok(TrialResult {
        input: input.to_string(),
        spec,
        obfuscated,
        interpreted,
        success,
    })
}
