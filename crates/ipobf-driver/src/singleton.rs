use crate::trial::{run_trial, TrialResult};
use ipobf_core::{split_octets, ObfError, ObfuscationSpec};
use ipobf_oracle::Oracle;

/// Runs exactly one trial for a spec fixed up front.
pub async fn run_singleton<O: Oracle>(
    oracle: &O,
    input: &str,
    spec: ObfuscationSpec,
) -> Result<TrialResult, ObfError> {
    let octets = split_octets(input)?;
    tracing::info!("Single trial for {} ({})", input, spec);
    run_trial(oracle, input, &octets, spec).await
}
