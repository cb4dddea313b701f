use crate::trial::TrialResult;
use ipobf_core::ObfuscationSpec;
use std::fmt;
use tokio::sync::mpsc;

/// Emitted by randomized workers as trials finish.
#[derive(Debug, Clone)]
pub enum TrialEvent {
    Completed(TrialResult),
    /// The drawn spec had already been tried; the slot was skipped.
    Duplicate(ObfuscationSpec),
    /// The spec could not be applied to the input address.
    Skipped {
        spec: ObfuscationSpec,
        reason: String,
    },
}

impl fmt::Display for TrialResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} - Input Address: {}", self.tag(), self.input)?;
        writeln!(f, "\tSpec:: {}", self.spec)?;
        write!(
            f,
            "\t\t Obfuscated IP address: {} -> Interpreted As: {}",
            self.obfuscated,
            self.interpreted.as_deref().unwrap_or("None"),
        )
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub successes: usize,
    pub failures: usize,
    pub duplicates: usize,
    pub skipped: usize,
}

impl RunSummary {
    pub fn observe(&mut self, event: &TrialEvent) {
        match event {
            TrialEvent::Completed(result) if result.success => self.successes += 1,
            TrialEvent::Completed(_) => self.failures += 1,
            TrialEvent::Duplicate(_) => self.duplicates += 1,
            TrialEvent::Skipped { .. } => self.skipped += 1,
        }
    }

    pub fn merge(&mut self, other: &RunSummary) {
        self.successes += other.successes;
        self.failures += other.failures;
        self.duplicates += other.duplicates;
        self.skipped += other.skipped;
    }

    /// Trials that actually reached the oracle.
    pub fn attempted(&self) -> usize {
        self.successes + self.failures
    }
}

/// Prints completed trials to stdout until every sender is gone.
/// Returns how many results were printed.
pub async fn print_results(mut events: mpsc::UnboundedReceiver<TrialEvent>) -> usize {
    let mut printed = 0;
    while let Some(event) = events.recv().await {
        if let TrialEvent::Completed(result) = event {
            println!("{}", result);
            printed += 1;
        }
    }
    printed
}
