//! # Driver Layer Tests: trials, singleton mode, randomized worker pool
//!
//! Uses in-process oracles so the search logic can be checked without an
//! HTTP client on the machine.

use ipobf_core::{Encoding, ObfError, ObfuscationSpec, Strategy};
use ipobf_driver::{run_singleton, run_trial, RandomizedRun, RunSummary, TrialEvent, TrialResult};
use ipobf_oracle::Oracle;
use std::collections::HashSet;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Always reads the candidate as `address`.
struct EchoOracle {
    address: String,
}

impl Oracle for EchoOracle {
    async fn probe(&self, _candidate: &str) -> Result<Option<String>, ObfError> {
        Ok(Some(self.address.clone()))
    }
}

/// Never names an address.
struct SilentOracle;

impl Oracle for SilentOracle {
    async fn probe(&self, _candidate: &str) -> Result<Option<String>, ObfError> {
        Ok(None)
    }
}

/// Behaves like a missing client binary.
struct BrokenOracle;

impl Oracle for BrokenOracle {
    async fn probe(&self, _candidate: &str) -> Result<Option<String>, ObfError> {
        Err(ObfError::OracleLaunch {
            client: "curl".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        })
    }
}

/// Remembers every candidate it was asked about.
#[derive(Default)]
struct RecordingOracle {
    candidates: Mutex<Vec<String>>,
}

impl Oracle for RecordingOracle {
    async fn probe(&self, candidate: &str) -> Result<Option<String>, ObfError> {
        self.candidates.lock().unwrap().push(candidate.to_string());
        Ok(None)
    }
}

fn drain(mut rx: mpsc::UnboundedReceiver<TrialEvent>) -> Vec<TrialEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn mixed(first: Encoding, last: Encoding, switch: u8) -> ObfuscationSpec {
    ObfuscationSpec::new(Strategy::mixed(first, last, switch).unwrap(), false)
}

fn completed(events: &[TrialEvent]) -> Vec<&TrialResult> {
    events
        .iter()
        .filter_map(|e| match e {
            TrialEvent::Completed(result) => Some(result),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_trial_success_is_verbatim_match() {
    let octets: Vec<String> = ["192", "168", "1", "1"].iter().map(|s| s.to_string()).collect();
    let spec = ObfuscationSpec::new(Strategy::Single(Encoding::Dword), false);

    let oracle = EchoOracle { address: "192.168.1.1".into() };
    let result = run_trial(&oracle, "192.168.1.1", &octets, spec).await.unwrap();
    assert!(result.success);
    assert_eq!(result.obfuscated, "3232235777");
    assert_eq!(result.tag(), "[SUCCESS]");

    // Same address numerically, different text.
    let oracle = EchoOracle { address: "192.168.001.001".into() };
    let result = run_trial(&oracle, "192.168.1.1", &octets, spec).await.unwrap();
    assert!(!result.success);
    assert_eq!(result.tag(), "[FAIL]");
}

#[tokio::test]
async fn test_singleton_applies_dotless() {
    let oracle = RecordingOracle::default();
    let spec = ObfuscationSpec::new(Strategy::Single(Encoding::Hex), true);

    let result = run_singleton(&oracle, "10.0.0.1", spec).await.unwrap();

    assert_eq!(result.obfuscated, "0xa%2E0x0%2E0x0%2E0x1");
    assert_eq!(*oracle.candidates.lock().unwrap(), vec!["0xa%2E0x0%2E0x0%2E0x1".to_string()]);
    assert_eq!(result.interpreted, None);
    assert!(!result.success);
}

#[tokio::test]
async fn test_singleton_mixed() {
    let oracle = EchoOracle { address: "1.2.3.4".into() };
    let spec = mixed(Encoding::Hex, Encoding::Dword, 3);

    let result = run_singleton(&oracle, "1.2.3.4", spec).await.unwrap();
    assert_eq!(result.obfuscated, "0x1.0x2.0x3.4");
    assert!(result.success);
}

#[tokio::test]
async fn test_singleton_rejects_malformed_input() {
    let spec = ObfuscationSpec::new(Strategy::Single(Encoding::Hex), false);
    assert!(matches!(
        run_singleton(&SilentOracle, "10.0.zero.1", spec).await,
        Err(ObfError::InvalidOctet(_))
    ));
}

#[test]
fn test_result_rendering() {
    let result = TrialResult {
        input: "192.168.1.1".into(),
        spec: mixed(Encoding::Hex, Encoding::Dword, 3),
        obfuscated: "0xc0.0xa8.0x1.1".into(),
        interpreted: Some("192.168.1.1".into()),
        success: true,
    };
    assert_eq!(
        result.to_string(),
        concat!(
            "[SUCCESS] - Input Address: 192.168.1.1\n",
            "\tSpec:: Method: mixed, First: hex, Last: dword, Switch: 3, Dotless: false\n",
            "\t\t Obfuscated IP address: 0xc0.0xa8.0x1.1 -> Interpreted As: 192.168.1.1",
        )
    );

    let inconclusive = TrialResult {
        interpreted: None,
        success: false,
        ..result
    };
    assert!(inconclusive.to_string().starts_with("[FAIL] - Input Address: 192.168.1.1"));
    assert!(inconclusive.to_string().ends_with("-> Interpreted As: None"));
}

/// N iterations against an echoing oracle: at most N results, every one a
/// success, and each wasted slot accounted for as a duplicate.
#[tokio::test]
async fn test_randomized_run_with_echo_oracle() {
    let t = Instant::now();

    let oracle = EchoOracle {
        address: "192.168.1.1".into(),
    };
    let run = RandomizedRun::new(oracle, "192.168.1.1")
        .unwrap()
        .with_iterations(40)
        .with_workers(4)
        .with_max_jitter(Duration::ZERO);
    let registry = run.registry();

    let (tx, rx) = mpsc::unbounded_channel();
    let summary = run.run(tx).await.unwrap();
    let events = drain(rx);
    let results = completed(&events);

    assert!(results.len() <= 40);
    assert_eq!(results.len(), summary.successes);
    assert!(results.iter().all(|r| r.success && r.tag() == "[SUCCESS]"));
    assert_eq!(summary.failures, 0);
    assert_eq!(summary.successes + summary.duplicates, 40);
    assert_eq!(events.len(), 40);
    assert_eq!(registry.len(), summary.attempted());

    let overhead = t.elapsed();
    println!("test_randomized_run_with_echo_oracle: Testing Overhead = {:?}", overhead);
}

/// No spec reaches the oracle twice within one run.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_randomized_run_never_repeats_a_spec() {
    let run = RandomizedRun::new(SilentOracle, "10.0.0.1")
        .unwrap()
        .with_iterations(100)
        .with_workers(16)
        .with_max_jitter(Duration::from_millis(2));

    let (tx, rx) = mpsc::unbounded_channel();
    let summary = run.run(tx).await.unwrap();
    let events = drain(rx);
    let results = completed(&events);

    let distinct: HashSet<ObfuscationSpec> = results.iter().map(|r| r.spec).collect();
    assert_eq!(distinct.len(), results.len());
    assert_eq!(summary.failures, results.len());
    assert!(results.iter().all(|r| r.interpreted.is_none()));
    assert_eq!(summary.attempted() + summary.duplicates, 100);
}

#[tokio::test]
async fn test_randomized_run_aborts_on_broken_oracle() {
    let run = RandomizedRun::new(BrokenOracle, "10.0.0.1")
        .unwrap()
        .with_iterations(100)
        .with_workers(2)
        .with_max_jitter(Duration::ZERO);

    let (tx, rx) = mpsc::unbounded_channel();
    let outcome = run.run(tx).await;

    assert!(matches!(outcome, Err(ObfError::OracleLaunch { .. })));
    assert!(completed(&drain(rx)).is_empty());
}

/// Five groups cannot carry a first-ordered dword. Those draws are
/// skipped while every other spec still reaches the oracle.
#[tokio::test]
async fn test_randomized_run_survives_unencodable_specs() {
    let oracle = EchoOracle {
        address: "1.2.3.4.5".into(),
    };
    let run = RandomizedRun::new(oracle, "1.2.3.4.5")
        .unwrap()
        .with_iterations(100)
        .with_workers(1)
        .with_max_jitter(Duration::ZERO);

    let (tx, rx) = mpsc::unbounded_channel();
    let summary = run.run(tx).await.unwrap();
    let events = drain(rx);

    assert_eq!(events.len(), 100);
    assert_eq!(summary.attempted() + summary.duplicates + summary.skipped, 100);
    assert!(summary.successes > 0, "hex and octal specs should still run");
    assert_eq!(summary.failures, 0);

    // Only a plain dword weights all five groups from the first octet.
    assert!((1..=2).contains(&summary.skipped), "skipped {}", summary.skipped);
    for event in &events {
        if let TrialEvent::Skipped { spec, reason } = event {
            assert_eq!(spec.strategy, Strategy::Single(Encoding::Dword));
            assert!(reason.contains("dword"), "unexpected skip reason {:?}", reason);
        }
    }
}

#[test]
fn test_only_launch_failures_are_fatal() {
    let launch = ObfError::OracleLaunch {
        client: "curl".into(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
    };
    assert!(launch.is_fatal());

    assert!(!ObfError::DwordOutOfRange.is_fatal());
    assert!(!ObfError::InvalidOctet("x".into()).is_fatal());
    assert!(!ObfError::InvalidSwitch(5).is_fatal());
    assert!(!ObfError::Worker("panicked".into()).is_fatal());
}

#[test]
fn test_randomized_run_rejects_malformed_input() {
    assert!(matches!(
        RandomizedRun::new(SilentOracle, "localhost"),
        Err(ObfError::InvalidOctet(_))
    ));
}

#[test]
fn test_summary_accounting() {
    let spec = ObfuscationSpec::new(Strategy::Single(Encoding::Octal), false);
    let ok = TrialResult {
        input: "8.8.8.8".into(),
        spec,
        obfuscated: "10.10.10.10".into(),
        interpreted: Some("8.8.8.8".into()),
        success: true,
    };
    let failed = TrialResult {
        success: false,
        ..ok.clone()
    };

    let mut summary = RunSummary::default();
    summary.observe(&TrialEvent::Completed(ok));
    summary.observe(&TrialEvent::Completed(failed));
    summary.observe(&TrialEvent::Duplicate(spec));
    summary.observe(&TrialEvent::Skipped {
        spec,
        reason: "dword value out of range".into(),
    });

    let mut total = RunSummary::default();
    total.merge(&summary);
    total.merge(&summary);

    assert_eq!(summary.attempted(), 2);
    assert_eq!(
        total,
        RunSummary {
            successes: 2,
            failures: 2,
            duplicates: 2,
            skipped: 2,
        }
    );
}
