use crate::report::{RunSummary, TrialEvent};
use crate::trial::run_trial;
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use ipobf_core::{split_octets, ObfError, ObfuscationSpec, SpecRegistry};
use ipobf_oracle::Oracle;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

/// Iteration slots shared by all workers of one run.
struct TrialBudget {
    remaining: AtomicUsize,
    /// Set once the oracle is known to be broken; no further slots are handed out.
    aborted: AtomicBool,
}

impl TrialBudget {
    fn new(iterations: usize) -> Self {
        Self {
            remaining: AtomicUsize::new(iterations),
            aborted: AtomicBool::new(false),
        }
    }

    /// Takes one slot. Returns `false` when the budget is spent or the run aborted.
    fn take(&self) -> bool {
        loop {
            if self.is_aborted() {
                return false;
            }
            let current = self.remaining.load(Ordering::Acquire);
            if current == 0 {
                return false;
            }
            if self
                .remaining
                .compare_exchange(current, current - 1, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return true;
            }
        }
    }

    fn abort(&self) {
        self.aborted.store(true, Ordering::Release);
    }

    fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::Acquire)
    }
}

struct WorkerContext<O> {
    oracle: Arc<O>,
    input: String,
    octets: Vec<String>,
    registry: Arc<SpecRegistry>,
    budget: TrialBudget,
    max_jitter: Duration,
}

/// Randomized search over the encoding space.
///
/// A pool of `workers` tasks drains a budget of `iterations` slots. Every
/// slot draws a fresh spec; specs already in the run's registry are skipped
/// without retry, so a run prints at most `iterations` results. A spec the
/// input cannot be encoded with is skipped the same way; only an oracle that
/// cannot run ends the search early.
pub struct RandomizedRun<O> {
    oracle: Arc<O>,
    input: String,
    octets: Vec<String>,
    iterations: usize,
    workers: usize,
    max_jitter: Duration,
    registry: Arc<SpecRegistry>,
}

impl<O: Oracle> RandomizedRun<O> {
    pub const DEFAULT_ITERATIONS: usize = 100;

    pub fn new(oracle: O, input: &str) -> Result<Self, ObfError> {
        Ok(Self {
            oracle: Arc::new(oracle),
            input: input.to_string(),
            octets: split_octets(input)?,
            iterations: Self::DEFAULT_ITERATIONS,
            workers: 1,
            max_jitter: Duration::from_secs(1),
            registry: Arc::new(SpecRegistry::new()),
        })
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_max_jitter(mut self, max_jitter: Duration) -> Self {
        self.max_jitter = max_jitter;
        self
    }

    /// Registry of specs tried so far. Lives as long as the run.
    pub fn registry(&self) -> Arc<SpecRegistry> {
        self.registry.clone()
    }

    /// Drives the run to completion, streaming each finished trial to `events`.
    ///
    /// The first fatal oracle error stops the hand-out of new slots and is
    /// returned once every worker has wound down.
    pub async fn run(
        self,
        events: mpsc::UnboundedSender<TrialEvent>,
    ) -> Result<RunSummary, ObfError> {
        let workers = self.workers.min(self.iterations).max(1);
        tracing::info!(
            "Randomized run for {}: {} iterations on {} workers",
            self.input,
            self.iterations,
            workers
        );

        let ctx = Arc::new(WorkerContext {
            oracle: self.oracle,
            input: self.input,
            octets: self.octets,
            registry: self.registry,
            budget: TrialBudget::new(self.iterations),
            max_jitter: self.max_jitter,
        });

        let mut pool = JoinSet::new();
        for worker_id in 0..workers {
            pool.spawn(worker(worker_id, ctx.clone(), events.clone()));
        }
        drop(events);

        let mut summary = RunSummary::default();
        let mut failure = None;
        while let Some(joined) = pool.join_next().await {
            match joined {
                Ok(Ok(partial)) => summary.merge(&partial),
                Ok(Err(e)) => {
                    failure.get_or_insert(e);
                }
                Err(e) => {
                    ctx.budget.abort();
                    failure.get_or_insert(ObfError::Worker(e.to_string()));
                }
            }
        }

        if let Some(e) = failure {
            return Err(e);
        }

        tracing::info!(
            "Run complete: {} success, {} fail, {} duplicate, {} skipped",
            summary.successes,
            summary.failures,
            summary.duplicates,
            summary.skipped
        );
        Ok(summary)
    }
}

async fn worker<O: Oracle>(
    worker_id: usize,
    ctx: Arc<WorkerContext<O>>,
    events: mpsc::UnboundedSender<TrialEvent>,
) -> Result<RunSummary, ObfError> {
    let mut summary = RunSummary::default();

    while ctx.budget.take() {
        // ThreadRng is not Send; it must be gone before the first await.
        let (delay, spec) = {
            let mut rng = rand::thread_rng();
            (jitter(&mut rng, ctx.max_jitter), ObfuscationSpec::random(&mut rng))
        };
        tokio::time::sleep(delay).await;

        let event = if ctx.registry.claim(spec) {
            match run_trial(ctx.oracle.as_ref(), &ctx.input, &ctx.octets, spec).await {
                Ok(result) => TrialEvent::Completed(result),
                Err(e) if e.is_fatal() => {
                    tracing::error!("Worker {}: oracle failure, aborting run: {}", worker_id, e);
                    ctx.budget.abort();
                    return Err(e);
                }
                // Only this spec is unusable for the input, e.g. a first-ordered
                // dword over more than four octets.
                Err(e) => {
                    tracing::warn!("Worker {}: skipping {}: {}", worker_id, spec, e);
                    TrialEvent::Skipped {
                        spec,
                        reason: e.to_string(),
                    }
                }
            }
        } else {
            tracing::warn!("[DUPLICATE] - Spec already used ({}). Skipping...", spec);
            TrialEvent::Duplicate(spec)
        };

        summary.observe(&event);
        // The receiver going away only silences output.
        let _ = events.send(event);
    }

    Ok(summary)
}

/// Random start delay in `[0, max)` so workers do not draw in lockstep.
fn jitter<R: Rng>(rng: &mut R, max: Duration) -> Duration {
    let max_micros = u64::try_from(max.as_micros()).unwrap_or(u64::MAX);
    if max_micros == 0 {
        return Duration::ZERO;
    }
    Duration::from_micros(rng.gen_range(0..max_micros))
}
