pub mod randomized;
pub mod report;
pub mod singleton;
pub mod trial;

pub use randomized::RandomizedRun;
pub use report::{print_results, RunSummary, TrialEvent};
pub use singleton::run_singleton;
pub use trial::{run_trial, TrialResult};
