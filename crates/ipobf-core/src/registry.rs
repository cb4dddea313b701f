use crate::spec::ObfuscationSpec;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

/// The SpecRegistry remembers every spec tried during one randomized run.
///
/// One instance is created per run and handed to each worker behind an
/// `Arc`. Specs are only ever added.
#[derive(Debug, Default)]
pub struct SpecRegistry {
    specs: Mutex<HashSet<ObfuscationSpec>>,
}

impl SpecRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seen(&self, spec: &ObfuscationSpec) -> bool {
        self.lock().contains(spec)
    }

    pub fn record(&self, spec: ObfuscationSpec) {
        self.lock().insert(spec);
    }

    /// Records `spec` and reports whether it was new.
    ///
    /// Check and insert happen under one lock, so two workers drawing the
    /// same spec cannot both claim it.
    pub fn claim(&self, spec: ObfuscationSpec) -> bool {
        self.lock().insert(spec)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A worker that panicked mid-insert leaves the set itself intact.
    fn lock(&self) -> MutexGuard<'_, HashSet<ObfuscationSpec>> {
        self.specs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
