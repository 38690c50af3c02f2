//! Exception deduplication and frequency-ranking registry.
//!
//! This module is the crate's core: reported throwables are decomposed
//! into stack frames, folded into a shared trie, and counted per distinct
//! trace. Ranking queries ("what are the most frequent traces") scan the
//! flat leaf list; no tree walk is needed.
//!
//! All public operations, reads and writes alike, serialize on a single
//! coarse lock. Exceptions are rare relative to normal execution, so
//! plain mutual exclusion is cheap and avoids any iterator-invalidation
//! questions between trie growth and leaf scans.

pub mod clock;
pub mod frame;
pub mod stack_trace;
mod trie;

// Re-export main types
pub use clock::{Clock, ManualClock, SystemClock};
pub use frame::{CapturedException, StackFrame, Throwable};
pub use stack_trace::StackTrace;

use log::debug;
use stack_trace::{compare_frame_chains, LeafData};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use trie::FrameArena;

/// Everything guarded by the registry lock
#[derive(Debug)]
struct RegistryState {
    arena: FrameArena,
    /// One entry per distinct trace, in first-seen order
    leaves: Vec<Arc<LeafData>>,
    /// Total registrations; always equals the sum of all leaf counts
    total_registrations: u64,
}

impl RegistryState {
    fn new() -> Self {
        Self {
            arena: FrameArena::new(),
            leaves: Vec::new(),
            total_registrations: 0,
        }
    }
}

/// Process-wide exception registry.
///
/// **Public** - the facade everything else talks to
///
/// Create one at process start and clone it wherever exceptions are
/// observed; clones share the same underlying state. There is no implicit
/// global instance, so tests can construct independent registries.
#[derive(Clone)]
pub struct ExceptionRegistry {
    state: Arc<Mutex<RegistryState>>,
    clock: Arc<dyn Clock>,
}

impl Default for ExceptionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ExceptionRegistry {
    /// Registry on wall-clock time
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Registry with an injected clock, for deterministic tests
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Arc::new(Mutex::new(RegistryState::new())),
            clock,
        }
    }

    /// Take the coarse lock, recovering the guard if a panicking thread
    /// poisoned it (the state is never left half-updated)
    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register one observed throwable.
    ///
    /// Walks or extends the trie with the throwable's frames (outermost
    /// first) and bumps the counter of the leaf at the end of the path,
    /// creating the leaf on first sight. Returns the live handle for the
    /// distinct trace, new or existing.
    pub fn register(&self, throwable: &dyn Throwable) -> StackTrace {
        let now_ms = self.clock.now_ms();
        let mut state = self.lock();
        state.total_registrations += 1;

        let node = state
            .arena
            .insert_path(throwable.frames(), throwable.class_name());

        let data = match state.arena.leaf_slot(node, throwable.class_name()) {
            Some(slot) => {
                let data = Arc::clone(&state.leaves[slot]);
                data.increment();
                data
            }
            None => {
                let frames = state.arena.path_frames(node);
                let data = Arc::new(LeafData::new(throwable.class_name(), frames, now_ms));
                let slot = state.leaves.len();
                state.arena.set_leaf_slot(node, throwable.class_name(), slot);
                state.leaves.push(Arc::clone(&data));
                debug!(
                    "new distinct trace for {} ({} nodes, {} distinct traces)",
                    throwable.class_name(),
                    state.arena.node_count(),
                    state.leaves.len()
                );
                data
            }
        };

        StackTrace::new(data)
    }

    /// Total number of registrations since creation or the last `clear`
    pub fn count(&self) -> u64 {
        self.lock().total_registrations
    }

    /// Handle with the maximum count, or `None` when empty.
    ///
    /// Ties between equally frequent traces are resolved arbitrarily.
    pub fn most_frequent(&self) -> Option<StackTrace> {
        let state = self.lock();
        state
            .leaves
            .iter()
            .max_by_key(|leaf| leaf.count())
            .map(|leaf| StackTrace::new(Arc::clone(leaf)))
    }

    /// All distinct traces, most frequent first
    pub fn stack_traces(&self) -> Vec<StackTrace> {
        self.stack_traces_with_threshold(0)
    }

    /// Distinct traces seen at least `threshold` times, most frequent
    /// first; equal counts are ordered by a structural comparison of the
    /// frame chains, so the result is deterministic.
    pub fn stack_traces_with_threshold(&self, threshold: u64) -> Vec<StackTrace> {
        let state = self.lock();
        let mut traces: Vec<StackTrace> = state
            .leaves
            .iter()
            .filter(|leaf| leaf.count() >= threshold)
            .map(|leaf| StackTrace::new(Arc::clone(leaf)))
            .collect();
        drop(state);

        traces.sort_by(|a, b| {
            b.count()
                .cmp(&a.count())
                .then_with(|| compare_frame_chains(a.frames(), b.frames()))
        });
        traces
    }

    /// Look up a distinct trace by its MD5 hex fingerprint
    /// (case-insensitive). Linear scan; the leaf list stays small.
    pub fn find(&self, md5_hex: &str) -> Option<StackTrace> {
        let state = self.lock();
        state
            .leaves
            .iter()
            .find(|leaf| leaf.md5_string().eq_ignore_ascii_case(md5_hex))
            .map(|leaf| StackTrace::new(Arc::clone(leaf)))
    }

    /// Drop the whole trie and leaf list and reset the counter.
    ///
    /// Intended for test isolation and explicit operator resets. Handles
    /// returned before the clear stay readable but are no longer reachable
    /// through the registry; re-registering their trace starts a fresh
    /// leaf.
    pub fn clear(&self) {
        let mut state = self.lock();
        let dropped = state.leaves.len();
        *state = RegistryState::new();
        debug!("registry cleared ({} distinct traces dropped)", dropped);
    }
}
