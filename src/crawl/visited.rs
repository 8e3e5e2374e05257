// src/crawl/visited.rs
// =============================================================================
// The set of URLs the crawl has already queued.
//
// A URL is marked when it is *queued*, not when its fetch finishes. Otherwise
// two workers could both discover a page whose fetch is still in flight and
// queue it twice.
//
// The set is also capped at the crawl budget: once `budget` URLs have been
// marked, nothing new gets in. Every marked URL turns into at most one frontier
// entry, so the frontier can never hold more than `budget` entries.
//
// Rust concepts:
// - Mutex<HashSet>: shared mutable state guarded by a lock
// - The test-and-insert happens while holding the lock, in one method
// =============================================================================

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

pub struct VisitedSet {
    seen: Mutex<HashSet<String>>,
    budget: usize,
}

impl VisitedSet {
    pub fn new(budget: usize) -> Self {
        Self {
            seen: Mutex::new(HashSet::new()),
            budget,
        }
    }

    /// Records `address` and returns true if it was unseen and the budget
    /// still has room. Returns false otherwise.
    pub fn try_mark(&self, address: &str) -> bool {
        let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);

        if seen.len() >= self.budget || seen.contains(address) {
            return false;
        }

        seen.insert(address.to_string())
    }

    pub fn len(&self) -> usize {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
