// src/crawl/frontier.rs
// =============================================================================
// The frontier: URLs waiting to be fetched, shared by every worker.
//
// The hard part isn't the queue, it's knowing when the crawl is *over*.
// "The queue is empty right now" doesn't mean "the queue will stay empty":
// another worker may be halfway through fetching a page that links to ten
// more. So alongside the queue we count leases, i.e. entries that have been
// popped but whose worker hasn't finished with them yet.
//
// - pop() hands out a Lease and bumps the in-flight count
// - dropping the Lease brings the count back down
// - when the queue is empty AND nothing is in flight, no new entry can ever
//   appear, so the frontier closes itself and every waiting worker wakes up
//
// Both numbers live under the same Mutex, so no worker can observe "empty"
// in between another worker's pop and its lease being counted.
//
// The frontier also closes when the coordinator calls close() (page budget
// reached) or when the caller's CancellationToken fires. Closing cancels the
// stop token, which also aborts fetches that are still running.
//
// Rust concepts:
// - Drop: running code automatically when a value goes out of scope
// - Lifetimes: Lease<'a> borrows the Frontier it came from
// - tokio::sync::Notify: waking sleeping tasks without polling
// =============================================================================

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use url::Url;

/// A URL waiting to be crawled and its distance from the seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: Url,
    pub depth: usize,
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum PushError {
    #[error("frontier is full")]
    Full,
    #[error("frontier is closed")]
    Closed,
}

struct State {
    queue: VecDeque<FrontierEntry>,
    in_flight: usize,
}

pub struct Frontier {
    state: Mutex<State>,
    capacity: usize,
    available: Notify,
    stop: CancellationToken,
}

impl Frontier {
    /// Creates an empty frontier. Cancelling `stop` (or a parent of it)
    /// closes the frontier.
    pub fn new(capacity: usize, stop: CancellationToken) -> Self {
        Self {
            state: Mutex::new(State {
                queue: VecDeque::new(),
                in_flight: 0,
            }),
            capacity,
            available: Notify::new(),
            stop,
        }
    }

    /// Queues an entry without waiting.
    pub fn push(&self, entry: FrontierEntry) -> Result<(), PushError> {
        {
            let mut state = self.lock();
            if self.stop.is_cancelled() {
                return Err(PushError::Closed);
            }
            if state.queue.len() >= self.capacity {
                return Err(PushError::Full);
            }
            state.queue.push_back(entry);
        }

        self.available.notify_one();
        Ok(())
    }

    /// Waits for the next entry.
    ///
    /// Returns `None` once the frontier is closed, whether by the drain
    /// barrier, `close()`, or cancellation. Queued entries are abandoned
    /// after a close.
    pub async fn pop(&self) -> Option<Lease<'_>> {
        loop {
            // Register for wakeups *before* looking at the queue, so a push
            // landing between the check and the await isn't missed
            let notified = self.available.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut state = self.lock();
                if self.stop.is_cancelled() {
                    return None;
                }
                if let Some(entry) = state.queue.pop_front() {
                    state.in_flight += 1;
                    return Some(Lease {
                        frontier: self,
                        entry,
                    });
                }
                if state.in_flight == 0 {
                    // Nothing queued, nobody fetching: the crawl is drained
                    self.stop.cancel();
                    return None;
                }
            }

            tokio::select! {
                _ = &mut notified => {}
                _ = self.stop.cancelled() => return None,
            }
        }
    }

    /// Stops the crawl: no more pops, no more pushes, in-flight fetches abort.
    pub fn close(&self) {
        self.stop.cancel();
    }

    #[cfg(test)]
    pub fn is_closed(&self) -> bool {
        self.stop.is_cancelled()
    }

    /// Resolves once the frontier has been closed for any reason.
    pub async fn closed(&self) {
        self.stop.cancelled().await;
    }

    fn release(&self) {
        let mut state = self.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
        if state.in_flight == 0 && state.queue.is_empty() {
            self.stop.cancel();
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A popped entry whose worker is still busy with it.
///
/// While a lease is alive the frontier can't conclude the crawl is over.
/// Push the links you discover *before* dropping it.
pub struct Lease<'a> {
    frontier: &'a Frontier,
    entry: FrontierEntry,
}

impl Lease<'_> {
    pub fn entry(&self) -> &FrontierEntry {
        &self.entry
    }
}

impl Drop for Lease<'_> {
    fn drop(&mut self) {
        self.frontier.release();
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why implement Drop for Lease?
//    - Drop runs when the lease goes out of scope, on *every* path:
//      normal exit, early `break`, `?`, even a panic unwinding the worker
//    - So the in-flight count can't leak and leave other workers waiting
//
// 2. What does notified.as_mut().enable() do?
//    - A Notified future normally only starts listening when first polled
//    - enable() starts listening right away, before we check the queue
//    - Without it, a notify_one() fired between the check and the .await
//      would be lost and the worker could sleep forever
//
// 3. Why is the MutexGuard inside its own { } block?
//    - std::sync::MutexGuard must not be held across an .await
//    - The block ends (and the lock is released) before tokio::select!
//
// 4. What is tokio::select!?
//    - Waits on several futures at once and runs the branch of whichever
//      finishes first. Here: "an entry was pushed" vs "the crawl stopped"
// -----------------------------------------------------------------------------
