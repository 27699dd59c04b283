//! Completion signalling between fetch tasks and waiting requests.
//!
//! A fetch task reports through a [`Completion`]. Without single-flight the
//! completion wraps one `oneshot::Sender`; with it, the sender list of every
//! request that joined the same key is kept in [`InFlight`] and all of them
//! are answered at once.
//!
//! Sending never blocks: a request that already timed out has dropped its
//! receiver and the send simply fails.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::oneshot;

use crate::orchestrator::FetchResult;

/// Whether a request started a fetch or joined one already running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Leader,
    Follower,
}

/// Fetches currently running, by cache key.
#[derive(Debug, Default)]
pub struct InFlight {
    waiters: DashMap<String, Vec<oneshot::Sender<FetchResult>>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `tx` for `key`. The first registrant leads and must start
    /// the fetch.
    pub fn join(&self, key: &str, tx: oneshot::Sender<FetchResult>) -> Role {
        match self.waiters.entry(key.to_owned()) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().push(tx);
                Role::Follower
            }
            Entry::Vacant(entry) => {
                entry.insert(vec![tx]);
                Role::Leader
            }
        }
    }

    /// Deliver `result` to everyone waiting on `key` and forget the flight.
    /// Returns how many receivers were still listening.
    pub fn complete(&self, key: &str, result: FetchResult) -> usize {
        let Some((_, waiters)) = self.waiters.remove(key) else {
            return 0;
        };
        let mut delivered = 0;
        for tx in waiters {
            if tx.send(result.clone()).is_ok() {
                delivered += 1;
            }
        }
        delivered
    }

    /// Drop the flight without a result; waiters see a closed channel.
    pub fn abandon(&self, key: &str) {
        self.waiters.remove(key);
    }

    pub fn len(&self) -> usize {
        self.waiters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waiters.is_empty()
    }
}

enum Signal {
    Direct(oneshot::Sender<FetchResult>),
    Shared(Arc<InFlight>),
}

/// Single-use handle a fetch task reports its result through.
///
/// Dropping it unreported (the task panicked) releases the waiters so a
/// later request can start a fresh fetch.
pub struct Completion {
    key: String,
    signal: Option<Signal>,
}

impl Completion {
    pub fn direct(key: impl Into<String>, tx: oneshot::Sender<FetchResult>) -> Self {
        Self {
            key: key.into(),
            signal: Some(Signal::Direct(tx)),
        }
    }

    pub fn shared(key: impl Into<String>, flights: Arc<InFlight>) -> Self {
        Self {
            key: key.into(),
            signal: Some(Signal::Shared(flights)),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Hand the result to whoever is still waiting.
    pub fn complete(mut self, result: FetchResult) -> usize {
        match self.signal.take() {
            Some(Signal::Direct(tx)) => usize::from(tx.send(result).is_ok()),
            Some(Signal::Shared(flights)) => flights.complete(&self.key, result),
            None => 0,
        }
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if let Some(Signal::Shared(flights)) = self.signal.take() {
            flights.abandon(&self.key);
        }
    }
}
