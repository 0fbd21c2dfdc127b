// ABOUTME: Keyed single-flight primitive: one in-progress operation per key
// ABOUTME: Concurrent callers for the same key await the same shared outcome
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use std::fmt;
use std::future::Future;
use std::hash::Hash;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures_util::future::{BoxFuture, FutureExt, Shared};

type SharedOutcome<T> = Shared<BoxFuture<'static, T>>;

/// At most one in-flight operation per key
///
/// The first caller for a key starts the operation; callers arriving while
/// it runs await the same future and receive a clone of its output. Once it
/// resolves the key is free again, so the next caller starts a new run.
///
/// The map lock is only held while looking up or inserting the entry, never
/// across an await.
pub struct SingleFlight<K, T>
where
    K: Eq + Hash,
{
    in_flight: DashMap<K, SharedOutcome<T>>,
}

impl<K, T> Default for SingleFlight<K, T>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self {
            in_flight: DashMap::new(),
        }
    }
}

impl<K, T> fmt::Debug for SingleFlight<K, T>
where
    K: Eq + Hash,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingleFlight")
            .field("in_flight", &self.in_flight.len())
            .finish()
    }
}

impl<K, T> SingleFlight<K, T>
where
    K: Eq + Hash + Clone,
    T: Clone + Send + Sync + 'static,
{
    /// Empty group
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `operation` for `key`, or join the run already in flight
    ///
    /// `operation` is only called when no run for `key` is in flight.
    pub async fn run<F, Fut>(&self, key: K, operation: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let shared = match self.in_flight.entry(key.clone()) {
            Entry::Occupied(entry) => entry.get().clone(),
            Entry::Vacant(entry) => {
                let shared = operation().boxed().shared();
                entry.insert(shared.clone());
                shared
            }
        };

        let outcome = shared.clone().await;
        // Only the run we joined may be removed; a newer run keeps its entry
        self.in_flight
            .remove_if(&key, |_, current| current.ptr_eq(&shared));
        outcome
    }

    /// Whether a run for `key` is in flight
    #[must_use]
    pub fn is_in_flight(&self, key: &K) -> bool {
        self.in_flight.contains_key(key)
    }

    /// Number of keys with a run in flight
    #[must_use]
    pub fn len(&self) -> usize {
        self.in_flight.len()
    }

    /// Whether nothing is in flight
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.in_flight.is_empty()
    }
}
