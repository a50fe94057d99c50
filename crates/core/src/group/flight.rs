//! Single-flight execution of loads.
//!
//! Concurrent callers asking for the same key share one in-flight call: the
//! first caller (the leader) runs the load, later callers block until it
//! finishes and receive a clone of its result. The entry is removed from the
//! table before waiters are woken, so the next miss after completion starts a
//! fresh call.
//!
//! If the leader unwinds, waiters are released with [`Flight::Panicked`] and
//! the panic keeps propagating on the leader's thread.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

/// How a caller obtained its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Flight<T> {
    /// This caller ran the load.
    Led(T),
    /// Another caller ran the load and this one waited for it.
    Shared(T),
    /// The leader panicked before producing a value.
    Panicked,
}

enum Outcome<T> {
    Done(T),
    Panicked,
}

struct Call<T> {
    outcome: Mutex<Option<Outcome<T>>>,
    done: Condvar,
    #[cfg(test)]
    waiters: std::sync::atomic::AtomicUsize,
}

impl<T: Clone> Call<T> {
    fn new() -> Self {
        Self {
            outcome: Mutex::new(None),
            done: Condvar::new(),
            #[cfg(test)]
            waiters: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    fn wait(&self) -> Flight<T> {
        #[cfg(test)]
        self.waiters.fetch_add(1, std::sync::atomic::Ordering::SeqCst);

        let mut outcome = self.outcome.lock();
        while outcome.is_none() {
            self.done.wait(&mut outcome);
        }
        match outcome.as_ref() {
            Some(Outcome::Done(value)) => Flight::Shared(value.clone()),
            _ => Flight::Panicked,
        }
    }
}

/// Table of in-flight calls keyed by cache key.
pub(crate) struct FlightGroup<T> {
    calls: Mutex<HashMap<String, Arc<Call<T>>>>,
}

impl<T: Clone> FlightGroup<T> {
    pub(crate) fn new() -> Self {
        Self { calls: Mutex::new(HashMap::new()) }
    }

    /// Run `load` for `key`, or join the call already running for it.
    pub(crate) fn run<F>(&self, key: &str, load: F) -> Flight<T>
    where
        F: FnOnce() -> T,
    {
        let call = {
            let mut calls = self.calls.lock();
            if let Some(existing) = calls.get(key) {
                let existing = Arc::clone(existing);
                drop(calls);
                return existing.wait();
            }
            let call = Arc::new(Call::new());
            calls.insert(key.to_string(), Arc::clone(&call));
            call
        };

        let mut leader = Leader { flights: self, key, call: &call, outcome: None };
        let value = load();
        leader.outcome = Some(Outcome::Done(value.clone()));
        drop(leader);
        Flight::Led(value)
    }

    #[cfg(test)]
    fn waiting(&self, key: &str) -> usize {
        self.calls
            .lock()
            .get(key)
            .map_or(0, |call| call.waiters.load(std::sync::atomic::Ordering::SeqCst))
    }

    #[cfg(test)]
    fn in_flight(&self) -> usize {
        self.calls.lock().len()
    }
}

/// Publishes the leader's outcome when dropped, including during unwinding.
struct Leader<'a, T> {
    flights: &'a FlightGroup<T>,
    key: &'a str,
    call: &'a Call<T>,
    outcome: Option<Outcome<T>>,
}

impl<T> Drop for Leader<'_, T> {
    fn drop(&mut self) {
        self.flights.calls.lock().remove(self.key);
        let outcome = self.outcome.take().unwrap_or(Outcome::Panicked);
        *self.call.outcome.lock() = Some(outcome);
        self.call.done.notify_all();
    }
}
