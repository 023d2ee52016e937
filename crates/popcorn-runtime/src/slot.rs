//! A query slot: the single "current request" of some view.
//!
//! Starting a request cancels the previous one and bumps the slot's
//! generation. A spawned request holds a [`Ticket`] and may only write to
//! the shared state while its generation is still current, checked under
//! the same lock the write happens in. A response that arrives after being
//! superseded is dropped on the floor.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

struct Shared<T> {
    generation: u64,
    state: T,
}

struct Active {
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

/// Owner side of a query slot holding state of type `T`.
pub struct QuerySlot<T> {
    shared: Arc<Mutex<Shared<T>>>,
    active: Option<Active>,
}

/// Request side of a query slot.
pub struct Ticket<T> {
    generation: u64,
    token: CancellationToken,
    shared: Arc<Mutex<Shared<T>>>,
}

fn lock<T>(shared: &Mutex<Shared<T>>) -> MutexGuard<'_, Shared<T>> {
    shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<T: Send + 'static> QuerySlot<T> {
    pub fn new(state: T) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                generation: 0,
                state,
            })),
            active: None,
        }
    }

    /// Cancel any in-flight request, then update the state synchronously.
    pub fn reset(&mut self, f: impl FnOnce(&mut T)) {
        self.cancel_active();
        let mut shared = lock(&self.shared);
        shared.generation += 1;
        f(&mut shared.state);
    }

    /// Cancel any in-flight request, apply `prepare`, and spawn `task` with
    /// a fresh ticket. Must be called from within a Tokio runtime.
    pub fn start<F, Fut>(&mut self, prepare: impl FnOnce(&mut T), task: F)
    where
        F: FnOnce(Ticket<T>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.cancel_active();
        let token = CancellationToken::new();
        let generation = {
            let mut shared = lock(&self.shared);
            shared.generation += 1;
            prepare(&mut shared.state);
            shared.generation
        };

        let ticket = Ticket {
            generation,
            token: token.clone(),
            shared: Arc::clone(&self.shared),
        };
        let handle = tokio::spawn(task(ticket));
        self.active = Some(Active {
            token,
            handle: Some(handle),
        });
    }

    /// Read the current state.
    pub fn with_state<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&lock(&self.shared).state)
    }

    pub fn snapshot(&self) -> T
    where
        T: Clone,
    {
        self.with_state(T::clone)
    }

    /// Wait for the current request, if any, to finish.
    pub async fn settled(&mut self) {
        let handle = self.active.as_mut().and_then(|a| a.handle.take());
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "Request task failed");
            }
        }
    }

    fn cancel_active(&mut self) {
        if let Some(active) = self.active.take() {
            active.token.cancel();
        }
    }
}

impl<T> Drop for QuerySlot<T> {
    fn drop(&mut self) {
        if let Some(active) = self.active.take() {
            active.token.cancel();
        }
    }
}

impl<T> Ticket<T> {
    /// Cancelled when the slot moves on to a newer request.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn is_current(&self) -> bool {
        !self.token.is_cancelled() && lock(&self.shared).generation == self.generation
    }

    /// Apply `f` to the slot state if this ticket is still current.
    /// Returns whether the update was applied.
    pub fn apply(&self, f: impl FnOnce(&mut T)) -> bool {
        let mut shared = lock(&self.shared);
        if self.token.is_cancelled() || shared.generation != self.generation {
            return false;
        }
        f(&mut shared.state);
        true
    }
}
