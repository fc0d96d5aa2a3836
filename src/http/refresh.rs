//! Refresh gate — serializes concurrent token-refresh attempts.
//!
//! Any number of requests can 401 at once; exactly one of them (the leader)
//! may call the refresh endpoint. The rest park on FIFO oneshot waiters and
//! get the outcome fanned back in arrival order, which in turn makes their
//! replays happen in arrival order.

use tokio::sync::{Mutex, oneshot};

use crate::error::ApiError;

enum RefreshState {
    Idle,
    Refreshing {
        waiters: Vec<oneshot::Sender<Result<String, ApiError>>>,
    },
}

/// What `join` handed back: either you run the refresh, or you wait for it.
pub(crate) enum RefreshRole {
    Leader,
    Follower(oneshot::Receiver<Result<String, ApiError>>),
}

/// At-most-one-refresh coordinator.
pub struct RefreshGate {
    state: Mutex<RefreshState>,
}

impl Default for RefreshGate {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshGate {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RefreshState::Idle),
        }
    }

    /// Enter the gate. The first caller while `Idle` becomes the leader and
    /// must later call [`complete`](Self::complete) or [`fail`](Self::fail);
    /// everyone else is queued.
    pub(crate) async fn join(&self) -> RefreshRole {
        let mut state = self.state.lock().await;
        match &mut *state {
            RefreshState::Idle => {
                *state = RefreshState::Refreshing {
                    waiters: Vec::new(),
                };
                RefreshRole::Leader
            }
            RefreshState::Refreshing { waiters } => {
                let (tx, rx) = oneshot::channel();
                waiters.push(tx);
                RefreshRole::Follower(rx)
            }
        }
    }

    /// Leader succeeded: hand the new token to every waiter in FIFO order
    /// and reopen the gate.
    pub(crate) async fn complete(&self, access_token: &str) {
        for waiter in self.take_waiters().await {
            // A dropped receiver means the caller gave up; nothing to do.
            let _ = waiter.send(Ok(access_token.to_string()));
        }
    }

    /// Leader failed: reject every waiter and reopen the gate.
    pub(crate) async fn fail(&self) {
        for waiter in self.take_waiters().await {
            let _ = waiter.send(Err(ApiError::SessionExpired));
        }
    }

    async fn take_waiters(&self) -> Vec<oneshot::Sender<Result<String, ApiError>>> {
        let mut state = self.state.lock().await;
        match std::mem::replace(&mut *state, RefreshState::Idle) {
            RefreshState::Refreshing { waiters } => waiters,
            RefreshState::Idle => Vec::new(),
        }
    }

    /// Whether a refresh is currently in flight.
    pub async fn is_refreshing(&self) -> bool {
        matches!(*self.state.lock().await, RefreshState::Refreshing { .. })
    }
}
