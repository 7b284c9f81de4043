//! Background search pool.
//!
//! Runs move decisions on tokio's blocking thread pool so async request
//! handlers never block on a search. A semaphore bounds the number of
//! searches in flight; requests beyond that are rejected instead of queued.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::warn;

use crate::position::GamePosition;
use crate::{Opponent, SearchResult};

#[derive(Debug, Error)]
pub enum WorkerError {
    /// Every search slot is taken.
    #[error("all search slots are busy")]
    Busy,

    /// The search outlived the pool's timeout. It keeps its slot until it
    /// finishes.
    #[error("search timed out after {0:?}")]
    TimedOut(Duration),

    /// The blocking task panicked or was cancelled.
    #[error("search task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Pool of opponent searches bounded by a semaphore.
pub struct OpponentPool {
    opponent: Arc<Opponent>,
    semaphore: Arc<Semaphore>,
    timeout: Option<Duration>,
}

impl OpponentPool {
    /// Create a new pool.
    ///
    /// # Arguments
    /// * `opponent` - Opponent shared by every search
    /// * `pool_size` - Maximum number of concurrent searches
    pub fn new(opponent: Opponent, pool_size: usize) -> Self {
        Self {
            opponent: Arc::new(opponent),
            semaphore: Arc::new(Semaphore::new(pool_size)),
            timeout: None,
        }
    }

    /// Stop waiting for a search after `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Free search slots.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Chooses a move for `position` on the blocking pool.
    ///
    /// The position is moved into the search; callers keep their own copy
    /// of the canonical game state.
    ///
    /// # Errors
    ///
    /// [`WorkerError::Busy`] when no slot is free, [`WorkerError::TimedOut`]
    /// when the timeout elapses first, [`WorkerError::Join`] if the search
    /// task panicked.
    pub async fn select_move<P>(&self, mut position: P) -> Result<Option<SearchResult>, WorkerError>
    where
        P: GamePosition + Send + 'static,
    {
        let permit = Arc::clone(&self.semaphore)
            .try_acquire_owned()
            .map_err(|_| WorkerError::Busy)?;
        let opponent = Arc::clone(&self.opponent);

        let handle = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            opponent.select_move(&mut position)
        });

        let joined = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, handle).await {
                Ok(joined) => joined,
                Err(_) => {
                    warn!(?limit, "search timed out");
                    return Err(WorkerError::TimedOut(limit));
                }
            },
            None => handle.await,
        };
        Ok(joined?)
    }
}
