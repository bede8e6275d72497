//! Last-request-wins bookkeeping for overlapping poem generations.
//!
//! Every generation takes a ticket before it starts. Its result is shown
//! only if no later ticket was issued in the meantime, so a slow earlier
//! request can never overwrite a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use moka::policy::EvictionPolicy;
use moka::sync::Cache;
use serde::Serialize;
use tracing::debug;

use super::orchestrator::PoemOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct GenerationTicket(u64);

impl GenerationTicket {
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DisplayedPoem {
    pub ticket: GenerationTicket,
    #[serde(flatten)]
    pub outcome: PoemOutcome,
}

/// What one client currently shows.
#[derive(Debug, Default)]
pub struct PoemBoard {
    issued: AtomicU64,
    shown: Mutex<Option<DisplayedPoem>>,
}

impl PoemBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new generation, superseding every earlier one.
    pub fn begin(&self) -> GenerationTicket {
        GenerationTicket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    #[must_use]
    pub fn is_current(&self, ticket: GenerationTicket) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket.0
    }

    /// Shows `outcome` if `ticket` is still the latest one issued.
    /// Returns whether it was accepted; stale outcomes are dropped.
    pub fn publish(&self, ticket: GenerationTicket, outcome: PoemOutcome) -> bool {
        let mut shown = self.shown.lock().unwrap_or_else(PoisonError::into_inner);
        let newer_shown = shown.as_ref().is_some_and(|current| current.ticket > ticket);
        if newer_shown || !self.is_current(ticket) {
            debug!(ticket = ticket.0, "discarding superseded poem");
            return false;
        }
        *shown = Some(DisplayedPoem { ticket, outcome });
        true
    }

    #[must_use]
    pub fn current(&self) -> Option<DisplayedPoem> {
        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Boards keyed by client session id.
///
/// Bounded: the least recently used session is forgotten once `capacity`
/// is reached, and a session untouched for `idle_timeout` expires.
#[derive(Clone)]
pub struct BoardRegistry {
    boards: Cache<String, Arc<PoemBoard>>,
}

impl BoardRegistry {
    pub const DEFAULT_CAPACITY: u64 = 1024;
    pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

    #[must_use]
    pub fn new() -> Self {
        Self::with_limits(Self::DEFAULT_CAPACITY, Self::DEFAULT_IDLE_TIMEOUT)
    }

    #[must_use]
    pub fn with_limits(capacity: u64, idle_timeout: Duration) -> Self {
        Self {
            boards: Cache::builder()
                .max_capacity(capacity)
                .time_to_idle(idle_timeout)
                .eviction_policy(EvictionPolicy::lru())
                .build(),
        }
    }

    /// Board for `session_id`, created on first use.
    pub fn board(&self, session_id: &str) -> Arc<PoemBoard> {
        self.boards
            .get_with(session_id.to_string(), || Arc::new(PoemBoard::new()))
    }

    pub fn existing(&self, session_id: &str) -> Option<Arc<PoemBoard>> {
        self.boards.get(session_id)
    }

    /// Sessions currently remembered, after pending evictions are applied.
    pub fn session_count(&self) -> u64 {
        self.boards.run_pending_tasks();
        self.boards.entry_count()
    }
}

impl Default for BoardRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BoardRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardRegistry")
            .field("sessions", &self.boards.entry_count())
            .finish()
    }
}
