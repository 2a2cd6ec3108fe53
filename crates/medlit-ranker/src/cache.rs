//! In-memory ranking cache with a TTL and an injectable clock.
//!
//! Writes are versioned: a refresh takes a ticket before it starts fetching and
//! its result is only stored if no refresh with a later ticket has stored
//! first. Concurrent refreshes therefore resolve to the most recently started
//! one that succeeded.

use medlit_common::JournalRanking;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    start: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self { start: Instant::now(), offset: Mutex::new(Duration::ZERO) }
    }

    pub fn advance(&self, by: Duration) {
        let mut offset = self.offset.lock().unwrap_or_else(|e| e.into_inner());
        *offset += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let offset = *self.offset.lock().unwrap_or_else(|e| e.into_inner());
        self.start + offset
    }
}

#[derive(Debug, Clone)]
struct Entry {
    rankings: Vec<JournalRanking>,
    stored_at: Instant,
    ticket: u64,
}

/// Ticket handed out by [`RankingCache::begin_refresh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct CachedRankings {
    pub rankings: Vec<JournalRanking>,
    pub fresh: bool,
    pub age: Duration,
}

pub struct RankingCache {
    entries: RwLock<HashMap<String, Entry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    next_ticket: AtomicU64,
}

impl RankingCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            clock,
            next_ticket: AtomicU64::new(1),
        }
    }

    pub fn with_system_clock(ttl: Duration) -> Self {
        Self::new(ttl, Arc::new(SystemClock))
    }

    /// Look up an entry, fresh or not.
    pub async fn lookup(&self, specialty: &str) -> Option<CachedRankings> {
        let entries = self.entries.read().await;
        let entry = entries.get(specialty)?;
        let age = self.clock.now().saturating_duration_since(entry.stored_at);
        Some(CachedRankings {
            rankings: entry.rankings.clone(),
            fresh: age < self.ttl,
            age,
        })
    }

    /// The entry if it is younger than the TTL.
    pub async fn get_fresh(&self, specialty: &str) -> Option<Vec<JournalRanking>> {
        self.lookup(specialty).await.filter(|c| c.fresh).map(|c| c.rankings)
    }

    /// Reserve a version stamp for a refresh that is about to start.
    pub fn begin_refresh(&self) -> RefreshTicket {
        RefreshTicket(self.next_ticket.fetch_add(1, Ordering::SeqCst))
    }

    /// Store `rankings` unless a newer refresh already stored. Returns whether
    /// the write was applied.
    pub async fn store(
        &self,
        specialty: &str,
        rankings: Vec<JournalRanking>,
        ticket: RefreshTicket,
    ) -> bool {
        let mut entries = self.entries.write().await;
        if let Some(existing) = entries.get(specialty) {
            if existing.ticket > ticket.0 {
                debug!(specialty, ticket = ticket.0, newer = existing.ticket, "Discarding stale refresh");
                return false;
            }
        }
        entries.insert(
            specialty.to_string(),
            Entry { rankings, stored_at: self.clock.now(), ticket: ticket.0 },
        );
        true
    }

    pub async fn clear(&self) -> usize {
        let mut entries = self.entries.write().await;
        let n = entries.len();
        entries.clear();
        n
    }

    /// Specialties currently held, sorted.
    pub async fn cached_specialties(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.read().await.keys().cloned().collect();
        names.sort();
        names
    }
}
